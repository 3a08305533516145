//! Data models for the viewer API
//!
//! Request and response DTOs shared by the HTTP handlers.

pub mod requests;
pub mod responses;

pub use requests::SearchQuery;
pub use responses::{
    CacheClearResponse, ErrorResponse, FileContentResponse, FileListResponse, HealthResponse,
    MarkdownFile, SearchMatch, SearchResult,
};
