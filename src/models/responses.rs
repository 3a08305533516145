//! Response DTOs for the viewer API
//!
//! Defines the structure of outgoing HTTP response bodies.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;

/// A markdown file with the metadata the scanner extracts for it.
#[derive(Debug, Clone, Serialize)]
pub struct MarkdownFile {
    /// Absolute path on disk
    pub path: PathBuf,
    /// Path relative to the served base directory
    pub relative_path: String,
    /// File name including extension
    pub filename: String,
    /// Size in bytes
    pub size: u64,
    /// Last modification time
    pub modified_at: DateTime<Utc>,
    /// Creation time, where the filesystem reports one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// First level-one heading, if the file starts with one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// First prose paragraph, truncated to 200 characters
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Response body for the file list endpoint (GET /api/files)
#[derive(Debug, Clone, Serialize)]
pub struct FileListResponse {
    /// Discovered markdown files
    pub files: Vec<MarkdownFile>,
    /// Number of files found
    pub total_count: usize,
    /// Directory that was scanned
    pub base_dir: String,
    /// Scan duration in seconds
    pub scan_time: f64,
}

/// Response body for the file content endpoint (GET /api/files/*path)
#[derive(Debug, Clone, Serialize)]
pub struct FileContentResponse {
    /// File metadata
    pub file: MarkdownFile,
    /// Raw markdown content
    pub raw_content: String,
    /// Rendered HTML content
    pub html_content: String,
    /// Whether the HTML came from the render cache
    pub cached: bool,
}

/// One matching line with its surrounding context
#[derive(Debug, Clone, Serialize)]
pub struct SearchMatch {
    /// 1-based line number of the match
    pub line_number: usize,
    /// The matching line itself
    pub line: String,
    /// The match plus up to two lines either side
    pub context: String,
}

/// Search hits within a single file
#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    /// File metadata
    pub file: MarkdownFile,
    /// Matching lines with context
    pub matches: Vec<SearchMatch>,
    /// Number of matches found
    pub match_count: usize,
}

/// Response body for the cache clear endpoint (DELETE /api/cache)
#[derive(Debug, Clone, Serialize)]
pub struct CacheClearResponse {
    /// Outcome description
    pub status: String,
}

impl CacheClearResponse {
    /// The standard "cache cleared" acknowledgement.
    pub fn cleared() -> Self {
        Self {
            status: "cache cleared".to_string(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Error message describing what went wrong
    pub error: String,
}
