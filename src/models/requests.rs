//! Request DTOs for the viewer API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for the search operation (POST /api/search)
///
/// # Fields
/// - `query`: The text to look for
/// - `path_filter`: Only search files whose relative path contains this substring
/// - `case_sensitive`: Match case exactly (default: false)
/// - `limit`: Maximum number of files to search (default: 50)
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    /// The search string
    pub query: String,
    /// Optional substring filter on relative paths
    #[serde(default)]
    pub path_filter: Option<String>,
    /// Case sensitive search
    #[serde(default)]
    pub case_sensitive: bool,
    /// Maximum number of files to search
    #[serde(default = "default_limit")]
    pub limit: usize,
}

fn default_limit() -> usize {
    50
}

impl SearchQuery {
    /// Validates the request data.
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.query.is_empty() {
            return Some("Query cannot be empty".to_string());
        }
        if self.query.len() > 1000 {
            return Some("Query exceeds maximum length of 1000 characters".to_string());
        }
        if self.limit == 0 || self.limit > 1000 {
            return Some("Limit must be between 1 and 1000".to_string());
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_deserialize() {
        let json = r#"{"query": "hello"}"#;
        let req: SearchQuery = serde_json::from_str(json).unwrap();
        assert_eq!(req.query, "hello");
        assert!(req.path_filter.is_none());
        assert!(!req.case_sensitive);
        assert_eq!(req.limit, 50);
    }

    #[test]
    fn test_search_query_full() {
        let json = r#"{"query": "x", "path_filter": "docs/", "case_sensitive": true, "limit": 5}"#;
        let req: SearchQuery = serde_json::from_str(json).unwrap();
        assert_eq!(req.path_filter.as_deref(), Some("docs/"));
        assert!(req.case_sensitive);
        assert_eq!(req.limit, 5);
    }

    #[test]
    fn test_validate_empty_query() {
        let req = SearchQuery {
            query: String::new(),
            path_filter: None,
            case_sensitive: false,
            limit: 50,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_oversized_query() {
        let req = SearchQuery {
            query: "x".repeat(1001),
            path_filter: None,
            case_sensitive: false,
            limit: 50,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_bad_limit() {
        let req = SearchQuery {
            query: "x".to_string(),
            path_filter: None,
            case_sensitive: false,
            limit: 0,
        };
        assert!(req.validate().is_some());
    }

    #[test]
    fn test_validate_valid_request() {
        let req = SearchQuery {
            query: "hello".to_string(),
            path_filter: None,
            case_sensitive: false,
            limit: 50,
        };
        assert!(req.validate().is_none());
    }
}
