//! Error types for the loading boundary.
//!
//! Everything past loading is pure computation with a total contract over
//! the declared input shape — malformed geometry degrades instead of
//! erroring — so the only fallible operations in this crate are reading and
//! parsing JSON artifacts.

use thiserror::Error;

/// Error loading a document or template artifact.
#[derive(Debug, Error)]
pub enum LoadError {
    /// I/O error reading the artifact.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The artifact is not valid JSON for the document schema.
    #[error("document parse error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_error_display() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "template.json missing");
        let err: LoadError = io.into();
        assert!(err.to_string().contains("template.json missing"));
        assert!(matches!(err, LoadError::Io(_)));
    }

    #[test]
    fn test_json_error_from_parse() {
        let parse_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: LoadError = parse_err.into();
        assert!(matches!(err, LoadError::Json(_)));
        assert!(err.to_string().starts_with("document parse error"));
    }
}
