//! Error types for strata-indexmap
//!
//! Almost every failure in an index map is expressed as an absent or empty
//! result: an unknown index name or an unseen key is not a fault. The only
//! raised errors come from the serialization adapter and from the strict
//! index registration path.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.

use thiserror::Error;

/// Result type alias for index map operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the index map
#[derive(Debug, Error)]
pub enum Error {
    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// A secondary index with this name is already registered
    #[error("Index already exists: {0}")]
    IndexExists(String),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

impl From<bincode::Error> for Error {
    fn from(e: bincode::Error) -> Self {
        Error::SerializationError(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_serialization() {
        let err = Error::SerializationError("invalid format".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Serialization error"));
        assert!(msg.contains("invalid format"));
    }

    #[test]
    fn test_error_display_index_exists() {
        let err = Error::IndexExists("city".to_string());
        let msg = err.to_string();
        assert!(msg.contains("Index already exists"));
        assert!(msg.contains("city"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let result: Result<Vec<u32>> = serde_json::from_slice(b"[1, 2,").map_err(|e| e.into());
        assert!(matches!(result, Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_error_from_bincode() {
        // Length prefix far larger than the payload
        let invalid_data = vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF];

        let result: Result<String> = bincode::deserialize(&invalid_data).map_err(|e| e.into());

        assert!(matches!(result, Err(Error::SerializationError(_))));
    }

    #[test]
    fn test_error_pattern_matching() {
        let err = Error::IndexExists("name".to_string());

        match err {
            Error::IndexExists(name) => assert_eq!(name, "name"),
            _ => panic!("Wrong error variant"),
        }
    }
}
