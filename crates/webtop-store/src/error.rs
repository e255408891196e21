//! Error types for the persistence layer

use thiserror::Error;

/// Errors that can occur in local or remote storage operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The requested table does not exist on the remote service
    #[error("table not found: {0}")]
    TableNotFound(String),

    /// No row matched the filter of an update
    #[error("no matching row in table '{table}'")]
    RowNotFound {
        /// Table that was queried
        table: String,
    },

    /// JSON serialization or deserialization failed
    #[error("serialization error: {0}")]
    SerializationError(String),

    /// The remote service rejected or failed the request
    #[error("remote error: {0}")]
    Remote(String),

    /// No persistent storage is available in this context
    #[error("storage unavailable")]
    Unavailable,
}

impl StoreError {
    /// Create a remote error with message.
    pub fn remote(msg: impl Into<String>) -> Self {
        Self::Remote(msg.into())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type alias for storage operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = StoreError::TableNotFound("notes".to_string());
        assert_eq!(err.to_string(), "table not found: notes");

        let err = StoreError::RowNotFound {
            table: "todos".to_string(),
        };
        assert_eq!(err.to_string(), "no matching row in table 'todos'");

        assert_eq!(StoreError::remote("timeout").to_string(), "remote error: timeout");
        assert_eq!(StoreError::Unavailable.to_string(), "storage unavailable");
    }

    #[test]
    fn test_from_serde_error() {
        let parse = serde_json::from_str::<u32>("not json").unwrap_err();
        let err: StoreError = parse.into();
        assert!(matches!(err, StoreError::SerializationError(_)));
    }
}
