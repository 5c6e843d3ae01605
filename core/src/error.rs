//! Error types for the fallible edges of the crate.
//!
//! The text model itself never fails: decoding, projection, reconciliation and
//! insertion all degrade or clamp. Errors only arise where data crosses a
//! boundary (configuration, search payloads, host JSON).

use thiserror::Error;

/// Errors raised by the mention search collaborator.
///
/// These never reach the editor state; the suggestion controller turns them
/// into an empty suggestion list.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// The lookup could not be performed (network, backend down, ...).
    #[error("search transport failed: {0}")]
    Transport(String),

    /// The collaborator answered with a payload we could not decode.
    #[error("malformed search response: {0}")]
    Malformed(String),
}

/// Errors that can occur at the crate's boundaries.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MentionError {
    /// A ref type name that is not one of `user`, `event`, `group`, `city`.
    #[error("unknown mention type: {0:?}")]
    UnknownRefType(String),

    /// Search collaborator failure.
    #[error(transparent)]
    Search(#[from] SearchError),

    /// Invalid editor configuration.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// JSON payload that could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for MentionError {
    fn from(err: serde_json::Error) -> Self {
        MentionError::Serialization(err.to_string())
    }
}

/// Result type for fallible operations.
pub type Result<T> = std::result::Result<T, MentionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_error_is_transparent() {
        let err: MentionError = SearchError::Transport("offline".to_string()).into();
        assert_eq!(err.to_string(), "search transport failed: offline");
    }

    #[test]
    fn test_json_error_conversion() {
        let err: MentionError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, MentionError::Serialization(_)));
    }
}
