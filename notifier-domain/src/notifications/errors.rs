use notifier_core::error::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotificationError {
    /// No bearer token is present in client storage.
    #[error("No access token available in client storage.")]
    Unauthenticated,

    #[error("Network error calling '{endpoint}': {source}")]
    Network {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Endpoint '{endpoint}' responded with HTTP {status}.")]
    HttpStatus { endpoint: String, status: u16 },

    #[error("Malformed response from '{endpoint}': {reason}")]
    Decode { endpoint: String, reason: String },

    #[error("Client storage error during operation '{operation}': {message}")]
    StorageError {
        operation: String,
        message: String,
        #[source]
        source: Option<CoreError>,
    },

    #[error("Internal notification error: {0}")]
    InternalError(String),
}

impl NotificationError {
    pub fn storage_error_from_core(operation: &str, message: &str, core_error: CoreError) -> Self {
        NotificationError::StorageError {
            operation: operation.to_string(),
            message: message.to_string(),
            source: Some(core_error),
        }
    }

    pub fn storage_error(operation: &str, message: impl Into<String>) -> Self {
        NotificationError::StorageError {
            operation: operation.to_string(),
            message: message.into(),
            source: None,
        }
    }

    /// True for failures caused by the transport or the server, as opposed to local state.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            NotificationError::Network { .. } | NotificationError::HttpStatus { .. } | NotificationError::Decode { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_http_status_display() {
        let err = NotificationError::HttpStatus {
            endpoint: "/api/notifications/important/".to_string(),
            status: 503,
        };
        assert_eq!(
            err.to_string(),
            "Endpoint '/api/notifications/important/' responded with HTTP 503."
        );
        assert!(err.is_remote());
    }

    #[test]
    fn test_storage_error_keeps_core_source() {
        let core = CoreError::InvalidInput("bad key".to_string());
        let err = NotificationError::storage_error_from_core("set_item", "write failed", core);
        assert!(err.to_string().contains("set_item"));
        assert!(err.source().is_some());
        assert!(!err.is_remote());
    }

    #[test]
    fn test_unauthenticated_is_local() {
        assert!(!NotificationError::Unauthenticated.is_remote());
    }
}
