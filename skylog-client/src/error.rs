//! Error types for the Skylog client

use skylog_core::domain::key::KeyError;
use skylog_core::domain::pipeline::StatusError;
use thiserror::Error;

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, ClientError>;

/// Errors that can occur when using the Skylog client
#[derive(Debug, Error)]
pub enum ClientError {
    /// No API key in the configuration store
    #[error("No cloud API Key was found")]
    MissingApiKey,

    /// API key failed validation
    #[error("Invalid API key: {0}")]
    InvalidKey(#[from] KeyError),

    /// Required pipeline id was empty
    #[error("No input pipeline_id")]
    MissingPipelineId,

    /// Required pipeline status was empty
    #[error("No input pipeline status")]
    MissingStatus,

    /// Status is not one of started, finished, error
    #[error("Invalid pipeline status: {0}")]
    InvalidStatus(String),

    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// API returned an error status code
    #[error("API error (status {status}): {message}")]
    ApiError {
        /// HTTP status code
        status: u16,
        /// Response body
        message: String,
    },

    /// Response body was not the expected JSON
    #[error("Issue fetching pipeline: {message}: {body}")]
    ParseError {
        /// Decoder error
        message: String,
        /// Raw response body
        body: String,
    },

    /// Configuration file could not be read or written
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Broad category of a [`ClientError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or malformed key, argument or config file
    Configuration,
    /// Connection, timeout or non-success response
    Transport,
    /// Unexpected response body
    Serialization,
}

impl ClientError {
    /// Create an API error from status code and message
    pub fn api_error(status: u16, message: impl Into<String>) -> Self {
        Self::ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingApiKey
            | Self::InvalidKey(_)
            | Self::MissingPipelineId
            | Self::MissingStatus
            | Self::InvalidStatus(_)
            | Self::ConfigError(_) => ErrorKind::Configuration,
            Self::RequestFailed(_) | Self::ApiError { .. } => ErrorKind::Transport,
            Self::ParseError { .. } => ErrorKind::Serialization,
        }
    }

    /// Check if this error is a client error (4xx status)
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 400 && *status < 500)
    }

    /// Check if this error is a server error (5xx status)
    pub fn is_server_error(&self) -> bool {
        matches!(self, Self::ApiError { status, .. } if *status >= 500)
    }
}

impl From<StatusError> for ClientError {
    fn from(err: StatusError) -> Self {
        match err {
            StatusError::Empty => Self::MissingStatus,
            StatusError::Unknown(status) => Self::InvalidStatus(status),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_missing_input() {
        assert!(
            ClientError::MissingApiKey
                .to_string()
                .contains("No cloud API Key")
        );
        assert!(
            ClientError::MissingPipelineId
                .to_string()
                .contains("No input pipeline_id")
        );
        assert!(
            ClientError::MissingStatus
                .to_string()
                .contains("No input pipeline status")
        );
    }

    #[test]
    fn test_kind() {
        assert_eq!(ClientError::MissingApiKey.kind(), ErrorKind::Configuration);
        assert_eq!(
            ClientError::api_error(502, "bad gateway").kind(),
            ErrorKind::Transport
        );
        let parse = ClientError::ParseError {
            message: "expected value".to_string(),
            body: "<html>".to_string(),
        };
        assert_eq!(parse.kind(), ErrorKind::Serialization);
        assert!(parse.to_string().contains("<html>"));
    }

    #[test]
    fn test_status_error_conversion() {
        assert!(matches!(
            ClientError::from(StatusError::Empty),
            ClientError::MissingStatus
        ));
        assert!(matches!(
            ClientError::from(StatusError::Unknown("running".to_string())),
            ClientError::InvalidStatus(s) if s == "running"
        ));
    }

    #[test]
    fn test_status_classes() {
        assert!(ClientError::api_error(403, "forbidden").is_client_error());
        assert!(ClientError::api_error(500, "oops").is_server_error());
        assert!(!ClientError::MissingApiKey.is_server_error());
    }
}
