//! Error types module
//!
//! This module provides the core error types used throughout the Pixstore
//! application. All errors are unified under the `AppError` enum which can
//! represent validation, storage, fetch, and other domain-specific errors.

use std::io;

use crate::validator::ValidationError;

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like failed remote fetches
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
/// This trait allows errors to self-describe their HTTP response characteristics
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "SIGNATURE_MISMATCH")
    fn error_code(&self) -> &'static str;

    /// Whether this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Suggested action for the client
    fn suggested_action(&self) -> Option<&'static str>;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden in production
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Empty file: {0}")]
    EmptyFile(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Unsupported file type: {0}")]
    UnsupportedType(String),

    #[error("Signature mismatch: {0}")]
    SignatureMismatch(String),

    #[error("Content type mismatch: {0}")]
    ContentTypeMismatch(String),

    #[error("Bad content disposition: {0}")]
    BadDisposition(String),

    #[error("Remote fetch failed: {0}")]
    FetchFailed(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

// Error conversion implementations following Rust best practices
impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        let message = err.to_string();
        match err {
            ValidationError::Empty => AppError::EmptyFile(message),
            ValidationError::TooLarge { .. } => AppError::PayloadTooLarge(message),
            ValidationError::UnsupportedType => AppError::UnsupportedType(message),
            ValidationError::SignatureMismatch => AppError::SignatureMismatch(message),
            ValidationError::ContentTypeMismatch { .. } => AppError::ContentTypeMismatch(message),
        }
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

impl From<io::Error> for AppError {
    fn from(err: io::Error) -> Self {
        AppError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::BadRequest(format!("JSON parsing error: {}", err))
    }
}

impl From<uuid::Error> for AppError {
    fn from(err: uuid::Error) -> Self {
        AppError::BadRequest(format!("UUID parsing error: {}", err))
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, suggested_action, sensitive, log_level).
/// Reduces duplication in ErrorMetadata impl; client_message stays per-variant for dynamic content.
fn app_error_static_metadata(
    err: &AppError,
) -> (
    u16,
    &'static str,
    bool,
    Option<&'static str>,
    bool,
    LogLevel,
) {
    match err {
        AppError::EmptyFile(_) => (
            400,
            "EMPTY_FILE",
            false,
            Some("Provide a non-empty file"),
            false,
            LogLevel::Debug,
        ),
        AppError::PayloadTooLarge(_) => (
            413,
            "PAYLOAD_TOO_LARGE",
            false,
            Some("Reduce file size and try again"),
            false,
            LogLevel::Debug,
        ),
        AppError::UnsupportedType(_) => (
            400,
            "UNSUPPORTED_TYPE",
            false,
            Some("Upload one of the permitted image formats"),
            false,
            LogLevel::Debug,
        ),
        AppError::SignatureMismatch(_) => (
            400,
            "SIGNATURE_MISMATCH",
            false,
            Some("Check that the file content matches its extension"),
            false,
            LogLevel::Debug,
        ),
        AppError::ContentTypeMismatch(_) => (
            400,
            "CONTENT_TYPE_MISMATCH",
            false,
            Some("Check that the declared content type matches the file content"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadDisposition(_) => (
            400,
            "BAD_DISPOSITION",
            false,
            Some("Send file sections with a file content disposition"),
            false,
            LogLevel::Debug,
        ),
        AppError::FetchFailed(_) => (
            400,
            "FETCH_FAILED",
            true,
            Some("Verify the URL is reachable and try again"),
            false,
            LogLevel::Warn,
        ),
        AppError::NotFound(_) => (
            404,
            "NOT_FOUND",
            false,
            Some("Verify the resource ID exists"),
            false,
            LogLevel::Debug,
        ),
        AppError::BadRequest(_) => (
            400,
            "BAD_REQUEST",
            false,
            Some("Check request format and parameters"),
            false,
            LogLevel::Debug,
        ),
        AppError::Io(_) => (
            500,
            "IO_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::Internal(_) => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
        AppError::InternalWithSource { .. } => (
            500,
            "INTERNAL_ERROR",
            true,
            Some("Retry after a short delay"),
            true,
            LogLevel::Error,
        ),
    }
}

impl AppError {
    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::EmptyFile(_) => "EmptyFile",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::UnsupportedType(_) => "UnsupportedType",
            AppError::SignatureMismatch(_) => "SignatureMismatch",
            AppError::ContentTypeMismatch(_) => "ContentTypeMismatch",
            AppError::BadDisposition(_) => "BadDisposition",
            AppError::FetchFailed(_) => "FetchFailed",
            AppError::NotFound(_) => "NotFound",
            AppError::BadRequest(_) => "BadRequest",
            AppError::Io(_) => "Io",
            AppError::Internal(_) => "Internal",
            AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        // Add source error chain
        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn suggested_action(&self) -> Option<&'static str> {
        app_error_static_metadata(self).3
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).4
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).5
    }

    fn client_message(&self) -> String {
        match self {
            AppError::EmptyFile(ref msg) => msg.clone(),
            AppError::PayloadTooLarge(ref msg) => msg.clone(),
            AppError::UnsupportedType(ref msg) => msg.clone(),
            AppError::SignatureMismatch(ref msg) => msg.clone(),
            AppError::ContentTypeMismatch(ref msg) => msg.clone(),
            AppError::BadDisposition(ref msg) => msg.clone(),
            AppError::FetchFailed(ref msg) => msg.clone(),
            AppError::NotFound(ref msg) => msg.clone(),
            AppError::BadRequest(ref msg) => msg.clone(),
            AppError::Io(_) => "Failed to access storage".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
            AppError::InternalWithSource { .. } => "Internal server error".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_metadata_not_found() {
        let err = AppError::NotFound("Image not found".to_string());
        assert_eq!(err.http_status_code(), 404);
        assert_eq!(err.error_code(), "NOT_FOUND");
        assert!(!err.is_recoverable());
        assert_eq!(err.client_message(), "Image not found");
        assert!(!err.is_sensitive());
        assert_eq!(err.log_level(), LogLevel::Debug);
    }

    #[test]
    fn test_error_metadata_payload_too_large() {
        let err = AppError::from(ValidationError::TooLarge { limit_mb: 1.0 });
        assert_eq!(err.http_status_code(), 413);
        assert_eq!(err.error_code(), "PAYLOAD_TOO_LARGE");
        assert_eq!(err.client_message(), "The file exceeds 1.0 MB.");
        assert!(!err.is_sensitive());
    }

    #[test]
    fn test_error_metadata_io_is_opaque() {
        let err = AppError::Io("disk on fire".to_string());
        assert_eq!(err.http_status_code(), 500);
        assert_eq!(err.error_code(), "IO_ERROR");
        assert!(err.is_recoverable());
        assert!(err.is_sensitive());
        assert_eq!(err.client_message(), "Failed to access storage");
        assert_eq!(err.log_level(), LogLevel::Error);
    }

    #[test]
    fn test_validation_error_conversion_kinds() {
        let empty = AppError::from(ValidationError::Empty);
        assert_eq!(empty.error_code(), "EMPTY_FILE");
        assert_eq!(empty.client_message(), "The file is empty.");

        let unsupported = AppError::from(ValidationError::UnsupportedType);
        assert_eq!(unsupported.http_status_code(), 400);
        assert_eq!(unsupported.error_code(), "UNSUPPORTED_TYPE");

        let mismatch = AppError::from(ValidationError::SignatureMismatch);
        assert_eq!(mismatch.error_code(), "SIGNATURE_MISMATCH");
    }

    #[test]
    fn test_error_metadata_suggested_actions() {
        let err1 = AppError::FetchFailed("connection refused".to_string());
        assert_eq!(
            err1.suggested_action(),
            Some("Verify the URL is reachable and try again")
        );

        let err2 = AppError::NotFound("test".to_string());
        assert_eq!(
            err2.suggested_action(),
            Some("Verify the resource ID exists")
        );

        let err3 = AppError::BadRequest("test".to_string());
        assert_eq!(
            err3.suggested_action(),
            Some("Check request format and parameters")
        );
    }
}
