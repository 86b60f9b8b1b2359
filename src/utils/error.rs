//! Error types and handling
//!
//! Common error types used across the recorder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

use crate::capture::PermissionKind;
use crate::encoder::RecorderInfo;

/// Failure reported by a platform collaborator (capture service, encoder, ...)
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct PlatformError {
    pub operation: &'static str,
    pub message: String,
}

impl PlatformError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Recorder-wide error type
#[derive(Error, Debug)]
pub enum RecorderError {
    #[error("Permission denied: {0:?}")]
    PermissionDenied(PermissionKind),

    #[error("Screen capture was cancelled by the user")]
    CaptureCancelled,

    #[error("Failed to create output directory {path:?}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Encoder rejected configuration: {0}")]
    EncoderConfigurationFailed(#[source] PlatformError),

    #[error("Encoder failed to start: {0}")]
    EncoderStartFailed(#[source] PlatformError),

    #[error("Capture unavailable: {0}")]
    CaptureUnavailable(#[source] PlatformError),

    #[error("Capture grant was revoked")]
    CaptureGrantRevoked,

    #[error("Hardware limit reached: {0:?}")]
    HardwareLimitReached(RecorderInfo),

    #[error("A recording is already in progress")]
    AlreadyRecording,

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error payload for observers of session events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl From<&RecorderError> for ErrorResponse {
    fn from(error: &RecorderError) -> Self {
        let code = match error {
            RecorderError::PermissionDenied(_) => "PERMISSION_DENIED",
            RecorderError::CaptureCancelled => "CAPTURE_CANCELLED",
            RecorderError::DirectoryCreationFailed { .. } => "DIRECTORY_CREATION_FAILED",
            RecorderError::EncoderConfigurationFailed(_) => "ENCODER_CONFIGURATION_FAILED",
            RecorderError::EncoderStartFailed(_) => "ENCODER_START_FAILED",
            RecorderError::CaptureUnavailable(_) => "CAPTURE_UNAVAILABLE",
            RecorderError::CaptureGrantRevoked => "CAPTURE_GRANT_REVOKED",
            RecorderError::HardwareLimitReached(_) => "HARDWARE_LIMIT_REACHED",
            RecorderError::AlreadyRecording => "ALREADY_RECORDING",
            RecorderError::InvalidState(_) => "INVALID_STATE",
            RecorderError::Io(_) => "IO_ERROR",
        };

        ErrorResponse {
            code: code.to_string(),
            message: error.to_string(),
        }
    }
}

impl From<RecorderError> for ErrorResponse {
    fn from(error: RecorderError) -> Self {
        ErrorResponse::from(&error)
    }
}

/// Result type alias using RecorderError
pub type RecorderResult<T> = Result<T, RecorderError>;
