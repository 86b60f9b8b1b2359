//! Shared utilities

pub mod error;

pub use error::{ErrorResponse, PlatformError, RecorderError, RecorderResult};
