//! Encoder/muxer collaborator
//!
//! The platform recorder encodes the mirrored surface plus microphone audio
//! and muxes both into the output file on its own threads.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::envelope::EncoderEnvelope;
use super::params::RecorderSettings;
use crate::utils::PlatformError;

/// Opaque input surface the virtual display renders into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct InputSurface(pub u64);

/// Asynchronous notices from a running recorder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RecorderInfo {
    MaxDurationReached,
    MaxFileSizeReached,
    Unknown(i32),
}

impl RecorderInfo {
    /// Whether this notice reports one of the configured limits
    pub fn is_limit(&self) -> bool {
        matches!(self, RecorderInfo::MaxDurationReached | RecorderInfo::MaxFileSizeReached)
    }
}

/// Receives recorder info on whatever thread the platform uses
pub type InfoListener = Box<dyn Fn(RecorderInfo) + Send + Sync>;

/// A platform media recorder, used for one session
pub trait MediaRecorder: Send {
    /// Capabilities of the video codec, read from the platform decoder
    fn video_capabilities(&self) -> Result<Arc<dyn EncoderEnvelope>, PlatformError>;

    /// Apply settings and bind the output file
    fn configure(
        &mut self,
        settings: &RecorderSettings,
        on_info: InfoListener,
    ) -> Result<(), PlatformError>;

    /// Surface to mirror into; available once configured
    fn input_surface(&self) -> Option<InputSurface>;

    fn start(&mut self) -> Result<(), PlatformError>;

    /// Finalize the output file
    fn stop(&mut self) -> Result<(), PlatformError>;

    fn release(&mut self);
}

/// Produces a fresh recorder for each session
pub trait MediaRecorderFactory: Send + Sync {
    fn create(&self) -> Result<Box<dyn MediaRecorder>, PlatformError>;
}
