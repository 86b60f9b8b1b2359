//! Recording state management
//!
//! Defines the recording state machine, stop reasons and session events.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::capture::PermissionKind;
use crate::encoder::RecorderInfo;
use crate::utils::{ErrorResponse, RecorderError};

/// Current state of a recording session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordingState {
    /// Nothing acquired yet
    #[default]
    Idle,
    /// Capture handle held, output file allocated, encoder being configured
    Preparing,
    /// Encoder running and writing the output file
    Recording,
    /// Everything released. Terminal.
    Stopped,
}

impl RecordingState {
    /// Whether the session holds platform resources
    pub fn is_active(&self) -> bool {
        matches!(self, RecordingState::Preparing | RecordingState::Recording)
    }
}

/// Why a session stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StopReason {
    /// Caller asked to stop
    Requested,
    /// User stopped sharing from system UI
    CaptureGrantRevoked,
    /// Setup failed before recording started
    SetupFailed,
    /// Recorder hit a configured limit and the caller opted to stop on it
    HardwareLimit(RecorderInfo),
}

impl StopReason {
    /// Error kind for stops the caller did not ask for
    pub fn as_error(&self) -> Option<RecorderError> {
        match self {
            StopReason::CaptureGrantRevoked => Some(RecorderError::CaptureGrantRevoked),
            StopReason::HardwareLimit(info) => Some(RecorderError::HardwareLimitReached(*info)),
            StopReason::Requested | StopReason::SetupFailed => None,
        }
    }
}

/// Input to the session's transition handler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionSignal {
    Stop(StopReason),
    Info(RecorderInfo),
}

/// Signals tagged with the session they belong to
pub type SignalSender = mpsc::UnboundedSender<(Uuid, SessionSignal)>;

/// Result of a completed recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingResult {
    pub session_id: Uuid,

    /// Path to the MP4 file
    pub output_path: PathBuf,

    pub stop_reason: StopReason,

    pub started_at: DateTime<Utc>,

    pub stopped_at: DateTime<Utc>,
}

impl RecordingResult {
    pub fn duration_ms(&self) -> i64 {
        (self.stopped_at - self.started_at).num_milliseconds()
    }
}

/// Events broadcast to observers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "type", content = "payload")]
pub enum SessionEvent {
    StateChanged(RecordingState),
    Info(RecorderInfo),
    /// A permission is missing; show remediation
    PermissionRequired(PermissionKind),
    Aborted(ErrorResponse),
    Completed(RecordingResult),
}
