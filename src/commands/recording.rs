//! Recording commands
//!
//! The user-facing flow: make sure the microphone permission is granted, ask
//! for screen-capture consent, start the coordinator, and hand the finished
//! file to playback.

use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

use crate::capture::{CaptureService, DisplayInfo, PermissionChecker, PermissionKind, RequestBroker};
use crate::recorder::{RecordingCoordinator, RecordingState};
use crate::utils::{RecorderError, RecorderResult};

/// Plays a finished recording
pub trait Playback: Send + Sync {
    fn play(&self, path: &Path);
}

/// Application state for recording
pub struct RecorderState {
    pub coordinator: Arc<RecordingCoordinator>,
    pub capture: Arc<dyn CaptureService>,
    pub permissions: Arc<dyn PermissionChecker>,
    pub prompts: Arc<RequestBroker>,
    pub player: Arc<dyn Playback>,
}

/// Ask the user for a permission unless it is already granted
async fn ensure_permission(state: &RecorderState, kind: PermissionKind) -> bool {
    if state.permissions.has_grant(kind) {
        return true;
    }
    state.prompts.issue(kind).granted().await
}

/// Start recording
pub async fn start_recording(state: &RecorderState, display: DisplayInfo) -> RecorderResult<Uuid> {
    if !ensure_permission(state, PermissionKind::RecordAudio).await {
        state.coordinator.report_permission_required(PermissionKind::RecordAudio);
        return Err(RecorderError::PermissionDenied(PermissionKind::RecordAudio));
    }

    // Screen capture consent is asked for every recording
    if !state.prompts.issue(PermissionKind::ScreenCapture).granted().await {
        tracing::info!("Recording cancelled");
        return Err(RecorderError::CaptureCancelled);
    }

    let grant = state
        .capture
        .create_grant()
        .map_err(RecorderError::CaptureUnavailable)?;

    let handle = state.coordinator.start(grant, &display)?;
    let id = handle.id;

    let player = state.player.clone();
    tokio::spawn(async move {
        match handle.completion.await {
            Ok(result) => {
                tracing::info!(
                    session = %result.session_id,
                    "Recording complete ({} ms): {:?}",
                    result.duration_ms(),
                    result.output_path
                );
                player.play(&result.output_path);
            }
            Err(_) => tracing::debug!(session = %id, "Session ended without output"),
        }
    });

    Ok(id)
}

/// Stop recording
pub fn stop_recording(state: &RecorderState) -> bool {
    state.coordinator.stop()
}

/// Get current recording state
pub fn get_recording_state(state: &RecorderState) -> RecordingState {
    state.coordinator.state()
}
