//! Recording session
//!
//! One pass through Idle -> Preparing -> Recording -> Stopped. The session
//! owns the capture handle, the virtual display and the recorder for that
//! pass and releases them in a fixed order on every path into Stopped.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::{broadcast, oneshot};
use uuid::Uuid;

use super::state::{
    RecordingResult, RecordingState, SessionEvent, SessionSignal, SignalSender, StopReason,
};
use crate::capture::{
    CaptureGrant, CaptureHandle, CaptureService, DisplayInfo, RevokedCallback,
    VirtualDisplayHandle,
};
use crate::encoder::{
    negotiate, AudioParams, BitratePolicy, InfoListener, MediaRecorder, NegotiatedFormat,
    OutputFormat, RecorderSettings, RecordingLimits, VideoParams,
};
use crate::utils::{ErrorResponse, PlatformError, RecorderError, RecorderResult};

/// Tunables applied when configuring the recorder
#[derive(Debug, Clone, Copy, Default)]
pub struct SessionOptions {
    pub limits: RecordingLimits,
    pub bitrate: BitratePolicy,
}

pub struct RecordingSession {
    id: Uuid,
    state: RecordingState,
    options: SessionOptions,

    capture: Arc<dyn CaptureService>,
    recorder: Box<dyn MediaRecorder>,

    capture_handle: Option<CaptureHandle>,
    virtual_display: Option<VirtualDisplayHandle>,
    recorder_configured: bool,
    recorder_started: bool,

    output_path: Option<PathBuf>,
    format: Option<NegotiatedFormat>,
    started_at: DateTime<Utc>,

    /// Feeds revocation and recorder info back to the transition handler
    signals: SignalSender,
    events: broadcast::Sender<SessionEvent>,

    completion_tx: Option<oneshot::Sender<RecordingResult>>,
    completion_rx: Option<oneshot::Receiver<RecordingResult>>,
}

impl RecordingSession {
    pub fn new(
        capture: Arc<dyn CaptureService>,
        recorder: Box<dyn MediaRecorder>,
        signals: SignalSender,
        events: broadcast::Sender<SessionEvent>,
        options: SessionOptions,
    ) -> Self {
        let (completion_tx, completion_rx) = oneshot::channel();
        Self {
            id: Uuid::new_v4(),
            state: RecordingState::Idle,
            options,
            capture,
            recorder,
            capture_handle: None,
            virtual_display: None,
            recorder_configured: false,
            recorder_started: false,
            output_path: None,
            format: None,
            started_at: Utc::now(),
            signals,
            events,
            completion_tx: Some(completion_tx),
            completion_rx: Some(completion_rx),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Output file, once allocated
    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn negotiated_format(&self) -> Option<NegotiatedFormat> {
        self.format
    }

    /// Receiver for the single completion event. Only the first call gets it.
    pub fn take_completion(&mut self) -> Option<oneshot::Receiver<RecordingResult>> {
        self.completion_rx.take()
    }

    fn set_state(&mut self, state: RecordingState) {
        tracing::debug!(session = %self.id, "{:?} -> {:?}", self.state, state);
        self.state = state;
        let _ = self.events.send(SessionEvent::StateChanged(state));
    }

    fn expect_state(&self, expected: RecordingState, operation: &str) -> RecorderResult<()> {
        if self.state != expected {
            return Err(RecorderError::InvalidState(format!(
                "cannot {} while {:?}",
                operation, self.state
            )));
        }
        Ok(())
    }

    /// Report a setup/runtime failure and tear the session down
    fn abort(&mut self, error: RecorderError) -> RecorderError {
        tracing::error!(session = %self.id, "Recording aborted: {}", error);
        let _ = self.events.send(SessionEvent::Aborted(ErrorResponse::from(&error)));
        self.stop(StopReason::SetupFailed);
        error
    }

    /// Idle -> Preparing: acquire the capture handle and allocate the output file
    pub fn start(&mut self, grant: &CaptureGrant, output_dir: &Path) -> RecorderResult<PathBuf> {
        self.expect_state(RecordingState::Idle, "start")?;
        self.set_state(RecordingState::Preparing);

        let (id, signals) = (self.id, self.signals.clone());
        let on_revoked: RevokedCallback = Box::new(move || {
            tracing::warn!(session = %id, "Capture grant revoked");
            let _ = signals.send((id, SessionSignal::Stop(StopReason::CaptureGrantRevoked)));
        });

        match self.capture.create_capture_handle(grant, on_revoked) {
            Ok(handle) => self.capture_handle = Some(handle),
            Err(e) => return Err(self.abort(RecorderError::CaptureUnavailable(e))),
        }

        if let Err(source) = std::fs::create_dir_all(output_dir) {
            return Err(self.abort(RecorderError::DirectoryCreationFailed {
                path: output_dir.to_path_buf(),
                source,
            }));
        }

        let file_name = format!(
            "{}.{}",
            Utc::now().timestamp_millis(),
            OutputFormat::Mpeg4.extension()
        );
        let output_path = output_dir.join(file_name);
        tracing::info!(session = %self.id, "Recording file: {:?}", output_path);
        self.output_path = Some(output_path.clone());

        Ok(output_path)
    }

    /// Negotiate video parameters against the encoder and configure it
    pub fn configure(&mut self, display: &DisplayInfo) -> RecorderResult<NegotiatedFormat> {
        self.expect_state(RecordingState::Preparing, "configure")?;
        if self.recorder_configured {
            return Err(RecorderError::InvalidState("recorder already configured".to_string()));
        }

        let envelope = match self.recorder.video_capabilities() {
            Ok(envelope) => envelope,
            Err(e) => return Err(self.abort(RecorderError::EncoderConfigurationFailed(e))),
        };

        let request = display.capture_request();
        let format = negotiate(request, envelope.as_ref());
        tracing::info!(
            session = %self.id,
            "Display {}x{}@{} -> encoding {}x{}@{}",
            request.width,
            request.height,
            request.refresh_rate,
            format.width,
            format.height,
            format.frame_rate
        );

        let Some(output_path) = self.output_path.clone() else {
            let error = RecorderError::InvalidState("no output file allocated".to_string());
            return Err(self.abort(error));
        };

        let settings = RecorderSettings {
            output_format: OutputFormat::Mpeg4,
            video: VideoParams::from_format(format, &self.options.bitrate),
            audio: AudioParams::default(),
            limits: self.options.limits,
            output_path,
        };

        let (id, signals) = (self.id, self.signals.clone());
        let on_info: InfoListener = Box::new(move |info| {
            let _ = signals.send((id, SessionSignal::Info(info)));
        });

        if let Err(e) = self.recorder.configure(&settings, on_info) {
            return Err(self.abort(RecorderError::EncoderConfigurationFailed(e)));
        }

        self.recorder_configured = true;
        self.format = Some(format);
        Ok(format)
    }

    /// Preparing -> Recording: mirror the display into the encoder and start it
    pub fn begin(&mut self, display: &DisplayInfo) -> RecorderResult<()> {
        self.expect_state(RecordingState::Preparing, "begin")?;
        if !self.recorder_configured {
            return Err(RecorderError::InvalidState("recorder not configured".to_string()));
        }

        let Some(handle) = self.capture_handle else {
            return Err(self.abort(RecorderError::InvalidState("no capture handle".to_string())));
        };

        let Some(surface) = self.recorder.input_surface() else {
            return Err(self.abort(RecorderError::EncoderStartFailed(PlatformError::new(
                "input_surface",
                "recorder exposes no input surface",
            ))));
        };

        match self.capture.mirror(handle, surface, display.mirror_spec()) {
            Ok(virtual_display) => self.virtual_display = Some(virtual_display),
            Err(e) => return Err(self.abort(RecorderError::CaptureUnavailable(e))),
        }

        if let Err(e) = self.recorder.start() {
            return Err(self.abort(RecorderError::EncoderStartFailed(e)));
        }

        self.recorder_started = true;
        self.started_at = Utc::now();
        self.set_state(RecordingState::Recording);
        tracing::info!(session = %self.id, "Recording started");
        Ok(())
    }

    /// Release everything and move to Stopped. No-op unless active.
    ///
    /// Returns the completion payload the first time an active session with
    /// an allocated output file stops.
    pub fn stop(&mut self, reason: StopReason) -> Option<RecordingResult> {
        if !self.state.is_active() {
            tracing::debug!(
                session = %self.id,
                "Ignoring stop ({:?}) while {:?}",
                reason,
                self.state
            );
            return None;
        }

        tracing::info!(session = %self.id, "Stopping recording: {:?}", reason);
        self.release();
        self.set_state(RecordingState::Stopped);

        let output_path = self.output_path.clone()?;
        let result = RecordingResult {
            session_id: self.id,
            output_path,
            stop_reason: reason,
            started_at: self.started_at,
            stopped_at: Utc::now(),
        };

        if let Some(tx) = self.completion_tx.take() {
            let _ = tx.send(result.clone());
            let _ = self.events.send(SessionEvent::Completed(result.clone()));
        }

        Some(result)
    }

    /// Encoder/muxer, then virtual display, then capture handle
    fn release(&mut self) {
        if self.recorder_started {
            if let Err(e) = self.recorder.stop() {
                tracing::warn!(session = %self.id, "Recorder stop failed: {}", e);
            }
            self.recorder_started = false;
        }
        self.recorder.release();

        if let Some(display) = self.virtual_display.take() {
            self.capture.release_display(display);
        }

        if let Some(handle) = self.capture_handle.take() {
            self.capture.stop(handle);
        }
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        if self.state.is_active() {
            tracing::warn!(session = %self.id, "Session dropped while {:?}", self.state);
            self.stop(StopReason::Requested);
        }
    }
}
