//! Recording coordinator
//!
//! Owns the single active recording session and the one task that applies
//! stop requests, capture revocation and recorder info to it. Whichever stop
//! arrives first wins; later ones find the session already Stopped.

use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::session::RecordingSession;
use super::state::{
    RecordingResult, RecordingState, SessionEvent, SessionSignal, SignalSender, StopReason,
};
use crate::capture::{CaptureGrant, CaptureService, DisplayInfo, PermissionChecker, PermissionKind};
use crate::config::RecorderConfig;
use crate::encoder::{MediaRecorderFactory, NegotiatedFormat};
use crate::notifications::{
    audio_permission_required_notification, foreground_service_notification, recording_channel,
    Notifier, FOREGROUND_NOTIFICATION_ID,
};
use crate::utils::{RecorderError, RecorderResult};

type SessionSlot = Arc<Mutex<Option<RecordingSession>>>;

/// A session that reached Recording
#[derive(Debug)]
pub struct SessionHandle {
    pub id: Uuid,
    pub format: NegotiatedFormat,
    pub output_path: PathBuf,
    /// Fires once when the session stops
    pub completion: oneshot::Receiver<RecordingResult>,
}

/// Manages the recording lifecycle
pub struct RecordingCoordinator {
    session: SessionSlot,

    capture: Arc<dyn CaptureService>,
    recorders: Arc<dyn MediaRecorderFactory>,
    permissions: Arc<dyn PermissionChecker>,
    notifier: Arc<dyn Notifier>,
    config: RecorderConfig,

    signal_tx: SignalSender,
    event_tx: broadcast::Sender<SessionEvent>,
    handler: JoinHandle<()>,
}

impl RecordingCoordinator {
    /// Create a coordinator. Must be called from within a tokio runtime.
    pub fn new(
        capture: Arc<dyn CaptureService>,
        recorders: Arc<dyn MediaRecorderFactory>,
        permissions: Arc<dyn PermissionChecker>,
        notifier: Arc<dyn Notifier>,
        config: RecorderConfig,
    ) -> Self {
        let (signal_tx, signal_rx) = mpsc::unbounded_channel();
        let (event_tx, _) = broadcast::channel(100);
        let session: SessionSlot = Arc::new(Mutex::new(None));

        let handler = tokio::spawn(run_transition_handler(
            signal_rx,
            session.clone(),
            event_tx.clone(),
            notifier.clone(),
            config.stop_on_hardware_limit,
        ));

        Self {
            session,
            capture,
            recorders,
            permissions,
            notifier,
            config,
            signal_tx,
            event_tx,
            handler,
        }
    }

    /// State of the current (or last) session
    pub fn state(&self) -> RecordingState {
        self.session
            .lock()
            .as_ref()
            .map(|s| s.state())
            .unwrap_or_default()
    }

    pub fn current_session_id(&self) -> Option<Uuid> {
        self.session.lock().as_ref().map(|s| s.id())
    }

    /// Subscribe to recording events
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    pub fn config(&self) -> &RecorderConfig {
        &self.config
    }

    /// Tell observers a permission is missing
    pub fn report_permission_required(&self, kind: PermissionKind) {
        tracing::warn!("{:?} permission is required", kind);
        let _ = self.event_tx.send(SessionEvent::PermissionRequired(kind));
    }

    /// Start a new session and run it through to Recording
    pub fn start(
        &self,
        grant: CaptureGrant,
        display: &DisplayInfo,
    ) -> RecorderResult<SessionHandle> {
        if !self.permissions.has_grant(PermissionKind::RecordAudio) {
            self.notifier.notify(&audio_permission_required_notification());
            self.report_permission_required(PermissionKind::RecordAudio);
            return Err(RecorderError::PermissionDenied(PermissionKind::RecordAudio));
        }

        let mut slot = self.session.lock();
        if slot.as_ref().is_some_and(|s| s.state().is_active()) {
            return Err(RecorderError::AlreadyRecording);
        }

        let recorder = self
            .recorders
            .create()
            .map_err(RecorderError::EncoderConfigurationFailed)?;

        let mut session = RecordingSession::new(
            self.capture.clone(),
            recorder,
            self.signal_tx.clone(),
            self.event_tx.clone(),
            self.config.session_options(),
        );
        let completion = session
            .take_completion()
            .ok_or_else(|| RecorderError::InvalidState("completion already taken".to_string()))?;

        tracing::info!(
            session = %session.id(),
            "Starting recording to {:?}",
            self.config.output_dir
        );
        self.notifier.create_channel(&recording_channel());
        self.notifier.notify(&foreground_service_notification());

        let outcome = launch(&mut session, &grant, &self.config, display);
        let id = session.id();
        *slot = Some(session);

        match outcome {
            Ok((format, output_path)) => Ok(SessionHandle {
                id,
                format,
                output_path,
                completion,
            }),
            Err(e) => {
                self.notifier.cancel(FOREGROUND_NOTIFICATION_ID);
                Err(e)
            }
        }
    }

    /// Ask the active session to stop. Returns false when nothing is recording.
    pub fn stop(&self) -> bool {
        let Some(id) = self
            .session
            .lock()
            .as_ref()
            .filter(|s| s.state().is_active())
            .map(|s| s.id())
        else {
            tracing::debug!("Stop requested with no active session");
            return false;
        };

        self.signal_tx
            .send((id, SessionSignal::Stop(StopReason::Requested)))
            .is_ok()
    }
}

impl Drop for RecordingCoordinator {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

fn launch(
    session: &mut RecordingSession,
    grant: &CaptureGrant,
    config: &RecorderConfig,
    display: &DisplayInfo,
) -> RecorderResult<(NegotiatedFormat, PathBuf)> {
    let output_path = session.start(grant, &config.output_dir)?;
    let format = session.configure(display)?;
    session.begin(display)?;
    Ok((format, output_path))
}

/// Applies every signal to the session it was issued for
async fn run_transition_handler(
    mut signals: mpsc::UnboundedReceiver<(Uuid, SessionSignal)>,
    session: SessionSlot,
    events: broadcast::Sender<SessionEvent>,
    notifier: Arc<dyn Notifier>,
    stop_on_hardware_limit: bool,
) {
    while let Some((id, signal)) = signals.recv().await {
        let mut slot = session.lock();
        let Some(current) = slot.as_mut().filter(|s| s.id() == id) else {
            tracing::debug!(session = %id, "Dropping {:?} for stale session", signal);
            continue;
        };

        let reason = match signal {
            SessionSignal::Stop(reason) => reason,
            SessionSignal::Info(info) => {
                tracing::info!(session = %id, "Media recorder info: {:?}", info);
                let _ = events.send(SessionEvent::Info(info));
                if !(info.is_limit() && stop_on_hardware_limit) {
                    continue;
                }
                StopReason::HardwareLimit(info)
            }
        };

        if let Some(error) = reason.as_error() {
            tracing::warn!(session = %id, "{}", error);
        }

        let was_active = current.state().is_active();
        current.stop(reason);
        if was_active {
            notifier.cancel(FOREGROUND_NOTIFICATION_ID);
        }
    }
}
