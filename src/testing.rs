//! Fake platform collaborators for tests
//!
//! Every fake appends to a shared call log so tests can assert ordering
//! across the capture service and the recorder.

use parking_lot::Mutex;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::capture::{
    CaptureGrant, CaptureHandle, CaptureService, DisplayInfo, MirrorSpec, PermissionChecker,
    PermissionKind, RevokedCallback, VirtualDisplayHandle,
};
use crate::commands::recording::Playback;
use crate::encoder::{
    EncoderEnvelope, InfoListener, InputSurface, MediaRecorder, MediaRecorderFactory, RecorderInfo,
    RecorderSettings, StaticEnvelope, ValueRange,
};
use crate::notifications::{Notification, NotificationChannel, Notifier};
use crate::utils::PlatformError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    CreateGrant,
    CreateHandle,
    Mirror { width: u32, height: u32, density_dpi: u32 },
    ReleaseDisplay,
    StopCapture,
    Configure,
    RecorderStart,
    RecorderStop,
    RecorderRelease,
    CreateChannel,
    Notify(u32),
    Cancel(u32),
}

pub type CallLog = Arc<Mutex<Vec<Call>>>;

pub fn test_display() -> DisplayInfo {
    DisplayInfo {
        id: 0,
        name: "Built-in Screen".to_string(),
        width: 1080,
        height: 2400,
        refresh_rate: 60,
        density_dpi: 420,
    }
}

pub fn test_envelope() -> StaticEnvelope {
    StaticEnvelope::new(4096, 4096, 16, 16, ValueRange::new(1, 60))
}

pub struct FakeCapture {
    log: CallLog,
    next_id: AtomicU64,
    revoked: Mutex<Option<RevokedCallback>>,
    fail_handle: bool,
    revoke_on_handle: bool,
}

impl FakeCapture {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            next_id: AtomicU64::new(1),
            revoked: Mutex::new(None),
            fail_handle: false,
            revoke_on_handle: false,
        }
    }

    pub fn failing_handle(mut self) -> Self {
        self.fail_handle = true;
        self
    }

    /// Revoke the grant as soon as the handle is created, while Preparing
    pub fn revoking_on_handle(mut self) -> Self {
        self.revoke_on_handle = true;
        self
    }

    /// Simulate the user stopping the share from system UI
    pub fn revoke(&self) {
        if let Some(callback) = self.revoked.lock().as_ref() {
            callback();
        }
    }

    pub fn has_callback(&self) -> bool {
        self.revoked.lock().is_some()
    }
}

impl CaptureService for FakeCapture {
    fn create_grant(&self) -> Result<CaptureGrant, PlatformError> {
        self.log.lock().push(Call::CreateGrant);
        Ok(CaptureGrant::new("fake-grant"))
    }

    fn create_capture_handle(
        &self,
        _grant: &CaptureGrant,
        on_revoked: RevokedCallback,
    ) -> Result<CaptureHandle, PlatformError> {
        self.log.lock().push(Call::CreateHandle);
        if self.fail_handle {
            return Err(PlatformError::new("get_media_projection", "grant expired"));
        }
        if self.revoke_on_handle {
            on_revoked();
        }
        *self.revoked.lock() = Some(on_revoked);
        Ok(CaptureHandle(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn mirror(
        &self,
        _handle: CaptureHandle,
        _surface: InputSurface,
        spec: MirrorSpec,
    ) -> Result<VirtualDisplayHandle, PlatformError> {
        self.log.lock().push(Call::Mirror {
            width: spec.width,
            height: spec.height,
            density_dpi: spec.density_dpi,
        });
        Ok(VirtualDisplayHandle(self.next_id.fetch_add(1, Ordering::SeqCst)))
    }

    fn release_display(&self, _display: VirtualDisplayHandle) {
        self.log.lock().push(Call::ReleaseDisplay);
    }

    fn stop(&self, _handle: CaptureHandle) {
        self.log.lock().push(Call::StopCapture);
        self.revoked.lock().take();
    }
}

type SharedListener = Arc<Mutex<Option<InfoListener>>>;

struct FakeRecorder {
    log: CallLog,
    envelope: StaticEnvelope,
    fail_configure: bool,
    configured: bool,
    listener: SharedListener,
    settings: Arc<Mutex<Option<RecorderSettings>>>,
}

impl MediaRecorder for FakeRecorder {
    fn video_capabilities(&self) -> Result<Arc<dyn EncoderEnvelope>, PlatformError> {
        Ok(Arc::new(self.envelope.clone()))
    }

    fn configure(
        &mut self,
        settings: &RecorderSettings,
        on_info: InfoListener,
    ) -> Result<(), PlatformError> {
        self.log.lock().push(Call::Configure);
        if self.fail_configure {
            return Err(PlatformError::new("prepare", "unsupported configuration"));
        }
        *self.settings.lock() = Some(settings.clone());
        *self.listener.lock() = Some(on_info);
        self.configured = true;
        Ok(())
    }

    fn input_surface(&self) -> Option<InputSurface> {
        self.configured.then_some(InputSurface(7))
    }

    fn start(&mut self) -> Result<(), PlatformError> {
        self.log.lock().push(Call::RecorderStart);
        Ok(())
    }

    fn stop(&mut self) -> Result<(), PlatformError> {
        self.log.lock().push(Call::RecorderStop);
        Ok(())
    }

    fn release(&mut self) {
        self.log.lock().push(Call::RecorderRelease);
        self.listener.lock().take();
    }
}

/// Creates fake recorders that share one call log and info listener slot
#[derive(Clone)]
pub struct FakeRecorderFactory {
    log: CallLog,
    envelope: StaticEnvelope,
    fail_configure: bool,
    listener: SharedListener,
    settings: Arc<Mutex<Option<RecorderSettings>>>,
}

impl FakeRecorderFactory {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(Vec::new())),
            envelope: test_envelope(),
            fail_configure: false,
            listener: Arc::new(Mutex::new(None)),
            settings: Arc::new(Mutex::new(None)),
        }
    }

    pub fn failing_configure(mut self) -> Self {
        self.fail_configure = true;
        self
    }

    pub fn log(&self) -> CallLog {
        self.log.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.lock().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().clear();
    }

    pub fn last_settings(&self) -> Option<RecorderSettings> {
        self.settings.lock().clone()
    }

    /// Deliver an info notice as the platform recorder would
    pub fn emit_info(&self, info: RecorderInfo) {
        if let Some(listener) = self.listener.lock().as_ref() {
            listener(info);
        }
    }
}

impl MediaRecorderFactory for FakeRecorderFactory {
    fn create(&self) -> Result<Box<dyn MediaRecorder>, PlatformError> {
        Ok(Box::new(FakeRecorder {
            log: self.log.clone(),
            envelope: self.envelope.clone(),
            fail_configure: self.fail_configure,
            configured: false,
            listener: self.listener.clone(),
            settings: self.settings.clone(),
        }))
    }
}

#[derive(Default)]
pub struct FakePermissions {
    granted: Mutex<HashSet<PermissionKind>>,
}

impl FakePermissions {
    pub fn granting(kinds: &[PermissionKind]) -> Self {
        Self {
            granted: Mutex::new(kinds.iter().copied().collect()),
        }
    }

    pub fn grant(&self, kind: PermissionKind) {
        self.granted.lock().insert(kind);
    }
}

impl PermissionChecker for FakePermissions {
    fn has_grant(&self, kind: PermissionKind) -> bool {
        self.granted.lock().contains(&kind)
    }
}

pub struct FakeNotifier {
    log: CallLog,
    posted: Mutex<Vec<Notification>>,
}

impl FakeNotifier {
    pub fn new(log: CallLog) -> Self {
        Self {
            log,
            posted: Mutex::new(Vec::new()),
        }
    }

    pub fn posted(&self) -> Vec<Notification> {
        self.posted.lock().clone()
    }
}

impl Notifier for FakeNotifier {
    fn create_channel(&self, _channel: &NotificationChannel) {
        self.log.lock().push(Call::CreateChannel);
    }

    fn notify(&self, notification: &Notification) {
        self.log.lock().push(Call::Notify(notification.id));
        self.posted.lock().push(notification.clone());
    }

    fn cancel(&self, id: u32) {
        self.log.lock().push(Call::Cancel(id));
    }
}

/// Forwards every played file to a channel
pub struct FakePlayer {
    played: mpsc::UnboundedSender<PathBuf>,
}

impl FakePlayer {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PathBuf>) {
        let (played, rx) = mpsc::unbounded_channel();
        (Self { played }, rx)
    }
}

impl Playback for FakePlayer {
    fn play(&self, path: &std::path::Path) {
        let _ = self.played.send(path.to_path_buf());
    }
}
