//! Capture trait definitions
//!
//! Platform-agnostic interfaces for the screen-capture service and the
//! permission checker.

use serde::{Deserialize, Serialize};

use crate::encoder::{CaptureRequest, InputSurface};
use crate::utils::PlatformError;

/// Information about a display/screen
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayInfo {
    /// Unique display ID
    pub id: u32,

    /// Display name
    pub name: String,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,

    /// Refresh rate in Hz, rounded down
    pub refresh_rate: u32,

    /// Screen density in dots per inch
    pub density_dpi: u32,
}

impl DisplayInfo {
    /// Request to capture this display at its native size and rate
    pub fn capture_request(&self) -> CaptureRequest {
        CaptureRequest::new(self.width, self.height, self.refresh_rate)
    }

    /// Virtual display geometry mirroring this display
    pub fn mirror_spec(&self) -> MirrorSpec {
        MirrorSpec {
            width: self.width,
            height: self.height,
            density_dpi: self.density_dpi,
        }
    }
}

/// Geometry of a mirrored virtual display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MirrorSpec {
    pub width: u32,
    pub height: u32,
    pub density_dpi: u32,
}

/// User-authorized token permitting screen mirroring
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CaptureGrant(String);

impl CaptureGrant {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Active capture session held by the platform service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CaptureHandle(pub u64);

/// Off-screen display mirroring the screen into an encoder surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VirtualDisplayHandle(pub u64);

/// Called when the user stops sharing from system UI
pub type RevokedCallback = Box<dyn Fn() + Send + Sync>;

/// Platform screen-capture service
pub trait CaptureService: Send + Sync {
    /// Produce a grant once the user has approved screen capture
    fn create_grant(&self) -> Result<CaptureGrant, PlatformError>;

    /// Open a capture session; `on_revoked` stays registered until `stop`
    fn create_capture_handle(
        &self,
        grant: &CaptureGrant,
        on_revoked: RevokedCallback,
    ) -> Result<CaptureHandle, PlatformError>;

    /// Mirror the screen into `surface`
    fn mirror(
        &self,
        handle: CaptureHandle,
        surface: InputSurface,
        spec: MirrorSpec,
    ) -> Result<VirtualDisplayHandle, PlatformError>;

    fn release_display(&self, display: VirtualDisplayHandle);

    /// Stop capturing and drop the revocation callback
    fn stop(&self, handle: CaptureHandle);
}

/// Runtime permissions the recorder depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PermissionKind {
    RecordAudio,
    ScreenCapture,
}

/// Check whether a permission is currently granted
pub trait PermissionChecker: Send + Sync {
    fn has_grant(&self, kind: PermissionKind) -> bool;
}
