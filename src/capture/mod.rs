//! Screen capture
//!
//! Interfaces to the platform capture service and permission checks, plus
//! the prompt protocol used to obtain user consent.

pub mod requests;
pub mod traits;

pub use requests::{PendingRequest, PromptRequest, RequestBroker, RequestToken};
pub use traits::{
    CaptureGrant, CaptureHandle, CaptureService, DisplayInfo, MirrorSpec, PermissionChecker,
    PermissionKind, RevokedCallback, VirtualDisplayHandle,
};
