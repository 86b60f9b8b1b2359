//! Projection Recorder - screen and microphone recording into MP4.
//!
//! The platform supplies screen capture, the hardware encoder/muxer,
//! permission checks, notifications and playback. This crate negotiates the
//! encoding format against the encoder's limits and drives each recording
//! session through its lifecycle.

pub mod capture;
pub mod commands;
pub mod config;
pub mod encoder;
pub mod notifications;
pub mod recorder;
pub mod utils;

#[cfg(test)]
mod testing;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub use config::RecorderConfig;
pub use recorder::{RecordingCoordinator, RecordingState};
pub use utils::{RecorderError, RecorderResult};

/// Initialize tracing/logging. Safe to call more than once.
pub fn init_tracing() {
    let result = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "projection_recorder=debug,info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();

    if result.is_ok() {
        tracing::info!("Starting Projection Recorder v{}", env!("CARGO_PKG_VERSION"));
    }
}
