//! Command handlers
//!
//! Entry points the UI layer calls to drive recording.

pub mod recording;

pub use recording::{get_recording_state, start_recording, stop_recording, Playback, RecorderState};
