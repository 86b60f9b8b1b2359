//! Recording system module
//!
//! - RecordingSession: the per-recording state machine
//! - RecordingCoordinator: owns the active session and applies stop signals
//! - state: states, stop reasons and events

pub mod coordinator;
pub mod session;
pub mod state;

pub use coordinator::{RecordingCoordinator, SessionHandle};
pub use session::{RecordingSession, SessionOptions};
pub use state::{RecordingResult, RecordingState, SessionEvent, SessionSignal, StopReason};
