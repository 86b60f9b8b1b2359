//! Video/audio encoding
//!
//! Capability negotiation against the hardware codec, the parameter set the
//! recorder is configured with, and the recorder collaborator trait.

pub mod envelope;
pub mod negotiate;
pub mod params;
pub mod traits;

pub use envelope::{EncoderEnvelope, StaticEnvelope, ValueRange};
pub use negotiate::{negotiate, CaptureRequest, NegotiatedFormat};
pub use params::{
    AudioParams, BitratePolicy, OutputFormat, RecorderSettings, RecordingLimits, VideoParams,
};
pub use traits::{InfoListener, InputSurface, MediaRecorder, MediaRecorderFactory, RecorderInfo};
