//! Encoder parameters
//!
//! Video parameters come from negotiation; audio follows a fixed policy.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use super::negotiate::NegotiatedFormat;

/// Frame rate the bit-rate ratio is expressed against
pub const REFERENCE_FRAME_RATE: u32 = 30;

/// Bits per pixel per frame at the reference frame rate
pub const BITRATE_RATIO: u32 = 6;

pub const MAX_DURATION: Duration = Duration::from_secs(60 * 60);
pub const MAX_FILE_SIZE_BYTES: u64 = 5_000_000_000;

pub const AUDIO_BIT_RATE: u32 = 196_000;
pub const AUDIO_SAMPLE_RATE: u32 = 44_100;
pub const AUDIO_CHANNELS: u16 = 1;

/// Container format of the output file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Mpeg4,
}

impl OutputFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Mpeg4 => "mp4",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoCodec {
    H264,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProfile {
    Baseline,
    Main,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AudioCodec {
    Aac,
    HeAac,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AudioSource {
    /// Platform default input, normally the microphone
    Default,
}

/// Bit-rate policy for the video track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BitratePolicy {
    pub reference_frame_rate: u32,
    pub ratio: u32,
}

impl Default for BitratePolicy {
    fn default() -> Self {
        Self {
            reference_frame_rate: REFERENCE_FRAME_RATE,
            ratio: BITRATE_RATIO,
        }
    }
}

impl BitratePolicy {
    /// `width * height * rate / reference * ratio`, in bits per second
    pub fn bit_rate(&self, format: &NegotiatedFormat) -> u64 {
        let pixels_per_second =
            format.width as u64 * format.height as u64 * format.frame_rate as u64;
        pixels_per_second / self.reference_frame_rate.max(1) as u64 * self.ratio as u64
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoParams {
    pub codec: VideoCodec,
    pub profile: VideoProfile,
    /// H.264 level times ten (3 -> 30)
    pub level: u8,
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
    pub bit_rate: u64,
}

impl VideoParams {
    pub fn from_format(format: NegotiatedFormat, bitrate: &BitratePolicy) -> Self {
        Self {
            codec: VideoCodec::H264,
            profile: VideoProfile::High,
            level: 30,
            width: format.width,
            height: format.height,
            frame_rate: format.frame_rate,
            bit_rate: bitrate.bit_rate(&format),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioParams {
    pub source: AudioSource,
    pub codec: AudioCodec,
    pub channels: u16,
    pub sample_rate: u32,
    pub bit_rate: u32,
}

impl Default for AudioParams {
    fn default() -> Self {
        Self {
            source: AudioSource::Default,
            codec: AudioCodec::HeAac,
            channels: AUDIO_CHANNELS,
            sample_rate: AUDIO_SAMPLE_RATE,
            bit_rate: AUDIO_BIT_RATE,
        }
    }
}

/// Limits enforced by the recorder itself
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordingLimits {
    pub max_duration: Duration,
    pub max_file_size_bytes: u64,
}

impl Default for RecordingLimits {
    fn default() -> Self {
        Self {
            max_duration: MAX_DURATION,
            max_file_size_bytes: MAX_FILE_SIZE_BYTES,
        }
    }
}

/// Everything the encoder/muxer needs for one recording
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecorderSettings {
    pub output_format: OutputFormat,
    pub video: VideoParams,
    pub audio: AudioParams,
    pub limits: RecordingLimits,
    pub output_path: PathBuf,
}
