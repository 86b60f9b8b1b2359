//! Resolution and frame-rate negotiation
//!
//! Finds the largest size and rate the encoder can handle, up to the actual
//! screen size and the requested rate. When the screen fits, the result is
//! the screen size aligned down to the codec granularity; otherwise both
//! dimensions are scaled uniformly until they fit.

use serde::{Deserialize, Serialize};

use super::envelope::EncoderEnvelope;

/// Desired capture size and refresh rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureRequest {
    pub width: u32,
    pub height: u32,
    pub refresh_rate: u32,
}

impl CaptureRequest {
    pub fn new(width: u32, height: u32, refresh_rate: u32) -> Self {
        Self {
            width,
            height,
            refresh_rate,
        }
    }
}

/// Size and frame rate the encoder will actually be configured with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiatedFormat {
    pub width: u32,
    pub height: u32,
    pub frame_rate: u32,
}

/// Round `value` down to a multiple of `alignment`
fn align_down(value: u32, alignment: u32) -> u32 {
    let alignment = alignment.max(1);
    value - value % alignment
}

/// Pick the best supported (width, height, frame rate) for a request
pub fn negotiate(request: CaptureRequest, envelope: &dyn EncoderEnvelope) -> NegotiatedFormat {
    let max_width = envelope.supported_widths().upper;
    let max_height = envelope.supported_heights().upper;
    let width_alignment = envelope.width_alignment();
    let height_alignment = envelope.height_alignment();

    let aligned_width = align_down(request.width, width_alignment);
    let aligned_height = align_down(request.height, height_alignment);

    if aligned_width <= max_width
        && aligned_height <= max_height
        && envelope.is_size_supported(aligned_width, aligned_height)
    {
        let max_rate = envelope
            .supported_frame_rates_for(aligned_width, aligned_height)
            .upper;
        let frame_rate = request.refresh_rate.min(max_rate);

        tracing::debug!(
            "Screen size {}x{} supported at rate {}",
            aligned_width,
            aligned_height,
            frame_rate
        );

        return NegotiatedFormat {
            width: aligned_width,
            height: aligned_height,
            frame_rate,
        };
    }

    // Scale uniformly to the largest size the codec accepts, never upwards
    let scale = (max_width as f64 / request.width as f64)
        .min(max_height as f64 / request.height as f64)
        .min(1.0);

    let scaled_width = align_down((request.width as f64 * scale) as u32, width_alignment);
    let scaled_height = align_down((request.height as f64 * scale) as u32, height_alignment);

    let max_rate = envelope
        .supported_frame_rates_for(scaled_width, scaled_height)
        .upper;
    let frame_rate = request.refresh_rate.min(max_rate);

    tracing::debug!(
        "Resized by {:.4}: {}x{} at rate {}",
        scale,
        scaled_width,
        scaled_height,
        frame_rate
    );

    NegotiatedFormat {
        width: scaled_width,
        height: scaled_height,
        frame_rate,
    }
}
