//! Encoder capability envelope
//!
//! Describes the sizes and frame rates a video codec can handle on this
//! device. The platform encoder reports it; the negotiator only reads it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Inclusive integer range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueRange {
    pub lower: u32,
    pub upper: u32,
}

impl ValueRange {
    pub fn new(lower: u32, upper: u32) -> Self {
        Self { lower, upper }
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.lower && value <= self.upper
    }
}

/// Supported size/rate envelope of a video codec
pub trait EncoderEnvelope: Send + Sync {
    /// Supported frame widths in pixels
    fn supported_widths(&self) -> ValueRange;

    /// Supported frame heights in pixels
    fn supported_heights(&self) -> ValueRange;

    /// Width granularity. Zero means no alignment requirement.
    fn width_alignment(&self) -> u32;

    /// Height granularity. Zero means no alignment requirement.
    fn height_alignment(&self) -> u32;

    /// Whether the exact size can be encoded
    fn is_size_supported(&self, width: u32, height: u32) -> bool;

    /// Frame rates achievable at the given size
    fn supported_frame_rates_for(&self, width: u32, height: u32) -> ValueRange;
}

type RateFn = dyn Fn(u32, u32) -> ValueRange + Send + Sync;

/// Envelope built from fixed ranges and a rate lookup
#[derive(Clone)]
pub struct StaticEnvelope {
    widths: ValueRange,
    heights: ValueRange,
    width_alignment: u32,
    height_alignment: u32,
    rates: Arc<RateFn>,
}

impl StaticEnvelope {
    /// Envelope up to `max_width` x `max_height`, with the same frame-rate
    /// range at every size
    pub fn new(
        max_width: u32,
        max_height: u32,
        width_alignment: u32,
        height_alignment: u32,
        rates: ValueRange,
    ) -> Self {
        Self {
            widths: ValueRange::new(0, max_width),
            heights: ValueRange::new(0, max_height),
            width_alignment,
            height_alignment,
            rates: Arc::new(move |_, _| rates),
        }
    }

    /// Replace the rate lookup with a size-dependent one
    pub fn with_rate_fn<F>(mut self, rates: F) -> Self
    where
        F: Fn(u32, u32) -> ValueRange + Send + Sync + 'static,
    {
        self.rates = Arc::new(rates);
        self
    }

    pub fn with_widths(mut self, widths: ValueRange) -> Self {
        self.widths = widths;
        self
    }

    pub fn with_heights(mut self, heights: ValueRange) -> Self {
        self.heights = heights;
        self
    }
}

impl fmt::Debug for StaticEnvelope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticEnvelope")
            .field("widths", &self.widths)
            .field("heights", &self.heights)
            .field("width_alignment", &self.width_alignment)
            .field("height_alignment", &self.height_alignment)
            .finish_non_exhaustive()
    }
}

impl EncoderEnvelope for StaticEnvelope {
    fn supported_widths(&self) -> ValueRange {
        self.widths
    }

    fn supported_heights(&self) -> ValueRange {
        self.heights
    }

    fn width_alignment(&self) -> u32 {
        self.width_alignment
    }

    fn height_alignment(&self) -> u32 {
        self.height_alignment
    }

    fn is_size_supported(&self, width: u32, height: u32) -> bool {
        self.widths.contains(width)
            && self.heights.contains(height)
            && width % self.width_alignment.max(1) == 0
            && height % self.height_alignment.max(1) == 0
    }

    fn supported_frame_rates_for(&self, width: u32, height: u32) -> ValueRange {
        (self.rates)(width, height)
    }
}
