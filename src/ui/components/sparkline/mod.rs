//! Scrolling line chart (sparkline) for small monochrome displays
//!
//! A sparkline keeps a bounded history of scalar samples. Each new sample is
//! appended on the right; once the chart holds `max_items` samples the oldest
//! one falls off the left edge. After every mutation the whole pixel polyline
//! is recomputed from the history, so the geometry can never drift from the
//! stored samples.
//!
//! # Modules
//!
//! - [`buffer`] - FIFO sample history with fixed capacity
//! - [`geometry`] - value-to-pixel mapping (pitch, range, clamping)
//! - `component` - the [`Sparkline`] widget tying both together
//!
//! # Examples
//!
//! ```ignore
//! use co2_sparkline::ui::components::sparkline::*;
//!
//! let mut chart = Sparkline::new(
//!     SparklineConfig::new(128, 44, 100).with_origin(0, 20),
//! )?;
//!
//! chart.add_value(612.0)?;
//! chart.draw(&mut display)?;
//! ```

use thiserror_no_std::Error;

pub mod buffer;
mod component;
pub mod constants;
pub mod geometry;

pub use buffer::ChartBuffer;
pub use component::{Sparkline, SparklineConfig};
pub use geometry::{PlotArea, PlotGeometry, RangeBound};

/// Error types for sparkline operations
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ChartError {
    /// The chart must hold at least one sample
    #[error("Chart capacity must be at least 1")]
    ZeroCapacity,

    /// Width and height must both be non-zero
    #[error("Chart size must be non-zero (got {width}x{height})")]
    ZeroSize {
        /// Requested width in pixels
        width: u32,
        /// Requested height in pixels
        height: u32,
    },

    /// Both range bounds are fixed but `y_min >= y_max`
    #[error("Invalid vertical range (y_min {y_min} >= y_max {y_max})")]
    InvertedRange {
        /// Requested lower bound
        y_min: f32,
        /// Requested upper bound
        y_max: f32,
    },

    /// A fixed range bound is NaN or infinite
    #[error("Range bound must be finite")]
    NonFiniteBound,

    /// A sample is NaN or infinite
    #[error("Sample value must be finite")]
    NonFiniteSample,
}

/// Result type for sparkline operations
pub type ChartResult<T> = Result<T, ChartError>;
