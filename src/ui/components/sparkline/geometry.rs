//! Value-to-pixel mapping for the sparkline
//!
//! Horizontal placement spreads the samples evenly from the first to the last
//! pixel column. Vertical placement scales `[y_min, y_max]` onto the pixel
//! rows, inverted so larger values plot higher. Values outside the range are
//! clamped onto the nearest edge row, inclusive of the bounds themselves.

extern crate alloc;
use alloc::vec::Vec;

use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, Rectangle};

use super::buffer::ChartBuffer;
use super::{ChartError, ChartResult};

/// One end of the vertical range
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum RangeBound {
    /// Follow the data extreme on every recompute
    #[default]
    Auto,
    /// Pin the bound to a value
    Fixed(f32),
}

impl RangeBound {
    pub fn fixed(&self) -> Option<f32> {
        match self {
            RangeBound::Auto => None,
            RangeBound::Fixed(v) => Some(*v),
        }
    }

    fn resolve(&self, data: f32) -> f32 {
        self.fixed().unwrap_or(data)
    }
}

impl From<Option<f32>> for RangeBound {
    fn from(value: Option<f32>) -> Self {
        value.map_or(RangeBound::Auto, RangeBound::Fixed)
    }
}

/// Check a `y_min`/`y_max` pair before it is stored on a chart
pub fn validate_range(y_min: RangeBound, y_max: RangeBound) -> ChartResult<()> {
    for bound in [y_min, y_max] {
        if let RangeBound::Fixed(v) = bound
            && !v.is_finite()
        {
            return Err(ChartError::NonFiniteBound);
        }
    }

    if let (RangeBound::Fixed(lo), RangeBound::Fixed(hi)) = (y_min, y_max)
        && lo >= hi
    {
        return Err(ChartError::InvertedRange {
            y_min: lo,
            y_max: hi,
        });
    }

    Ok(())
}

/// Pixel rectangle the chart plots into
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    /// Top-left pixel of the chart
    pub origin: Point,
    /// Chart extent in pixels
    pub size: Size,
}

impl PlotArea {
    pub fn new(origin: Point, size: Size) -> ChartResult<Self> {
        if size.width == 0 || size.height == 0 {
            return Err(ChartError::ZeroSize {
                width: size.width,
                height: size.height,
            });
        }

        Ok(Self { origin, size })
    }

    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(self.origin, self.size)
    }

    /// Row all points sit on when the vertical span collapses to zero
    pub fn midline(&self) -> i32 {
        self.origin.y + round_px(self.last_row_offset() / 2.0)
    }

    fn last_row_offset(&self) -> f32 {
        (self.size.height - 1) as f32
    }

    fn last_column_offset(&self) -> f32 {
        (self.size.width - 1) as f32
    }
}

/// Screen-space polyline derived from a [`ChartBuffer`]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotGeometry {
    points: Vec<Point>,
}

impl PlotGeometry {
    /// Compute the polyline for every sample currently in `buffer`.
    ///
    /// `dyn_xpitch` spreads the samples over the current length instead of
    /// the full capacity.
    pub fn compute(
        buffer: &ChartBuffer,
        area: &PlotArea,
        y_min: RangeBound,
        y_max: RangeBound,
        dyn_xpitch: bool,
    ) -> Self {
        let Some((data_lo, data_hi)) = buffer.extent() else {
            return Self::default();
        };

        let lo = y_min.resolve(data_lo);
        let hi = y_max.resolve(data_hi);
        let span = hi - lo;

        let slots = if dyn_xpitch {
            buffer.len()
        } else {
            buffer.capacity()
        };
        let pitch = if slots > 1 {
            area.last_column_offset() / (slots - 1) as f32
        } else {
            0.0
        };

        let points = buffer
            .iter()
            .enumerate()
            .map(|(i, value)| {
                let x = area.origin.x + round_px(i as f32 * pitch);
                let y = if span > 0.0 {
                    let norm = ((value - lo) / span).clamp(0.0, 1.0);
                    area.origin.y + round_px((1.0 - norm) * area.last_row_offset())
                } else {
                    area.midline()
                };
                Point::new(x, y)
            })
            .collect();

        Self { points }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Line segments joining consecutive points
    pub fn segments(&self) -> impl Iterator<Item = Line> + '_ {
        self.points.windows(2).map(|pair| Line::new(pair[0], pair[1]))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Round a non-negative pixel offset to the nearest whole pixel
fn round_px(offset: f32) -> i32 {
    (offset + 0.5) as i32
}
