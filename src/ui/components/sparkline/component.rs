//! Sparkline widget with embedded-graphics rendering
//!
//! Owns the sample history and the derived polyline. Every mutation
//! recomputes the full geometry and marks the widget dirty; the actual paint
//! happens when the caller draws it onto a display surface.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use log::debug;

use crate::ui::core::Widget;

use super::buffer::ChartBuffer;
use super::constants::{
    DEFAULT_BACKGROUND_COLOR, DEFAULT_DYN_XPITCH, DEFAULT_LINE_COLOR, DEFAULT_LINE_WIDTH_PX,
};
use super::geometry::{PlotArea, PlotGeometry, RangeBound, validate_range};
use super::{ChartError, ChartResult};

/// Construction parameters for a [`Sparkline`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SparklineConfig {
    /// Chart width in pixels
    pub width: u32,
    /// Chart height in pixels
    pub height: u32,
    /// Number of samples kept
    pub max_items: usize,
    /// Lower end of the vertical range
    pub y_min: RangeBound,
    /// Upper end of the vertical range
    pub y_max: RangeBound,
    /// Top-left pixel of the chart
    pub origin: Point,
    /// Spread samples over the current length rather than the capacity
    pub dyn_xpitch: bool,
    /// Line color
    pub line_color: BinaryColor,
    /// Line width in pixels
    pub line_width: u32,
    /// Color the bounds are cleared to before drawing
    pub background: BinaryColor,
}

impl SparklineConfig {
    /// Auto-ranged chart at the origin
    pub const fn new(width: u32, height: u32, max_items: usize) -> Self {
        Self {
            width,
            height,
            max_items,
            y_min: RangeBound::Auto,
            y_max: RangeBound::Auto,
            origin: Point::zero(),
            dyn_xpitch: DEFAULT_DYN_XPITCH,
            line_color: DEFAULT_LINE_COLOR,
            line_width: DEFAULT_LINE_WIDTH_PX,
            background: DEFAULT_BACKGROUND_COLOR,
        }
    }

    /// Set the vertical range
    pub const fn with_range(mut self, y_min: RangeBound, y_max: RangeBound) -> Self {
        self.y_min = y_min;
        self.y_max = y_max;
        self
    }

    /// Set the top-left anchor
    pub const fn with_origin(mut self, x: i32, y: i32) -> Self {
        self.origin = Point::new(x, y);
        self
    }

    /// Choose between dynamic and capacity-based horizontal pitch
    pub const fn with_dyn_xpitch(mut self, dyn_xpitch: bool) -> Self {
        self.dyn_xpitch = dyn_xpitch;
        self
    }

    /// Set line color and width
    pub const fn with_line(mut self, color: BinaryColor, width: u32) -> Self {
        self.line_color = color;
        self.line_width = width;
        self
    }

    /// Set the background color
    pub const fn with_background(mut self, color: BinaryColor) -> Self {
        self.background = color;
        self
    }

    /// Check capacity, size and range without building a chart
    pub fn validate(&self) -> ChartResult<()> {
        if self.max_items == 0 {
            return Err(ChartError::ZeroCapacity);
        }
        PlotArea::new(self.origin, Size::new(self.width, self.height))?;
        validate_range(self.y_min, self.y_max)
    }
}

/// Bounded-history scrolling line chart
pub struct Sparkline {
    buffer: ChartBuffer,
    area: PlotArea,
    y_min: RangeBound,
    y_max: RangeBound,
    dyn_xpitch: bool,
    line_style: PrimitiveStyle<BinaryColor>,
    background: BinaryColor,
    geometry: PlotGeometry,
    /// Dirty flag for rendering optimization
    dirty: bool,
}

impl Sparkline {
    /// Build a chart, rejecting invalid capacity, size or range up front
    pub fn new(config: SparklineConfig) -> ChartResult<Self> {
        let buffer = ChartBuffer::new(config.max_items)?;
        let area = PlotArea::new(config.origin, Size::new(config.width, config.height))?;
        validate_range(config.y_min, config.y_max)?;

        Ok(Self {
            buffer,
            area,
            y_min: config.y_min,
            y_max: config.y_max,
            dyn_xpitch: config.dyn_xpitch,
            line_style: PrimitiveStyle::with_stroke(config.line_color, config.line_width),
            background: config.background,
            geometry: PlotGeometry::default(),
            dirty: true,
        })
    }

    /// Append a sample, evicting the oldest one at capacity, and recompute
    /// the polyline.
    pub fn add_value(&mut self, value: f32) -> ChartResult<()> {
        if !value.is_finite() {
            return Err(ChartError::NonFiniteSample);
        }

        if let Some(evicted) = self.buffer.push(value) {
            debug!("Sparkline evicted {}", evicted);
        }

        self.update();
        Ok(())
    }

    /// Recompute the polyline from the current samples without changing them
    pub fn update(&mut self) {
        self.geometry = PlotGeometry::compute(
            &self.buffer,
            &self.area,
            self.y_min,
            self.y_max,
            self.dyn_xpitch,
        );
        self.dirty = true;
    }

    /// Replace the vertical range and recompute
    pub fn set_range(&mut self, y_min: RangeBound, y_max: RangeBound) -> ChartResult<()> {
        validate_range(y_min, y_max)?;
        self.y_min = y_min;
        self.y_max = y_max;
        self.update();
        Ok(())
    }

    /// Drop every sample
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.update();
    }

    /// Samples from oldest to newest
    pub fn values(&self) -> impl ExactSizeIterator<Item = f32> + '_ {
        self.buffer.iter()
    }

    /// Most recent sample
    pub fn last(&self) -> Option<f32> {
        self.buffer.last()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Maximum number of samples kept
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Current vertical range setting
    pub fn range(&self) -> (RangeBound, RangeBound) {
        (self.y_min, self.y_max)
    }

    /// Polyline for the current samples
    pub fn geometry(&self) -> &PlotGeometry {
        &self.geometry
    }
}

impl Widget for Sparkline {
    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.area
            .bounds()
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(display)?;

        match self.geometry.points() {
            [] => {}
            [only] => Pixel(*only, self.line_style.stroke_color.unwrap_or(BinaryColor::On))
                .draw(display)?,
            _ => {
                for segment in self.geometry.segments() {
                    segment.into_styled(self.line_style).draw(display)?;
                }
            }
        }

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        self.area.bounds()
    }

    fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn mark_clean(&mut self) {
        self.dirty = false;
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_graphics::mock_display::MockDisplay;

    fn fixed(lo: f32, hi: f32) -> (RangeBound, RangeBound) {
        (RangeBound::Fixed(lo), RangeBound::Fixed(hi))
    }

    #[test]
    fn test_zero_capacity_is_configuration_error() {
        let result = Sparkline::new(SparklineConfig::new(128, 64, 0));
        assert_eq!(result.err(), Some(ChartError::ZeroCapacity));
    }

    #[test]
    fn test_inverted_range_is_configuration_error() {
        let (lo, hi) = fixed(10.0, 0.0);
        let result = Sparkline::new(SparklineConfig::new(128, 64, 10).with_range(lo, hi));
        assert!(matches!(result, Err(ChartError::InvertedRange { .. })));
    }

    #[test]
    fn test_non_finite_sample_rejected_without_mutation() {
        let mut chart = Sparkline::new(SparklineConfig::new(128, 64, 4)).unwrap();
        chart.add_value(1.0).unwrap();

        assert_eq!(chart.add_value(f32::NAN), Err(ChartError::NonFiniteSample));
        assert_eq!(
            chart.add_value(f32::INFINITY),
            Err(ChartError::NonFiniteSample)
        );
        assert_eq!(chart.values().collect::<Vec<_>>(), [1.0]);
    }

    #[test]
    fn test_overflow_keeps_last_max_items() {
        let mut chart = Sparkline::new(SparklineConfig::new(64, 32, 5)).unwrap();
        for v in 0..23 {
            chart.add_value(v as f32).unwrap();
        }

        assert_eq!(
            chart.values().collect::<Vec<_>>(),
            [18.0, 19.0, 20.0, 21.0, 22.0]
        );
        assert_eq!(chart.geometry().len(), 5);
    }

    #[test]
    fn test_single_item_chart_replaces_value() {
        let mut chart = Sparkline::new(SparklineConfig::new(16, 16, 1)).unwrap();
        chart.add_value(3.0).unwrap();
        chart.add_value(8.0).unwrap();

        assert_eq!(chart.values().collect::<Vec<_>>(), [8.0]);
    }

    #[test]
    fn test_update_is_idempotent() {
        let mut chart = Sparkline::new(SparklineConfig::new(128, 44, 10)).unwrap();
        for v in [400.0, 420.0, 415.0, 460.0] {
            chart.add_value(v).unwrap();
        }

        chart.update();
        let first = chart.geometry().clone();
        chart.update();

        assert_eq!(&first, chart.geometry());
    }

    #[test]
    fn test_scenario_three_items_fixed_range() {
        let (lo, hi) = fixed(0.0, 10.0);
        let mut chart =
            Sparkline::new(SparklineConfig::new(128, 64, 3).with_range(lo, hi)).unwrap();
        for v in [1.0, 2.0, 3.0, 4.0] {
            chart.add_value(v).unwrap();
        }

        assert_eq!(chart.values().collect::<Vec<_>>(), [2.0, 3.0, 4.0]);

        let xs: Vec<i32> = chart.geometry().points().iter().map(|p| p.x).collect();
        assert_eq!(xs, [0, 64, 127]);
    }

    #[test]
    fn test_fixed_range_clips_to_top() {
        let (lo, hi) = fixed(0.0, 10.0);
        let mut chart =
            Sparkline::new(SparklineConfig::new(128, 64, 4).with_range(lo, hi)).unwrap();
        chart.add_value(10.0).unwrap();
        chart.add_value(15.0).unwrap();

        let points = chart.geometry().points();
        assert_eq!(points[0].y, points[1].y);
        assert_eq!(points[1].y, 0);
    }

    #[test]
    fn test_set_range_validates_and_recomputes() {
        let mut chart = Sparkline::new(SparklineConfig::new(10, 11, 2)).unwrap();
        chart.add_value(5.0).unwrap();
        chart.add_value(10.0).unwrap();
        assert_eq!(chart.geometry().points()[0].y, 10);

        let (lo, hi) = fixed(0.0, 10.0);
        chart.set_range(lo, hi).unwrap();
        assert_eq!(chart.geometry().points()[0].y, 5);

        let (lo, hi) = fixed(3.0, 1.0);
        assert!(chart.set_range(lo, hi).is_err());
        assert_eq!(chart.range(), fixed(0.0, 10.0));
    }

    #[test]
    fn test_add_value_marks_dirty() {
        let mut chart = Sparkline::new(SparklineConfig::new(16, 16, 4)).unwrap();
        chart.mark_clean();
        chart.add_value(1.0).unwrap();

        assert!(chart.is_dirty());
    }

    #[test]
    fn test_draws_segments_inside_bounds() {
        let (lo, hi) = fixed(0.0, 7.0);
        let mut chart =
            Sparkline::new(SparklineConfig::new(8, 8, 8).with_range(lo, hi)).unwrap();
        for v in 0..8 {
            chart.add_value(v as f32).unwrap();
        }

        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_overdraw(true);
        chart.draw(&mut display).unwrap();

        // A rising diagonal from bottom-left to top-right.
        for i in 0..8 {
            assert_eq!(display.get_pixel(Point::new(i, 7 - i)), Some(BinaryColor::On));
        }
        assert_eq!(display.get_pixel(Point::new(0, 0)), Some(BinaryColor::Off));
    }

    #[test]
    fn test_single_sample_draws_dot() {
        let mut chart = Sparkline::new(SparklineConfig::new(4, 5, 3)).unwrap();
        chart.add_value(2.0).unwrap();

        let mut display = MockDisplay::<BinaryColor>::new();
        display.set_allow_overdraw(true);
        chart.draw(&mut display).unwrap();

        assert_eq!(display.get_pixel(Point::new(0, 2)), Some(BinaryColor::On));
        assert_eq!(display.get_pixel(Point::new(1, 2)), Some(BinaryColor::Off));
    }
}
