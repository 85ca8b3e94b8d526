//! Constants for sparkline rendering

use embedded_graphics::pixelcolor::BinaryColor;

/// Default stroke width of the plotted line in pixels
pub const DEFAULT_LINE_WIDTH_PX: u32 = 1;

/// Default line color (lit pixels on an OLED)
pub const DEFAULT_LINE_COLOR: BinaryColor = BinaryColor::On;

/// Default background color used when the chart clears its bounds
pub const DEFAULT_BACKGROUND_COLOR: BinaryColor = BinaryColor::Off;

/// Samples are spread over the current length by default, so a partially
/// filled chart still spans the full width.
pub const DEFAULT_DYN_XPITCH: bool = true;
