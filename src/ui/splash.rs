//! Start-up splash screen
//!
//! A lit frame around a dark panel with a one-line greeting, shown while the
//! sensor spins up.

use embedded_graphics::mono_font::{MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use super::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};

/// Greeting shown in the middle of the splash
pub const SPLASH_TEXT: &str = "CO2 monitor start";

/// Dark panel inside the lit frame
const INNER_PANEL: Rectangle = Rectangle::new(Point::new(5, 4), Size::new(118, 48));

/// Left edge and vertical centre of the greeting
const TEXT_POSITION: Point = Point::new(20, 30);

/// Draw the splash screen over the whole display
pub fn draw_splash<D>(display: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = BinaryColor>,
{
    Rectangle::new(Point::zero(), Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX))
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display)?;

    INNER_PANEL
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(display)?;

    Text::with_baseline(
        SPLASH_TEXT,
        TEXT_POSITION,
        MonoTextStyle::new(&FONT_6X10, BinaryColor::On),
        Baseline::Middle,
    )
    .draw(display)?;

    Ok(())
}
