// src/ui/components/label.rs
//! Single-line text label for the monochrome display

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, ascii::FONT_6X10};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{PrimitiveStyle, Rectangle};
use embedded_graphics::text::{Baseline, Text};

use crate::ui::core::Widget;

/// Maximum number of characters a label holds
pub const LABEL_CAPACITY: usize = 32;

/// Text label anchored at its top-left corner.
///
/// The label clears the rectangle covering [`LABEL_CAPACITY`] characters
/// before drawing, so shorter text fully replaces longer text.
pub struct Label {
    position: Point,
    text: heapless::String<LABEL_CAPACITY>,
    font: &'static MonoFont<'static>,
    color: BinaryColor,
    background: BinaryColor,
    dirty: bool,
}

impl Label {
    /// Create a label; text beyond [`LABEL_CAPACITY`] characters is dropped
    pub fn new(position: Point, text: &str) -> Self {
        let mut label = Self {
            position,
            text: heapless::String::new(),
            font: &FONT_6X10,
            color: BinaryColor::On,
            background: BinaryColor::Off,
            dirty: true,
        };
        label.set_text(text);
        label
    }

    /// Use a different mono font
    pub fn with_font(mut self, font: &'static MonoFont<'static>) -> Self {
        self.font = font;
        self
    }

    /// Swap foreground and background colors
    pub fn with_colors(mut self, color: BinaryColor, background: BinaryColor) -> Self {
        self.color = color;
        self.background = background;
        self
    }

    /// Replace the label text
    pub fn set_text(&mut self, text: &str) {
        self.text.clear();
        for ch in text.chars() {
            if self.text.push(ch).is_err() {
                break;
            }
        }
        self.dirty = true;
    }

    /// Replace the label text with formatted output, truncating on overflow
    pub fn set_fmt(&mut self, args: core::fmt::Arguments<'_>) {
        self.text.clear();
        let _ = self.text.write_fmt(args);
        self.dirty = true;
    }

    pub fn text(&self) -> &str {
        self.text.as_str()
    }
}

impl Widget for Label {
    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error> {
        self.bounds()
            .into_styled(PrimitiveStyle::with_fill(self.background))
            .draw(display)?;

        let style = MonoTextStyle::new(self.font, self.color);
        Text::with_baseline(self.text.as_str(), self.position, style, Baseline::Top)
            .draw(display)?;

        Ok(())
    }

    fn bounds(&self) -> Rectangle {
        let glyph = self.font.character_size;
        let spacing = self.font.character_spacing;
        let width = LABEL_CAPACITY as u32 * (glyph.width + spacing);
        Rectangle::new(self.position, Size::new(width, glyph.height))
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
