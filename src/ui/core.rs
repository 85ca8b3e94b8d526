//! Widget trait shared by the monochrome UI elements

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;

/// Trait for any on-screen element of the monitor
///
/// Partial repaints come from the framebuffer's dirty tracking; a widget only
/// says whether it has changed since it was last drawn.
pub trait Widget {
    /// Draw the element into its bounds
    fn draw<D: DrawTarget<Color = BinaryColor>>(&self, display: &mut D) -> Result<(), D::Error>;

    /// Get the bounds of this element
    fn bounds(&self) -> Rectangle;

    /// Check if this element needs to be redrawn
    fn is_dirty(&self) -> bool;

    /// Mark this element as clean (already drawn)
    fn mark_clean(&mut self);

    /// Mark this element as dirty (needs redraw)
    fn mark_dirty(&mut self);
}
