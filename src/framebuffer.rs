//! RAM framebuffer with per-pixel change detection.
//!
//! Widgets draw into this buffer instead of the panel. When the display is
//! refreshed, only the rectangle containing changed pixels is pushed to the
//! panel.

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;
use core::convert::Infallible;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::debug;

/// Bounding box of pixels that have changed since the last flush.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DirtyRect {
    min_x: usize,
    min_y: usize,
    max_x: usize,
    max_y: usize,
}

impl DirtyRect {
    /// Expand the dirty region to include the given pixel coordinate.
    fn expand(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    /// Create a new dirty rect covering a single pixel.
    fn from_point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn to_rectangle(self) -> Rectangle {
        Rectangle::new(
            Point::new(self.min_x as i32, self.min_y as i32),
            Size::new(
                (self.max_x - self.min_x + 1) as u32,
                (self.max_y - self.min_y + 1) as u32,
            ),
        )
    }
}

/// Monochrome framebuffer implementing `DrawTarget<Color = BinaryColor>`.
///
/// A 128x64 panel costs 8 KiB at one byte per pixel.
pub struct FrameBuffer {
    size: Size,
    pixels: Vec<BinaryColor>,
    dirty: Option<DirtyRect>,
}

impl FrameBuffer {
    /// Allocate a framebuffer of the given size with every pixel off.
    pub fn new(size: Size) -> Self {
        Self {
            size,
            pixels: vec![BinaryColor::Off; size.width as usize * size.height as usize],
            dirty: None,
        }
    }

    /// Read back a pixel, `None` outside the buffer
    pub fn pixel(&self, point: Point) -> Option<BinaryColor> {
        let (x, y) = self.index_of(point)?;
        Some(self.pixels[y * self.size.width as usize + x])
    }

    /// Rectangle of pixels changed since the last flush
    pub fn dirty_area(&self) -> Option<Rectangle> {
        self.dirty.map(DirtyRect::to_rectangle)
    }

    fn index_of(&self, point: Point) -> Option<(usize, usize)> {
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        if point.x >= 0 && point.y >= 0 && (point.x as usize) < w && (point.y as usize) < h {
            Some((point.x as usize, point.y as usize))
        } else {
            None
        }
    }

    /// Write a single pixel, expanding the dirty rect only if the color changed.
    #[inline]
    fn set_pixel(&mut self, x: usize, y: usize, color: BinaryColor) {
        let idx = y * self.size.width as usize + x;
        if self.pixels[idx] != color {
            self.pixels[idx] = color;
            match &mut self.dirty {
                Some(rect) => rect.expand(x, y),
                None => self.dirty = Some(DirtyRect::from_point(x, y)),
            }
        }
    }

    /// Copy the dirty region to `display`, then reset the dirty state.
    ///
    /// Returns the flushed area, or `None` if nothing changed.
    pub fn flush<D>(&mut self, display: &mut D) -> Result<Option<Rectangle>, D::Error>
    where
        D: DrawTarget<Color = BinaryColor>,
    {
        let Some(rect) = self.dirty.take() else {
            return Ok(None);
        };

        let area = rect.to_rectangle();
        debug!(
            "Flushing {}x{} dirty region at ({}, {})",
            area.size.width, area.size.height, rect.min_x, rect.min_y
        );

        let pixels = &self.pixels;
        let stride = self.size.width as usize;
        let width = area.size.width as usize;
        let pixel_iter = (rect.min_y..=rect.max_y).flat_map(move |y| {
            let row_start = y * stride + rect.min_x;
            pixels[row_start..row_start + width].iter().copied()
        });

        display.fill_contiguous(&area, pixel_iter)?;
        Ok(Some(area))
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        self.size
    }
}

impl DrawTarget for FrameBuffer {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            if let Some((x, y)) = self.index_of(coord) {
                self.set_pixel(x, y, color);
            }
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let clipped = area.intersection(&self.bounding_box());
        let Some(bottom_right) = clipped.bottom_right() else {
            return Ok(());
        };

        for y in clipped.top_left.y..=bottom_right.y {
            for x in clipped.top_left.x..=bottom_right.x {
                self.set_pixel(x as usize, y as usize, color);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_graphics::mock_display::MockDisplay;
    use embedded_graphics::primitives::PrimitiveStyle;

    #[test]
    fn test_new_buffer_is_clean() {
        let fb = FrameBuffer::new(Size::new(16, 8));
        assert_eq!(fb.dirty_area(), None);
        assert_eq!(fb.pixel(Point::new(15, 7)), Some(BinaryColor::Off));
        assert_eq!(fb.pixel(Point::new(16, 0)), None);
    }

    #[test]
    fn test_unchanged_pixels_stay_clean() {
        let mut fb = FrameBuffer::new(Size::new(16, 8));
        fb.clear(BinaryColor::Off).unwrap();
        assert_eq!(fb.dirty_area(), None);
    }

    #[test]
    fn test_dirty_area_tracks_changes() {
        let mut fb = FrameBuffer::new(Size::new(32, 32));
        Pixel(Point::new(3, 4), BinaryColor::On).draw(&mut fb).unwrap();
        Pixel(Point::new(10, 2), BinaryColor::On).draw(&mut fb).unwrap();

        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(3, 2), Size::new(8, 3)))
        );
    }

    #[test]
    fn test_fill_solid_clips_to_buffer() {
        let mut fb = FrameBuffer::new(Size::new(8, 8));
        Rectangle::new(Point::new(-4, 6), Size::new(20, 20))
            .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
            .draw(&mut fb)
            .unwrap();

        assert_eq!(fb.pixel(Point::new(0, 7)), Some(BinaryColor::On));
        assert_eq!(fb.pixel(Point::new(0, 5)), Some(BinaryColor::Off));
        assert_eq!(
            fb.dirty_area(),
            Some(Rectangle::new(Point::new(0, 6), Size::new(8, 2)))
        );
    }

    #[test]
    fn test_flush_copies_dirty_region_once() {
        let mut fb = FrameBuffer::new(Size::new(8, 8));
        Pixel(Point::new(2, 2), BinaryColor::On).draw(&mut fb).unwrap();

        let mut display = MockDisplay::<BinaryColor>::new();
        let flushed = fb.flush(&mut display).unwrap();

        assert_eq!(
            flushed,
            Some(Rectangle::new(Point::new(2, 2), Size::new(1, 1)))
        );
        assert_eq!(display.get_pixel(Point::new(2, 2)), Some(BinaryColor::On));
        assert_eq!(fb.flush(&mut display).unwrap(), None);
    }
}
