//! Display surface with an auto-refresh switch
//!
//! Widgets are drawn into a [`FrameBuffer`]. While auto-refresh is on, every
//! [`DisplaySurface::refresh`] pushes the changed pixels to the panel. While it
//! is off, changes pile up in RAM and nothing reaches the glass, which lets a
//! caller batch a chart update into a single paint with [`pause_refresh`].

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use log::debug;
use thiserror_no_std::Error;

use crate::framebuffer::FrameBuffer;
use crate::ui::core::Widget;

/// Physical panel the framebuffer is copied to.
///
/// Drawing may be buffered by the driver; `present` makes it visible.
pub trait Panel: DrawTarget<Color = BinaryColor> {
    /// Push everything drawn so far to the glass
    fn present(&mut self) -> impl Future<Output = Result<(), Self::Error>>;
}

/// Error types for display operations
#[derive(Debug, Error)]
pub enum DisplayError<E> {
    /// The panel driver failed
    #[error("Panel error: {0:?}")]
    Panel(E),
}

/// Something widgets can be painted onto, with batched refresh
pub trait DisplaySurface {
    /// Error reported by the underlying panel
    type Error: core::fmt::Debug;

    /// Enable or disable pushing changes to the panel on refresh
    fn set_auto_refresh(&mut self, enabled: bool);

    fn auto_refresh(&self) -> bool;

    /// Draw a widget if it is dirty, then mark it clean
    fn draw_widget<W: Widget>(&mut self, widget: &mut W);

    /// Clear the whole surface
    fn clear(&mut self);

    /// Push pending changes to the panel when auto-refresh is on
    fn refresh(&mut self) -> impl Future<Output = Result<(), DisplayError<Self::Error>>>;
}

/// [`DisplaySurface`] backed by a RAM framebuffer in front of a [`Panel`]
pub struct BufferedDisplay<P: Panel> {
    panel: P,
    frame: FrameBuffer,
    auto_refresh: bool,
}

impl<P: Panel> BufferedDisplay<P> {
    /// Wrap a panel; auto-refresh starts enabled
    pub fn new(panel: P) -> Self {
        let size = panel.bounding_box().size;
        Self {
            panel,
            frame: FrameBuffer::new(size),
            auto_refresh: true,
        }
    }

    /// Direct access to the framebuffer for custom drawing
    pub fn frame_mut(&mut self) -> &mut FrameBuffer {
        &mut self.frame
    }

    pub fn frame(&self) -> &FrameBuffer {
        &self.frame
    }

    pub fn panel(&self) -> &P {
        &self.panel
    }

    pub fn panel_mut(&mut self) -> &mut P {
        &mut self.panel
    }

    /// Push pending changes regardless of the auto-refresh setting
    pub async fn force_refresh(&mut self) -> Result<(), DisplayError<P::Error>> {
        let flushed = self
            .frame
            .flush(&mut self.panel)
            .map_err(DisplayError::Panel)?;

        if let Some(area) = flushed {
            debug!("Presenting {}x{} region", area.size.width, area.size.height);
            self.panel.present().await.map_err(DisplayError::Panel)?;
        }
        Ok(())
    }
}

impl<P: Panel> DisplaySurface for BufferedDisplay<P>
where
    P::Error: core::fmt::Debug,
{
    type Error = P::Error;

    fn set_auto_refresh(&mut self, enabled: bool) {
        self.auto_refresh = enabled;
    }

    fn auto_refresh(&self) -> bool {
        self.auto_refresh
    }

    fn draw_widget<W: Widget>(&mut self, widget: &mut W) {
        if widget.is_dirty() {
            let Ok(()) = widget.draw(&mut self.frame);
            widget.mark_clean();
        }
    }

    fn clear(&mut self) {
        let Ok(()) = self.frame.clear(BinaryColor::Off);
    }

    async fn refresh(&mut self) -> Result<(), DisplayError<P::Error>> {
        if !self.auto_refresh {
            return Ok(());
        }
        self.force_refresh().await
    }
}

/// Scoped "begin update / end update" bracket around a batch of drawing.
///
/// Created by [`pause_refresh`], which turns auto-refresh off. Call
/// [`RefreshPause::resume`] to turn it back on and paint once. Dropping the
/// pause without resuming re-enables auto-refresh without painting.
pub struct RefreshPause<'a, S: DisplaySurface> {
    surface: &'a mut S,
    was_enabled: bool,
    resumed: bool,
}

/// Disable auto-refresh until the returned bracket is resumed or dropped
pub fn pause_refresh<S: DisplaySurface>(surface: &mut S) -> RefreshPause<'_, S> {
    let was_enabled = surface.auto_refresh();
    surface.set_auto_refresh(false);
    RefreshPause {
        surface,
        was_enabled,
        resumed: false,
    }
}

impl<S: DisplaySurface> RefreshPause<'_, S> {
    /// Surface being updated
    pub fn surface(&mut self) -> &mut S {
        self.surface
    }

    /// Draw a widget into the paused surface
    pub fn draw_widget<W: Widget>(&mut self, widget: &mut W) {
        self.surface.draw_widget(widget);
    }

    /// Restore the previous auto-refresh setting and paint the batch
    pub async fn resume(mut self) -> Result<(), DisplayError<S::Error>> {
        self.resumed = true;
        self.surface.set_auto_refresh(self.was_enabled);
        self.surface.refresh().await
    }
}

impl<S: DisplaySurface> Drop for RefreshPause<'_, S> {
    fn drop(&mut self) {
        if !self.resumed {
            self.surface.set_auto_refresh(self.was_enabled);
        }
    }
}
