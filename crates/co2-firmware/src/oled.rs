//! SSD1306 128x64 OLED as a [`Panel`]

use co2_sparkline::display::Panel;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use log::info;
use ssd1306::mode::BufferedGraphicsModeAsync;
use ssd1306::prelude::*;
use ssd1306::{I2CDisplayInterface, Ssd1306Async};

use crate::hardware::SharedBus;

type Driver = Ssd1306Async<
    I2CInterface<SharedBus>,
    DisplaySize128x64,
    BufferedGraphicsModeAsync<DisplaySize128x64>,
>;

/// Error reported by the SSD1306 driver
pub type OledError = <Driver as DrawTarget>::Error;

pub struct OledPanel {
    driver: Driver,
}

impl OledPanel {
    /// Initialize the panel at the default address 0x3C
    pub async fn new(i2c: SharedBus) -> Result<Self, OledError> {
        let mut driver = Ssd1306Async::new(
            I2CDisplayInterface::new(i2c),
            DisplaySize128x64,
            DisplayRotation::Rotate0,
        )
        .into_buffered_graphics_mode();

        driver.init().await?;
        info!("SSD1306 initialized");
        Ok(Self { driver })
    }
}

impl OriginDimensions for OledPanel {
    fn size(&self) -> Size {
        self.driver.size()
    }
}

impl DrawTarget for OledPanel {
    type Color = BinaryColor;
    type Error = OledError;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.driver.draw_iter(pixels)
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        self.driver.fill_contiguous(area, colors)
    }
}

impl Panel for OledPanel {
    async fn present(&mut self) -> Result<(), OledError> {
        self.driver.flush().await
    }
}
