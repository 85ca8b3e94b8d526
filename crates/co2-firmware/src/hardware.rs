//! I2C bring-up for the sensor and the display

use co2_sparkline::async_i2c_bus::SharedI2c;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::Mutex as AsyncMutex;
use esp_hal::{i2c::master::Config as I2cConfig, time::Rate};
use log::info;
use static_cell::StaticCell;

pub type I2cBus = esp_hal::i2c::master::I2c<'static, esp_hal::Async>;

/// Handle one device holds on the shared bus
pub type SharedBus = SharedI2c<'static, CriticalSectionRawMutex, I2cBus>;

/// Create the I2C peripheral at 400 kHz
pub fn create_i2c_bus(
    i2c0: esp_hal::peripherals::I2C0<'static>,
    sda: esp_hal::peripherals::GPIO12<'static>,
    scl: esp_hal::peripherals::GPIO11<'static>,
) -> Result<I2cBus, esp_hal::i2c::master::ConfigError> {
    let i2c = esp_hal::i2c::master::I2c::new(
        i2c0,
        I2cConfig::default().with_frequency(Rate::from_khz(400)),
    )?
    .with_sda(sda)
    .with_scl(scl)
    .into_async();
    Ok(i2c)
}

/// Put the bus behind a mutex and hand out one handle per device.
///
/// Returns `(sensor, display)`. Call once; a second call panics on the
/// already-initialized static cell.
pub fn share_i2c_bus(i2c: I2cBus) -> (SharedBus, SharedBus) {
    static I2C0_BUS: StaticCell<AsyncMutex<CriticalSectionRawMutex, I2cBus>> = StaticCell::new();
    let bus = I2C0_BUS.init(AsyncMutex::new(i2c));

    info!("I2C bus shared between SCD30 and SSD1306");
    (SharedI2c::new(bus), SharedI2c::new(bus))
}
