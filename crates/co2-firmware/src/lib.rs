//! ESP32-S3 pieces of the CO2 sparkline monitor
//!
//! Everything here touches real peripherals and only builds for the target:
//! the shared I2C bus, the SSD1306 panel, the WiFi link and the TLS uplink.

#![no_std]

extern crate alloc;

pub mod aio;
pub mod hardware;
pub mod oled;
pub mod secrets;
pub mod wifi;
