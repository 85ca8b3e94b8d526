//! CO2 sparkline monitor core
//!
//! Hardware-independent pieces shared by the ESP32-S3 firmware and the
//! desktop simulator: the scrolling chart and caption widgets, the buffered
//! display surface, the SCD30 driver, the Adafruit IO uplink, WiFi bring-up
//! and the monitor and demo loops.

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod app_state;
pub mod async_i2c_bus;
pub mod config;
pub mod demo;
pub mod display;
pub mod framebuffer;
pub mod monitor;
pub mod network;
pub mod sensors;
pub mod ui;
pub mod uplink;
