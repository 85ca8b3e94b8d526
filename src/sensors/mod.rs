//! CO2 sensor abstraction and the SCD30 driver

mod scd30;

pub use scd30::{I2C_ADDRESS as SCD30_ADDRESS, Scd30, Scd30Settings};

use thiserror_no_std::Error;

/// One measurement from a CO2 sensor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Reading {
    /// CO2 concentration in parts per million
    pub co2_ppm: f32,
    /// Air temperature in degrees Celsius
    pub temperature_c: f32,
    /// Relative humidity in percent
    pub humidity_percent: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SensorError {
    /// The bus transaction failed
    #[error("{sensor}: bus error during {operation}")]
    Bus {
        sensor: &'static str,
        operation: &'static str,
    },
    /// A received word did not match its checksum
    #[error("{sensor}: CRC mismatch during {operation}")]
    Crc {
        sensor: &'static str,
        operation: &'static str,
    },
    /// A setting was outside the range the sensor accepts
    #[error("{sensor}: invalid argument for {operation}")]
    InvalidArgument {
        sensor: &'static str,
        operation: &'static str,
    },
    /// The sensor refused the command in its current state
    #[error("{sensor}: {operation} not allowed now")]
    NotAllowed {
        sensor: &'static str,
        operation: &'static str,
    },
    /// A read was attempted before a measurement was available
    #[error("{sensor}: no measurement ready")]
    NotReady { sensor: &'static str },
}

/// Sensor that reports CO2, temperature and humidity.
pub trait Co2Sensor {
    /// Whether a fresh measurement can be read
    fn is_data_ready(&mut self) -> impl Future<Output = Result<bool, SensorError>>;

    /// Read the latest measurement
    fn read(&mut self) -> impl Future<Output = Result<Reading, SensorError>>;
}
