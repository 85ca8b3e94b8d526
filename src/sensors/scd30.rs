//! Sensirion SCD30 CO2/temperature/humidity sensor
//!
//! Thin wrapper around the `libscd` async driver: framing, checksums and
//! argument ranges live there. This layer maps the driver onto
//! [`Co2Sensor`] and [`SensorError`] and collects the persistent settings.

use embedded_hal_async::delay::DelayNs;
use embedded_hal_async::i2c::I2c;
use libscd::asynchronous::scd30::Scd30 as Scd30Async;
use libscd::error::Error as DriverError;
use log::{debug, error, info};

use super::{Co2Sensor, Reading, SensorError};

pub use libscd::asynchronous::scd30::I2C_ADDRESS;

const SENSOR: &str = "SCD30";

/// Snapshot of the sensor's persistent configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scd30Settings {
    /// Temperature offset in degrees Celsius
    pub temperature_offset_c: f32,
    /// Continuous measurement interval in seconds
    pub measurement_interval_s: u16,
    /// Automatic self-calibration enabled
    pub self_calibration_enabled: bool,
    /// Altitude compensation in metres above sea level
    pub altitude_m: u16,
    /// Firmware `(major, minor)` version
    pub firmware_version: (u8, u8),
}

impl Scd30Settings {
    /// Print every setting at `info`
    pub fn log(&self) {
        info!(
            "SCD30 firmware: {}.{}",
            self.firmware_version.0, self.firmware_version.1
        );
        info!("Temperature offset: {} C", self.temperature_offset_c);
        info!("Measurement interval: {} s", self.measurement_interval_s);
        info!("Self-calibration enabled: {}", self.self_calibration_enabled);
        info!("Altitude: {} meters above sea level", self.altitude_m);
    }
}

pub struct Scd30<I, D> {
    sensor: Scd30Async<I, D>,
}

impl<I: I2c, D: DelayNs> Scd30<I, D> {
    pub fn new(i2c: I, delay: D) -> Self {
        Self {
            sensor: Scd30Async::new(i2c, delay),
        }
    }

    /// Give back the bus
    pub fn release(self) -> I {
        self.sensor.release()
    }

    /// Start continuous measurement, optionally compensating for ambient
    /// pressure in mbar (0 disables compensation).
    pub async fn start_continuous_measurement(
        &mut self,
        ambient_pressure_mbar: u16,
    ) -> Result<(), SensorError> {
        self.sensor
            .start_continuous_measurement(ambient_pressure_mbar)
            .await
            .map_err(|e| driver_error(e, "start measurement"))?;
        info!("SCD30: Continuous measurement started");
        Ok(())
    }

    pub async fn stop_continuous_measurement(&mut self) -> Result<(), SensorError> {
        self.sensor
            .stop_continuous_measurement()
            .await
            .map_err(|e| driver_error(e, "stop measurement"))
    }

    /// Accepted range is 2..=1800 s
    pub async fn set_measurement_interval(&mut self, seconds: u16) -> Result<(), SensorError> {
        self.sensor
            .set_measurement_interval(seconds)
            .await
            .map_err(|e| driver_error(e, "measurement interval"))
    }

    pub async fn set_self_calibration(&mut self, enabled: bool) -> Result<(), SensorError> {
        self.sensor
            .enable_automatic_self_calibration(enabled)
            .await
            .map_err(|e| driver_error(e, "self-calibration"))
    }

    /// Recalibrate against a known CO2 concentration (400..=2000 ppm)
    pub async fn set_forced_recalibration_reference(
        &mut self,
        ppm: u16,
    ) -> Result<(), SensorError> {
        self.sensor
            .set_forced_recalibration_value(ppm)
            .await
            .map_err(|e| driver_error(e, "recalibration reference"))
    }

    /// Offset in °C, stored by the sensor in hundredths
    pub async fn set_temperature_offset(&mut self, offset_c: f32) -> Result<(), SensorError> {
        let hundredths = offset_c * 100.0;
        if !(0.0..=f32::from(u16::MAX)).contains(&hundredths) {
            return Err(SensorError::InvalidArgument {
                sensor: SENSOR,
                operation: "temperature offset",
            });
        }
        self.sensor
            .set_temperature_offset(hundredths as u16)
            .await
            .map_err(|e| driver_error(e, "temperature offset"))
    }

    pub async fn set_altitude(&mut self, metres: u16) -> Result<(), SensorError> {
        self.sensor
            .set_altitude_compensation(metres)
            .await
            .map_err(|e| driver_error(e, "altitude"))
    }

    /// Restart the sensor and wait for it to come back
    pub async fn soft_reset(&mut self) -> Result<(), SensorError> {
        self.sensor
            .soft_reset()
            .await
            .map_err(|e| driver_error(e, "soft reset"))
    }

    /// Read every persistent setting in one go
    pub async fn settings(&mut self) -> Result<Scd30Settings, SensorError> {
        let offset = self
            .sensor
            .get_temperature_offset()
            .await
            .map_err(|e| driver_error(e, "read temperature offset"))?;
        let interval = self
            .sensor
            .get_measurement_interval()
            .await
            .map_err(|e| driver_error(e, "read measurement interval"))?;
        let self_calibration = self
            .sensor
            .get_automatic_self_calibration()
            .await
            .map_err(|e| driver_error(e, "read self-calibration"))?;
        let altitude = self
            .sensor
            .get_altitude_compensation()
            .await
            .map_err(|e| driver_error(e, "read altitude"))?;
        let firmware_version = self
            .sensor
            .read_firmware_version()
            .await
            .map_err(|e| driver_error(e, "read firmware version"))?;

        Ok(Scd30Settings {
            temperature_offset_c: f32::from(offset) / 100.0,
            measurement_interval_s: interval,
            self_calibration_enabled: self_calibration,
            altitude_m: altitude,
            firmware_version,
        })
    }
}

fn driver_error<E: core::fmt::Debug>(e: DriverError<E>, operation: &'static str) -> SensorError {
    error!("SCD30 {} failed: {:?}", operation, e);
    match e {
        DriverError::I2C(_) => SensorError::Bus {
            sensor: SENSOR,
            operation,
        },
        DriverError::CRC => SensorError::Crc {
            sensor: SENSOR,
            operation,
        },
        DriverError::InvalidInput => SensorError::InvalidArgument {
            sensor: SENSOR,
            operation,
        },
        DriverError::NotAllowed => SensorError::NotAllowed {
            sensor: SENSOR,
            operation,
        },
    }
}

impl<I: I2c, D: DelayNs> Co2Sensor for Scd30<I, D> {
    async fn is_data_ready(&mut self) -> Result<bool, SensorError> {
        self.sensor
            .data_ready()
            .await
            .map_err(|e| driver_error(e, "check data ready status"))
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        let measurement = self
            .sensor
            .read_measurement()
            .await
            .map_err(|e| driver_error(e, "read measurement"))?;

        let reading = Reading {
            co2_ppm: f32::from(measurement.co2),
            temperature_c: measurement.temperature,
            humidity_percent: measurement.humidity,
        };
        debug!(
            "SCD30: {} ppm, {} C, {} %",
            reading.co2_ppm, reading.temperature_c, reading.humidity_percent
        );
        Ok(reading)
    }
}
