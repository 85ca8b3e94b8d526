//! Application-wide run state and error types

use log::info;
use thiserror_no_std::Error;

use crate::config::ConfigError;
use crate::network::NetworkError;
use crate::sensors::SensorError;
use crate::ui::ChartError;
use crate::uplink::UploadError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppRunState {
    #[default]
    Uninitialized,
    WifiConnecting,
    WifiConnected,
    SensorsRunning,
    Error,
}

impl AppRunState {
    /// Whether the loop may poll the sensor
    pub fn is_running(&self) -> bool {
        matches!(self, AppRunState::SensorsRunning)
    }
}

/// Run state plus the connection flag the uplink depends on
#[derive(Debug, Clone, Copy, Default)]
pub struct AppState {
    run_state: AppRunState,
    wifi_connected: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn run_state(&self) -> AppRunState {
        self.run_state
    }

    pub fn wifi_connected(&self) -> bool {
        self.wifi_connected
    }

    /// Move to `next`, logging the transition
    pub fn transition(&mut self, next: AppRunState) {
        if self.run_state != next {
            info!("State: {:?} -> {:?}", self.run_state, next);
        }
        match next {
            AppRunState::WifiConnected => self.wifi_connected = true,
            AppRunState::WifiConnecting | AppRunState::Uninitialized => {
                self.wifi_connected = false
            }
            _ => {}
        }
        self.run_state = next;
    }
}

#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(ConfigError),
    #[error("WiFi connection failed: {0}")]
    Wifi(NetworkError),
    #[error("Sensor error: {0}")]
    Sensor(SensorError),
    #[error("Chart error: {0}")]
    Chart(ChartError),
    #[error("Upload error: {0}")]
    Upload(UploadError),
    #[error("Display error")]
    Display,
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<NetworkError> for AppError {
    fn from(e: NetworkError) -> Self {
        AppError::Wifi(e)
    }
}

impl From<SensorError> for AppError {
    fn from(e: SensorError) -> Self {
        AppError::Sensor(e)
    }
}

impl From<ChartError> for AppError {
    fn from(e: ChartError) -> Self {
        AppError::Chart(e)
    }
}

impl From<UploadError> for AppError {
    fn from(e: UploadError) -> Self {
        AppError::Upload(e)
    }
}
