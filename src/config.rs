//! Runtime configuration
//!
//! Borrowed, serde-friendly settings for both programs. Strings point into
//! whatever buffer the config was deserialized from (or into `env!`
//! constants in the firmware).

use serde::{Deserialize, Serialize};
use thiserror_no_std::Error;

use crate::ui::{ChartError, RangeBound, SparklineConfig};
use crate::uplink::{DEFAULT_FEED_KEY, FeedKey, UploadError};

/// Sensor polling cadence
pub const DEFAULT_POLL_INTERVAL_MS: u32 = 2000;

/// How long the start-up screen stays up
pub const DEFAULT_SPLASH_MS: u32 = 2000;

/// Pause between demo samples
pub const DEMO_STEP_MS: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ConfigError {
    #[error("Chart: {0}")]
    Chart(ChartError),
    #[error("Feed: {0}")]
    Feed(UploadError),
    #[error("Poll interval must be non-zero")]
    ZeroPollInterval,
    #[error("SSID must not be empty")]
    EmptySsid,
}

impl From<ChartError> for ConfigError {
    fn from(e: ChartError) -> Self {
        ConfigError::Chart(e)
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(bound(deserialize = "'de: 'a"))]
pub struct Config<'a> {
    /// `None` runs without WiFi or uploads
    pub internet: Option<InternetConfig<'a>>,
    /// `None` keeps readings local
    pub feed: Option<FeedConfig<'a>>,
    pub chart: ChartConfig,
    pub poll_interval_ms: u32,
    pub splash_ms: u32,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InternetConfig<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

/// Adafruit IO account and target feed
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig<'a> {
    pub username: &'a str,
    pub key: &'a str,
    pub feed: &'a str,
}

impl FeedConfig<'_> {
    pub fn feed_key(&self) -> Result<FeedKey, UploadError> {
        self.feed.parse()
    }
}

/// Chart placement and range, in plain serializable form
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct ChartConfig {
    pub width: u32,
    pub height: u32,
    pub max_items: usize,
    /// `None` follows the data
    pub y_min: Option<f32>,
    pub y_max: Option<f32>,
    pub x: i32,
    pub y: i32,
    pub dyn_xpitch: bool,
}

impl ChartConfig {
    /// Full-screen demo chart: 40 samples between 0 and 10
    pub const fn demo() -> Self {
        Self {
            width: 128,
            height: 64,
            max_items: 40,
            y_min: Some(0.0),
            y_max: Some(10.0),
            x: 0,
            y: 0,
            dyn_xpitch: true,
        }
    }

    pub fn sparkline(&self) -> SparklineConfig {
        SparklineConfig::new(self.width, self.height, self.max_items)
            .with_range(RangeBound::from(self.y_min), RangeBound::from(self.y_max))
            .with_origin(self.x, self.y)
            .with_dyn_xpitch(self.dyn_xpitch)
    }
}

/// Auto-ranged chart below a 20 px caption strip
impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 128,
            height: 44,
            max_items: 100,
            y_min: None,
            y_max: None,
            x: 0,
            y: 20,
            dyn_xpitch: true,
        }
    }
}

impl Default for Config<'_> {
    fn default() -> Self {
        Self {
            internet: None,
            feed: None,
            chart: ChartConfig::default(),
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            splash_ms: DEFAULT_SPLASH_MS,
        }
    }
}

impl<'a> Config<'a> {
    /// Settings for the chart demo
    pub fn demo() -> Self {
        Self {
            chart: ChartConfig::demo(),
            poll_interval_ms: DEMO_STEP_MS,
            splash_ms: 0,
            ..Self::default()
        }
    }

    /// Check everything that would otherwise fail later at construction
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.poll_interval_ms == 0 {
            return Err(ConfigError::ZeroPollInterval);
        }
        if let Some(internet) = &self.internet
            && internet.ssid.is_empty()
        {
            return Err(ConfigError::EmptySsid);
        }
        if let Some(feed) = &self.feed {
            feed.feed_key().map_err(ConfigError::Feed)?;
        }

        self.chart.sparkline().validate()?;
        Ok(())
    }

    /// Feed credentials with the default feed key filled in
    pub fn with_feed(mut self, username: &'a str, key: &'a str) -> Self {
        self.feed = Some(FeedConfig {
            username,
            key,
            feed: DEFAULT_FEED_KEY,
        });
        self
    }
}
