//! Credentials baked in by `build.rs` from the `.env` file

use co2_sparkline::config::{Config, FeedConfig, InternetConfig};

pub const WIFI_SSID: &str = env!("WIFI_SSID");
pub const WIFI_PASSWORD: &str = env!("WIFI_PASSWORD");
pub const AIO_USERNAME: &str = env!("AIO_USERNAME");
pub const AIO_KEY: &str = env!("AIO_KEY");
pub const AIO_FEED: &str = env!("AIO_FEED");

/// Monitor settings with whatever credentials were provided
pub fn config() -> Config<'static> {
    let internet = (!WIFI_SSID.is_empty()).then_some(InternetConfig {
        ssid: WIFI_SSID,
        password: WIFI_PASSWORD,
    });
    let feed = (!AIO_USERNAME.is_empty()).then_some(FeedConfig {
        username: AIO_USERNAME,
        key: AIO_KEY,
        feed: AIO_FEED,
    });

    Config {
        internet,
        feed,
        ..Config::default()
    }
}
