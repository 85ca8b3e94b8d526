//! Cloud feed uplink
//!
//! The monitor hands each CO2 reading to an [`Uploader`]. Failures are
//! reported to the caller, which logs them and carries on; nothing here
//! retries.

mod adafruit_io;

pub use adafruit_io::{AIO_HOST, AIO_PORT, AdafruitIoRequest, read_status};

use core::fmt;
use core::str::FromStr;

use thiserror_no_std::Error;

/// Longest feed key accepted
pub const FEED_KEY_CAPACITY: usize = 32;

/// Feed CO2 values are posted to unless configured otherwise
pub const DEFAULT_FEED_KEY: &str = "co2";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UploadError {
    /// Feed key is empty, too long, or contains characters other than
    /// lowercase letters, digits and `-`
    #[error("Invalid feed key")]
    InvalidFeedKey,
    /// Opening or using the connection failed
    #[error("Connection error: {0}")]
    Connection(&'static str),
    /// The response could not be parsed as HTTP
    #[error("Malformed response")]
    MalformedResponse,
    /// The service answered with a non-success status
    #[error("Upload rejected with HTTP status {0}")]
    Status(u16),
    /// The value cannot be represented in a feed
    #[error("Value must be finite")]
    NonFiniteValue,
    /// The formatted value did not fit the request body
    #[error("Value too long for request body")]
    ValueTooLong,
}

/// Validated key of a cloud feed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedKey(heapless::String<FEED_KEY_CAPACITY>);

impl FeedKey {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl FromStr for FeedKey {
    type Err = UploadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let valid_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
        if s.is_empty() || !s.chars().all(valid_char) {
            return Err(UploadError::InvalidFeedKey);
        }

        heapless::String::try_from(s)
            .map(FeedKey)
            .map_err(|_| UploadError::InvalidFeedKey)
    }
}

impl TryFrom<&str> for FeedKey {
    type Error = UploadError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl Default for FeedKey {
    fn default() -> Self {
        let mut key = heapless::String::new();
        let _ = key.push_str(DEFAULT_FEED_KEY);
        FeedKey(key)
    }
}

impl fmt::Display for FeedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Appends values to a named cloud feed
pub trait Uploader {
    fn upload(
        &mut self,
        feed: &FeedKey,
        value: f32,
    ) -> impl Future<Output = Result<(), UploadError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_key_validation() {
        assert_eq!("co2".parse::<FeedKey>().unwrap().as_str(), "co2");
        assert_eq!("office-co2".parse::<FeedKey>().unwrap().as_str(), "office-co2");
        assert_eq!("".parse::<FeedKey>(), Err(UploadError::InvalidFeedKey));
        assert_eq!("CO2".parse::<FeedKey>(), Err(UploadError::InvalidFeedKey));
        assert_eq!("co2/../x".parse::<FeedKey>(), Err(UploadError::InvalidFeedKey));
        assert_eq!(
            "a".repeat(FEED_KEY_CAPACITY + 1).parse::<FeedKey>(),
            Err(UploadError::InvalidFeedKey)
        );
    }

    #[test]
    fn test_default_feed_key() {
        assert_eq!(FeedKey::default().to_string(), DEFAULT_FEED_KEY);
    }
}
