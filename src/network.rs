//! WiFi association with a retry policy
//!
//! The link driver only needs to know how to attempt one association;
//! [`bring_up`] owns the retry loop so it can be tested without a radio.

use embedded_hal_async::delay::DelayNs;
use log::{info, warn};
use thiserror_no_std::Error;

/// Why a single association attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Access point not found")]
    NotFound,
    #[error("Authentication rejected")]
    AuthFailed,
    #[error("No address assigned")]
    NoAddress,
    #[error("Radio error: {0}")]
    Radio(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NetworkError {
    /// A bounded policy ran out of attempts
    #[error("WiFi association failed after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
}

/// Network credentials
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Credentials<'a> {
    pub ssid: &'a str,
    pub password: &'a str,
}

/// Radio able to join an access point
pub trait WifiLink {
    /// Try once to join `ssid` and obtain an address
    fn associate(
        &mut self,
        ssid: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), LinkError>>;

    fn is_connected(&self) -> bool;
}

/// How often and how patiently to retry association
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// `None` retries forever
    pub max_attempts: Option<u32>,
    /// Pause between attempts
    pub delay_ms: u32,
}

impl RetryPolicy {
    pub const DEFAULT_DELAY_MS: u32 = 1000;

    /// Keep trying until the link comes up
    pub const fn unbounded(delay_ms: u32) -> Self {
        Self {
            max_attempts: None,
            delay_ms,
        }
    }

    /// Give up after `max_attempts` failed attempts
    pub const fn bounded(max_attempts: u32, delay_ms: u32) -> Self {
        Self {
            max_attempts: Some(max_attempts),
            delay_ms,
        }
    }

    fn allows(&self, attempt: u32) -> bool {
        self.max_attempts.is_none_or(|max| attempt <= max)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::unbounded(Self::DEFAULT_DELAY_MS)
    }
}

/// Associate with the access point, retrying per `policy`.
///
/// Returns the number of attempts it took. A link that already reports
/// itself connected is left alone.
pub async fn bring_up<L, D>(
    link: &mut L,
    credentials: Credentials<'_>,
    policy: RetryPolicy,
    delay: &mut D,
) -> Result<u32, NetworkError>
where
    L: WifiLink,
    D: DelayNs,
{
    if link.is_connected() {
        return Ok(0);
    }

    info!("Connecting to AP {}...", credentials.ssid);

    let mut attempt = 1;
    loop {
        match link.associate(credentials.ssid, credentials.password).await {
            Ok(()) => {
                info!("Connected to {} after {} attempt(s)", credentials.ssid, attempt);
                return Ok(attempt);
            }
            Err(e) => warn!("Could not connect to AP, retrying: {}", e),
        }

        if !policy.allows(attempt + 1) {
            return Err(NetworkError::RetriesExhausted { attempts: attempt });
        }
        attempt += 1;
        delay.delay_ms(policy.delay_ms).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;

    /// Link that fails a fixed number of times before joining
    struct FlakyLink {
        failures_left: u32,
        attempts: u32,
        connected: bool,
    }

    impl FlakyLink {
        fn new(failures: u32) -> Self {
            Self {
                failures_left: failures,
                attempts: 0,
                connected: false,
            }
        }
    }

    impl WifiLink for FlakyLink {
        async fn associate(&mut self, ssid: &str, _password: &str) -> Result<(), LinkError> {
            assert_eq!(ssid, "office");
            self.attempts += 1;
            if self.failures_left > 0 {
                self.failures_left -= 1;
                return Err(LinkError::NotFound);
            }
            self.connected = true;
            Ok(())
        }

        fn is_connected(&self) -> bool {
            self.connected
        }
    }

    #[derive(Default)]
    struct TotalDelay {
        ms: u64,
    }

    impl DelayNs for TotalDelay {
        async fn delay_ns(&mut self, ns: u32) {
            self.ms += u64::from(ns) / 1_000_000;
        }

        async fn delay_ms(&mut self, ms: u32) {
            self.ms += u64::from(ms);
        }
    }

    const CREDS: Credentials<'static> = Credentials {
        ssid: "office",
        password: "hunter2",
    };

    #[test]
    fn test_unbounded_retries_until_connected() {
        let mut link = FlakyLink::new(5);
        let mut delay = TotalDelay::default();

        let attempts = block_on(bring_up(&mut link, CREDS, RetryPolicy::unbounded(100), &mut delay));

        assert_eq!(attempts, Ok(6));
        assert!(link.is_connected());
        assert_eq!(delay.ms, 500);
    }

    #[test]
    fn test_bounded_policy_gives_up() {
        let mut link = FlakyLink::new(10);
        let mut delay = TotalDelay::default();

        let result = block_on(bring_up(&mut link, CREDS, RetryPolicy::bounded(3, 50), &mut delay));

        assert_eq!(result, Err(NetworkError::RetriesExhausted { attempts: 3 }));
        assert_eq!(link.attempts, 3);
        assert_eq!(delay.ms, 100);
    }

    #[test]
    fn test_connected_link_is_left_alone() {
        let mut link = FlakyLink::new(0);
        link.connected = true;
        let mut delay = TotalDelay::default();

        assert_eq!(
            block_on(bring_up(&mut link, CREDS, RetryPolicy::bounded(1, 0), &mut delay)),
            Ok(0)
        );
        assert_eq!(link.attempts, 0);
    }
}
