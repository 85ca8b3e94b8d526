//! Sensor monitor loop
//!
//! Polls a [`Co2Sensor`], shows the latest CO2 value as a caption above a
//! scrolling [`Sparkline`], and optionally appends each value to a cloud
//! feed. All hardware is handed in by the caller; the monitor holds no
//! globals.

use embedded_graphics::prelude::*;
use embedded_hal_async::delay::DelayNs;
use log::{debug, error, info, warn};

use crate::app_state::{AppError, AppRunState, AppState};
use crate::config::Config;
use crate::display::{BufferedDisplay, DisplaySurface, Panel, pause_refresh};
use crate::sensors::{Co2Sensor, Reading};
use crate::ui::splash::draw_splash;
use crate::ui::{Label, Sparkline, Widget};
use crate::uplink::{FeedKey, UploadError, Uploader};

/// Top-left corner of the CO2 caption
pub const CAPTION_POSITION: Point = Point::new(5, 5);

/// Result of one poll
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PollOutcome {
    /// The sensor had no fresh measurement
    NotReady,
    /// The display was updated with a new reading
    Updated {
        reading: Reading,
        /// The value reached the feed; `false` without an uploader
        uploaded: bool,
    },
}

/// Uploader for builds that keep readings local
pub struct NoUplink;

impl Uploader for NoUplink {
    async fn upload(&mut self, _feed: &FeedKey, _value: f32) -> Result<(), UploadError> {
        Ok(())
    }
}

struct Uplink<U> {
    uploader: U,
    feed: FeedKey,
}

/// Sensor polling loop with its display and optional uplink
pub struct Monitor<S, P, U, D>
where
    S: Co2Sensor,
    P: Panel,
    U: Uploader,
    D: DelayNs,
{
    sensor: S,
    display: BufferedDisplay<P>,
    uplink: Option<Uplink<U>>,
    delay: D,
    chart: Sparkline,
    caption: Label,
    state: AppState,
    poll_interval_ms: u32,
    splash_ms: u32,
}

impl<S, P, U, D> Monitor<S, P, U, D>
where
    S: Co2Sensor,
    P: Panel,
    P::Error: core::fmt::Debug,
    U: Uploader,
    D: DelayNs,
{
    /// Build the monitor from validated settings
    pub fn new(sensor: S, panel: P, delay: D, config: &Config<'_>) -> Result<Self, AppError> {
        config.validate()?;

        Ok(Self {
            sensor,
            display: BufferedDisplay::new(panel),
            uplink: None,
            delay,
            chart: Sparkline::new(config.chart.sparkline())?,
            caption: Label::new(CAPTION_POSITION, ""),
            state: AppState::new(),
            poll_interval_ms: config.poll_interval_ms,
            splash_ms: config.splash_ms,
        })
    }

    /// Send every reading to `feed`
    pub fn with_uplink(mut self, uploader: U, feed: FeedKey) -> Self {
        self.uplink = Some(Uplink { uploader, feed });
        self
    }

    pub fn uploader(&self) -> Option<&U> {
        self.uplink.as_ref().map(|uplink| &uplink.uploader)
    }

    pub fn chart(&self) -> &Sparkline {
        &self.chart
    }

    pub fn caption(&self) -> &Label {
        &self.caption
    }

    pub fn display(&self) -> &BufferedDisplay<P> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut BufferedDisplay<P> {
        &mut self.display
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Record the outcome of network bring-up done by the caller
    pub fn set_wifi_connected(&mut self, connected: bool) {
        self.state.transition(if connected {
            AppRunState::WifiConnected
        } else {
            AppRunState::WifiConnecting
        });
    }

    /// Show the splash screen, hold it, then clear to the empty chart
    pub async fn startup(&mut self) -> Result<(), AppError> {
        let Ok(()) = draw_splash(self.display.frame_mut());
        self.display.force_refresh().await.map_err(display_error)?;
        self.delay.delay_ms(self.splash_ms).await;

        self.display.clear();
        self.caption.mark_dirty();
        self.chart.mark_dirty();
        self.display.draw_widget(&mut self.caption);
        self.display.draw_widget(&mut self.chart);
        self.display.force_refresh().await.map_err(display_error)?;

        self.state.transition(AppRunState::SensorsRunning);
        Ok(())
    }

    /// Check the sensor once and, if it has data, update the screen and feed
    pub async fn poll_once(&mut self) -> Result<PollOutcome, AppError> {
        if !self.sensor.is_data_ready().await? {
            return Ok(PollOutcome::NotReady);
        }

        let reading = self.sensor.read().await?;
        info!("CO2: {} PPM", reading.co2_ppm);
        info!("Temp: {} C", reading.temperature_c);
        info!("Humidity: {} %rH", reading.humidity_percent);

        self.caption
            .set_fmt(format_args!("CO2: {:.0} PPM", reading.co2_ppm));

        let mut pause = pause_refresh(&mut self.display);
        self.chart.add_value(reading.co2_ppm)?;

        pause.draw_widget(&mut self.caption);
        pause.draw_widget(&mut self.chart);
        if let Some(area) = pause.surface().frame().dirty_area() {
            debug!(
                "Repainting {}x{} at ({}, {})",
                area.size.width, area.size.height, area.top_left.x, area.top_left.y
            );
        }
        pause.resume().await.map_err(display_error)?;

        let uploaded = match self.uplink.as_mut() {
            Some(uplink) => {
                info!("Sending {} to {} feed...", reading.co2_ppm, uplink.feed);
                match uplink.uploader.upload(&uplink.feed, reading.co2_ppm).await {
                    Ok(()) => {
                        info!("Data sent!");
                        true
                    }
                    Err(e) => {
                        warn!("Upload failed: {}", e);
                        false
                    }
                }
            }
            None => false,
        };

        Ok(PollOutcome::Updated { reading, uploaded })
    }

    /// Poll forever, pausing between iterations
    pub async fn run(&mut self) -> ! {
        loop {
            self.tick().await;
        }
    }

    /// One loop iteration: poll, log failures, then wait
    pub async fn tick(&mut self) -> Option<PollOutcome> {
        let outcome = match self.poll_once().await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!("Poll failed: {}", e);
                None
            }
        };

        if matches!(outcome, Some(PollOutcome::Updated { .. })) {
            info!("Waiting for new data...");
        }
        self.delay.delay_ms(self.poll_interval_ms).await;
        outcome
    }
}

fn display_error<E: core::fmt::Debug>(e: crate::display::DisplayError<E>) -> AppError {
    error!("Display refresh failed: {:?}", e);
    AppError::Display
}
