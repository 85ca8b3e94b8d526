//! Monitor and demo loops driven end to end with in-memory hardware

use std::collections::VecDeque;
use std::convert::Infallible;

use co2_sparkline::app_state::{AppError, AppRunState};
use co2_sparkline::config::{ChartConfig, Config};
use co2_sparkline::demo::{ChartDemo, WaveGenerator};
use co2_sparkline::display::Panel;
use co2_sparkline::framebuffer::FrameBuffer;
use co2_sparkline::monitor::{Monitor, NoUplink, PollOutcome};
use co2_sparkline::sensors::{Co2Sensor, Reading, SensorError};
use co2_sparkline::uplink::{FeedKey, UploadError, Uploader};
use embassy_futures::block_on;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_hal_async::delay::DelayNs;

/// Sensor that answers from a script
#[derive(Default)]
struct ScriptedSensor {
    ready: VecDeque<bool>,
    readings: VecDeque<Reading>,
    fail_reads: bool,
}

impl ScriptedSensor {
    fn with_co2(values: &[f32]) -> Self {
        Self {
            ready: values.iter().map(|_| true).collect(),
            readings: values
                .iter()
                .map(|&co2_ppm| Reading {
                    co2_ppm,
                    temperature_c: 21.5,
                    humidity_percent: 40.0,
                })
                .collect(),
            fail_reads: false,
        }
    }
}

impl Co2Sensor for ScriptedSensor {
    async fn is_data_ready(&mut self) -> Result<bool, SensorError> {
        Ok(self.ready.pop_front().unwrap_or(false))
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        if self.fail_reads {
            return Err(SensorError::Crc {
                sensor: "SCD30",
                operation: "read measurement",
            });
        }
        self.readings
            .pop_front()
            .ok_or(SensorError::NotReady { sensor: "SCD30" })
    }
}

/// 128x64 panel mirroring the flushed pixels
struct MemoryPanel {
    frame: FrameBuffer,
    presents: usize,
}

impl MemoryPanel {
    fn new() -> Self {
        Self {
            frame: FrameBuffer::new(Size::new(128, 64)),
            presents: 0,
        }
    }

    fn lit_pixels(&self) -> usize {
        (0..64)
            .flat_map(|y| (0..128).map(move |x| Point::new(x, y)))
            .filter(|&p| self.frame.pixel(p) == Some(BinaryColor::On))
            .count()
    }
}

impl OriginDimensions for MemoryPanel {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for MemoryPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.frame.draw_iter(pixels)
    }
}

impl Panel for MemoryPanel {
    async fn present(&mut self) -> Result<(), Infallible> {
        self.presents += 1;
        Ok(())
    }
}

/// Uploader that records values and can be told to fail
#[derive(Default)]
struct RecordingUploader {
    sent: Vec<(String, f32)>,
    reject: bool,
}

impl Uploader for RecordingUploader {
    async fn upload(&mut self, feed: &FeedKey, value: f32) -> Result<(), UploadError> {
        if self.reject {
            return Err(UploadError::Status(500));
        }
        self.sent.push((feed.to_string(), value));
        Ok(())
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

fn small_chart_config() -> Config<'static> {
    Config {
        chart: ChartConfig {
            max_items: 3,
            ..ChartConfig::default()
        },
        ..Config::default()
    }
}

#[test]
fn test_poll_updates_caption_chart_and_feed() {
    let sensor = ScriptedSensor::with_co2(&[612.4]);
    let mut monitor = Monitor::new(
        sensor,
        MemoryPanel::new(),
        TotalDelay::default(),
        &Config::default(),
    )
    .unwrap()
    .with_uplink(RecordingUploader::default(), FeedKey::default());

    let outcome = block_on(monitor.poll_once()).unwrap();

    assert!(matches!(outcome, PollOutcome::Updated { uploaded: true, .. }));
    assert_eq!(monitor.caption().text(), "CO2: 612 PPM");
    assert_eq!(monitor.chart().values().collect::<Vec<_>>(), vec![612.4]);
    assert_eq!(
        monitor.uploader().map(|u| u.sent.clone()),
        Some(vec![("co2".to_string(), 612.4)])
    );

    // One paint per poll
    let panel = monitor.display().panel();
    assert_eq!(panel.presents, 1);
    assert!(panel.lit_pixels() > 0);
}

#[test]
fn test_not_ready_leaves_everything_alone() {
    let mut monitor: Monitor<_, _, NoUplink, _> = Monitor::new(
        ScriptedSensor::default(),
        MemoryPanel::new(),
        TotalDelay::default(),
        &Config::default(),
    )
    .unwrap();

    assert_eq!(block_on(monitor.poll_once()), Ok(PollOutcome::NotReady));
    assert!(monitor.chart().is_empty());
    assert_eq!(monitor.display().panel().presents, 0);
}

#[test]
fn test_history_keeps_latest_readings() {
    let sensor = ScriptedSensor::with_co2(&[400.0, 500.0, 600.0, 700.0]);
    let mut monitor: Monitor<_, _, NoUplink, _> = Monitor::new(
        sensor,
        MemoryPanel::new(),
        TotalDelay::default(),
        &small_chart_config(),
    )
    .unwrap();

    for _ in 0..4 {
        let outcome = block_on(monitor.poll_once()).unwrap();
        assert!(matches!(outcome, PollOutcome::Updated { uploaded: false, .. }));
    }

    assert_eq!(
        monitor.chart().values().collect::<Vec<_>>(),
        vec![500.0, 600.0, 700.0]
    );
    let xs: Vec<i32> = monitor
        .chart()
        .geometry()
        .points()
        .iter()
        .map(|p| p.x)
        .collect();
    assert_eq!(xs, vec![0, 64, 127]);
}

#[test]
fn test_upload_failure_does_not_stop_the_loop() {
    let sensor = ScriptedSensor::with_co2(&[800.0, 810.0]);
    let uploader = RecordingUploader {
        reject: true,
        ..RecordingUploader::default()
    };
    let mut monitor = Monitor::new(
        sensor,
        MemoryPanel::new(),
        TotalDelay::default(),
        &Config::default(),
    )
    .unwrap()
    .with_uplink(uploader, FeedKey::default());

    let first = block_on(monitor.tick());
    let second = block_on(monitor.tick());

    assert!(matches!(first, Some(PollOutcome::Updated { uploaded: false, .. })));
    assert!(matches!(second, Some(PollOutcome::Updated { uploaded: false, .. })));
    assert_eq!(monitor.chart().len(), 2);
}

#[test]
fn test_sensor_error_skips_iteration() {
    let mut sensor = ScriptedSensor::with_co2(&[450.0, 460.0]);
    sensor.fail_reads = true;
    let mut monitor: Monitor<_, _, NoUplink, _> = Monitor::new(
        sensor,
        MemoryPanel::new(),
        TotalDelay::default(),
        &Config::default(),
    )
    .unwrap();

    assert!(matches!(
        block_on(monitor.poll_once()),
        Err(AppError::Sensor(SensorError::Crc { .. }))
    ));
    assert_eq!(block_on(monitor.tick()), None);
    assert!(monitor.chart().is_empty());
}

#[test]
fn test_startup_shows_splash_then_empty_chart() {
    let mut monitor: Monitor<_, _, NoUplink, _> = Monitor::new(
        ScriptedSensor::default(),
        MemoryPanel::new(),
        TotalDelay::default(),
        &Config::default(),
    )
    .unwrap();

    block_on(monitor.startup()).unwrap();

    let panel = monitor.display().panel();
    assert_eq!(panel.presents, 2);
    assert_eq!(panel.lit_pixels(), 0);
    assert_eq!(monitor.state().run_state(), AppRunState::SensorsRunning);
}

#[test]
fn test_invalid_config_is_rejected() {
    let mut config = Config::default();
    config.chart.max_items = 0;

    let result: Result<Monitor<_, _, NoUplink, _>, _> = Monitor::new(
        ScriptedSensor::default(),
        MemoryPanel::new(),
        TotalDelay::default(),
        &config,
    );
    assert!(matches!(result, Err(AppError::Config(_))));
}

#[test]
fn test_demo_steps_paint_once_each() {
    let mut demo = ChartDemo::new(
        MemoryPanel::new(),
        WaveGenerator::default(),
        TotalDelay::default(),
    )
    .unwrap();

    for _ in 0..45 {
        let value = block_on(demo.step()).unwrap();
        assert!((0.0..=10.0).contains(&value));
    }

    assert_eq!(demo.chart().len(), 40);
    assert_eq!(demo.display().panel().presents, 45);
}
