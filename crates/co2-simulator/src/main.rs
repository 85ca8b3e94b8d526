//! Desktop simulator for the CO2 sparkline monitor.
//!
//! Runs the monitor loop against a synthetic CO2 sensor, or the chart demo,
//! in an SDL2 window via `embedded-graphics-simulator`.
//!
//! ```text
//! co2-simulator          # sensor monitor
//! co2-simulator demo     # triangle wave in a fixed 0..10 chart
//! ```
//!
//! # Key bindings
//!
//! | Key   | Action        |
//! |-------|---------------|
//! | Space | Pause/resume  |
//! | Q     | Quit          |

use std::convert::Infallible;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use co2_sparkline::config::{Config, DEMO_STEP_MS};
use co2_sparkline::demo::{ChartDemo, WaveGenerator};
use co2_sparkline::display::Panel;
use co2_sparkline::monitor::{Monitor, NoUplink, PollOutcome};
use co2_sparkline::sensors::{Co2Sensor, Reading, SensorError};
use co2_sparkline::ui::{DISPLAY_HEIGHT_PX, DISPLAY_WIDTH_PX};
use embassy_futures::block_on;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics_simulator::{
    BinaryColorTheme, OutputSettingsBuilder, SimulatorDisplay, SimulatorEvent, Window,
    sdl2::Keycode,
};
use embedded_hal_async::delay::DelayNs;
use log::{error, info};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Pixel scale factor for the simulator window.
const WINDOW_SCALE: u32 = 4;

/// Target frame duration (~30 FPS).
const FRAME_DURATION: Duration = Duration::from_millis(33);

/// Simulated seconds that pass per mock measurement, so the chart moves.
const SIMULATED_SECS_PER_READING: f64 = 20.0;

// ---------------------------------------------------------------------------
// Simulated hardware
// ---------------------------------------------------------------------------

/// SDL window standing in for the SSD1306.
struct SimPanel {
    display: SimulatorDisplay<BinaryColor>,
    window: Window,
}

impl SimPanel {
    fn new(title: &str) -> Self {
        let display =
            SimulatorDisplay::<BinaryColor>::new(Size::new(DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX));
        let output_settings = OutputSettingsBuilder::new()
            .theme(BinaryColorTheme::OledBlue)
            .scale(WINDOW_SCALE)
            .build();
        let mut window = Window::new(title, &output_settings);

        // The SDL window is lazily initialized on the first `update()` call.
        // We must call `update()` once before `events()` or it will panic.
        window.update(&display);
        Self { display, window }
    }

    /// Drain SDL events. Returns `false` once the user asked to quit.
    fn pump(&mut self, paused: &mut bool) -> bool {
        let events: Vec<SimulatorEvent> = self.window.events().collect();
        for event in events {
            match event {
                SimulatorEvent::Quit => return false,
                SimulatorEvent::KeyDown { keycode, .. } => match keycode {
                    Keycode::Q | Keycode::Escape => return false,
                    Keycode::Space => {
                        *paused = !*paused;
                        info!("{}", if *paused { "Paused" } else { "Resumed" });
                    }
                    _ => {}
                },
                _ => {}
            }
        }
        true
    }
}

impl OriginDimensions for SimPanel {
    fn size(&self) -> Size {
        self.display.size()
    }
}

impl DrawTarget for SimPanel {
    type Color = BinaryColor;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.display.draw_iter(pixels)
    }
}

impl Panel for SimPanel {
    async fn present(&mut self) -> Result<(), Infallible> {
        self.window.update(&self.display);
        Ok(())
    }
}

/// Blocking delay backed by the OS scheduler.
struct StdDelay;

impl DelayNs for StdDelay {
    async fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }
}

/// Generates synthetic CO2 readings that vary over time.
struct MockCo2Sensor {
    /// Seconds counter used as the fake clock.
    elapsed_secs: f64,
    interval: Duration,
    last_read: Instant,
}

impl MockCo2Sensor {
    fn new(interval: Duration) -> Self {
        let phase = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
            % 600;
        Self {
            elapsed_secs: phase as f64,
            interval,
            last_read: Instant::now() - interval,
        }
    }
}

impl Co2Sensor for MockCo2Sensor {
    async fn is_data_ready(&mut self) -> Result<bool, SensorError> {
        Ok(self.last_read.elapsed() >= self.interval)
    }

    async fn read(&mut self) -> Result<Reading, SensorError> {
        self.last_read = Instant::now();
        self.elapsed_secs += SIMULATED_SECS_PER_READING;
        let t = self.elapsed_secs;

        // CO₂: 400–800 ppm with a longer cycle
        let co2 = 600.0 + 200.0 * (t / 300.0).sin() + 30.0 * (t / 41.0).cos();
        // Temperature: 20–26 °C
        let temperature = 23.0 + 3.0 * (t / 120.0).sin();
        // Humidity: 40–60 %
        let humidity = 50.0 + 10.0 * (t / 180.0).sin();

        Ok(Reading {
            co2_ppm: co2 as f32,
            temperature_c: temperature as f32,
            humidity_percent: humidity as f32,
        })
    }
}

// ---------------------------------------------------------------------------
// Modes
// ---------------------------------------------------------------------------

fn run_monitor() {
    let config = Config::default();
    let panel = SimPanel::new("CO2 Monitor");
    let sensor = MockCo2Sensor::new(Duration::from_millis(u64::from(config.poll_interval_ms)));

    let mut monitor: Monitor<_, _, NoUplink, _> =
        match Monitor::new(sensor, panel, StdDelay, &config) {
            Ok(monitor) => monitor,
            Err(e) => {
                error!("Failed to build monitor: {}", e);
                return;
            }
        };

    if let Err(e) = block_on(monitor.startup()) {
        error!("Start-up failed: {}", e);
    }

    let mut paused = false;
    loop {
        let frame_start = Instant::now();
        if !monitor.display_mut().panel_mut().pump(&mut paused) {
            break;
        }

        if !paused {
            match block_on(monitor.poll_once()) {
                Ok(PollOutcome::Updated { reading, .. }) => info!(
                    "{} samples, latest {:.0} ppm",
                    monitor.chart().len(),
                    reading.co2_ppm
                ),
                Ok(PollOutcome::NotReady) => {}
                Err(e) => error!("Poll failed: {}", e),
            }
        }

        if let Some(rest) = FRAME_DURATION.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }
}

fn run_demo() {
    let panel = SimPanel::new("Sparkline Demo");
    let generator = WaveGenerator::default();

    let mut demo = match ChartDemo::new(panel, generator, StdDelay) {
        Ok(demo) => demo,
        Err(e) => {
            error!("Failed to build demo: {}", e);
            return;
        }
    };

    let mut paused = false;
    loop {
        if !demo.display_mut().panel_mut().pump(&mut paused) {
            break;
        }
        if !paused && let Err(e) = block_on(demo.step()) {
            error!("Demo step failed: {}", e);
        }
        std::thread::sleep(Duration::from_millis(u64::from(DEMO_STEP_MS)));
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

fn main() {
    env_logger::init();

    let demo = std::env::args().nth(1).is_some_and(|arg| arg == "demo");
    info!("Starting CO2 sparkline simulator");
    info!(
        "Display: {}×{} (scale {}×)",
        DISPLAY_WIDTH_PX, DISPLAY_HEIGHT_PX, WINDOW_SCALE
    );
    info!("Keys: Space=Pause  Q=Quit");

    if demo {
        run_demo();
    } else {
        run_monitor();
    }

    info!("Simulator exited");
}
