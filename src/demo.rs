//! Chart demo: synthetic samples scrolling across the whole screen

use embedded_hal_async::delay::DelayNs;
use log::{error, info};

use crate::app_state::AppError;
use crate::config::{ChartConfig, DEMO_STEP_MS};
use crate::display::{BufferedDisplay, Panel, pause_refresh};
use crate::ui::Sparkline;

/// Source of demo samples
pub trait SampleGenerator {
    fn next_sample(&mut self) -> f32;
}

/// Triangle wave sweeping between `low` and `high`
#[derive(Debug, Clone, Copy)]
pub struct WaveGenerator {
    low: f32,
    high: f32,
    step: f32,
    value: f32,
    rising: bool,
}

impl WaveGenerator {
    pub fn new(low: f32, high: f32, step: f32) -> Self {
        Self {
            low,
            high,
            step: step.abs(),
            value: low,
            rising: true,
        }
    }
}

impl Default for WaveGenerator {
    fn default() -> Self {
        Self::new(0.0, 10.0, 0.5)
    }
}

impl SampleGenerator for WaveGenerator {
    fn next_sample(&mut self) -> f32 {
        let current = self.value;
        let next = if self.rising {
            current + self.step
        } else {
            current - self.step
        };

        if next >= self.high {
            self.value = self.high;
            self.rising = false;
        } else if next <= self.low {
            self.value = self.low;
            self.rising = true;
        } else {
            self.value = next;
        }
        current
    }
}

/// Uniform samples in `[low, high)` from a xorshift32 sequence
#[derive(Debug, Clone, Copy)]
pub struct RandomGenerator {
    low: f32,
    high: f32,
    state: u32,
}

impl RandomGenerator {
    /// A zero seed is replaced, xorshift would stay at zero forever
    pub fn new(low: f32, high: f32, seed: u32) -> Self {
        Self {
            low,
            high,
            state: if seed == 0 { 0x9E37_79B9 } else { seed },
        }
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl SampleGenerator for RandomGenerator {
    fn next_sample(&mut self) -> f32 {
        // 24 bits fit an f32 mantissa exactly
        let unit = (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32;
        self.low + unit * (self.high - self.low)
    }
}

/// Full-screen chart fed from a [`SampleGenerator`]
pub struct ChartDemo<P, G, D>
where
    P: Panel,
    G: SampleGenerator,
    D: DelayNs,
{
    display: BufferedDisplay<P>,
    generator: G,
    delay: D,
    chart: Sparkline,
    step_ms: u32,
}

impl<P, G, D> ChartDemo<P, G, D>
where
    P: Panel,
    P::Error: core::fmt::Debug,
    G: SampleGenerator,
    D: DelayNs,
{
    /// 40 samples with a fixed 0..10 range over the whole panel
    pub fn new(panel: P, generator: G, delay: D) -> Result<Self, AppError> {
        Self::with_chart(panel, generator, delay, ChartConfig::demo())
    }

    pub fn with_chart(
        panel: P,
        generator: G,
        delay: D,
        chart: ChartConfig,
    ) -> Result<Self, AppError> {
        Ok(Self {
            display: BufferedDisplay::new(panel),
            generator,
            delay,
            chart: Sparkline::new(chart.sparkline())?,
            step_ms: DEMO_STEP_MS,
        })
    }

    pub fn chart(&self) -> &Sparkline {
        &self.chart
    }

    pub fn display(&self) -> &BufferedDisplay<P> {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut BufferedDisplay<P> {
        &mut self.display
    }

    /// Add one generated sample and paint it in a single refresh
    pub async fn step(&mut self) -> Result<f32, AppError> {
        let value = self.generator.next_sample();

        let mut pause = pause_refresh(&mut self.display);
        self.chart.add_value(value)?;
        pause.draw_widget(&mut self.chart);
        pause.resume().await.map_err(|e| {
            error!("Display refresh failed: {:?}", e);
            AppError::Display
        })?;

        Ok(value)
    }

    pub async fn run(&mut self) -> ! {
        info!("Chart demo running, {} ms per sample", self.step_ms);
        loop {
            if let Err(e) = self.step().await {
                error!("Demo step failed: {}", e);
            }
            self.delay.delay_ms(self.step_ms).await;
        }
    }
}
