// src/ui/components/mod.rs
//! Widgets drawn by the monitor

pub mod label;
pub mod sparkline;

pub use label::{LABEL_CAPACITY, Label};
pub use sparkline::{ChartError, ChartResult, RangeBound, Sparkline, SparklineConfig};
