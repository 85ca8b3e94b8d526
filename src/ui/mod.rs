// src/ui/mod.rs
//! Monochrome UI for the CO2 monitor
//!
//! This module provides:
//! - The [`Widget`] trait with dirty tracking
//! - A scrolling [`Sparkline`] chart and a text [`Label`]
//! - The start-up splash screen

pub mod components;
pub mod core;
pub mod splash;

pub use components::{ChartError, Label, RangeBound, Sparkline, SparklineConfig};
pub use self::core::Widget;

/// SSD1306 panel width in pixels
pub const DISPLAY_WIDTH_PX: u32 = 128;

/// SSD1306 panel height in pixels
pub const DISPLAY_HEIGHT_PX: u32 = 64;
