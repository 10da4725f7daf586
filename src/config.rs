//! Layout tuning knobs.
//!
//! Every field defaults to the constant the dashboard has always used, so
//! `LayoutConfig::default()` reproduces the reference geometry exactly.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transform::ScreenRect;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fraction of the data span added on both sides of a value axis.
    pub padding_ratio: f64,
    /// Lower bound for the padding when all samples coincide.
    pub min_padding: f64,
    /// Minimum distance of a forced zero line from either domain edge.
    pub zero_margin: f64,
    /// Number of ticks on a numeric axis.
    pub numeric_tick_count: usize,
    /// Pixels reserved per temporal tick.
    pub time_tick_spacing_px: f64,
    pub min_time_ticks: usize,
    pub max_time_ticks: usize,
    /// Spans longer than this many days label ticks with month and year.
    pub long_span_days: i64,
    /// Fraction of an axis near each edge where labels anchor to the edge.
    pub edge_anchor_threshold: f64,
    /// Horizontal gap between a series' last point and its label.
    pub label_offset_px: f64,
    /// Minimum vertical distance between two end-of-line labels.
    pub label_line_height_px: f64,
    /// Per-character width used when the backend supplies no text metrics.
    pub char_width_px: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            padding_ratio: 0.1,
            min_padding: 0.5,
            zero_margin: 0.5,
            numeric_tick_count: 5,
            time_tick_spacing_px: 100.0,
            min_time_ticks: 2,
            max_time_ticks: 5,
            long_span_days: 300,
            edge_anchor_threshold: 0.05,
            label_offset_px: 8.0,
            label_line_height_px: 14.0,
            char_width_px: 7.0,
        }
    }
}

impl LayoutConfig {
    /// Parses a configuration, filling missing fields with defaults.
    ///
    /// ```
    /// use bioscale::LayoutConfig;
    ///
    /// let config = LayoutConfig::from_json(r#"{ "numeric_tick_count": 3 }"#).unwrap();
    /// assert_eq!(config.numeric_tick_count, 3);
    /// assert_eq!(config.padding_ratio, 0.1);
    /// ```
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Canvas a chart is laid out on, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartFrame {
    pub width: f64,
    pub height: f64,
    /// Inset between the canvas edge and the plot area, on every side.
    pub padding: f64,
}

impl Default for ChartFrame {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 300.0,
            padding: 40.0,
        }
    }
}

impl ChartFrame {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// The plot area: the canvas minus `padding` on each side.
    ///
    /// ```
    /// use bioscale::ChartFrame;
    ///
    /// let plot = ChartFrame::new(600.0, 300.0).plot_rect();
    /// assert_eq!((plot.x, plot.y, plot.width, plot.height), (40.0, 40.0, 520.0, 220.0));
    /// ```
    pub fn plot_rect(&self) -> ScreenRect<f64> {
        ScreenRect {
            x: 0.0,
            y: 0.0,
            width: self.width,
            height: self.height,
        }
        .inset(self.padding)
    }
}
