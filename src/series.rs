//! Multi-series line chart layout.
//!
//! [`SeriesLayout`] groups time-stamped records into series that share one
//! time domain and one value domain, projects them onto the plot area and
//! places an end-of-line label next to each series' last point.
//!
//! # Examples
//!
//! ```
//! use chrono::{TimeZone, Utc};
//! use bioscale::{ChartFrame, series::{SeriesKey, SeriesLayout, SeriesRecord}};
//!
//! let d1 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
//! let d2 = Utc.with_ymd_and_hms(2024, 2, 1, 0, 0, 0).unwrap();
//! let records = [
//!     SeriesRecord::new(SeriesKey::named("A"), d1, 5.0),
//!     SeriesRecord::new(SeriesKey::named("A"), d2, 7.0),
//!     SeriesRecord::new(SeriesKey::named("B"), d1, 6.0),
//! ];
//!
//! let chart = SeriesLayout::new(ChartFrame::default()).layout(&records).unwrap();
//! assert_eq!((chart.time_domain.min, chart.time_domain.max), (d1, d2));
//! assert_eq!(chart.series[0].polyline.as_ref().map(Vec::len), Some(2));
//! assert!(chart.series[1].polyline.is_none());
//! assert_eq!(chart.series[1].markers.len(), 1);
//! ```

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::config::{ChartFrame, LayoutConfig};
use crate::domain::{Domain, ScaleDomain, TimeDomain, gap_axis};
use crate::error::{ChartError, Result};
use crate::layout::{CharWidth, TextAnchor, TextMetrics};
use crate::record::{HistoryRecord, TrendPoint};
use crate::scale::{Scale, Tick};
use crate::ticks::{ZeroLine, time_scale, value_scale};
use crate::transform::{PlotPoint, ScreenPoint, ScreenRect, Transform};

/// Stroke colors, assigned to series in first-seen order and reused once
/// exhausted.
pub const PALETTE: [&str; 8] = [
    "#2980b9", "#e67e22", "#27ae60", "#8e44ad", "#c0392b", "#16a085", "#d35400", "#7f8c8d",
];

/// Identifies the series a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    Named(String),
    /// Chronological age derived from the biological-age records.
    ActualAge,
}

impl SeriesKey {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(name.into())
    }

    /// The derived actual-age series is drawn dashed.
    pub fn is_dashed(&self) -> bool {
        matches!(self, Self::ActualAge)
    }
}

impl fmt::Display for SeriesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Named(name) => f.write_str(name),
            Self::ActualAge => f.write_str("Actual Age"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SeriesRecord {
    pub key: SeriesKey,
    pub date: DateTime<Utc>,
    pub value: f64,
}

impl SeriesRecord {
    pub fn new(key: SeriesKey, date: DateTime<Utc>, value: f64) -> Self {
        Self { key, date, value }
    }
}

/// Metric plotted by a biological-age history chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryMetric {
    BioAge,
    AgeGap,
}

impl HistoryMetric {
    pub fn value_axis(self) -> ValueAxis {
        match self {
            Self::BioAge => ValueAxis::Age,
            Self::AgeGap => ValueAxis::Gap,
        }
    }
}

/// How the shared value domain is derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueAxis {
    /// Padded data extent.
    #[default]
    Plain,
    /// Signed gap: zero always visible and emphasized.
    Gap,
    /// Ages: never extends below zero.
    Age,
}

/// Flattens history records into series records, one series per model.
///
/// For [`HistoryMetric::BioAge`] every record also contributes a point to
/// the [`SeriesKey::ActualAge`] series.
pub fn history_records(records: &[HistoryRecord], metric: HistoryMetric) -> Vec<SeriesRecord> {
    let mut out = Vec::with_capacity(records.len() * 2);
    for record in records {
        let Some(date) = record.computed_at() else {
            trace!("dropping {} record with unparsable date {:?}", record.model_name, record.computed_at);
            continue;
        };
        let key = SeriesKey::named(record.model_name.as_str());
        match metric {
            HistoryMetric::BioAge => {
                if let Some(value) = record.bio_age_years {
                    out.push(SeriesRecord::new(key, date, value));
                }
                if let Some(age) = record.actual_age() {
                    out.push(SeriesRecord::new(SeriesKey::ActualAge, date, age));
                }
            }
            HistoryMetric::AgeGap => {
                if let Some(gap) = record.age_gap {
                    out.push(SeriesRecord::new(key, date, gap));
                }
            }
        }
    }
    out
}

/// Turns biomarker trend points into a single named series.
pub fn trend_records(name: &str, points: &[TrendPoint]) -> Vec<SeriesRecord> {
    points
        .iter()
        .filter_map(TrendPoint::sample)
        .map(|(date, value)| SeriesRecord::new(SeriesKey::named(name), date, value))
        .collect()
}

/// A tick and its pixel coordinate along the axis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedTick {
    pub tick: Tick<f64>,
    pub position: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesGeometry {
    pub name: String,
    pub color_index: usize,
    pub color: &'static str,
    pub dashed: bool,
    /// Present only for series with at least two points.
    pub polyline: Option<Vec<ScreenPoint>>,
    pub markers: Vec<ScreenPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndLabel {
    pub series: String,
    pub text: String,
    pub anchor: TextAnchor,
    pub position: ScreenPoint,
    /// Placed left of the last point because it would overflow the canvas.
    pub flipped: bool,
}

/// Complete layout of a line chart, in screen coordinates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesChart {
    pub frame: ChartFrame,
    pub plot: ScreenRect,
    pub time_domain: TimeDomain,
    pub value_domain: Domain,
    pub x_ticks: Vec<PlacedTick>,
    pub y_ticks: Vec<PlacedTick>,
    /// Screen y of the emphasized zero line, if drawn.
    pub zero_line: Option<f64>,
    pub series: Vec<SeriesGeometry>,
    pub end_labels: Vec<EndLabel>,
}

struct Group {
    key: SeriesKey,
    points: Vec<(DateTime<Utc>, f64)>,
}

/// Lays out line charts on a fixed frame.
#[derive(Debug, Clone)]
pub struct SeriesLayout {
    frame: ChartFrame,
    config: LayoutConfig,
    axis: ValueAxis,
}

impl SeriesLayout {
    pub fn new(frame: ChartFrame) -> Self {
        Self {
            frame,
            config: LayoutConfig::default(),
            axis: ValueAxis::default(),
        }
    }

    pub fn with_config(mut self, config: LayoutConfig) -> Self {
        self.config = config;
        self
    }

    pub fn value_axis(mut self, axis: ValueAxis) -> Self {
        self.axis = axis;
        self
    }

    /// Biological-age history chart; the metric decides the value axis.
    pub fn history(&self, records: &[HistoryRecord], metric: HistoryMetric) -> Result<SeriesChart> {
        self.clone()
            .value_axis(metric.value_axis())
            .layout(&history_records(records, metric))
    }

    /// Single-series chart of a biomarker trend.
    pub fn trend(&self, name: &str, points: &[TrendPoint]) -> Result<SeriesChart> {
        self.layout(&trend_records(name, points))
    }

    /// Lays out `records`, estimating label widths from
    /// [`LayoutConfig::char_width_px`].
    pub fn layout(&self, records: &[SeriesRecord]) -> Result<SeriesChart> {
        self.layout_with_metrics(records, &CharWidth(self.config.char_width_px))
    }

    /// Lays out `records`.
    ///
    /// Fails with [`ChartError::NoData`] when no record has a finite value.
    pub fn layout_with_metrics(
        &self,
        records: &[SeriesRecord],
        metrics: &dyn TextMetrics,
    ) -> Result<SeriesChart> {
        let groups = group(records);
        if groups.is_empty() {
            return Err(ChartError::NoData);
        }

        let time_domain = TimeDomain::from_dates(
            groups.iter().flat_map(|g| g.points.iter().map(|(date, _)| *date)),
        )?;
        let values = groups.iter().flat_map(|g| g.points.iter().map(|(_, value)| *value));
        let value_domain = match self.axis {
            ValueAxis::Plain => ScaleDomain::new(values).with_config(&self.config).compute()?,
            ValueAxis::Gap => gap_axis(values, &self.config)?,
            ValueAxis::Age => ScaleDomain::new(values)
                .with_config(&self.config)
                .floor_at_zero(true)
                .compute()?,
        };

        let plot = self.frame.plot_rect();
        let zero_line = match self.axis {
            ValueAxis::Gap => ZeroLine::Emphasized,
            _ => ZeroLine::Plain,
        };
        let x_scale = time_scale(&time_domain, plot.width, &self.config);
        let y_scale = value_scale(&value_domain, &self.config, zero_line);
        let transform = Transform::new(&plot, &x_scale, &y_scale);

        let x_ticks = place(x_scale.ticks(), |v| transform.x_opt(v));
        let y_ticks = place(y_scale.ticks(), |v| transform.y_opt(v));
        let zero_line = y_ticks.iter().find(|t| t.tick.emphasized).map(|t| t.position);

        let series: Vec<SeriesGeometry> = groups
            .iter()
            .enumerate()
            .map(|(color_index, group)| {
                let markers: Vec<ScreenPoint> = group
                    .points
                    .iter()
                    .filter_map(|(date, value)| {
                        transform.point_opt(&PlotPoint::new(date.timestamp_millis() as f64, *value))
                    })
                    .collect();
                SeriesGeometry {
                    name: group.key.to_string(),
                    color_index,
                    color: PALETTE[color_index % PALETTE.len()],
                    dashed: group.key.is_dashed(),
                    polyline: (markers.len() >= 2).then(|| markers.clone()),
                    markers,
                }
            })
            .collect();

        let mut end_labels: Vec<EndLabel> = series
            .iter()
            .filter_map(|geometry| self.end_label(geometry, metrics))
            .collect();
        resolve_label_overlaps(&mut end_labels, transform.rect(), self.config.label_line_height_px);

        Ok(SeriesChart {
            frame: self.frame,
            plot,
            time_domain,
            value_domain,
            x_ticks,
            y_ticks,
            zero_line,
            series,
            end_labels,
        })
    }

    fn end_label(&self, geometry: &SeriesGeometry, metrics: &dyn TextMetrics) -> Option<EndLabel> {
        let last = *geometry.markers.last()?;
        let offset = self.config.label_offset_px;
        let width = metrics.text_width(&geometry.name);

        let flipped = last.x + offset + width > self.frame.width;
        let (x, anchor) = if flipped {
            debug!("flipping label {:?} left of its last point", geometry.name);
            (last.x - offset, TextAnchor::End)
        } else {
            (last.x + offset, TextAnchor::Start)
        };

        Some(EndLabel {
            series: geometry.name.clone(),
            text: geometry.name.clone(),
            anchor,
            position: ScreenPoint::new(x, last.y),
            flipped,
        })
    }
}

/// Groups finite records by key in first-seen order, deduplicates the
/// actual-age series by timestamp and sorts every group by date.
fn group(records: &[SeriesRecord]) -> Vec<Group> {
    let mut groups: Vec<Group> = Vec::new();
    let mut dropped = 0usize;

    for record in records {
        if !record.value.is_finite() {
            dropped += 1;
            continue;
        }
        let index = match groups.iter().position(|g| g.key == record.key) {
            Some(index) => index,
            None => {
                groups.push(Group {
                    key: record.key.clone(),
                    points: Vec::new(),
                });
                groups.len() - 1
            }
        };
        groups[index].points.push((record.date, record.value));
    }
    if dropped > 0 {
        debug!("dropped {dropped} non-finite sample(s)");
    }

    for group in &mut groups {
        if group.key == SeriesKey::ActualAge {
            let before = group.points.len();
            let mut seen = HashSet::new();
            group.points.retain(|(date, _)| seen.insert(*date));
            if group.points.len() != before {
                trace!("deduplicated {} actual-age point(s)", before - group.points.len());
            }
        }
        group.points.sort_by_key(|(date, _)| *date);
    }

    groups
}

fn place(ticks: Vec<Tick<f64>>, project: impl Fn(&f64) -> Option<f64>) -> Vec<PlacedTick> {
    ticks
        .into_iter()
        .filter_map(|tick| {
            let position = project(&tick.value)?;
            Some(PlacedTick { tick, position })
        })
        .collect()
}

/// Spreads labels vertically so neighbours are at least `line_height`
/// apart, keeping them inside `plot`. The separation shrinks when the plot
/// is too short to fit every label.
fn resolve_label_overlaps(labels: &mut [EndLabel], plot: &ScreenRect, line_height: f64) {
    if labels.len() <= 1 {
        return;
    }

    let half = line_height * 0.5;
    let mut min_y = plot.y + half;
    let mut max_y = plot.bottom() - half;
    if max_y < min_y {
        std::mem::swap(&mut min_y, &mut max_y);
    }

    let gaps = (labels.len() - 1) as f64;
    let mut sep = line_height;
    let available = (max_y - min_y).max(0.0);
    if sep * gaps > available {
        sep = available / gaps;
    }

    labels.sort_by(|a, b| a.position.y.total_cmp(&b.position.y));

    let mut prev_y = min_y;
    for (i, label) in labels.iter_mut().enumerate() {
        let low = if i == 0 { min_y } else { prev_y + sep };
        let high = max_y - sep * (gaps - i as f64);
        let y = label.position.y.max(low).min(high);
        label.position.y = y;
        prev_y = y;
    }
}
