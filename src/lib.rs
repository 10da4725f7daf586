//! Chart geometry for biometrics dashboards
//!
//! `bioscale` turns biomarker readings, biological-age histories and
//! reference ranges into plain-data chart layouts. It never draws: every
//! layout is a serializable description of domains, ticks, segments,
//! polylines and labels that a rendering backend (canvas, SVG, terminal)
//! consumes.
//!
//! # Core Concepts
//!
//! ## Domains and scales
//!
//! [`ScaleDomain`] computes padded display bounds that always satisfy
//! `min < max`, repairing coinciding samples instead of failing. A
//! [`Scale`] maps a domain to `[0, 1]`; [`scale::Linear`] is the only
//! mapping the charts need. [`TimeDomain`] covers the date axis.
//!
//! ## Ticks
//!
//! [`ticks::value_scale`] yields evenly spaced numeric ticks, optionally with
//! an emphasized zero line. [`ticks::time_scale`] fits date ticks to the
//! available width.
//!
//! ## Layouts
//!
//! - [`RangeBar`]: a value against its clinical and longevity ranges, cut
//!   into colored [`Segment`]s.
//! - [`series::SeriesLayout`]: multi-series line charts with end-of-line
//!   labels, used for biomarker trends and biological-age history.
//!
//! [`Transform`] projects chart coordinates onto a [`ScreenRect`], inverting
//! the y axis.
//!
//! # Examples
//!
//! ## Domain and scale
//!
//! ```rust
//! use bioscale::{Scale, ScaleDomain};
//!
//! let domain = ScaleDomain::new([10.0, 20.0, 30.0]).compute().unwrap();
//! let scale = domain.scale();
//!
//! assert_eq!(scale.normalize(&8.0), 0.0);
//! assert_eq!(scale.normalize(&20.0), 0.5);
//! assert_eq!(scale.denormalize(1.0), 32.0);
//! ```
//!
//! ## Range bar
//!
//! ```rust
//! use bioscale::{ColorClass, LayoutConfig, RangeBar, RangeKind, RangeSet, RangeStatus, RangeView, ReferenceRange};
//!
//! let ranges = RangeSet::new([
//!     ReferenceRange::new(RangeKind::Clinical, 70.0, 100.0),
//!     ReferenceRange::new(RangeKind::Longevity, 75.0, 90.0),
//! ]);
//! let bar = RangeBar::compute(Some(85.0), &ranges, RangeView::Both, &LayoutConfig::default()).unwrap();
//!
//! assert_eq!(bar.status, Some(RangeStatus::Optimal));
//! let classes: Vec<_> = bar.segments().unwrap().iter().map(|s| s.color_class).collect();
//! assert_eq!(classes, [
//!     ColorClass::OutOfRange,
//!     ColorClass::Normal,
//!     ColorClass::Optimal,
//!     ColorClass::Normal,
//!     ColorClass::OutOfRange,
//! ]);
//! ```
//!
//! ## History chart
//!
//! ```rust
//! use bioscale::{ChartFrame, HistoryMetric, HistoryRecord, SeriesLayout};
//!
//! let records: Vec<HistoryRecord> = serde_json::from_str(r#"[
//!     {"computedAt": "2024-01-10", "modelName": "Phenotypic Age", "bioAgeYears": 41.2, "ageGap": -2.1},
//!     {"computedAt": "2024-04-10", "modelName": "Phenotypic Age", "bioAgeYears": 40.8, "ageGap": -2.8}
//! ]"#).unwrap();
//!
//! let chart = SeriesLayout::new(ChartFrame::default())
//!     .history(&records, HistoryMetric::AgeGap)
//!     .unwrap();
//!
//! assert_eq!(chart.series.len(), 1);
//! assert!(chart.zero_line.is_some());
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod layout;
pub mod range;
pub mod record;
pub mod scale;
pub mod series;
pub mod ticks;
pub mod transform;

pub use config::{ChartFrame, LayoutConfig};
pub use domain::{Domain, ScaleDomain, TimeDomain};
pub use error::{ChartError, Result};
pub use layout::{CharWidth, TextAnchor, TextMetrics};
pub use num_traits::Float;
pub use range::{
    ColorClass, RangeBar, RangeKind, RangeSet, RangeStatus, RangeView, ReferenceRange, Segment,
    Segmentation,
};
pub use record::{HistoryRecord, RangeComparison, RangeRecord, Sex, TrendPoint};
pub use scale::{Scale, Tick, TickIter};
pub use series::{HistoryMetric, SeriesChart, SeriesKey, SeriesLayout, SeriesRecord, ValueAxis};
pub use transform::{PlotPoint, ScreenPoint, ScreenRect, Transform};
