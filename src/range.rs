//! Reference-range segmentation.
//!
//! A range bar shows where a biomarker value sits relative to its clinical
//! and longevity reference ranges. The display domain is cut at every range
//! bound into colored [`Segment`]s; which color a piece gets is decided by
//! the [`PRECEDENCE`] table, so longevity beats clinical wherever both
//! apply.
//!
//! ```
//! use bioscale::{Domain, RangeKind, RangeSet, RangeView, ReferenceRange, ColorClass};
//! use bioscale::range::segment;
//!
//! let ranges = RangeSet::new([ReferenceRange::new(RangeKind::Clinical, 70.0, 100.0)]);
//! let active = ranges.active(RangeView::Clinical).unwrap();
//! let segments = segment(&active, &Domain { min: 60.0, max: 110.0 });
//!
//! let summary: Vec<_> = segments.iter().map(|s| (s.start, s.end, s.color_class)).collect();
//! assert_eq!(summary, [
//!     (60.0, 70.0, ColorClass::OutOfRange),
//!     (70.0, 100.0, ColorClass::Normal),
//!     (100.0, 110.0, ColorClass::OutOfRange),
//! ]);
//! ```

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::config::LayoutConfig;
use crate::domain::{Domain, ScaleDomain};
use crate::error::{ChartError, Result};
use crate::layout::TextAnchor;
use crate::scale::util;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeKind {
    Clinical,
    Longevity,
}

impl fmt::Display for RangeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clinical => write!(f, "clinical"),
            Self::Longevity => write!(f, "longevity"),
        }
    }
}

/// Which reference ranges a comparison shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeView {
    Clinical,
    Longevity,
    #[default]
    Both,
}

impl RangeView {
    /// Ranges the view cannot be drawn without.
    pub fn required(self) -> &'static [RangeKind] {
        match self {
            Self::Clinical => &[RangeKind::Clinical],
            Self::Longevity => &[RangeKind::Longevity],
            Self::Both => &[RangeKind::Clinical, RangeKind::Longevity],
        }
    }
}

impl fmt::Display for RangeView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clinical => write!(f, "clinical"),
            Self::Longevity => write!(f, "longevity"),
            Self::Both => write!(f, "both"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ColorClass {
    Optimal,
    Normal,
    OutOfRange,
}

/// Classification priority: the first entry whose range contains a value
/// wins, anything uncovered is [`ColorClass::OutOfRange`].
pub const PRECEDENCE: [(RangeKind, ColorClass); 2] = [
    (RangeKind::Longevity, ColorClass::Optimal),
    (RangeKind::Clinical, ColorClass::Normal),
];

impl RangeKind {
    /// Color of the area inside a range of this kind.
    pub fn color_class(self) -> ColorClass {
        PRECEDENCE
            .iter()
            .find(|(kind, _)| *kind == self)
            .map_or(ColorClass::OutOfRange, |(_, class)| *class)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferenceRange {
    pub kind: RangeKind,
    pub min: f64,
    pub max: f64,
}

impl ReferenceRange {
    pub fn new(kind: RangeKind, min: f64, max: f64) -> Self {
        Self {
            kind,
            min,
            max,
        }
    }

    /// Half-open containment, `[min, max)`, used for segment classification.
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value < self.max
    }

    /// Closed containment, `[min, max]`, used for status reporting.
    pub fn contains_inclusive(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    fn validate(&self) -> Result<()> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(ChartError::InvalidRange {
                kind: self.kind,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// At most one range per kind.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RangeSet {
    clinical: Option<ReferenceRange>,
    longevity: Option<ReferenceRange>,
}

impl RangeSet {
    /// Collects ranges, keeping the first valid range of each kind.
    ///
    /// Ranges with non-finite or inverted bounds are dropped: a range that
    /// cannot be drawn counts as missing.
    pub fn new(ranges: impl IntoIterator<Item = ReferenceRange>) -> Self {
        let mut set = Self::default();
        for range in ranges {
            if let Err(err) = range.validate() {
                warn!("ignoring reference range: {err}");
                continue;
            }
            let slot = set.slot_mut(range.kind);
            if slot.is_none() {
                *slot = Some(range);
            }
        }
        set
    }

    fn slot_mut(&mut self, kind: RangeKind) -> &mut Option<ReferenceRange> {
        match kind {
            RangeKind::Clinical => &mut self.clinical,
            RangeKind::Longevity => &mut self.longevity,
        }
    }

    pub fn get(&self, kind: RangeKind) -> Option<&ReferenceRange> {
        match kind {
            RangeKind::Clinical => self.clinical.as_ref(),
            RangeKind::Longevity => self.longevity.as_ref(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.clinical.is_none() && self.longevity.is_none()
    }

    /// Ranges shown by `view`, or the kinds it is missing.
    pub fn active(&self, view: RangeView) -> std::result::Result<Vec<&ReferenceRange>, Vec<RangeKind>> {
        let missing: Vec<RangeKind> = view
            .required()
            .iter()
            .copied()
            .filter(|kind| self.get(*kind).is_none())
            .collect();
        if !missing.is_empty() {
            return Err(missing);
        }

        Ok(view
            .required()
            .iter()
            .filter_map(|kind| self.get(*kind))
            .collect())
    }

    /// Like [`RangeSet::active`], as a [`ChartError::RangeUnavailable`].
    pub fn require(&self, view: RangeView) -> Result<Vec<&ReferenceRange>> {
        self.active(view)
            .map_err(|missing| ChartError::RangeUnavailable { view, missing })
    }
}

/// Classifies `value` against `ranges` by [`PRECEDENCE`], treating each
/// range as half-open.
pub fn classify(value: f64, ranges: &[&ReferenceRange]) -> ColorClass {
    classify_with(value, ranges, ReferenceRange::contains)
}

fn classify_with(
    value: f64,
    ranges: &[&ReferenceRange],
    contains: impl Fn(&ReferenceRange, f64) -> bool,
) -> ColorClass {
    PRECEDENCE
        .iter()
        .find(|(kind, _)| {
            ranges
                .iter()
                .any(|&range| range.kind == *kind && contains(range, value))
        })
        .map_or(ColorClass::OutOfRange, |(_, class)| *class)
}

/// Status of a measured value, as reported next to the value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RangeStatus {
    Optimal,
    Normal,
    OutOfRange,
}

impl RangeStatus {
    /// Status of `value` with closed range bounds.
    ///
    /// ```
    /// use bioscale::{RangeKind, ReferenceRange, RangeStatus};
    ///
    /// let clinical = ReferenceRange::new(RangeKind::Clinical, 70.0, 100.0);
    /// let longevity = ReferenceRange::new(RangeKind::Longevity, 75.0, 90.0);
    ///
    /// assert_eq!(RangeStatus::of(80.0, &[&clinical, &longevity]), RangeStatus::Optimal);
    /// assert_eq!(RangeStatus::of(100.0, &[&clinical, &longevity]), RangeStatus::Normal);
    /// assert_eq!(RangeStatus::of(101.0, &[&clinical, &longevity]), RangeStatus::OutOfRange);
    /// ```
    pub fn of(value: f64, ranges: &[&ReferenceRange]) -> Self {
        match classify_with(value, ranges, ReferenceRange::contains_inclusive) {
            ColorClass::Optimal => Self::Optimal,
            ColorClass::Normal => Self::Normal,
            ColorClass::OutOfRange => Self::OutOfRange,
        }
    }
}

/// A colored piece of the range bar, `start < end`, in domain units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: f64,
    pub end: f64,
    pub color_class: ColorClass,
}

impl Segment {
    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

/// Cuts `domain` into classified segments covering it without gaps.
///
/// Breakpoints are the domain edges plus every range bound, clipped to the
/// domain, sorted and deduplicated. Each piece is classified by its
/// midpoint; adjacent pieces of the same class are merged. With a single
/// range this yields at most three segments: out-of-range, inside,
/// out-of-range.
pub fn segment(ranges: &[&ReferenceRange], domain: &Domain) -> Vec<Segment> {
    let points = breakpoints(ranges, domain);

    let mut segments: Vec<Segment> = Vec::with_capacity(points.len());
    for pair in points.windows(2) {
        let (start, end) = (pair[0], pair[1]);
        if start >= end {
            continue;
        }

        let color_class = classify(start + (end - start) / 2.0, ranges);
        match segments.last_mut() {
            Some(last) if last.color_class == color_class => last.end = end,
            _ => segments.push(Segment {
                start,
                end,
                color_class,
            }),
        }
    }
    segments
}

fn breakpoints(ranges: &[&ReferenceRange], domain: &Domain) -> Vec<f64> {
    let mut points: Vec<f64> = std::iter::once(domain.min)
        .chain(ranges.iter().flat_map(|range| [range.min, range.max]))
        .chain(std::iter::once(domain.max))
        .map(|point| domain.clip(point))
        .collect();
    points.sort_by(f64::total_cmp);
    points.dedup();
    points
}

/// Text at a segment boundary on the bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeLabel {
    pub value: f64,
    /// Normalized position along the bar.
    pub position: f64,
    pub text: String,
    pub anchor: TextAnchor,
}

/// One label per boundary of `segments`, the axis edges included.
///
/// Bounds swallowed by a merged run or clipped away by the domain get no
/// label of their own.
pub fn labels(segments: &[Segment], domain: &Domain, config: &LayoutConfig) -> Vec<RangeLabel> {
    segments
        .iter()
        .map(|segment| segment.start)
        .chain(segments.last().map(|segment| segment.end))
        .map(|value| {
            let position = domain.position(value);
            RangeLabel {
                value,
                position,
                text: util::format_value(value),
                anchor: TextAnchor::for_position(position, config.edge_anchor_threshold),
            }
        })
        .collect()
}

/// Cursor for the live value; `position` is clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueMarker {
    pub value: f64,
    pub position: f64,
}

impl ValueMarker {
    pub fn percent(&self) -> f64 {
        self.position * 100.0
    }
}

/// Outcome of segmenting a range bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "kebab-case")]
pub enum Segmentation {
    Segmented {
        segments: Vec<Segment>,
        labels: Vec<RangeLabel>,
    },
    /// The view needs ranges this biomarker does not have.
    Unavailable { missing: Vec<RangeKind> },
}

/// Complete layout of one biomarker's range bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeBar {
    pub view: RangeView,
    pub domain: Domain,
    /// Present whenever the value is numeric, even if segmentation failed.
    pub marker: Option<ValueMarker>,
    pub status: Option<RangeStatus>,
    pub segmentation: Segmentation,
}

impl RangeBar {
    /// Lays out the bar for `value` under `view`.
    ///
    /// The domain covers the value and the bounds of the ranges the view
    /// draws, or of every range held when the view is unavailable. Fails
    /// with [`ChartError::NoData`] only when there is neither a finite value
    /// nor a range to draw.
    ///
    /// ```
    /// use bioscale::{LayoutConfig, RangeBar, RangeKind, RangeSet, RangeView, ReferenceRange, Segmentation};
    ///
    /// let ranges = RangeSet::new([ReferenceRange::new(RangeKind::Clinical, 70.0, 100.0)]);
    /// let bar = RangeBar::compute(Some(85.0), &ranges, RangeView::Both, &LayoutConfig::default()).unwrap();
    ///
    /// assert!(matches!(bar.segmentation, Segmentation::Unavailable { .. }));
    /// assert_eq!(bar.marker.unwrap().percent(), 50.0);
    /// ```
    pub fn compute(
        value: Option<f64>,
        ranges: &RangeSet,
        view: RangeView,
        config: &LayoutConfig,
    ) -> Result<Self> {
        let value = value.filter(|v| v.is_finite());
        let active = ranges.active(view);
        let shown: Vec<&ReferenceRange> = match &active {
            Ok(active) => active.clone(),
            Err(_) => [RangeKind::Clinical, RangeKind::Longevity]
                .iter()
                .filter_map(|kind| ranges.get(*kind))
                .collect(),
        };
        let bounds: Vec<f64> = shown.iter().flat_map(|range| [range.min, range.max]).collect();

        let domain = match ScaleDomain::new(value).include(bounds).with_config(config).compute() {
            Ok(domain) => domain,
            Err(ChartError::EmptySamples) => return Err(ChartError::NoData),
            Err(err) => return Err(err),
        };

        let marker = value.map(|value| ValueMarker {
            value,
            position: domain.position_clamped(value),
        });

        let (segmentation, status) = match active {
            Ok(active) => {
                let segments = segment(&active, &domain);
                let labels = labels(&segments, &domain, config);
                (
                    Segmentation::Segmented { segments, labels },
                    value.map(|value| RangeStatus::of(value, &active)),
                )
            }
            Err(missing) => {
                debug!("{view} range view unavailable, missing {missing:?}");
                (Segmentation::Unavailable { missing }, None)
            }
        };

        Ok(Self {
            view,
            domain,
            marker,
            status,
            segmentation,
        })
    }

    pub fn segments(&self) -> Option<&[Segment]> {
        match &self.segmentation {
            Segmentation::Segmented { segments, .. } => Some(segments),
            Segmentation::Unavailable { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clinical(min: f64, max: f64) -> ReferenceRange {
        ReferenceRange::new(RangeKind::Clinical, min, max)
    }

    fn longevity(min: f64, max: f64) -> ReferenceRange {
        ReferenceRange::new(RangeKind::Longevity, min, max)
    }

    fn summary(segments: &[Segment]) -> Vec<(f64, f64, ColorClass)> {
        segments
            .iter()
            .map(|s| (s.start, s.end, s.color_class))
            .collect()
    }

    const DOMAIN: Domain = Domain {
        min: 60.0,
        max: 110.0,
    };

    #[test]
    fn single_clinical_range() {
        let range = clinical(70.0, 100.0);
        assert_eq!(
            summary(&segment(&[&range], &DOMAIN)),
            [
                (60.0, 70.0, ColorClass::OutOfRange),
                (70.0, 100.0, ColorClass::Normal),
                (100.0, 110.0, ColorClass::OutOfRange),
            ]
        );
    }

    #[test]
    fn single_longevity_range_is_optimal() {
        let range = longevity(75.0, 90.0);
        let segments = segment(&[&range], &DOMAIN);
        assert_eq!(segments[1].color_class, ColorClass::Optimal);
    }

    #[test]
    fn single_range_clipped_to_domain() {
        let range = clinical(40.0, 100.0);
        assert_eq!(
            summary(&segment(&[&range], &DOMAIN)),
            [
                (60.0, 100.0, ColorClass::Normal),
                (100.0, 110.0, ColorClass::OutOfRange),
            ]
        );

        let outside = clinical(200.0, 300.0);
        assert_eq!(
            summary(&segment(&[&outside], &DOMAIN)),
            [(60.0, 110.0, ColorClass::OutOfRange)]
        );
    }

    #[test]
    fn both_ranges_nested() {
        let c = clinical(70.0, 100.0);
        let l = longevity(80.0, 90.0);
        assert_eq!(
            summary(&segment(&[&c, &l], &DOMAIN)),
            [
                (60.0, 70.0, ColorClass::OutOfRange),
                (70.0, 80.0, ColorClass::Normal),
                (80.0, 90.0, ColorClass::Optimal),
                (90.0, 100.0, ColorClass::Normal),
                (100.0, 110.0, ColorClass::OutOfRange),
            ]
        );
    }

    #[test]
    fn shared_bounds_are_deduplicated() {
        let c = clinical(70.0, 100.0);
        let l = longevity(70.0, 90.0);
        assert_eq!(
            summary(&segment(&[&c, &l], &DOMAIN)),
            [
                (60.0, 70.0, ColorClass::OutOfRange),
                (70.0, 90.0, ColorClass::Optimal),
                (90.0, 100.0, ColorClass::Normal),
                (100.0, 110.0, ColorClass::OutOfRange),
            ]
        );
    }

    #[test]
    fn longevity_wider_than_clinical_merges_runs() {
        let c = clinical(70.0, 100.0);
        let l = longevity(65.0, 90.0);
        assert_eq!(
            summary(&segment(&[&c, &l], &DOMAIN)),
            [
                (60.0, 65.0, ColorClass::OutOfRange),
                (65.0, 90.0, ColorClass::Optimal),
                (90.0, 100.0, ColorClass::Normal),
                (100.0, 110.0, ColorClass::OutOfRange),
            ]
        );
    }

    #[test]
    fn single_range_contract_over_value_sweep() {
        let domain = Domain {
            min: -20.0,
            max: 20.0,
        };
        let bounds = [-25.0, -10.0, -1.0, 0.0, 2.5, 10.0, 19.0, 30.0];

        for &lo in &bounds {
            for &hi in bounds.iter().filter(|hi| **hi > lo) {
                let range = clinical(lo, hi);
                let segments = segment(&[&range], &domain);

                assert!(segments.len() <= 3);
                let total: f64 = segments.iter().map(Segment::width).sum();
                assert!((total - domain.span()).abs() < 1e-9);
                assert_eq!(segments.first().unwrap().start, domain.min);
                assert_eq!(segments.last().unwrap().end, domain.max);
                for pair in segments.windows(2) {
                    assert_eq!(pair[0].end, pair[1].start);
                    assert_ne!(pair[0].color_class, pair[1].color_class);
                }

                for step in 0..80 {
                    let v = domain.min + 0.5 * step as f64 + 0.25;
                    let containing = segments
                        .iter()
                        .find(|s| v >= s.start && v < s.end)
                        .unwrap();
                    let inside = v >= lo && v < hi;
                    assert_eq!(
                        containing.color_class == ColorClass::Normal,
                        inside,
                        "[{lo}, {hi}) at {v}"
                    );
                }
            }
        }
    }

    #[test]
    fn both_ranges_boundaries_are_clipped_breakpoints() {
        let c = clinical(50.0, 100.0);
        let l = longevity(80.0, 130.0);
        let segments = segment(&[&c, &l], &DOMAIN);

        let mut edges: Vec<f64> = segments.iter().map(|s| s.start).collect();
        edges.push(segments.last().unwrap().end);
        assert_eq!(edges, [60.0, 80.0, 110.0]);
        assert_eq!(segments[0].color_class, ColorClass::Normal);
        assert_eq!(segments[1].color_class, ColorClass::Optimal);
    }

    #[test]
    fn precedence_table_drives_colors() {
        assert_eq!(RangeKind::Clinical.color_class(), ColorClass::Normal);
        assert_eq!(RangeKind::Longevity.color_class(), ColorClass::Optimal);

        let c = clinical(70.0, 100.0);
        let l = longevity(80.0, 90.0);
        assert_eq!(classify(85.0, &[&c, &l]), ColorClass::Optimal);
        assert_eq!(classify(90.0, &[&c, &l]), ColorClass::Normal);
        assert_eq!(classify(100.0, &[&c, &l]), ColorClass::OutOfRange);
    }

    #[test]
    fn labels_anchor_near_edges() {
        let domain = Domain {
            min: 0.0,
            max: 100.0,
        };
        let c = clinical(2.0, 50.0);
        let l = longevity(50.0, 99.0);
        let segments = segment(&[&c, &l], &domain);
        let labels = labels(&segments, &domain, &LayoutConfig::default());

        let summary: Vec<_> = labels
            .iter()
            .map(|l| (l.text.as_str(), l.anchor))
            .collect();
        assert_eq!(
            summary,
            [
                ("0.0", TextAnchor::Start),
                ("2.0", TextAnchor::Start),
                ("50.0", TextAnchor::Middle),
                ("99.0", TextAnchor::End),
                ("100.0", TextAnchor::End),
            ]
        );
    }

    #[test]
    fn labels_follow_merged_segment_boundaries() {
        let c = clinical(70.0, 100.0);
        let l = longevity(65.0, 90.0);
        let segments = segment(&[&c, &l], &DOMAIN);
        let labels = labels(&segments, &DOMAIN, &LayoutConfig::default());

        let values: Vec<f64> = labels.iter().map(|l| l.value).collect();
        let mut boundaries: Vec<f64> = segments.iter().map(|s| s.start).collect();
        boundaries.push(segments.last().unwrap().end);

        assert_eq!(values, boundaries);
        assert_eq!(values, [60.0, 65.0, 90.0, 100.0, 110.0]);
    }

    #[test]
    fn clipped_bound_is_labelled_at_the_domain_edge() {
        let c = clinical(40.0, 100.0);
        let segments = segment(&[&c], &DOMAIN);
        let labels = labels(&segments, &DOMAIN, &LayoutConfig::default());

        let values: Vec<f64> = labels.iter().map(|l| l.value).collect();
        assert_eq!(values, [60.0, 100.0, 110.0]);
        assert_eq!(labels[0].anchor, TextAnchor::Start);
        assert_eq!(labels[0].position, 0.0);
    }

    #[test]
    fn range_set_reports_missing_kinds() {
        let set = RangeSet::new([clinical(70.0, 100.0)]);

        assert!(set.active(RangeView::Clinical).is_ok());
        assert_eq!(
            set.active(RangeView::Longevity).unwrap_err(),
            [RangeKind::Longevity]
        );
        assert!(matches!(
            set.require(RangeView::Both),
            Err(ChartError::RangeUnavailable {
                view: RangeView::Both,
                ..
            })
        ));
    }

    #[test]
    fn invalid_ranges_count_as_missing() {
        let set = RangeSet::new([
            clinical(100.0, 70.0),
            longevity(f64::NAN, 3.0),
            clinical(70.0, 100.0),
        ]);

        assert_eq!(set.get(RangeKind::Clinical), Some(&clinical(70.0, 100.0)));
        assert!(set.get(RangeKind::Longevity).is_none());
    }

    #[test]
    fn bar_places_marker_and_segments() {
        let set = RangeSet::new([clinical(70.0, 100.0), longevity(80.0, 90.0)]);
        let bar = RangeBar::compute(Some(85.0), &set, RangeView::Both, &LayoutConfig::default())
            .unwrap();

        // bounds 70..100 padded by 3
        assert!((bar.domain.min - 67.0).abs() < 1e-9);
        assert!((bar.domain.max - 103.0).abs() < 1e-9);
        assert_eq!(bar.status, Some(RangeStatus::Optimal));
        assert_eq!(bar.segments().unwrap().len(), 5);
        assert!((bar.marker.unwrap().position - 0.5).abs() < 1e-9);
    }

    #[test]
    fn clinical_view_ignores_longevity_bounds() {
        let set = RangeSet::new([clinical(70.0, 100.0), longevity(30.0, 200.0)]);
        let bar = RangeBar::compute(Some(85.0), &set, RangeView::Clinical, &LayoutConfig::default())
            .unwrap();

        assert!((bar.domain.min - 67.0).abs() < 1e-9);
        assert!((bar.domain.max - 103.0).abs() < 1e-9);
        assert_eq!(bar.status, Some(RangeStatus::Normal));
    }

    #[test]
    fn unavailable_view_still_spans_held_ranges() {
        let set = RangeSet::new([clinical(70.0, 100.0)]);
        let bar = RangeBar::compute(Some(85.0), &set, RangeView::Longevity, &LayoutConfig::default())
            .unwrap();

        assert!(bar.segments().is_none());
        assert!((bar.domain.min - 67.0).abs() < 1e-9);
        assert!((bar.domain.max - 103.0).abs() < 1e-9);
    }

    #[test]
    fn bar_marker_is_clamped_only_for_display() {
        let set = RangeSet::new([clinical(70.0, 100.0)]);
        let bar = RangeBar::compute(Some(1000.0), &set, RangeView::Clinical, &LayoutConfig::default())
            .unwrap();

        let marker = bar.marker.unwrap();
        assert_eq!(marker.value, 1000.0);
        assert!(marker.position <= 1.0);
        assert_eq!(bar.status, Some(RangeStatus::OutOfRange));
    }

    #[test]
    fn bar_without_value_still_segments() {
        let set = RangeSet::new([clinical(70.0, 100.0)]);
        let bar = RangeBar::compute(Some(f64::NAN), &set, RangeView::Clinical, &LayoutConfig::default())
            .unwrap();

        assert!(bar.marker.is_none());
        assert!(bar.status.is_none());
        assert_eq!(bar.segments().unwrap().len(), 3);
    }

    #[test]
    fn bar_without_anything_is_no_data() {
        let result = RangeBar::compute(None, &RangeSet::default(), RangeView::Both, &LayoutConfig::default());
        assert!(matches!(result, Err(ChartError::NoData)));
    }
}
