//! Display ranges for value and time axes.
//!
//! [`ScaleDomain`] turns a set of samples into padded axis bounds that are
//! guaranteed to satisfy `min < max`; every downstream scale relies on that
//! guarantee to avoid dividing by zero. [`gap_axis`] specializes it for age
//! gap charts, [`TimeDomain`] covers the time axis.

use chrono::{DateTime, Duration, Utc};
use log::{debug, trace};
use serde::Serialize;

use crate::config::LayoutConfig;
use crate::error::{ChartError, Result};
use crate::scale::Linear;

/// Bounds of a value axis in data units. `min < max` always holds for
/// domains produced by [`ScaleDomain`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    pub min: f64,
    pub max: f64,
}

impl Domain {
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Unclamped normalized position of `value`: `0` at `min`, `1` at `max`.
    ///
    /// ```
    /// use bioscale::Domain;
    ///
    /// let domain = Domain { min: 60.0, max: 110.0 };
    /// assert_eq!(domain.position(85.0), 0.5);
    /// assert_eq!(domain.position(35.0), -0.5);
    /// ```
    ///
    /// Works on halved operands, so domains reaching `±f64::MAX` still give
    /// finite positions.
    pub fn position(&self, value: f64) -> f64 {
        (value / 2.0 - self.min / 2.0) / (self.max / 2.0 - self.min / 2.0)
    }

    /// Position clamped to `[0, 1]`, for fixed-size markers.
    pub fn position_clamped(&self, value: f64) -> f64 {
        self.position(value).clamp(0.0, 1.0)
    }

    /// Limits `value` to the domain bounds.
    pub fn clip(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// True when zero lies strictly inside the domain.
    pub fn straddles_zero(&self) -> bool {
        self.min < 0.0 && self.max > 0.0
    }

    /// Linear scale over this domain with the default tick generator.
    pub fn scale(&self) -> Linear<f64, f64> {
        Linear::new(self.min, self.max)
    }
}

/// Computes a padded, never-degenerate display domain from samples.
///
/// # Examples
///
/// ```
/// use bioscale::ScaleDomain;
///
/// let domain = ScaleDomain::new([10.0, 20.0, 30.0]).compute().unwrap();
/// assert_eq!((domain.min, domain.max), (8.0, 32.0));
///
/// // Coinciding samples are spread by half their magnitude before padding.
/// let domain = ScaleDomain::new([5.0, 5.0, 5.0]).compute().unwrap();
/// assert_eq!((domain.min, domain.max), (2.0, 8.0));
/// ```
#[derive(Debug, Clone)]
pub struct ScaleDomain {
    values: Vec<f64>,
    include: Vec<f64>,
    force_include_zero: bool,
    floor_at_zero: bool,
    padding_ratio: f64,
    min_padding: f64,
    zero_margin: f64,
}

impl ScaleDomain {
    pub fn new(values: impl IntoIterator<Item = f64>) -> Self {
        let defaults = LayoutConfig::default();
        Self {
            values: values.into_iter().collect(),
            include: Vec::new(),
            force_include_zero: false,
            floor_at_zero: false,
            padding_ratio: defaults.padding_ratio,
            min_padding: defaults.min_padding,
            zero_margin: defaults.zero_margin,
        }
    }

    /// Extra points the domain must cover, such as reference-range bounds.
    pub fn include(mut self, points: impl IntoIterator<Item = f64>) -> Self {
        self.include.extend(points);
        self
    }

    /// Keeps zero visible with at least the configured margin on each side.
    pub fn force_include_zero(mut self, force: bool) -> Self {
        self.force_include_zero = force;
        self
    }

    /// Raises a negative lower bound to zero, for quantities that cannot be
    /// negative.
    pub fn floor_at_zero(mut self, floor: bool) -> Self {
        self.floor_at_zero = floor;
        self
    }

    pub fn with_config(mut self, config: &LayoutConfig) -> Self {
        self.padding_ratio = config.padding_ratio;
        self.min_padding = config.min_padding;
        self.zero_margin = config.zero_margin;
        self
    }

    /// Computes the display domain.
    ///
    /// Non-finite samples are ignored. Fails with
    /// [`ChartError::EmptySamples`] only when no finite sample remains.
    pub fn compute(&self) -> Result<Domain> {
        let mut finite = self
            .values
            .iter()
            .chain(&self.include)
            .copied()
            .filter(|v| v.is_finite());

        let first = finite.next().ok_or(ChartError::EmptySamples)?;
        let (data_min, data_max) =
            finite.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v)));

        let coincident = data_min == data_max;
        let (lo, hi) = repair_degenerate(data_min, data_max);

        let mut padding = (hi / 2.0 - lo / 2.0) * (2.0 * self.padding_ratio);
        if coincident {
            let floor = (data_min.abs() * self.padding_ratio).max(self.min_padding);
            padding = padding.max(floor);
        }

        let (lo, hi) = widen(lo, hi, padding);
        let (mut lo, mut hi) = repair_degenerate(lo, hi);

        if self.force_include_zero {
            lo = lo.min(-self.zero_margin);
            hi = hi.max(self.zero_margin);
        }

        if self.floor_at_zero && lo < 0.0 && hi > 0.0 {
            lo = 0.0;
        }

        trace!("domain [{data_min}, {data_max}] -> [{lo}, {hi}]");
        Ok(Domain { min: lo, max: hi })
    }
}

/// Domain for age-gap charts: the zero line is always inside, at least
/// `zero_margin` away from both edges.
///
/// ```
/// use bioscale::{LayoutConfig, domain::gap_axis};
///
/// let domain = gap_axis([2.0, 4.0], &LayoutConfig::default()).unwrap();
/// assert_eq!(domain.min, -0.5);
/// assert!((domain.max - 4.2).abs() < 1e-9);
/// ```
pub fn gap_axis(values: impl IntoIterator<Item = f64>, config: &LayoutConfig) -> Result<Domain> {
    ScaleDomain::new(values)
        .with_config(config)
        .force_include_zero(true)
        .compute()
}

/// Moves both bounds outward by `by`, saturating at `±f64::MAX`.
fn widen(lo: f64, hi: f64, by: f64) -> (f64, f64) {
    ((lo - by).max(-f64::MAX), (hi + by).min(f64::MAX))
}

/// Spreads equal bounds apart: by half their magnitude (or 1 around zero),
/// then by a flat 1 if they still coincide.
fn repair_degenerate(min: f64, max: f64) -> (f64, f64) {
    if min != max {
        return (min, max);
    }

    let delta = if min == 0.0 { 1.0 } else { 0.5 * min.abs() };
    let (lo, hi) = widen(min, max, delta);
    if lo != hi {
        debug!("repaired degenerate domain at {min} to [{lo}, {hi}]");
        return (lo, hi);
    }

    debug!("repaired degenerate domain at {min} with a flat unit spread");
    widen(min, max, 1.0)
}

/// Bounds of a time axis.
///
/// `min`/`max` are the data extents and drive tick placement; they may be
/// equal. [`TimeDomain::bounds_ms`] gives the strictly increasing bounds used
/// for positioning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeDomain {
    pub min: DateTime<Utc>,
    pub max: DateTime<Utc>,
}

impl TimeDomain {
    pub fn from_dates(dates: impl IntoIterator<Item = DateTime<Utc>>) -> Result<Self> {
        let mut dates = dates.into_iter();
        let first = dates.next().ok_or(ChartError::EmptySamples)?;
        let (min, max) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(Self { min, max })
    }

    pub fn span(&self) -> Duration {
        self.max - self.min
    }

    pub fn is_instant(&self) -> bool {
        self.min == self.max
    }

    /// Positioning bounds in epoch milliseconds.
    ///
    /// A single date is centered in a two-day window.
    pub fn bounds_ms(&self) -> (f64, f64) {
        let (min, max) = if self.is_instant() {
            (self.min - Duration::days(1), self.max + Duration::days(1))
        } else {
            (self.min, self.max)
        };
        (min.timestamp_millis() as f64, max.timestamp_millis() as f64)
    }
}
