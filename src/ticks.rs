//! Axis tick generation.
//!
//! Both constructors return a [`Linear`] scale whose tick generator emits
//! the axis ticks, so the same scale positions data and labels the axis.
//! Time axes work in epoch milliseconds.

use chrono::{DateTime, Utc};
use log::trace;

use crate::config::LayoutConfig;
use crate::domain::{Domain, TimeDomain};
use crate::layout::TextAnchor;
use crate::scale::linear::even_ticks;
use crate::scale::{Linear, Scale, Tick, TickIter, util};

/// Whether a value axis draws an emphasized zero line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroLine {
    #[default]
    Plain,
    /// Emphasize zero when the domain straddles it.
    Emphasized,
}

/// Label granularity for temporal ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// Year, month and day, used when every tick shows the same date.
    Full,
    /// Month and two-digit year, for spans longer than the configured days.
    MonthYear,
    /// Month and day.
    MonthDay,
}

impl DateFormat {
    pub fn for_span(span_days: i64, long_span_days: i64, instant: bool) -> Self {
        if instant {
            Self::Full
        } else if span_days > long_span_days {
            Self::MonthYear
        } else {
            Self::MonthDay
        }
    }

    fn pattern(self) -> &'static str {
        match self {
            Self::Full => "%b %-d, %y",
            Self::MonthYear => "%b %y",
            Self::MonthDay => "%b %-d",
        }
    }

    pub fn format(self, date: &DateTime<Utc>) -> String {
        date.format(self.pattern()).to_string()
    }
}

/// Value axis scale with `numeric_tick_count` evenly spaced ticks.
///
/// With [`ZeroLine::Emphasized`] and a domain straddling zero, any ordinary
/// tick within tolerance of zero is replaced by a single emphasized zero
/// tick.
///
/// ```
/// use bioscale::{Domain, LayoutConfig, Scale, ticks::{value_scale, ZeroLine}};
///
/// let domain = Domain { min: -1.0, max: 3.0 };
/// let scale = value_scale(&domain, &LayoutConfig::default(), ZeroLine::Emphasized);
/// let ticks = scale.ticks();
///
/// assert_eq!(ticks.len(), 5);
/// assert!(ticks[1].emphasized && ticks[1].value == 0.0);
/// assert_eq!(ticks.iter().filter(|t| t.label == "0.0").count(), 1);
/// ```
pub fn value_scale(domain: &Domain, config: &LayoutConfig, zero_line: ZeroLine) -> Linear<f64, f64> {
    let count = config.numeric_tick_count;
    let emphasize = zero_line == ZeroLine::Emphasized && domain.straddles_zero();

    Linear::new_with_tick_fn(domain.min, domain.max, move |scale| {
        let (&min, &max) = scale.domain();
        let mut ticks: Vec<_> = even_ticks(min, max, count).collect();
        if emphasize {
            emphasize_zero(&mut ticks, max - min);
        }
        ticks
    })
}

fn emphasize_zero(ticks: &mut Vec<Tick<f64>>, span: f64) {
    let tolerance = util::tolerance_from_span(&span);
    let before = ticks.len();
    ticks.retain(|tick| tick.value.abs() > tolerance);
    if ticks.len() != before {
        trace!("suppressed {} tick(s) coinciding with the zero line", before - ticks.len());
    }

    let at = ticks.partition_point(|tick| tick.value < 0.0);
    ticks.insert(at, Tick::emphasized(0.0, util::format_value(0.0)));
}

/// Number of temporal ticks that fit `pixel_width`.
///
/// ```
/// use bioscale::{LayoutConfig, ticks::time_tick_count};
///
/// let config = LayoutConfig::default();
/// assert_eq!(time_tick_count(520.0, &config), 5);
/// assert_eq!(time_tick_count(320.0, &config), 3);
/// assert_eq!(time_tick_count(90.0, &config), 2);
/// ```
pub fn time_tick_count(pixel_width: f64, config: &LayoutConfig) -> usize {
    let fitting = (pixel_width / config.time_tick_spacing_px).floor();
    let fitting = if fitting.is_finite() && fitting > 0.0 {
        fitting as usize
    } else {
        0
    };
    fitting.clamp(config.min_time_ticks, config.max_time_ticks)
}

/// Time axis scale over [`TimeDomain::bounds_ms`].
///
/// Ticks are interpolated between the data extents; when both extents
/// coincide every tick sits on that date. The first tick is start-anchored
/// and the last end-anchored so labels stay inside the chart.
pub fn time_scale(domain: &TimeDomain, pixel_width: f64, config: &LayoutConfig) -> Linear<f64, f64> {
    let (lo, hi) = domain.bounds_ms();
    let count = time_tick_count(pixel_width, config);
    let format = DateFormat::for_span(
        domain.span().num_days(),
        config.long_span_days,
        domain.is_instant(),
    );
    let (first, last) = (domain.min, domain.max);

    Linear::new_with_tick_generator(lo, hi, move |_scale| {
        TickIter::new((0..count).map(move |index| {
            let date = interpolate(first, last, index, count);
            let anchor = if index == 0 {
                TextAnchor::Start
            } else if index + 1 == count {
                TextAnchor::End
            } else {
                TextAnchor::Middle
            };
            Tick::new(date.timestamp_millis() as f64, format.format(&date)).with_anchor(anchor)
        }))
    })
}

fn interpolate(first: DateTime<Utc>, last: DateTime<Utc>, index: usize, count: usize) -> DateTime<Utc> {
    if count < 2 || index == 0 {
        return first;
    }
    if index + 1 == count {
        return last;
    }
    let span_ms = (last - first).num_milliseconds() as f64;
    let offset = span_ms * index as f64 / (count - 1) as f64;
    first + chrono::Duration::milliseconds(offset.round() as i64)
}
