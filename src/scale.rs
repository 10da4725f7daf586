//! Scales map domain values to a normalized `[0, 1]` position.
//!
//! A scale owns its domain bounds and a tick generator. The chart engine
//! builds one scale per axis from a computed [`Domain`](crate::Domain) and
//! hands both scales to a [`Transform`](crate::Transform) to obtain pixel
//! coordinates.

pub mod linear;
pub mod tick_iter;
pub mod util;

pub use linear::Linear;
pub use tick_iter::TickIter;

use serde::Serialize;

use crate::layout::TextAnchor;

/// A single axis tick: a position in domain units and its formatted label.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tick<D> {
    /// Position of the tick in domain units.
    pub value: D,
    /// Text shown next to the tick.
    pub label: String,
    /// Horizontal anchoring hint for the label.
    pub anchor: TextAnchor,
    /// Emphasized ticks (the zero line of gap charts) get a distinct style.
    pub emphasized: bool,
}

impl<D> Tick<D> {
    /// Creates an ordinary, centered tick.
    pub fn new(value: D, label: impl Into<String>) -> Self {
        Self {
            value,
            label: label.into(),
            anchor: TextAnchor::Middle,
            emphasized: false,
        }
    }

    /// Creates an emphasized tick.
    pub fn emphasized(value: D, label: impl Into<String>) -> Self {
        Self {
            emphasized: true,
            ..Self::new(value, label)
        }
    }

    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }
}

/// Mapping between a domain and the normalized `[0, 1]` range.
///
/// Every conversion comes in two flavours: `*_opt` returns `None` when the
/// numeric conversion fails, the plain variant unwraps.
pub trait Scale {
    /// Type of the values being mapped.
    type Domain;
    /// Type of the normalized position.
    type Normalized;

    /// Returns `(min, max)` exactly as configured.
    fn domain(&self) -> (&Self::Domain, &Self::Domain);

    /// Maps a domain value to its normalized position. Values outside the
    /// domain map outside `[0, 1]`.
    fn normalize_opt(&self, value: &Self::Domain) -> Option<Self::Normalized>;

    fn normalize(&self, value: &Self::Domain) -> Self::Normalized {
        self.normalize_opt(value).unwrap()
    }

    /// Maps a normalized position back into the domain.
    fn denormalize_opt(&self, t: Self::Normalized) -> Option<Self::Domain>;

    fn denormalize(&self, t: Self::Normalized) -> Self::Domain {
        self.denormalize_opt(t).unwrap()
    }

    /// Returns an iterator over this scale's ticks.
    fn tick_iter(&self) -> TickIter<Self::Domain>;

    /// Collects all ticks into a vector.
    fn ticks(&self) -> Vec<Tick<Self::Domain>> {
        self.tick_iter().collect()
    }
}
