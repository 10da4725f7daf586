//! Projection of chart values onto the canvas.
//!
//! Chart values are data units: epoch milliseconds along x, biomarker units
//! or years along y, with y growing upward. Screen coordinates are pixels
//! with the origin at the top-left corner and y growing downward.
//!
//! ```rust
//! use bioscale::{Transform, scale::Linear, ScreenRect, PlotPoint};
//!
//! let plot = ScreenRect { x: 40.0, y: 40.0, width: 520.0, height: 220.0 };
//! let time = Linear::<f64, f64>::new(0.0, 10.0);
//! let value = Linear::<f64, f64>::new(4.0, 6.0);
//! let transform = Transform::new(&plot, &time, &value);
//!
//! let low = transform.point(&PlotPoint::new(0.0, 4.0));
//! assert_eq!((low.x, low.y), (40.0, 260.0));
//!
//! let high = transform.point(&PlotPoint::new(10.0, 6.0));
//! assert_eq!((high.x, high.y), (560.0, 40.0));
//! ```

use num_traits::Float;
use serde::Serialize;

use crate::scale::Scale;

/// Axis-aligned pixel rectangle; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenRect<S = f64> {
    pub x: S,
    pub y: S,
    pub width: S,
    pub height: S,
}

impl<S: Float> ScreenRect<S> {
    pub fn right(&self) -> S {
        self.x + self.width
    }

    pub fn bottom(&self) -> S {
        self.y + self.height
    }

    /// Shrinks the rectangle by `amount` on every side. Width and height
    /// never go negative.
    pub fn inset(&self, amount: S) -> Self {
        let twice = amount + amount;
        Self {
            x: self.x + amount,
            y: self.y + amount,
            width: (self.width - twice).max(S::zero()),
            height: (self.height - twice).max(S::zero()),
        }
    }

    /// True when `point` lies inside or on the border.
    pub fn contains(&self, point: &ScreenPoint<S>) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScreenPoint<S = f64> {
    pub x: S,
    pub y: S,
}

impl<S> ScreenPoint<S> {
    pub const fn new(x: S, y: S) -> Self {
        Self { x, y }
    }
}

/// A value pair in chart units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlotPoint<D = f64> {
    pub x: D,
    pub y: D,
}

impl<D> PlotPoint<D> {
    pub const fn new(x: D, y: D) -> Self {
        Self { x, y }
    }
}

/// Maps chart values into a [`ScreenRect`] through one scale per axis.
///
/// The `*_opt` methods return `None` when a scale cannot normalize the
/// value (a zero-width domain) or a numeric conversion fails; their plain
/// counterparts unwrap. Values outside a scale's domain land outside the
/// rectangle.
#[derive(Clone, Copy)]
pub struct Transform<'a, D = f64, N = f64, S = f64> {
    rect: &'a ScreenRect<S>,
    x_scale: &'a dyn Scale<Domain = D, Normalized = N>,
    y_scale: &'a dyn Scale<Domain = D, Normalized = N>,
}

impl<'a, D, N, S> Transform<'a, D, N, S> {
    pub const fn new(
        rect: &'a ScreenRect<S>,
        x_scale: &'a dyn Scale<Domain = D, Normalized = N>,
        y_scale: &'a dyn Scale<Domain = D, Normalized = N>,
    ) -> Self {
        Self {
            rect,
            x_scale,
            y_scale,
        }
    }

    pub const fn rect(&self) -> &ScreenRect<S> {
        self.rect
    }
}

impl<D, N, S> Transform<'_, D, N, S>
where
    D: Float,
    N: Float,
    S: Float,
{
    /// Pixel column of `x`.
    pub fn x_opt(&self, x: &D) -> Option<S> {
        let t = S::from(self.x_scale.normalize_opt(x)?)?;
        Some(self.rect.x + t * self.rect.width)
    }

    pub fn x(&self, x: &D) -> S {
        self.x_opt(x).unwrap()
    }

    /// Pixel row of `y`; the domain minimum sits on the bottom edge.
    pub fn y_opt(&self, y: &D) -> Option<S> {
        let t = S::from(self.y_scale.normalize_opt(y)?)?;
        Some(self.rect.bottom() - t * self.rect.height)
    }

    pub fn y(&self, y: &D) -> S {
        self.y_opt(y).unwrap()
    }

    pub fn point_opt(&self, point: &PlotPoint<D>) -> Option<ScreenPoint<S>> {
        Some(ScreenPoint::new(self.x_opt(&point.x)?, self.y_opt(&point.y)?))
    }

    pub fn point(&self, point: &PlotPoint<D>) -> ScreenPoint<S> {
        self.point_opt(point).unwrap()
    }
}
