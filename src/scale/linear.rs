use std::marker::PhantomData;

use num_traits::Float;

use super::{Scale, Tick, TickIter, util};

type TickGenerator<D, N> = Box<dyn Fn(&Linear<D, N>) -> TickIter<D>>;

/// Number of ticks produced by the default generator.
pub const DEFAULT_TICK_COUNT: usize = 5;

/// Affine mapping between a numeric domain and `[0, 1]`.
///
/// `D` is the domain type (data values), `N` the normalized type; both are
/// usually `f64`.
///
/// Values outside the domain are not clamped: they map below 0 or above 1
/// so callers can clip geometry themselves. Fixed-size markers use
/// [`Linear::normalize_clamped_opt`].
///
/// # Examples
///
/// ```rust
/// use bioscale::{Scale, scale::Linear};
///
/// let scale = Linear::<f64, f64>::new(60.0, 110.0);
///
/// assert_eq!(scale.normalize(&60.0), 0.0);
/// assert_eq!(scale.normalize(&85.0), 0.5);
/// assert_eq!(scale.normalize(&135.0), 1.5);
/// assert_eq!(scale.denormalize(0.2), 70.0);
/// ```
///
/// ## Ticks
///
/// The default generator emits five evenly spaced ticks labelled with one or
/// two fractional digits:
///
/// ```rust
/// use bioscale::{Scale, scale::Linear};
///
/// let scale = Linear::<f64, f64>::new(8.0, 32.0);
/// let labels: Vec<_> = scale.ticks().into_iter().map(|t| t.label).collect();
///
/// assert_eq!(labels, ["8.0", "14.0", "20.0", "26.0", "32.0"]);
/// ```
pub struct Linear<D, N = f64>
where
    D: Float,
    N: Float,
{
    min: D,
    max: D,
    ticks: TickGenerator<D, N>,
    normalized: PhantomData<N>,
}

/// `count` evenly spaced ticks from `min` to `max`.
///
/// The first tick sits exactly on `min` and the last exactly on `max`. A
/// zero-width domain yields at most one tick.
///
/// ```
/// use bioscale::scale::linear::even_ticks;
///
/// let values: Vec<_> = even_ticks(0.0, 1.0, 3).map(|t| t.value).collect();
/// assert_eq!(values, [0.0, 0.5, 1.0]);
/// assert_eq!(even_ticks(4.0, 4.0, 5).count(), 1);
/// assert_eq!(even_ticks(0.0, 1.0, 0).count(), 0);
/// ```
pub fn even_ticks<D: Float + 'static>(min: D, max: D, count: usize) -> TickIter<D> {
    let count = if min == max { count.min(1) } else { count };
    let intervals = D::from(count.saturating_sub(1)).unwrap_or_else(D::one);

    TickIter::new((0..count).map(move |index| {
        // Computed from the index, never accumulated.
        let value = match index {
            0 => min,
            i if i + 1 == count => max,
            i => {
                let t = D::from(i).unwrap_or_else(D::zero) / intervals;
                lerp(min, max, t)
            }
        };
        Tick::new(value, util::format_value(value))
    }))
}

/// Blend of the endpoints; finite for any finite `min` and `max`.
fn lerp<D: Float>(min: D, max: D, t: D) -> D {
    min * (D::one() - t) + max * t
}

impl<D, N> Linear<D, N>
where
    D: Float + 'static,
    N: Float + 'static,
{
    /// Scale over `[min, max]` with [`DEFAULT_TICK_COUNT`] even ticks.
    pub fn new(min: D, max: D) -> Self {
        Self::with_tick_count(min, max, DEFAULT_TICK_COUNT)
    }

    /// Scale emitting `count` evenly spaced ticks.
    ///
    /// ```
    /// use bioscale::{Scale, scale::Linear};
    ///
    /// let scale = Linear::<f64, f64>::with_tick_count(0.0, 1.0, 3);
    /// let values: Vec<_> = scale.ticks().into_iter().map(|t| t.value).collect();
    /// assert_eq!(values, [0.0, 0.5, 1.0]);
    /// ```
    pub fn with_tick_count(min: D, max: D, count: usize) -> Self {
        Self::new_with_tick_generator(min, max, move |scale| {
            even_ticks(scale.min, scale.max, count)
        })
    }

    /// Scale whose ticks come from `generator`.
    ///
    /// ```
    /// use bioscale::{Scale, scale::{Linear, TickIter}};
    ///
    /// let scale = Linear::<f64, f64>::new_with_tick_generator(0.0, 100.0, |_| TickIter::empty());
    /// assert!(scale.ticks().is_empty());
    /// ```
    pub fn new_with_tick_generator<F>(min: D, max: D, generator: F) -> Self
    where
        F: Fn(&Self) -> TickIter<D> + 'static,
    {
        Self {
            min,
            max,
            ticks: Box::new(generator),
            normalized: PhantomData,
        }
    }

    /// Like [`Linear::new_with_tick_generator`], for generators that build
    /// a vector.
    ///
    /// ```
    /// use bioscale::{Scale, scale::{Linear, Tick}};
    ///
    /// let scale = Linear::<f64, f64>::new_with_tick_fn(70.0, 100.0, |_| {
    ///     vec![Tick::new(70.0, "low"), Tick::new(100.0, "high")]
    /// });
    /// assert_eq!(scale.ticks()[1].label, "high");
    /// ```
    pub fn new_with_tick_fn<F>(min: D, max: D, tick_fn: F) -> Self
    where
        F: Fn(&Self) -> Vec<Tick<D>> + 'static,
    {
        Self::new_with_tick_generator(min, max, move |scale| TickIter::from(tick_fn(scale)))
    }
}

impl<D, N> Linear<D, N>
where
    D: Float,
    N: Float,
{
    /// Half the domain width; finite even when the domain spans the whole
    /// type.
    fn half_span(&self) -> D {
        let two = D::one() + D::one();
        self.max / two - self.min / two
    }

    /// Normalized position clamped to `[0, 1]`.
    pub fn normalize_clamped_opt(&self, value: &D) -> Option<N> {
        self.normalize_opt(value)
            .map(|t| t.max(N::zero()).min(N::one()))
    }
}

impl<D, N> Scale for Linear<D, N>
where
    D: Float,
    N: Float,
{
    type Domain = D;
    type Normalized = N;

    fn domain(&self) -> (&D, &D) {
        (&self.min, &self.max)
    }

    fn normalize_opt(&self, value: &D) -> Option<N> {
        let half_span = self.half_span();
        if half_span.is_zero() {
            return None;
        }
        let two = D::one() + D::one();
        let half_offset = *value / two - self.min / two;
        Some(N::from(half_offset)? / N::from(half_span)?)
    }

    fn denormalize_opt(&self, t: N) -> Option<D> {
        Some(lerp(self.min, self.max, D::from(t)?))
    }

    fn tick_iter(&self) -> TickIter<D> {
        (self.ticks)(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_domain_onto_unit_interval() {
        let scale = Linear::<f64, f64>::new(70.0, 110.0);

        assert_eq!(scale.normalize(&70.0), 0.0);
        assert_eq!(scale.normalize(&80.0), 0.25);
        assert_eq!(scale.normalize(&90.0), 0.5);
        assert_eq!(scale.normalize(&110.0), 1.0);
    }

    #[test]
    fn single_precision_scale() {
        let scale = Linear::<f32, f32>::new(-10.0, 10.0);

        assert_eq!(scale.normalize(&-10.0), 0.0);
        assert_eq!(scale.normalize(&0.0), 0.5);
        assert_eq!(scale.denormalize(1.0), 10.0);
    }

    #[test]
    fn values_outside_the_domain_extrapolate() {
        let scale = Linear::<f64, f64>::new(60.0, 110.0);

        assert_eq!(scale.normalize(&160.0), 2.0);
        assert_eq!(scale.normalize(&35.0), -0.5);
    }

    #[test]
    fn clamped_normalization() {
        let scale = Linear::<f64, f64>::new(60.0, 110.0);

        assert_eq!(scale.normalize_clamped_opt(&160.0), Some(1.0));
        assert_eq!(scale.normalize_clamped_opt(&35.0), Some(0.0));
        assert_eq!(scale.normalize_clamped_opt(&85.0), Some(0.5));
    }

    #[test]
    fn zero_span_has_no_position() {
        let scale = Linear::<f64, f64>::new(5.0, 5.0);
        assert_eq!(scale.normalize_opt(&5.0), None);
        assert_eq!(scale.normalize_clamped_opt(&5.0), None);
    }

    #[test]
    fn ticks_are_evenly_spaced_around_zero() {
        let scale = Linear::<f64, f64>::new(-2.0, 2.0);
        let values: Vec<_> = scale.ticks().into_iter().map(|t| t.value).collect();

        assert_eq!(values, [-2.0, -1.0, 0.0, 1.0, 2.0]);
    }

    #[test]
    fn last_tick_lands_on_max() {
        let ticks = Linear::<f64, f64>::new(0.1, 0.7).ticks();

        assert_eq!(ticks.len(), DEFAULT_TICK_COUNT);
        assert_eq!(ticks[0].value, 0.1);
        assert_eq!(ticks[4].value, 0.7);
        assert!(ticks.windows(2).all(|pair| pair[1].value > pair[0].value));
    }

    #[test]
    fn single_precision_tick_labels() {
        let scale = Linear::<f32, f32>::new(0.0, 100.0);
        let labels: Vec<_> = scale.ticks().into_iter().map(|t| t.label).collect();

        assert_eq!(labels, ["0.0", "25.0", "50.0", "75.0", "100.0"]);
    }

    #[test]
    fn tick_count_edge_cases() {
        assert!(Linear::<f64, f64>::with_tick_count(0.0, 1.0, 0).ticks().is_empty());
        assert_eq!(Linear::<f64, f64>::with_tick_count(0.0, 1.0, 1).ticks().len(), 1);
        assert_eq!(Linear::<f64, f64>::new(3.0, 3.0).ticks().len(), 1);
    }

    #[test]
    fn full_f64_range_maps_finitely() {
        let scale = Linear::<f64, f64>::new(-f64::MAX, f64::MAX);

        assert_eq!(scale.normalize(&0.0), 0.5);
        assert_eq!(scale.normalize(&f64::MAX), 1.0);
        assert_eq!(scale.denormalize(1.0), f64::MAX);

        let ticks = scale.ticks();
        assert!(ticks.iter().all(|t| t.value.is_finite()));
        assert_eq!(ticks[2].value, 0.0);
    }

    #[test]
    fn mixed_domain_and_normalized_types() {
        let scale = Linear::<f64, f32>::new(40.0, 50.0);

        let t: f32 = scale.normalize(&45.0);
        assert_eq!(t, 0.5f32);

        let age: f64 = scale.denormalize(0.5f32);
        assert_eq!(age, 45.0);
    }
}
