use super::Tick;

/// Ticks produced by a scale's tick generator.
///
/// Wraps any tick iterator so generators with different strategies share
/// one return type.
///
/// ```
/// use bioscale::scale::{Tick, TickIter};
///
/// let ticks = TickIter::from(vec![Tick::new(70.0, "70.0"), Tick::new(100.0, "100.0")]);
/// assert_eq!(ticks.map(|t| t.label).collect::<Vec<_>>(), ["70.0", "100.0"]);
///
/// assert_eq!(TickIter::<f64>::empty().count(), 0);
/// ```
pub struct TickIter<D> {
    inner: Box<dyn Iterator<Item = Tick<D>>>,
}

impl<D: 'static> TickIter<D> {
    pub fn new(iter: impl Iterator<Item = Tick<D>> + 'static) -> Self {
        Self {
            inner: Box::new(iter),
        }
    }

    pub fn empty() -> Self {
        Self::new(std::iter::empty())
    }
}

impl<D: 'static> From<Vec<Tick<D>>> for TickIter<D> {
    fn from(ticks: Vec<Tick<D>>) -> Self {
        Self::new(ticks.into_iter())
    }
}

impl<D> Iterator for TickIter<D> {
    type Item = Tick<D>;

    fn next(&mut self) -> Option<Tick<D>> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}
