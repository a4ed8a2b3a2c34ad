//! How many options an answer must contain.

use std::ops::RangeInclusive;

/// Cardinality constraint for a pick.
///
/// Bounds are always inclusive and resolved against the number of options
/// offered, so `All` and `AtLeast` adapt to the offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PickCount {
    /// Exactly `n` options.
    Exact(usize),
    /// Between `min` and `max` options, inclusive.
    Range(usize, usize),
    /// At least `min` options, up to every option offered.
    AtLeast(usize),
    /// Every option offered.
    All,
}

impl PickCount {
    /// Inclusive `(min, max)` bounds for an offer of `option_count` options.
    #[must_use]
    pub fn bounds(self, option_count: usize) -> (usize, usize) {
        match self {
            PickCount::Exact(n) => (n, n),
            PickCount::Range(min, max) => (min, max),
            PickCount::AtLeast(min) => (min, option_count),
            PickCount::All => (option_count, option_count),
        }
    }

    /// Whether an answer of `len` items satisfies the bounds.
    #[must_use]
    pub fn admits(self, len: usize, option_count: usize) -> bool {
        let (min, max) = self.bounds(option_count);
        min <= len && len <= max
    }

    /// Whether an empty answer can satisfy this count.
    #[must_use]
    pub fn allows_none(self, option_count: usize) -> bool {
        self.bounds(option_count).0 == 0
    }
}

impl Default for PickCount {
    fn default() -> Self {
        PickCount::Exact(1)
    }
}

impl From<usize> for PickCount {
    fn from(n: usize) -> Self {
        PickCount::Exact(n)
    }
}

impl From<(usize, usize)> for PickCount {
    fn from((min, max): (usize, usize)) -> Self {
        PickCount::Range(min, max)
    }
}

impl From<RangeInclusive<usize>> for PickCount {
    fn from(range: RangeInclusive<usize>) -> Self {
        PickCount::Range(*range.start(), *range.end())
    }
}
