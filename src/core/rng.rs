//! Deterministic random number generation for rules programs and deciders.
//!
//! ## Properties
//!
//! - **Deterministic**: Same seed produces identical shuffles and samples
//! - **Forkable**: Fallback deciders draw from their own branch so they never
//!   perturb the engine's sequence
//! - **Resumable**: A stream position can be captured and resumed later
//!
//! ```
//! use tabletop_engine::core::GameRng;
//!
//! let mut a = GameRng::new(42);
//! let mut b = GameRng::new(42);
//! assert_eq!(a.random_sample(&[1, 2, 3, 4, 5], 3), b.random_sample(&[1, 2, 3, 4, 5], 3));
//! ```

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Seeded RNG used for shuffling locations and sampling options.
///
/// Uses ChaCha8 for speed while keeping sequences stable across platforms.
#[derive(Clone, Debug)]
pub struct GameRng {
    inner: ChaCha8Rng,
    seed: u64,
    fork_counter: u64,
}

impl GameRng {
    /// A stream seeded with `seed`.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            inner: ChaCha8Rng::seed_from_u64(seed),
            seed,
            fork_counter: 0,
        }
    }

    /// The seed this stream was created from.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Split off a child stream.
    ///
    /// The child's seed depends only on this stream's seed and how many
    /// children it has already produced, never on how much it has drawn.
    #[must_use]
    pub fn fork(&mut self) -> Self {
        self.fork_counter += 1;
        let fork_seed = self.seed.wrapping_add(self.fork_counter.wrapping_mul(0x9E3779B97F4A7C15));
        Self::new(fork_seed)
    }

    /// A float in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.inner.gen::<f64>()
    }

    /// An integer in `[min, max)`. Returns `min` when the range is empty.
    pub fn random_int(&mut self, min: i64, max: i64) -> i64 {
        if max <= min {
            return min;
        }
        self.inner.gen_range(min..max)
    }

    /// An index in `[0, n)`; the single-argument form of `random_int`.
    ///
    /// Returns 0 when `n == 0`.
    pub fn random_below(&mut self, n: usize) -> usize {
        if n == 0 {
            return 0;
        }
        self.inner.gen_range(0..n)
    }

    /// Fisher-Yates shuffle in place.
    pub fn shuffle<T>(&mut self, slice: &mut [T]) {
        for i in (1..slice.len()).rev() {
            let j = self.random_below(i + 1);
            slice.swap(i, j);
        }
    }

    /// Up to `k` distinct elements chosen uniformly without replacement.
    ///
    /// Returns every element (in random order) when `k >= items.len()`.
    pub fn random_sample<T: Clone>(&mut self, items: &[T], k: usize) -> Vec<T> {
        let mut pool = items.to_vec();
        let mut samples = Vec::with_capacity(k.min(pool.len()));
        while samples.len() < k && !pool.is_empty() {
            let i = self.random_below(pool.len());
            samples.push(pool.swap_remove(i));
        }
        samples
    }

    /// A uniformly chosen element, or `None` for an empty slice.
    #[must_use]
    pub fn choose<'a, T>(&mut self, items: &'a [T]) -> Option<&'a T> {
        if items.is_empty() {
            return None;
        }
        let i = self.random_below(items.len());
        items.get(i)
    }

    /// Capture the stream position.
    #[must_use]
    pub fn state(&self) -> GameRngState {
        GameRngState {
            seed: self.seed,
            word_pos: self.inner.get_word_pos(),
            fork_counter: self.fork_counter,
        }
    }

    /// Resume a stream captured with [`GameRng::state`].
    #[must_use]
    pub fn from_state(state: &GameRngState) -> Self {
        let mut inner = ChaCha8Rng::seed_from_u64(state.seed);
        inner.set_word_pos(state.word_pos);
        Self {
            inner,
            seed: state.seed,
            fork_counter: state.fork_counter,
        }
    }
}

/// Serializable RNG state.
///
/// Uses the ChaCha8 word position, so capture and restore cost the same no
/// matter how many numbers have been drawn.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRngState {
    /// Seed of the captured stream
    pub seed: u64,
    /// Words drawn so far
    pub word_pos: u128,
    /// Children split off so far
    pub fork_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_draws() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        for _ in 0..100 {
            assert_eq!(rng1.random_int(0, 1000), rng2.random_int(0, 1000));
        }
    }

    #[test]
    fn test_seeds_diverge() {
        let mut rng1 = GameRng::new(1);
        let mut rng2 = GameRng::new(2);

        let seq1: Vec<_> = (0..10).map(|_| rng1.random_int(0, 1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| rng2.random_int(0, 1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_random_int_bounds() {
        let mut rng = GameRng::new(3);
        let mut seen_changes = false;
        let mut last = rng.random_int(-5, 45);

        for _ in 0..1000 {
            let x = rng.random_int(-5, 45);
            assert!((-5..45).contains(&x));
            seen_changes |= x != last;
            last = x;
        }
        assert!(seen_changes);

        for _ in 0..1000 {
            assert!(rng.random_below(15) < 15);
        }
        assert_eq!(rng.random_int(4, 4), 4);
        assert_eq!(rng.random_below(0), 0);
    }

    #[test]
    fn test_random_in_unit_interval() {
        let mut rng = GameRng::new(9);
        for _ in 0..1000 {
            let x = rng.random();
            assert!((0.0..1.0).contains(&x));
        }
    }

    #[test]
    fn test_child_stream_diverges() {
        let mut rng = GameRng::new(42);
        let mut forked = rng.fork();

        let seq1: Vec<_> = (0..10).map(|_| rng.random_int(0, 1000)).collect();
        let seq2: Vec<_> = (0..10).map(|_| forked.random_int(0, 1000)).collect();

        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_child_seed_is_stable() {
        let mut rng1 = GameRng::new(42);
        let mut rng2 = GameRng::new(42);

        assert_eq!(rng1.fork().seed(), rng2.fork().seed());
    }

    #[test]
    fn test_shuffle_is_permutation() {
        let mut rng = GameRng::new(42);
        let mut data: Vec<i32> = (1..=10).collect();
        let original = data.clone();

        rng.shuffle(&mut data);

        assert_ne!(data, original);
        data.sort_unstable();
        assert_eq!(data, original);
    }

    #[test]
    fn test_sample_has_no_duplicates() {
        let mut rng = GameRng::new(5);
        let items = ["a", "h", "u", "k", "l", "p"];

        for _ in 0..200 {
            let mut sample = rng.random_sample(&items, 5);
            assert_eq!(sample.len(), 5);
            assert!(sample.iter().all(|x| items.contains(x)));
            sample.sort_unstable();
            sample.dedup();
            assert_eq!(sample.len(), 5);
        }
    }

    #[test]
    fn test_sample_larger_than_list() {
        let mut rng = GameRng::new(5);
        let mut sample = rng.random_sample(&[1, 2], 5);
        sample.sort_unstable();
        assert_eq!(sample, vec![1, 2]);

        assert!(rng.random_sample::<i32>(&[], 3).is_empty());
        assert!(rng.random_sample(&[1, 2, 3], 0).is_empty());
    }

    #[test]
    fn test_choose_from_slice() {
        let mut rng = GameRng::new(42);
        let items = [1, 2, 3, 4, 5];

        let chosen = rng.choose(&items);
        assert!(chosen.is_some_and(|c| items.contains(c)));

        let empty: [i32; 0] = [];
        assert!(rng.choose(&empty).is_none());
    }

    #[test]
    fn test_resume_from_state() {
        let mut rng = GameRng::new(42);
        for _ in 0..100 {
            rng.random_int(0, 1000);
        }

        let state = rng.state();
        let expected: Vec<_> = (0..10).map(|_| rng.random_int(0, 1000)).collect();

        let mut restored = GameRng::from_state(&state);
        let actual: Vec<_> = (0..10).map(|_| restored.random_int(0, 1000)).collect();

        assert_eq!(expected, actual);
    }
}
