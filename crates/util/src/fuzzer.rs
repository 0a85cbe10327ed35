use std::cell::RefCell;

use rand::seq::SliceRandom;
use rand::{rngs::OsRng, Rng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Lowercase ASCII letters, the default alphabet for random words.
pub const LOWERCASE: &str = "abcdefghijklmnopqrstuvwxyz";

/// Seeded source of random keys, words and ranges for tree tests.
///
/// Uses the xoshiro256** PRNG, so a fixed seed replays the same sequence.
///
/// ```
/// use search_forest_util::Fuzzer;
///
/// let fuzzer = Fuzzer::new(Some(7));
/// let keys = fuzzer.shuffled(1, 20);
/// assert_eq!(keys.len(), 20);
///
/// let (lo, hi) = fuzzer.random_range(10);
/// assert!(lo <= hi && hi < 10);
/// ```
pub struct Fuzzer {
    /// Seed the PRNG was created from. Print it when a ladder fails.
    pub seed: u64,
    rng: RefCell<Xoshiro256StarStar>,
}

impl Fuzzer {
    /// Creates a fuzzer, drawing a seed from `OsRng` when none is given.
    pub fn new(seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(|| OsRng.next_u64());
        Self {
            seed,
            rng: RefCell::new(Xoshiro256StarStar::seed_from_u64(seed)),
        }
    }

    /// Integer in `[min, max]`.
    pub fn random_int(&self, min: i64, max: i64) -> i64 {
        self.rng.borrow_mut().gen_range(min..=max)
    }

    pub fn random_bool(&self, probability: f64) -> bool {
        self.rng.borrow_mut().gen_bool(probability)
    }

    pub fn repeat<T, F>(&self, times: usize, mut callback: F) -> Vec<T>
    where
        F: FnMut() -> T,
    {
        (0..times).map(|_| callback()).collect()
    }

    /// Every integer in `[min, max]` exactly once, in random order.
    pub fn shuffled(&self, min: i64, max: i64) -> Vec<i64> {
        let mut keys: Vec<i64> = (min..=max).collect();
        keys.shuffle(&mut *self.rng.borrow_mut());
        keys
    }

    /// `len` integers drawn from `[min, max]`, repeats allowed.
    pub fn random_values(&self, len: usize, min: i64, max: i64) -> Vec<i64> {
        self.repeat(len, || self.random_int(min, max))
    }

    /// Inclusive index range `lo <= hi < len`. `len` must be non-zero.
    pub fn random_range(&self, len: usize) -> (usize, usize) {
        let mut rng = self.rng.borrow_mut();
        let a = rng.gen_range(0..len);
        let b = rng.gen_range(0..len);
        (a.min(b), a.max(b))
    }

    /// String of exactly `len` characters from `chars`.
    pub fn random_string(&self, len: usize, chars: &str) -> String {
        let chars: Vec<char> = chars.chars().collect();
        let mut rng = self.rng.borrow_mut();
        (0..len)
            .map(|_| chars[rng.gen_range(0..chars.len())])
            .collect()
    }

    /// Lowercase word with a length in `[min_len, max_len]`.
    pub fn random_word(&self, min_len: usize, max_len: usize) -> String {
        let len = self.rng.borrow_mut().gen_range(min_len..=max_len);
        self.random_string(len, LOWERCASE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_int_stays_in_range() {
        let fuzzer = Fuzzer::new(None);
        for _ in 0..100 {
            let n = fuzzer.random_int(1, 10);
            assert!((1..=10).contains(&n));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let a = Fuzzer::new(Some(42));
        let b = Fuzzer::new(Some(42));
        assert_eq!(a.shuffled(0, 50), b.shuffled(0, 50));
        assert_eq!(a.random_word(3, 8), b.random_word(3, 8));
    }

    #[test]
    fn shuffled_is_a_permutation() {
        let fuzzer = Fuzzer::new(Some(3));
        let mut keys = fuzzer.shuffled(-5, 5);
        keys.sort_unstable();
        assert_eq!(keys, (-5..=5).collect::<Vec<_>>());
    }

    #[test]
    fn random_range_is_ordered() {
        let fuzzer = Fuzzer::new(None);
        for _ in 0..100 {
            let (lo, hi) = fuzzer.random_range(7);
            assert!(lo <= hi && hi < 7);
        }
    }

    #[test]
    fn random_word_uses_lowercase() {
        let fuzzer = Fuzzer::new(None);
        for _ in 0..50 {
            let w = fuzzer.random_word(1, 6);
            assert!((1..=6).contains(&w.len()));
            assert!(w.chars().all(|c| c.is_ascii_lowercase()));
        }
    }
}
