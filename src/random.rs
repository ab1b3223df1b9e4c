//! Bounded random generator
//!
//! Supplies the randomized delays and payload lengths for the sleepms
//! endpoint. One instance is shared across all in-flight requests; the
//! internal mutex keeps simultaneous sampling uncorrelated and race-free.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Mutex;

use crate::error::HandlerError;

const LETTERS: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub struct BoundedRng {
    inner: Mutex<StdRng>,
}

impl BoundedRng {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Deterministic instance for tests.
    #[cfg(test)]
    pub fn with_seed(seed: u64) -> Self {
        Self {
            inner: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Uniform integer in `[min, max)`. `min == max` yields that value.
    /// Negative bounds or `min > max` are rejected.
    pub fn sample_int(&self, min: i64, max: i64) -> Result<i64, HandlerError> {
        if min < 0 || max < 0 {
            return Err(HandlerError::InvalidInput(format!(
                "negative range bound: min={min}, max={max}"
            )));
        }
        if min > max {
            return Err(HandlerError::InvalidInput(format!(
                "inverted range: min={min} > max={max}"
            )));
        }
        if min == max {
            return Ok(min);
        }
        let mut rng = self.inner.lock().expect("rng mutex poisoned");
        Ok(rng.gen_range(min..max))
    }

    /// String of exactly `len` ASCII letters; `len == 0` gives `""`.
    pub fn sample_string(&self, len: usize) -> String {
        let mut rng = self.inner.lock().expect("rng mutex poisoned");
        (0..len)
            .map(|_| char::from(LETTERS[rng.gen_range(0..LETTERS.len())]))
            .collect()
    }
}

impl Default for BoundedRng {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_int_degenerate_range() {
        let rng = BoundedRng::with_seed(7);
        for _ in 0..10 {
            assert_eq!(rng.sample_int(5, 5).unwrap(), 5);
        }
        assert_eq!(rng.sample_int(0, 0).unwrap(), 0);
    }

    #[test]
    fn test_sample_int_within_bounds() {
        let rng = BoundedRng::with_seed(42);
        for _ in 0..1000 {
            let v = rng.sample_int(5, 10).unwrap();
            assert!((5..10).contains(&v), "value {v} escaped [5, 10)");
        }
    }

    #[test]
    fn test_sample_int_rejects_negative() {
        let rng = BoundedRng::with_seed(1);
        assert!(rng.sample_int(-1, 10).is_err());
        assert!(rng.sample_int(0, -1).is_err());
        assert!(rng.sample_int(-5, -1).is_err());
    }

    #[test]
    fn test_sample_int_rejects_inverted() {
        let rng = BoundedRng::with_seed(1);
        assert!(rng.sample_int(10, 5).is_err());
    }

    #[test]
    fn test_sample_int_seeded_determinism() {
        let a = BoundedRng::with_seed(99);
        let b = BoundedRng::with_seed(99);
        let seq_a: Vec<i64> = (0..20).map(|_| a.sample_int(0, 1000).unwrap()).collect();
        let seq_b: Vec<i64> = (0..20).map(|_| b.sample_int(0, 1000).unwrap()).collect();
        assert_eq!(seq_a, seq_b);
    }

    #[test]
    fn test_sample_string_empty() {
        let rng = BoundedRng::with_seed(3);
        assert_eq!(rng.sample_string(0), "");
    }

    #[test]
    fn test_sample_string_length_and_charset() {
        let rng = BoundedRng::with_seed(3);
        for len in [1, 16, 255] {
            let s = rng.sample_string(len);
            assert_eq!(s.len(), len);
            assert!(s.chars().all(|c| c.is_ascii_alphabetic()));
        }
    }
}
