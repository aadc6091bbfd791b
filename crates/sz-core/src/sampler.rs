//! Weighted Sampler
//!
//! Draws one value from a finite weighted set. Excluded values get an
//! effective weight of zero for that single draw.

use serde::Serialize;

use crate::error::{SzError, SzResult};
use crate::rng::GameRng;

/// A validated `(value, weight)` table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeightedSampler<T> {
    entries: Vec<(T, f64)>,
    total: f64,
}

impl<T: Copy + PartialEq> WeightedSampler<T> {
    /// Build from pairs. Weights must be finite and `>= 0` with a positive total.
    pub fn new(entries: Vec<(T, f64)>) -> SzResult<Self> {
        if entries.is_empty() {
            return Err(SzError::InvalidWeights("empty weight table".into()));
        }
        if let Some((i, w)) = entries
            .iter()
            .enumerate()
            .find(|(_, (_, w))| !w.is_finite() || *w < 0.0)
            .map(|(i, (_, w))| (i, *w))
        {
            return Err(SzError::InvalidWeights(format!(
                "weight #{} is {}",
                i, w
            )));
        }

        let total: f64 = entries.iter().map(|(_, w)| w).sum();
        if total <= 0.0 {
            return Err(SzError::InvalidWeights("weights sum to zero".into()));
        }

        Ok(Self { entries, total })
    }

    /// Pair values with a parallel weight list
    pub fn from_parallel(values: &[T], weights: &[f64]) -> SzResult<Self> {
        if values.len() != weights.len() {
            return Err(SzError::InvalidWeights(format!(
                "{} values but {} weights",
                values.len(),
                weights.len()
            )));
        }
        Self::new(values.iter().copied().zip(weights.iter().copied()).collect())
    }

    /// Draw with no exclusions
    pub fn sample(&self, rng: &mut GameRng) -> T {
        // total > 0 is checked at construction
        self.sample_excluding(&[], rng)
            .unwrap_or(self.entries[self.entries.len() - 1].0)
    }

    /// Draw with `exclude` zeroed for this draw only.
    ///
    /// When every remaining weight is zero the last non-excluded value wins.
    /// `None` only if every value is excluded.
    pub fn sample_excluding(&self, exclude: &[T], rng: &mut GameRng) -> Option<T> {
        let effective: f64 = self
            .entries
            .iter()
            .filter(|(v, _)| !exclude.contains(v))
            .map(|(_, w)| w)
            .sum();

        let last_open = || {
            self.entries
                .iter()
                .rev()
                .find(|(v, _)| !exclude.contains(v))
                .map(|(v, _)| *v)
        };

        if effective <= 0.0 {
            return last_open();
        }

        let mut remainder = rng.unit() * effective;
        for (value, weight) in &self.entries {
            if *weight <= 0.0 || exclude.contains(value) {
                continue;
            }
            remainder -= weight;
            if remainder <= 0.0 {
                return Some(*value);
            }
        }

        // Float drift on the final subtraction
        self.entries
            .iter()
            .rev()
            .find(|(v, w)| *w > 0.0 && !exclude.contains(v))
            .map(|(v, _)| *v)
    }

    /// Configured probability of `value` with no exclusions
    pub fn probability(&self, value: T) -> f64 {
        self.entries
            .iter()
            .filter(|(v, _)| *v == value)
            .map(|(_, w)| w)
            .sum::<f64>()
            / self.total
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(T, f64)] {
        &self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> WeightedSampler<char> {
        WeightedSampler::new(vec![('a', 1.0), ('b', 3.0), ('c', 6.0)]).unwrap()
    }

    #[test]
    fn test_rejects_bad_tables() {
        assert!(WeightedSampler::<u8>::new(vec![]).is_err());
        assert!(WeightedSampler::new(vec![(1u8, 0.0), (2, 0.0)]).is_err());
        assert!(WeightedSampler::new(vec![(1u8, -1.0), (2, 5.0)]).is_err());
        assert!(WeightedSampler::new(vec![(1u8, f64::NAN)]).is_err());
        assert!(WeightedSampler::from_parallel(&[1u8, 2], &[1.0]).is_err());
    }

    #[test]
    fn test_probability() {
        let s = abc();
        assert!((s.probability('a') - 0.1).abs() < 1e-12);
        assert!((s.probability('c') - 0.6).abs() < 1e-12);
        assert_eq!(s.probability('z'), 0.0);
    }

    #[test]
    fn test_exclusion_never_returned() {
        let s = abc();
        let mut rng = GameRng::seeded(1);

        for _ in 0..2000 {
            let v = s.sample_excluding(&['c'], &mut rng).unwrap();
            assert_ne!(v, 'c');
        }
    }

    #[test]
    fn test_all_excluded() {
        let s = abc();
        let mut rng = GameRng::seeded(2);
        assert_eq!(s.sample_excluding(&['a', 'b', 'c'], &mut rng), None);
    }

    #[test]
    fn test_zero_effective_weight_falls_back_to_last_open() {
        let s = WeightedSampler::new(vec![('x', 0.0), ('y', 0.0), ('z', 5.0)]).unwrap();
        let mut rng = GameRng::seeded(3);

        // Only zero-weight values remain; the last one that is still open wins
        assert_eq!(s.sample_excluding(&['z'], &mut rng), Some('y'));
    }

    #[test]
    fn test_zero_weight_skipped_in_walk() {
        let s = WeightedSampler::new(vec![('x', 0.0), ('y', 1.0)]).unwrap();
        let mut rng = GameRng::seeded(4);

        for _ in 0..500 {
            assert_eq!(s.sample(&mut rng), 'y');
        }
    }
}
