//! Chooses which dwellings receive a retrofit.
//!
//! Only dwellings whose U-value is strictly above the threshold are eligible.
//! A uniform sample without replacement of `round(fraction * eligible)` of them
//! is drawn from a generator seeded per call, so the same seed and the same
//! eligible set always give the same mask.

use crate::error::{Result, RetrofitError};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Random state used when none is configured
pub const DEFAULT_SEED: u64 = 42;

/// Seeded retrofit selector. Holds no generator state between calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetrofitSelector {
    seed: u64,
}

impl Default for RetrofitSelector {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RetrofitSelector {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Selection mask aligned with `uvalues`
    pub fn select(&self, uvalues: &[f64], threshold: f64, fraction: f64) -> Result<Vec<bool>> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        select_with_rng(uvalues, threshold, fraction, &mut rng)
    }
}

/// Selection mask for one explicit seed
pub fn select(uvalues: &[f64], threshold: f64, fraction: f64, seed: u64) -> Result<Vec<bool>> {
    RetrofitSelector::new(seed).select(uvalues, threshold, fraction)
}

/// Selection mask drawn from a caller-supplied generator
pub fn select_with_rng<R: Rng + ?Sized>(
    uvalues: &[f64],
    threshold: f64,
    fraction: f64,
    rng: &mut R,
) -> Result<Vec<bool>> {
    if !(fraction.is_finite() && (0.0..=1.0).contains(&fraction)) {
        return Err(RetrofitError::validation(
            "selector",
            format!("fraction must be within [0, 1], got {}", fraction),
        ));
    }
    if !threshold.is_finite() {
        return Err(RetrofitError::validation(
            "selector",
            format!("threshold must be finite, got {}", threshold),
        ));
    }

    let eligible: Vec<usize> = uvalues
        .iter()
        .enumerate()
        .filter(|(_, uvalue)| **uvalue > threshold)
        .map(|(index, _)| index)
        .collect();

    let mut mask = vec![false; uvalues.len()];
    let amount = sample_size(fraction, eligible.len());
    if amount == 0 {
        return Ok(mask);
    }

    for position in rand::seq::index::sample(rng, eligible.len(), amount).iter() {
        mask[eligible[position]] = true;
    }
    Ok(mask)
}

/// Number of eligible dwellings to retrofit. Halves round to even.
pub fn sample_size(fraction: f64, eligible: usize) -> usize {
    let amount = (fraction * eligible as f64).round_ties_even();
    (amount.max(0.0) as usize).min(eligible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_fraction_selects_nothing() {
        let mask = select(&[0.6, 0.9, 1.2, 0.1], 0.5, 0.0, 7).unwrap();
        assert_eq!(mask, vec![false; 4]);
    }

    #[test]
    fn test_full_fraction_selects_eligible_set() {
        let uvalues = [0.6, 0.4, 0.5, 2.1, 0.51];
        let mask = select(&uvalues, 0.5, 1.0, 42).unwrap();
        assert_eq!(mask, vec![true, false, false, true, true]);
    }

    #[test]
    fn test_threshold_is_strict() {
        let mask = select(&[0.5, 0.5], 0.5, 1.0, 42).unwrap();
        assert_eq!(mask, vec![false, false]);
    }

    #[test]
    fn test_empty_eligible_set() {
        assert_eq!(select(&[0.1, 0.2], 0.5, 0.7, 1).unwrap(), vec![false, false]);
        assert!(select(&[], 0.5, 1.0, 1).unwrap().is_empty());
    }

    #[test]
    fn test_half_fraction_sample_size() {
        let uvalues: Vec<f64> = (0..10).map(|i| 1.0 + i as f64).collect();
        let mask = select(&uvalues, 0.5, 0.5, 42).unwrap();
        assert_eq!(mask.iter().filter(|m| **m).count(), 5);
    }

    #[test]
    fn test_sample_size_rounds_half_to_even() {
        assert_eq!(sample_size(0.5, 3), 2); // 1.5 -> 2
        assert_eq!(sample_size(0.5, 5), 2); // 2.5 -> 2
        assert_eq!(sample_size(0.25, 10), 2); // 2.5 -> 2
        assert_eq!(sample_size(0.5, 7), 4); // 3.5 -> 4
        assert_eq!(sample_size(1.0, 0), 0);
    }

    #[test]
    fn test_invalid_fraction_rejected() {
        assert!(select(&[1.0], 0.5, 1.5, 42).unwrap_err().is_validation());
        assert!(select(&[1.0], 0.5, -0.1, 42).is_err());
        assert!(select(&[1.0], 0.5, f64::NAN, 42).is_err());
    }

    #[test]
    fn test_selector_is_stateless_between_calls() {
        let uvalues: Vec<f64> = (0..50).map(|i| 0.5 + i as f64 * 0.05).collect();
        let selector = RetrofitSelector::new(3);
        let first = selector.select(&uvalues, 0.5, 0.3).unwrap();
        let second = selector.select(&uvalues, 0.5, 0.3).unwrap();
        assert_eq!(first, second);
    }

    proptest! {
        #[test]
        fn prop_same_seed_same_mask(
            uvalues in proptest::collection::vec(0.05f64..3.0, 0..200),
            threshold in 0.0f64..2.0,
            fraction in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let first = select(&uvalues, threshold, fraction, seed).unwrap();
            let second = select(&uvalues, threshold, fraction, seed).unwrap();
            prop_assert_eq!(&first, &second);
        }

        #[test]
        fn prop_mask_only_covers_eligible(
            uvalues in proptest::collection::vec(0.05f64..3.0, 0..200),
            threshold in 0.0f64..2.0,
            fraction in 0.0f64..=1.0,
            seed in any::<u64>(),
        ) {
            let mask = select(&uvalues, threshold, fraction, seed).unwrap();
            prop_assert_eq!(mask.len(), uvalues.len());
            let eligible = uvalues.iter().filter(|u| **u > threshold).count();
            let selected = mask.iter().filter(|m| **m).count();
            prop_assert_eq!(selected, sample_size(fraction, eligible));
            for (selected, uvalue) in mask.iter().zip(&uvalues) {
                if *selected {
                    prop_assert!(*uvalue > threshold);
                }
            }
        }
    }
}
