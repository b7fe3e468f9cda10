//! Retrofit cost estimation.
//!
//! A retrofitted dwelling costs `unit_cost * area`; everything else costs 0.
//! Portfolio totals are reported in millions of euro.

use crate::error::{Result, RetrofitError};
use serde::{Deserialize, Serialize};

const TO_MILLIONS: f64 = 1e-6;

/// Per-dwelling cost (€) of retrofitting the selected dwellings
pub fn estimate(mask: &[bool], unit_cost: f64, areas: &[f64]) -> Result<Vec<f64>> {
    if mask.len() != areas.len() {
        return Err(RetrofitError::validation(
            "cost",
            format!(
                "mask length {} does not match area length {}",
                mask.len(),
                areas.len()
            ),
        ));
    }
    if !(unit_cost.is_finite() && unit_cost >= 0.0) {
        return Err(RetrofitError::validation(
            "cost",
            format!("unit cost must be >= 0, got {}", unit_cost),
        ));
    }
    if let Some(row) = areas.iter().position(|a| !(a.is_finite() && *a >= 0.0)) {
        return Err(RetrofitError::validation_at(
            "cost",
            row,
            format!("area must be >= 0, got {}", areas[row]),
        ));
    }

    Ok(mask
        .iter()
        .zip(areas)
        .map(|(selected, area)| if *selected { unit_cost * area } else { 0.0 })
        .collect())
}

/// Sum of per-dwelling costs in millions of euro
pub fn aggregate_millions(costs: &[f64]) -> f64 {
    costs.iter().sum::<f64>() * TO_MILLIONS
}

/// Lowest and highest likely cost of one component's retrofits (M€)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBounds {
    pub lower_millions: f64,
    pub upper_millions: f64,
}

impl CostBounds {
    pub fn estimate(
        mask: &[bool],
        areas: &[f64],
        lower_unit_cost: f64,
        upper_unit_cost: f64,
    ) -> Result<Self> {
        Ok(Self {
            lower_millions: aggregate_millions(&estimate(mask, lower_unit_cost, areas)?),
            upper_millions: aggregate_millions(&estimate(mask, upper_unit_cost, areas)?),
        })
    }
}

impl std::ops::Add for CostBounds {
    type Output = CostBounds;

    fn add(self, other: CostBounds) -> CostBounds {
        CostBounds {
            lower_millions: self.lower_millions + other.lower_millions,
            upper_millions: self.upper_millions + other.upper_millions,
        }
    }
}

impl std::iter::Sum for CostBounds {
    fn sum<I: Iterator<Item = CostBounds>>(iter: I) -> Self {
        iter.fold(CostBounds::default(), |acc, bounds| acc + bounds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_estimate_only_selected_dwellings() {
        let costs = estimate(&[true, false, true], 50.0, &[70.0, 70.0, 10.0]).unwrap();
        assert_eq!(costs, vec![3500.0, 0.0, 500.0]);
        assert!((costs.iter().sum::<f64>() - 50.0 * 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_aggregate_millions() {
        assert!((aggregate_millions(&[3500.0, 0.0]) - 0.0035).abs() < 1e-12);
        let none = estimate(&[false, false], 300.0, &[70.0, 90.0]).unwrap();
        assert_eq!(aggregate_millions(&none), 0.0);
        assert_eq!(aggregate_millions(&[]), 0.0);
    }

    #[test]
    fn test_negative_inputs_rejected() {
        assert!(estimate(&[true], -1.0, &[70.0]).unwrap_err().is_validation());
        let err = estimate(&[true, true], 5.0, &[70.0, -2.0]).unwrap_err();
        assert!(err.to_string().contains("row 1"));
    }

    #[test]
    fn test_length_mismatch_rejected() {
        assert!(estimate(&[true], 5.0, &[70.0, 20.0]).is_err());
    }

    #[test]
    fn test_cost_bounds_sum() {
        let wall = CostBounds::estimate(&[true, false], &[70.0, 70.0], 50.0, 300.0).unwrap();
        assert!((wall.lower_millions - 0.0035).abs() < 1e-12);
        assert!((wall.upper_millions - 0.021).abs() < 1e-12);

        let roof = CostBounds::estimate(&[true, true], &[50.0, 50.0], 5.0, 30.0).unwrap();
        let total: CostBounds = [wall, roof].into_iter().sum();
        assert!((total.lower_millions - 0.004).abs() < 1e-12);
        assert!((total.upper_millions - 0.024).abs() < 1e-12);
    }
}
