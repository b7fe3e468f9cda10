//! # Fabric heat loss
//!
//! The physics lives behind [`HeatLossModel`]. [`HeatLossCalculator`] only
//! wires the stock's area/U-value columns into the model's column contract
//! and checks that one value per dwelling comes back.

use crate::domain::{BuildingStock, FabricComponent};
use crate::error::{Result, RetrofitError};
use itertools::izip;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Junction correction applied on top of plane-element heat loss
pub const THERMAL_BRIDGING_FACTOR: f64 = 0.05;

/// Area and U-value columns of one fabric component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ElementColumns {
    /// m²
    pub areas: Vec<f64>,
    /// W/m²K
    pub uvalues: Vec<f64>,
}

/// Column contract handed to a heat-loss model, one entry per dwelling
#[derive(Debug, Clone, PartialEq)]
pub struct FabricInputs {
    pub roof: ElementColumns,
    pub wall: ElementColumns,
    pub floor: ElementColumns,
    pub window: ElementColumns,
    pub door: ElementColumns,
    pub thermal_bridging_factor: f64,
}

impl FabricInputs {
    pub fn from_stock(stock: &BuildingStock) -> Self {
        let columns = |component: FabricComponent| ElementColumns {
            areas: stock.areas(component),
            uvalues: stock.uvalues(component),
        };
        Self {
            roof: columns(FabricComponent::Roof),
            wall: columns(FabricComponent::Wall),
            floor: columns(FabricComponent::Floor),
            window: columns(FabricComponent::Window),
            door: columns(FabricComponent::Door),
            thermal_bridging_factor: THERMAL_BRIDGING_FACTOR,
        }
    }

    /// Number of dwellings
    pub fn len(&self) -> usize {
        self.wall.areas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn elements(&self) -> [&ElementColumns; 5] {
        [&self.roof, &self.wall, &self.floor, &self.window, &self.door]
    }
}

/// Annual heat loss per dwelling from fabric columns
#[cfg_attr(test, mockall::automock)]
pub trait HeatLossModel {
    /// kWh/yr, one value per dwelling in input order
    fn annual_heat_loss(&self, inputs: &FabricInputs) -> Result<Vec<f64>>;
}

/// Steady-state fabric model with a degree-day annualisation.
///
/// Heat loss coefficient (W/K) is `Σ A·U + bridging · Σ A` over the five
/// components; annual loss is `W/K × degree days × hours per day / 1000`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeDayModel {
    /// Heating degree days (K·day/yr)
    pub heating_degree_days: f64,
    pub hours_per_day: f64,
}

impl Default for DegreeDayModel {
    fn default() -> Self {
        Self {
            heating_degree_days: 2100.0,
            hours_per_day: 24.0,
        }
    }
}

impl DegreeDayModel {
    /// Fabric heat loss coefficient (W/K) per dwelling
    pub fn fabric_heat_loss_w_k(&self, inputs: &FabricInputs) -> Vec<f64> {
        let mut plane = vec![0.0; inputs.len()];
        let mut exposed_area = vec![0.0; inputs.len()];
        for element in inputs.elements() {
            for (plane_w_k, exposed, area, uvalue) in izip!(
                plane.iter_mut(),
                exposed_area.iter_mut(),
                &element.areas,
                &element.uvalues
            ) {
                *plane_w_k += area * uvalue;
                *exposed += area;
            }
        }
        plane
            .into_iter()
            .zip(exposed_area)
            .map(|(plane, exposed)| plane + inputs.thermal_bridging_factor * exposed)
            .collect()
    }

    /// Convert W/K into kWh/yr
    pub fn annualise(&self, heat_loss_w_k: f64) -> f64 {
        heat_loss_w_k * self.heating_degree_days * self.hours_per_day / 1000.0
    }
}

impl HeatLossModel for DegreeDayModel {
    fn annual_heat_loss(&self, inputs: &FabricInputs) -> Result<Vec<f64>> {
        Ok(self
            .fabric_heat_loss_w_k(inputs)
            .into_iter()
            .map(|w_k| self.annualise(w_k))
            .collect())
    }
}

/// Stock-level wrapper around a [`HeatLossModel`]
#[derive(Debug, Clone, Default)]
pub struct HeatLossCalculator<M> {
    model: M,
}

impl<M: HeatLossModel> HeatLossCalculator<M> {
    pub fn new(model: M) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Annual heat loss (kWh/yr) per dwelling
    pub fn compute_annual_heat_loss(&self, stock: &BuildingStock) -> Result<Vec<f64>> {
        let inputs = FabricInputs::from_stock(stock);
        let heat_loss = self.model.annual_heat_loss(&inputs)?;
        if heat_loss.len() != stock.len() {
            return Err(RetrofitError::validation(
                "heat_loss",
                format!(
                    "model returned {} values for {} dwellings",
                    heat_loss.len(),
                    stock.len()
                ),
            ));
        }
        debug!(
            dwellings = stock.len(),
            total_kwh = heat_loss.iter().sum::<f64>(),
            "computed annual fabric heat loss"
        );
        Ok(heat_loss)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stock::tests::sample_stock;

    #[test]
    fn test_inputs_follow_stock_columns() {
        let stock = sample_stock();
        let inputs = FabricInputs::from_stock(&stock);
        assert_eq!(inputs.len(), 3);
        assert_eq!(inputs.wall.uvalues, vec![0.6, 0.4, 1.2]);
        assert_eq!(inputs.window.areas, vec![16.0, 16.0, 16.0]);
        assert_eq!(inputs.thermal_bridging_factor, 0.05);
    }

    #[test]
    fn test_degree_day_model_single_dwelling() {
        let stock = sample_stock();
        let model = DegreeDayModel::default();
        let inputs = FabricInputs::from_stock(&stock);
        let w_k = model.fabric_heat_loss_w_k(&inputs);
        // roof 50*0.4 + wall 70*0.6 + floor 50*0.6 + window 16*2.8 + door 2*3.0
        let plane = 20.0 + 42.0 + 30.0 + 44.8 + 6.0;
        let bridging = 0.05 * (50.0 + 70.0 + 50.0 + 16.0 + 2.0);
        assert!((w_k[0] - (plane + bridging)).abs() < 1e-9);
        assert!((model.annualise(100.0) - 5040.0).abs() < 1e-9);
    }

    #[test]
    fn test_calculator_passes_columns_to_model() {
        let stock = sample_stock();
        let mut model = MockHeatLossModel::new();
        model
            .expect_annual_heat_loss()
            .withf(|inputs| {
                inputs.len() == 3
                    && inputs.thermal_bridging_factor == THERMAL_BRIDGING_FACTOR
                    && inputs.wall.uvalues == vec![0.6, 0.4, 1.2]
            })
            .times(1)
            .returning(|inputs| Ok(vec![1000.0; inputs.len()]));

        let calculator = HeatLossCalculator::new(model);
        let heat_loss = calculator.compute_annual_heat_loss(&stock).unwrap();
        assert_eq!(heat_loss, vec![1000.0; 3]);
    }

    #[test]
    fn test_calculator_rejects_wrong_length() {
        let mut model = MockHeatLossModel::new();
        model
            .expect_annual_heat_loss()
            .returning(|_| Ok(vec![1.0]));
        let err = HeatLossCalculator::new(model)
            .compute_annual_heat_loss(&sample_stock())
            .unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_lower_uvalue_lowers_heat_loss() {
        let stock = sample_stock();
        let post = stock
            .with_uvalues(FabricComponent::Wall, &[0.2, 0.2, 0.2])
            .unwrap();
        let calculator = HeatLossCalculator::new(DegreeDayModel::default());
        let pre_loss = calculator.compute_annual_heat_loss(&stock).unwrap();
        let post_loss = calculator.compute_annual_heat_loss(&post).unwrap();
        for (pre, post) in pre_loss.iter().zip(&post_loss) {
            assert!(post < pre);
        }
    }
}
