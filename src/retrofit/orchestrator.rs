//! # Retrofit Orchestrator
//!
//! Runs one policy submission across wall, roof and window:
//!
//! 1. total floor area per dwelling
//! 2. annual heat loss of the pre-retrofit stock
//! 3. per component: select → mutate U-values → estimate costs
//! 4. post-retrofit stock with the three mutated U-value columns
//! 5. annual heat loss of the post-retrofit stock
//! 6. energy value improvement = (pre - post heat loss) / floor area
//! 7. post energy value = pre energy value - improvement
//! 8. rating and band breakdowns before and after
//!
//! A dwelling with no usable floor area gets a NaN improvement and a data
//! quality entry; its energy value is carried over unchanged.

use super::cost::CostBounds;
use super::heat_loss::{DegreeDayModel, HeatLossCalculator, HeatLossModel};
use super::mutator;
use super::report::{render_markdown, BreakdownComparison, CostTable, ReportSummary};
use super::selector::{RetrofitSelector, DEFAULT_SEED};
use crate::domain::{
    band_breakdown, rating_breakdown, BerBand, BerRating, BuildingStock, FabricComponent,
    RetrofitPolicies, RetrofitPolicy,
};
use crate::error::{DataQualityError, Result};
use itertools::izip;
use tracing::{debug, info, info_span, warn};

/// Result of retrofitting one component
#[derive(Debug, Clone, PartialEq)]
pub struct ComponentOutcome {
    pub component: FabricComponent,
    /// Aligned with the stock; true where the dwelling is retrofitted
    pub mask: Vec<bool>,
    /// U-values after retrofit
    pub uvalues: Vec<f64>,
    pub costs: CostBounds,
}

impl ComponentOutcome {
    pub fn retrofitted(&self) -> usize {
        self.mask.iter().filter(|selected| **selected).count()
    }
}

/// Full output of one run
#[derive(Debug, Clone)]
pub struct RetrofitReport {
    pub pre_stock: BuildingStock,
    pub post_stock: BuildingStock,
    pub policies: RetrofitPolicies,
    pub outcomes: Vec<ComponentOutcome>,
    pub costs: CostTable,
    /// kWh/yr per dwelling
    pub pre_heat_loss: Vec<f64>,
    /// kWh/yr per dwelling
    pub post_heat_loss: Vec<f64>,
    /// kWh/m²/yr per dwelling, NaN where floor area is unusable
    pub energy_value_improvement: Vec<f64>,
    pub ratings: BreakdownComparison<BerRating>,
    pub bands: BreakdownComparison<BerBand>,
    pub data_quality: Vec<DataQualityError>,
}

impl RetrofitReport {
    pub fn outcome(&self, component: FabricComponent) -> Option<&ComponentOutcome> {
        self.outcomes.iter().find(|o| o.component == component)
    }

    pub fn summary(&self) -> ReportSummary<'_> {
        ReportSummary {
            dwellings: self.pre_stock.len(),
            retrofitted: self
                .outcomes
                .iter()
                .map(|o| (o.component, o.retrofitted()))
                .collect(),
            costs: &self.costs,
            ratings: &self.ratings,
            bands: &self.bands,
            data_quality: &self.data_quality,
        }
    }

    pub fn to_markdown(&self) -> String {
        render_markdown(&self.summary(), &self.policies)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&self.summary())
    }
}

/// Composes selector, mutator, cost estimator and heat-loss calculator
#[derive(Debug, Clone)]
pub struct RetrofitOrchestrator<M = DegreeDayModel> {
    calculator: HeatLossCalculator<M>,
    selector: RetrofitSelector,
}

impl RetrofitOrchestrator<DegreeDayModel> {
    /// Orchestrator using the built-in degree-day model
    pub fn with_seed(seed: u64) -> Self {
        Self::new(DegreeDayModel::default(), RetrofitSelector::new(seed))
    }
}

impl Default for RetrofitOrchestrator<DegreeDayModel> {
    fn default() -> Self {
        Self::with_seed(DEFAULT_SEED)
    }
}

impl<M: HeatLossModel> RetrofitOrchestrator<M> {
    pub fn new(model: M, selector: RetrofitSelector) -> Self {
        Self {
            calculator: HeatLossCalculator::new(model),
            selector,
        }
    }

    pub fn calculator(&self) -> &HeatLossCalculator<M> {
        &self.calculator
    }

    /// Select, mutate and cost one component against the unmodified stock
    pub fn retrofit_component(
        &self,
        stock: &BuildingStock,
        component: FabricComponent,
        policy: &RetrofitPolicy,
    ) -> Result<ComponentOutcome> {
        policy.check(component)?;

        let original = stock.uvalues(component);
        let areas = stock.areas(component);
        let mask = self
            .selector
            .select(&original, policy.threshold_uvalue, policy.fraction())?;
        let uvalues = mutator::apply(&original, &mask, policy.target_uvalue)?;
        let costs = CostBounds::estimate(
            &mask,
            &areas,
            policy.lower_bound_cost,
            policy.upper_bound_cost,
        )?;

        let outcome = ComponentOutcome {
            component,
            mask,
            uvalues,
            costs,
        };
        debug!(
            %component,
            retrofitted = outcome.retrofitted(),
            lower_millions = costs.lower_millions,
            upper_millions = costs.upper_millions,
            "component retrofit estimated"
        );
        Ok(outcome)
    }

    /// Run the full pipeline for one policy submission
    pub fn run(&self, stock: &BuildingStock, policies: &RetrofitPolicies) -> Result<RetrofitReport> {
        let span = info_span!("retrofit_run", dwellings = stock.len(), seed = self.selector.seed());
        let _guard = span.enter();

        // Reject the whole submission before computing anything
        policies.check()?;

        let pre_stock = stock.clone();
        let total_floor_areas = pre_stock.total_floor_areas();
        let pre_heat_loss = self.calculator.compute_annual_heat_loss(&pre_stock)?;

        let outcomes = policies
            .iter()
            .map(|(component, policy)| self.retrofit_component(&pre_stock, component, policy))
            .collect::<Result<Vec<_>>>()?;

        let mut post_stock = pre_stock.clone();
        for outcome in &outcomes {
            post_stock = post_stock.with_uvalues(outcome.component, &outcome.uvalues)?;
        }
        let post_heat_loss = self.calculator.compute_annual_heat_loss(&post_stock)?;

        let mut data_quality = Vec::new();
        let mut energy_value_improvement = Vec::with_capacity(pre_stock.len());
        let mut post_energy_values = Vec::with_capacity(pre_stock.len());
        for (row, (dwelling, pre_loss, post_loss, floor_area)) in izip!(
            pre_stock.iter(),
            &pre_heat_loss,
            &post_heat_loss,
            &total_floor_areas
        )
        .enumerate()
        {
            if floor_area.is_finite() && *floor_area > 0.0 {
                let improvement = (pre_loss - post_loss) / floor_area;
                energy_value_improvement.push(improvement);
                post_energy_values.push(dwelling.energy_value - improvement);
            } else {
                let issue = DataQualityError {
                    row,
                    small_area: dwelling.small_area.clone(),
                    reason: format!(
                        "total floor area is {}; energy value improvement is undefined",
                        floor_area
                    ),
                };
                warn!(%issue, "skipping energy value update");
                data_quality.push(issue);
                energy_value_improvement.push(f64::NAN);
                post_energy_values.push(dwelling.energy_value);
            }
        }
        let post_stock = post_stock.with_energy_values(&post_energy_values)?;

        let pre_energy_values = pre_stock.energy_values();
        let ratings = BreakdownComparison {
            pre: rating_breakdown(&pre_energy_values),
            post: rating_breakdown(&post_energy_values),
        };
        let bands = BreakdownComparison {
            pre: band_breakdown(&pre_energy_values),
            post: band_breakdown(&post_energy_values),
        };
        let costs = CostTable::from_outcomes(&outcomes);

        if let Some(total) = costs.total() {
            info!(
                lower_millions = total.lower_millions,
                upper_millions = total.upper_millions,
                data_quality_issues = data_quality.len(),
                "retrofit run complete"
            );
        }

        Ok(RetrofitReport {
            pre_stock,
            post_stock,
            policies: policies.clone(),
            outcomes,
            costs,
            pre_heat_loss,
            post_heat_loss,
            energy_value_improvement,
            ratings,
            bands,
            data_quality,
        })
    }
}
