use super::types::FabricComponent;
use crate::error::{from_validation_errors, Result, RetrofitError};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Retrofit policy for one fabric component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct RetrofitPolicy {
    /// U-value after retrofit (W/m²K)
    #[validate(range(exclusive_min = 0.0))]
    pub target_uvalue: f64,

    /// Dwellings at or below this U-value are never retrofitted (W/m²K)
    #[validate(range(min = 0.0))]
    pub threshold_uvalue: f64,

    /// Share of eligible dwellings retrofitted, in percent (0-100)
    #[validate(range(min = 0.0, max = 100.0))]
    pub percentage_retrofitted: f64,

    /// Lowest likely cost (€/m²)
    #[validate(range(min = 0.0))]
    pub lower_bound_cost: f64,

    /// Highest likely cost (€/m²)
    #[validate(range(min = 0.0))]
    pub upper_bound_cost: f64,

    /// Area of a typical element, used only for cost hints (m²)
    #[validate(range(min = 0.0))]
    pub typical_area: f64,
}

impl RetrofitPolicy {
    /// Default policy for a component. `percentage_retrofitted` starts at 0,
    /// so the default run changes nothing.
    pub fn default_for(component: FabricComponent) -> Self {
        match component {
            FabricComponent::Roof => Self {
                target_uvalue: 0.13,
                threshold_uvalue: 0.5,
                percentage_retrofitted: 0.0,
                lower_bound_cost: 5.0,
                upper_bound_cost: 30.0,
                typical_area: 50.0,
            },
            FabricComponent::Window => Self {
                target_uvalue: 0.2,
                threshold_uvalue: 0.5,
                percentage_retrofitted: 0.0,
                lower_bound_cost: 30.0,
                upper_bound_cost: 150.0,
                typical_area: 16.0,
            },
            // Wall defaults also serve floor and door, which are never retrofitted
            _ => Self {
                target_uvalue: 0.2,
                threshold_uvalue: 0.5,
                percentage_retrofitted: 0.0,
                lower_bound_cost: 50.0,
                upper_bound_cost: 300.0,
                typical_area: 70.0,
            },
        }
    }

    pub fn with_percentage(mut self, percentage_retrofitted: f64) -> Self {
        self.percentage_retrofitted = percentage_retrofitted;
        self
    }

    /// Retrofitted share as a fraction in [0, 1]
    pub fn fraction(&self) -> f64 {
        self.percentage_retrofitted / 100.0
    }

    /// Cost of retrofitting a typical element, as (lowest, highest) in €
    pub fn typical_cost_range(&self) -> (f64, f64) {
        (
            self.typical_area * self.lower_bound_cost,
            self.typical_area * self.upper_bound_cost,
        )
    }

    /// Check ranges, naming the component in the error
    pub fn check(&self, component: FabricComponent) -> Result<()> {
        let values = [
            self.target_uvalue,
            self.threshold_uvalue,
            self.percentage_retrofitted,
            self.lower_bound_cost,
            self.upper_bound_cost,
            self.typical_area,
        ];
        if values.iter().any(|v| !v.is_finite()) {
            return Err(RetrofitError::validation(
                component.to_string(),
                "policy values must be finite",
            ));
        }
        self.validate()
            .map_err(|errors| from_validation_errors(component.to_string(), errors))?;
        if self.lower_bound_cost > self.upper_bound_cost {
            tracing::warn!(
                %component,
                lower = self.lower_bound_cost,
                upper = self.upper_bound_cost,
                "lower cost bound exceeds upper cost bound"
            );
        }
        Ok(())
    }
}

/// One policy per retrofittable component
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrofitPolicies {
    pub wall: RetrofitPolicy,
    pub roof: RetrofitPolicy,
    pub window: RetrofitPolicy,
}

impl Default for RetrofitPolicies {
    fn default() -> Self {
        Self {
            wall: RetrofitPolicy::default_for(FabricComponent::Wall),
            roof: RetrofitPolicy::default_for(FabricComponent::Roof),
            window: RetrofitPolicy::default_for(FabricComponent::Window),
        }
    }
}

impl RetrofitPolicies {
    /// Policies in reporting order (wall, roof, window)
    pub fn iter(&self) -> impl Iterator<Item = (FabricComponent, &RetrofitPolicy)> {
        [
            (FabricComponent::Wall, &self.wall),
            (FabricComponent::Roof, &self.roof),
            (FabricComponent::Window, &self.window),
        ]
        .into_iter()
    }

    /// Set the same retrofitted percentage on every component
    pub fn with_uniform_percentage(mut self, percentage_retrofitted: f64) -> Self {
        self.wall.percentage_retrofitted = percentage_retrofitted;
        self.roof.percentage_retrofitted = percentage_retrofitted;
        self.window.percentage_retrofitted = percentage_retrofitted;
        self
    }

    /// Validate every policy before anything is computed
    pub fn check(&self) -> Result<()> {
        self.iter()
            .try_for_each(|(component, policy)| policy.check(component))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_per_component() {
        let policies = RetrofitPolicies::default();
        assert_eq!(policies.wall.target_uvalue, 0.2);
        assert_eq!(policies.wall.lower_bound_cost, 50.0);
        assert_eq!(policies.wall.upper_bound_cost, 300.0);
        assert_eq!(policies.roof.target_uvalue, 0.13);
        assert_eq!(policies.roof.upper_bound_cost, 30.0);
        assert_eq!(policies.window.lower_bound_cost, 30.0);
        assert_eq!(policies.window.upper_bound_cost, 150.0);
        for (_, policy) in policies.iter() {
            assert_eq!(policy.threshold_uvalue, 0.5);
            assert_eq!(policy.percentage_retrofitted, 0.0);
        }
        assert!(policies.check().is_ok());
    }

    #[test]
    fn test_iteration_order() {
        let components: Vec<FabricComponent> =
            RetrofitPolicies::default().iter().map(|(c, _)| c).collect();
        assert_eq!(
            components,
            vec![FabricComponent::Wall, FabricComponent::Roof, FabricComponent::Window]
        );
    }

    #[test]
    fn test_fraction_and_typical_cost() {
        let policy = RetrofitPolicy::default_for(FabricComponent::Wall).with_percentage(25.0);
        assert!((policy.fraction() - 0.25).abs() < 1e-12);
        assert_eq!(policy.typical_cost_range(), (3500.0, 21000.0));
    }

    #[test]
    fn test_percentage_out_of_range_names_component() {
        let policies = RetrofitPolicies {
            roof: RetrofitPolicy::default_for(FabricComponent::Roof).with_percentage(120.0),
            ..Default::default()
        };
        let err = policies.check().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("roof"));
    }

    #[test]
    fn test_negative_cost_rejected() {
        let mut policy = RetrofitPolicy::default_for(FabricComponent::Window);
        policy.lower_bound_cost = -5.0;
        assert!(policy.check(FabricComponent::Window).is_err());
    }

    #[test]
    fn test_zero_target_uvalue_rejected() {
        let mut policy = RetrofitPolicy::default_for(FabricComponent::Wall);
        policy.target_uvalue = 0.0;
        assert!(policy.check(FabricComponent::Wall).is_err());
    }

    #[test]
    fn test_inverted_cost_bounds_only_warn() {
        let mut policy = RetrofitPolicy::default_for(FabricComponent::Wall);
        policy.lower_bound_cost = 400.0;
        assert!(policy.check(FabricComponent::Wall).is_ok());
    }
}
