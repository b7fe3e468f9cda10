use crate::domain::RetrofitPolicies;
use crate::retrofit::{DegreeDayModel, DEFAULT_SEED};
use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub heat_loss: DegreeDayModel,
    pub policies: RetrofitPolicies,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Random state for retrofit selection
    pub seed: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self { seed: DEFAULT_SEED }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Defaults, then the TOML file if present, then `RETROFIT__*` variables
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed("RETROFIT__").split("__"));
        let config: Config = figment.extract()?;
        config.policies.check()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn test_defaults_without_file() {
        Jail::expect_with(|_jail| {
            let config = Config::load_from("missing.toml").map_err(|e| e.to_string())?;
            assert_eq!(config, Config::default());
            assert_eq!(config.simulation.seed, 42);
            assert_eq!(config.policies.roof.target_uvalue, 0.13);
            Ok(())
        });
    }

    #[test]
    fn test_file_then_env_layering() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "retrofit.toml",
                r#"
                [simulation]
                seed = 11

                [policies.wall]
                percentage_retrofitted = 40.0
                upper_bound_cost = 250.0
                "#,
            )?;
            jail.set_env("RETROFIT__SIMULATION__SEED", "7");
            jail.set_env("RETROFIT__HEAT_LOSS__HEATING_DEGREE_DAYS", "2500");

            let config = Config::load_from("retrofit.toml").map_err(|e| e.to_string())?;
            assert_eq!(config.simulation.seed, 7);
            assert_eq!(config.policies.wall.percentage_retrofitted, 40.0);
            assert_eq!(config.policies.wall.upper_bound_cost, 250.0);
            assert_eq!(config.policies.wall.lower_bound_cost, 50.0);
            assert_eq!(config.heat_loss.heating_degree_days, 2500.0);
            assert_eq!(config.heat_loss.hours_per_day, 24.0);
            Ok(())
        });
    }

    #[test]
    fn test_invalid_policy_rejected_on_load() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "retrofit.toml",
                r#"
                [policies.window]
                percentage_retrofitted = 140.0
                "#,
            )?;
            assert!(Config::load_from("retrofit.toml").is_err());
            Ok(())
        });
    }

    #[test]
    fn test_toml_round_trip_of_defaults() {
        let text = Config::default().to_toml().unwrap();
        assert!(text.contains("[policies.wall]"));
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed, Config::default());
    }
}
