//! # Retrofit simulation engine
//!
//! - **selector**: seeded choice of which eligible dwellings are retrofitted
//! - **mutator**: post-retrofit U-value series
//! - **cost**: per-dwelling and portfolio cost bounds
//! - **heat_loss**: column wiring around a pluggable heat-loss model
//! - **orchestrator**: the full wall/roof/window pipeline
//! - **report**: cost and breakdown tables for presentation

pub mod cost;
pub mod heat_loss;
pub mod mutator;
pub mod orchestrator;
pub mod report;
pub mod selector;

pub use cost::{aggregate_millions, estimate, CostBounds};
pub use heat_loss::{
    DegreeDayModel, ElementColumns, FabricInputs, HeatLossCalculator, HeatLossModel,
    THERMAL_BRIDGING_FACTOR,
};
pub use orchestrator::{ComponentOutcome, RetrofitOrchestrator, RetrofitReport};
pub use report::{BreakdownComparison, CostRow, CostTable, ReportSummary};
pub use selector::{RetrofitSelector, DEFAULT_SEED};
