//! # Fabric Retrofit
//!
//! Estimates the effect and cost of wall, roof and window retrofits across a
//! housing stock. Dwellings are classified into BER ratings, a seeded share of
//! eligible dwellings is retrofitted per component, fabric heat loss is
//! recomputed before and after, and the shift in energy value is reported
//! alongside lowest/highest likely costs.
//!
//! ```no_run
//! use fabric_retrofit::{BuildingStock, RetrofitOrchestrator, RetrofitPolicies};
//!
//! let stock = BuildingStock::from_reader(std::fs::File::open("stock.json")?)?;
//! let policies = RetrofitPolicies::default().with_uniform_percentage(50.0);
//! let report = RetrofitOrchestrator::with_seed(42).run(&stock, &policies)?;
//! println!("{}", report.to_markdown());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod retrofit;
pub mod telemetry;

pub use domain::{
    classify_band, classify_rating, BerBand, BerRating, BuildingStock, Dwelling, FabricComponent,
    RetrofitPolicies, RetrofitPolicy,
};
pub use error::{DataQualityError, RetrofitError};
pub use retrofit::{
    DegreeDayModel, HeatLossCalculator, HeatLossModel, RetrofitOrchestrator, RetrofitReport,
    RetrofitSelector,
};
