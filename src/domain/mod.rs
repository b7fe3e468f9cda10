pub mod policy;
pub mod rating;
pub mod stock;
pub mod types;

pub use policy::*;
pub use rating::*;
pub use stock::*;
pub use types::*;
