//! Historical volatility ("elasticity") per unit.

mod cache;
mod estimator;
mod source;

pub use cache::ElasticityCache;
pub use estimator::{ElasticityParams, estimate_elasticity};
pub use source::{ElasticitySource, StoreElasticity};
