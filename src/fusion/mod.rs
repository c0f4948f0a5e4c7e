//! Final merge of the local classification and the aggregated judge opinion.

pub mod engine;
pub mod types;


pub use engine::FusionEngine;
pub use types::{FusionResult, FusionStrategy, WeightConfig};
