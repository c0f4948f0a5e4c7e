//! Weighted reduction of judge responses into one [`AggregatedJudgement`].
//!
//! Pure and deterministic: no I/O, no shared state. Only judges that answered and carry a
//! positive reliability weight contribute.

pub mod engine;
pub mod types;

#[cfg(test)]
mod tests;

pub use engine::{AggregationEngine, population_std_dev};
pub use types::{AggregatedJudgement, CategoricalVerdict};
