//! Local fake-news classifier.
//!
//! [`LocalClassifierAdapter`] turns one [`ProbabilityModel`] call into a
//! [`LocalClassification`]; any model failure degrades to `Unknown` with confidence `0`.

pub mod adapter;
pub mod bert;
pub mod config;
pub mod device;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod model;
pub mod tokenizer;
pub mod types;


pub use adapter::LocalClassifierAdapter;
pub use config::ClassifierConfig;
pub use error::InferenceError;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockProbabilityModel;
pub use model::{BertFakeNewsModel, ProbabilityModel, sigmoid};
pub use types::{ClassifierInput, LocalClassification, Verdict};
