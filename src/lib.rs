//! Credence library crate (used by the server binary and integration tests).
//!
//! A submitted item (text plus optional image) is scored by two independent signal
//! sources and reconciled into one verdict:
//!
//! - [`judge`]: concurrent fan-out to external LLM judges, one attempt each, bounded by a
//!   per-judge timeout.
//! - [`parsing`]: turns each judge's loosely structured answer into a [`JudgeResponse`].
//! - [`aggregation`]: reliability-weighted vote of the judges into an [`AggregatedJudgement`].
//! - [`classifier`]: a local BERT model behind [`LocalClassifierAdapter`].
//! - [`fusion`]: the four-branch merge of both sources under a [`WeightConfig`].
//! - [`pipeline`]: [`DetectionService`] wiring the stages together per request.
//!
//! Every degradation (judge timeout, malformed answer, missing model) is recorded on the
//! result instead of failing the request.
//!
//! ## Test/Mock Support
//! Mock implementations are available behind `#[cfg(any(test, feature = "mock"))]`.

pub mod aggregation;
pub mod classifier;
pub mod config;
pub mod constants;
pub mod fusion;
pub mod gateway;
pub mod judge;
pub mod parsing;
pub mod pipeline;

pub use aggregation::{AggregatedJudgement, AggregationEngine, CategoricalVerdict};
pub use classifier::{
    BertFakeNewsModel, ClassifierConfig, ClassifierInput, InferenceError, LocalClassification,
    LocalClassifierAdapter, ProbabilityModel, Verdict,
};
#[cfg(any(test, feature = "mock"))]
pub use classifier::MockProbabilityModel;
pub use config::{Config, ConfigError, JudgeTransport};
pub use fusion::{FusionEngine, FusionResult, FusionStrategy, WeightConfig};
pub use judge::{
    Judge, JudgeClient, JudgePool, JudgeQuery, JudgeSpec, Modality, OpenRouterJudgeClient,
    TransportError,
};
#[cfg(any(test, feature = "mock"))]
pub use judge::{MockJudgeClient, MockReply};
pub use parsing::{JudgeResponse, JudgeVerdict, ParseError, ResponseParser};
pub use pipeline::{
    Analysis, DetectionMode, DetectionReport, DetectionRequest, DetectionService, PipelineError,
};
