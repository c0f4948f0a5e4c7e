use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    /// Neither a local model nor any judge is available; no request can be served.
    #[error("no signal source available: local model unavailable and no judges configured")]
    NoSignalSources,

    #[error("invalid fusion weights: {reason}")]
    InvalidWeights { reason: String },
}
