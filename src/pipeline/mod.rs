//! Request orchestration: local classifier and judge fan-out in parallel, then
//! aggregation and fusion.

pub mod error;
pub mod service;
pub mod types;


pub use error::PipelineError;
pub use service::DetectionService;
pub use types::{Analysis, DetectionMode, DetectionReport, DetectionRequest};
