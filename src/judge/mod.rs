//! External judge fan-out.
//!
//! A [`JudgePool`] sends one [`JudgeQuery`] to every judge able to handle the request's
//! inputs, concurrently and with a per-judge timeout, and turns each answer (or failure)
//! into a [`JudgeResponse`](crate::parsing::JudgeResponse).

pub mod client;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod pool;
pub mod prompt;
pub mod types;


pub use client::{
    GenaiJudgeClient, JudgeClient, JudgeEndpoint, OpenRouterJudgeClient, image_data_url,
    image_mime,
};
pub use error::TransportError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockJudgeClient, MockReply};
pub use pool::{Judge, JudgePool};
pub use types::{JudgeQuery, JudgeSpec, Modality};
