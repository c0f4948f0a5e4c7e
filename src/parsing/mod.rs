//! Judge response parsing.
//!
//! Judges are asked for a JSON object `{"verdict", "confidence", "reason"}` but answer in
//! loosely structured text: fenced code blocks, numeric strings, out-of-range scores,
//! verdicts phrased in natural language. [`ResponseParser`] normalizes all of that into a
//! bounded [`JudgeResponse`] and never fails outright.

pub mod error;
pub mod parser;
pub mod types;


pub use error::ParseError;
pub use parser::{DEFAULT_CONFIDENCE, DEFAULT_REASON, DEFAULT_VERDICT, ResponseParser};
pub use types::{JudgeResponse, JudgeVerdict, clamp_unit};
