use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::prompt;

/// Input modalities a judge can handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modality {
    #[serde(rename = "text")]
    Text,
    #[serde(rename = "text+image", alias = "text_image", alias = "vision")]
    TextImage,
}

impl Modality {
    pub fn supports_image(&self) -> bool {
        matches!(self, Modality::TextImage)
    }
}

impl std::str::FromStr for Modality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "text+image" | "text_image" | "vision" => Ok(Self::TextImage),
            _ => Err(format!("Unknown judge modality: {}", s)),
        }
    }
}

/// Static description of one configured judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeSpec {
    /// Provider model identifier, also used as the judge id.
    pub id: String,
    pub modality: Modality,
    /// Reliability weight used by aggregation; `0` keeps the judge out of the vote.
    #[serde(alias = "reliability_weight")]
    pub weight: f64,
}

impl JudgeSpec {
    pub fn new(id: impl Into<String>, modality: Modality, weight: f64) -> Self {
        Self {
            id: id.into(),
            modality,
            weight,
        }
    }
}

/// One question to one judge. Built once per request per eligible judge.
#[derive(Debug, Clone)]
pub struct JudgeQuery {
    pub judge_id: String,
    pub subject_text: String,
    /// Present only when the judge supports images and the request carried one.
    pub image: Option<Arc<[u8]>>,
    pub supports_image: bool,
}

impl JudgeQuery {
    pub fn image(&self) -> Option<&[u8]> {
        self.image.as_deref()
    }

    /// Prompt matching the inputs actually attached to this query.
    pub fn prompt(&self) -> String {
        let text = self.subject_text.trim();
        match (self.image.is_some(), text.is_empty()) {
            (true, true) => prompt::image_only_prompt(),
            (true, false) => prompt::text_image_prompt(text),
            (false, _) => prompt::text_prompt(text),
        }
    }
}
