use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::aggregation::AggregatedJudgement;
use crate::classifier::{LocalClassification, Verdict};
use crate::fusion::FusionResult;

/// Which inputs of a request are analysed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DetectionMode {
    /// Text only; any image is ignored.
    Text,
    /// Image only; any text is ignored.
    Image,
    #[default]
    Multimodal,
}

impl DetectionMode {
    pub fn uses_text(&self) -> bool {
        !matches!(self, DetectionMode::Image)
    }

    pub fn uses_image(&self) -> bool {
        !matches!(self, DetectionMode::Text)
    }
}

impl std::str::FromStr for DetectionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "image" => Ok(Self::Image),
            "multimodal" => Ok(Self::Multimodal),
            _ => Err(format!("Unknown detection mode: {}", s)),
        }
    }
}

/// One item submitted for credibility analysis.
#[derive(Debug, Clone, Default)]
pub struct DetectionRequest {
    pub title: Option<String>,
    pub content: String,
    pub image: Option<Vec<u8>>,
    pub mode: DetectionMode,
}

impl DetectionRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            mode: DetectionMode::Text,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_image(mut self, image: Vec<u8>) -> Self {
        self.image = Some(image);
        self
    }

    pub fn with_mode(mut self, mode: DetectionMode) -> Self {
        self.mode = mode;
        self
    }

    /// `title + " " + content`, trimmed; empty when the mode ignores text.
    pub fn subject_text(&self) -> String {
        if !self.mode.uses_text() {
            return String::new();
        }
        let title = self.title.as_deref().unwrap_or_default();
        format!("{} {}", title, self.content).trim().to_string()
    }

    /// Image bytes, when present and used by the mode.
    pub fn subject_image(&self) -> Option<&[u8]> {
        self.image
            .as_deref()
            .filter(|bytes| !bytes.is_empty() && self.mode.uses_image())
    }

    pub fn is_empty(&self) -> bool {
        self.subject_text().is_empty() && self.subject_image().is_none()
    }
}

/// The three signals behind a verdict, kept for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub local_model: LocalClassification,
    pub llm_verification: AggregatedJudgement,
    pub fusion: FusionResult,
}

/// Final, serializable record of one detection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
    pub id: Uuid,
    pub result: Verdict,
    pub confidence: f64,
    pub needs_manual_review: bool,
    pub analysis: Analysis,
    pub mode: DetectionMode,
    pub completed_at: DateTime<Utc>,
}
