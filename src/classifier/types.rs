use serde::{Deserialize, Serialize};

/// Local and final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Real,
    Fake,
    Unknown,
}

impl Verdict {
    /// Numeric fake score used by fusion (`Real=0`, `Fake=1`, `Unknown=0.5`).
    pub fn score(&self) -> f64 {
        match self {
            Verdict::Real => 0.0,
            Verdict::Fake => 1.0,
            Verdict::Unknown => 0.5,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Real => "Real",
            Verdict::Fake => "Fake",
            Verdict::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the local model sees for one request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassifierInput {
    pub text: String,
    pub image_available: bool,
}

impl ClassifierInput {
    pub fn new(text: impl Into<String>, image_available: bool) -> Self {
        Self {
            text: text.into(),
            image_available,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Output of the local classifier for one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalClassification {
    pub verdict: Verdict,
    pub confidence: f64,
    /// Raw fake probability, when the model ran.
    pub probability: Option<f64>,
    pub error: Option<String>,
}

impl LocalClassification {
    pub fn unknown(error: impl Into<String>) -> Self {
        Self {
            verdict: Verdict::Unknown,
            confidence: 0.0,
            probability: None,
            error: Some(error.into()),
        }
    }

    /// `true` when the model produced a real-or-fake decision.
    pub fn is_active(&self) -> bool {
        self.error.is_none() && self.verdict != Verdict::Unknown
    }
}
