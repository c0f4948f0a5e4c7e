use base64::{Engine as _, engine::general_purpose};
use serde::{Deserialize, Serialize};

use super::error::GatewayError;
use crate::pipeline::{DetectionMode, DetectionRequest};

/// Body of `POST /v1/detections`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionPayload {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: String,
    /// Raw base64 or a `data:` URL.
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub mode: Option<DetectionMode>,
}

impl DetectionPayload {
    pub fn into_request(self) -> Result<DetectionRequest, GatewayError> {
        let image = match self.image_base64.as_deref().map(str::trim) {
            Some(encoded) if !encoded.is_empty() => Some(decode_image(encoded)?),
            _ => None,
        };

        let request = DetectionRequest {
            title: self.title.filter(|t| !t.trim().is_empty()),
            content: self.content,
            image,
            mode: self.mode.unwrap_or_default(),
        };

        if request.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "request has neither text nor image for the selected mode".to_string(),
            ));
        }
        Ok(request)
    }
}

fn decode_image(encoded: &str) -> Result<Vec<u8>, GatewayError> {
    let data = match encoded.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => encoded,
    };

    general_purpose::STANDARD
        .decode(data)
        .map_err(|e| GatewayError::InvalidRequest(format!("image_base64 is not valid base64: {e}")))
}
