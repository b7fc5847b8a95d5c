// src/services/gemini_client.rs
// DOCUMENTATION: Gemini generateContent client
// PURPOSE: Ask a generative model to caption an image

use crate::errors::GalleryError;
use crate::services::image_source::detect_image_type;
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;

/// Generative-description collaborator used by the detail view model
#[async_trait]
pub trait ImageDescriber: Send + Sync {
    /// Describe `image` following `prompt`
    /// DOCUMENTATION: Ok(None) means the model answered without any text
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<Option<String>, GalleryError>;
}

/// Gemini API client
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self::with_base_url(
            api_key,
            model,
            "https://generativelanguage.googleapis.com/v1beta".to_string(),
        )
    }

    pub fn with_base_url(api_key: String, model: String, base_url: String) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }

    /// Text of the first candidate, or None when it has none
    fn extract_text(response: GenerateContentResponse) -> Option<String> {
        let text: String = response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ImageDescriber for GeminiClient {
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<Option<String>, GalleryError> {
        let body = json!({
            "contents": [{
                "parts": [
                    {
                        "inline_data": {
                            "mime_type": sniff_mime_type(image),
                            "data": STANDARD.encode(image),
                        }
                    },
                    { "text": prompt }
                ]
            }]
        });

        log::debug!(
            "Gemini generateContent: model={}, image_bytes={}",
            self.model,
            image.len()
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                log::error!("Gemini request failed: {}", e);
                GalleryError::ExternalApiError(format!("Request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or_else(|_| format!("API error {}: {}", status, body.trim()));
            log::error!("Gemini API error {}: {}", status, message);
            return Err(GalleryError::ExternalApiError(message));
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            log::error!("Failed to parse Gemini response: {}", e);
            GalleryError::ExternalApiError(format!("Parse error: {}", e))
        })?;

        Ok(Self::extract_text(parsed))
    }
}

/// MIME type from magic bytes, JPEG when unknown
pub fn sniff_mime_type(bytes: &[u8]) -> &'static str {
    detect_image_type(bytes).unwrap_or("image/jpeg")
}
