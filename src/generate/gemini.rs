//! Gemini `generateContent` client.
//!
//! Request:
//!
//! ```text
//! POST {endpoint}/v1beta/models/{model}:generateContent
//! x-goog-api-key: {api_key}
//!
//! {"contents":[{"parts":[{"text":"..."}]}],
//!  "generationConfig":{"imageConfig":{"aspectRatio":"1:1"}}}
//! ```
//!
//! Only the first candidate is read. Its parts keep their order; image parts
//! carry base64 `inlineData`.

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use super::{ContentPart, GenerationRequest, GenerationResponse, ImageGenerator};
use crate::error::StudioError;

pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Connection settings for the Gemini API.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL, without trailing slash
    pub endpoint: String,
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct RequestContent<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    image_config: ImageConfig<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ImageConfig<'a> {
    aspect_ratio: &'a str,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<WirePart>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WirePart {
    text: Option<String>,
    inline_data: Option<InlineData>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

fn request_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![TextPart {
                text: &request.prompt,
            }],
        }],
        generation_config: GenerationConfig {
            image_config: ImageConfig {
                aspect_ratio: &request.aspect_ratio,
            },
        },
    }
}

/// Parse a `generateContent` response body.
pub fn parse_response(body: &str) -> Result<GenerationResponse, StudioError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| StudioError::Generation(format!("Invalid response JSON: {}", e)))?;

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| StudioError::Generation("Response has no candidates".to_string()))?;

    // Only the first inline image is decoded; later image parts are dropped
    let mut parts = Vec::new();
    let mut has_image = false;
    for part in candidate.content.map(|c| c.parts).unwrap_or_default() {
        if let Some(inline) = part.inline_data {
            if has_image {
                continue;
            }
            has_image = true;
            let data = STANDARD
                .decode(inline.data.as_bytes())
                .map_err(|e| StudioError::Generation(format!("Invalid inline image data: {}", e)))?;
            parts.push(ContentPart::InlineImage {
                mime_type: inline.mime_type,
                data,
            });
        } else if let Some(text) = part.text {
            parts.push(ContentPart::Text(text));
        }
    }

    Ok(GenerationResponse { parts })
}

/// [`ImageGenerator`] backed by the Gemini REST API.
pub struct GeminiGenerator {
    http_client: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiGenerator {
    pub fn new(http_client: reqwest::Client, config: GeminiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

#[async_trait]
impl ImageGenerator for GeminiGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResponse, StudioError> {
        let response = self
            .http_client
            .post(self.config.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request_body(request))
            .send()
            .await
            .map_err(|e| StudioError::Generation(format!("Request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| StudioError::Generation(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            let snippet: String = body.chars().take(200).collect();
            return Err(StudioError::Generation(format!("HTTP {}: {}", status, snippet)));
        }

        parse_response(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::BaseImage;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_request_body_shape() {
        let request = GenerationRequest {
            prompt: "a whale".to_string(),
            aspect_ratio: "1:1".to_string(),
        };
        let body = serde_json::to_value(request_body(&request)).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{"parts": [{"text": "a whale"}]}],
                "generationConfig": {"imageConfig": {"aspectRatio": "1:1"}}
            })
        );
    }

    #[test]
    fn test_url() {
        let mut config = GeminiConfig::new("key");
        config.endpoint = "http://localhost:9000/".to_string();
        assert_eq!(
            config.url(),
            "http://localhost:9000/v1beta/models/gemini-3-flash-preview:generateContent"
        );
    }

    #[test]
    fn test_parse_keeps_first_image_only() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "Here is your page"},
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "BAUG"}}
                    ]
                }
            }]
        })
        .to_string();

        let response = parse_response(&body).unwrap();
        assert_eq!(
            response.parts,
            vec![
                ContentPart::Text("Here is your page".to_string()),
                ContentPart::InlineImage {
                    mime_type: "image/png".to_string(),
                    data: vec![1, 2, 3],
                },
            ]
        );
        assert_eq!(
            response.first_image(),
            Some(BaseImage::inline("image/png", vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_parse_ignores_malformed_later_image() {
        let body = json!({
            "candidates": [{
                "content": {
                    "parts": [
                        {"inlineData": {"mimeType": "image/png", "data": "AQID"}},
                        {"inlineData": {"mimeType": "image/png", "data": "%%%"}}
                    ]
                }
            }]
        })
        .to_string();

        let response = parse_response(&body).unwrap();
        assert_eq!(
            response.first_image(),
            Some(BaseImage::inline("image/png", vec![1, 2, 3]))
        );
    }

    #[test]
    fn test_parse_only_first_candidate() {
        let body = json!({
            "candidates": [
                {"content": {"parts": [{"text": "no image"}]}},
                {"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "AQID"}}]}}
            ]
        })
        .to_string();
        assert!(parse_response(&body).unwrap().first_image().is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_response("{}").is_err());
        assert!(parse_response("not json").is_err());
        let bad_data = json!({
            "candidates": [{"content": {"parts": [{"inlineData": {"mimeType": "image/png", "data": "%%%"}}]}}]
        })
        .to_string();
        assert!(parse_response(&bad_data).is_err());
    }

    #[test]
    fn test_parse_candidate_without_content() {
        let response = parse_response(r#"{"candidates": [{"finishReason": "SAFETY"}]}"#).unwrap();
        assert!(response.parts.is_empty());
    }
}
