//! Gemini `generateContent` client

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::backend::traits::{
    ContentRequest, GenerationBackend, InlineImage, RemoteError, RequestPart, ResponsePart,
};
use crate::config::{ApiKey, GeminiConfig};
use crate::error::Result;

/// HTTP client for the Gemini image model
pub struct GeminiBackend {
    client: Client,
    api_key: ApiKey,
    base_url: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiRequest<'a> {
    contents: Vec<ApiContent<'a>>,
    generation_config: ApiGenerationConfig,
}

#[derive(Debug, Serialize)]
struct ApiContent<'a> {
    parts: Vec<ApiRequestPart<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum ApiRequestPart<'a> {
    #[serde(rename_all = "camelCase")]
    Inline { inline_data: ApiInlineData<'a> },
    Text { text: &'a str },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiInlineData<'a> {
    mime_type: &'a str,
    data: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiGenerationConfig {
    response_modalities: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    #[serde(default)]
    candidates: Vec<ApiCandidate>,
}

#[derive(Debug, Deserialize)]
struct ApiCandidate {
    #[serde(default)]
    content: Option<ApiResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseContent {
    #[serde(default)]
    parts: Vec<ApiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ApiResponsePart {
    #[serde(default)]
    text: Option<String>,
    #[serde(default, alias = "inline_data", rename = "inlineData")]
    inline_data: Option<ApiResponseInlineData>,
}

#[derive(Debug, Deserialize)]
struct ApiResponseInlineData {
    #[serde(default, alias = "mime_type", rename = "mimeType")]
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    details: Vec<ApiErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    reason: Option<String>,
}

impl GeminiBackend {
    /// Create a new backend; the credential is passed in explicitly
    pub fn new(config: &GeminiConfig, api_key: ApiKey) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, self.model)
    }

    fn parse_error(status: u16, body: &str) -> RemoteError {
        match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => RemoteError {
                status: Some(status),
                provider_status: envelope.error.status,
                reasons: envelope
                    .error
                    .details
                    .into_iter()
                    .filter_map(|d| d.reason)
                    .collect(),
                message: envelope.error.message,
            },
            Err(_) => RemoteError::http(status, format!("Backend returned {}: {}", status, body)),
        }
    }
}

fn to_api_parts(request: &ContentRequest) -> Vec<ApiRequestPart<'_>> {
    request
        .parts
        .iter()
        .map(|part| match part {
            RequestPart::Image(image) => ApiRequestPart::Inline {
                inline_data: ApiInlineData {
                    mime_type: &image.mime_type,
                    data: &image.data,
                },
            },
            RequestPart::Text(text) => ApiRequestPart::Text { text },
        })
        .collect()
}

fn from_api_response(response: ApiResponse) -> Vec<ResponsePart> {
    response
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| match (part.inline_data, part.text) {
                    (Some(inline), _) if !inline.data.is_empty() => Some(ResponsePart::Image(
                        InlineImage::new(inline.data, inline.mime_type.unwrap_or_default()),
                    )),
                    (_, Some(text)) => Some(ResponsePart::Text(text)),
                    _ => None,
                })
                .collect()
        })
        .unwrap_or_default()
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate_content(&self, request: ContentRequest) -> std::result::Result<Vec<ResponsePart>, RemoteError> {
        let body = ApiRequest {
            contents: vec![ApiContent {
                parts: to_api_parts(&request),
            }],
            generation_config: ApiGenerationConfig {
                response_modalities: vec!["IMAGE", "TEXT"],
            },
        };

        debug!(
            model = %self.model,
            images = request.image_count(),
            parts = request.parts.len(),
            "Sending generateContent request"
        );

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", self.api_key.expose())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!(model = %self.model, error = %e, "Request to remote capability failed");
                RemoteError::transport(format!("Connection failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let error = Self::parse_error(status.as_u16(), &text);
            warn!(
                model = %self.model,
                status = status.as_u16(),
                provider_status = ?error.provider_status,
                "Remote capability returned an error"
            );
            return Err(error);
        }

        let parsed = response
            .json::<ApiResponse>()
            .await
            .map_err(|e| RemoteError::http(status.as_u16(), format!("Failed to parse response: {}", e)))?;

        let parts = from_api_response(parsed);
        debug!(model = %self.model, parts = parts.len(), "Received generateContent response");
        Ok(parts)
    }
}
