//! Gemini generateContent 适配器

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use log::debug;
use once_cell::sync::Lazy;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::service::{VisionRequest, VisionService};
use super::DetectionError;
use crate::core::config::DetectionConfig;

static RESPONSE_SCHEMA: Lazy<Value> = Lazy::new(|| {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "name": { "type": "STRING" },
                "box_2d": {
                    "type": "ARRAY",
                    "items": { "type": "INTEGER" },
                    "description": "[ymin, xmin, ymax, xmax] in 0-1000 normalized coordinates"
                },
                "confidence": { "type": "NUMBER" }
            },
            "required": ["name", "box_2d", "confidence"]
        }
    })
});

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig<'a>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
enum Part<'a> {
    InlineData(InlineData<'a>),
    Text(&'a str),
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'static str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

pub struct GeminiVisionService {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiVisionService {
    pub fn new(config: &DetectionConfig) -> Result<Self, DetectionError> {
        let client = Client::builder()
            .user_agent(concat!("shop_lens/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
        })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model
        )
    }
}

#[async_trait]
impl VisionService for GeminiVisionService {
    async fn generate(&self, request: &VisionRequest) -> Result<String, DetectionError> {
        let api_key = self.api_key.as_deref().ok_or(DetectionError::MissingApiKey)?;

        let body = build_request_body(request);
        let resp = self
            .client
            .post(self.generate_url())
            .header("x-goog-api-key", api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            return Err(DetectionError::Service {
                status: status.as_u16(),
                message: error_message(&text),
            });
        }

        debug!("{} responded with {} bytes", self.model, text.len());
        extract_text(&text)
    }

    fn name(&self) -> &str {
        &self.model
    }
}

fn build_request_body(request: &VisionRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        contents: vec![Content {
            parts: vec![
                Part::InlineData(InlineData {
                    mime_type: request.mime_type,
                    data: STANDARD.encode(&request.image),
                }),
                Part::Text(&request.instruction),
            ],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json",
            response_schema: &RESPONSE_SCHEMA,
        },
    }
}

/// 取第一个候选的文本部分；没有候选视为空结果
fn extract_text(body: &str) -> Result<String, DetectionError> {
    let response: GenerateContentResponse = serde_json::from_str(body)
        .map_err(|e| DetectionError::Malformed(format!("unexpected envelope: {}", e)))?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(DetectionError::Service {
            status: 200,
            message: format!("prompt blocked: {}", reason),
        });
    }

    let text = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    Ok(text)
}

fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.chars().take(200).collect())
}
