use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum Role {
    #[serde(rename = "user")]
    User,
    #[serde(rename = "model")]
    Model,
}

// Candidates can contain parts without text (e.g. citations from the
// search tool) so `text` is optional when reading a response.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn new(role: Role, text: &str) -> Self {
        Content {
            role: Some(role),
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }

    /// System instructions are sent without a role.
    pub fn instruction(text: &str) -> Self {
        Content {
            role: None,
            parts: vec![Part {
                text: Some(text.to_string()),
            }],
        }
    }

    /// Concatenated text of all parts.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(|p| p.text.as_deref())
            .collect::<Vec<_>>()
            .join("")
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub response_mime_type: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 40,
            max_output_tokens: 8192,
            response_mime_type: String::from("text/plain"),
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub struct SafetySetting {
    pub category: HarmCategory,
    pub threshold: HarmBlockThreshold,
}

/// Blocks medium and above for every harm category.
pub fn default_safety_settings() -> Vec<SafetySetting> {
    [
        HarmCategory::HarmCategoryHarassment,
        HarmCategory::HarmCategoryHateSpeech,
        HarmCategory::HarmCategorySexuallyExplicit,
        HarmCategory::HarmCategoryDangerousContent,
    ]
    .into_iter()
    .map(|category| SafetySetting {
        category,
        threshold: HarmBlockThreshold::BlockMediumAndAbove,
    })
    .collect()
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
pub enum DynamicRetrievalMode {
    #[serde(rename = "MODE_DYNAMIC")]
    Dynamic,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DynamicRetrievalConfig {
    pub mode: DynamicRetrievalMode,
    pub dynamic_threshold: f32,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoogleSearchRetrieval {
    pub dynamic_retrieval_config: DynamicRetrievalConfig,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Tool {
    pub google_search_retrieval: GoogleSearchRetrieval,
}

impl Tool {
    /// Grounds answers with Google Search when the model predicts
    /// that searching helps more than `dynamic_threshold`.
    pub fn google_search(dynamic_threshold: f32) -> Self {
        Self {
            google_search_retrieval: GoogleSearchRetrieval {
                dynamic_retrieval_config: DynamicRetrievalConfig {
                    mode: DynamicRetrievalMode::Dynamic,
                    dynamic_threshold,
                },
            },
        }
    }
}

#[derive(Clone, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub safety_settings: Vec<SafetySetting>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tools: Vec<Tool>,
}

// {
//   "candidates": [{
//     "content": {"parts": [{"text": "1. Task: ..."}], "role": "model"},
//     "finishReason": "STOP"
//   }],
//   "promptFeedback": {"blockReason": "SAFETY"}
// }
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<Content>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

impl GenerateContentResponse {
    /// Text of the first candidate. A blocked prompt or a candidate
    /// without any text is an error since there is nothing to show.
    pub fn text(&self) -> Result<String, ModelServiceError> {
        if let Some(reason) = self
            .prompt_feedback
            .as_ref()
            .and_then(|f| f.block_reason.clone())
        {
            return Err(ModelServiceError::Blocked(reason));
        }

        let candidate = self
            .candidates
            .first()
            .ok_or(ModelServiceError::EmptyResponse { finish_reason: None })?;
        let text = candidate
            .content
            .as_ref()
            .map(Content::text)
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ModelServiceError::EmptyResponse {
                finish_reason: candidate.finish_reason.clone(),
            });
        }

        Ok(text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ModelServiceError {
    #[error("request to the model service failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("model service responded with {status}: {body}")]
    Status { status: u16, body: String },
    #[error("prompt was blocked by the model service: {0}")]
    Blocked(String),
    #[error("model service returned no text (finish reason: {finish_reason:?})")]
    EmptyResponse { finish_reason: Option<String> },
}

pub async fn generate_content(
    request: &GenerateContentRequest,
    api_hostname: &str,
    api_key: &str,
    model: &str,
) -> Result<GenerateContentResponse, ModelServiceError> {
    let url = format!(
        "{}/v1beta/models/{}:generateContent",
        api_hostname.trim_end_matches("/"),
        model
    );
    let response = reqwest::Client::new()
        .post(url)
        .header("x-goog-api-key", api_key)
        .header("Content-Type", "application/json")
        .timeout(Duration::from_secs(60 * 10))
        .json(request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Model service returned {}: {}", status, body);
        return Err(ModelServiceError::Status {
            status: status.as_u16(),
            body,
        });
    }

    Ok(response.json().await?)
}

/// Anything that can turn a conversation into the next model reply.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn generate(&self, contents: &[Content]) -> Result<String, ModelServiceError>;

    /// Single-turn completion of `prompt`.
    async fn complete(&self, prompt: &str) -> Result<String, ModelServiceError> {
        self.generate(&[Content::new(Role::User, prompt)]).await
    }
}

/// A Gemini model with its generation parameters, safety settings,
/// tools and system instruction.
#[derive(Clone, Debug)]
pub struct GeminiModel {
    api_hostname: String,
    api_key: String,
    pub model: String,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
    tools: Vec<Tool>,
    system_instruction: Option<String>,
}

impl GeminiModel {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            generation_config: GenerationConfig::default(),
            safety_settings: Vec::new(),
            tools: Vec::new(),
            system_instruction: None,
        }
    }

    pub fn generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = config;
        self
    }

    pub fn safety_settings(mut self, settings: Vec<SafetySetting>) -> Self {
        self.safety_settings = settings;
        self
    }

    pub fn tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    pub fn system_instruction(mut self, instruction: &str) -> Self {
        self.system_instruction = Some(instruction.to_string());
        self
    }

    pub fn request(&self, contents: &[Content]) -> GenerateContentRequest {
        GenerateContentRequest {
            contents: contents.to_vec(),
            system_instruction: self.system_instruction.as_deref().map(Content::instruction),
            generation_config: self.generation_config.clone(),
            safety_settings: self.safety_settings.clone(),
            tools: self.tools.clone(),
        }
    }
}

#[async_trait]
impl CompletionService for GeminiModel {
    async fn generate(&self, contents: &[Content]) -> Result<String, ModelServiceError> {
        let request = self.request(contents);
        tracing::debug!(
            "Sending {} message(s) to {}",
            request.contents.len(),
            self.model
        );
        let resp =
            generate_content(&request, &self.api_hostname, &self.api_key, &self.model).await?;
        resp.text()
    }
}
