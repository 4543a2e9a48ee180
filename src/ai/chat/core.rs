use anyhow::{Error, Result, anyhow};
use serde_json::json;

use super::models::{ChatMessage, Transcript};
use crate::ai::prompt::{self, Prompt};
use crate::gemini::{CompletionService, GeminiModel, GenerationConfig, Tool};

/// How eagerly the model uses the search tool when it's enabled.
pub const SEARCH_DYNAMIC_THRESHOLD: f32 = 0.3;

/// A chat with the model scoped to one user session. The caller owns
/// it and passes it by `&mut` into every turn.
///
/// Use `ChatSession::builder()` to construct one.
pub struct ChatSession {
    api_hostname: String,
    api_key: String,
    model: String,
    use_search_tool: bool,
    system_prompt: Option<String>,
    transcript: Transcript,
}

impl ChatSession {
    pub fn builder(api_hostname: &str, api_key: &str, model: &str) -> ChatSessionBuilder {
        ChatSessionBuilder::new(api_hostname, api_key, model)
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn use_search_tool(&self) -> bool {
        self.use_search_tool
    }

    pub fn set_search_tool(&mut self, enabled: bool) {
        self.use_search_tool = enabled;
    }

    pub fn system_prompt(&self) -> Option<&str> {
        self.system_prompt.as_deref()
    }

    /// A blank prompt removes the system instruction.
    pub fn set_system_prompt(&mut self, system_prompt: &str) {
        let trimmed = system_prompt.trim();
        self.system_prompt = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Label shown next to model replies, e.g. `gemini-1.5-flash-8b
    /// with web search`.
    pub fn model_label(&self) -> String {
        if self.use_search_tool {
            format!("{} with web search", self.model)
        } else {
            self.model.clone()
        }
    }

    /// The model configured for the current toggles. Rebuilt each
    /// turn so toggling search or changing the prompt takes effect
    /// immediately.
    pub fn gemini_model(&self) -> Result<GeminiModel> {
        let mut model = GeminiModel::new(&self.api_hostname, &self.api_key, &self.model)
            .generation_config(GenerationConfig::default());

        if self.use_search_tool {
            model = model.tools(vec![Tool::google_search(SEARCH_DYNAMIC_THRESHOLD)]);
        }

        if let Some(system_prompt) = &self.system_prompt {
            let instruction = prompt::templates().render(
                &Prompt::AssumptionsSystem.to_string(),
                &json!({"system_prompt": system_prompt}),
            )?;
            model = model.system_instruction(&instruction);
        }

        Ok(model)
    }

    /// Runs the next turn against the configured Gemini model.
    pub async fn next_msg(&mut self, text: &str) -> Result<&ChatMessage, Error> {
        let model = self.gemini_model()?;
        self.next_msg_with(&model, text).await
    }

    /// Runs the next turn by sending the whole transcript plus `text`
    /// to `service`. A failed turn leaves the transcript unchanged.
    pub async fn next_msg_with(
        &mut self,
        service: &dyn CompletionService,
        text: &str,
    ) -> Result<&ChatMessage, Error> {
        self.transcript.push(ChatMessage::user(text));

        let reply = match service.generate(&self.transcript.contents()).await {
            Ok(reply) => reply,
            Err(e) => {
                self.transcript.pop();
                return Err(e.into());
            }
        };

        let label = self.model_label();
        self.transcript.push(ChatMessage::model(&reply, &label));
        self.transcript
            .last()
            .ok_or(anyhow!("Transcript is empty after a reply"))
    }
}

pub struct ChatSessionBuilder {
    api_hostname: String,
    api_key: String,
    model: String,
    use_search_tool: bool,
    system_prompt: Option<String>,
    transcript: Transcript,
}

impl ChatSessionBuilder {
    pub fn new(api_hostname: &str, api_key: &str, model: &str) -> Self {
        Self {
            api_hostname: api_hostname.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            use_search_tool: false,
            system_prompt: None,
            transcript: Transcript::new(),
        }
    }

    pub fn build(self) -> ChatSession {
        ChatSession {
            api_hostname: self.api_hostname,
            api_key: self.api_key,
            model: self.model,
            use_search_tool: self.use_search_tool,
            system_prompt: self.system_prompt,
            transcript: self.transcript,
        }
    }

    pub fn search_tool(mut self, enabled: bool) -> Self {
        self.use_search_tool = enabled;
        self
    }

    pub fn system_prompt(mut self, system_prompt: Option<&str>) -> Self {
        self.system_prompt = system_prompt
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        self
    }
}
