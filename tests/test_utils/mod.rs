//! Test utilities for integration tests
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{Router, body::Body};

use dayplan::api::AppState;
use dayplan::api::app;
use dayplan::core::AppConfig;
use dayplan::gemini::{CompletionService, Content, ModelServiceError};

/// Replies with a canned schedule and records every prompt it gets.
pub struct StubModel {
    reply: Option<String>,
    pub prompts: Mutex<Vec<String>>,
}

impl StubModel {
    pub fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Fails every request as if the prompt had been blocked.
    pub fn blocked() -> Self {
        Self {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl CompletionService for StubModel {
    async fn generate(&self, contents: &[Content]) -> Result<String, ModelServiceError> {
        self.prompts
            .lock()
            .unwrap()
            .extend(contents.iter().map(Content::text));
        self.reply
            .clone()
            .ok_or(ModelServiceError::Blocked("SAFETY".to_string()))
    }
}

pub fn test_config(api_hostname: &str) -> AppConfig {
    AppConfig {
        gemini_api_hostname: api_hostname.to_string(),
        gemini_api_key: String::from("test-api-key"),
        chat_model: String::from("gemini-test"),
        schedule_model: String::from("gemini-test"),
        timezone: chrono_tz::US::Eastern,
        output_dir: PathBuf::from("./"),
    }
}

/// Creates a test application router backed by `model`.
pub fn test_app(model: Arc<StubModel>) -> Router {
    let app_state = AppState::with_service(test_config("http://localhost"), model);
    app(Arc::new(app_state))
}

pub async fn body_to_string(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}
