use std::sync::Arc;

use crate::core::AppConfig;
use crate::gemini::{CompletionService, GeminiModel, default_safety_settings};

pub struct AppState {
    pub config: AppConfig,
    pub service: Arc<dyn CompletionService>,
}

impl AppState {
    /// Plans schedules with the configured Gemini schedule model.
    pub fn new(config: AppConfig) -> Self {
        let model = GeminiModel::new(
            &config.gemini_api_hostname,
            &config.gemini_api_key,
            &config.schedule_model,
        )
        .safety_settings(default_safety_settings());
        Self::with_service(config, Arc::new(model))
    }

    pub fn with_service(config: AppConfig, service: Arc<dyn CompletionService>) -> Self {
        Self { config, service }
    }
}
