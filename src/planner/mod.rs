//! Turns a free-text task list into a time-blocked schedule and a
//! calendar file.

pub mod error;
pub mod ics;
pub mod models;
pub mod parser;
pub mod request;

use anyhow::Result;
use chrono::Local;

pub use error::ScheduleError;
pub use models::{CalendarEvent, PlannedSchedule};
pub use parser::{ParseMode, ScheduleTextParser};
pub use request::ScheduleRequest;

use crate::gemini::CompletionService;

/// Asks the model for a schedule and parses its reply. Model failures
/// surface as `ModelServiceError` and malformed replies as
/// `ScheduleError` inside the returned error.
pub async fn plan_schedule(
    service: &dyn CompletionService,
    request: &ScheduleRequest,
    parser: &ScheduleTextParser,
) -> Result<PlannedSchedule> {
    let start_time = request.start_time_at(Local::now().time());
    let prompt = request.prompt_for(&start_time)?;

    tracing::debug!("Requesting schedule starting at {}", start_time);
    let schedule_text = service.complete(&prompt).await?;

    let events = parser.parse(&schedule_text)?;
    tracing::info!(
        "Planned {} event(s) on {} ({})",
        events.len(),
        parser.date(),
        parser.timezone().name()
    );

    Ok(PlannedSchedule {
        start_time,
        schedule_text,
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gemini::{Content, ModelServiceError};
    use async_trait::async_trait;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    struct StubService {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl StubService {
        fn replying(reply: &str) -> Self {
            Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CompletionService for StubService {
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

    fn parser() -> ScheduleTextParser {
        ScheduleTextParser::new(
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            chrono_tz::US::Eastern,
        )
    }

    #[tokio::test]
    async fn test_plan_schedule() {
        let service = StubService::replying("1. Task: Write report\nStart: 09:00\nEnd: 09:30\n");
        let request = ScheduleRequest::new("Write report", "Mornings", Some("09:00"));

        let planned = plan_schedule(&service, &request, &parser()).await.unwrap();

        assert_eq!(planned.start_time, "09:00");
        assert_eq!(planned.events.len(), 1);
        assert_eq!(planned.events[0].name, "Write report");

        let prompts = service.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].contains("Tasks: Write report"));
        assert!(prompts[0].contains("Starting Time: 09:00"));
    }

    #[tokio::test]
    async fn test_plan_schedule_format_error() {
        let service = StubService::replying("Task: Write\nStart: nine\nEnd: 10:00");
        let request = ScheduleRequest::new("Write", "", Some("09:00"));

        let err = plan_schedule(&service, &request, &parser()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<ScheduleError>(),
            Some(ScheduleError::TimeFormat { line: 2, .. })
        ));
    }

    #[tokio::test]
    async fn test_plan_schedule_model_error() {
        let service = StubService {
            reply: None,
            prompts: Mutex::new(Vec::new()),
        };
        let request = ScheduleRequest::new("Write", "", None);

        let err = plan_schedule(&service, &request, &parser()).await.unwrap_err();
        assert!(err.downcast_ref::<ModelServiceError>().is_some());
    }
}
