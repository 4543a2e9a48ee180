use anyhow::Result;
use chrono::{NaiveTime, TimeDelta, Timelike};
use serde_json::json;

use crate::ai::prompt::{self, Prompt};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// What the user asked to have scheduled. Immutable once built.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleRequest {
    tasks: String,
    preferences: String,
    start_time: Option<String>,
}

impl ScheduleRequest {
    /// A blank `start_time` is treated the same as no start time.
    pub fn new(tasks: &str, preferences: &str, start_time: Option<&str>) -> Self {
        Self {
            tasks: tasks.to_string(),
            preferences: preferences.to_string(),
            start_time: start_time
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }

    pub fn tasks(&self) -> &str {
        &self.tasks
    }

    pub fn preferences(&self) -> &str {
        &self.preferences
    }

    pub fn start_time(&self) -> Option<&str> {
        self.start_time.as_deref()
    }

    /// The requested start time, or the next half hour after `now`.
    pub fn start_time_at(&self, now: NaiveTime) -> String {
        match &self.start_time {
            Some(t) => t.clone(),
            None => next_half_hour(now).format("%H:%M").to_string(),
        }
    }

    /// Renders the scheduling prompt with an already resolved start
    /// time.
    pub fn prompt_for(&self, start_time: &str) -> Result<String> {
        let content = prompt::templates().render(
            &Prompt::TimeBlockedSchedule.to_string(),
            &json!({
                "tasks": self.tasks,
                "preferences": self.preferences,
                "start_time": start_time,
            }),
        )?;
        Ok(content)
    }
}

/// Next 30 minute boundary strictly after the start of the current
/// minute, wrapping around midnight.
pub fn next_half_hour(now: NaiveTime) -> NaiveTime {
    let minutes = now.hour() * 60 + now.minute();
    let next = ((minutes / 30 + 1) * 30) % MINUTES_PER_DAY;
    NaiveTime::default() + TimeDelta::minutes(i64::from(next))
}

/// Validates a `HH:MM` 24-hour clock time, e.g. for CLI arguments.
pub fn parse_clock_time(s: &str) -> Result<String, String> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M")
        .map(|t| t.format("%H:%M").to_string())
        .map_err(|e| format!("expected a 24-hour HH:MM time: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn test_next_half_hour() {
        assert_eq!(next_half_hour(at(9, 0)), at(9, 30));
        assert_eq!(next_half_hour(at(9, 1)), at(9, 30));
        assert_eq!(next_half_hour(at(9, 29)), at(9, 30));
        assert_eq!(next_half_hour(at(9, 30)), at(10, 0));
        assert_eq!(next_half_hour(at(9, 59)), at(10, 0));
    }

    #[test]
    fn test_next_half_hour_wraps_midnight() {
        assert_eq!(next_half_hour(at(23, 30)), at(0, 0));
        assert_eq!(next_half_hour(at(23, 59)), at(0, 0));
    }

    #[test]
    fn test_default_start_time_is_on_a_boundary_after_now() {
        for h in 0..24 {
            for m in 0..60 {
                let now = at(h, m);
                let start = ScheduleRequest::new("tasks", "", None).start_time_at(now);
                assert_eq!(start.len(), 5);
                let parsed = NaiveTime::parse_from_str(&start, "%H:%M").unwrap();
                assert_eq!(parsed.minute() % 30, 0);
                if parsed != at(0, 0) {
                    assert!(parsed > now, "{} should be after {}", start, now);
                }
            }
        }
    }

    #[test]
    fn test_explicit_start_time_wins() {
        let request = ScheduleRequest::new("tasks", "", Some(" 08:15 "));
        assert_eq!(request.start_time(), Some("08:15"));
        assert_eq!(request.start_time_at(at(13, 0)), "08:15");
    }

    #[test]
    fn test_blank_start_time_is_absent() {
        let request = ScheduleRequest::new("tasks", "", Some("  "));
        assert_eq!(request.start_time(), None);
        assert_eq!(request.start_time_at(at(13, 10)), "13:30");
    }

    #[test]
    fn test_prompt_embeds_inputs() {
        let request = ScheduleRequest::new("Write report, gym", "No meetings before 10", None);
        let prompt = request.prompt_for("09:30").unwrap();
        assert!(prompt.contains("Tasks: Write report, gym"));
        assert!(prompt.contains("Preferences: No meetings before 10"));
        assert!(prompt.contains("Starting Time: 09:30"));
        assert!(prompt.contains("15-minute break after every 90 minutes"));
        assert!(prompt.contains("24 hour notation"));
    }

    #[test]
    fn test_prompt_passes_empty_tasks_through() {
        let prompt = ScheduleRequest::new("", "", None).prompt_for("10:00").unwrap();
        assert!(prompt.contains("Tasks: \n"));
    }

    #[test]
    fn test_parse_clock_time() {
        assert_eq!(parse_clock_time("07:05").unwrap(), "07:05");
        assert_eq!(parse_clock_time("7:05").unwrap(), "07:05");
        assert!(parse_clock_time("25:00").is_err());
        assert!(parse_clock_time("9am").is_err());
    }
}
