//! Public types for the schedule API
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::planner::{CalendarEvent, PlannedSchedule};

#[derive(Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: String,
    #[serde(default)]
    pub preferences: String,
    /// `HH:MM`, defaults to the next half hour
    pub start_time: Option<String>,
    /// Day to place the events on, defaults to today
    pub date: Option<NaiveDate>,
    /// Reject replies with out of order or unfinished blocks
    #[serde(default)]
    pub strict: bool,
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleEvent {
    pub name: String,
    pub start: String, // RFC 3339 with offset
    pub end: String,   // RFC 3339 with offset
}

impl From<&CalendarEvent> for ScheduleEvent {
    fn from(event: &CalendarEvent) -> Self {
        Self {
            name: event.name.clone(),
            start: event.start.to_rfc3339(),
            end: event.end.to_rfc3339(),
        }
    }
}

#[derive(Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub start_time: String,
    pub schedule_text: String,
    pub events: Vec<ScheduleEvent>,
}

impl From<&PlannedSchedule> for ScheduleResponse {
    fn from(planned: &PlannedSchedule) -> Self {
        Self {
            start_time: planned.start_time.clone(),
            schedule_text: planned.schedule_text.clone(),
            events: planned.events.iter().map(ScheduleEvent::from).collect(),
        }
    }
}
