//! Events extracted from a schedule reply.
use chrono::{DateTime, TimeDelta};
use chrono_tz::Tz;
use serde::Serialize;

/// A single time block. Never mutated after the parser emits it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CalendarEvent {
    pub name: String,
    pub start: DateTime<Tz>,
    pub end: DateTime<Tz>,
}

impl CalendarEvent {
    pub fn duration(&self) -> TimeDelta {
        self.end.signed_duration_since(self.start)
    }

    pub fn has_positive_duration(&self) -> bool {
        self.end > self.start
    }
}

/// Everything produced by one run of the planner.
#[derive(Clone, Debug, Serialize)]
pub struct PlannedSchedule {
    /// The `HH:MM` starting time the model was asked to plan from.
    pub start_time: String,
    /// The raw reply from the model.
    pub schedule_text: String,
    pub events: Vec<CalendarEvent>,
}
