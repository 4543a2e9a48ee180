use chrono::NaiveDateTime;

/// Reasons a schedule reply can't be turned into events. Line numbers
/// are 1-based.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScheduleError {
    #[error("line {line}: expected a 24-hour HH:MM time but found {token:?}")]
    TimeFormat { line: usize, token: String },

    #[error("line {line}: {time} does not exist in {timezone}")]
    NonexistentLocalTime {
        line: usize,
        time: NaiveDateTime,
        timezone: String,
    },

    #[error("line {line}: found {found} while {expected}")]
    OutOfOrder {
        line: usize,
        found: &'static str,
        expected: &'static str,
    },

    #[error("line {line}: task name is empty")]
    EmptyTaskName { line: usize },

    #[error("line {line}: task {name:?} has no end time")]
    IncompleteBlock { line: usize, name: String },

    #[error("line {line}: task {name:?} ends at or before its start")]
    NonPositiveDuration { line: usize, name: String },
}
