//! Turns the model's schedule reply into calendar events.
//!
//! The reply is expected to contain blocks like
//!
//! ```text
//! 1. Task: Write report
//! Start: 09:00
//! End: 09:30
//! ```
//!
//! Lines without a marker are ignored so numbering, headings and
//! chatter around the schedule don't matter.
//!
//! In lenient mode every `Task:` and `Start:` line overwrites its
//! pending value and an `End:` emits an event once both are set.
//! Strict mode runs an ordered state machine
//! `AwaitingTask -> AwaitingStart -> AwaitingEnd -> AwaitingTask` and
//! reports the first marker that breaks it.

use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use chrono_tz::Tz;

use super::error::ScheduleError;
use super::models::CalendarEvent;

/// How to treat blocks that don't follow the expected order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ParseMode {
    /// Markers that can't complete an event are skipped.
    #[default]
    Lenient,
    /// Out of order or unfinished blocks and events that don't end
    /// after they start are errors.
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Marker {
    Task,
    Start,
    End,
}

impl Marker {
    // Checked in this order so a line like `Task: Start: planning`
    // is a task.
    fn find(line: &str) -> Option<Self> {
        if line.contains("Task:") {
            Some(Marker::Task)
        } else if line.contains("Start:") {
            Some(Marker::Start)
        } else if line.contains("End:") {
            Some(Marker::End)
        } else {
            None
        }
    }

    fn label(self) -> &'static str {
        match self {
            Marker::Task => "Task:",
            Marker::Start => "Start:",
            Marker::End => "End:",
        }
    }
}

#[derive(Debug, Default)]
struct Pending {
    name: Option<String>,
    start: Option<DateTime<Tz>>,
}

#[derive(Debug)]
enum State {
    AwaitingTask,
    AwaitingStart {
        task_line: usize,
        name: String,
    },
    AwaitingEnd {
        task_line: usize,
        name: String,
        start: DateTime<Tz>,
    },
}

impl State {
    fn expected(&self) -> &'static str {
        match self {
            State::AwaitingTask => "awaiting Task:",
            State::AwaitingStart { .. } => "awaiting Start:",
            State::AwaitingEnd { .. } => "awaiting End:",
        }
    }

    fn unfinished(self) -> Option<(usize, String)> {
        match self {
            State::AwaitingTask => None,
            State::AwaitingStart { task_line, name }
            | State::AwaitingEnd {
                task_line, name, ..
            } => Some((task_line, name)),
        }
    }

    fn out_of_order(&self, marker: Marker, line: usize) -> ScheduleError {
        ScheduleError::OutOfOrder {
            line,
            found: marker.label(),
            expected: self.expected(),
        }
    }
}

pub struct ScheduleTextParser {
    date: NaiveDate,
    timezone: Tz,
    mode: ParseMode,
}

impl ScheduleTextParser {
    /// Events are placed on `date` in `timezone`.
    pub fn new(date: NaiveDate, timezone: Tz) -> Self {
        Self {
            date,
            timezone,
            mode: ParseMode::default(),
        }
    }

    /// Events are placed on today's local date.
    pub fn today(timezone: Tz) -> Self {
        Self::new(Local::now().date_naive(), timezone)
    }

    pub fn mode(mut self, mode: ParseMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Extracts events in the order they appear in `reply`. A time
    /// that isn't `HH:MM` fails the whole parse, no partial result is
    /// returned.
    pub fn parse(&self, reply: &str) -> Result<Vec<CalendarEvent>, ScheduleError> {
        match self.mode {
            ParseMode::Lenient => self.parse_lenient(reply),
            ParseMode::Strict => self.parse_strict(reply),
        }
    }

    fn parse_lenient(&self, reply: &str) -> Result<Vec<CalendarEvent>, ScheduleError> {
        let mut events = Vec::new();
        let mut pending = Pending::default();

        for (line_no, marker, line) in markers(reply) {
            match marker {
                Marker::Task => {
                    let name = task_name(line);
                    if name.is_empty() {
                        tracing::debug!("Task without a name on line {}", line_no);
                    }
                    pending.name = Some(name).filter(|n| !n.is_empty());
                }
                Marker::Start => {
                    pending.start = Some(self.localize(line_no, marker, line)?);
                }
                Marker::End => {
                    let end = self.localize(line_no, marker, line)?;
                    match (pending.name.take(), pending.start.take()) {
                        (Some(name), Some(start)) => {
                            let event = CalendarEvent { name, start, end };
                            if !event.has_positive_duration() {
                                tracing::warn!(
                                    "Task {:?} on line {} ends at or before its start",
                                    event.name,
                                    line_no
                                );
                            }
                            events.push(event);
                        }
                        (name, start) => {
                            tracing::debug!(
                                "Skipping End: on line {} without a pending task and start",
                                line_no
                            );
                            pending = Pending { name, start };
                        }
                    }
                }
            }
        }

        if let Some(name) = &pending.name {
            tracing::debug!("Dropping unfinished task {:?}", name);
        }

        Ok(events)
    }

    fn parse_strict(&self, reply: &str) -> Result<Vec<CalendarEvent>, ScheduleError> {
        let mut events = Vec::new();
        let mut state = State::AwaitingTask;

        for (line_no, marker, line) in markers(reply) {
            state = self.step(state, marker, line_no, line, &mut events)?;
        }

        match state.unfinished() {
            Some((line, name)) => Err(ScheduleError::IncompleteBlock { line, name }),
            None => Ok(events),
        }
    }

    fn step(
        &self,
        state: State,
        marker: Marker,
        line_no: usize,
        line: &str,
        events: &mut Vec<CalendarEvent>,
    ) -> Result<State, ScheduleError> {
        match marker {
            Marker::Task => {
                if let Some((task_line, name)) = state.unfinished() {
                    return Err(ScheduleError::IncompleteBlock {
                        line: task_line,
                        name,
                    });
                }
                let name = task_name(line);
                if name.is_empty() {
                    return Err(ScheduleError::EmptyTaskName { line: line_no });
                }
                Ok(State::AwaitingStart {
                    task_line: line_no,
                    name,
                })
            }
            Marker::Start => {
                let start = self.localize(line_no, marker, line)?;
                match state {
                    State::AwaitingStart { task_line, name } => Ok(State::AwaitingEnd {
                        task_line,
                        name,
                        start,
                    }),
                    other => Err(other.out_of_order(marker, line_no)),
                }
            }
            Marker::End => {
                let end = self.localize(line_no, marker, line)?;
                match state {
                    State::AwaitingEnd { name, start, .. } => {
                        let event = CalendarEvent { name, start, end };
                        if !event.has_positive_duration() {
                            return Err(ScheduleError::NonPositiveDuration {
                                line: line_no,
                                name: event.name,
                            });
                        }
                        events.push(event);
                        Ok(State::AwaitingTask)
                    }
                    other => Err(other.out_of_order(marker, line_no)),
                }
            }
        }
    }

    fn localize(
        &self,
        line_no: usize,
        marker: Marker,
        line: &str,
    ) -> Result<DateTime<Tz>, ScheduleError> {
        let token = time_token(line, marker);
        let time = NaiveTime::parse_from_str(token, "%H:%M").map_err(|_| {
            ScheduleError::TimeFormat {
                line: line_no,
                token: token.to_string(),
            }
        })?;
        let local = self.date.and_time(time);

        // Ambiguous times during the fall back transition resolve to
        // standard time, the second occurrence.
        self.timezone
            .from_local_datetime(&local)
            .latest()
            .ok_or_else(|| ScheduleError::NonexistentLocalTime {
                line: line_no,
                time: local,
                timezone: self.timezone.name().to_string(),
            })
    }
}

/// Lines carrying a marker, with 1-based line numbers.
fn markers(reply: &str) -> impl Iterator<Item = (usize, Marker, &str)> {
    reply
        .lines()
        .enumerate()
        .filter_map(|(idx, line)| Marker::find(line).map(|marker| (idx + 1, marker, line)))
}

/// Text after the first `": "`, or after the marker itself when the
/// model omitted the space. Markdown emphasis is stripped.
fn task_name(line: &str) -> String {
    let rest = match line.split_once(": ") {
        Some((_, rest)) => rest,
        None => line.split_once("Task:").map(|(_, rest)| rest).unwrap_or(""),
    };
    rest.trim().trim_matches('*').trim().to_string()
}

/// Everything after the marker, e.g. `09:00` in `**Start:** 09:00`
/// or `Start:09:00`.
fn time_token(line: &str, marker: Marker) -> &str {
    line.split_once(marker.label())
        .map(|(_, rest)| rest)
        .unwrap_or("")
        .trim()
        .trim_matches('*')
        .trim()
}
