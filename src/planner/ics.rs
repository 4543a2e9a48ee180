//! iCalendar export of planned events.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use icalendar::{Calendar, CalendarDateTime, Component, Event, EventLike};

use super::models::CalendarEvent;

pub const DEFAULT_FILE_NAME: &str = "Daily_Schedule.ics";
pub const CONTENT_TYPE: &str = "text/calendar";

// Written as UTC (`DTSTART:20240101T140000Z`). A `TZID` parameter
// would need a matching `VTIMEZONE` component in the calendar.
fn utc(ts: &DateTime<Tz>) -> CalendarDateTime {
    CalendarDateTime::Utc(ts.with_timezone(&Utc))
}

/// One `VEVENT` per event in the given order. Events that end before
/// they start are written as is.
pub fn to_calendar(events: &[CalendarEvent]) -> Calendar {
    let mut calendar = Calendar::new();
    for event in events {
        calendar.push(
            Event::new()
                .summary(&event.name)
                .starts(utc(&event.start))
                .ends(utc(&event.end))
                .done(),
        );
    }
    calendar.done()
}

pub fn to_bytes(events: &[CalendarEvent]) -> Vec<u8> {
    to_calendar(events).to_string().into_bytes()
}

pub fn write_ics<W: Write>(events: &[CalendarEvent], mut writer: W) -> Result<()> {
    writer.write_all(&to_bytes(events))?;
    writer.flush()?;
    Ok(())
}

/// Writes the calendar to `dir/file_name`, using
/// [`DEFAULT_FILE_NAME`] when no name is given, and returns the path.
pub fn export(events: &[CalendarEvent], dir: &Path, file_name: Option<&str>) -> Result<PathBuf> {
    let path = dir.join(file_name.unwrap_or(DEFAULT_FILE_NAME));
    let file = File::create(&path)
        .with_context(|| format!("Failed to create calendar file {}", path.display()))?;
    write_ics(events, BufWriter::new(file))?;
    tracing::info!("Wrote {} event(s) to {}", events.len(), path.display());
    Ok(path)
}
