use std::fmt::Write;

use anyhow::Context;
use chrono::{DateTime, Utc};

use crate::events::Event;

pub const NO_EVENTS_MESSAGE: &str = "No upcoming events found for today.";

/// The query window: from `now` through 23:59:59 of the same UTC date.
/// Events earlier in the day are deliberately left out; the report covers
/// what is still ahead, not the whole day.
pub fn day_window(now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let end_of_day = now
        .date_naive()
        .and_hms_opt(23, 59, 59)
        .expect("23:59:59 is a valid time")
        .and_utc();
    (now, end_of_day)
}

/// Renders the whole schedule to one string, in the order the events were
/// returned. A missing summary or an empty event time is malformed input
/// and errors out instead of printing a placeholder.
pub fn render_schedule(events: &[Event]) -> anyhow::Result<String> {
    if events.is_empty() {
        return Ok(format!("{NO_EVENTS_MESSAGE}\n"));
    }

    let mut out = String::from("Your schedule for today:\n");
    for event in events {
        render_event(event, &mut out)?;
    }
    Ok(out)
}

fn render_event(event: &Event, out: &mut String) -> anyhow::Result<()> {
    let summary = event
        .summary
        .as_deref()
        .with_context(|| format!("event {} has no summary", event.id))?;
    let start = event
        .start
        .clock_label()
        .with_context(|| format!("event {} has a malformed start", event.id))?;
    let end = event
        .end
        .clock_label()
        .with_context(|| format!("event {} has a malformed end", event.id))?;

    writeln!(out)?;
    writeln!(out, "{start} - {end}: {summary}")?;

    if !event.attendees.is_empty() {
        writeln!(out, "Attendees:")?;
        for attendee in &event.attendees {
            writeln!(out, "- {}", attendee.email)?;
        }
    }

    if let Some(location) = &event.location {
        writeln!(out, "Location: {location}")?;
    }

    if let Some(description) = &event.description {
        writeln!(out, "Description: {description}")?;
    }

    if let Some(uri) = event.video_link() {
        writeln!(out, "Video call link: {uri}")?;
    }

    Ok(())
}
