//! Output rendering for query results.

use serde_json::json;

use eventd_core::{Anchor, NormalizedEvent, format_event_info, format_event_range};
use eventd_protocol::StatusInfo;

use crate::error::ClientResult;

/// Date format used in listings.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Time format used in detail views.
pub const TIME_FORMAT: &str = "%H:%M";

/// Renders an event listing as text, one line per event.
pub fn render_events_text(events: &[NormalizedEvent], at: Anchor) -> String {
    if events.is_empty() {
        return format!("no events (at={})", at.as_str());
    }

    let mut out = format!("{} event(s) (at={})\n", events.len(), at.as_str());
    for event in events {
        let range =
            format_event_range(event, DATE_FORMAT).unwrap_or_else(|| "(no dates)".to_string());
        out.push_str(&format!("{range}  {}", event.title));
        if let Some(location) = &event.location {
            out.push_str(&format!("  @ {location}"));
        }
        out.push('\n');
    }
    out
}

/// Renders an event listing as pretty JSON.
pub fn render_events_json(events: &[NormalizedEvent], at: Anchor) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(&json!({
        "events": events,
        "at": at,
    }))?)
}

/// Renders a single event's detail view.
pub fn render_event_text(event: &NormalizedEvent) -> String {
    let info = format_event_info(event, DATE_FORMAT, TIME_FORMAT);

    let mut out = format!("{}\n", event.title);
    out.push_str(&format!("id:       {}\n", event.id));
    out.push_str(&format!("url:      {}\n", event.url));
    if let Some(start) = info.date_start {
        out.push_str(&format!("starts:   {start}\n"));
    }
    if let Some(end) = info.date_end {
        out.push_str(&format!("ends:     {end}\n"));
    }
    if let Some(location) = info.location {
        out.push_str(&format!("location: {location}\n"));
    }
    if !event.types.is_empty() {
        out.push_str(&format!("types:    {}\n", event.types.join(", ")));
    }
    if !event.categories.is_empty() {
        out.push_str(&format!("categories: {}\n", event.categories.join(", ")));
    }
    if !event.tags.is_empty() {
        out.push_str(&format!("tags:     {}\n", event.tags.join(", ")));
    }
    out
}

/// Renders a single event as pretty JSON.
pub fn render_event_json(event: &NormalizedEvent) -> ClientResult<String> {
    Ok(serde_json::to_string_pretty(event)?)
}

/// Renders daemon status.
pub fn render_status_text(info: &StatusInfo) -> String {
    format!(
        "uptime: {}s\nevents: {}",
        info.uptime_seconds, info.event_count
    )
}
