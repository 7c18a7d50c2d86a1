//! Human-readable schedule labels for events.
//!
//! Two entry points:
//! - [`format_event_range`] produces one compact label for an event's span,
//!   collapsing same-day ranges to a single date.
//! - [`format_event_info`] produces the start/end/location triple a detail
//!   view renders, picking a time-only format when the span stays within one
//!   calendar day.
//!
//! Both accept anything convertible to a [`ScheduleView`] — stored records
//! and normalized query output alike. Format strings use chrono's strftime
//! syntax and are chosen by the caller.

use chrono::NaiveDateTime;

use crate::event::{EventRecord, NormalizedEvent};

/// The schedule-relevant slice of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduleView<'a> {
    /// Start time, if any.
    pub start: Option<NaiveDateTime>,
    /// End time, if any.
    pub end: Option<NaiveDateTime>,
    /// Whether the event runs all day.
    pub all_day: bool,
    /// Free-form location.
    pub location: Option<&'a str>,
}

impl<'a> From<&'a EventRecord> for ScheduleView<'a> {
    fn from(record: &'a EventRecord) -> Self {
        Self {
            start: record.start,
            end: record.end,
            all_day: record.all_day,
            location: record.location.as_deref(),
        }
    }
}

impl<'a> From<&'a NormalizedEvent> for ScheduleView<'a> {
    fn from(event: &'a NormalizedEvent) -> Self {
        Self {
            start: event.start,
            end: event.end,
            all_day: event.all_day,
            location: event.location.as_deref(),
        }
    }
}

/// Formatted schedule details for one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventSchedule {
    /// Formatted start label, if the event has a start time.
    pub date_start: Option<String>,
    /// Formatted end label, if the event has an end time.
    pub date_end: Option<String>,
    /// The event location, passed through untouched.
    pub location: Option<String>,
}

/// Formats an event's span as a single label.
///
/// Identical start/end labels collapse into one; differing labels join with
/// `" - "`. Returns `None` when the event carries no dates at all.
pub fn format_event_range<'a>(
    event: impl Into<ScheduleView<'a>>,
    date_format: &str,
) -> Option<String> {
    let view = event.into();
    match (view.start, view.end) {
        (Some(start), Some(end)) => {
            let start_label = start.format(date_format).to_string();
            let end_label = end.format(date_format).to_string();
            if start_label == end_label {
                Some(start_label)
            } else {
                Some(format!("{start_label} - {end_label}"))
            }
        }
        (Some(start), None) => Some(start.format(date_format).to_string()),
        // the end date is the event's only timestamp; keep it
        (None, Some(end)) => Some(end.format(date_format).to_string()),
        (None, None) => None,
    }
}

/// Formats an event's schedule details.
///
/// When the end is absent or falls on the same calendar day as the start,
/// labels use `time_format` only. Spanning events use `date_format`, with
/// `time_format` appended unless the event is all-day. Start and end are
/// formatted independently with the chosen format.
pub fn format_event_info<'a>(
    event: impl Into<ScheduleView<'a>>,
    date_format: &str,
    time_format: &str,
) -> EventSchedule {
    let view = event.into();
    let same_day = match (view.start, view.end) {
        (_, None) => true,
        (Some(start), Some(end)) => start.date() == end.date(),
        (None, Some(_)) => false,
    };

    let chosen = if same_day {
        time_format.to_string()
    } else if view.all_day {
        date_format.to_string()
    } else {
        format!("{date_format} {time_format}")
    };

    EventSchedule {
        date_start: view.start.map(|start| start.format(&chosen).to_string()),
        date_end: view.end.map(|end| end.format(&chosen).to_string()),
        location: view.location.map(str::to_string),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const DATE_FMT: &str = "%Y-%m-%d";
    const TIME_FMT: &str = "%H:%M";

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, 0)
            .unwrap()
    }

    fn event(start: Option<NaiveDateTime>, end: Option<NaiveDateTime>) -> EventRecord {
        let mut record = EventRecord::new("ev-1", "Event", dt(2020, 1, 1, 0, 0));
        record.start = start;
        record.end = end;
        record
    }

    mod event_range {
        use super::*;

        #[test]
        fn same_day_collapses() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), Some(dt(2021, 1, 5, 12, 0)));
            insta::assert_snapshot!(
                format_event_range(&record, DATE_FMT).unwrap(),
                @"2021-01-05"
            );
        }

        #[test]
        fn differing_labels_join() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), Some(dt(2021, 1, 7, 12, 0)));
            insta::assert_snapshot!(
                format_event_range(&record, DATE_FMT).unwrap(),
                @"2021-01-05 - 2021-01-07"
            );
        }

        #[test]
        fn start_only() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), None);
            assert_eq!(
                format_event_range(&record, DATE_FMT).as_deref(),
                Some("2021-01-05")
            );
        }

        #[test]
        fn end_only() {
            let record = event(None, Some(dt(2021, 1, 7, 12, 0)));
            assert_eq!(
                format_event_range(&record, DATE_FMT).as_deref(),
                Some("2021-01-07")
            );
        }

        #[test]
        fn no_dates() {
            assert_eq!(format_event_range(&event(None, None), DATE_FMT), None);
        }

        #[test]
        fn collapse_follows_the_format_not_the_instant() {
            // different instants, same label under a date-only format
            let record = event(Some(dt(2021, 1, 5, 10, 0)), Some(dt(2021, 1, 5, 23, 0)));
            assert_eq!(
                format_event_range(&record, DATE_FMT).as_deref(),
                Some("2021-01-05")
            );
            // under a time-resolving format they no longer collapse
            assert_eq!(
                format_event_range(&record, "%Y-%m-%d %H:%M").as_deref(),
                Some("2021-01-05 10:00 - 2021-01-05 23:00")
            );
        }
    }

    mod event_info {
        use super::*;

        #[test]
        fn same_day_uses_time_only() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), Some(dt(2021, 1, 5, 12, 0)));
            let info = format_event_info(&record, DATE_FMT, TIME_FMT);
            assert_eq!(info.date_start.as_deref(), Some("10:00"));
            assert_eq!(info.date_end.as_deref(), Some("12:00"));
        }

        #[test]
        fn missing_end_uses_time_only() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), None);
            let info = format_event_info(&record, DATE_FMT, TIME_FMT);
            assert_eq!(info.date_start.as_deref(), Some("10:00"));
            assert_eq!(info.date_end, None);
        }

        #[test]
        fn spanning_days_uses_date_and_time() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), Some(dt(2021, 1, 7, 12, 0)));
            let info = format_event_info(&record, DATE_FMT, TIME_FMT);
            assert_eq!(info.date_start.as_deref(), Some("2021-01-05 10:00"));
            assert_eq!(info.date_end.as_deref(), Some("2021-01-07 12:00"));
        }

        #[test]
        fn all_day_span_drops_the_time() {
            let record = event(Some(dt(2021, 1, 5, 0, 0)), Some(dt(2021, 1, 7, 23, 59)))
                .with_all_day(true);
            let info = format_event_info(&record, DATE_FMT, TIME_FMT);
            assert_eq!(info.date_start.as_deref(), Some("2021-01-05"));
            assert_eq!(info.date_end.as_deref(), Some("2021-01-07"));
        }

        #[test]
        fn location_passes_through() {
            let record = event(Some(dt(2021, 1, 5, 10, 0)), None).with_location("Main hall");
            let info = format_event_info(&record, DATE_FMT, TIME_FMT);
            assert_eq!(info.location.as_deref(), Some("Main hall"));
        }
    }
}
