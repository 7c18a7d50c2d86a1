//! Event record types.
//!
//! This module provides the core types for stored calendar events:
//! - [`EventRecord`]: the typed record as decoded from the event store
//! - [`NormalizedEvent`]: the stable output shape returned to callers
//! - [`RepeatMode`]: recurrence frequency, with its legacy wire encoding
//! - [`EventStatus`]: publication state deciding whether a record is queryable

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::query::DateField;

/// How often an event repeats.
///
/// The store encodes this as a numeric code (0/10/100/1000). An event with
/// any mode other than [`RepeatMode::Never`] is always a candidate match for
/// date-range queries; resolving it to a concrete occurrence is the caller's
/// job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepeatMode {
    /// One-shot event.
    #[default]
    Never,
    /// Repeats every week.
    Weekly,
    /// Repeats every month.
    Monthly,
    /// Repeats every year.
    Yearly,
}

impl RepeatMode {
    /// Decodes the store's numeric repeat code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Never),
            10 => Some(Self::Weekly),
            100 => Some(Self::Monthly),
            1000 => Some(Self::Yearly),
            _ => None,
        }
    }

    /// Returns the store's numeric code for this mode.
    pub fn code(&self) -> u32 {
        match self {
            Self::Never => 0,
            Self::Weekly => 10,
            Self::Monthly => 100,
            Self::Yearly => 1000,
        }
    }

    /// Returns true for any mode other than `Never`.
    pub fn is_recurring(&self) -> bool {
        !matches!(self, Self::Never)
    }
}

/// Publication state of a stored event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventStatus {
    /// Visible and queryable.
    #[default]
    Published,
    /// Past its dates but still queryable.
    Passed,
    /// Unpublished draft.
    Draft,
    /// Awaiting review.
    Pending,
}

impl EventStatus {
    /// Parses the store's status slug.
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug {
            "publish" | "published" => Some(Self::Published),
            "passed" => Some(Self::Passed),
            "draft" => Some(Self::Draft),
            "pending" => Some(Self::Pending),
            _ => None,
        }
    }

    /// Whether records in this state are returned by queries.
    pub fn is_queryable(&self) -> bool {
        matches!(self, Self::Published | Self::Passed)
    }
}

/// A stored event, decoded into typed fields.
///
/// Records are owned by the external store; the query engine never mutates
/// them. Timestamps are naive wall-clock values, matching how the store
/// persists them (the `*_utc` pair carries the store's UTC rendering of the
/// creation/modification times).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Opaque identifier within the store.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Body content (may contain markup; opaque to the engine).
    pub content: String,
    /// Author identifier.
    pub author: String,
    /// URL slug used for permalinks.
    pub slug: String,
    /// Publication state.
    pub status: EventStatus,
    /// Creation time, store-local wall clock.
    pub created: NaiveDateTime,
    /// Creation time, UTC.
    pub created_utc: NaiveDateTime,
    /// Last modification time, store-local wall clock.
    pub modified: NaiveDateTime,
    /// Last modification time, UTC.
    pub modified_utc: NaiveDateTime,
    /// When the event starts. Absent for "open" events.
    pub start: Option<NaiveDateTime>,
    /// When the event ends. Absent for "open" events.
    pub end: Option<NaiveDateTime>,
    /// Whether the event runs all day.
    pub all_day: bool,
    /// Recurrence frequency.
    pub repeat: RepeatMode,
    /// When the event stops being listed, if set.
    pub expires: Option<NaiveDateTime>,
    /// Free-form location.
    pub location: Option<String>,
}

impl EventRecord {
    /// Creates a record with required fields; all four timestamps start out
    /// as `created`.
    pub fn new(id: impl Into<String>, title: impl Into<String>, created: NaiveDateTime) -> Self {
        let id = id.into();
        Self {
            slug: id.clone(),
            id,
            title: title.into(),
            content: String::new(),
            author: String::new(),
            status: EventStatus::Published,
            created,
            created_utc: created,
            modified: created,
            modified_utc: created,
            start: None,
            end: None,
            all_day: false,
            repeat: RepeatMode::Never,
            expires: None,
            location: None,
        }
    }

    /// Returns the requested date field, if the record carries it.
    pub fn date_value(&self, field: DateField) -> Option<NaiveDateTime> {
        match field {
            DateField::Start => self.start,
            DateField::End => self.end,
        }
    }

    /// Builder method to set the start time.
    pub fn with_start(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    /// Builder method to set the end time.
    pub fn with_end(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    /// Builder method to mark as all-day.
    pub fn with_all_day(mut self, all_day: bool) -> Self {
        self.all_day = all_day;
        self
    }

    /// Builder method to set the repeat mode.
    pub fn with_repeat(mut self, repeat: RepeatMode) -> Self {
        self.repeat = repeat;
        self
    }

    /// Builder method to set the location.
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    /// Builder method to set the publication state.
    pub fn with_status(mut self, status: EventStatus) -> Self {
        self.status = status;
        self
    }

    /// Builder method to set the permalink slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Builder method to set the body content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// Builder method to set the author.
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    /// Builder method to set the expiry time.
    pub fn with_expires(mut self, expires: NaiveDateTime) -> Self {
        self.expires = Some(expires);
        self
    }
}

/// The output shape a query produces for each matching event.
///
/// Field names are camelCased on the wire; `repeat` carries the raw numeric
/// code so existing consumers of the legacy payload keep working.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedEvent {
    /// Store identifier.
    pub id: String,
    /// Creation time, store-local wall clock.
    pub created: NaiveDateTime,
    /// Creation time, UTC.
    pub created_gmt: NaiveDateTime,
    /// Permalink URL.
    pub url: String,
    /// Last modification time, store-local wall clock.
    pub modified: NaiveDateTime,
    /// Last modification time, UTC.
    pub modified_gmt: NaiveDateTime,
    /// Event title.
    pub title: String,
    /// Body content.
    pub content: String,
    /// Author identifier.
    pub author: String,
    /// Event-type labels.
    pub types: Vec<String>,
    /// Category labels.
    pub categories: Vec<String>,
    /// Tag labels.
    pub tags: Vec<String>,
    /// Start time, if any.
    pub start: Option<NaiveDateTime>,
    /// End time, if any.
    pub end: Option<NaiveDateTime>,
    /// Whether the event runs all day.
    pub all_day: bool,
    /// Raw numeric repeat code (0/10/100/1000).
    pub repeat: u32,
    /// Free-form location.
    pub location: Option<String>,
}
