//! Raw record shape and decoding.
//!
//! The backing store keeps events as a small set of post fields plus an
//! untyped string-to-string meta map. [`RawRecord`] is that shape;
//! [`decode`] turns it into a typed [`EventRecord`].
//!
//! Meta access goes through the [`MetaField`] table and the single
//! [`RawRecord::meta_value`] accessor rather than one lookup helper per
//! field.

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use eventd_core::{EventRecord, EventStatus, RepeatMode};

use crate::error::{StoreError, StoreResult};

/// Wall-clock format the store persists datetimes in.
pub const STORE_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The typed meta fields a raw record can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MetaField {
    /// Event start datetime.
    Start,
    /// Event end datetime.
    End,
    /// All-day flag.
    AllDay,
    /// Numeric repeat code.
    Repeat,
    /// Free-form location.
    Location,
    /// Listing expiry datetime.
    Expires,
}

impl MetaField {
    /// Every known meta field.
    pub const ALL: [MetaField; 6] = [
        MetaField::Start,
        MetaField::End,
        MetaField::AllDay,
        MetaField::Repeat,
        MetaField::Location,
        MetaField::Expires,
    ];

    /// The meta-map key this field is stored under.
    pub fn key(self) -> &'static str {
        match self {
            Self::Start => "event_start",
            Self::End => "event_end",
            Self::AllDay => "event_all_day",
            Self::Repeat => "event_repeat",
            Self::Location => "event_location",
            Self::Expires => "event_expire",
        }
    }
}

/// An event as the backing store holds it: post fields, a string meta map
/// and taxonomy term labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Store identifier.
    pub id: String,
    /// Event title.
    pub title: String,
    /// Body content.
    #[serde(default)]
    pub content: String,
    /// Author identifier.
    #[serde(default)]
    pub author: String,
    /// Permalink slug.
    pub slug: String,
    /// Status slug (`publish`, `passed`, `draft`, `pending`).
    #[serde(default = "default_status_slug")]
    pub status: String,
    /// Creation time, store-local wall clock.
    pub created: String,
    /// Creation time, UTC. Falls back to `created` when absent.
    #[serde(default)]
    pub created_utc: Option<String>,
    /// Last modification time. Falls back to `created` when absent.
    #[serde(default)]
    pub modified: Option<String>,
    /// Last modification time, UTC.
    #[serde(default)]
    pub modified_utc: Option<String>,
    /// Untyped meta values, keyed per [`MetaField::key`].
    #[serde(default)]
    pub meta: HashMap<String, String>,
    /// Taxonomy labels, keyed by taxonomy slug.
    #[serde(default)]
    pub terms: HashMap<String, Vec<String>>,
}

fn default_status_slug() -> String {
    "publish".to_string()
}

impl RawRecord {
    /// Creates a raw record with required fields.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        created: impl Into<String>,
    ) -> Self {
        let id = id.into();
        Self {
            slug: id.clone(),
            id,
            title: title.into(),
            content: String::new(),
            author: String::new(),
            status: default_status_slug(),
            created: created.into(),
            created_utc: None,
            modified: None,
            modified_utc: None,
            meta: HashMap::new(),
            terms: HashMap::new(),
        }
    }

    /// Returns the raw meta value for a field, if present and non-empty.
    ///
    /// The store represents "unset" both as a missing key and as an empty
    /// string; both read as `None` here.
    pub fn meta_value(&self, field: MetaField) -> Option<&str> {
        self.meta
            .get(field.key())
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Builder method to set one meta value.
    pub fn with_meta(mut self, field: MetaField, value: impl Into<String>) -> Self {
        self.meta.insert(field.key().to_string(), value.into());
        self
    }

    /// Builder method to set the status slug.
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Builder method to set the permalink slug.
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = slug.into();
        self
    }

    /// Builder method to append a taxonomy term label.
    pub fn with_term(mut self, taxonomy: impl Into<String>, label: impl Into<String>) -> Self {
        self.terms
            .entry(taxonomy.into())
            .or_default()
            .push(label.into());
        self
    }
}

/// Decodes a raw record into a typed [`EventRecord`].
///
/// # Errors
///
/// [`StoreError::Decode`] names the record and field for any value that
/// does not parse: malformed datetimes, unknown status slugs, unknown
/// repeat codes.
pub fn decode(raw: &RawRecord) -> StoreResult<EventRecord> {
    let created = parse_datetime(&raw.id, "created", &raw.created)?;
    let created_utc = match &raw.created_utc {
        Some(value) => parse_datetime(&raw.id, "created_utc", value)?,
        None => created,
    };
    let modified = match &raw.modified {
        Some(value) => parse_datetime(&raw.id, "modified", value)?,
        None => created,
    };
    let modified_utc = match &raw.modified_utc {
        Some(value) => parse_datetime(&raw.id, "modified_utc", value)?,
        None => created_utc,
    };

    let status = EventStatus::from_slug(&raw.status).ok_or_else(|| {
        StoreError::decode(&raw.id, "status", format!("unknown status `{}`", raw.status))
    })?;

    let mut record = EventRecord::new(&raw.id, &raw.title, created)
        .with_slug(&raw.slug)
        .with_content(&raw.content)
        .with_author(&raw.author)
        .with_status(status);
    record.created_utc = created_utc;
    record.modified = modified;
    record.modified_utc = modified_utc;

    record.start = decode_meta_datetime(raw, MetaField::Start)?;
    record.end = decode_meta_datetime(raw, MetaField::End)?;
    record.expires = decode_meta_datetime(raw, MetaField::Expires)?;
    record.all_day = decode_all_day(raw)?;
    record.repeat = decode_repeat(raw)?;
    record.location = raw.meta_value(MetaField::Location).map(str::to_string);

    Ok(record)
}

fn parse_datetime(id: &str, field: &str, value: &str) -> StoreResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, STORE_DATETIME_FORMAT)
        .map_err(|err| StoreError::decode(id, field, format!("`{value}`: {err}")))
}

fn decode_meta_datetime(raw: &RawRecord, field: MetaField) -> StoreResult<Option<NaiveDateTime>> {
    raw.meta_value(field)
        .map(|value| parse_datetime(&raw.id, field.key(), value))
        .transpose()
}

fn decode_all_day(raw: &RawRecord) -> StoreResult<bool> {
    match raw.meta_value(MetaField::AllDay) {
        None => Ok(false),
        Some("0") | Some("false") => Ok(false),
        Some("1") | Some("true") => Ok(true),
        Some(other) => Err(StoreError::decode(
            &raw.id,
            MetaField::AllDay.key(),
            format!("`{other}` is not a flag value"),
        )),
    }
}

fn decode_repeat(raw: &RawRecord) -> StoreResult<RepeatMode> {
    let Some(value) = raw.meta_value(MetaField::Repeat) else {
        return Ok(RepeatMode::Never);
    };
    let code: u32 = value.parse().map_err(|_| {
        StoreError::decode(
            &raw.id,
            MetaField::Repeat.key(),
            format!("`{value}` is not a repeat code"),
        )
    })?;
    RepeatMode::from_code(code).ok_or_else(|| {
        StoreError::decode(
            &raw.id,
            MetaField::Repeat.key(),
            format!("unknown repeat code {code}"),
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn sample() -> RawRecord {
        RawRecord::new("ev-1", "Spring Fair", "2024-01-02 09:00:00")
            .with_meta(MetaField::Start, "2024-05-01 08:00:00")
            .with_meta(MetaField::End, "2024-05-01 18:00:00")
            .with_meta(MetaField::AllDay, "0")
            .with_meta(MetaField::Repeat, "0")
            .with_meta(MetaField::Location, "Town square")
    }

    #[test]
    fn meta_field_keys_are_distinct() {
        let mut keys: Vec<&str> = MetaField::ALL.iter().map(|f| f.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), MetaField::ALL.len());
    }

    #[test]
    fn meta_value_treats_empty_as_absent() {
        let raw = RawRecord::new("ev-1", "Fair", "2024-01-02 09:00:00")
            .with_meta(MetaField::Location, "");
        assert_eq!(raw.meta_value(MetaField::Location), None);
        assert_eq!(raw.meta_value(MetaField::Start), None);
    }

    #[test]
    fn decode_full_record() {
        let record = decode(&sample()).unwrap();
        assert_eq!(record.id, "ev-1");
        assert_eq!(record.start, Some(dt(2024, 5, 1, 8, 0, 0)));
        assert_eq!(record.end, Some(dt(2024, 5, 1, 18, 0, 0)));
        assert!(!record.all_day);
        assert_eq!(record.repeat, RepeatMode::Never);
        assert_eq!(record.location.as_deref(), Some("Town square"));
        assert_eq!(record.status, EventStatus::Published);
    }

    #[test]
    fn decode_defaults() {
        let raw = RawRecord::new("ev-2", "Open event", "2024-01-02 09:00:00");
        let record = decode(&raw).unwrap();
        assert!(record.start.is_none());
        assert!(record.end.is_none());
        assert!(!record.all_day);
        assert_eq!(record.repeat, RepeatMode::Never);
        assert_eq!(record.created_utc, record.created);
        assert_eq!(record.modified, record.created);
    }

    #[test]
    fn decode_repeat_codes() {
        for (value, expected) in [
            ("10", RepeatMode::Weekly),
            ("100", RepeatMode::Monthly),
            ("1000", RepeatMode::Yearly),
        ] {
            let raw = sample().with_meta(MetaField::Repeat, value);
            assert_eq!(decode(&raw).unwrap().repeat, expected);
        }
    }

    #[test]
    fn decode_rejects_unknown_repeat_code() {
        let raw = sample().with_meta(MetaField::Repeat, "42");
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref field, .. } if field == "event_repeat"));
    }

    #[test]
    fn decode_rejects_bad_datetime() {
        let raw = sample().with_meta(MetaField::Start, "next tuesday");
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref field, .. } if field == "event_start"));
    }

    #[test]
    fn decode_rejects_unknown_status() {
        let raw = sample().with_status("archived");
        let err = decode(&raw).unwrap_err();
        assert!(matches!(err, StoreError::Decode { ref field, .. } if field == "status"));
    }

    #[test]
    fn decode_all_day_flags() {
        for (value, expected) in [("1", true), ("true", true), ("0", false), ("false", false)] {
            let raw = sample().with_meta(MetaField::AllDay, value);
            assert_eq!(decode(&raw).unwrap().all_day, expected, "value {value}");
        }
        let raw = sample().with_meta(MetaField::AllDay, "yes");
        assert!(decode(&raw).is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let raw = sample().with_term("event-type", "festival");
        let json = serde_json::to_string(&raw).unwrap();
        let parsed: RawRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, raw);
    }
}
