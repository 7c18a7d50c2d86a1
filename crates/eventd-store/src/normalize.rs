//! EventRecord to NormalizedEvent conversion.
//!
//! The normalization step assembles the stable output shape from the three
//! store reads a matching event requires: the typed record, its taxonomy
//! labels and its permalink.

use eventd_core::{EventRecord, NormalizedEvent};

use crate::error::StoreResult;
use crate::store::{EventStore, Taxonomy};

/// The taxonomy label sets of one event.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventTerms {
    /// Event-type labels.
    pub types: Vec<String>,
    /// Category labels.
    pub categories: Vec<String>,
    /// Tag labels.
    pub tags: Vec<String>,
}

impl EventTerms {
    /// Fetches all three label sets for one record.
    pub fn fetch(store: &dyn EventStore, id: &str) -> StoreResult<Self> {
        Ok(Self {
            types: store.terms(id, Taxonomy::Type)?,
            categories: store.terms(id, Taxonomy::Category)?,
            tags: store.terms(id, Taxonomy::Tag)?,
        })
    }
}

/// Builds the output shape for one record.
///
/// The repeat mode flattens back to its numeric code; the expiry field is
/// internal to the store and not part of the output.
pub fn normalize_event(
    record: &EventRecord,
    url: impl Into<String>,
    terms: EventTerms,
) -> NormalizedEvent {
    NormalizedEvent {
        id: record.id.clone(),
        created: record.created,
        created_gmt: record.created_utc,
        url: url.into(),
        modified: record.modified,
        modified_gmt: record.modified_utc,
        title: record.title.clone(),
        content: record.content.clone(),
        author: record.author.clone(),
        types: terms.types,
        categories: terms.categories,
        tags: terms.tags,
        start: record.start,
        end: record.end,
        all_day: record.all_day,
        repeat: record.repeat.code(),
        location: record.location.clone(),
    }
}
