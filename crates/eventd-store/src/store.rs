//! The EventStore seam.
//!
//! The query engine talks to its store through [`EventStore`]: a filter
//! query returning candidate ids, a typed fetch per id, a taxonomy label
//! fetch and permalink construction. How the store indexes or persists is
//! its own business; the trait is synchronous because every query is one
//! request-scoped read pass.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use eventd_core::{EventRecord, FilterExpr};

use crate::error::StoreResult;

/// The taxonomies an event can be labelled with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Taxonomy {
    /// Event types.
    Type,
    /// Event categories.
    Category,
    /// Event tags.
    Tag,
}

impl Taxonomy {
    /// Every known taxonomy.
    pub const ALL: [Taxonomy; 3] = [Taxonomy::Type, Taxonomy::Category, Taxonomy::Tag];

    /// The slug the store files this taxonomy under.
    pub fn slug(self) -> &'static str {
        match self {
            Self::Type => "event-type",
            Self::Category => "event-category",
            Self::Tag => "event-tag",
        }
    }
}

/// Result ordering contract for store queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderBy {
    /// Default: earliest relevant date first. The sort key is the start
    /// time when it lies on or after `reference`, otherwise the end time
    /// (the event is already running, its end is what matters next).
    EarliestRelevant { reference: NaiveDateTime },
    /// Order by start timestamp.
    Start,
    /// Order by end timestamp.
    End,
}

/// Computes the sort key for a record under the given ordering.
///
/// Records without a usable key sort after all keyed records; ties keep
/// store order.
pub fn sort_key(event: &EventRecord, order: &OrderBy) -> Option<NaiveDateTime> {
    match order {
        OrderBy::Start => event.start,
        OrderBy::End => event.end,
        OrderBy::EarliestRelevant { reference } => match event.start {
            Some(start) if start >= *reference => Some(start),
            _ => event.end.or(event.start),
        },
    }
}

/// A store of event records queryable by filter expression.
pub trait EventStore: Send + Sync {
    /// Returns the ids of queryable records matching `filter`, ordered per
    /// the store's `order` contract.
    fn query(&self, filter: &FilterExpr, order: &OrderBy) -> StoreResult<Vec<String>>;

    /// Fetches one record by id, decoded into typed fields.
    fn fetch(&self, id: &str) -> StoreResult<EventRecord>;

    /// Fetches the label set of one taxonomy for one record.
    fn terms(&self, id: &str, taxonomy: Taxonomy) -> StoreResult<Vec<String>>;

    /// Builds the permalink URL for one record.
    fn permalink(&self, id: &str) -> StoreResult<String>;
}
