//! The query engine.
//!
//! One entry point per query shape:
//! - [`query_events`] — the date-range query: build the full filter
//!   (recurring override included), ask the store for ordered ids, then
//!   fetch, label and normalize each match.
//! - [`query_events_by_month`] — the month view: a plain `start BETWEEN`
//!   filter with no recurring override, ordered by start.
//! - [`fetch_event`] — a single record by id.
//!
//! Validation happens before any of these run; the engine assumes typed
//! parameters and performs exactly one logical read pass per call.

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::debug;

use eventd_core::{Anchor, DateError, NormalizedEvent, QueryParams, full_filter, month_filter};

use crate::error::StoreError;
use crate::normalize::{EventTerms, normalize_event};
use crate::store::{EventStore, OrderBy};

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the query engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A date input was invalid (month out of range).
    #[error(transparent)]
    Date(#[from] DateError),

    /// The store failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// The result of a date-range query.
///
/// The legacy payload appended the echoed anchor to the event list itself;
/// here it travels as a separate field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutcome {
    /// Matching events in store order.
    pub events: Vec<NormalizedEvent>,
    /// The anchor the query ran with, echoed back.
    pub at: Anchor,
}

/// Runs a date-range query against the store.
///
/// Recurring events always qualify regardless of the window; non-repeating
/// events go through the date predicate. Results come back in the store's
/// default "earliest relevant date first" order, truncated to the limit if
/// one is set.
pub fn query_events(store: &dyn EventStore, params: &QueryParams) -> EngineResult<QueryOutcome> {
    let filter = full_filter(params);
    // with no lower bound every start counts as upcoming
    let reference = params.from.unwrap_or(NaiveDateTime::MIN);
    let order = OrderBy::EarliestRelevant { reference };

    let mut ids = store.query(&filter, &order)?;
    if let Some(limit) = params.limit {
        ids.truncate(limit);
    }
    debug!(
        matches = ids.len(),
        anchor = params.anchor.as_str(),
        "date-range query"
    );

    let mut events = Vec::with_capacity(ids.len());
    for id in &ids {
        events.push(load_event(store, id)?);
    }

    Ok(QueryOutcome {
        events,
        at: params.anchor,
    })
}

/// Runs the month-view query: events whose start falls inside the month.
///
/// Month views apply no recurring-event override, so recurring events whose
/// stored start lies outside the month do not appear.
pub fn query_events_by_month(
    store: &dyn EventStore,
    year: i32,
    month: u32,
) -> EngineResult<Vec<NormalizedEvent>> {
    let filter = month_filter(year, month)?;
    let ids = store.query(&filter, &OrderBy::Start)?;
    debug!(matches = ids.len(), year, month, "month query");

    let mut events = Vec::with_capacity(ids.len());
    for id in &ids {
        events.push(load_event(store, id)?);
    }
    Ok(events)
}

/// Fetches and normalizes a single event by id.
pub fn fetch_event(store: &dyn EventStore, id: &str) -> EngineResult<NormalizedEvent> {
    Ok(load_event(store, id)?)
}

fn load_event(store: &dyn EventStore, id: &str) -> Result<NormalizedEvent, StoreError> {
    let record = store.fetch(id)?;
    let terms = EventTerms::fetch(store, id)?;
    let url = store.permalink(id)?;
    Ok(normalize_event(&record, url, terms))
}
