//! In-memory event store.
//!
//! [`MemoryStore`] holds raw records behind an `RwLock`, decodes them
//! through the meta-field table on every read and evaluates filter
//! expressions record by record. It backs the daemon (seeded from a JSON
//! file) and the test suites.

use std::path::Path;
use std::sync::RwLock;

use tracing::warn;
use url::Url;

use eventd_core::{EventRecord, FilterExpr};

use crate::error::{StoreError, StoreResult};
use crate::raw::{RawRecord, decode};
use crate::store::{EventStore, OrderBy, Taxonomy, sort_key};

/// An in-memory [`EventStore`] over raw records.
pub struct MemoryStore {
    records: RwLock<Vec<RawRecord>>,
    site_url: Url,
}

impl MemoryStore {
    /// Creates an empty store. Permalinks resolve under `site_url`.
    pub fn new(site_url: Url) -> Self {
        Self {
            records: RwLock::new(Vec::new()),
            site_url,
        }
    }

    /// Creates a store pre-populated with records.
    pub fn with_records(site_url: Url, records: Vec<RawRecord>) -> Self {
        Self {
            records: RwLock::new(records),
            site_url,
        }
    }

    /// Loads a store from a JSON seed file holding an array of raw records.
    ///
    /// # Errors
    ///
    /// [`StoreError::Seed`] when the file cannot be read or parsed.
    pub fn from_seed_file(site_url: Url, path: &Path) -> StoreResult<Self> {
        let file = std::fs::File::open(path)
            .map_err(|err| StoreError::seed(format!("{}: {err}", path.display())))?;
        let records: Vec<RawRecord> = serde_json::from_reader(std::io::BufReader::new(file))
            .map_err(|err| StoreError::seed(format!("{}: {err}", path.display())))?;
        Ok(Self::with_records(site_url, records))
    }

    /// Inserts a record.
    pub fn insert(&self, record: RawRecord) {
        self.records.write().expect("store lock poisoned").push(record);
    }

    /// Number of records, queryable or not.
    pub fn len(&self) -> usize {
        self.records.read().expect("store lock poisoned").len()
    }

    /// True when the store holds no records.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn with_raw<T>(&self, id: &str, reader: impl FnOnce(&RawRecord) -> T) -> StoreResult<T> {
        let records = self.records.read().expect("store lock poisoned");
        records
            .iter()
            .find(|record| record.id == id)
            .map(reader)
            .ok_or_else(|| StoreError::not_found(id))
    }
}

impl EventStore for MemoryStore {
    fn query(&self, filter: &FilterExpr, order: &OrderBy) -> StoreResult<Vec<String>> {
        let records = self.records.read().expect("store lock poisoned");

        let mut matches: Vec<EventRecord> = Vec::new();
        for raw in records.iter() {
            let record = match decode(raw) {
                Ok(record) => record,
                Err(err) => {
                    // a corrupt record should not take the whole query down
                    warn!(id = %raw.id, error = %err, "skipping undecodable record");
                    continue;
                }
            };
            if record.status.is_queryable() && filter.matches(&record) {
                matches.push(record);
            }
        }

        // stable sort: ties and keyless records keep store order
        matches.sort_by_key(|record| {
            let key = sort_key(record, order);
            (key.is_none(), key)
        });

        Ok(matches.into_iter().map(|record| record.id).collect())
    }

    fn fetch(&self, id: &str) -> StoreResult<EventRecord> {
        self.with_raw(id, decode)?
    }

    fn terms(&self, id: &str, taxonomy: Taxonomy) -> StoreResult<Vec<String>> {
        self.with_raw(id, |raw| {
            raw.terms.get(taxonomy.slug()).cloned().unwrap_or_default()
        })
    }

    fn permalink(&self, id: &str) -> StoreResult<String> {
        let slug = self.with_raw(id, |raw| raw.slug.clone())?;
        let url = self
            .site_url
            .join(&format!("events/{}", urlencoding::encode(&slug)))
            .map_err(|err| StoreError::backend(format!("permalink for `{id}`: {err}")))?;
        Ok(url.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw::MetaField;
    use chrono::{NaiveDate, NaiveDateTime};
    use eventd_core::{Anchor, QueryParams, full_filter};
    use std::io::Write;

    fn dt(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    fn site() -> Url {
        Url::parse("https://example.org/").unwrap()
    }

    fn record(id: &str, start: &str, end: &str) -> RawRecord {
        RawRecord::new(id, format!("Event {id}"), "2024-01-01 00:00:00")
            .with_meta(MetaField::Start, start)
            .with_meta(MetaField::End, end)
    }

    fn populated() -> MemoryStore {
        MemoryStore::with_records(
            site(),
            vec![
                record("jan", "2024-01-10 09:00:00", "2024-01-10 17:00:00"),
                record("mar", "2024-03-05 09:00:00", "2024-03-06 17:00:00"),
                record("jun", "2024-06-20 09:00:00", "2024-06-21 17:00:00"),
                record("weekly", "2023-02-01 18:00:00", "2023-02-01 19:00:00")
                    .with_meta(MetaField::Repeat, "10"),
                record("draft", "2024-03-10 09:00:00", "2024-03-10 17:00:00")
                    .with_status("draft"),
            ],
        )
    }

    #[test]
    fn query_unconstrained_returns_queryable_records() {
        let store = populated();
        let params = QueryParams::new();
        let ids = store
            .query(
                &full_filter(&params),
                &OrderBy::EarliestRelevant {
                    reference: NaiveDateTime::MIN,
                },
            )
            .unwrap();
        // drafts never appear
        assert_eq!(ids, vec!["weekly", "jan", "mar", "jun"]);
    }

    #[test]
    fn query_window_keeps_recurring_events() {
        let store = populated();
        let params = QueryParams::new()
            .with_from(dt(2024, 3, 1, 0, 0, 0))
            .with_to(dt(2024, 3, 31, 23, 59, 59))
            .with_anchor(Anchor::Overlap);
        let ids = store
            .query(
                &full_filter(&params),
                &OrderBy::EarliestRelevant {
                    reference: dt(2024, 3, 1, 0, 0, 0),
                },
            )
            .unwrap();
        // weekly's stored dates are outside the window but it repeats;
        // its start is before the reference, so it sorts by its end
        assert_eq!(ids, vec!["weekly", "mar"]);
    }

    #[test]
    fn query_skips_undecodable_records() {
        let store = populated();
        store.insert(record("broken", "soon", "later"));
        let ids = store
            .query(
                &full_filter(&QueryParams::new()),
                &OrderBy::EarliestRelevant {
                    reference: NaiveDateTime::MIN,
                },
            )
            .unwrap();
        assert!(!ids.iter().any(|id| id == "broken"));
        assert_eq!(ids.len(), 4);
    }

    #[test]
    fn order_by_end() {
        let store = MemoryStore::with_records(
            site(),
            vec![
                record("a", "2024-01-01 09:00:00", "2024-06-01 00:00:00"),
                record("b", "2024-02-01 09:00:00", "2024-03-01 00:00:00"),
            ],
        );
        let ids = store
            .query(&full_filter(&QueryParams::new()), &OrderBy::End)
            .unwrap();
        assert_eq!(ids, vec!["b", "a"]);
    }

    #[test]
    fn fetch_unknown_id() {
        let store = populated();
        assert!(matches!(
            store.fetch("nope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn fetch_propagates_decode_errors() {
        let store = populated();
        store.insert(record("broken", "soon", "later"));
        assert!(matches!(
            store.fetch("broken"),
            Err(StoreError::Decode { .. })
        ));
    }

    #[test]
    fn terms_by_taxonomy() {
        let store = MemoryStore::new(site());
        store.insert(
            record("fair", "2024-05-01 08:00:00", "2024-05-01 18:00:00")
                .with_term("event-type", "festival")
                .with_term("event-tag", "outdoors")
                .with_term("event-tag", "family"),
        );

        assert_eq!(store.terms("fair", Taxonomy::Type).unwrap(), vec!["festival"]);
        assert_eq!(
            store.terms("fair", Taxonomy::Tag).unwrap(),
            vec!["outdoors", "family"]
        );
        assert!(store.terms("fair", Taxonomy::Category).unwrap().is_empty());
    }

    #[test]
    fn permalink_encodes_the_slug() {
        let store = MemoryStore::new(site());
        store.insert(
            record("fair", "2024-05-01 08:00:00", "2024-05-01 18:00:00")
                .with_slug("spring fair & market"),
        );
        assert_eq!(
            store.permalink("fair").unwrap(),
            "https://example.org/events/spring%20fair%20%26%20market"
        );
    }

    #[test]
    fn seed_file_roundtrip() {
        let records = vec![
            record("one", "2024-01-10 09:00:00", "2024-01-10 17:00:00"),
            record("two", "2024-02-10 09:00:00", "2024-02-10 17:00:00"),
        ];
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(serde_json::to_string(&records).unwrap().as_bytes())
            .unwrap();

        let store = MemoryStore::from_seed_file(site(), file.path()).unwrap();
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn seed_file_errors_are_reported() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not json").unwrap();
        assert!(matches!(
            MemoryStore::from_seed_file(site(), file.path()),
            Err(StoreError::Seed { .. })
        ));

        assert!(matches!(
            MemoryStore::from_seed_file(site(), Path::new("/definitely/missing.json")),
            Err(StoreError::Seed { .. })
        ));
    }
}
