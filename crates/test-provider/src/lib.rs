//! A local fake resource store for testing purpose.

use std::error::Error as StdError;
use std::fmt::{self, Debug, Display, Formatter};
use std::future::ready;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use deskhand_provider::{
    Candidate, ErrorKind, Fields, NameFilter, OrderBy, PageRequest, PageToken,
    ProviderError, ResourceId, ResourceKind, ResourceProvider, SearchPage,
    SearchQuery, extra_keys,
};
use serde_json::{Value, json};

/// Created events land here, like the stores this fake stands in for.
const DEFAULT_CALENDAR: &str = "primary";

#[derive(Debug)]
pub struct Error {
    message: String,
    kind: ErrorKind,
}

impl Error {
    fn new(message: impl Into<String>, kind: ErrorKind) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Debug::fmt(self, f)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

struct StoredRecord {
    kind: ResourceKind,
    candidate: Candidate,
    collection: Option<String>,
    trashed: bool,
}

#[derive(Default)]
struct Inner {
    records: Vec<StoredRecord>,
    failing_deletes: Vec<ResourceId>,
    search_error: Option<ErrorKind>,
    next_generated_id: u64,

    search_requests: usize,
    delete_attempts: usize,
    deleted_ids: Vec<ResourceId>,
}

/// A local fake resource store for testing purpose.
///
/// Seed it with records, then hand clones to the code under test; all
/// clones share one store. Counters record how often the remote surface
/// was actually hit, which is what most resolution properties assert on.
///
/// # Note
///
/// This type is not optimized for production use, there are heavy memory
/// copies involved. You should only use it for testing.
#[derive(Clone, Default)]
pub struct TestStoreProvider {
    inner: Arc<Mutex<Inner>>,
}

impl TestStoreProvider {
    /// Seeds a record.
    pub fn add(&self, kind: ResourceKind, candidate: Candidate) {
        self.add_record(kind, candidate, None, false);
    }

    /// Seeds a record inside a sub-store (mailbox, calendar id).
    pub fn add_in_collection<S: Into<String>>(
        &self,
        kind: ResourceKind,
        collection: S,
        candidate: Candidate,
    ) {
        self.add_record(kind, candidate, Some(collection.into()), false);
    }

    /// Seeds a trashed record, invisible to default searches.
    pub fn add_trashed(&self, kind: ResourceKind, candidate: Candidate) {
        self.add_record(kind, candidate, None, true);
    }

    fn add_record(
        &self,
        kind: ResourceKind,
        candidate: Candidate,
        collection: Option<String>,
        trashed: bool,
    ) {
        self.inner.lock().unwrap().records.push(StoredRecord {
            kind,
            candidate,
            collection,
            trashed,
        });
    }

    /// Makes every delete of the given id fail with `RemoteUnavailable`.
    pub fn fail_deletes_of(&self, id: ResourceId) {
        self.inner.lock().unwrap().failing_deletes.push(id);
    }

    /// Makes every search fail with the given error kind.
    pub fn fail_searches(&self, kind: ErrorKind) {
        self.inner.lock().unwrap().search_error = Some(kind);
    }

    /// Number of `search` calls the store has served (or failed).
    pub fn search_requests(&self) -> usize {
        self.inner.lock().unwrap().search_requests
    }

    /// Number of `delete` calls the store has received, failures included.
    pub fn delete_attempts(&self) -> usize {
        self.inner.lock().unwrap().delete_attempts
    }

    /// Ids deleted so far, in call order.
    pub fn deleted_ids(&self) -> Vec<ResourceId> {
        self.inner.lock().unwrap().deleted_ids.clone()
    }

    fn do_search(
        &self,
        query: &SearchQuery,
        page: &PageRequest,
    ) -> Result<SearchPage, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.search_requests += 1;
        if let Some(kind) = inner.search_error {
            return Err(Error::new("scripted search failure", kind));
        }

        let mut matches: Vec<Candidate> = inner
            .records
            .iter()
            .filter(|r| record_matches(r, query))
            .map(|r| r.candidate.clone())
            .collect();
        match query.order_by {
            OrderBy::ModifiedDesc => {
                matches.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
            }
            OrderBy::StartAsc => {
                matches.sort_by_key(|c| event_time(c));
            }
        }

        // Tokens are plain offsets into the sorted result; good enough for
        // a store that never changes mid-listing.
        let offset = match &page.token {
            Some(token) => token
                .as_str()
                .parse::<usize>()
                .map_err(|_| Error::new("bad page token", ErrorKind::NotFound))?,
            None => 0,
        };
        let items: Vec<Candidate> =
            matches.iter().skip(offset).take(page.size).cloned().collect();
        let consumed = offset + items.len();
        let next_page = (consumed < matches.len())
            .then(|| PageToken::new(consumed.to_string()));
        Ok(SearchPage { items, next_page })
    }

    fn do_get(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<Candidate, Error> {
        let inner = self.inner.lock().unwrap();
        inner
            .records
            .iter()
            .find(|r| r.kind == kind && r.candidate.id == *id)
            .map(|r| r.candidate.clone())
            .ok_or_else(|| {
                Error::new(format!("no such {kind}: {id}"), ErrorKind::NotFound)
            })
    }

    fn do_create(
        &self,
        kind: ResourceKind,
        fields: Fields,
    ) -> Result<Candidate, Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.next_generated_id += 1;
        let id = ResourceId::new(format!("gen-{}", inner.next_generated_id));

        let display_name = fields
            .get(extra_keys::SUMMARY)
            .and_then(Value::as_str)
            .unwrap_or("untitled")
            .to_owned();
        let mut candidate = Candidate::new(id.clone(), display_name, Utc::now());
        candidate.extra = fields;
        candidate.extra.remove(extra_keys::SUMMARY);
        if kind == ResourceKind::Event {
            candidate.extra.insert(
                extra_keys::EVENT_LINK.to_owned(),
                json!(format!("https://calendar.test/event/{id}")),
            );
            let with_conference = candidate
                .extra
                .remove(extra_keys::WITH_CONFERENCE)
                .and_then(|v| v.as_bool())
                .unwrap_or(false);
            if with_conference {
                candidate.extra.insert(
                    extra_keys::MEET_LINK.to_owned(),
                    json!(format!("https://meet.test/{id}")),
                );
            }
        }

        let collection = (kind == ResourceKind::Event)
            .then(|| DEFAULT_CALENDAR.to_owned());
        inner.records.push(StoredRecord {
            kind,
            candidate: candidate.clone(),
            collection,
            trashed: false,
        });
        Ok(candidate)
    }

    fn do_update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        fields: Fields,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        let record = inner
            .records
            .iter_mut()
            .find(|r| r.kind == kind && r.candidate.id == *id)
            .ok_or_else(|| {
                Error::new(format!("no such {kind}: {id}"), ErrorKind::NotFound)
            })?;
        for (key, value) in fields {
            if key == extra_keys::SUMMARY {
                if let Some(name) = value.as_str() {
                    record.candidate.display_name = name.to_owned();
                }
            } else {
                record.candidate.extra.insert(key, value);
            }
        }
        record.candidate.modified_at = Utc::now();
        Ok(())
    }

    fn do_delete(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().unwrap();
        inner.delete_attempts += 1;
        if inner.failing_deletes.contains(id) {
            return Err(Error::new(
                format!("scripted delete failure: {id}"),
                ErrorKind::RemoteUnavailable,
            ));
        }
        let position = inner
            .records
            .iter()
            .position(|r| r.kind == kind && r.candidate.id == *id)
            .ok_or_else(|| {
                Error::new(format!("no such {kind}: {id}"), ErrorKind::NotFound)
            })?;
        inner.records.remove(position);
        inner.deleted_ids.push(id.clone());
        Ok(())
    }
}

fn record_matches(record: &StoredRecord, query: &SearchQuery) -> bool {
    if record.kind != query.kind {
        return false;
    }
    if record.trashed && !query.include_trashed {
        return false;
    }
    if let Some(collection) = &query.collection {
        if record.collection.as_deref() != Some(collection.as_str()) {
            return false;
        }
    }
    if let Some(name) = &query.name {
        let matched = match name {
            NameFilter::Equals(wanted) => record.candidate.display_name == *wanted,
            // Contains folds case, like the stores this fake stands in for.
            NameFilter::Contains(wanted) => record
                .candidate
                .display_name
                .to_lowercase()
                .contains(&wanted.to_lowercase()),
        };
        if !matched {
            return false;
        }
    }
    if let Some(window) = &query.window {
        let at = event_time(&record.candidate);
        if at < window.start || at >= window.end {
            return false;
        }
    }
    true
}

/// The instant a record occupies on a timeline: its start time when it has
/// one, its modification time otherwise.
fn event_time(candidate: &Candidate) -> DateTime<Utc> {
    candidate
        .extra
        .get(extra_keys::START_TIME)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(candidate.modified_at)
}

impl ResourceProvider for TestStoreProvider {
    type Error = Error;

    fn search(
        &self,
        query: &SearchQuery,
        page: &PageRequest,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send {
        ready(self.do_search(query, page))
    }

    fn get(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send {
        ready(self.do_get(kind, id))
    }

    fn create(
        &self,
        kind: ResourceKind,
        fields: Fields,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send {
        ready(self.do_create(kind, fields))
    }

    fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        fields: Fields,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        ready(self.do_update(kind, id, fields))
    }

    fn delete(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        ready(self.do_delete(kind, id))
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use deskhand_provider::TimeWindow;

    use super::*;

    fn candidate(id: &str, name: &str, day: u32) -> Candidate {
        Candidate::new(
            ResourceId::new(id),
            name,
            Utc.with_ymd_and_hms(2024, 1, day, 12, 0, 0).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_search_filters_and_orders() {
        let store = TestStoreProvider::default();
        store.add(ResourceKind::Document, candidate("d1", "Meeting Notes", 5));
        store.add(ResourceKind::Document, candidate("d2", "Meeting Notes", 10));
        store.add_trashed(ResourceKind::Document, candidate("d3", "Meeting Notes", 7));
        store.add(ResourceKind::Document, candidate("d4", "Roadmap", 9));

        let query = SearchQuery::new(ResourceKind::Document)
            .with_name(NameFilter::Contains("meeting".to_owned()));
        let page = store
            .search(&query, &PageRequest::first(10))
            .await
            .unwrap();
        let ids: Vec<&str> =
            page.items.iter().map(|c| c.id.as_str()).collect();
        // Trashed d3 is invisible; d2 is newer than d1.
        assert_eq!(ids, ["d2", "d1"]);
        assert!(page.next_page.is_none());
    }

    #[tokio::test]
    async fn test_search_paging_tokens() {
        let store = TestStoreProvider::default();
        for day in 1..=5 {
            store.add(
                ResourceKind::Email,
                candidate(&format!("m{day}"), "digest", day),
            );
        }

        let query = SearchQuery::new(ResourceKind::Email);
        let first = store
            .search(&query, &PageRequest::first(2))
            .await
            .unwrap();
        assert_eq!(first.items.len(), 2);
        let token = first.next_page.unwrap();

        let second = store
            .search(&query, &PageRequest::after(2, token))
            .await
            .unwrap();
        assert_eq!(second.items.len(), 2);
        assert!(second.next_page.is_some());
        assert_eq!(store.search_requests(), 2);
    }

    #[tokio::test]
    async fn test_window_filter_uses_start_time() {
        let store = TestStoreProvider::default();
        let mut event = candidate("e1", "Standup", 1);
        event.extra.insert(
            extra_keys::START_TIME.to_owned(),
            json!("2024-03-01T09:00:00Z"),
        );
        store.add(ResourceKind::Event, event);

        let window = TimeWindow {
            start: Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 2, 0, 0, 0).unwrap(),
        };
        let query = SearchQuery::new(ResourceKind::Event).within(window);
        let page = store
            .search(&query, &PageRequest::first(10))
            .await
            .unwrap();
        assert_eq!(page.items.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_failure_injection() {
        let store = TestStoreProvider::default();
        store.add(ResourceKind::Event, candidate("e1", "Standup", 1));
        store.fail_deletes_of(ResourceId::new("e1"));

        let err = store
            .delete(ResourceKind::Event, &ResourceId::new("e1"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RemoteUnavailable);
        assert_eq!(store.delete_attempts(), 1);
        assert!(store.deleted_ids().is_empty());
    }
}
