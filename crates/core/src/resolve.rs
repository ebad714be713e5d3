use deskhand_provider::{
    Candidate, NameFilter, ResourceId, ResourceKind, ResourceProvider,
    SearchQuery,
};

use crate::paginate::paginate;
use crate::session::Session;

/// Most candidates a search pass will pull from the provider.
const PULL_LIMIT: usize = 20;
/// Page size for resolution pulls.
const PULL_BATCH: usize = 10;
/// Most candidates kept for disambiguation. The stored slice is the
/// displayed slice, so the selectable and displayed sets stay identical.
const OFFER_LIMIT: usize = 10;

/// The outcome of resolving a human reference.
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// The reference was resolved earlier in this session; no remote
    /// call was made.
    Cached(ResourceId),
    /// Exactly one remote match. Already remembered in the cache.
    Unique(Candidate),
    /// Two or more remote matches, most recently modified first. The
    /// session now holds them as its pending disambiguation.
    Ambiguous(Vec<Candidate>),
    /// No remote match after both search passes.
    NotFound,
}

/// Resolves a human reference (a title, an event name) to remote
/// candidates.
///
/// The cache is consulted first. Otherwise an exact-name search runs,
/// and only if it yields nothing, a substring search capped at 20 pulled
/// candidates. Matches are ordered by modification time, newest first: a
/// single match is cached under the normalized reference and returned as
/// [`Resolution::Unique`]; multiple matches become the session's pending
/// disambiguation, truncated to the 10 most recent.
pub async fn resolve<P: ResourceProvider>(
    session: &mut Session,
    provider: &P,
    kind: ResourceKind,
    reference: &str,
) -> Result<Resolution, P::Error> {
    if let Some(id) = session.cache().lookup(reference) {
        trace!("reference {reference:?} served from the session cache");
        return Ok(Resolution::Cached(id.clone()));
    }

    let exact = SearchQuery::new(kind)
        .with_name(NameFilter::Equals(reference.to_owned()));
    let mut matches = paginate(provider, &exact, PULL_LIMIT, PULL_BATCH).await?;
    if matches.is_empty() {
        let fuzzy = SearchQuery::new(kind)
            .with_name(NameFilter::Contains(reference.to_owned()));
        matches = paginate(provider, &fuzzy, PULL_LIMIT, PULL_BATCH).await?;
    }
    matches.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));

    if matches.is_empty() {
        debug!("reference {reference:?} matched no {kind}");
        return Ok(Resolution::NotFound);
    }
    if matches.len() == 1 {
        let candidate = matches.remove(0);
        session
            .cache_mut()
            .remember(reference, candidate.id.clone());
        return Ok(Resolution::Unique(candidate));
    }

    debug!("reference {reference:?} matched {} {kind}s", matches.len());
    matches.truncate(OFFER_LIMIT);
    session.offer(matches.clone());
    Ok(Resolution::Ambiguous(matches))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use deskhand_test_provider::TestStoreProvider;

    use super::*;

    fn day(n: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, n, 12, 0, 0).unwrap()
    }

    fn doc(id: &str, name: &str, modified: DateTime<Utc>) -> Candidate {
        Candidate::new(ResourceId::new(id), name, modified)
    }

    #[tokio::test]
    async fn test_unique_match_is_cached() {
        let store = TestStoreProvider::default();
        store.add(ResourceKind::Document, doc("d1", "Roadmap", day(3)));
        let mut session = Session::new();

        let resolution =
            resolve(&mut session, &store, ResourceKind::Document, "Roadmap")
                .await
                .unwrap();
        assert!(matches!(resolution, Resolution::Unique(c) if c.id.as_str() == "d1"));
        let first_pass_requests = store.search_requests();

        // The second resolution must not touch the remote store at all.
        let resolution =
            resolve(&mut session, &store, ResourceKind::Document, "roadmap")
                .await
                .unwrap();
        assert_eq!(resolution, Resolution::Cached(ResourceId::new("d1")));
        assert_eq!(store.search_requests(), first_pass_requests);
    }

    #[tokio::test]
    async fn test_exact_pass_wins_over_fuzzy() {
        let store = TestStoreProvider::default();
        store.add(ResourceKind::Document, doc("d1", "Plan", day(3)));
        store.add(ResourceKind::Document, doc("d2", "Plan B", day(9)));
        let mut session = Session::new();

        // "Plan B" also contains "Plan", but the exact pass already
        // produced a match, so the fuzzy pass never runs.
        let resolution =
            resolve(&mut session, &store, ResourceKind::Document, "Plan")
                .await
                .unwrap();
        assert!(matches!(resolution, Resolution::Unique(c) if c.id.as_str() == "d1"));
    }

    #[tokio::test]
    async fn test_ambiguous_populates_disambiguation() {
        let store = TestStoreProvider::default();
        store.add(ResourceKind::Document, doc("old", "Meeting Notes", day(5)));
        store.add(ResourceKind::Document, doc("new", "Meeting Notes", day(10)));
        let mut session = Session::new();

        let resolution = resolve(
            &mut session,
            &store,
            ResourceKind::Document,
            "Meeting Notes",
        )
        .await
        .unwrap();
        let Resolution::Ambiguous(candidates) = resolution else {
            panic!("expected an ambiguous resolution");
        };
        let ids: Vec<&str> =
            candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, ["new", "old"]);

        // Nothing was cached, and the pending set mirrors the returned one.
        assert!(session.cache().is_empty());
        assert_eq!(session.pending().candidates(), candidates.as_slice());
    }

    #[tokio::test]
    async fn test_fuzzy_results_truncated_to_offer_limit() {
        let store = TestStoreProvider::default();
        for n in 1..=15 {
            store.add(
                ResourceKind::Document,
                doc(&format!("d{n}"), &format!("Weekly sync {n}"), day(n)),
            );
        }
        let mut session = Session::new();

        let resolution =
            resolve(&mut session, &store, ResourceKind::Document, "weekly")
                .await
                .unwrap();
        let Resolution::Ambiguous(candidates) = resolution else {
            panic!("expected an ambiguous resolution");
        };
        assert_eq!(candidates.len(), 10);
        // Newest first: day 15 leads.
        assert_eq!(candidates[0].id.as_str(), "d15");
        assert_eq!(session.pending().candidates().len(), 10);
    }

    #[tokio::test]
    async fn test_not_found_leaves_session_untouched() {
        let store = TestStoreProvider::default();
        let mut session = Session::new();

        let resolution = resolve(
            &mut session,
            &store,
            ResourceKind::Document,
            "Quarterly Report",
        )
        .await
        .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
        assert!(session.cache().is_empty());
        assert!(!session.pending().is_pending());
    }

    #[tokio::test]
    async fn test_trashed_resources_are_invisible() {
        let store = TestStoreProvider::default();
        store.add_trashed(ResourceKind::Document, doc("d1", "Roadmap", day(3)));
        let mut session = Session::new();

        let resolution =
            resolve(&mut session, &store, ResourceKind::Document, "Roadmap")
                .await
                .unwrap();
        assert_eq!(resolution, Resolution::NotFound);
    }
}
