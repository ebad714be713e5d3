use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use deskhand_provider::{
    NameFilter, ResourceId, ResourceKind, ResourceProvider, SearchQuery,
    TimeWindow,
};
use crate::paginate::paginate;

/// Most events a bulk delete will list as its target set.
const BULK_LIST_LIMIT: usize = 100;
/// Page size for the bulk-delete listing.
const BULK_PAGE: usize = 25;
/// Lookahead when the criteria carry no date, in days.
const DEFAULT_LOOKAHEAD_DAYS: i64 = 30;

/// A destructive call gated behind explicit confirmation.
///
/// Confirmation is a hard precondition, not a retryable error: without it
/// nothing is sent to the remote store, and re-invoking with
/// `confirm = true` is always possible.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Guarded<T> {
    /// The caller did not confirm; no remote call was made.
    ConfirmationRequired,
    /// The confirmed call ran to completion.
    Done(T),
}

/// How a delete treats events that belong to a recurring series.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeleteScope {
    /// Delete single instances only; series masters are never touched.
    #[default]
    Instance,
    /// Delete whole series, each at most once.
    Series,
}

/// The scope of a bulk event deletion: a specific day (or a default
/// lookahead window), optionally narrowed to a name fragment.
#[derive(Clone, Debug, Default)]
pub struct BatchCriteria {
    /// Restrict to events on this day. Without it, the window is the next
    /// 30 days.
    pub date: Option<NaiveDate>,
    /// Restrict to events whose name contains this fragment.
    pub name_contains: Option<String>,
    /// Series handling.
    pub scope: DeleteScope,
}

/// Per-item results of a best-effort batch delete.
///
/// A failure on one id never aborts the remaining deletes; every id ends
/// up in exactly one of these buckets.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    /// Ids deleted successfully, in call order.
    pub deleted: Vec<ResourceId>,
    /// Ids whose delete failed, with the provider's reason.
    pub failed: Vec<(ResourceId, String)>,
    /// Series masters matched under [`DeleteScope::Instance`]; left
    /// untouched and reported so the caller can re-scope explicitly.
    pub skipped_series: Vec<ResourceId>,
}

/// Deletes a single resource, gated behind explicit confirmation.
pub async fn delete_resource<P: ResourceProvider>(
    provider: &P,
    kind: ResourceKind,
    id: &ResourceId,
    confirm: bool,
) -> Result<Guarded<()>, P::Error> {
    if !confirm {
        debug!("unconfirmed delete of {kind} {id} short-circuited");
        return Ok(Guarded::ConfirmationRequired);
    }
    provider.delete(kind, id).await?;
    info!("deleted {kind} {id}");
    Ok(Guarded::Done(()))
}

/// Deletes every event matching the criteria, gated behind explicit
/// confirmation.
///
/// The criteria are resolved into a candidate set through a bounded
/// window listing (the criteria day, or the next 30 days), capped at 100
/// events. Deletes are issued sequentially and best-effort; per-id
/// outcomes are collected in the returned [`BatchOutcome`]. Without
/// confirmation not even the listing runs.
pub async fn delete_events_matching<P: ResourceProvider>(
    provider: &P,
    criteria: &BatchCriteria,
    confirm: bool,
) -> Result<Guarded<BatchOutcome>, P::Error> {
    if !confirm {
        debug!("unconfirmed bulk delete short-circuited");
        return Ok(Guarded::ConfirmationRequired);
    }

    let mut query =
        SearchQuery::new(ResourceKind::Event).within(criteria_window(criteria.date));
    if let Some(fragment) = &criteria.name_contains {
        query = query.with_name(NameFilter::Contains(fragment.clone()));
    }
    let matches = paginate(provider, &query, BULK_LIST_LIMIT, BULK_PAGE).await?;

    let mut outcome = BatchOutcome::default();
    let mut targets: Vec<ResourceId> = Vec::new();
    for candidate in &matches {
        match criteria.scope {
            DeleteScope::Instance => {
                if candidate.is_series_master() {
                    warn!(
                        "not deleting series master {} under instance scope",
                        candidate.id
                    );
                    outcome.skipped_series.push(candidate.id.clone());
                } else {
                    targets.push(candidate.id.clone());
                }
            }
            DeleteScope::Series => {
                let target = candidate
                    .series_id()
                    .map(ResourceId::new)
                    .unwrap_or_else(|| candidate.id.clone());
                if !targets.contains(&target) {
                    targets.push(target);
                }
            }
        }
    }

    for id in targets {
        match provider.delete(ResourceKind::Event, &id).await {
            Ok(()) => outcome.deleted.push(id),
            Err(err) => {
                warn!("failed to delete event {id}: {err}");
                outcome.failed.push((id, err.to_string()));
            }
        }
    }
    info!(
        "bulk delete finished: {} deleted, {} failed, {} skipped",
        outcome.deleted.len(),
        outcome.failed.len(),
        outcome.skipped_series.len(),
    );
    Ok(Guarded::Done(outcome))
}

fn criteria_window(date: Option<NaiveDate>) -> TimeWindow {
    match date {
        Some(day) => {
            let start = day.and_time(NaiveTime::MIN).and_utc();
            TimeWindow {
                start,
                end: start + Duration::days(1),
            }
        }
        None => {
            let now = Utc::now();
            TimeWindow {
                start: now,
                end: now + Duration::days(DEFAULT_LOOKAHEAD_DAYS),
            }
        }
    }
}
