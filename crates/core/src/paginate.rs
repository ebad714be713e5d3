use deskhand_provider::{
    Candidate, PageRequest, ResourceProvider, SearchQuery,
};

/// Walks a paged listing and materializes up to `max_items` results.
///
/// Pages of `batch_size` are requested until either enough items have been
/// collected or the provider stops returning a continuation token; the
/// final batch is truncated to exactly `max_items`. At most
/// `ceil(max_items / batch_size)` pages are ever requested.
///
/// Each call is one complete logical listing: no token survives between
/// calls, so re-invoking from scratch is always safe.
pub async fn paginate<P: ResourceProvider>(
    provider: &P,
    query: &SearchQuery,
    max_items: usize,
    batch_size: usize,
) -> Result<Vec<Candidate>, P::Error> {
    let mut items = Vec::new();
    if max_items == 0 || batch_size == 0 {
        return Ok(items);
    }

    let mut token = None;
    let page_budget = max_items.div_ceil(batch_size);
    for _ in 0..page_budget {
        let request = PageRequest {
            size: batch_size,
            token,
        };
        let page = provider.search(query, &request).await?;
        items.extend(page.items);
        if items.len() >= max_items {
            break;
        }
        match page.next_page {
            Some(next) => token = Some(next),
            None => break,
        }
    }

    items.truncate(max_items);
    trace!("paginated {} {} items", items.len(), query.kind);
    Ok(items)
}
