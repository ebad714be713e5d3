use crate::error::ProviderError;
use crate::query::{PageRequest, PageToken, SearchQuery};
use crate::record::{Candidate, Fields, ResourceId, ResourceKind};

/// One page of search results.
#[derive(Clone, Debug, Default)]
pub struct SearchPage {
    /// The matching resources, in the provider's returned order.
    pub items: Vec<Candidate>,
    /// Token for the next page, absent when the listing is exhausted.
    pub next_page: Option<PageToken>,
}

/// A type that represents a remote resource store, which is an entry for
/// listing, searching, and mutating the resources it holds.
///
/// Once the provider is created, it should behave like a stateless object.
/// It can still have internal state (connection pools, cached handles), but
/// callers should not rely on it, and the provider should be prepared for
/// being dropped anytime.
///
/// Transient failures (rate limits, flaky transports) are the provider's
/// own responsibility to retry; every error it returns is terminal for
/// that call.
pub trait ResourceProvider: Send + Sync {
    /// The error type that may be returned by the provider.
    type Error: ProviderError;

    /// Fetches one page of resources matching the query.
    fn search(
        &self,
        query: &SearchQuery,
        page: &PageRequest,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send;

    /// Fetches a single resource by id.
    ///
    /// Fails with [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) when
    /// no such resource exists.
    fn get(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send;

    /// Creates a resource and returns its stored record.
    fn create(
        &self,
        kind: ResourceKind,
        fields: Fields,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send;

    /// Applies a partial update to a resource.
    fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        fields: Fields,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;

    /// Deletes a resource.
    fn delete(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send;
}
