use chrono::{DateTime, Utc};

use crate::ResourceKind;

/// A predicate on resource display names.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NameFilter {
    /// The name equals the given string, case-sensitively.
    Equals(String),
    /// The name contains the given string. Case behavior follows the
    /// provider's own `contains` semantics.
    Contains(String),
}

/// A half-open time window `[start, end)` resources must fall into.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TimeWindow {
    /// Inclusive lower bound.
    pub start: DateTime<Utc>,
    /// Exclusive upper bound.
    pub end: DateTime<Utc>,
}

/// The ordering a search should apply to its results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderBy {
    /// Most recently modified first.
    #[default]
    ModifiedDesc,
    /// Soonest start time first. Only meaningful for events.
    StartAsc,
}

/// A filter expression for [`search`](crate::ResourceProvider::search).
///
/// Providers must support the name predicates and the not-trashed
/// predicate; the remaining fields are best-effort narrowing a provider
/// may also apply server-side.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchQuery {
    /// The kind of resource to search.
    pub kind: ResourceKind,
    /// Optional predicate on the display name.
    pub name: Option<NameFilter>,
    /// A sub-store to search within: a mailbox (`inbox`, `drafts`,
    /// `trash`), a calendar id (`primary`), a folder.
    pub collection: Option<String>,
    /// Restricts results to a time window, when the kind has a natural
    /// event time.
    pub window: Option<TimeWindow>,
    /// Whether soft-deleted/trashed resources are included.
    pub include_trashed: bool,
    /// Requested result ordering.
    pub order_by: OrderBy,
}

impl SearchQuery {
    /// Creates a query matching every non-trashed resource of a kind.
    pub fn new(kind: ResourceKind) -> Self {
        Self {
            kind,
            name: None,
            collection: None,
            window: None,
            include_trashed: false,
            order_by: OrderBy::default(),
        }
    }

    /// Sets a name predicate.
    #[inline]
    pub fn with_name(mut self, name: NameFilter) -> Self {
        self.name = Some(name);
        self
    }

    /// Restricts the query to a sub-store.
    #[inline]
    pub fn in_collection<S: Into<String>>(mut self, collection: S) -> Self {
        self.collection = Some(collection.into());
        self
    }

    /// Restricts the query to a time window.
    #[inline]
    pub fn within(mut self, window: TimeWindow) -> Self {
        self.window = Some(window);
        self
    }

    /// Sets the requested ordering.
    #[inline]
    pub fn order_by(mut self, order: OrderBy) -> Self {
        self.order_by = order;
        self
    }
}

/// An opaque continuation token returned by a paged listing.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageToken(String);

impl PageToken {
    /// Creates a token from its string form.
    #[inline]
    pub fn new<S: Into<String>>(token: S) -> Self {
        Self(token.into())
    }

    /// Returns the string form of the token.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Paging parameters for one `search` call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PageRequest {
    /// Maximum number of items the page may carry.
    pub size: usize,
    /// Continuation token from the previous page, absent for the first.
    pub token: Option<PageToken>,
}

impl PageRequest {
    /// Creates a request for the first page of the given size.
    #[inline]
    pub fn first(size: usize) -> Self {
        Self { size, token: None }
    }

    /// Creates a request for the page following the given token.
    #[inline]
    pub fn after(size: usize, token: PageToken) -> Self {
        Self {
            size,
            token: Some(token),
        }
    }
}
