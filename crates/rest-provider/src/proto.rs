use chrono::{DateTime, Utc};
use deskhand_provider::{
    Candidate, NameFilter, OrderBy, PageRequest, ResourceId, ResourceKind,
    SearchQuery,
};
use serde::Deserialize;
use serde_json::{Map, Value};

/// One stored record as the remote store serializes it.
#[derive(Debug, Deserialize)]
pub(crate) struct RecordDto {
    pub id: String,
    pub name: String,
    #[serde(rename = "modifiedTime")]
    pub modified_time: DateTime<Utc>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecordDto {
    pub fn into_candidate(self) -> Candidate {
        Candidate {
            id: ResourceId::new(self.id),
            display_name: self.name,
            modified_at: self.modified_time,
            extra: self.extra,
        }
    }
}

/// One page of a listing.
#[derive(Debug, Deserialize)]
pub(crate) struct ListDto {
    #[serde(default)]
    pub items: Vec<RecordDto>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

pub(crate) fn kind_path(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Document => "documents",
        ResourceKind::Event => "events",
        ResourceKind::Email => "messages",
        ResourceKind::File => "files",
    }
}

/// Translates a query into the store's `q` filter expression plus the
/// remaining query-string parameters.
pub(crate) fn query_params(
    query: &SearchQuery,
    page: &PageRequest,
) -> Vec<(String, String)> {
    let mut clauses = Vec::new();
    match &query.name {
        Some(NameFilter::Equals(name)) => {
            clauses.push(format!("name = '{}'", escape(name)));
        }
        Some(NameFilter::Contains(name)) => {
            clauses.push(format!("name contains '{}'", escape(name)));
        }
        None => {}
    }
    if !query.include_trashed {
        clauses.push("trashed = false".to_owned());
    }

    let mut params = Vec::new();
    if !clauses.is_empty() {
        params.push(("q".to_owned(), clauses.join(" and ")));
    }
    if let Some(collection) = &query.collection {
        params.push(("collection".to_owned(), collection.clone()));
    }
    if let Some(window) = &query.window {
        params.push(("timeMin".to_owned(), rfc3339(window.start)));
        params.push(("timeMax".to_owned(), rfc3339(window.end)));
    }
    let order = match query.order_by {
        OrderBy::ModifiedDesc => "modifiedTime desc",
        OrderBy::StartAsc => "startTime",
    };
    params.push(("orderBy".to_owned(), order.to_owned()));
    params.push(("pageSize".to_owned(), page.size.to_string()));
    if let Some(token) = &page.token {
        params.push(("pageToken".to_owned(), token.as_str().to_owned()));
    }
    params
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('\'', "\\'")
}

fn rfc3339(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}
