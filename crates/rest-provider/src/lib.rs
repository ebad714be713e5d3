//! A resource provider for generic JSON listing APIs.
//!
//! The provider speaks a plain REST dialect: one collection path per
//! resource kind, `q`-style filter expressions, opaque page tokens, and
//! JSON record bodies. Transient failures (429 and 5xx classes) are
//! retried here with bounded exponential backoff, so the resolution core
//! only ever sees terminal outcomes.

#[macro_use]
extern crate tracing;

mod config;
mod proto;
mod retry;

use std::error::Error as StdError;
use std::fmt::{self, Display};
use std::sync::Arc;

use deskhand_provider::{
    Candidate, ErrorKind, Fields, PageRequest, PageToken, ProviderError,
    ResourceId, ResourceKind, ResourceProvider, SearchPage, SearchQuery,
};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

pub use config::{RestConfig, RestConfigBuilder};
use proto::{ListDto, RecordDto};

/// Error type for [`RestProvider`].
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

    /// Returns the error message.
    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl StdError for Error {}

impl ProviderError for Error {
    #[inline]
    fn kind(&self) -> ErrorKind {
        self.kind
    }
}

fn classify_status(status: StatusCode) -> ErrorKind {
    match status {
        StatusCode::NOT_FOUND => ErrorKind::NotFound,
        StatusCode::TOO_MANY_REQUESTS => ErrorKind::RateLimited,
        _ => ErrorKind::RemoteUnavailable,
    }
}

/// REST resource provider.
#[derive(Clone, Debug)]
pub struct RestProvider {
    client: Client,
    config: Arc<RestConfig>,
}

impl RestProvider {
    /// Creates a new `RestProvider` with the given configuration.
    #[inline]
    pub fn new(config: RestConfig) -> Self {
        Self {
            client: Client::new(),
            config: Arc::new(config),
        }
    }

    fn collection_url(&self, kind: ResourceKind) -> String {
        format!("{}/{}", self.config.base_url, proto::kind_path(kind))
    }

    fn record_url(&self, kind: ResourceKind, id: &ResourceId) -> String {
        format!(
            "{}/{}/{}",
            self.config.base_url,
            proto::kind_path(kind),
            id
        )
    }
}

/// Sends one request, rebuilt per attempt, retrying transient failures
/// with the crate's backoff policy.
async fn send_with_retry(
    client: &Client,
    config: &RestConfig,
    method: Method,
    url: &str,
    params: &[(String, String)],
    body: Option<&Value>,
) -> Result<reqwest::Response, Error> {
    backoff::future::retry(retry::policy(), || async {
        let mut request = client.request(method.clone(), url);
        if !params.is_empty() {
            request = request.query(params);
        }
        if let Some(token) = &config.bearer_token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|err| {
            warn!("request to {url} failed: {err}");
            backoff::Error::transient(Error::new(
                format!("{err}"),
                ErrorKind::RemoteUnavailable,
            ))
        })?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let err =
            Error::new(format!("{url} answered {status}"), classify_status(status));
        if retry::is_retryable_status(status) {
            warn!("request to {url} answered {status}, retrying");
            Err(backoff::Error::transient(err))
        } else {
            Err(backoff::Error::permanent(err))
        }
    })
    .await
}

async fn decode<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
) -> Result<T, Error> {
    response.json().await.map_err(|err| {
        Error::new(
            format!("malformed response body: {err}"),
            ErrorKind::RemoteUnavailable,
        )
    })
}

impl ResourceProvider for RestProvider {
    type Error = Error;

    fn search(
        &self,
        query: &SearchQuery,
        page: &PageRequest,
    ) -> impl Future<Output = Result<SearchPage, Self::Error>> + Send {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let url = self.collection_url(query.kind);
        let params = proto::query_params(query, page);
        async move {
            trace!("searching {url} with {} params", params.len());
            let response = send_with_retry(
                &client,
                &config,
                Method::GET,
                &url,
                &params,
                None,
            )
            .await?;
            let list: ListDto = decode(response).await?;
            Ok(SearchPage {
                items: list
                    .items
                    .into_iter()
                    .map(RecordDto::into_candidate)
                    .collect(),
                next_page: list.next_page_token.map(PageToken::new),
            })
        }
    }

    fn get(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let url = self.record_url(kind, id);
        async move {
            let response =
                send_with_retry(&client, &config, Method::GET, &url, &[], None)
                    .await?;
            let record: RecordDto = decode(response).await?;
            Ok(record.into_candidate())
        }
    }

    fn create(
        &self,
        kind: ResourceKind,
        fields: Fields,
    ) -> impl Future<Output = Result<Candidate, Self::Error>> + Send {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let url = self.collection_url(kind);
        let body = Value::Object(fields);
        async move {
            let response = send_with_retry(
                &client,
                &config,
                Method::POST,
                &url,
                &[],
                Some(&body),
            )
            .await?;
            let record: RecordDto = decode(response).await?;
            debug!("created {kind} {}", record.id);
            Ok(record.into_candidate())
        }
    }

    fn update(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
        fields: Fields,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let url = self.record_url(kind, id);
        let body = Value::Object(fields);
        async move {
            send_with_retry(
                &client,
                &config,
                Method::PATCH,
                &url,
                &[],
                Some(&body),
            )
            .await?;
            Ok(())
        }
    }

    fn delete(
        &self,
        kind: ResourceKind,
        id: &ResourceId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        let client = self.client.clone();
        let config = Arc::clone(&self.config);
        let url = self.record_url(kind, id);
        async move {
            send_with_retry(&client, &config, Method::DELETE, &url, &[], None)
                .await?;
            Ok(())
        }
    }
}
