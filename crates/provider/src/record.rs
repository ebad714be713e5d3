use std::fmt::{self, Display};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An opaque, durable identifier of a remote resource.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResourceId(String);

impl ResourceId {
    /// Creates an id from its string form.
    #[inline]
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    /// Returns the string form of the id.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The kind of remote resource a call operates on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A rich-text document.
    Document,
    /// A calendar event (possibly one instance of a recurring series).
    Event,
    /// An email message.
    Email,
    /// A generic stored file.
    File,
}

impl ResourceKind {
    /// Returns the canonical lowercase name of the kind.
    pub fn as_str(self) -> &'static str {
        match self {
            ResourceKind::Document => "document",
            ResourceKind::Event => "event",
            ResourceKind::Email => "email",
            ResourceKind::File => "file",
        }
    }
}

impl Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field payload for `create` and `update` calls.
///
/// Keys follow the conventions of [`extra_keys`] where the core needs to
/// interpret them; everything else is passed through to the provider.
pub type Fields = Map<String, Value>;

/// One remote resource found by a search.
///
/// Candidates are immutable once returned by a provider; the core only
/// copies them into its session state, it never mutates them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// The durable identifier of the resource.
    pub id: ResourceId,
    /// The human-facing name (title, event summary, email subject).
    pub display_name: String,
    /// When the resource was last touched.
    pub modified_at: DateTime<Utc>,
    /// Kind-specific fields under the well-known [`extra_keys`].
    #[serde(default)]
    pub extra: Map<String, Value>,
}

impl Candidate {
    /// Creates a candidate with no kind-specific fields.
    pub fn new<S: Into<String>>(
        id: ResourceId,
        display_name: S,
        modified_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            display_name: display_name.into(),
            modified_at,
            extra: Map::new(),
        }
    }

    /// The id of the recurring series this event belongs to, if any.
    ///
    /// A candidate whose series id equals its own id is the series master;
    /// deleting it would delete every instance.
    #[inline]
    pub fn series_id(&self) -> Option<&str> {
        self.extra.get(extra_keys::SERIES_ID).and_then(Value::as_str)
    }

    /// Returns whether this candidate is a recurring-series master record.
    #[inline]
    pub fn is_series_master(&self) -> bool {
        self.series_id() == Some(self.id.as_str())
    }
}

/// Well-known keys for [`Candidate::extra`] and [`Fields`].
pub mod extra_keys {
    /// Event start time, RFC 3339.
    pub const START_TIME: &str = "startTime";
    /// Event end time, RFC 3339.
    pub const END_TIME: &str = "endTime";
    /// Id of the recurring series an event belongs to.
    pub const SERIES_ID: &str = "seriesId";
    /// Browser link to an event.
    pub const EVENT_LINK: &str = "eventLink";
    /// Conference link attached to an event.
    pub const MEET_LINK: &str = "meetLink";
    /// Whether a conference link should be attached on creation.
    pub const WITH_CONFERENCE: &str = "withConference";
    /// Event title, document title, or email subject.
    pub const SUMMARY: &str = "summary";
    /// MIME type of a stored file.
    pub const MIME_TYPE: &str = "mimeType";
    /// Sender of an email message.
    pub const FROM: &str = "from";
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_series_accessors() {
        let mut master = Candidate::new(
            ResourceId::new("ev-1"),
            "Standup",
            Utc::now(),
        );
        master
            .extra
            .insert(extra_keys::SERIES_ID.to_owned(), json!("ev-1"));
        assert!(master.is_series_master());

        let mut instance = Candidate::new(
            ResourceId::new("ev-1_20240301"),
            "Standup",
            Utc::now(),
        );
        instance
            .extra
            .insert(extra_keys::SERIES_ID.to_owned(), json!("ev-1"));
        assert_eq!(instance.series_id(), Some("ev-1"));
        assert!(!instance.is_series_master());

        let one_off =
            Candidate::new(ResourceId::new("ev-2"), "Lunch", Utc::now());
        assert_eq!(one_off.series_id(), None);
        assert!(!one_off.is_series_master());
    }
}
