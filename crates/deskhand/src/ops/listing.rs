use chrono::{Duration, NaiveTime, Utc};
use deskhand_core::op::{Error as OpError, OpContext, OpResult, Operation};
use deskhand_core::paginate;
use deskhand_provider::{
    Candidate, NameFilter, OrderBy, ResourceId, ResourceKind,
    ResourceProvider, SearchQuery, TimeWindow, extra_keys,
};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{parse_date, parse_kind};

const LIST_MAX_DEFAULT: usize = 25;
const LIST_BATCH: usize = 10;

const MESSAGE_MAX_DEFAULT: usize = 10;
const MESSAGE_BATCH: usize = 5;
const MAILBOXES: &[&str] = &["inbox", "drafts", "trash", "sent"];

const EVENT_MAX: usize = 100;
const EVENT_BATCH: usize = 25;
const PRIMARY_CALENDAR: &str = "primary";

#[derive(Deserialize, JsonSchema)]
pub struct ListResourcesParameters {
    #[schemars(description = "Kind of resource: document, event, email, or file.")]
    kind: String,
    #[schemars(description = "Only list resources whose name contains this fragment.")]
    name_contains: Option<String>,
    #[schemars(description = "Sub-store to list from, e.g. a folder.")]
    collection: Option<String>,
    #[schemars(description = "Most items to return, default 25.")]
    max_items: Option<usize>,
}

/// An operation that lists resources of a kind, most recently modified
/// first.
pub struct ListResourcesOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> ListResourcesOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(ListResourcesParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for ListResourcesOp<P> {
    type Input = ListResourcesParameters;

    fn name(&self) -> &str {
        "list_resources"
    }

    fn description(&self) -> &str {
        r#"
Lists resources of a kind, most recently modified first, optionally narrowed to a name fragment.
Walks the remote store's pages up to max_items; trashed resources are never listed."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static {
        let ctx = self.ctx.clone();
        async move {
            let kind = parse_kind(&input.kind)?;
            let mut query = SearchQuery::new(kind);
            if let Some(fragment) = input.name_contains {
                query = query.with_name(NameFilter::Contains(fragment));
            }
            if let Some(collection) = input.collection {
                query = query.in_collection(collection);
            }
            let max_items = input.max_items.unwrap_or(LIST_MAX_DEFAULT);

            let items = paginate(
                ctx.provider().as_ref(),
                &query,
                max_items,
                LIST_BATCH,
            )
            .await
            .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "count": items.len(),
                "items": items.iter().map(resource_entry).collect::<Vec<_>>(),
                "message": format!("Found {} {kind}s", items.len()),
            }))
        }
    }
}

fn resource_entry(candidate: &Candidate) -> Value {
    json!({
        "id": candidate.id,
        "name": candidate.display_name,
        "modified": candidate.modified_at.to_rfc3339(),
    })
}

#[derive(Deserialize, JsonSchema)]
pub struct ListMessagesParameters {
    #[schemars(description = "Mailbox to list: inbox, drafts, trash, or sent. Default inbox.")]
    mailbox: Option<String>,
    #[schemars(description = "Most messages to return, default 10.")]
    max_items: Option<usize>,
}

/// An operation that lists email messages from one mailbox.
pub struct ListMessagesOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> ListMessagesOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(ListMessagesParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for ListMessagesOp<P> {
    type Input = ListMessagesParameters;

    fn name(&self) -> &str {
        "list_messages"
    }

    fn description(&self) -> &str {
        r#"
Lists recent email messages (subject, sender, id) from one mailbox, newest first."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static {
        let ctx = self.ctx.clone();
        async move {
            let mailbox =
                input.mailbox.unwrap_or_else(|| "inbox".to_owned());
            if !MAILBOXES.contains(&mailbox.as_str()) {
                return Err(OpError::invalid_input().with_reason(format!(
                    "unknown mailbox {mailbox:?}, expected one of {MAILBOXES:?}"
                )));
            }
            let max_items = input.max_items.unwrap_or(MESSAGE_MAX_DEFAULT);
            let query = SearchQuery::new(ResourceKind::Email)
                .in_collection(mailbox.clone());

            let items = paginate(
                ctx.provider().as_ref(),
                &query,
                max_items,
                MESSAGE_BATCH,
            )
            .await
            .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "mailbox": mailbox,
                "count": items.len(),
                "items": items.iter().map(message_entry).collect::<Vec<_>>(),
                "message": format!(
                    "Found {} messages in {mailbox}",
                    items.len()
                ),
            }))
        }
    }
}

fn message_entry(candidate: &Candidate) -> Value {
    json!({
        "id": candidate.id,
        "subject": candidate.display_name,
        "from": candidate
            .extra
            .get(extra_keys::FROM)
            .and_then(Value::as_str)
            .unwrap_or(""),
    })
}

#[derive(Deserialize, JsonSchema)]
pub struct ListEventsParameters {
    #[schemars(description = "First day to list, YYYY-MM-DD. Default today.")]
    start_date: Option<String>,
    #[schemars(description = "How many days the listing spans, default 1.")]
    days: Option<i64>,
}

/// An operation that lists calendar events inside a date window.
pub struct ListEventsOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> ListEventsOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(ListEventsParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for ListEventsOp<P> {
    type Input = ListEventsParameters;

    fn name(&self) -> &str {
        "list_events"
    }

    fn description(&self) -> &str {
        r#"
Lists calendar events between start_date and start_date + days, soonest first.
Use days = 1 for a single day, 7 for a week, 30 for a month."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static {
        let ctx = self.ctx.clone();
        async move {
            let start_day = match &input.start_date {
                Some(date) => parse_date(date)?,
                None => Utc::now().date_naive(),
            };
            let days = input.days.unwrap_or(1);
            if days < 1 {
                return Err(OpError::invalid_input()
                    .with_reason("days must be at least 1"));
            }
            let start = start_day.and_time(NaiveTime::MIN).and_utc();
            let window = TimeWindow {
                start,
                end: start + Duration::days(days),
            };
            let query = SearchQuery::new(ResourceKind::Event)
                .in_collection(PRIMARY_CALENDAR)
                .within(window)
                .order_by(OrderBy::StartAsc);

            let items = paginate(
                ctx.provider().as_ref(),
                &query,
                EVENT_MAX,
                EVENT_BATCH,
            )
            .await
            .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "count": items.len(),
                "items": items.iter().map(event_entry).collect::<Vec<_>>(),
                "message": format!(
                    "Found {} events starting {start_day}",
                    items.len()
                ),
            }))
        }
    }
}

fn event_entry(candidate: &Candidate) -> Value {
    json!({
        "id": candidate.id,
        "summary": candidate.display_name,
        "start": candidate
            .extra
            .get(extra_keys::START_TIME)
            .and_then(Value::as_str)
            .unwrap_or(""),
        "end": candidate
            .extra
            .get(extra_keys::END_TIME)
            .and_then(Value::as_str)
            .unwrap_or(""),
    })
}

#[derive(Deserialize, JsonSchema)]
pub struct ReadResourceParameters {
    #[schemars(description = "Kind of resource: document, event, email, or file.")]
    kind: String,
    #[schemars(description = "The resource id, as returned by a listing or a resolution.")]
    id: String,
}

/// An operation that fetches one resource's full record by id.
pub struct ReadResourceOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> ReadResourceOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(ReadResourceParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for ReadResourceOp<P> {
    type Input = ReadResourceParameters;

    fn name(&self) -> &str {
        "read_resource"
    }

    fn description(&self) -> &str {
        r#"
Fetches the full stored record of one resource by id."#
    }

    fn parameter_schema(&self) -> &Value {
        &self.parameter_schema
    }

    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static {
        let ctx = self.ctx.clone();
        async move {
            let kind = parse_kind(&input.kind)?;
            let id = ResourceId::new(input.id);
            let record = ctx
                .provider()
                .get(kind, &id)
                .await
                .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "id": record.id,
                "name": record.display_name,
                "modified": record.modified_at.to_rfc3339(),
                "fields": record.extra,
                "message": format!("Fetched {kind} {id}"),
            }))
        }
    }
}
