use deskhand_core::op::{Error as OpError, OpContext, OpResult, Operation};
use deskhand_provider::{
    Fields, ResourceId, ResourceKind, ResourceProvider, extra_keys,
};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::timeparse::parse_datetime;

const BAD_TIME_REASON: &str =
    "Invalid date/time format. Please use YYYY-MM-DD HH:MM format.";

#[derive(Deserialize, JsonSchema)]
pub struct CreateEventParameters {
    #[schemars(description = "Event title.")]
    summary: String,
    #[schemars(description = "Start time, e.g. \"2024-12-31 14:00\".")]
    start_time: String,
    #[schemars(description = "End time, e.g. \"2024-12-31 15:00\".")]
    end_time: String,
    #[schemars(description = "Whether to attach a conference link, default true.")]
    with_conference: Option<bool>,
}

/// An operation that creates a calendar event.
pub struct CreateEventOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> CreateEventOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(CreateEventParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for CreateEventOp<P> {
    type Input = CreateEventParameters;

    fn name(&self) -> &str {
        "create_event"
    }

    fn description(&self) -> &str {
        r#"
Creates a calendar event with the given title and times, attaching a conference link by default.
The result carries the new event's id, a calendar link, and the conference link when one was attached."#
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
            let Some(start) = parse_datetime(&input.start_time) else {
                return Err(
                    OpError::invalid_input().with_reason(BAD_TIME_REASON)
                );
            };
            let Some(end) = parse_datetime(&input.end_time) else {
                return Err(
                    OpError::invalid_input().with_reason(BAD_TIME_REASON)
                );
            };
            if end <= start {
                return Err(OpError::invalid_input()
                    .with_reason("end_time must be after start_time"));
            }

            let mut fields = Fields::new();
            fields.insert(
                extra_keys::SUMMARY.to_owned(),
                json!(input.summary),
            );
            fields.insert(
                extra_keys::START_TIME.to_owned(),
                json!(start.and_utc().to_rfc3339()),
            );
            fields.insert(
                extra_keys::END_TIME.to_owned(),
                json!(end.and_utc().to_rfc3339()),
            );
            fields.insert(
                extra_keys::WITH_CONFERENCE.to_owned(),
                json!(input.with_conference.unwrap_or(true)),
            );

            let event = ctx
                .provider()
                .create(ResourceKind::Event, fields)
                .await
                .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "event_id": event.id,
                "event_link": link(&event.extra, extra_keys::EVENT_LINK),
                "meet_link": link(&event.extra, extra_keys::MEET_LINK),
                "message": "Event created successfully",
            }))
        }
    }
}

fn link(extra: &serde_json::Map<String, Value>, key: &str) -> String {
    extra
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or("")
        .to_owned()
}

#[derive(Deserialize, JsonSchema)]
pub struct UpdateEventParameters {
    #[schemars(description = "Id of the event to update.")]
    event_id: String,
    #[schemars(description = "New title; omit to keep the current one.")]
    summary: Option<String>,
    #[schemars(description = "New start time; omit to keep the current one.")]
    start_time: Option<String>,
    #[schemars(description = "New end time; omit to keep the current one.")]
    end_time: Option<String>,
}

/// An operation that applies a partial update to a calendar event.
pub struct UpdateEventOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> UpdateEventOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(UpdateEventParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for UpdateEventOp<P> {
    type Input = UpdateEventParameters;

    fn name(&self) -> &str {
        "update_event"
    }

    fn description(&self) -> &str {
        r#"
Updates the title and/or times of an existing calendar event.
Omitted fields keep their current values; at least one must be given."#
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
            let mut fields = Fields::new();
            if let Some(summary) = input.summary {
                if summary.trim().is_empty() {
                    return Err(OpError::invalid_input().with_reason(
                        "summary is empty; omit it to keep the current one",
                    ));
                }
                fields
                    .insert(extra_keys::SUMMARY.to_owned(), json!(summary));
            }
            if let Some(start_time) = input.start_time {
                let Some(start) = parse_datetime(&start_time) else {
                    return Err(
                        OpError::invalid_input().with_reason(BAD_TIME_REASON)
                    );
                };
                fields.insert(
                    extra_keys::START_TIME.to_owned(),
                    json!(start.and_utc().to_rfc3339()),
                );
            }
            if let Some(end_time) = input.end_time {
                let Some(end) = parse_datetime(&end_time) else {
                    return Err(
                        OpError::invalid_input().with_reason(BAD_TIME_REASON)
                    );
                };
                fields.insert(
                    extra_keys::END_TIME.to_owned(),
                    json!(end.and_utc().to_rfc3339()),
                );
            }
            if fields.is_empty() {
                return Err(OpError::invalid_input()
                    .with_reason("nothing to update; give at least one field"));
            }

            let id = ResourceId::new(input.event_id);
            ctx.provider()
                .update(ResourceKind::Event, &id, fields)
                .await
                .map_err(|err| OpError::from_provider(&err))?;

            Ok(json!({
                "event_id": id,
                "message": "Event updated successfully",
            }))
        }
    }
}
