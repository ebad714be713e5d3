use deskhand_core::op::{Error as OpError, OpContext, OpResult, Operation};
use deskhand_core::{
    BatchCriteria, Guarded, delete_events_matching, delete_resource,
};
use deskhand_provider::{ResourceId, ResourceProvider};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use super::{parse_date, parse_kind, parse_scope};

const CONFIRM_DELETE_REASON: &str =
    "Please confirm deletion by setting confirm=true";
const CONFIRM_BATCH_REASON: &str =
    "Please confirm batch deletion by setting confirm=true";

#[derive(Deserialize, JsonSchema)]
pub struct DeleteResourceParameters {
    #[schemars(description = "Kind of resource: document, event, email, or file.")]
    kind: String,
    #[schemars(description = "Id of the resource to delete.")]
    id: String,
    #[schemars(description = "Must be true for the delete to run.")]
    confirm: Option<bool>,
}

/// An operation that deletes one resource, gated behind explicit
/// confirmation.
pub struct DeleteResourceOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> DeleteResourceOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(DeleteResourceParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for DeleteResourceOp<P> {
    type Input = DeleteResourceParameters;

    fn name(&self) -> &str {
        "delete_resource"
    }

    fn description(&self) -> &str {
        r#"
Deletes one resource by id. Requires confirm=true; without it nothing is sent to the remote store and the result asks for confirmation."#
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
            let confirm = input.confirm.unwrap_or(false);

            let outcome =
                delete_resource(ctx.provider().as_ref(), kind, &id, confirm)
                    .await
                    .map_err(|err| OpError::from_provider(&err))?;
            match outcome {
                Guarded::ConfirmationRequired => {
                    Err(OpError::confirmation_required()
                        .with_reason(CONFIRM_DELETE_REASON))
                }
                Guarded::Done(()) => Ok(json!({
                    "id": id,
                    "message": format!(
                        "{kind} {id} has been deleted successfully"
                    ),
                })),
            }
        }
    }
}

#[derive(Deserialize, JsonSchema)]
pub struct DeleteEventsMatchingParameters {
    #[schemars(description = "Only delete events on this day, YYYY-MM-DD. Without it the next 30 days are in scope.")]
    date: Option<String>,
    #[schemars(description = "Only delete events whose name contains this fragment.")]
    name_contains: Option<String>,
    #[schemars(description = "instance (default) deletes single occurrences and never touches recurring series; series deletes whole series.")]
    scope: Option<String>,
    #[schemars(description = "Must be true for the deletes to run.")]
    confirm: Option<bool>,
}

/// An operation that deletes every event matching a date and/or name
/// criteria, gated behind explicit confirmation.
pub struct DeleteEventsMatchingOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> DeleteEventsMatchingOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(DeleteEventsMatchingParameters)
                .to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for DeleteEventsMatchingOp<P> {
    type Input = DeleteEventsMatchingParameters;

    fn name(&self) -> &str {
        "delete_events_matching"
    }

    fn description(&self) -> &str {
        r#"
Deletes every calendar event matching the given day and/or name fragment. Requires confirm=true.
Deletes are best-effort: one failure does not stop the rest, and the result reports per-id outcomes. Recurring series are only deleted under scope=series."#
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
            let mut criteria = BatchCriteria {
                date: None,
                name_contains: input.name_contains,
                scope: Default::default(),
            };
            if let Some(date) = &input.date {
                criteria.date = Some(parse_date(date)?);
            }
            if let Some(scope) = &input.scope {
                criteria.scope = parse_scope(scope)?;
            }
            let confirm = input.confirm.unwrap_or(false);

            let outcome = delete_events_matching(
                ctx.provider().as_ref(),
                &criteria,
                confirm,
            )
            .await
            .map_err(|err| OpError::from_provider(&err))?;
            let outcome = match outcome {
                Guarded::ConfirmationRequired => {
                    return Err(OpError::confirmation_required()
                        .with_reason(CONFIRM_BATCH_REASON));
                }
                Guarded::Done(outcome) => outcome,
            };

            let mut message =
                format!("Deleted {} events", outcome.deleted.len());
            if !outcome.failed.is_empty() {
                message.push_str(&format!(
                    ", {} failed",
                    outcome.failed.len()
                ));
            }
            if !outcome.skipped_series.is_empty() {
                message.push_str(&format!(
                    "; {} recurring series left untouched, re-run with \
                     scope=series to delete them",
                    outcome.skipped_series.len()
                ));
            }

            Ok(json!({
                "deleted": outcome.deleted.len(),
                "failed": outcome.failed.len(),
                "deleted_ids": outcome.deleted,
                "failures": outcome
                    .failed
                    .iter()
                    .map(|(id, reason)| json!({ "id": id, "reason": reason }))
                    .collect::<Vec<_>>(),
                "skipped_series_ids": outcome.skipped_series,
                "message": message,
            }))
        }
    }
}
