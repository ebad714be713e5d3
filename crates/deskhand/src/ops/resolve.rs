use deskhand_core::op::{
    Error as OpError, OpContext, OpResult, Operation,
};
use deskhand_core::{ChoiceOutcome, Resolution, resolve};
use deskhand_provider::{Candidate, ResourceProvider};
use schemars::{JsonSchema, schema_for};
use serde::Deserialize;
use serde_json::{Value, json};

use super::parse_kind;

#[derive(Deserialize, JsonSchema)]
pub struct ResolveReferenceParameters {
    #[schemars(description = "Kind of resource: document, event, email, or file.")]
    kind: String,
    #[schemars(description = "The human reference to resolve, e.g. a title or an event name.")]
    reference: String,
}

/// An operation that resolves a human reference to a durable resource id.
pub struct ResolveReferenceOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> ResolveReferenceOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(ResolveReferenceParameters)
                .to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for ResolveReferenceOp<P> {
    type Input = ResolveReferenceParameters;

    fn name(&self) -> &str {
        "resolve_reference"
    }

    fn description(&self) -> &str {
        r#"
Resolves a human reference (a document title, an event name) to a durable resource id.
References resolved earlier in the conversation are answered from memory without touching the remote store. When several resources match, the result carries a numbered candidate list; follow up with pick_candidate once the user has chosen."#
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
            let mut session = ctx.session().lock().await;
            let resolution = resolve(
                &mut session,
                ctx.provider().as_ref(),
                kind,
                &input.reference,
            )
            .await
            .map_err(|err| OpError::from_provider(&err))?;

            Ok(match resolution {
                Resolution::Cached(id) => json!({
                    "resolution": "cached",
                    "id": id,
                    "message": format!(
                        "\"{}\" was already resolved to {id} in this conversation",
                        input.reference
                    ),
                }),
                Resolution::Unique(candidate) => json!({
                    "resolution": "unique",
                    "id": candidate.id,
                    "name": candidate.display_name,
                    "message": format!(
                        "Resolved \"{}\" to {}",
                        input.reference, candidate.id
                    ),
                }),
                Resolution::Ambiguous(candidates) => {
                    let listing = session.pending().enumerate();
                    json!({
                        "resolution": "ambiguous",
                        "candidates": candidate_entries(&candidates),
                        "message": format!(
                            "Multiple {kind}s match \"{}\". Ask the user to \
                             pick one:\n{listing}",
                            input.reference
                        ),
                    })
                }
                Resolution::NotFound => json!({
                    "resolution": "not_found",
                    "message": format!(
                        "No {kind} matched \"{}\"",
                        input.reference
                    ),
                }),
            })
        }
    }
}

fn candidate_entries(candidates: &[Candidate]) -> Value {
    Value::Array(
        candidates
            .iter()
            .enumerate()
            .map(|(index, candidate)| {
                json!({
                    "ordinal": index + 1,
                    "id": candidate.id,
                    "name": candidate.display_name,
                    "modified": candidate.modified_at.to_rfc3339(),
                })
            })
            .collect(),
    )
}

#[derive(Deserialize, JsonSchema)]
pub struct PickCandidateParameters {
    #[schemars(description = "The user's choice: an ordinal like \"2\" or \"use 2\", or part of a candidate's title.")]
    choice: String,
}

/// An operation that collapses a pending multi-candidate resolution to a
/// single id using the user's follow-up choice.
pub struct PickCandidateOp<P: ResourceProvider> {
    ctx: OpContext<P>,
    parameter_schema: Value,
}

impl<P: ResourceProvider> PickCandidateOp<P> {
    /// Creates the operation over the given context.
    #[inline]
    pub fn new(ctx: OpContext<P>) -> Self {
        Self {
            ctx,
            parameter_schema: schema_for!(PickCandidateParameters).to_value(),
        }
    }
}

impl<P: ResourceProvider + 'static> Operation for PickCandidateOp<P> {
    type Input = PickCandidateParameters;

    fn name(&self) -> &str {
        "pick_candidate"
    }

    fn description(&self) -> &str {
        r#"
Applies the user's follow-up choice to the candidate list a previous resolve_reference offered.
Accepts an ordinal ("2", "use 2") or a partial title. On a miss the candidates stay offered, so the user can simply be asked again."#
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
            let mut session = ctx.session().lock().await;
            Ok(match session.choose(&input.choice) {
                ChoiceOutcome::Resolved(id) => json!({
                    "outcome": "resolved",
                    "id": id,
                    "message": format!("Picked {id}"),
                }),
                ChoiceOutcome::NoPendingDisambiguation => json!({
                    "outcome": "no_pending_disambiguation",
                    "message": "There is nothing to pick from; resolve a \
                                reference first",
                }),
                ChoiceOutcome::NoMatch => {
                    let listing = session.pending().enumerate();
                    json!({
                        "outcome": "no_match",
                        "message": format!(
                            "\"{}\" matched none of the offered candidates. \
                             Still offering:\n{listing}",
                            input.choice
                        ),
                    })
                }
            })
        }
    }
}
