use std::sync::Arc;

use deskhand_core::Session;
use deskhand_core::op::{Executor, OpContext, OpDefinition};
use deskhand_provider::ResourceProvider;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::ops::*;

/// A desk builder.
///
/// See [`Desk`].
pub struct DeskBuilder<P: ResourceProvider> {
    provider: Arc<P>,
}

impl<P: ResourceProvider + 'static> DeskBuilder<P> {
    /// Creates a desk builder with a specified resource provider.
    pub fn with_provider(provider: P) -> Self {
        Self {
            provider: Arc::new(provider),
        }
    }

    /// Builds a new desk with a fresh session.
    pub fn build(self) -> Desk {
        let session = Arc::new(Mutex::new(Session::new()));
        let ctx = OpContext::new(session, self.provider);

        let mut executor = Executor::default();
        executor.register(ResolveReferenceOp::new(ctx.clone()));
        executor.register(PickCandidateOp::new(ctx.clone()));
        executor.register(ListResourcesOp::new(ctx.clone()));
        executor.register(ListMessagesOp::new(ctx.clone()));
        executor.register(ListEventsOp::new(ctx.clone()));
        executor.register(ReadResourceOp::new(ctx.clone()));
        executor.register(CreateEventOp::new(ctx.clone()));
        executor.register(UpdateEventOp::new(ctx.clone()));
        executor.register(DeleteResourceOp::new(ctx.clone()));
        executor.register(DeleteEventsMatchingOp::new(ctx));
        executor.register(CurrentTimeOp::new());

        Desk { executor }
    }
}

/// One conversation's working surface, like the desk an assistant keeps
/// their notes on while you talk to them.
///
/// The desk owns exactly one session (the reference cache and any pending
/// disambiguation) and exposes every operation over it. Each conversation
/// gets its own desk; dropping it drops all session state, nothing is
/// persisted across conversations.
pub struct Desk {
    executor: Executor,
}

impl Desk {
    /// Invokes a named operation with JSON arguments.
    ///
    /// The result is always a structured `{status, ...}` object, whatever
    /// happens inside the operation.
    #[inline]
    pub async fn call(&self, name: &str, arguments: Value) -> Value {
        self.executor.call(name, arguments).await
    }

    /// Returns the definitions of every registered operation, e.g. for
    /// declaring them to an LLM tool layer.
    #[inline]
    pub fn definitions(&self) -> Vec<OpDefinition> {
        self.executor.definitions()
    }
}
