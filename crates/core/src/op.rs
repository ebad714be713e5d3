//! Operation dispatch supports.
//!
//! Every capability of the core is exposed as a named operation taking a
//! JSON object of primitive arguments and returning a structured
//! `{status, ...}` result, so that any front end (an LLM tool layer, a
//! CLI, an API endpoint) can drive it the same way.

mod error;
mod executor;
mod object;

use std::sync::Arc;

use deskhand_provider::ResourceProvider;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::Mutex;

use crate::session::Session;

pub use error::{Error, ErrorKind};
pub use executor::{Executor, OpDefinition};

/// The result of invoking an operation: a JSON object payload on success.
pub type OpResult = Result<Value, Error>;

/// An operation that can be invoked by a dispatching front end.
///
/// Implementations of this trait should be stateless, and may not maintain
/// any internal state.
///
/// The operation can be context-aware, meaning it can access the session
/// and the resource provider it operates on. To do this, make the context
/// an immutable state of the operation, which can be set during
/// initialization, and copy it when executing.
pub trait Operation: Send + Sync + 'static {
    /// The type of input that the operation accepts.
    type Input: DeserializeOwned;

    /// Returns the name of the operation.
    fn name(&self) -> &str;

    /// Returns the description of the operation.
    fn description(&self) -> &str;

    /// Returns the parameter schema of the operation.
    fn parameter_schema(&self) -> &Value;

    /// Executes the operation with the given input.
    ///
    /// This method must return a future that is fully independent of
    /// `self`, and the future should be cancellation safe.
    fn execute(
        &self,
        input: Self::Input,
    ) -> impl Future<Output = OpResult> + Send + 'static;
}

/// The handles an operation needs to do its work: the session and the
/// resource provider.
///
/// The session sits behind an exclusive per-session lock. Operations
/// within one turn run sequentially anyway; the lock is what keeps the
/// two-step offer/choose protocol safe if a host ever drives one session
/// from concurrent turns.
pub struct OpContext<P> {
    session: Arc<Mutex<Session>>,
    provider: Arc<P>,
}

impl<P: ResourceProvider> OpContext<P> {
    /// Creates a context over the given session and provider.
    pub fn new(session: Arc<Mutex<Session>>, provider: Arc<P>) -> Self {
        Self { session, provider }
    }

    /// The shared session handle.
    #[inline]
    pub fn session(&self) -> &Arc<Mutex<Session>> {
        &self.session
    }

    /// The shared provider handle.
    #[inline]
    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }
}

impl<P> Clone for OpContext<P> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
            provider: Arc::clone(&self.provider),
        }
    }
}
