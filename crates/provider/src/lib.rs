//! An abstraction layer for remote resource stores.
//!
//! This crate establishes a unified protocol for the resolution core to
//! list, search, and mutate resources (documents, calendar events, emails,
//! files) in whatever store backs them, so that the core can seamlessly
//! switch between backends without modifying its own codebase.
//!
//! Types in this crate don't define any behavior, instead they are the
//! constraints that the implementors should adhere to.
//!
//! Users of this crate may add some extra functionalities or wrappers,
//! depending on their own use cases. Those extra code should be placed
//! in their own crate.

#![deny(missing_docs)]

mod error;
mod provider;
mod query;
mod record;

pub use error::*;
pub use provider::*;
pub use query::*;
pub use record::*;
