//! Core logic including session state, reference resolution, disambiguation,
//! guarded mutation, and operation dispatch.

#![deny(missing_docs)]
#![deny(clippy::missing_safety_doc)]

#[macro_use]
extern crate tracing;

mod mutate;
pub mod op;
mod paginate;
mod resolve;
mod session;

pub use mutate::{
    BatchCriteria, BatchOutcome, DeleteScope, Guarded, delete_events_matching,
    delete_resource,
};
pub use paginate::paginate;
pub use resolve::{Resolution, resolve};
pub use session::{
    Choice, ChoiceOutcome, Disambiguation, ReferenceCache, Session,
    parse_choice,
};
