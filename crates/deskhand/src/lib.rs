//! An out-of-the-box entity-resolution surface for workspace agents.
//!
//! The crate assembles the resolution core and a resource provider into a
//! set of named operations an agent front end can invoke. It includes a
//! CLI tool for driving those operations in the terminal, and you can
//! also use it as a library to bring the surface into your own host apps.

#![deny(missing_docs)]

#[allow(unused_imports)]
#[macro_use]
extern crate tracing;

mod desk;
pub mod ops;
mod timeparse;

pub use desk::{Desk, DeskBuilder};

/// Re-exports of [`deskhand_core`] crate.
pub mod core {
    pub use deskhand_core::*;
}
