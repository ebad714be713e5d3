//! The operations a dispatching front end can invoke.
//!
//! Every operation takes a JSON object of primitive arguments and
//! produces a structured result; see [`Desk`](crate::Desk) for wiring
//! them up.

mod clock;
mod events;
mod listing;
mod mutate;
mod resolve;

pub use clock::CurrentTimeOp;
pub use events::{CreateEventOp, UpdateEventOp};
pub use listing::{
    ListEventsOp, ListMessagesOp, ListResourcesOp, ReadResourceOp,
};
pub use mutate::{DeleteEventsMatchingOp, DeleteResourceOp};
pub use resolve::{PickCandidateOp, ResolveReferenceOp};

use chrono::NaiveDate;
use deskhand_core::DeleteScope;
use deskhand_core::op::Error as OpError;
use deskhand_provider::ResourceKind;

pub(crate) fn parse_kind(kind: &str) -> Result<ResourceKind, OpError> {
    match kind {
        "document" => Ok(ResourceKind::Document),
        "event" => Ok(ResourceKind::Event),
        "email" => Ok(ResourceKind::Email),
        "file" => Ok(ResourceKind::File),
        other => Err(OpError::invalid_input().with_reason(format!(
            "unknown resource kind {other:?}, expected document, event, \
             email, or file"
        ))),
    }
}

pub(crate) fn parse_scope(scope: &str) -> Result<DeleteScope, OpError> {
    match scope {
        "instance" => Ok(DeleteScope::Instance),
        "series" => Ok(DeleteScope::Series),
        other => Err(OpError::invalid_input().with_reason(format!(
            "unknown delete scope {other:?}, expected instance or series"
        ))),
    }
}

pub(crate) fn parse_date(date: &str) -> Result<NaiveDate, OpError> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").map_err(|_| {
        OpError::invalid_input()
            .with_reason(format!("{date:?} is not a YYYY-MM-DD date"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("event").unwrap(), ResourceKind::Event);
        assert!(parse_kind("calendar").is_err());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("03/01/2024").is_err());
    }
}
