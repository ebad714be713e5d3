//! Per-conversation state.

mod cache;
mod disambiguation;

use deskhand_provider::{Candidate, ResourceId};

pub use cache::ReferenceCache;
pub use disambiguation::{Choice, Disambiguation, parse_choice};

/// The state one conversation accumulates: a [`ReferenceCache`] of
/// resolved references and at most one pending [`Disambiguation`].
///
/// A session is created on the first interaction and dropped when the
/// conversation ends; nothing in it is persisted across sessions. It is
/// always passed explicitly — operations never reach for ambient storage.
#[derive(Clone, Debug, Default)]
pub struct Session {
    cache: ReferenceCache,
    pending: Disambiguation,
}

/// The outcome of applying a follow-up choice to a pending disambiguation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChoiceOutcome {
    /// The choice selected a candidate; its id is now cached under the
    /// candidate's own display name.
    Resolved(ResourceId),
    /// There is no pending disambiguation to choose from.
    NoPendingDisambiguation,
    /// The choice matched nothing; the disambiguation is still pending.
    NoMatch,
}

impl Session {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// The session's reference cache.
    #[inline]
    pub fn cache(&self) -> &ReferenceCache {
        &self.cache
    }

    /// Mutable access to the reference cache.
    #[inline]
    pub fn cache_mut(&mut self) -> &mut ReferenceCache {
        &mut self.cache
    }

    /// The pending disambiguation, empty unless a choice is awaited.
    #[inline]
    pub fn pending(&self) -> &Disambiguation {
        &self.pending
    }

    /// Replaces any pending disambiguation with the given ordered
    /// candidates and returns the enumeration to show the user.
    pub fn offer(&mut self, candidates: Vec<Candidate>) -> String {
        if self.pending.is_pending() {
            debug!("replacing a pending disambiguation");
        }
        self.pending.replace(candidates);
        self.pending.enumerate()
    }

    /// Abandons any pending disambiguation.
    pub fn abandon_pending(&mut self) {
        self.pending.clear();
    }

    /// Applies a follow-up choice to the pending disambiguation.
    ///
    /// An in-range ordinal selects by position; any other input is tried
    /// as a case-folded two-way substring against the offered display
    /// names, first match wins. A successful selection caches the chosen
    /// id under its own display name and clears the pending state; a miss
    /// leaves the state pending so the caller can re-prompt.
    pub fn choose(&mut self, input: &str) -> ChoiceOutcome {
        if !self.pending.is_pending() {
            return ChoiceOutcome::NoPendingDisambiguation;
        }

        let candidates = self.pending.candidates();
        let index = match parse_choice(input) {
            Choice::Invalid => None,
            Choice::Ordinal(n) if n >= 1 && n <= candidates.len() => {
                Some(n - 1)
            }
            // Out-of-range ordinals fall back to the title test, like any
            // other text.
            Choice::Ordinal(_) => title_match(candidates, input),
            Choice::Text(text) => title_match(candidates, &text),
        };
        let Some(index) = index else {
            trace!("choice {input:?} matched no offered candidate");
            return ChoiceOutcome::NoMatch;
        };

        let chosen = candidates[index].clone();
        self.cache
            .remember(&chosen.display_name, chosen.id.clone());
        self.pending.clear();
        ChoiceOutcome::Resolved(chosen.id)
    }
}

fn title_match(candidates: &[Candidate], input: &str) -> Option<usize> {
    let folded = input.trim().to_lowercase();
    if folded.is_empty() {
        return None;
    }
    candidates.iter().position(|candidate| {
        let name = candidate.display_name.to_lowercase();
        name.contains(&folded) || folded.contains(&name)
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    fn offered_session() -> Session {
        let mut session = Session::new();
        session.offer(vec![
            Candidate::new(
                ResourceId::new("d2"),
                "Meeting Notes",
                Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            ),
            Candidate::new(
                ResourceId::new("d1"),
                "Quarterly Plan",
                Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
            ),
        ]);
        session
    }

    #[test]
    fn test_choose_first_ordinal() {
        let mut session = offered_session();
        assert_eq!(
            session.choose("1"),
            ChoiceOutcome::Resolved(ResourceId::new("d2"))
        );
        assert!(!session.pending().is_pending());
        assert_eq!(
            session.cache().lookup("meeting notes"),
            Some(&ResourceId::new("d2"))
        );
    }

    #[test]
    fn test_choose_by_partial_title() {
        let mut session = offered_session();
        assert_eq!(
            session.choose("quarterly"),
            ChoiceOutcome::Resolved(ResourceId::new("d1"))
        );
    }

    #[test]
    fn test_choose_two_way_substring() {
        // The input contains the candidate's full name.
        let mut session = offered_session();
        assert_eq!(
            session.choose("the Meeting Notes please"),
            ChoiceOutcome::Resolved(ResourceId::new("d2"))
        );

        // The candidate's name contains the input.
        let mut session = offered_session();
        assert_eq!(
            session.choose("NOTES"),
            ChoiceOutcome::Resolved(ResourceId::new("d2"))
        );
    }

    #[test]
    fn test_choose_without_pending() {
        let mut session = Session::new();
        assert_eq!(
            session.choose("1"),
            ChoiceOutcome::NoPendingDisambiguation
        );
        assert!(session.cache().is_empty());
    }

    #[test]
    fn test_no_match_leaves_state_pending() {
        let mut session = offered_session();
        assert_eq!(session.choose("17"), ChoiceOutcome::NoMatch);
        assert!(session.pending().is_pending());
        assert!(session.cache().is_empty());

        // The caller can re-prompt and still resolve.
        assert_eq!(
            session.choose("use 2"),
            ChoiceOutcome::Resolved(ResourceId::new("d1"))
        );
    }

    #[test]
    fn test_abandon_clears_pending() {
        let mut session = offered_session();
        session.abandon_pending();
        assert_eq!(
            session.choose("1"),
            ChoiceOutcome::NoPendingDisambiguation
        );
    }

    #[test]
    fn test_offer_overwrites_pending() {
        let mut session = offered_session();
        session.offer(vec![Candidate::new(
            ResourceId::new("e9"),
            "Standup",
            Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap(),
        )]);
        assert_eq!(
            session.choose("1"),
            ChoiceOutcome::Resolved(ResourceId::new("e9"))
        );
    }
}
