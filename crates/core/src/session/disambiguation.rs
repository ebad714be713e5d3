use std::fmt::Write as _;

use deskhand_provider::Candidate;

/// A parsed follow-up input for a pending disambiguation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Choice {
    /// A 1-based position into the offered list (`"2"`, `"use 2"`).
    Ordinal(usize),
    /// A partial title to match against the offered names.
    Text(String),
    /// Nothing usable (empty or whitespace-only input).
    Invalid,
}

/// Parses a follow-up disambiguation input.
///
/// Purely numeric input, optionally behind a leading `use` keyword, is an
/// ordinal; any other non-empty input is a title fragment.
pub fn parse_choice(input: &str) -> Choice {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Choice::Invalid;
    }

    let digits = after_use_keyword(trimmed).unwrap_or(trimmed);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        if let Ok(ordinal) = digits.parse::<usize>() {
            return Choice::Ordinal(ordinal);
        }
    }
    Choice::Text(trimmed.to_owned())
}

fn after_use_keyword(input: &str) -> Option<&str> {
    let keyword = input.get(..3)?;
    if !keyword.eq_ignore_ascii_case("use") {
        return None;
    }
    let rest = input[3..].trim_start();
    // Only a keyword when what follows is a bare number ("use 2"),
    // otherwise "used car" would parse as one.
    (!rest.is_empty() && rest.bytes().all(|b| b.is_ascii_digit()))
        .then_some(rest)
}

/// The pending multi-candidate choice for a session.
///
/// At most one disambiguation is pending at a time; offering a new
/// candidate set replaces the previous one. The stored list is exactly
/// the displayed slice, so every enumerated ordinal is selectable and
/// nothing beyond the enumeration is.
#[derive(Clone, Debug, Default)]
pub struct Disambiguation {
    candidates: Vec<Candidate>,
}

impl Disambiguation {
    /// Returns whether a choice is currently awaited.
    #[inline]
    pub fn is_pending(&self) -> bool {
        !self.candidates.is_empty()
    }

    /// The offered candidates, most recently modified first.
    #[inline]
    pub fn candidates(&self) -> &[Candidate] {
        &self.candidates
    }

    pub(crate) fn replace(&mut self, candidates: Vec<Candidate>) {
        self.candidates = candidates;
    }

    pub(crate) fn clear(&mut self) {
        self.candidates.clear();
    }

    /// Renders the offered candidates as a 1-based enumeration the caller
    /// can show the user verbatim.
    pub fn enumerate(&self) -> String {
        let mut listing = String::new();
        for (index, candidate) in self.candidates.iter().enumerate() {
            if !listing.is_empty() {
                listing.push('\n');
            }
            let _ = write!(
                listing,
                "{}. {} (modified {})",
                index + 1,
                candidate.display_name,
                candidate.modified_at.format("%Y-%m-%d"),
            );
        }
        listing
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use deskhand_provider::ResourceId;

    use super::*;

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("2"), Choice::Ordinal(2));
        assert_eq!(parse_choice(" 10 "), Choice::Ordinal(10));
        assert_eq!(parse_choice("use 2"), Choice::Ordinal(2));
        assert_eq!(parse_choice("USE  3"), Choice::Ordinal(3));
        assert_eq!(parse_choice("use2"), Choice::Ordinal(2));
        assert_eq!(
            parse_choice("meeting notes"),
            Choice::Text("meeting notes".to_owned())
        );
        assert_eq!(
            parse_choice("used car"),
            Choice::Text("used car".to_owned())
        );
        assert_eq!(parse_choice("use it"), Choice::Text("use it".to_owned()));
        assert_eq!(parse_choice("   "), Choice::Invalid);
        assert_eq!(parse_choice(""), Choice::Invalid);
    }

    #[test]
    fn test_enumerate_format() {
        let mut pending = Disambiguation::default();
        pending.replace(vec![
            Candidate::new(
                ResourceId::new("d2"),
                "Meeting Notes",
                Utc.with_ymd_and_hms(2024, 1, 10, 8, 0, 0).unwrap(),
            ),
            Candidate::new(
                ResourceId::new("d1"),
                "Meeting Notes (old)",
                Utc.with_ymd_and_hms(2024, 1, 5, 8, 0, 0).unwrap(),
            ),
        ]);

        assert_eq!(
            pending.enumerate(),
            "1. Meeting Notes (modified 2024-01-10)\n\
             2. Meeting Notes (old) (modified 2024-01-05)"
        );
    }
}
