use std::collections::HashMap;

use deskhand_provider::ResourceId;

/// Per-session memory of references that already resolved to an id.
///
/// Keys are normalized (trimmed, case-folded) references; at most one id is
/// kept per key, last writer wins. Entries never expire on their own: the
/// cache lives and dies with its [`Session`](crate::Session).
#[derive(Clone, Debug, Default)]
pub struct ReferenceCache {
    entries: HashMap<String, ResourceId>,
}

fn normalize(reference: &str) -> String {
    reference.trim().to_lowercase()
}

impl ReferenceCache {
    /// Looks up a reference. Pure; absence is not an error.
    pub fn lookup(&self, reference: &str) -> Option<&ResourceId> {
        self.entries.get(&normalize(reference))
    }

    /// Remembers a resolution, overwriting any previous one for the same
    /// normalized reference.
    pub fn remember<S: AsRef<str>>(&mut self, reference: S, id: ResourceId) {
        self.entries.insert(normalize(reference.as_ref()), id);
    }

    /// Number of remembered resolutions.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether nothing has been remembered yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
