//! Diff of a checklist's stored checks against the editor's new item list.

#[cfg(test)]
#[path = "diff_test.rs"]
mod diff_test;

use std::collections::HashSet;

use crate::doc::{Check, CheckDraft, CheckId, CheckState};

/// A check to insert.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckCreate {
    pub content: String,
    pub state: CheckState,
    pub position: i64,
}

/// A stored check whose content or position changed.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckUpdate {
    pub id: CheckId,
    pub content: String,
    pub state: CheckState,
    pub position: i64,
}

/// Storage operations that turn the old item list into the new one.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CheckDiff {
    pub creates: Vec<CheckCreate>,
    pub updates: Vec<CheckUpdate>,
    pub deletes: Vec<CheckId>,
}

impl CheckDiff {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.creates.is_empty() && self.updates.is_empty() && self.deletes.is_empty()
    }
}

/// Compute the diff between `old` and `new`.
///
/// Positions are the indices in `new`. Items without an id, or whose id is not
/// among the stored checks, are created. Stored checks absent from `new` are
/// deleted. Stored checks present in `new` are updated only when content,
/// position or an explicitly given state differs. A stored id repeated in
/// `new` is honoured once; later repeats become new items.
#[must_use]
#[allow(clippy::cast_possible_wrap)]
pub fn diff_checks(old: &[Check], new: &[CheckDraft]) -> CheckDiff {
    let mut diff = CheckDiff::default();
    let mut kept: HashSet<CheckId> = HashSet::new();

    for (index, draft) in new.iter().enumerate() {
        let position = index as i64;
        let existing = draft
            .id
            .filter(|id| !kept.contains(id))
            .and_then(|id| old.iter().find(|c| c.id == id));

        match existing {
            Some(stored) => {
                kept.insert(stored.id);
                let state = draft.state.unwrap_or(stored.state);
                if stored.content != draft.content || stored.position != position || stored.state != state {
                    diff.updates.push(CheckUpdate { id: stored.id, content: draft.content.clone(), state, position });
                }
            }
            None => diff.creates.push(CheckCreate {
                content: draft.content.clone(),
                state: draft.state.unwrap_or_default(),
                position,
            }),
        }
    }

    diff.deletes = old.iter().filter(|c| !kept.contains(&c.id)).map(|c| c.id).collect();
    diff
}
