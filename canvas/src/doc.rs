//! Document model: projects, checklists and their checks.
//!
//! These are the records exchanged with the storage gateway. The scene
//! (`node`, `connector`) is built from them at load time and mutated by the
//! engine; the records themselves stay plain data.

#[cfg(test)]
#[path = "doc_test.rs"]
mod doc_test;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a project.
pub type ProjectId = Uuid;

/// Unique identifier for a checklist (one scene node).
pub type ChecklistId = Uuid;

/// Unique identifier for a single check item.
pub type CheckId = Uuid;

/// A project: the unit opened in one canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub is_template: bool,
    /// Creation time, Unix seconds.
    pub created_at: i64,
    /// Last time the project was opened, Unix seconds.
    pub last_accessed: i64,
    /// Last 1:1 viewport center, x. `None` until the user first pans.
    pub view_x: Option<f64>,
    /// Last 1:1 viewport center, y.
    pub view_y: Option<f64>,
    /// Whether the canvas was left in the fit (zoomed-out) view.
    pub zoomed_out: bool,
}

/// Tri-state value of a check item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckState {
    #[default]
    Unchecked,
    Checked,
    /// Marked as not applicable (right-click toggle).
    NotApplicable,
}

impl CheckState {
    /// Integer code used by the relational store.
    #[must_use]
    pub fn code(self) -> i64 {
        match self {
            Self::Unchecked => 0,
            Self::Checked => 1,
            Self::NotApplicable => 2,
        }
    }

    /// Inverse of [`CheckState::code`]. Unknown codes read as unchecked.
    #[must_use]
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Self::Checked,
            2 => Self::NotApplicable,
            _ => Self::Unchecked,
        }
    }

    /// Primary-button toggle: checked <-> unchecked. Not-applicable becomes checked.
    #[must_use]
    pub fn toggled_checked(self) -> Self {
        match self {
            Self::Checked => Self::Unchecked,
            Self::Unchecked | Self::NotApplicable => Self::Checked,
        }
    }

    /// Secondary-button toggle: not-applicable <-> unchecked.
    #[must_use]
    pub fn toggled_not_applicable(self) -> Self {
        match self {
            Self::NotApplicable => Self::Unchecked,
            Self::Unchecked | Self::Checked => Self::NotApplicable,
        }
    }
}

/// One line item of a checklist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Check {
    pub id: CheckId,
    pub checklist_id: ChecklistId,
    pub content: String,
    pub state: CheckState,
    /// Zero-based order within the checklist.
    pub position: i64,
}

/// A checklist record. Rendered as one scene node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: ChecklistId,
    pub project_id: ProjectId,
    /// Parent checklist; `None` attaches the checklist to the project root.
    pub parent_id: Option<ChecklistId>,
    pub title: String,
    pub position_x: f64,
    pub position_y: f64,
    /// Checks ordered by `position`.
    pub checks: Vec<Check>,
}

/// One item as produced by the content editor.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckDraft {
    /// Id of the existing check this item edits; `None` for a new item.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<CheckId>,
    pub content: String,
    /// State for new items; existing items keep their stored state when `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<CheckState>,
}

impl CheckDraft {
    /// A new item with the given content.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self { id: None, content: content.into(), state: None }
    }

    /// An edit of the existing check `id`.
    #[must_use]
    pub fn existing(id: CheckId, content: impl Into<String>) -> Self {
        Self { id: Some(id), content: content.into(), state: None }
    }
}

/// The content editor's output: a title and the new ordered item list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ChecklistDraft {
    pub title: String,
    #[serde(default)]
    pub checks: Vec<CheckDraft>,
}

impl ChecklistDraft {
    #[must_use]
    pub fn new(title: impl Into<String>, checks: Vec<CheckDraft>) -> Self {
        Self { title: title.into(), checks }
    }

    /// Pre-populate a draft from an existing checklist.
    #[must_use]
    pub fn from_checklist(title: &str, checks: &[Check]) -> Self {
        Self {
            title: title.to_string(),
            checks: checks
                .iter()
                .map(|c| CheckDraft { id: Some(c.id), content: c.content.clone(), state: Some(c.state) })
                .collect(),
        }
    }

    /// Why the draft cannot be accepted, if anything. A draft needs a
    /// non-blank title and no blank items.
    #[must_use]
    pub fn problem(&self) -> Option<String> {
        if self.title.trim().is_empty() {
            return Some("title is empty".into());
        }
        self.checks
            .iter()
            .position(|c| c.content.trim().is_empty())
            .map(|i| format!("item {} is empty", i + 1))
    }
}

/// A reference to something a connector or creator handle can attach to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NodeRef {
    /// The synthetic project root.
    Root,
    /// A checklist node.
    Checklist(ChecklistId),
}

impl NodeRef {
    /// The parent id a child created from this owner gets.
    #[must_use]
    pub fn as_parent(self) -> Option<ChecklistId> {
        match self {
            Self::Root => None,
            Self::Checklist(id) => Some(id),
        }
    }

    /// Inverse of [`NodeRef::as_parent`].
    #[must_use]
    pub fn from_parent(parent: Option<ChecklistId>) -> Self {
        parent.map_or(Self::Root, Self::Checklist)
    }
}
