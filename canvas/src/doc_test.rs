use serde_json::json;
use uuid::Uuid;

use super::*;

// =============================================================
// CheckState
// =============================================================

#[test]
fn check_state_codes_round_trip() {
    for state in [CheckState::Unchecked, CheckState::Checked, CheckState::NotApplicable] {
        assert_eq!(CheckState::from_code(state.code()), state);
    }
}

#[test]
fn check_state_unknown_code_is_unchecked() {
    assert_eq!(CheckState::from_code(7), CheckState::Unchecked);
    assert_eq!(CheckState::from_code(-1), CheckState::Unchecked);
}

#[test]
fn primary_toggle_flips_checked() {
    assert_eq!(CheckState::Unchecked.toggled_checked(), CheckState::Checked);
    assert_eq!(CheckState::Checked.toggled_checked(), CheckState::Unchecked);
    assert_eq!(CheckState::NotApplicable.toggled_checked(), CheckState::Checked);
}

#[test]
fn secondary_toggle_flips_not_applicable() {
    assert_eq!(CheckState::Unchecked.toggled_not_applicable(), CheckState::NotApplicable);
    assert_eq!(CheckState::Checked.toggled_not_applicable(), CheckState::NotApplicable);
    assert_eq!(CheckState::NotApplicable.toggled_not_applicable(), CheckState::Unchecked);
}

#[test]
fn check_state_serializes_snake_case() {
    assert_eq!(serde_json::to_value(CheckState::NotApplicable).unwrap(), json!("not_applicable"));
}

// =============================================================
// Drafts
// =============================================================

#[test]
fn draft_requires_title() {
    let draft = ChecklistDraft::new("   ", vec![]);
    assert_eq!(draft.problem().as_deref(), Some("title is empty"));
}

#[test]
fn draft_rejects_blank_item() {
    let draft = ChecklistDraft::new("Launch", vec![CheckDraft::new("fuel"), CheckDraft::new(" ")]);
    assert_eq!(draft.problem().as_deref(), Some("item 2 is empty"));
}

#[test]
fn draft_with_title_and_items_is_valid() {
    let draft = ChecklistDraft::new("Launch", vec![CheckDraft::new("fuel")]);
    assert!(draft.problem().is_none());
}

#[test]
fn draft_from_checklist_keeps_ids_and_states() {
    let list = Uuid::new_v4();
    let check = Check {
        id: Uuid::new_v4(),
        checklist_id: list,
        content: "fuel".into(),
        state: CheckState::Checked,
        position: 0,
    };
    let draft = ChecklistDraft::from_checklist("Launch", std::slice::from_ref(&check));
    assert_eq!(draft.title, "Launch");
    assert_eq!(draft.checks[0].id, Some(check.id));
    assert_eq!(draft.checks[0].state, Some(CheckState::Checked));
}

#[test]
fn draft_deserializes_without_ids() {
    let draft: ChecklistDraft =
        serde_json::from_value(json!({ "title": "T", "checks": [{ "content": "a" }] })).unwrap();
    assert_eq!(draft.checks, vec![CheckDraft::new("a")]);
}

// =============================================================
// NodeRef
// =============================================================

#[test]
fn node_ref_parent_round_trip() {
    let id = Uuid::new_v4();
    assert_eq!(NodeRef::from_parent(None), NodeRef::Root);
    assert_eq!(NodeRef::from_parent(Some(id)), NodeRef::Checklist(id));
    assert_eq!(NodeRef::Root.as_parent(), None);
    assert_eq!(NodeRef::Checklist(id).as_parent(), Some(id));
}
