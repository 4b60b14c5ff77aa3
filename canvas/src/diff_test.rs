use uuid::Uuid;

use super::*;

fn stored(checklist: Uuid, content: &str, position: i64) -> Check {
    Check { id: Uuid::new_v4(), checklist_id: checklist, content: content.into(), state: CheckState::Unchecked, position }
}

#[test]
fn edit_updates_deletes_and_creates() {
    let list = Uuid::new_v4();
    let one = stored(list, "one", 0);
    let two = stored(list, "two", 1);
    let new = vec![CheckDraft::existing(one.id, "x"), CheckDraft::new("new")];

    let diff = diff_checks(&[one.clone(), two.clone()], &new);

    assert_eq!(
        diff.updates,
        vec![CheckUpdate { id: one.id, content: "x".into(), state: CheckState::Unchecked, position: 0 }]
    );
    assert_eq!(diff.deletes, vec![two.id]);
    assert_eq!(
        diff.creates,
        vec![CheckCreate { content: "new".into(), state: CheckState::Unchecked, position: 1 }]
    );
}

#[test]
fn unchanged_items_produce_no_ops() {
    let list = Uuid::new_v4();
    let one = stored(list, "one", 0);
    let diff = diff_checks(std::slice::from_ref(&one), &[CheckDraft::existing(one.id, "one")]);
    assert!(diff.is_empty());
}

#[test]
fn reorder_updates_positions_only_for_moved_items() {
    let list = Uuid::new_v4();
    let a = stored(list, "a", 0);
    let b = stored(list, "b", 1);
    let c = stored(list, "c", 2);
    let new = vec![CheckDraft::existing(b.id, "b"), CheckDraft::existing(a.id, "a"), CheckDraft::existing(c.id, "c")];

    let diff = diff_checks(&[a.clone(), b.clone(), c], &new);

    let moved: Vec<(Uuid, i64)> = diff.updates.iter().map(|u| (u.id, u.position)).collect();
    assert_eq!(moved, vec![(b.id, 0), (a.id, 1)]);
    assert!(diff.creates.is_empty());
    assert!(diff.deletes.is_empty());
}

#[test]
fn existing_state_is_preserved() {
    let list = Uuid::new_v4();
    let mut one = stored(list, "one", 0);
    one.state = CheckState::NotApplicable;
    let diff = diff_checks(std::slice::from_ref(&one), &[CheckDraft::existing(one.id, "renamed")]);
    assert_eq!(diff.updates[0].state, CheckState::NotApplicable);
}

#[test]
fn unknown_id_is_created() {
    let list = Uuid::new_v4();
    let one = stored(list, "one", 0);
    let diff = diff_checks(std::slice::from_ref(&one), &[CheckDraft::existing(Uuid::new_v4(), "ghost")]);
    assert_eq!(diff.creates.len(), 1);
    assert_eq!(diff.deletes, vec![one.id]);
}

#[test]
fn repeated_id_is_used_once() {
    let list = Uuid::new_v4();
    let one = stored(list, "one", 0);
    let new = vec![CheckDraft::existing(one.id, "one"), CheckDraft::existing(one.id, "copy")];
    let diff = diff_checks(std::slice::from_ref(&one), &new);
    assert!(diff.updates.is_empty());
    assert_eq!(diff.creates.len(), 1);
    assert_eq!(diff.creates[0].content, "copy");
    assert!(diff.deletes.is_empty());
}

#[test]
fn clearing_all_items_deletes_everything() {
    let list = Uuid::new_v4();
    let a = stored(list, "a", 0);
    let b = stored(list, "b", 1);
    let diff = diff_checks(&[a.clone(), b.clone()], &[]);
    assert_eq!(diff.deletes, vec![a.id, b.id]);
}
