#![allow(clippy::float_cmp)]

use super::*;

fn store() -> SqliteGateway {
    SqliteGateway::connect("sqlite::memory:").unwrap()
}

#[test]
fn project_round_trip() {
    let mut store = store();
    let id = store.create_project("Launch", true).unwrap();
    let project = store.get_project(id).unwrap();
    assert_eq!(project.title, "Launch");
    assert!(project.is_template);
    assert!(!project.zoomed_out);
    assert_eq!(project.view_x, None);
    assert!(project.last_accessed >= project.created_at);

    store.update_project_view(id, 812.5, 300.0).unwrap();
    store.update_project_zoomed_out(id, true).unwrap();
    let project = store.get_project(id).unwrap();
    assert_eq!(project.view_x, Some(812.5));
    assert_eq!(project.view_y, Some(300.0));
    assert!(project.zoomed_out);
}

#[test]
fn unknown_project_is_not_found() {
    let mut store = store();
    let missing = Uuid::new_v4();
    assert!(matches!(store.get_project(missing), Err(GatewayError::ProjectNotFound(id)) if id == missing));
    assert!(matches!(store.update_project_view(missing, 0.0, 0.0), Err(GatewayError::ProjectNotFound(_))));
}

#[test]
fn last_accessed_is_strictly_increasing() {
    let mut store = store();
    let a = store.create_project("A", false).unwrap();
    let b = store.create_project("B", false).unwrap();
    assert_eq!(store.last_accessed_project().unwrap(), Some(b));

    store.update_project_last_accessed(a).unwrap();
    assert_eq!(store.last_accessed_project().unwrap(), Some(a));
    let listed: Vec<ProjectId> = store.list_projects().unwrap().into_iter().map(|p| p.id).collect();
    assert_eq!(listed, vec![a, b]);
}

#[test]
fn empty_store_has_no_last_project() {
    let mut store = store();
    assert_eq!(store.last_accessed_project().unwrap(), None);
    assert!(store.list_projects().unwrap().is_empty());
}

#[test]
fn checklists_come_back_with_ordered_checks() {
    let mut store = store();
    let project = store.create_project("P", false).unwrap();
    let root = store.create_checklist(project, None, "Fuel", 400.0, 100.0).unwrap();
    let child = store.create_checklist(project, Some(root), "Pumps", 750.0, 100.0).unwrap();
    let second = store.create_check(root, "close valve", CheckState::Unchecked, 1).unwrap();
    let first = store.create_check(root, "open valve", CheckState::Checked, 0).unwrap();

    let lists = store.list_checklists(project).unwrap();
    assert_eq!(lists.len(), 2);
    let fuel = lists.iter().find(|c| c.id == root).unwrap();
    assert_eq!(fuel.parent_id, None);
    assert_eq!((fuel.position_x, fuel.position_y), (400.0, 100.0));
    let ids: Vec<CheckId> = fuel.checks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first, second]);
    assert_eq!(fuel.checks[0].state, CheckState::Checked);

    let pumps = lists.iter().find(|c| c.id == child).unwrap();
    assert_eq!(pumps.parent_id, Some(root));
    assert!(pumps.checks.is_empty());
}

#[test]
fn checklist_updates_persist() {
    let mut store = store();
    let project = store.create_project("P", false).unwrap();
    let id = store.create_checklist(project, None, "Fuel", 0.0, 0.0).unwrap();
    store.update_checklist_position(id, 150.0, 200.0).unwrap();
    store.update_checklist_content(id, "Fuel system").unwrap();
    let check = store.create_check(id, "vent", CheckState::Unchecked, 0).unwrap();
    store.update_check(check, "vent tank", CheckState::NotApplicable, 3).unwrap();

    let lists = store.list_checklists(project).unwrap();
    assert_eq!(lists[0].title, "Fuel system");
    assert_eq!((lists[0].position_x, lists[0].position_y), (150.0, 200.0));
    assert_eq!(lists[0].checks[0].content, "vent tank");
    assert_eq!(lists[0].checks[0].state, CheckState::NotApplicable);
    assert_eq!(lists[0].checks[0].position, 3);
    assert_eq!(store.checklist_project(id).unwrap(), project);
}

#[test]
fn missing_rows_report_not_found() {
    let mut store = store();
    let ghost = Uuid::new_v4();
    assert!(matches!(store.update_checklist_position(ghost, 0.0, 0.0), Err(GatewayError::ChecklistNotFound(_))));
    assert!(matches!(store.delete_checklist(ghost), Err(GatewayError::ChecklistNotFound(_))));
    assert!(matches!(store.delete_check(ghost), Err(GatewayError::CheckNotFound(_))));
    assert!(matches!(store.checklist_project(ghost), Err(GatewayError::ChecklistNotFound(_))));
    assert!(matches!(
        store.create_check(ghost, "x", CheckState::Unchecked, 0),
        Err(GatewayError::ChecklistNotFound(id)) if id == ghost
    ));
}

#[test]
fn deleting_a_checklist_cascades_to_checks() {
    let mut store = store();
    let project = store.create_project("P", false).unwrap();
    let id = store.create_checklist(project, None, "Fuel", 0.0, 0.0).unwrap();
    store.create_check(id, "a", CheckState::Unchecked, 0).unwrap();
    store.create_check(id, "b", CheckState::Unchecked, 1).unwrap();

    store.delete_checklist(id).unwrap();
    let remaining: i64 = store
        .runtime
        .block_on(sqlx::query_scalar("SELECT COUNT(*) FROM checks").fetch_one(&store.pool))
        .unwrap();
    assert_eq!(remaining, 0);
    assert!(store.list_checklists(project).unwrap().is_empty());
}

#[test]
fn parent_with_children_cannot_be_deleted() {
    let mut store = store();
    let project = store.create_project("P", false).unwrap();
    let parent = store.create_checklist(project, None, "Fuel", 0.0, 0.0).unwrap();
    store.create_checklist(project, Some(parent), "Pumps", 350.0, 0.0).unwrap();
    assert!(matches!(store.delete_checklist(parent), Err(GatewayError::Backend(_))));
}

#[test]
fn memory_store_tracks_projects() {
    let mut store = MemoryGateway::new();
    assert_eq!(store.last_accessed_project().unwrap(), None);
    let a = store.create_project("A", false).unwrap();
    let b = store.create_project("B", false).unwrap();
    assert_eq!(store.last_accessed_project().unwrap(), Some(b));
    store.update_project_last_accessed(a).unwrap();
    assert_eq!(store.list_projects().unwrap()[0].id, a);

    let list = store.create_checklist(b, None, "T", 0.0, 0.0).unwrap();
    assert_eq!(store.checklist_project(list).unwrap(), b);
}
