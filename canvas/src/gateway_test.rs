#![allow(clippy::float_cmp)]

use super::*;

#[test]
fn create_and_list_checklists_with_ordered_checks() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("Launch", false);
    let id = gw.create_checklist(project, None, "Fuel", 50.0, 100.0).unwrap();
    let second = gw.create_check(id, "second", CheckState::Unchecked, 1).unwrap();
    let first = gw.create_check(id, "first", CheckState::Checked, 0).unwrap();

    let lists = gw.list_checklists(project).unwrap();
    assert_eq!(lists.len(), 1);
    let ids: Vec<_> = lists[0].checks.iter().map(|c| c.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[test]
fn list_is_scoped_to_project() {
    let mut gw = MemoryGateway::new();
    let a = gw.insert_project("A", false);
    let b = gw.insert_project("B", false);
    gw.create_checklist(a, None, "in a", 0.0, 0.0).unwrap();
    assert!(gw.list_checklists(b).unwrap().is_empty());
}

#[test]
fn create_with_unknown_parent_fails() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    let err = gw.create_checklist(project, Some(Uuid::new_v4()), "orphan", 0.0, 0.0).unwrap_err();
    assert!(matches!(err, GatewayError::ChecklistNotFound(_)));
}

#[test]
fn delete_checklist_cascades_checks() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    let id = gw.create_checklist(project, None, "T", 0.0, 0.0).unwrap();
    let check = gw.create_check(id, "c", CheckState::Unchecked, 0).unwrap();
    gw.delete_checklist(id).unwrap();
    assert!(matches!(gw.delete_check(check), Err(GatewayError::CheckNotFound(_))));
}

#[test]
fn update_check_changes_fields() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    let id = gw.create_checklist(project, None, "T", 0.0, 0.0).unwrap();
    let check = gw.create_check(id, "c", CheckState::Unchecked, 0).unwrap();
    gw.update_check(check, "changed", CheckState::NotApplicable, 3).unwrap();
    let stored = &gw.checklist(&id).unwrap().checks[0];
    assert_eq!(stored.content, "changed");
    assert_eq!(stored.state, CheckState::NotApplicable);
    assert_eq!(stored.position, 3);
}

#[test]
fn project_view_and_zoom_persist() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    gw.update_project_view(project, 12.5, -3.0).unwrap();
    gw.update_project_zoomed_out(project, true).unwrap();
    let p = gw.get_project(project).unwrap();
    assert_eq!((p.view_x, p.view_y, p.zoomed_out), (Some(12.5), Some(-3.0), true));
}

#[test]
fn last_accessed_orders_projects() {
    let mut gw = MemoryGateway::new();
    let a = gw.insert_project("A", false);
    let b = gw.insert_project("B", true);
    assert_eq!(gw.projects()[0].id, b);
    gw.update_project_last_accessed(a).unwrap();
    assert_eq!(gw.projects()[0].id, a);
}

#[test]
fn failing_gateway_reports_backend_error() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    gw.set_failing(true);
    let err = gw.get_project(project).unwrap_err();
    assert!(matches!(err, GatewayError::Backend(_)));
    assert!(err.to_string().starts_with("storage backend error"));
}

#[test]
fn writes_are_recorded() {
    let mut gw = MemoryGateway::new();
    let project = gw.insert_project("P", false);
    let id = gw.create_checklist(project, None, "T", 0.0, 0.0).unwrap();
    gw.update_checklist_position(id, 50.0, 100.0).unwrap();
    assert_eq!(gw.writes().len(), 2);
    assert_eq!(gw.writes()[1], format!("update_checklist_position {id} 50 100"));
}
