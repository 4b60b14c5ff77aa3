use serde_json::json;

use super::*;

#[test]
fn modifiers_default_all_false() {
    let m = Modifiers::default();
    assert!(!m.shift && !m.ctrl && !m.alt && !m.meta);
}

#[test]
fn button_default_is_primary() {
    assert_eq!(Button::default(), Button::Primary);
}

#[test]
fn escape_key_detected() {
    assert!(Key("Escape".into()).is_escape());
    assert!(Key("Esc".into()).is_escape());
    assert!(!Key("Enter".into()).is_escape());
}

#[test]
fn input_state_default_is_idle() {
    assert!(InputState::default().is_idle());
    assert!(!InputState::Creating { owner: NodeRef::Root }.is_idle());
}

#[test]
fn down_event_defaults_button_and_modifiers() {
    let ev: InputEvent = serde_json::from_value(json!({ "type": "down", "x": 1.0, "y": 2.0 })).unwrap();
    assert_eq!(ev, InputEvent::Down { x: 1.0, y: 2.0, button: Button::Primary, modifiers: Modifiers::default() });
}

#[test]
fn secondary_button_parses_lowercase() {
    let ev: InputEvent =
        serde_json::from_value(json!({ "type": "up", "x": 0.0, "y": 0.0, "button": "secondary" })).unwrap();
    assert!(matches!(ev, InputEvent::Up { button: Button::Secondary, .. }));
}

#[test]
fn submit_event_carries_draft() {
    let ev: InputEvent = serde_json::from_value(json!({
        "type": "submit",
        "draft": { "title": "Fuel", "checks": [{ "content": "open valve" }] }
    }))
    .unwrap();
    let InputEvent::Submit { draft } = ev else {
        panic!("expected submit");
    };
    assert_eq!(draft.title, "Fuel");
    assert_eq!(draft.checks.len(), 1);
}

#[test]
fn cancel_editor_has_no_fields() {
    let ev: InputEvent = serde_json::from_value(json!({ "type": "cancel_editor" })).unwrap();
    assert_eq!(ev, InputEvent::CancelEditor);
}

#[test]
fn unknown_event_type_is_rejected() {
    let res: Result<InputEvent, _> = serde_json::from_value(json!({ "type": "teleport" }));
    assert!(res.is_err());
}
