use super::*;

#[test]
fn default_is_idle() {
    let i = Interaction::default();
    assert!(i.is_idle());
    assert_eq!(i.dragged_id(), None);
}

#[test]
fn dragging_reports_captured_id() {
    let i = Interaction::Dragging { id: 3, anchor: Point::new(1.0, 2.0) };
    assert!(!i.is_idle());
    assert_eq!(i.dragged_id(), Some(3));
}

#[test]
fn anchors_participate_in_equality() {
    let a = Interaction::Dragging { id: 1, anchor: Point::new(1.0, 1.0) };
    let b = Interaction::Dragging { id: 1, anchor: Point::new(2.0, 1.0) };
    assert_ne!(a, b);
}

#[test]
fn serializes_with_type_tag() {
    let json = serde_json::to_value(Interaction::Idle).unwrap();
    assert_eq!(json, serde_json::json!({ "type": "idle" }));

    let json = serde_json::to_value(Interaction::Dragging { id: 1, anchor: Point::new(45.0, 45.0) }).unwrap();
    assert_eq!(json["type"], "dragging");
    assert_eq!(json["id"], 1);
    assert_eq!(json["anchor"]["x"], 45.0);
}
