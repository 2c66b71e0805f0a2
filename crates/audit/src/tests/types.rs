// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};

fn create_test_event() -> AuditEvent {
    AuditEvent::new(
        Actor::new(String::from("reception-1"), String::from("reception")),
        Cause::new(String::from("req-456"), String::from("Walk-in booking")),
        Action::new(String::from("CreateBooking"), None),
        StateSnapshot::absent(),
        StateSnapshot::new(String::from("status=pending")),
    )
}

#[test]
fn test_actor_creation_requires_all_fields() {
    let actor: Actor = Actor::new(String::from("admin-1"), String::from("admin"));

    assert_eq!(actor.id, "admin-1");
    assert_eq!(actor.actor_type, "admin");
}

#[test]
fn test_action_creation_with_details() {
    let action: Action = Action::new(
        String::from("CancelBooking"),
        Some(String::from("client called")),
    );

    assert_eq!(action.name, "CancelBooking");
    assert_eq!(action.details, Some(String::from("client called")));
}

#[test]
fn test_new_event_is_global_and_unsaved() {
    let event: AuditEvent = create_test_event();

    assert_eq!(event.scope, AuditScope::Global);
    assert_eq!(event.event_id, None);
    assert_eq!(event.before.data, "none");
}

#[test]
fn test_event_scoping() {
    let event: AuditEvent = create_test_event()
        .with_scope(AuditScope::Appointment(12))
        .with_event_id(3);

    assert_eq!(event.scope, AuditScope::Appointment(12));
    assert_eq!(event.event_id, Some(3));
    assert_eq!(event.action.name, "CreateBooking");
}

#[test]
fn test_scope_parts_round_trip() {
    for scope in [
        AuditScope::Global,
        AuditScope::Schedule(1),
        AuditScope::Appointment(2),
        AuditScope::Service(3),
    ] {
        assert_eq!(AuditScope::from_parts(scope.kind(), scope.record_id()), scope);
    }
}

#[test]
fn test_scope_from_unknown_kind_is_global() {
    assert_eq!(AuditScope::from_parts("invoice", Some(4)), AuditScope::Global);
    assert_eq!(AuditScope::from_parts("schedule", None), AuditScope::Global);
}

#[test]
fn test_audit_event_equality() {
    assert_eq!(create_test_event(), create_test_event());
    assert_ne!(
        create_test_event(),
        create_test_event().with_scope(AuditScope::Schedule(1))
    );
}
