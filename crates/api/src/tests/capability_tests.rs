// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda_persistence::Persistence;

use super::helpers::{
    STAFF_A, book_at, create_test_admin, create_test_cause, create_test_receptionist, seed,
};
use crate::{
    BookingConfig, Capability, compute_global_capabilities, confirm_booking,
    get_appointment_capabilities,
};

#[test]
fn test_global_capabilities_by_role() {
    let admin = compute_global_capabilities(&create_test_admin());
    assert!(admin.can_manage_schedules.is_allowed());
    assert!(admin.can_delete_appointments.is_allowed());

    let desk = compute_global_capabilities(&create_test_receptionist());
    assert_eq!(desk.can_manage_schedules, Capability::Denied);
    assert_eq!(desk.can_manage_catalog, Capability::Denied);
    assert_eq!(desk.can_book, Capability::Allowed);
}

#[test]
fn test_pending_appointment_capabilities() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let id = book_at(
        &mut persistence,
        &config,
        &fixture,
        STAFF_A,
        "2026-03-02 08:00:00",
        vec![fixture.haircut_id],
    )
    .unwrap()
    .appointment
    .appointment_id;

    let response =
        get_appointment_capabilities(&mut persistence, &config, id, &create_test_admin()).unwrap();
    let caps = response.capabilities;

    assert_eq!(response.status, "pending");
    assert!(caps.can_confirm.is_allowed());
    assert!(!caps.can_start.is_allowed());
    assert!(!caps.can_complete.is_allowed());
    assert!(caps.can_cancel.is_allowed());
    assert!(caps.can_edit_services.is_allowed());
    assert!(caps.can_delete.is_allowed());
}

#[test]
fn test_confirmed_capabilities_follow_completion_policy() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let lenient = BookingConfig::default();
    let strict = BookingConfig::new("UTC", 30, true).unwrap();
    let desk = create_test_receptionist();
    let id = book_at(
        &mut persistence,
        &lenient,
        &fixture,
        STAFF_A,
        "2026-03-02 08:00:00",
        vec![fixture.haircut_id],
    )
    .unwrap()
    .appointment
    .appointment_id;
    confirm_booking(&mut persistence, &lenient, id, &desk, create_test_cause(), &[]).unwrap();

    let lenient_caps = get_appointment_capabilities(&mut persistence, &lenient, id, &desk)
        .unwrap()
        .capabilities;
    let strict_caps = get_appointment_capabilities(&mut persistence, &strict, id, &desk)
        .unwrap()
        .capabilities;

    assert!(lenient_caps.can_complete.is_allowed());
    assert!(!strict_caps.can_complete.is_allowed());
    assert!(strict_caps.can_start.is_allowed());
    assert!(!lenient_caps.can_delete.is_allowed());
}

#[test]
fn test_billed_appointment_cannot_be_deleted() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let id = book_at(
        &mut persistence,
        &config,
        &fixture,
        STAFF_A,
        "2026-03-02 08:00:00",
        vec![fixture.haircut_id],
    )
    .unwrap()
    .appointment
    .appointment_id;
    persistence.record_billing_reference(id, "INV-77").unwrap();

    let caps = get_appointment_capabilities(&mut persistence, &config, id, &create_test_admin())
        .unwrap()
        .capabilities;

    assert!(!caps.can_delete.is_allowed());
}

#[test]
fn test_capability_serializes_as_bool() {
    assert_eq!(
        serde_json::to_string(&Capability::Allowed).unwrap(),
        "true"
    );
}
