// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda::LifecycleEventKind;
use agenda_persistence::Persistence;

use super::helpers::{
    Fixture, NOW, RecordingNotifier, STAFF_A, book_at, create_test_admin, create_test_cause,
    create_test_receptionist, seed,
};
use crate::{
    ApiError, BookingConfig, CancelBookingRequest, ChangeServicesRequest, add_services,
    cancel_booking, complete_booking, confirm_booking, delete_appointment, get_appointment,
    get_appointment_history, get_availability, remove_services, start_booking,
};

fn book_haircut(persistence: &mut Persistence, fixture: &Fixture, start_at: &str) -> i64 {
    book_at(
        persistence,
        &BookingConfig::default(),
        fixture,
        STAFF_A,
        start_at,
        vec![fixture.haircut_id],
    )
    .unwrap()
    .appointment
    .appointment_id
}

#[test]
fn test_full_lifecycle_notifies_and_records_history() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let recorder = RecordingNotifier::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");

    confirm_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[&recorder])
        .unwrap();
    start_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[&recorder])
        .unwrap();
    let done =
        complete_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[&recorder])
            .unwrap();

    assert_eq!(done.appointment.status, "completed");
    assert_eq!(
        *recorder.seen.borrow(),
        vec![
            LifecycleEventKind::Confirmed,
            LifecycleEventKind::Started,
            LifecycleEventKind::Completed
        ]
    );

    let history = get_appointment_history(&mut persistence, id).unwrap();
    let steps: Vec<(Option<String>, String)> = history
        .entries
        .iter()
        .map(|e| (e.previous_status.clone(), e.new_status.clone()))
        .collect();
    assert_eq!(
        steps,
        vec![
            (None, String::from("pending")),
            (Some(String::from("pending")), String::from("confirmed")),
            (Some(String::from("confirmed")), String::from("in_progress")),
            (Some(String::from("in_progress")), String::from("completed")),
        ]
    );
}

#[test]
fn test_complete_from_confirmed_follows_policy() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let desk = create_test_receptionist();
    let lenient = BookingConfig::default();
    let strict = BookingConfig::new("UTC", 30, true).unwrap();

    let first = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");
    let second = book_haircut(&mut persistence, &fixture, "2026-03-02 08:30:00");
    for id in [first, second] {
        confirm_booking(&mut persistence, &lenient, id, &desk, create_test_cause(), &[]).unwrap();
    }

    let strict_result =
        complete_booking(&mut persistence, &strict, first, &desk, create_test_cause(), &[]);
    assert!(matches!(
        strict_result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "status_transition"
    ));

    let lenient_result =
        complete_booking(&mut persistence, &lenient, second, &desk, create_test_cause(), &[])
            .unwrap();
    assert_eq!(lenient_result.appointment.status, "completed");
}

#[test]
fn test_cancel_frees_slot_and_keeps_reason() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");

    let cancelled = cancel_booking(
        &mut persistence,
        &config,
        id,
        &CancelBookingRequest {
            reason: Some(String::from("client is ill")),
        },
        &create_test_receptionist(),
        create_test_cause(),
        &[],
    )
    .unwrap();
    assert_eq!(cancelled.appointment.status, "cancelled");
    assert_eq!(
        cancelled.appointment.cancel_reason.as_deref(),
        Some("client is ill")
    );

    let availability =
        get_availability(&mut persistence, &config, fixture.schedule_id, "2026-03-02", NOW)
            .unwrap();
    assert_eq!(availability.staff[0].slots.len(), 4);

    let history = get_appointment_history(&mut persistence, id).unwrap();
    assert_eq!(
        history.entries.last().unwrap().notes.as_deref(),
        Some("client is ill")
    );
}

#[test]
fn test_terminal_appointments_cannot_change() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");
    cancel_booking(
        &mut persistence,
        &config,
        id,
        &CancelBookingRequest::default(),
        &desk,
        create_test_cause(),
        &[],
    )
    .unwrap();

    let again = cancel_booking(
        &mut persistence,
        &config,
        id,
        &CancelBookingRequest::default(),
        &desk,
        create_test_cause(),
        &[],
    );
    let complete = complete_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[]);

    assert!(matches!(
        again,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "terminal_status"
    ));
    assert!(matches!(
        complete,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "status_transition"
    ));
}

#[test]
fn test_adding_services_extends_and_rechecks_calendar() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");
    book_haircut(&mut persistence, &fixture, "2026-03-02 09:00:00");

    let blocked = add_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.colour_id],
        },
        &desk,
        create_test_cause(),
    );
    assert!(matches!(blocked, Err(ApiError::Conflict { .. })));

    let unchanged = get_appointment(&mut persistence, id).unwrap();
    assert_eq!(unchanged.duration_minutes, 30);
}

#[test]
fn test_service_edits_update_duration() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");

    let grown = add_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.colour_id],
        },
        &desk,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(grown.appointment.duration_minutes, 90);
    assert_eq!(grown.appointment.end_at, "2026-03-02 09:30:00");

    let shrunk = remove_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.haircut_id],
        },
        &desk,
        create_test_cause(),
    )
    .unwrap();
    assert_eq!(shrunk.appointment.duration_minutes, 60);
    assert_eq!(shrunk.appointment.services.len(), 1);
    assert_eq!(shrunk.appointment.services[0].service_id, fixture.colour_id);
}

#[test]
fn test_service_edits_that_change_nothing_are_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");

    let readded = add_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.haircut_id],
        },
        &desk,
        create_test_cause(),
    );
    let removed = remove_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.colour_id],
        },
        &desk,
        create_test_cause(),
    );

    for result in [readded, removed] {
        assert!(matches!(
            result,
            Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "services_changed"
        ));
    }
    let unchanged = get_appointment(&mut persistence, id).unwrap();
    assert_eq!(unchanged.services.len(), 1);
    assert_eq!(unchanged.duration_minutes, 30);
}

#[test]
fn test_services_locked_once_started() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let config = BookingConfig::default();
    let desk = create_test_receptionist();
    let id = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");
    confirm_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[]).unwrap();
    start_booking(&mut persistence, &config, id, &desk, create_test_cause(), &[]).unwrap();

    let result = add_services(
        &mut persistence,
        &config,
        id,
        &ChangeServicesRequest {
            service_ids: vec![fixture.colour_id],
        },
        &desk,
        create_test_cause(),
    );

    assert!(matches!(
        result,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "services_editable"
    ));
}

#[test]
fn test_unknown_appointment_is_not_found() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    seed(&mut persistence);

    let result = confirm_booking(
        &mut persistence,
        &BookingConfig::default(),
        404,
        &create_test_receptionist(),
        create_test_cause(),
        &[],
    );

    assert!(matches!(
        result,
        Err(ApiError::ResourceNotFound { resource_type, .. }) if resource_type == "Appointment"
    ));
}

#[test]
fn test_delete_appointment_respects_billing_links() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let fixture = seed(&mut persistence);
    let admin = create_test_admin();
    let billed = book_haircut(&mut persistence, &fixture, "2026-03-02 08:00:00");
    let unbilled = book_haircut(&mut persistence, &fixture, "2026-03-02 08:30:00");
    persistence
        .record_billing_reference(billed, "INV-0001")
        .unwrap();

    let rejected = delete_appointment(&mut persistence, billed, &admin, create_test_cause());
    assert!(matches!(
        rejected,
        Err(ApiError::DomainRuleViolation { rule, .. }) if rule == "appointment_unbilled"
    ));

    delete_appointment(&mut persistence, unbilled, &admin, create_test_cause()).unwrap();
    assert!(matches!(
        get_appointment(&mut persistence, unbilled),
        Err(ApiError::ResourceNotFound { .. })
    ));
}
