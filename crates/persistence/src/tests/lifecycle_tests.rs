// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::{
    STAFF_A, book, create_test_actor, create_test_cause, run_command, seed,
};
use crate::{Persistence, PersistenceError};
use agenda::{BookingRules, Command, apply, apply_deletion};
use agenda_domain::{AppointmentService, AppointmentStatus};
use time::macros::{date, datetime};

fn book_haircut_at(persistence: &mut Persistence, hour: u8, minute: u8) -> (super::Fixture, i64) {
    let fixture = seed(persistence);
    let start = date!(2026 - 03 - 02).with_hms(hour, minute, 0).unwrap();
    let appointment_id = book(persistence, &fixture, STAFF_A, start, vec![fixture.haircut_id])
        .unwrap()
        .appointment_id()
        .unwrap();
    (fixture, appointment_id)
}

#[test]
fn test_full_lifecycle_recorded_in_history() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (_, appointment_id) = book_haircut_at(&mut persistence, 8, 0);

    run_command(&mut persistence, appointment_id, Command::Confirm).unwrap();
    run_command(&mut persistence, appointment_id, Command::Start).unwrap();
    let done = run_command(&mut persistence, appointment_id, Command::Complete).unwrap();

    assert_eq!(done.status(), AppointmentStatus::Completed);
    let statuses: Vec<AppointmentStatus> = persistence
        .get_appointment_history(appointment_id)
        .unwrap()
        .iter()
        .map(|entry| entry.new_status)
        .collect();
    assert_eq!(
        statuses,
        vec![
            AppointmentStatus::Pending,
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
        ]
    );
}

#[test]
fn test_cancel_frees_slot_and_records_reason() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (fixture, appointment_id) = book_haircut_at(&mut persistence, 8, 0);

    run_command(
        &mut persistence,
        appointment_id,
        Command::Cancel {
            reason: Some(String::from("Client ill")),
        },
    )
    .unwrap();

    let history = persistence.get_appointment_history(appointment_id).unwrap();
    assert_eq!(history[1].previous_status, Some(AppointmentStatus::Pending));
    assert_eq!(history[1].notes.as_deref(), Some("Client ill"));

    let rebooked = book(
        &mut persistence,
        &fixture,
        STAFF_A,
        datetime!(2026-03-02 08:00),
        vec![fixture.haircut_id],
    );
    assert!(rebooked.is_ok());
}

#[test]
fn test_growing_services_rechecks_calendar() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (fixture, appointment_id) = book_haircut_at(&mut persistence, 8, 0);
    book(
        &mut persistence,
        &fixture,
        STAFF_A,
        datetime!(2026-03-02 08:30),
        vec![fixture.haircut_id],
    )
    .unwrap();

    let result = run_command(
        &mut persistence,
        appointment_id,
        Command::AddServices {
            lines: vec![AppointmentService {
                service_id: fixture.colour_id,
                duration_minutes: 60,
            }],
        },
    );

    assert!(matches!(
        result,
        Err(PersistenceError::BookingConflict { staff_id: STAFF_A, .. })
    ));
    let unchanged = persistence.get_appointment(appointment_id).unwrap().unwrap();
    assert_eq!(unchanged.duration_minutes(), 30);
    assert_eq!(unchanged.service_ids(), vec![fixture.haircut_id]);
}

#[test]
fn test_growing_services_into_free_time() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (fixture, appointment_id) = book_haircut_at(&mut persistence, 8, 0);

    let updated = run_command(
        &mut persistence,
        appointment_id,
        Command::AddServices {
            lines: vec![AppointmentService {
                service_id: fixture.colour_id,
                duration_minutes: 60,
            }],
        },
    )
    .unwrap();

    assert_eq!(updated.duration_minutes(), 90);
    let stored = persistence.get_appointment(appointment_id).unwrap().unwrap();
    assert_eq!(stored.service_ids(), vec![fixture.haircut_id, fixture.colour_id]);
    // Service edits do not add status history.
    assert_eq!(persistence.get_appointment_history(appointment_id).unwrap().len(), 1);
}

#[test]
fn test_stale_transition_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (_, appointment_id) = book_haircut_at(&mut persistence, 8, 0);
    let appointment = persistence.get_appointment(appointment_id).unwrap().unwrap();
    let schedule = persistence
        .get_schedule(appointment.schedule_id())
        .unwrap()
        .unwrap();

    let confirm = apply(
        &appointment,
        &schedule,
        Command::Confirm,
        BookingRules::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    let cancel = apply(
        &appointment,
        &schedule,
        Command::Cancel { reason: None },
        BookingRules::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();

    persistence.commit_transition(&cancel).unwrap();
    assert_eq!(
        persistence.commit_transition(&confirm),
        Err(PersistenceError::StaleAppointment { appointment_id })
    );
}

#[test]
fn test_delete_appointment_without_billing() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (_, appointment_id) = book_haircut_at(&mut persistence, 8, 0);
    let appointment = persistence.get_appointment(appointment_id).unwrap().unwrap();
    let event = apply_deletion(&appointment, create_test_actor(), create_test_cause()).unwrap();

    persistence.delete_appointment(appointment_id, &event).unwrap();

    assert!(persistence.get_appointment(appointment_id).unwrap().is_none());
    assert!(persistence.get_appointment_history(appointment_id).unwrap().is_empty());
}

#[test]
fn test_delete_billed_appointment_rejected() {
    let mut persistence = Persistence::new_in_memory().unwrap();
    let (_, appointment_id) = book_haircut_at(&mut persistence, 8, 0);
    persistence
        .record_billing_reference(appointment_id, "INV-2026-0001")
        .unwrap();
    let appointment = persistence.get_appointment(appointment_id).unwrap().unwrap();
    let event = apply_deletion(&appointment, create_test_actor(), create_test_cause()).unwrap();

    assert_eq!(
        persistence.delete_appointment(appointment_id, &event),
        Err(PersistenceError::AppointmentReferenced { appointment_id })
    );
    assert!(persistence.get_appointment(appointment_id).unwrap().is_some());
}
