// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    COLOUR, HAIRCUT, create_saved_appointment, create_test_actor, create_test_cause,
    create_test_schedule, strict_rules,
};
use crate::{
    BookingRules, Command, CoreError, LifecycleEventKind, TransitionResult, apply,
    apply_deletion,
};
use agenda_audit::AuditScope;
use agenda_domain::{Appointment, AppointmentService, AppointmentStatus, DomainError};

fn run(
    appointment: &Appointment,
    command: Command,
    rules: BookingRules,
) -> Result<TransitionResult, CoreError> {
    apply(
        appointment,
        &create_test_schedule(),
        command,
        rules,
        create_test_actor(),
        create_test_cause(),
    )
}

fn advance(appointment: &Appointment, command: Command) -> Appointment {
    run(appointment, command, BookingRules::default())
        .unwrap()
        .new_appointment
}

#[test]
fn test_confirm_start_complete() {
    let pending = create_saved_appointment();

    let result = run(&pending, Command::Confirm, strict_rules()).unwrap();
    assert_eq!(result.previous_status, AppointmentStatus::Pending);
    assert_eq!(result.lifecycle_event, Some(LifecycleEventKind::Confirmed));
    let confirmed = result.new_appointment;

    let result = run(&confirmed, Command::Start, strict_rules()).unwrap();
    assert_eq!(result.lifecycle_event, Some(LifecycleEventKind::Started));
    let started = result.new_appointment;

    let result = run(&started, Command::Complete, strict_rules()).unwrap();
    assert_eq!(result.new_appointment.status(), AppointmentStatus::Completed);
    assert_eq!(result.lifecycle_event, Some(LifecycleEventKind::Completed));
}

#[test]
fn test_audit_event_is_scoped_to_appointment() {
    let pending = create_saved_appointment();

    let result = run(&pending, Command::Confirm, BookingRules::default()).unwrap();

    assert_eq!(result.audit_event.scope, AuditScope::Appointment(42));
    assert_eq!(result.audit_event.action.name, "ConfirmBooking");
    assert!(result.audit_event.before.data.starts_with("status=pending"));
    assert!(result.audit_event.after.data.starts_with("status=confirmed"));
}

#[test]
fn test_cancel_records_reason() {
    let pending = create_saved_appointment();

    let result = run(
        &pending,
        Command::Cancel {
            reason: Some(String::from("client ill")),
        },
        BookingRules::default(),
    )
    .unwrap();

    assert_eq!(result.new_appointment.status(), AppointmentStatus::Cancelled);
    assert_eq!(result.new_appointment.cancel_reason(), Some("client ill"));
    assert_eq!(
        result.audit_event.action.details,
        Some(String::from("client ill"))
    );
    assert_eq!(result.lifecycle_event, Some(LifecycleEventKind::Cancelled));
}

#[test]
fn test_cancel_of_terminal_appointment_rejected() {
    let cancelled = advance(
        &create_saved_appointment(),
        Command::Cancel { reason: None },
    );

    let result = run(
        &cancelled,
        Command::Cancel { reason: None },
        BookingRules::default(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::AlreadyTerminal {
            status: AppointmentStatus::Cancelled
        }))
    );
}

#[test]
fn test_complete_of_completed_appointment_rejected() {
    let confirmed = advance(&create_saved_appointment(), Command::Confirm);
    let completed = advance(&confirmed, Command::Complete);

    let result = run(&completed, Command::Complete, BookingRules::default());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            from: AppointmentStatus::Completed,
            to: AppointmentStatus::Completed
        }))
    );
}

#[test]
fn test_complete_of_cancelled_appointment_rejected() {
    let cancelled = advance(
        &create_saved_appointment(),
        Command::Cancel { reason: None },
    );

    let result = run(&cancelled, Command::Complete, BookingRules::default());

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition {
            from: AppointmentStatus::Cancelled,
            to: AppointmentStatus::Completed
        }))
    );
    assert_eq!(cancelled.status(), AppointmentStatus::Cancelled);
}

#[test]
fn test_complete_from_pending_rejected() {
    let result = run(
        &create_saved_appointment(),
        Command::Complete,
        BookingRules::default(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(DomainError::InvalidTransition { .. }))
    ));
}

#[test]
fn test_strict_rules_require_in_progress() {
    let confirmed = advance(&create_saved_appointment(), Command::Confirm);

    assert!(run(&confirmed, Command::Complete, strict_rules()).is_err());
    assert!(run(&confirmed, Command::Complete, BookingRules::default()).is_ok());
}

#[test]
fn test_adding_services_grows_interval() {
    let pending = create_saved_appointment();

    let result = run(
        &pending,
        Command::AddServices {
            lines: vec![AppointmentService {
                service_id: COLOUR,
                duration_minutes: 60,
            }],
        },
        BookingRules::default(),
    )
    .unwrap();

    assert!(result.interval_grew());
    assert_eq!(result.new_appointment.duration_minutes(), 90);
    assert_eq!(result.new_appointment.service_ids(), vec![HAIRCUT, COLOUR]);
    assert_eq!(result.lifecycle_event, None);
    assert_eq!(
        result.audit_event.action.details,
        Some(format!("Services now {HAIRCUT}, {COLOUR}"))
    );
}

#[test]
fn test_adding_existing_service_rejected() {
    let pending = create_saved_appointment();

    let result = run(
        &pending,
        Command::AddServices {
            lines: vec![AppointmentService {
                service_id: HAIRCUT,
                duration_minutes: 30,
            }],
        },
        BookingRules::default(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ServicesUnchanged {
            service_ids: vec![HAIRCUT]
        }))
    );
}

#[test]
fn test_removing_absent_service_rejected() {
    let result = run(
        &create_saved_appointment(),
        Command::RemoveServices {
            service_ids: vec![COLOUR],
        },
        BookingRules::default(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::ServicesUnchanged {
            service_ids: vec![HAIRCUT]
        }))
    );
}

#[test]
fn test_adding_services_past_daily_end_rejected() {
    let pending = create_saved_appointment();

    // 08:30 + 30 + 90 = 10:30, past the 10:00 window end
    let result = run(
        &pending,
        Command::AddServices {
            lines: vec![AppointmentService {
                service_id: 9,
                duration_minutes: 90,
            }],
        },
        BookingRules::default(),
    );

    assert!(matches!(
        result,
        Err(CoreError::DomainViolation(
            DomainError::OutsideScheduleWindow { .. }
        ))
    ));
}

#[test]
fn test_removing_services_never_grows_interval() {
    let result = run(
        &create_saved_appointment(),
        Command::RemoveServices {
            service_ids: vec![HAIRCUT],
        },
        BookingRules::default(),
    )
    .unwrap();

    assert!(!result.interval_grew());
    assert!(result.new_appointment.service_ids().is_empty());
    assert_eq!(
        result.audit_event.action.details,
        Some(String::from("Services now none"))
    );
}

#[test]
fn test_services_locked_after_start() {
    let confirmed = advance(&create_saved_appointment(), Command::Confirm);
    let started = advance(&confirmed, Command::Start);

    let result = run(
        &started,
        Command::RemoveServices {
            service_ids: vec![HAIRCUT],
        },
        BookingRules::default(),
    );

    assert_eq!(
        result,
        Err(CoreError::DomainViolation(DomainError::AppointmentLocked {
            status: AppointmentStatus::InProgress
        }))
    );
}

#[test]
fn test_unsaved_appointment_rejected() {
    let unsaved = Appointment::new(
        1,
        7,
        1,
        time::macros::datetime!(2026-03-02 08:00),
        Vec::new(),
        agenda_domain::SlotLength::DEFAULT,
    );

    let result = run(&unsaved, Command::Confirm, BookingRules::default());

    assert!(matches!(result, Err(CoreError::Internal(_))));
}

#[test]
fn test_deletion_event_records_appointment_before() {
    let appointment = create_saved_appointment();

    let event = apply_deletion(&appointment, create_test_actor(), create_test_cause()).unwrap();

    assert_eq!(event.action.name, "DeleteAppointment");
    assert_eq!(event.scope, AuditScope::Appointment(42));
    assert!(event.before.data.starts_with("status=pending"));
    assert_eq!(event.after.data, "none");
}
