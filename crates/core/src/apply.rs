// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::command::{CatalogCommand, Command, ScheduleCommand};
use crate::error::CoreError;
use crate::notify::LifecycleEventKind;
use crate::state::{
    BookingRules, CatalogTransition, ScheduleTransition, TransitionResult, appointment_snapshot,
    schedule_snapshot, service_snapshot,
};
use agenda_audit::{Action, Actor, AuditEvent, AuditScope, Cause, StateSnapshot};
use agenda_domain::{
    Appointment, AppointmentStatus, CatalogService, DomainError, ScheduleDefinition, join_ids,
};

fn services_details(appointment: &Appointment) -> String {
    format!("Services now {}", join_ids(&appointment.service_ids()))
}

fn services_unchanged(appointment: &Appointment) -> CoreError {
    CoreError::DomainViolation(DomainError::ServicesUnchanged {
        service_ids: appointment.service_ids(),
    })
}

/// Applies a lifecycle command to an appointment.
///
/// This function is pure: it returns the changed appointment and its audit
/// event and leaves persisting them to the caller.
///
/// # Arguments
///
/// * `appointment` - The current appointment (must be persisted)
/// * `schedule` - The schedule the appointment was booked under
/// * `command` - The command to apply
/// * `rules` - Deployment booking rules
/// * `actor` - The actor performing the command
/// * `cause` - The reason for the command
///
/// # Returns
///
/// * `Ok(TransitionResult)` containing the new appointment and audit event
/// * `Err(CoreError)` if the command is not permitted
///
/// # Errors
///
/// Returns an error if:
/// - The status transition is not allowed (`InvalidTransition`, or
///   `AlreadyTerminal` when cancelling a finished appointment)
/// - Services are edited outside `Pending`/`Confirmed` (`AppointmentLocked`)
/// - A service edit leaves the service set unchanged (`ServicesUnchanged`)
/// - Added services push the appointment past the daily window end
pub fn apply(
    appointment: &Appointment,
    schedule: &ScheduleDefinition,
    command: Command,
    rules: BookingRules,
    actor: Actor,
    cause: Cause,
) -> Result<TransitionResult, CoreError> {
    let appointment_id = appointment
        .appointment_id()
        .ok_or_else(|| CoreError::Internal(String::from("appointment has not been persisted")))?;

    let before: StateSnapshot = appointment_snapshot(appointment);
    let action_name: &'static str = command.action_name();
    let mut updated: Appointment = appointment.clone();

    let (details, lifecycle_event): (Option<String>, Option<LifecycleEventKind>) = match command {
        Command::Confirm => {
            updated.transition_to(AppointmentStatus::Confirmed, rules.completion_policy)?;
            (None, Some(LifecycleEventKind::Confirmed))
        }
        Command::Start => {
            updated.transition_to(AppointmentStatus::InProgress, rules.completion_policy)?;
            (None, Some(LifecycleEventKind::Started))
        }
        Command::Complete => {
            updated.transition_to(AppointmentStatus::Completed, rules.completion_policy)?;
            (None, Some(LifecycleEventKind::Completed))
        }
        Command::Cancel { reason } => {
            updated.cancel(reason.as_deref())?;
            (
                updated.cancel_reason().map(str::to_string),
                Some(LifecycleEventKind::Cancelled),
            )
        }
        Command::AddServices { lines } => {
            if !updated.add_services(&lines, rules.slot_length)? {
                return Err(services_unchanged(&updated));
            }
            schedule.check_end(updated.start_at(), updated.duration_minutes())?;
            (Some(services_details(&updated)), None)
        }
        Command::RemoveServices { service_ids } => {
            if !updated.remove_services(&service_ids, rules.slot_length)? {
                return Err(services_unchanged(&updated));
            }
            (Some(services_details(&updated)), None)
        }
    };

    let after: StateSnapshot = appointment_snapshot(&updated);
    let audit_event: AuditEvent = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(action_name), details),
        before,
        after,
    )
    .with_scope(AuditScope::Appointment(appointment_id));

    Ok(TransitionResult {
        new_appointment: updated,
        previous_status: appointment.status(),
        previous_duration_minutes: appointment.duration_minutes(),
        audit_event,
        lifecycle_event,
    })
}

/// Builds the audit event for physically deleting an appointment.
///
/// Whether the deletion is allowed (no billing record references the
/// appointment) is decided by the store.
///
/// # Errors
///
/// Returns `CoreError::Internal` if the appointment has not been persisted.
pub fn apply_deletion(
    appointment: &Appointment,
    actor: Actor,
    cause: Cause,
) -> Result<AuditEvent, CoreError> {
    let appointment_id = appointment
        .appointment_id()
        .ok_or_else(|| CoreError::Internal(String::from("appointment has not been persisted")))?;

    Ok(AuditEvent::new(
        actor,
        cause,
        Action::new(String::from("DeleteAppointment"), None),
        appointment_snapshot(appointment),
        StateSnapshot::absent(),
    )
    .with_scope(AuditScope::Appointment(appointment_id)))
}

/// Applies a schedule administration command.
///
/// # Arguments
///
/// * `current` - The addressed schedule, or `None` if it does not exist
///   (always `None` for `CreateSchedule`)
/// * `command` - The command to apply
/// * `actor` - The actor performing the command
/// * `cause` - The reason for the command
///
/// # Errors
///
/// Returns an error if:
/// - The schedule fields violate an invariant (`InvalidSchedule`)
/// - The addressed schedule does not exist (`ScheduleNotFound`)
pub fn apply_schedule(
    current: Option<&ScheduleDefinition>,
    command: ScheduleCommand,
    actor: Actor,
    cause: Cause,
) -> Result<ScheduleTransition, CoreError> {
    if let ScheduleCommand::CreateSchedule {
        name,
        staff_ids,
        start_date,
        end_date,
        weekdays,
        daily_start,
        daily_end,
    } = command
    {
        if current.is_some() {
            return Err(CoreError::Internal(String::from(
                "create applied to an existing schedule",
            )));
        }
        let schedule = ScheduleDefinition::new(
            &name,
            staff_ids,
            start_date,
            end_date,
            weekdays,
            daily_start,
            daily_end,
        )?;
        let action = Action::new(
            String::from("CreateSchedule"),
            Some(format!("Created schedule '{}'", schedule.name())),
        );
        let audit_event = AuditEvent::new(
            actor,
            cause,
            action,
            StateSnapshot::absent(),
            schedule_snapshot(&schedule),
        );
        return Ok(ScheduleTransition {
            schedule,
            removed: false,
            audit_event,
        });
    }

    let schedule_id: i64 = command.schedule_id().unwrap_or_default();
    let removed: bool = matches!(command, ScheduleCommand::Delete { .. });
    let current: &ScheduleDefinition =
        current.ok_or(DomainError::ScheduleNotFound { schedule_id })?;
    let before: StateSnapshot = schedule_snapshot(current);
    let mut schedule: ScheduleDefinition = current.clone();

    let (name, after): (&str, StateSnapshot) = match command {
        ScheduleCommand::ReplaceStaff { staff_ids, .. } => {
            schedule.replace_staff(staff_ids)?;
            ("ReplaceScheduleStaff", schedule_snapshot(&schedule))
        }
        ScheduleCommand::Deactivate { .. } => {
            schedule.deactivate();
            ("DeactivateSchedule", schedule_snapshot(&schedule))
        }
        ScheduleCommand::Reactivate { .. } => {
            schedule.activate();
            ("ReactivateSchedule", schedule_snapshot(&schedule))
        }
        ScheduleCommand::Delete { .. } => ("DeleteSchedule", StateSnapshot::absent()),
        ScheduleCommand::CreateSchedule { .. } => {
            return Err(CoreError::Internal(String::from(
                "create command reached update path",
            )));
        }
    };

    let audit_event = AuditEvent::new(
        actor,
        cause,
        Action::new(String::from(name), None),
        before,
        after,
    )
    .with_scope(AuditScope::Schedule(schedule_id));

    Ok(ScheduleTransition {
        schedule,
        removed,
        audit_event,
    })
}

/// Applies a service catalog command.
///
/// # Arguments
///
/// * `current` - The addressed service, or `None` (always `None` for
///   `RegisterService`)
/// * `command` - The command to apply
/// * `actor` - The actor performing the command
/// * `cause` - The reason for the command
///
/// # Errors
///
/// Returns an error if:
/// - The service fields are invalid (`InvalidServiceDefinition`)
/// - The addressed service does not exist (`InvalidServices`)
pub fn apply_catalog(
    current: Option<&CatalogService>,
    command: CatalogCommand,
    actor: Actor,
    cause: Cause,
) -> Result<CatalogTransition, CoreError> {
    match command {
        CatalogCommand::RegisterService {
            name,
            duration_minutes,
        } => {
            let service = CatalogService::new(&name, duration_minutes)?;
            let audit_event = AuditEvent::new(
                actor,
                cause,
                Action::new(
                    String::from("RegisterService"),
                    Some(format!("Registered service '{}'", service.name())),
                ),
                StateSnapshot::absent(),
                service_snapshot(&service),
            );
            Ok(CatalogTransition {
                service,
                audit_event,
            })
        }
        CatalogCommand::SetServiceActive { service_id, active } => {
            let current = current.ok_or_else(|| DomainError::InvalidServices {
                service_ids: vec![service_id],
                reason: String::from("unknown service"),
            })?;
            let service = current.clone().with_active(active);
            let audit_event = AuditEvent::new(
                actor,
                cause,
                Action::new(String::from("SetServiceActive"), None),
                service_snapshot(current),
                service_snapshot(&service),
            )
            .with_scope(AuditScope::Service(service_id));
            Ok(CatalogTransition {
                service,
                audit_event,
            })
        }
    }
}
