// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Booking request validation.
//!
//! Everything that can be decided without the write lock happens here, in
//! a fixed order, failing fast:
//!
//! 1. schedule exists and is active
//! 2. staff member currently belongs to the schedule
//! 3. the start is inside the schedule window and in the future
//! 4. every service resolves to an active catalog entry
//! 5. the whole interval ends by the daily window end
//!
//! The conflict check against other bookings is not done here. It must run
//! inside the store's write transaction so concurrent requests cannot both
//! pass it.

use crate::directory::{ServiceCatalog, StaffDirectory};
use crate::error::BookingError;
use crate::state::{BookingRules, PreparedBooking, appointment_snapshot};
use agenda_audit::{Action, Actor, AuditEvent, Cause, StateSnapshot};
use agenda_domain::{
    Appointment, AppointmentService, DomainError, ScheduleDefinition, format_wall_clock,
    resolve_service_lines,
};
use time::PrimitiveDateTime;

/// A request to book an appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingRequest {
    pub client_id: i64,
    pub staff_id: i64,
    pub schedule_id: i64,
    pub start_at: PrimitiveDateTime,
    pub service_ids: Vec<i64>,
}

/// Resolves requested service ids to active appointment lines.
///
/// # Errors
///
/// Returns `DomainError::InvalidServices` if any id is unknown or inactive,
/// or the catalog's error if the lookup fails.
pub fn resolve_services<C: ServiceCatalog>(
    catalog: &mut C,
    service_ids: &[i64],
) -> Result<Vec<AppointmentService>, BookingError<C::Error>> {
    if service_ids.is_empty() {
        return Ok(Vec::new());
    }
    let resolved = catalog
        .resolve_services(service_ids)
        .map_err(BookingError::Lookup)?;
    Ok(resolve_service_lines(service_ids, &resolved)?)
}

/// Validates a booking request and builds the appointment to insert.
///
/// # Arguments
///
/// * `directory` - Staff directory and service catalog
/// * `schedule` - The requested schedule, or `None` if it does not exist
/// * `request` - The booking request
/// * `now` - Current business-local wall-clock time
/// * `rules` - Deployment booking rules
/// * `actor` - The actor requesting the booking
/// * `cause` - The reason for the booking
///
/// # Errors
///
/// Returns `BookingError::Rejected` with, in check order:
/// - `ScheduleNotFound` if the schedule is missing or inactive
/// - `StaffNotInSchedule` if the staff member is not assigned
/// - `OutsideScheduleWindow` if the start is outside the window or not in
///   the future
/// - `InvalidServices` if a service is unknown or inactive
/// - `OutsideScheduleWindow` if the interval runs past the daily end
///
/// Returns `BookingError::Lookup` if a directory lookup fails.
pub fn prepare_booking<D>(
    directory: &mut D,
    schedule: Option<&ScheduleDefinition>,
    request: &BookingRequest,
    now: PrimitiveDateTime,
    rules: BookingRules,
    actor: Actor,
    cause: Cause,
) -> Result<PreparedBooking, BookingError<<D as StaffDirectory>::Error>>
where
    D: StaffDirectory + ServiceCatalog<Error = <D as StaffDirectory>::Error>,
{
    let schedule = schedule
        .filter(|s| s.is_active())
        .ok_or(DomainError::ScheduleNotFound {
            schedule_id: request.schedule_id,
        })?;

    let is_member = directory
        .is_staff_member(request.schedule_id, request.staff_id)
        .map_err(BookingError::Lookup)?;
    if !is_member {
        return Err(DomainError::StaffNotInSchedule {
            schedule_id: request.schedule_id,
            staff_id: request.staff_id,
        }
        .into());
    }

    schedule.check_start(request.start_at)?;
    if request.start_at <= now {
        return Err(DomainError::OutsideScheduleWindow {
            reason: format!(
                "start {} is not in the future",
                format_wall_clock(request.start_at)
            ),
        }
        .into());
    }

    let lines = resolve_services(directory, &request.service_ids)?;

    let appointment = Appointment::new(
        request.client_id,
        request.staff_id,
        request.schedule_id,
        request.start_at,
        lines,
        rules.slot_length,
    );
    schedule.check_end(appointment.start_at(), appointment.duration_minutes())?;

    let action = Action::new(
        String::from("CreateBooking"),
        Some(format!(
            "Booked staff member {} at {} for {} minutes",
            appointment.staff_id(),
            format_wall_clock(appointment.start_at()),
            appointment.duration_minutes()
        )),
    );
    let audit_event = AuditEvent::new(
        actor,
        cause,
        action,
        StateSnapshot::absent(),
        appointment_snapshot(&appointment),
    );

    Ok(PreparedBooking {
        appointment,
        audit_event,
    })
}
