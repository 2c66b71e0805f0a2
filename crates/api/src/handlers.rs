// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handlers.
//!
//! Each handler authorizes the actor, parses the request, runs the core
//! operation, persists the result, and translates every failure into an
//! `ApiError`. Lifecycle notifications go out only after the store has
//! committed.

use agenda::{
    BookingRequest, CatalogCommand, ClientDirectory, Command, LifecycleEvent, LifecycleEventKind,
    LifecycleNotifier, PreparedBooking, ScheduleCommand, TransitionResult, apply, apply_catalog,
    apply_deletion, apply_schedule, dispatch, prepare_booking, resolve_services,
};
use agenda_audit::{Actor, Cause};
use agenda_domain::{
    Appointment, CatalogService, DomainError, ScheduleDefinition, StaffAvailability, WeekdaySet,
    format_date, format_time_of_day, format_wall_clock, parse_date, parse_time_of_day,
    parse_wall_clock, resolve_availability,
};
use agenda_persistence::{Persistence, StatusHistoryEntry};
use time::{Date, PrimitiveDateTime};
use tracing::{debug, info};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::capabilities::compute_appointment_capabilities;
use crate::config::BookingConfig;
use crate::error::{
    ApiError, translate_booking_error, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
use crate::request_response::{
    AppointmentCapabilitiesResponse, AppointmentHistoryResponse, AppointmentInfo,
    AppointmentResponse, AppointmentServiceInfo, AvailabilityResponse, CancelBookingRequest,
    ChangeServicesRequest, ClientResponse, CreateBookingRequest, CreateScheduleRequest,
    DeleteAppointmentResponse, DeleteScheduleResponse, ListAppointmentsResponse,
    ListSchedulesResponse, ListServicesResponse, RegisterClientRequest, RegisterServiceRequest,
    ReplaceScheduleStaffRequest, ScheduleInfo, ScheduleResponse, ServiceInfo, ServiceResponse,
    SetServiceActiveRequest, SlotInfo, StaffAvailabilityInfo, StatusHistoryInfo,
};

// ========================================================================
// Conversions
// ========================================================================

fn missing_id(kind: &str) -> ApiError {
    ApiError::Internal {
        message: format!("{kind} returned from the store without an id"),
    }
}

fn appointment_info(appointment: &Appointment) -> Result<AppointmentInfo, ApiError> {
    Ok(AppointmentInfo {
        appointment_id: appointment
            .appointment_id()
            .ok_or_else(|| missing_id("Appointment"))?,
        client_id: appointment.client_id(),
        staff_id: appointment.staff_id(),
        schedule_id: appointment.schedule_id(),
        start_at: format_wall_clock(appointment.start_at()),
        end_at: format_wall_clock(appointment.end_at()),
        duration_minutes: appointment.duration_minutes(),
        status: appointment.status().to_string(),
        services: appointment
            .services()
            .iter()
            .map(|line| AppointmentServiceInfo {
                service_id: line.service_id,
                duration_minutes: line.duration_minutes,
            })
            .collect(),
        cancel_reason: appointment.cancel_reason().map(str::to_string),
    })
}

fn schedule_info(schedule: &ScheduleDefinition) -> Result<ScheduleInfo, ApiError> {
    Ok(ScheduleInfo {
        schedule_id: schedule
            .schedule_id()
            .ok_or_else(|| missing_id("Schedule"))?,
        name: schedule.name().to_string(),
        staff_ids: schedule.staff_ids().iter().copied().collect(),
        start_date: format_date(schedule.start_date()),
        end_date: format_date(schedule.end_date()),
        weekdays: schedule
            .weekdays()
            .names()
            .into_iter()
            .map(String::from)
            .collect(),
        daily_start: format_time_of_day(schedule.daily_start()),
        daily_end: format_time_of_day(schedule.daily_end()),
        is_active: schedule.is_active(),
    })
}

fn service_info(service: &CatalogService) -> Result<ServiceInfo, ApiError> {
    Ok(ServiceInfo {
        service_id: service.service_id().ok_or_else(|| missing_id("Service"))?,
        name: service.name().to_string(),
        duration_minutes: service.duration_minutes(),
        is_active: service.is_active(),
    })
}

fn history_info(entry: &StatusHistoryEntry) -> StatusHistoryInfo {
    StatusHistoryInfo {
        audit_event_id: entry.audit_event_id,
        previous_status: entry.previous_status.map(|s| s.as_str().to_string()),
        new_status: entry.new_status.to_string(),
        transitioned_at: entry.transitioned_at.clone(),
        notes: entry.notes.clone(),
    }
}

fn parse_date_field(field: &str, value: &str) -> Result<Date, ApiError> {
    parse_date(value).map_err(|e| ApiError::InvalidInput {
        field: String::from(field),
        message: e.to_string(),
    })
}

fn load_appointment(
    persistence: &mut Persistence,
    appointment_id: i64,
) -> Result<Appointment, ApiError> {
    persistence
        .get_appointment(appointment_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::AppointmentNotFound { appointment_id }))
}

fn load_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
) -> Result<ScheduleDefinition, ApiError> {
    persistence
        .get_schedule(schedule_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| translate_domain_error(DomainError::ScheduleNotFound { schedule_id }))
}

fn notify(
    notifiers: &[&dyn LifecycleNotifier],
    kind: LifecycleEventKind,
    appointment: &Appointment,
) {
    if let Some(event) = LifecycleEvent::for_appointment(kind, appointment) {
        dispatch(notifiers, &event);
    }
}

// ========================================================================
// Availability
// ========================================================================

/// Lists the free slots of every staff member of a schedule on a date.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Booking configuration
/// * `schedule_id` - The schedule to query
/// * `date` - The calendar date (`YYYY-MM-DD`)
/// * `now` - Current business-local wall-clock time
///
/// # Errors
///
/// Returns an error if:
/// - The date cannot be parsed
/// - The schedule does not exist or is inactive
/// - The store cannot be read
pub fn get_availability(
    persistence: &mut Persistence,
    config: &BookingConfig,
    schedule_id: i64,
    date: &str,
    now: PrimitiveDateTime,
) -> Result<AvailabilityResponse, ApiError> {
    let date: Date = parse_date_field("date", date)?;
    let schedule: ScheduleDefinition = load_schedule(persistence, schedule_id)?;
    if !schedule.is_active() {
        return Err(translate_domain_error(DomainError::ScheduleNotFound {
            schedule_id,
        }));
    }

    let appointments: Vec<Appointment> = persistence
        .list_blocking_appointments(schedule.staff_ids(), date)
        .map_err(translate_persistence_error)?;
    let availability: Vec<StaffAvailability> =
        resolve_availability(&schedule, date, now, config.slot_length, &appointments);

    debug!(
        schedule_id,
        date = %format_date(date),
        staff = availability.len(),
        "Availability resolved"
    );

    Ok(AvailabilityResponse {
        schedule_id,
        date: format_date(date),
        slot_length_minutes: config.slot_length.minutes(),
        staff: availability
            .into_iter()
            .map(|entry| StaffAvailabilityInfo {
                staff_id: entry.staff_id,
                slots: entry
                    .slots
                    .iter()
                    .map(|slot| SlotInfo {
                        start_at: format_wall_clock(slot.start_at),
                        end_at: format_wall_clock(slot.end_at()),
                    })
                    .collect(),
            })
            .collect(),
    })
}

// ========================================================================
// Booking
// ========================================================================

/// Books an appointment.
///
/// The request is validated outside the write lock; the overlap check runs
/// again inside the store's transaction, so of several concurrent requests
/// for the same interval exactly one succeeds.
///
/// # Arguments
///
/// * `persistence` - The persistence layer
/// * `config` - Booking configuration
/// * `request` - The booking request
/// * `authenticated_actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
/// * `now` - Current business-local wall-clock time
/// * `notifiers` - Subscribers to the `Created` event
///
/// # Errors
///
/// Returns an error if:
/// - The client does not exist
/// - The start cannot be parsed
/// - Any booking rule is violated
/// - The interval was taken by another booking (`Conflict`)
pub fn create_booking(
    persistence: &mut Persistence,
    config: &BookingConfig,
    request: &CreateBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    now: PrimitiveDateTime,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    AuthorizationService::authorize_book(authenticated_actor)?;

    let client_exists: bool = persistence
        .client_exists(request.client_id)
        .map_err(translate_persistence_error)?;
    if !client_exists {
        return Err(ApiError::ResourceNotFound {
            resource_type: String::from("Client"),
            message: format!("Client {} does not exist", request.client_id),
        });
    }

    let start_at: PrimitiveDateTime =
        parse_wall_clock(&request.start_at).map_err(|e| ApiError::InvalidInput {
            field: String::from("start_at"),
            message: e.to_string(),
        })?;

    let booking_request = BookingRequest {
        client_id: request.client_id,
        staff_id: request.staff_id,
        schedule_id: request.schedule_id,
        start_at,
        service_ids: request.service_ids.clone(),
    };

    let schedule: Option<ScheduleDefinition> = persistence
        .get_schedule(request.schedule_id)
        .map_err(translate_persistence_error)?;

    let actor: Actor = authenticated_actor.to_audit_actor();
    let prepared: PreparedBooking = prepare_booking(
        persistence,
        schedule.as_ref(),
        &booking_request,
        now,
        config.rules(),
        actor,
        cause,
    )
    .map_err(|e| {
        info!(
            staff_id = request.staff_id,
            schedule_id = request.schedule_id,
            start_at = %request.start_at,
            error = %e,
            "Booking rejected"
        );
        translate_booking_error(e)
    })?;

    let appointment: Appointment = persistence.commit_booking(&prepared).map_err(|e| {
        info!(
            staff_id = request.staff_id,
            start_at = %request.start_at,
            error = %e,
            "Booking rejected at commit"
        );
        translate_persistence_error(e)
    })?;

    notify(notifiers, LifecycleEventKind::Created, &appointment);

    let info: AppointmentInfo = appointment_info(&appointment)?;
    let message: String = format!(
        "Booked staff member {} at {}",
        info.staff_id, info.start_at
    );
    Ok(AppointmentResponse {
        appointment: info,
        message,
    })
}

/// Applies a lifecycle command and commits it.
fn run_command(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    command: Command,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    AuthorizationService::authorize_manage_appointments(authenticated_actor)?;

    let appointment: Appointment = load_appointment(persistence, appointment_id)?;
    let schedule: ScheduleDefinition = load_schedule(persistence, appointment.schedule_id())?;
    let action_name: &'static str = command.action_name();

    let result: TransitionResult = apply(
        &appointment,
        &schedule,
        command,
        config.rules(),
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    let updated: Appointment = persistence
        .commit_transition(&result)
        .map_err(translate_persistence_error)?;

    info!(
        appointment_id,
        action = action_name,
        status = %updated.status(),
        "Appointment updated"
    );

    if let Some(kind) = result.lifecycle_event {
        notify(notifiers, kind, &updated);
    }

    Ok(AppointmentResponse {
        appointment: appointment_info(&updated)?,
        message: format!("Appointment {appointment_id} is now {}", updated.status()),
    })
}

/// Confirms a pending appointment.
///
/// # Errors
///
/// Returns an error if the appointment does not exist, the transition is
/// not allowed, or the store rejects the write.
pub fn confirm_booking(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    run_command(
        persistence,
        config,
        appointment_id,
        Command::Confirm,
        authenticated_actor,
        cause,
        notifiers,
    )
}

/// Marks a confirmed appointment as started.
///
/// # Errors
///
/// Returns an error if the appointment does not exist, the transition is
/// not allowed, or the store rejects the write.
pub fn start_booking(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    run_command(
        persistence,
        config,
        appointment_id,
        Command::Start,
        authenticated_actor,
        cause,
        notifiers,
    )
}

/// Marks an appointment as delivered.
///
/// # Errors
///
/// Returns an error if the appointment does not exist, is already terminal,
/// the completion policy forbids the transition, or the store rejects the
/// write.
pub fn complete_booking(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    run_command(
        persistence,
        config,
        appointment_id,
        Command::Complete,
        authenticated_actor,
        cause,
        notifiers,
    )
}

/// Cancels an appointment, freeing its interval.
///
/// # Errors
///
/// Returns an error if the appointment does not exist, is already terminal,
/// or the store rejects the write.
pub fn cancel_booking(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    request: &CancelBookingRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
    notifiers: &[&dyn LifecycleNotifier],
) -> Result<AppointmentResponse, ApiError> {
    run_command(
        persistence,
        config,
        appointment_id,
        Command::Cancel {
            reason: request.reason.clone(),
        },
        authenticated_actor,
        cause,
        notifiers,
    )
}

/// Attaches services to an open appointment.
///
/// A longer appointment is re-checked against the staff calendar inside the
/// write transaction.
///
/// # Errors
///
/// Returns an error if:
/// - A service is unknown or inactive
/// - Every requested service is already attached
/// - The appointment is no longer `Pending` or `Confirmed`
/// - The longer interval runs past the daily window or overlaps another
///   booking
pub fn add_services(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    request: &ChangeServicesRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AppointmentResponse, ApiError> {
    let lines = resolve_services(persistence, &request.service_ids)
        .map_err(translate_booking_error)?;
    run_command(
        persistence,
        config,
        appointment_id,
        Command::AddServices { lines },
        authenticated_actor,
        cause,
        &[],
    )
}

/// Detaches services from an open appointment.
///
/// # Errors
///
/// Returns an error if none of the services are attached, the appointment
/// is no longer `Pending` or `Confirmed`, or the store rejects the write.
pub fn remove_services(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    request: &ChangeServicesRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<AppointmentResponse, ApiError> {
    run_command(
        persistence,
        config,
        appointment_id,
        Command::RemoveServices {
            service_ids: request.service_ids.clone(),
        },
        authenticated_actor,
        cause,
        &[],
    )
}

// ========================================================================
// Appointment queries and records
// ========================================================================

/// Retrieves one appointment.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the appointment does not exist.
pub fn get_appointment(
    persistence: &mut Persistence,
    appointment_id: i64,
) -> Result<AppointmentInfo, ApiError> {
    let appointment: Appointment = load_appointment(persistence, appointment_id)?;
    appointment_info(&appointment)
}

/// Lists a staff member's appointments on a date, cancelled included.
///
/// # Errors
///
/// Returns an error if the date cannot be parsed or the store cannot be
/// read.
pub fn list_appointments_for_staff(
    persistence: &mut Persistence,
    staff_id: i64,
    date: &str,
) -> Result<ListAppointmentsResponse, ApiError> {
    let date: Date = parse_date_field("date", date)?;
    let appointments: Vec<AppointmentInfo> = persistence
        .list_appointments_for_staff(staff_id, date)
        .map_err(translate_persistence_error)?
        .iter()
        .map(appointment_info)
        .collect::<Result<_, _>>()?;

    Ok(ListAppointmentsResponse {
        staff_id,
        date: format_date(date),
        appointments,
    })
}

/// Returns an appointment's status history, oldest first.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the appointment does not exist.
pub fn get_appointment_history(
    persistence: &mut Persistence,
    appointment_id: i64,
) -> Result<AppointmentHistoryResponse, ApiError> {
    load_appointment(persistence, appointment_id)?;
    let entries: Vec<StatusHistoryInfo> = persistence
        .get_appointment_history(appointment_id)
        .map_err(translate_persistence_error)?
        .iter()
        .map(history_info)
        .collect();

    Ok(AppointmentHistoryResponse {
        appointment_id,
        entries,
    })
}

/// Computes what the actor may currently do with an appointment.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the appointment does not exist.
pub fn get_appointment_capabilities(
    persistence: &mut Persistence,
    config: &BookingConfig,
    appointment_id: i64,
    authenticated_actor: &AuthenticatedActor,
) -> Result<AppointmentCapabilitiesResponse, ApiError> {
    let appointment: Appointment = load_appointment(persistence, appointment_id)?;
    let is_billed: bool = persistence
        .is_billed(appointment_id)
        .map_err(translate_persistence_error)?;

    Ok(AppointmentCapabilitiesResponse {
        appointment_id,
        status: appointment.status().to_string(),
        capabilities: compute_appointment_capabilities(
            authenticated_actor,
            &appointment,
            config.completion_policy,
            is_billed,
        ),
    })
}

/// Physically deletes an appointment.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - The appointment does not exist
/// - A billing record references the appointment
pub fn delete_appointment(
    persistence: &mut Persistence,
    appointment_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<DeleteAppointmentResponse, ApiError> {
    AuthorizationService::authorize_delete_appointment(authenticated_actor)?;

    let appointment: Appointment = load_appointment(persistence, appointment_id)?;
    let audit_event = apply_deletion(&appointment, authenticated_actor.to_audit_actor(), cause)
        .map_err(translate_core_error)?;
    persistence
        .delete_appointment(appointment_id, &audit_event)
        .map_err(translate_persistence_error)?;

    Ok(DeleteAppointmentResponse {
        appointment_id,
        message: format!("Appointment {appointment_id} deleted"),
    })
}

// ========================================================================
// Schedule administration
// ========================================================================

fn change_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
    command: ScheduleCommand,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScheduleDefinition, ApiError> {
    AuthorizationService::authorize_manage_schedules(authenticated_actor)?;

    let current: Option<ScheduleDefinition> = persistence
        .get_schedule(schedule_id)
        .map_err(translate_persistence_error)?;
    let transition = apply_schedule(
        current.as_ref(),
        command,
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;

    persistence
        .persist_schedule_transition(&transition)
        .map_err(translate_persistence_error)
}

/// Defines a recurring schedule.
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not an Admin
/// - A date, time, or weekday cannot be parsed
/// - The definition violates a schedule invariant
pub fn create_schedule(
    persistence: &mut Persistence,
    request: &CreateScheduleRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScheduleResponse, ApiError> {
    AuthorizationService::authorize_manage_schedules(authenticated_actor)?;

    let time_field = |field: &str, value: &str| {
        parse_time_of_day(value).map_err(|e| ApiError::InvalidInput {
            field: String::from(field),
            message: e.to_string(),
        })
    };

    let command = ScheduleCommand::CreateSchedule {
        name: request.name.clone(),
        staff_ids: request.staff_ids.clone(),
        start_date: parse_date_field("start_date", &request.start_date)?,
        end_date: parse_date_field("end_date", &request.end_date)?,
        weekdays: WeekdaySet::parse_names(&request.weekdays).map_err(translate_domain_error)?,
        daily_start: time_field("daily_start", &request.daily_start)?,
        daily_end: time_field("daily_end", &request.daily_end)?,
    };

    let transition = apply_schedule(None, command, authenticated_actor.to_audit_actor(), cause)
        .map_err(translate_core_error)?;
    let schedule: ScheduleDefinition = persistence
        .persist_schedule_transition(&transition)
        .map_err(translate_persistence_error)?;

    let info: ScheduleInfo = schedule_info(&schedule)?;
    let message: String = format!("Created schedule '{}'", info.name);
    Ok(ScheduleResponse {
        schedule: info,
        message,
    })
}

/// Replaces a schedule's staff membership.
///
/// Existing appointments are left untouched.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the schedule does not
/// exist, or the new membership is empty.
pub fn replace_schedule_staff(
    persistence: &mut Persistence,
    schedule_id: i64,
    request: &ReplaceScheduleStaffRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScheduleResponse, ApiError> {
    let schedule: ScheduleDefinition = change_schedule(
        persistence,
        schedule_id,
        ScheduleCommand::ReplaceStaff {
            schedule_id,
            staff_ids: request.staff_ids.clone(),
        },
        authenticated_actor,
        cause,
    )?;
    Ok(ScheduleResponse {
        schedule: schedule_info(&schedule)?,
        message: format!("Replaced staff of schedule {schedule_id}"),
    })
}

/// Stops offering new slots under a schedule.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the schedule does not
/// exist.
pub fn deactivate_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScheduleResponse, ApiError> {
    let schedule: ScheduleDefinition = change_schedule(
        persistence,
        schedule_id,
        ScheduleCommand::Deactivate { schedule_id },
        authenticated_actor,
        cause,
    )?;
    Ok(ScheduleResponse {
        schedule: schedule_info(&schedule)?,
        message: format!("Deactivated schedule {schedule_id}"),
    })
}

/// Resumes offering slots under a schedule.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the schedule does not
/// exist.
pub fn reactivate_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ScheduleResponse, ApiError> {
    let schedule: ScheduleDefinition = change_schedule(
        persistence,
        schedule_id,
        ScheduleCommand::Reactivate { schedule_id },
        authenticated_actor,
        cause,
    )?;
    Ok(ScheduleResponse {
        schedule: schedule_info(&schedule)?,
        message: format!("Reactivated schedule {schedule_id}"),
    })
}

/// Deletes a schedule that no appointment references.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the schedule does not
/// exist, or appointments reference it (deactivate it instead).
pub fn delete_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<DeleteScheduleResponse, ApiError> {
    change_schedule(
        persistence,
        schedule_id,
        ScheduleCommand::Delete { schedule_id },
        authenticated_actor,
        cause,
    )?;
    Ok(DeleteScheduleResponse {
        schedule_id,
        message: format!("Deleted schedule {schedule_id}"),
    })
}

/// Retrieves a schedule, active or not.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the schedule does not exist.
pub fn get_schedule(
    persistence: &mut Persistence,
    schedule_id: i64,
) -> Result<ScheduleInfo, ApiError> {
    let schedule: ScheduleDefinition = load_schedule(persistence, schedule_id)?;
    schedule_info(&schedule)
}

/// Lists every schedule.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_schedules(persistence: &mut Persistence) -> Result<ListSchedulesResponse, ApiError> {
    let schedules: Vec<ScheduleInfo> = persistence
        .list_schedules()
        .map_err(translate_persistence_error)?
        .iter()
        .map(schedule_info)
        .collect::<Result<_, _>>()?;
    Ok(ListSchedulesResponse { schedules })
}

// ========================================================================
// Service catalog and clients
// ========================================================================

/// Adds a service to the catalog.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the name is blank, the
/// duration is zero, or the name is already used.
pub fn register_service(
    persistence: &mut Persistence,
    request: &RegisterServiceRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ServiceResponse, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let transition = apply_catalog(
        None,
        CatalogCommand::RegisterService {
            name: request.name.clone(),
            duration_minutes: request.duration_minutes,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    let service: CatalogService = persistence
        .persist_catalog_transition(&transition)
        .map_err(translate_persistence_error)?;

    let info: ServiceInfo = service_info(&service)?;
    let message: String = format!("Registered service '{}'", info.name);
    Ok(ServiceResponse {
        service: info,
        message,
    })
}

/// Enables or disables booking a service.
///
/// Existing appointments keep their service lines.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the service does not
/// exist.
pub fn set_service_active(
    persistence: &mut Persistence,
    service_id: i64,
    request: &SetServiceActiveRequest,
    authenticated_actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ServiceResponse, ApiError> {
    AuthorizationService::authorize_manage_catalog(authenticated_actor)?;

    let current: Option<CatalogService> = persistence
        .get_service(service_id)
        .map_err(translate_persistence_error)?;
    let transition = apply_catalog(
        current.as_ref(),
        CatalogCommand::SetServiceActive {
            service_id,
            active: request.active,
        },
        authenticated_actor.to_audit_actor(),
        cause,
    )
    .map_err(translate_core_error)?;
    let service: CatalogService = persistence
        .persist_catalog_transition(&transition)
        .map_err(translate_persistence_error)?;

    Ok(ServiceResponse {
        service: service_info(&service)?,
        message: format!(
            "Service {service_id} is now {}",
            if request.active { "active" } else { "inactive" }
        ),
    })
}

/// Lists the service catalog.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
pub fn list_services(persistence: &mut Persistence) -> Result<ListServicesResponse, ApiError> {
    let services: Vec<ServiceInfo> = persistence
        .list_services()
        .map_err(translate_persistence_error)?
        .iter()
        .map(service_info)
        .collect::<Result<_, _>>()?;
    Ok(ListServicesResponse { services })
}

/// Registers a client.
///
/// # Errors
///
/// Returns `InvalidInput` if the display name is blank.
pub fn register_client(
    persistence: &mut Persistence,
    request: &RegisterClientRequest,
    authenticated_actor: &AuthenticatedActor,
) -> Result<ClientResponse, ApiError> {
    AuthorizationService::authorize_register_client(authenticated_actor)?;

    if request.display_name.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("display_name"),
            message: String::from("Client name must not be blank"),
        });
    }

    let client_id: i64 = persistence
        .register_client(&request.display_name)
        .map_err(translate_persistence_error)?;
    get_client(persistence, client_id)
}

/// Retrieves a client.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the client does not exist.
pub fn get_client(
    persistence: &mut Persistence,
    client_id: i64,
) -> Result<ClientResponse, ApiError> {
    let client = persistence
        .get_client(client_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(|| ApiError::ResourceNotFound {
            resource_type: String::from("Client"),
            message: format!("Client {client_id} does not exist"),
        })?;
    Ok(ClientResponse {
        client_id: client.client_id,
        display_name: client.display_name,
        created_at: client.created_at,
    })
}
