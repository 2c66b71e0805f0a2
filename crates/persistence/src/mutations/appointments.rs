// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment row mutations.
//!
//! None of these open a transaction. They are composed by `booking` and by
//! the persistence adapter inside one.

use agenda_domain::{
    Appointment, AppointmentService, AppointmentStatus, format_date, format_wall_clock,
};
use diesel::SqliteConnection;
use diesel::dsl::sql;
use diesel::prelude::*;
use diesel::sql_types::Text;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{appointment_services, appointment_status_history, appointments, billing_links};
use crate::error::PersistenceError;
use crate::mutations::column_i32;
use crate::queries::appointments::count_billing_links;

/// Replaces an appointment's service lines, keeping their order.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn replace_service_lines(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    services: &[AppointmentService],
) -> Result<(), PersistenceError> {
    diesel::delete(
        appointment_services::table.filter(appointment_services::appointment_id.eq(appointment_id)),
    )
    .execute(conn)?;

    if services.is_empty() {
        return Ok(());
    }

    let mut rows = Vec::with_capacity(services.len());
    for (position, line) in services.iter().enumerate() {
        let position = i32::try_from(position).map_err(|_| {
            PersistenceError::QueryFailed(String::from("too many service lines"))
        })?;
        rows.push((
            appointment_services::appointment_id.eq(appointment_id),
            appointment_services::position.eq(position),
            appointment_services::service_id.eq(line.service_id),
            appointment_services::duration_minutes.eq(column_i32(
                line.duration_minutes,
                "appointment_services.duration_minutes",
            )?),
        ));
    }
    diesel::insert_into(appointment_services::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

/// Inserts a new appointment with its service lines.
///
/// # Returns
///
/// The appointment ID assigned by the database.
///
/// # Errors
///
/// Returns an error if the write fails (including foreign key violations
/// for unknown clients, schedules, or services).
pub fn insert_appointment(
    conn: &mut SqliteConnection,
    appointment: &Appointment,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(appointments::table)
        .values((
            appointments::client_id.eq(appointment.client_id()),
            appointments::staff_id.eq(appointment.staff_id()),
            appointments::schedule_id.eq(appointment.schedule_id()),
            appointments::start_date.eq(format_date(appointment.start_at().date())),
            appointments::start_at.eq(format_wall_clock(appointment.start_at())),
            appointments::duration_minutes.eq(column_i32(
                appointment.duration_minutes(),
                "appointments.duration_minutes",
            )?),
            appointments::status.eq(appointment.status().as_str()),
            appointments::cancel_reason.eq(appointment.cancel_reason()),
        ))
        .execute(conn)?;

    let appointment_id: i64 = conn.get_last_insert_rowid()?;
    replace_service_lines(conn, appointment_id, appointment.services())?;
    Ok(appointment_id)
}

/// Writes the mutable fields of an appointment, guarded by the status and
/// duration it had when it was read.
///
/// # Errors
///
/// Returns `PersistenceError::StaleAppointment` if the stored row no longer
/// matches the expected status and duration.
pub fn update_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    appointment: &Appointment,
    expected_status: AppointmentStatus,
    expected_duration_minutes: u32,
) -> Result<(), PersistenceError> {
    let rows = diesel::update(
        appointments::table
            .filter(appointments::appointment_id.eq(appointment_id))
            .filter(appointments::status.eq(expected_status.as_str()))
            .filter(appointments::duration_minutes.eq(column_i32(
                expected_duration_minutes,
                "appointments.duration_minutes",
            )?)),
    )
    .set((
        appointments::status.eq(appointment.status().as_str()),
        appointments::duration_minutes.eq(column_i32(
            appointment.duration_minutes(),
            "appointments.duration_minutes",
        )?),
        appointments::cancel_reason.eq(appointment.cancel_reason()),
        appointments::updated_at.eq(sql::<Text>("CURRENT_TIMESTAMP")),
    ))
    .execute(conn)?;

    if rows == 0 {
        return Err(PersistenceError::StaleAppointment { appointment_id });
    }
    Ok(())
}

/// Records one status transition.
///
/// # Errors
///
/// Returns an error if the write fails.
pub fn insert_status_history(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    audit_event_id: i64,
    previous_status: Option<AppointmentStatus>,
    new_status: AppointmentStatus,
    notes: Option<&str>,
) -> Result<(), PersistenceError> {
    diesel::insert_into(appointment_status_history::table)
        .values((
            appointment_status_history::appointment_id.eq(appointment_id),
            appointment_status_history::audit_event_id.eq(audit_event_id),
            appointment_status_history::previous_status
                .eq(previous_status.map(|status| status.as_str())),
            appointment_status_history::new_status.eq(new_status.as_str()),
            appointment_status_history::notes.eq(notes),
        ))
        .execute(conn)?;
    Ok(())
}

/// Physically deletes an appointment, its service lines, and its status
/// history.
///
/// # Errors
///
/// Returns `PersistenceError::AppointmentReferenced` if a billing record
/// references the appointment, or `NotFound` if it does not exist.
pub fn delete_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<(), PersistenceError> {
    if count_billing_links(conn, appointment_id)? > 0 {
        return Err(PersistenceError::AppointmentReferenced { appointment_id });
    }
    let rows = diesel::delete(
        appointments::table.filter(appointments::appointment_id.eq(appointment_id)),
    )
    .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!(
            "appointment {appointment_id}"
        )));
    }
    Ok(())
}

/// Links an appointment to a billing record of the sales module.
///
/// # Errors
///
/// Returns an error if the appointment does not exist or the reference is
/// already in use.
pub fn insert_billing_link(
    conn: &mut SqliteConnection,
    appointment_id: i64,
    billing_reference: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(billing_links::table)
        .values((
            billing_links::appointment_id.eq(appointment_id),
            billing_links::billing_reference.eq(billing_reference),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
