// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment queries.
//!
//! Appointments are stored with their `start_date` alongside the full
//! `start_at` so that the per-staff, per-day lookups used by availability
//! and by the booking re-check hit the `(staff_id, start_date)` index.

use agenda_domain::{
    Appointment, AppointmentService, AppointmentStatus, format_date, parse_wall_clock,
};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeMap;
use time::Date;

use crate::data_models::StatusHistoryEntry;
use crate::diesel_schema::{
    appointment_services, appointment_status_history, appointments, billing_links,
};
use crate::error::PersistenceError;
use crate::queries::{reconstruction, stored_u32};

#[derive(Queryable, Selectable)]
#[diesel(table_name = appointments)]
struct AppointmentRow {
    appointment_id: i64,
    client_id: i64,
    staff_id: i64,
    schedule_id: i64,
    start_at: String,
    duration_minutes: i32,
    status: String,
    cancel_reason: Option<String>,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = appointment_status_history)]
struct HistoryRow {
    history_id: i64,
    appointment_id: i64,
    audit_event_id: i64,
    previous_status: Option<String>,
    new_status: String,
    transitioned_at: String,
    notes: Option<String>,
}

/// Loads the service lines of the given appointments, in booking order.
fn load_service_lines(
    conn: &mut SqliteConnection,
    appointment_ids: &[i64],
) -> Result<BTreeMap<i64, Vec<AppointmentService>>, PersistenceError> {
    let rows: Vec<(i64, i64, i32)> = appointment_services::table
        .filter(appointment_services::appointment_id.eq_any(appointment_ids))
        .order((
            appointment_services::appointment_id.asc(),
            appointment_services::position.asc(),
        ))
        .select((
            appointment_services::appointment_id,
            appointment_services::service_id,
            appointment_services::duration_minutes,
        ))
        .load(conn)?;

    let mut lines: BTreeMap<i64, Vec<AppointmentService>> = BTreeMap::new();
    for (appointment_id, service_id, duration) in rows {
        lines
            .entry(appointment_id)
            .or_default()
            .push(AppointmentService {
                service_id,
                duration_minutes: stored_u32(duration, "appointment_services.duration_minutes")?,
            });
    }
    Ok(lines)
}

fn assemble(
    conn: &mut SqliteConnection,
    rows: Vec<AppointmentRow>,
) -> Result<Vec<Appointment>, PersistenceError> {
    let ids: Vec<i64> = rows.iter().map(|row| row.appointment_id).collect();
    let mut lines = load_service_lines(conn, &ids)?;

    rows.into_iter()
        .map(|row| {
            let status = row.status.parse::<AppointmentStatus>()
                .map_err(reconstruction("appointment status"))?;
            let start_at =
                parse_wall_clock(&row.start_at).map_err(reconstruction("appointment start"))?;
            Ok(Appointment::restore(
                row.appointment_id,
                row.client_id,
                row.staff_id,
                row.schedule_id,
                start_at,
                stored_u32(row.duration_minutes, "appointments.duration_minutes")?,
                status,
                lines.remove(&row.appointment_id).unwrap_or_default(),
                row.cancel_reason,
            ))
        })
        .collect()
}

/// Retrieves an appointment with its service lines.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn get_appointment(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Option<Appointment>, PersistenceError> {
    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::appointment_id.eq(appointment_id))
        .select(AppointmentRow::as_select())
        .load(conn)?;
    Ok(assemble(conn, rows)?.into_iter().next())
}

/// Lists every appointment of a staff member on a date, in start order.
///
/// Cancelled appointments are included.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_appointments_for_staff(
    conn: &mut SqliteConnection,
    staff_id: i64,
    date: Date,
) -> Result<Vec<Appointment>, PersistenceError> {
    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::staff_id.eq(staff_id))
        .filter(appointments::start_date.eq(format_date(date)))
        .order((appointments::start_at.asc(), appointments::appointment_id.asc()))
        .select(AppointmentRow::as_select())
        .load(conn)?;
    assemble(conn, rows)
}

/// Lists the appointments that occupy the calendars of the given staff
/// members on a date. Cancelled appointments are left out.
///
/// Appointments cannot span midnight (they must end by the daily window
/// end), so a same-day lookup sees every possible overlap.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_blocking_appointments(
    conn: &mut SqliteConnection,
    staff_ids: &[i64],
    date: Date,
) -> Result<Vec<Appointment>, PersistenceError> {
    let rows: Vec<AppointmentRow> = appointments::table
        .filter(appointments::staff_id.eq_any(staff_ids))
        .filter(appointments::start_date.eq(format_date(date)))
        .filter(appointments::status.ne(AppointmentStatus::Cancelled.as_str()))
        .order((appointments::start_at.asc(), appointments::appointment_id.asc()))
        .select(AppointmentRow::as_select())
        .load(conn)?;
    assemble(conn, rows)
}

/// Returns the status history of an appointment, oldest first.
///
/// # Errors
///
/// Returns an error if the query fails or a stored status is invalid.
pub fn list_status_history(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<Vec<StatusHistoryEntry>, PersistenceError> {
    let rows: Vec<HistoryRow> = appointment_status_history::table
        .filter(appointment_status_history::appointment_id.eq(appointment_id))
        .order(appointment_status_history::history_id.asc())
        .select(HistoryRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let previous_status = row
                .previous_status
                .as_deref()
                .map(str::parse::<AppointmentStatus>)
                .transpose()
                .map_err(reconstruction("history previous status"))?;
            let new_status = row.new_status.parse::<AppointmentStatus>()
                .map_err(reconstruction("history new status"))?;
            Ok(StatusHistoryEntry {
                history_id: row.history_id,
                appointment_id: row.appointment_id,
                audit_event_id: row.audit_event_id,
                previous_status,
                new_status,
                transitioned_at: row.transitioned_at,
                notes: row.notes,
            })
        })
        .collect()
}

/// Counts billing records that reference an appointment.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_billing_links(
    conn: &mut SqliteConnection,
    appointment_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(billing_links::table
        .filter(billing_links::appointment_id.eq(appointment_id))
        .count()
        .get_result(conn)?)
}
