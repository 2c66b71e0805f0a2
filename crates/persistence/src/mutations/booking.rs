// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Transactional booking commits.
//!
//! Both commits run inside `BEGIN IMMEDIATE`, which takes the database write
//! lock before the conflict re-check reads the staff calendar. Two writers
//! can therefore never both see a free interval and both insert into it.
//!
//! Lock and serialization failures are retried a bounded number of times
//! with a linear backoff. Business-rule failures are never retried.

use agenda::{PreparedBooking, TransitionResult};
use agenda_audit::AuditScope;
use agenda_domain::{Appointment, AppointmentStatus, find_conflict};
use diesel::SqliteConnection;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

use crate::error::PersistenceError;
use crate::mutations::appointments::{
    insert_appointment, insert_status_history, replace_service_lines, update_appointment,
};
use crate::mutations::audit::persist_audit_event;
use crate::queries::appointments::list_blocking_appointments;

/// Maximum attempts for a write transaction that hits a lock conflict.
pub const MAX_TRANSACTION_ATTEMPTS: u32 = 3;

/// Backoff step between attempts; attempt `n` waits `n` steps.
pub const RETRY_BACKOFF: Duration = Duration::from_millis(25);

/// Runs `operation` until it succeeds, fails with a non-transient error, or
/// exhausts `MAX_TRANSACTION_ATTEMPTS`.
///
/// # Errors
///
/// Returns the operation's error, or `TransactionConflict` carrying the
/// attempt count once retries are exhausted.
pub fn with_transaction_retry<T, F>(
    conn: &mut SqliteConnection,
    mut operation: F,
) -> Result<T, PersistenceError>
where
    F: FnMut(&mut SqliteConnection) -> Result<T, PersistenceError>,
{
    let mut attempt: u32 = 1;
    loop {
        match operation(conn) {
            Err(e) if e.is_transient() => {
                if attempt >= MAX_TRANSACTION_ATTEMPTS {
                    warn!(attempt, "Write transaction gave up after lock conflicts");
                    return Err(PersistenceError::TransactionConflict { attempts: attempt });
                }
                warn!(attempt, error = %e, "Write transaction conflicted, retrying");
                thread::sleep(RETRY_BACKOFF * attempt);
                attempt += 1;
            }
            other => return other,
        }
    }
}

/// Re-checks the staff calendar under the write lock.
fn ensure_interval_free(
    conn: &mut SqliteConnection,
    appointment: &Appointment,
    exclude: Option<i64>,
) -> Result<(), PersistenceError> {
    let existing: Vec<Appointment> = list_blocking_appointments(
        conn,
        &[appointment.staff_id()],
        appointment.start_at().date(),
    )?;

    if let Some(conflict) = find_conflict(
        appointment.staff_id(),
        appointment.start_at(),
        appointment.duration_minutes(),
        &existing,
        exclude,
    ) {
        debug!(
            staff_id = appointment.staff_id(),
            conflicting_appointment_id = conflict.appointment_id(),
            "Interval taken at commit time"
        );
        return Err(PersistenceError::BookingConflict {
            staff_id: appointment.staff_id(),
            start_at: appointment.start_at(),
            conflicting_appointment_id: conflict.appointment_id(),
        });
    }
    Ok(())
}

/// Commits a prepared booking in one immediate transaction.
///
/// # Returns
///
/// The stored `Pending` appointment, carrying its id.
///
/// # Errors
///
/// Returns `BookingConflict` if the interval was taken, a transient
/// `TransactionConflict` if the lock could not be acquired, or a database
/// error.
pub fn commit_booking(
    conn: &mut SqliteConnection,
    prepared: &PreparedBooking,
) -> Result<Appointment, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let appointment: &Appointment = &prepared.appointment;
        ensure_interval_free(conn, appointment, None)?;

        let appointment_id: i64 = insert_appointment(conn, appointment)?;
        let event_id: i64 = persist_audit_event(
            conn,
            &prepared.audit_event,
            AuditScope::Appointment(appointment_id),
        )?;
        insert_status_history(
            conn,
            appointment_id,
            event_id,
            None,
            AppointmentStatus::Pending,
            None,
        )?;

        Ok(appointment.clone().with_appointment_id(appointment_id))
    })
}

/// Commits a lifecycle transition in one immediate transaction.
///
/// When the interval grew, the new interval is re-checked against the staff
/// calendar first, ignoring the appointment itself. The row update is
/// guarded by the status and duration it was read with.
///
/// # Returns
///
/// The stored appointment.
///
/// # Errors
///
/// Returns `BookingConflict`, `StaleAppointment`, a transient
/// `TransactionConflict`, or a database error.
pub fn commit_transition(
    conn: &mut SqliteConnection,
    result: &TransitionResult,
) -> Result<Appointment, PersistenceError> {
    let updated: &Appointment = &result.new_appointment;
    let appointment_id: i64 = updated.appointment_id().ok_or_else(|| {
        PersistenceError::QueryFailed(String::from("appointment has not been persisted"))
    })?;

    conn.immediate_transaction(|conn| {
        if result.interval_grew() {
            ensure_interval_free(conn, updated, Some(appointment_id))?;
        }

        update_appointment(
            conn,
            appointment_id,
            updated,
            result.previous_status,
            result.previous_duration_minutes,
        )?;

        let status_changed: bool = result.previous_status != updated.status();
        if !status_changed {
            replace_service_lines(conn, appointment_id, updated.services())?;
        }

        let event_id: i64 = persist_audit_event(
            conn,
            &result.audit_event,
            AuditScope::Appointment(appointment_id),
        )?;

        if status_changed {
            insert_status_history(
                conn,
                appointment_id,
                event_id,
                Some(result.previous_status),
                updated.status(),
                updated.cancel_reason(),
            )?;
        }

        Ok(updated.clone())
    })
}
