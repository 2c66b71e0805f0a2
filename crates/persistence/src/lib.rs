// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the Agenda scheduling core.
//!
//! This crate stores schedule definitions, the service catalog, clients,
//! appointments with their service lines and status history, and the audit
//! trail. It is built on Diesel over `SQLite`.
//!
//! ## Concurrency
//!
//! Availability reads are plain queries. The booking commit and any service
//! change that grows an appointment run in `BEGIN IMMEDIATE` transactions
//! that re-check the staff calendar under the write lock, so of several
//! concurrent requests for the same interval exactly one commits. Lock
//! conflicts are retried a bounded number of times (see
//! `mutations::booking`).
//!
//! Each `Persistence` owns one connection. Concurrent writers use one
//! `Persistence` per thread over the same database file; every connection
//! has a busy timeout so writers queue on the lock rather than fail.
//!
//! ## Testing
//!
//! - `new_in_memory()` gives each test its own shared-cache in-memory
//!   database
//! - Race tests use a temporary database file opened by several
//!   connections

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use agenda::{
    CatalogTransition, ClientDirectory, PreparedBooking, ScheduleTransition, ServiceCatalog,
    StaffDirectory, TransitionResult,
};
use agenda_audit::{AuditEvent, AuditScope};
use agenda_domain::{Appointment, CatalogService, ScheduleDefinition};
use diesel::SqliteConnection;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use tracing::info;

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{ClientData, StatusHistoryEntry};
pub use error::PersistenceError;
pub use mutations::booking::{MAX_TRANSACTION_ATTEMPTS, RETRY_BACKOFF};

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Returns the version of the `SQLite` library linked into this build.
#[must_use]
pub fn sqlite_library_version() -> &'static str {
    backend::sqlite::library_version()
}

/// Persistence adapter over a single `SQLite` connection.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique database instance via atomic counter.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self { conn })
    }

    /// Returns the busy timeout configured on this connection.
    ///
    /// # Errors
    ///
    /// Returns an error if the PRAGMA query fails.
    pub fn busy_timeout_ms(&mut self) -> Result<i32, PersistenceError> {
        backend::sqlite::busy_timeout_ms(&mut self.conn)
    }

    // ====================================================================
    // Clients
    // ====================================================================

    /// Registers a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank or the insert fails.
    pub fn register_client(&mut self, display_name: &str) -> Result<i64, PersistenceError> {
        mutations::clients::register_client(&mut self.conn, display_name)
    }

    /// Retrieves a client.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_client(&mut self, client_id: i64) -> Result<Option<ClientData>, PersistenceError> {
        queries::clients::get_client(&mut self.conn, client_id)
    }

    // ====================================================================
    // Service catalog
    // ====================================================================

    /// Persists a catalog change with its audit event.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn persist_catalog_transition(
        &mut self,
        transition: &CatalogTransition,
    ) -> Result<CatalogService, PersistenceError> {
        mutations::catalog::persist_catalog_transition(&mut self.conn, transition)
    }

    /// Retrieves a catalog service.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_service(
        &mut self,
        service_id: i64,
    ) -> Result<Option<CatalogService>, PersistenceError> {
        queries::catalog::get_service(&mut self.conn, service_id)
    }

    /// Lists every catalog service.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_services(&mut self) -> Result<Vec<CatalogService>, PersistenceError> {
        queries::catalog::list_services(&mut self.conn)
    }

    // ====================================================================
    // Schedules
    // ====================================================================

    /// Persists a schedule change with its audit event.
    ///
    /// # Errors
    ///
    /// Returns `ScheduleReferenced` when deleting a schedule that
    /// appointments point at, or an error if the write fails.
    pub fn persist_schedule_transition(
        &mut self,
        transition: &ScheduleTransition,
    ) -> Result<ScheduleDefinition, PersistenceError> {
        mutations::schedules::persist_schedule_transition(&mut self.conn, transition)
    }

    /// Retrieves a schedule, active or not.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_schedule(
        &mut self,
        schedule_id: i64,
    ) -> Result<Option<ScheduleDefinition>, PersistenceError> {
        queries::schedules::get_schedule(&mut self.conn, schedule_id)
    }

    /// Lists every schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_schedules(&mut self) -> Result<Vec<ScheduleDefinition>, PersistenceError> {
        queries::schedules::list_schedules(&mut self.conn)
    }

    // ====================================================================
    // Appointments
    // ====================================================================

    /// Commits a prepared booking, retrying on lock conflicts.
    ///
    /// # Returns
    ///
    /// The stored `Pending` appointment.
    ///
    /// # Errors
    ///
    /// Returns `BookingConflict` if the interval is taken at commit time, or
    /// `TransactionConflict` once retries are exhausted.
    pub fn commit_booking(
        &mut self,
        prepared: &PreparedBooking,
    ) -> Result<Appointment, PersistenceError> {
        let appointment = mutations::booking::with_transaction_retry(&mut self.conn, |conn| {
            mutations::booking::commit_booking(conn, prepared)
        })?;
        info!(
            appointment_id = appointment.appointment_id(),
            staff_id = appointment.staff_id(),
            "Booking committed"
        );
        Ok(appointment)
    }

    /// Commits a lifecycle transition, retrying on lock conflicts.
    ///
    /// # Errors
    ///
    /// Returns `BookingConflict` if a grown interval collides,
    /// `StaleAppointment` if the row changed since it was read, or
    /// `TransactionConflict` once retries are exhausted.
    pub fn commit_transition(
        &mut self,
        result: &TransitionResult,
    ) -> Result<Appointment, PersistenceError> {
        mutations::booking::with_transaction_retry(&mut self.conn, |conn| {
            mutations::booking::commit_transition(conn, result)
        })
    }

    /// Retrieves an appointment with its service lines.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_appointment(
        &mut self,
        appointment_id: i64,
    ) -> Result<Option<Appointment>, PersistenceError> {
        queries::appointments::get_appointment(&mut self.conn, appointment_id)
    }

    /// Lists a staff member's appointments on a date, cancelled included.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_appointments_for_staff(
        &mut self,
        staff_id: i64,
        date: Date,
    ) -> Result<Vec<Appointment>, PersistenceError> {
        queries::appointments::list_appointments_for_staff(&mut self.conn, staff_id, date)
    }

    /// Lists the non-cancelled appointments of the given staff members on a
    /// date, as consumed by the availability resolver.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_blocking_appointments(
        &mut self,
        staff_ids: &BTreeSet<i64>,
        date: Date,
    ) -> Result<Vec<Appointment>, PersistenceError> {
        let staff_ids: Vec<i64> = staff_ids.iter().copied().collect();
        queries::appointments::list_blocking_appointments(&mut self.conn, &staff_ids, date)
    }

    /// Returns an appointment's status history, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_appointment_history(
        &mut self,
        appointment_id: i64,
    ) -> Result<Vec<StatusHistoryEntry>, PersistenceError> {
        queries::appointments::list_status_history(&mut self.conn, appointment_id)
    }

    /// Deletes an appointment and records the deletion.
    ///
    /// # Errors
    ///
    /// Returns `AppointmentReferenced` if a billing record references it.
    pub fn delete_appointment(
        &mut self,
        appointment_id: i64,
        audit_event: &AuditEvent,
    ) -> Result<(), PersistenceError> {
        self.conn
            .immediate_transaction::<_, PersistenceError, _>(|conn| {
                mutations::appointments::delete_appointment(conn, appointment_id)?;
                mutations::audit::persist_audit_event(
                    conn,
                    audit_event,
                    AuditScope::Appointment(appointment_id),
                )?;
                Ok(())
            })?;
        info!(appointment_id, "Appointment deleted");
        Ok(())
    }

    /// Links an appointment to a billing record.
    ///
    /// # Errors
    ///
    /// Returns an error if the appointment does not exist or the reference
    /// is already used.
    pub fn record_billing_reference(
        &mut self,
        appointment_id: i64,
        billing_reference: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::appointments::insert_billing_link(
            &mut self.conn,
            appointment_id,
            billing_reference,
        )
    }

    /// Returns true if any billing record references the appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_billed(&mut self, appointment_id: i64) -> Result<bool, PersistenceError> {
        Ok(queries::appointments::count_billing_links(&mut self.conn, appointment_id)? > 0)
    }

    // ====================================================================
    // Audit
    // ====================================================================

    /// Retrieves an audit event by id.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no such event exists.
    pub fn get_audit_event(&mut self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        queries::audit::get_audit_event(&mut self.conn, event_id)
    }

    /// Retrieves the audit timeline of a record.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_audit_timeline(
        &mut self,
        scope: AuditScope,
    ) -> Result<Vec<AuditEvent>, PersistenceError> {
        queries::audit::get_audit_timeline(&mut self.conn, scope)
    }
}

impl StaffDirectory for Persistence {
    type Error = PersistenceError;

    fn is_staff_member(&mut self, schedule_id: i64, staff_id: i64) -> Result<bool, Self::Error> {
        queries::schedules::is_staff_member(&mut self.conn, schedule_id, staff_id)
    }

    fn list_staff_for(&mut self, schedule_id: i64) -> Result<BTreeSet<i64>, Self::Error> {
        queries::schedules::list_staff_for(&mut self.conn, schedule_id)
    }
}

impl ServiceCatalog for Persistence {
    type Error = PersistenceError;

    fn resolve_services(&mut self, service_ids: &[i64]) -> Result<Vec<CatalogService>, Self::Error> {
        queries::catalog::resolve_services(&mut self.conn, service_ids)
    }
}

impl ClientDirectory for Persistence {
    type Error = PersistenceError;

    fn client_exists(&mut self, client_id: i64) -> Result<bool, Self::Error> {
        queries::clients::client_exists(&mut self.conn, client_id)
    }
}
