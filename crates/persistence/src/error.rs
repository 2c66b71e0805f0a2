// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda_domain::format_wall_clock;
use time::PrimitiveDateTime;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    MigrationFailed(String),
    /// Query execution failed.
    QueryFailed(String),
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// A stored row could not be turned back into a domain value.
    ReconstructionError(String),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// Initialization error.
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    NotFound(String),
    /// The re-check inside the write transaction found an overlapping
    /// appointment for the staff member.
    BookingConflict {
        staff_id: i64,
        start_at: PrimitiveDateTime,
        conflicting_appointment_id: Option<i64>,
    },
    /// The database stayed locked or the transaction could not be
    /// serialized after every retry.
    TransactionConflict { attempts: u32 },
    /// The appointment changed after it was read.
    StaleAppointment { appointment_id: i64 },
    /// Schedule cannot be deleted because appointments reference it.
    ScheduleReferenced {
        schedule_id: i64,
        appointment_count: i64,
    },
    /// Appointment cannot be deleted because a billing record references it.
    AppointmentReferenced { appointment_id: i64 },
}

impl PersistenceError {
    /// Returns true for lock and serialization failures that may succeed
    /// on retry.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::TransactionConflict { .. })
    }
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::MigrationFailed(msg) => write!(f, "Migration failed: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::EventNotFound(id) => write!(f, "Event not found: {id}"),
            Self::ReconstructionError(msg) => write!(f, "Reconstruction error: {msg}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::ForeignKeyEnforcementNotEnabled => {
                write!(f, "Foreign key enforcement is not enabled")
            }
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::BookingConflict {
                staff_id,
                start_at,
                conflicting_appointment_id,
            } => {
                write!(
                    f,
                    "Staff member {staff_id} is already booked at {}",
                    format_wall_clock(*start_at)
                )?;
                if let Some(id) = conflicting_appointment_id {
                    write!(f, " (appointment {id})")?;
                }
                Ok(())
            }
            Self::TransactionConflict { attempts } => {
                write!(
                    f,
                    "Transaction could not be committed after {attempts} attempts"
                )
            }
            Self::StaleAppointment { appointment_id } => {
                write!(
                    f,
                    "Appointment {appointment_id} was changed by another request"
                )
            }
            Self::ScheduleReferenced {
                schedule_id,
                appointment_count,
            } => {
                write!(
                    f,
                    "Schedule {schedule_id} cannot be deleted: referenced by {appointment_count} appointment(s)"
                )
            }
            Self::AppointmentReferenced { appointment_id } => {
                write!(
                    f,
                    "Appointment {appointment_id} cannot be deleted: referenced by a billing record"
                )
            }
        }
    }
}

impl std::error::Error for PersistenceError {}

/// Returns true if the driver message describes a busy or locked database.
fn is_lock_message(message: &str) -> bool {
    let lowered = message.to_ascii_lowercase();
    lowered.contains("database is locked") || lowered.contains("database is busy")
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        use diesel::result::{DatabaseErrorKind, Error};

        match err {
            Error::NotFound => Self::NotFound("Record not found".to_string()),
            Error::DatabaseError(DatabaseErrorKind::SerializationFailure, _) => {
                Self::TransactionConflict { attempts: 1 }
            }
            Error::DatabaseError(_, ref info) if is_lock_message(info.message()) => {
                Self::TransactionConflict { attempts: 1 }
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
