// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use agenda::{BookingError, CoreError};
use agenda_domain::DomainError;
use agenda_persistence::PersistenceError;

/// Message shown to callers whenever a requested interval was taken first.
pub const SLOT_TAKEN_MESSAGE: &str = "This time is no longer available, please pick another";

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// The request lost a race against another write. Retrying with a
    /// different choice may succeed.
    Conflict {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::Conflict { rule, message } => {
                write!(f, "Conflict ({rule}): {message}")
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    let message: String = err.to_string();
    match err {
        DomainError::ScheduleNotFound { schedule_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Schedule"),
            message: format!("Schedule {schedule_id} does not exist or is inactive"),
        },
        DomainError::AppointmentNotFound { appointment_id } => ApiError::ResourceNotFound {
            resource_type: String::from("Appointment"),
            message: format!("Appointment {appointment_id} does not exist"),
        },
        DomainError::StaffNotInSchedule { .. } => ApiError::DomainRuleViolation {
            rule: String::from("staff_in_schedule"),
            message,
        },
        DomainError::OutsideScheduleWindow { .. } => ApiError::DomainRuleViolation {
            rule: String::from("schedule_window"),
            message,
        },
        DomainError::InvalidServices { .. } => ApiError::DomainRuleViolation {
            rule: String::from("active_services"),
            message,
        },
        DomainError::SlotUnavailable { .. } => ApiError::Conflict {
            rule: String::from("slot_available"),
            message: String::from(SLOT_TAKEN_MESSAGE),
        },
        DomainError::InvalidTransition { .. } => ApiError::DomainRuleViolation {
            rule: String::from("status_transition"),
            message,
        },
        DomainError::AlreadyTerminal { .. } => ApiError::DomainRuleViolation {
            rule: String::from("terminal_status"),
            message,
        },
        DomainError::AppointmentLocked { .. } => ApiError::DomainRuleViolation {
            rule: String::from("services_editable"),
            message,
        },
        DomainError::ServicesUnchanged { .. } => ApiError::DomainRuleViolation {
            rule: String::from("services_changed"),
            message,
        },
        DomainError::ScheduleReferenced { .. } => ApiError::DomainRuleViolation {
            rule: String::from("schedule_unreferenced"),
            message,
        },
        DomainError::InvalidSchedule { reason } => ApiError::InvalidInput {
            field: String::from("schedule"),
            message: reason,
        },
        DomainError::InvalidSlotLength { .. } => ApiError::InvalidInput {
            field: String::from("slot_length"),
            message,
        },
        DomainError::InvalidWeekday(_) | DomainError::InvalidWeekdayBits(_) => {
            ApiError::InvalidInput {
                field: String::from("weekdays"),
                message,
            }
        }
        DomainError::InvalidAppointmentStatus { .. } => ApiError::InvalidInput {
            field: String::from("status"),
            message,
        },
        DomainError::InvalidServiceDefinition { reason } => ApiError::InvalidInput {
            field: String::from("service"),
            message: reason,
        },
        DomainError::InvalidTimezone(_) => ApiError::InvalidInput {
            field: String::from("timezone"),
            message,
        },
        DomainError::DateParseError { .. } => ApiError::InvalidInput {
            field: String::from("date"),
            message,
        },
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Translates a persistence error into an API error.
///
/// Lost races surface as `Conflict`; everything the caller cannot act on
/// becomes `Internal`.
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::BookingConflict { .. } | PersistenceError::TransactionConflict { .. } => {
            ApiError::Conflict {
                rule: String::from("slot_available"),
                message: String::from(SLOT_TAKEN_MESSAGE),
            }
        }
        PersistenceError::StaleAppointment { appointment_id } => ApiError::Conflict {
            rule: String::from("appointment_current"),
            message: format!(
                "Appointment {appointment_id} was changed by another request, reload and retry"
            ),
        },
        PersistenceError::ScheduleReferenced {
            schedule_id,
            appointment_count,
        } => translate_domain_error(DomainError::ScheduleReferenced {
            schedule_id,
            appointment_count,
        }),
        PersistenceError::AppointmentReferenced { appointment_id } => {
            ApiError::DomainRuleViolation {
                rule: String::from("appointment_unbilled"),
                message: format!(
                    "Appointment {appointment_id} is referenced by a billing record and cannot be deleted"
                ),
            }
        }
        PersistenceError::NotFound(msg) => ApiError::ResourceNotFound {
            resource_type: String::from("Record"),
            message: msg,
        },
        PersistenceError::EventNotFound(id) => ApiError::ResourceNotFound {
            resource_type: String::from("Audit event"),
            message: format!("Audit event {id} does not exist"),
        },
        other => ApiError::Internal {
            message: other.to_string(),
        },
    }
}

/// Translates a booking preparation failure into an API error.
#[must_use]
pub fn translate_booking_error(err: BookingError<PersistenceError>) -> ApiError {
    match err {
        BookingError::Rejected(core_err) => translate_core_error(core_err),
        BookingError::Lookup(persistence_err) => translate_persistence_error(persistence_err),
    }
}
