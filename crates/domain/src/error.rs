// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::appointment::AppointmentStatus;
use time::PrimitiveDateTime;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The schedule definition does not exist or is inactive.
    ScheduleNotFound {
        /// The requested schedule identifier.
        schedule_id: i64,
    },
    /// The staff member is not currently assigned to the schedule.
    StaffNotInSchedule {
        /// The schedule identifier.
        schedule_id: i64,
        /// The staff member identifier.
        staff_id: i64,
    },
    /// The requested interval falls outside the schedule window.
    OutsideScheduleWindow {
        /// Which part of the window was violated.
        reason: String,
    },
    /// One or more requested services are unknown or inactive.
    InvalidServices {
        /// The offending service identifiers.
        service_ids: Vec<i64>,
        /// Description of the failure.
        reason: String,
    },
    /// The requested interval overlaps an existing booking.
    SlotUnavailable {
        /// The staff member whose calendar conflicts.
        staff_id: i64,
        /// The requested start.
        start_at: PrimitiveDateTime,
    },
    /// The status transition is not part of the appointment lifecycle.
    InvalidTransition {
        /// The current status.
        from: AppointmentStatus,
        /// The requested status.
        to: AppointmentStatus,
    },
    /// The appointment is completed or cancelled and cannot change.
    AlreadyTerminal {
        /// The terminal status.
        status: AppointmentStatus,
    },
    /// Services can no longer be edited in the appointment's status.
    AppointmentLocked {
        /// The current status.
        status: AppointmentStatus,
    },
    /// A service edit would leave the service set as it was.
    ServicesUnchanged {
        /// The appointment's service ids.
        service_ids: Vec<i64>,
    },
    /// The appointment does not exist.
    AppointmentNotFound {
        /// The requested appointment identifier.
        appointment_id: i64,
    },
    /// The schedule cannot be deleted while appointments reference it.
    ScheduleReferenced {
        /// The schedule identifier.
        schedule_id: i64,
        /// Number of appointments booked under the schedule.
        appointment_count: i64,
    },
    /// Schedule definition fields violate an invariant.
    InvalidSchedule {
        /// Description of the violated invariant.
        reason: String,
    },
    /// Slot length must be a positive number of minutes within one day.
    InvalidSlotLength {
        /// The rejected length.
        minutes: u32,
    },
    /// Weekday name could not be recognised.
    InvalidWeekday(String),
    /// Persisted weekday bitset has bits outside Monday through Sunday.
    InvalidWeekdayBits(i32),
    /// Appointment status string could not be recognised.
    InvalidAppointmentStatus {
        /// The rejected status string.
        status: String,
    },
    /// Catalog service fields violate an invariant.
    InvalidServiceDefinition {
        /// Description of the violated invariant.
        reason: String,
    },
    /// Timezone name is not a known IANA zone.
    InvalidTimezone(String),
    /// Failed to parse a date or time from string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ScheduleNotFound { schedule_id } => {
                write!(f, "Schedule {schedule_id} not found")
            }
            Self::StaffNotInSchedule {
                schedule_id,
                staff_id,
            } => {
                write!(
                    f,
                    "Staff member {staff_id} is not assigned to schedule {schedule_id}"
                )
            }
            Self::OutsideScheduleWindow { reason } => {
                write!(f, "Requested time is outside the schedule window: {reason}")
            }
            Self::InvalidServices {
                service_ids,
                reason,
            } => {
                write!(f, "Invalid services {service_ids:?}: {reason}")
            }
            Self::SlotUnavailable { staff_id, start_at } => {
                write!(
                    f,
                    "This time is no longer available: staff member {staff_id} is booked at {start_at}"
                )
            }
            Self::InvalidTransition { from, to } => {
                write!(f, "Cannot move appointment from {from} to {to}")
            }
            Self::AlreadyTerminal { status } => {
                write!(f, "Appointment is already {status} and cannot change")
            }
            Self::AppointmentLocked { status } => {
                write!(f, "Services cannot be changed while the appointment is {status}")
            }
            Self::ServicesUnchanged { service_ids } => {
                write!(
                    f,
                    "Services already {}; nothing to change",
                    crate::service::join_ids(service_ids)
                )
            }
            Self::AppointmentNotFound { appointment_id } => {
                write!(f, "Appointment {appointment_id} not found")
            }
            Self::ScheduleReferenced {
                schedule_id,
                appointment_count,
            } => {
                write!(
                    f,
                    "Schedule {schedule_id} is referenced by {appointment_count} appointment(s); deactivate it instead"
                )
            }
            Self::InvalidSchedule { reason } => write!(f, "Invalid schedule: {reason}"),
            Self::InvalidSlotLength { minutes } => {
                write!(
                    f,
                    "Invalid slot length: {minutes} minutes. Must be between 1 and 1440"
                )
            }
            Self::InvalidWeekday(name) => write!(f, "Invalid weekday: '{name}'"),
            Self::InvalidWeekdayBits(bits) => write!(f, "Invalid weekday bitset: {bits}"),
            Self::InvalidAppointmentStatus { status } => {
                write!(f, "Invalid appointment status: '{status}'")
            }
            Self::InvalidServiceDefinition { reason } => write!(f, "Invalid service: {reason}"),
            Self::InvalidTimezone(tz) => write!(f, "Invalid timezone: '{tz}'"),
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
