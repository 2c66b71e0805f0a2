// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda_domain::{AppointmentService, WeekdaySet};
use time::{Date, Time};

/// A command against an existing appointment.
///
/// Commands are the only way to request appointment state changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Confirm a pending appointment.
    Confirm,
    /// Mark a confirmed appointment as started.
    Start,
    /// Mark the appointment as delivered.
    Complete,
    /// Cancel the appointment.
    Cancel {
        /// Optional free-text reason.
        reason: Option<String>,
    },
    /// Attach services; ids already attached are ignored.
    AddServices {
        /// Resolved, active service lines.
        lines: Vec<AppointmentService>,
    },
    /// Detach services by id.
    RemoveServices {
        /// Ids to detach.
        service_ids: Vec<i64>,
    },
}

impl Command {
    /// Returns the audit action name for this command.
    #[must_use]
    pub const fn action_name(&self) -> &'static str {
        match self {
            Self::Confirm => "ConfirmBooking",
            Self::Start => "StartBooking",
            Self::Complete => "CompleteBooking",
            Self::Cancel { .. } => "CancelBooking",
            Self::AddServices { .. } => "AddServices",
            Self::RemoveServices { .. } => "RemoveServices",
        }
    }
}

/// A command against the schedule definition store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleCommand {
    /// Define a new recurring schedule.
    CreateSchedule {
        /// Administrator-facing label.
        name: String,
        /// Staff bookable under the schedule.
        staff_ids: Vec<i64>,
        /// First applicable date.
        start_date: Date,
        /// Last applicable date.
        end_date: Date,
        /// Applicable weekdays.
        weekdays: WeekdaySet,
        /// Start of the daily window.
        daily_start: Time,
        /// End of the daily window.
        daily_end: Time,
    },
    /// Replace the staff membership.
    ReplaceStaff {
        /// The schedule to change.
        schedule_id: i64,
        /// The new membership.
        staff_ids: Vec<i64>,
    },
    /// Stop offering new slots under the schedule.
    Deactivate {
        /// The schedule to deactivate.
        schedule_id: i64,
    },
    /// Resume offering slots under the schedule.
    Reactivate {
        /// The schedule to reactivate.
        schedule_id: i64,
    },
    /// Remove a schedule that no appointment references.
    Delete {
        /// The schedule to delete.
        schedule_id: i64,
    },
}

impl ScheduleCommand {
    /// Returns the target schedule id, if the command addresses one.
    #[must_use]
    pub const fn schedule_id(&self) -> Option<i64> {
        match self {
            Self::CreateSchedule { .. } => None,
            Self::ReplaceStaff { schedule_id, .. }
            | Self::Deactivate { schedule_id }
            | Self::Reactivate { schedule_id }
            | Self::Delete { schedule_id } => Some(*schedule_id),
        }
    }
}

/// A command against the service catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogCommand {
    /// Add a service to the catalog.
    RegisterService {
        /// Display name.
        name: String,
        /// Default duration in minutes.
        duration_minutes: u32,
    },
    /// Enable or disable booking a service.
    SetServiceActive {
        /// The service to change.
        service_id: i64,
        /// New active flag.
        active: bool,
    },
}
