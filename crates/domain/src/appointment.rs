// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment status lifecycle and service association.
//!
//! ```text
//! Pending ──► Confirmed ──► InProgress ──► Completed
//!    │            │  └──────(policy)────────►▲
//!    └────────────┴──────────────┴─────────► Cancelled
//! ```
//!
//! `Completed` and `Cancelled` are terminal. Services may only be edited
//! while the appointment is `Pending` or `Confirmed`.

use crate::error::DomainError;
use crate::interval::end_of;
use crate::service::AppointmentService;
use crate::slot::SlotLength;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::PrimitiveDateTime;

/// Appointment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation
    Pending,
    /// Confirmed with the client
    Confirmed,
    /// Service is being delivered
    InProgress,
    /// Service delivered
    Completed,
    /// Called off; frees the slot
    Cancelled,
}

impl AppointmentStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::InProgress,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Returns the string representation of the status.
    ///
    /// This is used for persistence and API serialization.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parses a status from its string representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidAppointmentStatus` if the string is not a
    /// valid status.
    fn parse_str(s: &str) -> Result<Self, DomainError> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(DomainError::InvalidAppointmentStatus {
                status: s.to_string(),
            }),
        }
    }

    /// Returns true if this status is terminal (cannot transition to another state).
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Returns true if an appointment in this status occupies its interval on
    /// the staff calendar.
    #[must_use]
    pub const fn blocks_calendar(&self) -> bool {
        !matches!(self, Self::Cancelled)
    }

    /// Returns true if services may be added or removed in this status.
    #[must_use]
    pub const fn allows_service_changes(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }

    /// Returns the statuses reachable in one step under `policy`.
    #[must_use]
    pub fn valid_transitions(&self, policy: CompletionPolicy) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|to| self.permits(*to, policy))
            .collect()
    }

    /// Validates if a transition from this status to another is permitted.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyTerminal` when cancelling a terminal
    /// status, or `DomainError::InvalidTransition` for any other move the
    /// lifecycle has no edge for.
    pub fn validate_transition(
        &self,
        new_status: Self,
        policy: CompletionPolicy,
    ) -> Result<(), DomainError> {
        if self.is_terminal() && new_status == Self::Cancelled {
            return Err(DomainError::AlreadyTerminal { status: *self });
        }
        if self.permits(new_status, policy) {
            Ok(())
        } else {
            Err(DomainError::InvalidTransition {
                from: *self,
                to: new_status,
            })
        }
    }

    const fn permits(&self, to: Self, policy: CompletionPolicy) -> bool {
        match self {
            Self::Pending => matches!(to, Self::Confirmed | Self::Cancelled),
            Self::Confirmed => match to {
                Self::InProgress | Self::Cancelled => true,
                Self::Completed => matches!(policy, CompletionPolicy::AllowFromConfirmed),
                Self::Pending | Self::Confirmed => false,
            },
            Self::InProgress => matches!(to, Self::Completed | Self::Cancelled),
            Self::Completed | Self::Cancelled => false,
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether an appointment may be completed straight from `Confirmed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompletionPolicy {
    /// Completion requires the appointment to be `InProgress`.
    RequireInProgress,
    /// Completion is also allowed from `Confirmed`.
    #[default]
    AllowFromConfirmed,
}

/// A booked appointment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Appointment {
    appointment_id: Option<i64>,
    client_id: i64,
    staff_id: i64,
    schedule_id: i64,
    start_at: PrimitiveDateTime,
    duration_minutes: u32,
    status: AppointmentStatus,
    services: Vec<AppointmentService>,
    cancel_reason: Option<String>,
}

impl Appointment {
    /// Creates a new `Pending` appointment.
    ///
    /// Duplicate service lines collapse to their first occurrence. The
    /// duration is the sum of the service durations, and never less than
    /// `minimum`.
    #[must_use]
    pub fn new(
        client_id: i64,
        staff_id: i64,
        schedule_id: i64,
        start_at: PrimitiveDateTime,
        services: Vec<AppointmentService>,
        minimum: SlotLength,
    ) -> Self {
        let services = dedup_lines(services);
        let duration_minutes = total_duration(&services, minimum);
        Self {
            appointment_id: None,
            client_id,
            staff_id,
            schedule_id,
            start_at,
            duration_minutes,
            status: AppointmentStatus::Pending,
            services,
            cancel_reason: None,
        }
    }

    /// Rebuilds a stored appointment without re-deriving its duration.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn restore(
        appointment_id: i64,
        client_id: i64,
        staff_id: i64,
        schedule_id: i64,
        start_at: PrimitiveDateTime,
        duration_minutes: u32,
        status: AppointmentStatus,
        services: Vec<AppointmentService>,
        cancel_reason: Option<String>,
    ) -> Self {
        Self {
            appointment_id: Some(appointment_id),
            client_id,
            staff_id,
            schedule_id,
            start_at,
            duration_minutes,
            status,
            services,
            cancel_reason,
        }
    }

    #[must_use]
    pub const fn with_appointment_id(mut self, appointment_id: i64) -> Self {
        self.appointment_id = Some(appointment_id);
        self
    }

    #[must_use]
    pub const fn appointment_id(&self) -> Option<i64> {
        self.appointment_id
    }

    #[must_use]
    pub const fn client_id(&self) -> i64 {
        self.client_id
    }

    #[must_use]
    pub const fn staff_id(&self) -> i64 {
        self.staff_id
    }

    #[must_use]
    pub const fn schedule_id(&self) -> i64 {
        self.schedule_id
    }

    #[must_use]
    pub const fn start_at(&self) -> PrimitiveDateTime {
        self.start_at
    }

    /// Exclusive end of the booked interval.
    #[must_use]
    pub fn end_at(&self) -> PrimitiveDateTime {
        end_of(self.start_at, self.duration_minutes)
    }

    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub const fn status(&self) -> AppointmentStatus {
        self.status
    }

    #[must_use]
    pub fn services(&self) -> &[AppointmentService] {
        &self.services
    }

    #[must_use]
    pub fn service_ids(&self) -> Vec<i64> {
        self.services.iter().map(|line| line.service_id).collect()
    }

    #[must_use]
    pub fn cancel_reason(&self) -> Option<&str> {
        self.cancel_reason.as_deref()
    }

    /// Moves the appointment to `new_status`.
    ///
    /// # Returns
    ///
    /// The status before the transition.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyTerminal` when cancelling a terminal
    /// appointment, or `DomainError::InvalidTransition` if the lifecycle
    /// forbids any other move.
    pub fn transition_to(
        &mut self,
        new_status: AppointmentStatus,
        policy: CompletionPolicy,
    ) -> Result<AppointmentStatus, DomainError> {
        self.status.validate_transition(new_status, policy)?;
        let previous = self.status;
        self.status = new_status;
        Ok(previous)
    }

    /// Cancels the appointment from any non-terminal status.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AlreadyTerminal` if the appointment is completed
    /// or already cancelled.
    pub fn cancel(&mut self, reason: Option<&str>) -> Result<AppointmentStatus, DomainError> {
        let previous = self.transition_to(
            AppointmentStatus::Cancelled,
            CompletionPolicy::AllowFromConfirmed,
        )?;
        self.cancel_reason = reason
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(str::to_string);
        Ok(previous)
    }

    /// Adds service lines and recomputes the duration.
    ///
    /// Lines already on the appointment are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the service set changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AppointmentLocked` unless the appointment is
    /// `Pending` or `Confirmed`.
    pub fn add_services(
        &mut self,
        lines: &[AppointmentService],
        minimum: SlotLength,
    ) -> Result<bool, DomainError> {
        self.ensure_editable()?;
        let before = self.services.len();
        for line in lines {
            if !self.services.iter().any(|s| s.service_id == line.service_id) {
                self.services.push(*line);
            }
        }
        self.duration_minutes = total_duration(&self.services, minimum);
        Ok(self.services.len() != before)
    }

    /// Removes services by id and recomputes the duration.
    ///
    /// Ids not on the appointment are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the service set changed.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::AppointmentLocked` unless the appointment is
    /// `Pending` or `Confirmed`.
    pub fn remove_services(
        &mut self,
        service_ids: &[i64],
        minimum: SlotLength,
    ) -> Result<bool, DomainError> {
        self.ensure_editable()?;
        let before = self.services.len();
        self.services
            .retain(|line| !service_ids.contains(&line.service_id));
        self.duration_minutes = total_duration(&self.services, minimum);
        Ok(self.services.len() != before)
    }

    const fn ensure_editable(&self) -> Result<(), DomainError> {
        if self.status.allows_service_changes() {
            Ok(())
        } else {
            Err(DomainError::AppointmentLocked {
                status: self.status,
            })
        }
    }
}

/// Sums service durations, never returning less than `minimum`.
#[must_use]
pub fn total_duration(services: &[AppointmentService], minimum: SlotLength) -> u32 {
    services
        .iter()
        .fold(0_u32, |acc, line| acc.saturating_add(line.duration_minutes))
        .max(minimum.minutes())
}

fn dedup_lines(services: Vec<AppointmentService>) -> Vec<AppointmentService> {
    let mut unique: Vec<AppointmentService> = Vec::with_capacity(services.len());
    for line in services {
        if !unique.iter().any(|s| s.service_id == line.service_id) {
            unique.push(line);
        }
    }
    unique
}
