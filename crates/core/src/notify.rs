// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Appointment lifecycle notifications.
//!
//! Events are published after the corresponding transition has been
//! committed. Delivery is best effort: a failing notifier is logged and
//! skipped, and never undoes the transition.

use agenda_domain::{Appointment, AppointmentStatus};
use time::PrimitiveDateTime;
use tracing::{debug, warn};

/// Kinds of lifecycle events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LifecycleEventKind {
    Created,
    Confirmed,
    Started,
    Cancelled,
    Completed,
}

impl LifecycleEventKind {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Confirmed => "confirmed",
            Self::Started => "started",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// Returns the event published when an appointment enters `status`.
    #[must_use]
    pub const fn for_status(status: AppointmentStatus) -> Self {
        match status {
            AppointmentStatus::Pending => Self::Created,
            AppointmentStatus::Confirmed => Self::Confirmed,
            AppointmentStatus::InProgress => Self::Started,
            AppointmentStatus::Completed => Self::Completed,
            AppointmentStatus::Cancelled => Self::Cancelled,
        }
    }
}

impl std::fmt::Display for LifecycleEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A committed appointment lifecycle change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub kind: LifecycleEventKind,
    pub appointment_id: i64,
    pub client_id: i64,
    pub staff_id: i64,
    pub start_at: PrimitiveDateTime,
    pub status: AppointmentStatus,
}

impl LifecycleEvent {
    /// Builds an event for a persisted appointment.
    ///
    /// Returns `None` if the appointment has no id yet.
    #[must_use]
    pub fn for_appointment(kind: LifecycleEventKind, appointment: &Appointment) -> Option<Self> {
        Some(Self {
            kind,
            appointment_id: appointment.appointment_id()?,
            client_id: appointment.client_id(),
            staff_id: appointment.staff_id(),
            start_at: appointment.start_at(),
            status: appointment.status(),
        })
    }
}

/// Delivery failure reported by a notifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifyError(pub String);

impl std::fmt::Display for NotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for NotifyError {}

/// A subscriber to lifecycle events (e-mail, SMS, live UI, ...).
pub trait LifecycleNotifier {
    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns an error if the event could not be delivered.
    fn notify(&self, event: &LifecycleEvent) -> Result<(), NotifyError>;
}

/// Delivers an event to every notifier.
///
/// # Returns
///
/// The number of notifiers that accepted the event.
pub fn dispatch(notifiers: &[&dyn LifecycleNotifier], event: &LifecycleEvent) -> usize {
    let mut delivered: usize = 0;
    for notifier in notifiers {
        match notifier.notify(event) {
            Ok(()) => delivered += 1,
            Err(e) => warn!(
                appointment_id = event.appointment_id,
                kind = %event.kind,
                error = %e,
                "Lifecycle notification failed"
            ),
        }
    }
    debug!(
        appointment_id = event.appointment_id,
        kind = %event.kind,
        delivered,
        "Lifecycle event dispatched"
    );
    delivered
}
