// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::notify::LifecycleEventKind;
use agenda_audit::{AuditEvent, StateSnapshot};
use agenda_domain::{
    Appointment, AppointmentStatus, CatalogService, CompletionPolicy, ScheduleDefinition,
    SlotLength, format_date, format_time_of_day, format_wall_clock,
};

/// Business rules that vary by deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingRules {
    /// Slot length used for availability and as the minimum duration.
    pub slot_length: SlotLength,
    /// Whether `Confirmed -> Completed` is allowed.
    pub completion_policy: CompletionPolicy,
}

/// The result of a successful appointment transition.
///
/// Transitions are atomic: they either succeed completely or fail without side effects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionResult {
    /// The appointment after the transition.
    pub new_appointment: Appointment,
    /// The status before the transition.
    pub previous_status: AppointmentStatus,
    /// Duration before the transition, in minutes.
    pub previous_duration_minutes: u32,
    /// The audit event recording this transition.
    pub audit_event: AuditEvent,
    /// The notification to publish once the transition is committed.
    pub lifecycle_event: Option<LifecycleEventKind>,
}

impl TransitionResult {
    /// Returns true if the booked interval became longer and must be
    /// re-checked against the staff calendar before committing.
    #[must_use]
    pub const fn interval_grew(&self) -> bool {
        self.new_appointment.duration_minutes() > self.previous_duration_minutes
    }
}

/// A validated booking ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedBooking {
    /// The `Pending` appointment to insert.
    pub appointment: Appointment,
    /// The audit event recording the creation.
    pub audit_event: AuditEvent,
}

/// The result of a schedule command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleTransition {
    /// The schedule after the command; for deletes, the removed schedule.
    pub schedule: ScheduleDefinition,
    /// True when the command removes the schedule.
    pub removed: bool,
    /// The audit event recording the change.
    pub audit_event: AuditEvent,
}

/// The result of a catalog command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogTransition {
    /// The service after the command.
    pub service: CatalogService,
    /// The audit event recording the change.
    pub audit_event: AuditEvent,
}

/// Converts an appointment to a snapshot for audit purposes.
#[must_use]
pub fn appointment_snapshot(appointment: &Appointment) -> StateSnapshot {
    StateSnapshot::new(format!(
        "status={},staff={},client={},start={},duration={},services={:?}",
        appointment.status(),
        appointment.staff_id(),
        appointment.client_id(),
        format_wall_clock(appointment.start_at()),
        appointment.duration_minutes(),
        appointment.service_ids()
    ))
}

/// Converts a schedule definition to a snapshot for audit purposes.
#[must_use]
pub fn schedule_snapshot(schedule: &ScheduleDefinition) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},staff={:?},dates={}..{},weekdays={},window={}-{},active={}",
        schedule.name(),
        schedule.staff_ids(),
        format_date(schedule.start_date()),
        format_date(schedule.end_date()),
        schedule.weekdays().names().join("|"),
        format_time_of_day(schedule.daily_start()),
        format_time_of_day(schedule.daily_end()),
        schedule.is_active()
    ))
}

/// Converts a catalog service to a snapshot for audit purposes.
#[must_use]
pub fn service_snapshot(service: &CatalogService) -> StateSnapshot {
    StateSnapshot::new(format!(
        "name={},duration={},active={}",
        service.name(),
        service.duration_minutes(),
        service.is_active()
    ))
}
