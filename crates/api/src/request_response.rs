// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.
//!
//! Dates travel as `YYYY-MM-DD`, times of day as `HH:MM:SS`, and
//! wall-clock instants as `YYYY-MM-DD HH:MM:SS` in the business timezone.

// ========================================================================
// Schedules
// ========================================================================

/// API request to define a recurring schedule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateScheduleRequest {
    /// Administrator-facing label.
    pub name: String,
    /// Staff bookable under the schedule.
    pub staff_ids: Vec<i64>,
    /// First applicable date.
    pub start_date: String,
    /// Last applicable date (inclusive).
    pub end_date: String,
    /// Applicable weekday names (e.g. `["monday", "tuesday"]`).
    pub weekdays: Vec<String>,
    /// Start of the daily window.
    pub daily_start: String,
    /// End of the daily window.
    pub daily_end: String,
}

/// API request to replace a schedule's staff membership.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ReplaceScheduleStaffRequest {
    /// The new membership.
    pub staff_ids: Vec<i64>,
}

/// A schedule definition as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleInfo {
    /// The canonical schedule identifier.
    pub schedule_id: i64,
    pub name: String,
    pub staff_ids: Vec<i64>,
    pub start_date: String,
    pub end_date: String,
    pub weekdays: Vec<String>,
    pub daily_start: String,
    pub daily_end: String,
    /// Whether new slots are offered under the schedule.
    pub is_active: bool,
}

/// API response for a schedule change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ScheduleResponse {
    /// The schedule after the change.
    pub schedule: ScheduleInfo,
    /// A success message.
    pub message: String,
}

/// API response for a schedule deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteScheduleResponse {
    pub schedule_id: i64,
    pub message: String,
}

/// API response listing every schedule.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListSchedulesResponse {
    pub schedules: Vec<ScheduleInfo>,
}

// ========================================================================
// Service catalog and clients
// ========================================================================

/// API request to add a service to the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterServiceRequest {
    pub name: String,
    /// Default duration in minutes.
    pub duration_minutes: u32,
}

/// API request to enable or disable booking a service.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetServiceActiveRequest {
    pub active: bool,
}

/// A catalog service as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceInfo {
    pub service_id: i64,
    pub name: String,
    pub duration_minutes: u32,
    pub is_active: bool,
}

/// API response for a catalog change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ServiceResponse {
    pub service: ServiceInfo,
    pub message: String,
}

/// API response listing the catalog.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListServicesResponse {
    pub services: Vec<ServiceInfo>,
}

/// API request to register a client.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RegisterClientRequest {
    pub display_name: String,
}

/// API response for a client registration.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ClientResponse {
    pub client_id: i64,
    pub display_name: String,
    pub created_at: String,
}

// ========================================================================
// Availability
// ========================================================================

/// A free slot.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SlotInfo {
    pub start_at: String,
    pub end_at: String,
}

/// Free slots of one staff member.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StaffAvailabilityInfo {
    pub staff_id: i64,
    pub slots: Vec<SlotInfo>,
}

/// API response for an availability query.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AvailabilityResponse {
    pub schedule_id: i64,
    pub date: String,
    /// Length of every slot in minutes.
    pub slot_length_minutes: u32,
    /// One entry per staff member, in ascending id order.
    pub staff: Vec<StaffAvailabilityInfo>,
}

// ========================================================================
// Appointments
// ========================================================================

/// API request to book an appointment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CreateBookingRequest {
    pub client_id: i64,
    pub staff_id: i64,
    pub schedule_id: i64,
    /// Requested start, business-local.
    pub start_at: String,
    /// Requested services, in display order.
    pub service_ids: Vec<i64>,
}

/// API request to cancel an appointment.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CancelBookingRequest {
    /// Optional free-text reason.
    #[serde(default)]
    pub reason: Option<String>,
}

/// API request to attach or detach services.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChangeServicesRequest {
    pub service_ids: Vec<i64>,
}

/// One service line of an appointment.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentServiceInfo {
    pub service_id: i64,
    pub duration_minutes: u32,
}

/// An appointment as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentInfo {
    pub appointment_id: i64,
    pub client_id: i64,
    pub staff_id: i64,
    pub schedule_id: i64,
    pub start_at: String,
    pub end_at: String,
    pub duration_minutes: u32,
    pub status: String,
    pub services: Vec<AppointmentServiceInfo>,
    pub cancel_reason: Option<String>,
}

/// API response for a booking or lifecycle change.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentResponse {
    pub appointment: AppointmentInfo,
    pub message: String,
}

/// API response listing a staff member's day.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ListAppointmentsResponse {
    pub staff_id: i64,
    pub date: String,
    pub appointments: Vec<AppointmentInfo>,
}

/// One status history row.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StatusHistoryInfo {
    pub audit_event_id: i64,
    /// `None` for the creation entry.
    pub previous_status: Option<String>,
    pub new_status: String,
    /// UTC time the transition was committed.
    pub transitioned_at: String,
    pub notes: Option<String>,
}

/// API response for an appointment's status history.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentHistoryResponse {
    pub appointment_id: i64,
    pub entries: Vec<StatusHistoryInfo>,
}

/// API response for an appointment deletion.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DeleteAppointmentResponse {
    pub appointment_id: i64,
    pub message: String,
}

// ========================================================================
// Capabilities
// ========================================================================

/// Whether an action is permitted.
///
/// Serialized as a plain boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// The action is permitted.
    Allowed,
    /// The action is not permitted.
    Denied,
}

impl Capability {
    /// Returns true if the action is permitted.
    #[must_use]
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }

    #[must_use]
    pub const fn from_bool(allowed: bool) -> Self {
        if allowed { Self::Allowed } else { Self::Denied }
    }
}

impl serde::Serialize for Capability {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_bool(matches!(self, Self::Allowed))
    }
}

impl<'de> serde::Deserialize<'de> for Capability {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let b = bool::deserialize(deserializer)?;
        Ok(Self::from_bool(b))
    }
}

/// Operator-level capabilities.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GlobalCapabilities {
    pub can_manage_schedules: Capability,
    pub can_manage_catalog: Capability,
    pub can_book: Capability,
    pub can_delete_appointments: Capability,
}

/// What can currently be done with one appointment.
///
/// Advisory only; every handler re-validates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentCapabilities {
    pub can_confirm: Capability,
    pub can_start: Capability,
    pub can_complete: Capability,
    pub can_cancel: Capability,
    pub can_edit_services: Capability,
    pub can_delete: Capability,
}

/// API response for an appointment's capabilities.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AppointmentCapabilitiesResponse {
    pub appointment_id: i64,
    pub status: String,
    pub capabilities: AppointmentCapabilities,
}
