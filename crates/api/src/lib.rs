// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary for the scheduling core.
//!
//! Handlers are transport-agnostic: they take DTOs and an authenticated
//! operator, and return DTOs or an `ApiError`. The HTTP server is one
//! caller among possible others.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod capabilities;
mod config;
mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role};
pub use capabilities::{compute_appointment_capabilities, compute_global_capabilities};
pub use config::BookingConfig;
pub use error::{
    ApiError, AuthError, SLOT_TAKEN_MESSAGE, translate_booking_error, translate_core_error,
    translate_domain_error, translate_persistence_error,
};
pub use handlers::{
    add_services, cancel_booking, complete_booking, confirm_booking, create_booking,
    create_schedule, deactivate_schedule, delete_appointment, delete_schedule, get_appointment,
    get_appointment_capabilities, get_appointment_history, get_availability, get_client,
    get_schedule, list_appointments_for_staff, list_schedules, list_services, reactivate_schedule,
    register_client, register_service, remove_services, replace_schedule_staff,
    set_service_active, start_booking,
};
pub use request_response::{
    AppointmentCapabilities, AppointmentCapabilitiesResponse, AppointmentHistoryResponse,
    AppointmentInfo, AppointmentResponse, AppointmentServiceInfo, AvailabilityResponse,
    CancelBookingRequest, Capability, ChangeServicesRequest, ClientResponse,
    CreateBookingRequest, CreateScheduleRequest, DeleteAppointmentResponse,
    DeleteScheduleResponse, GlobalCapabilities, ListAppointmentsResponse, ListSchedulesResponse,
    ListServicesResponse, RegisterClientRequest, RegisterServiceRequest,
    ReplaceScheduleStaffRequest, ScheduleInfo, ScheduleResponse, ServiceInfo, ServiceResponse,
    SetServiceActiveRequest, SlotInfo, StaffAvailabilityInfo, StatusHistoryInfo,
};
