// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Capability computation for authorization-aware UI gating.
//!
//! Capabilities expose what actions an operator is permitted to perform
//! without leaking domain internals. They are advisory only and do not
//! replace backend authorization checks.

use crate::auth::{AuthenticatedActor, Role};
use crate::request_response::{AppointmentCapabilities, Capability, GlobalCapabilities};
use agenda_domain::{Appointment, AppointmentStatus, CompletionPolicy};

/// Computes global capabilities for an authenticated operator.
#[must_use]
pub const fn compute_global_capabilities(actor: &AuthenticatedActor) -> GlobalCapabilities {
    match actor.role {
        Role::Admin => GlobalCapabilities {
            can_manage_schedules: Capability::Allowed,
            can_manage_catalog: Capability::Allowed,
            can_book: Capability::Allowed,
            can_delete_appointments: Capability::Allowed,
        },
        Role::Reception => GlobalCapabilities {
            can_manage_schedules: Capability::Denied,
            can_manage_catalog: Capability::Denied,
            can_book: Capability::Allowed,
            can_delete_appointments: Capability::Denied,
        },
    }
}

/// Computes what the operator may do with one appointment.
///
/// Capabilities depend on:
/// - The operator's role
/// - The appointment's status and the completion policy
/// - Whether a billing record references the appointment
///
/// # Arguments
///
/// * `actor` - The authenticated actor
/// * `appointment` - The appointment being evaluated
/// * `policy` - Deployment completion policy
/// * `is_billed` - Whether a billing record references the appointment
#[must_use]
pub fn compute_appointment_capabilities(
    actor: &AuthenticatedActor,
    appointment: &Appointment,
    policy: CompletionPolicy,
    is_billed: bool,
) -> AppointmentCapabilities {
    let reachable: Vec<AppointmentStatus> = appointment.status().valid_transitions(policy);
    let can = |status: AppointmentStatus| Capability::from_bool(reachable.contains(&status));

    AppointmentCapabilities {
        can_confirm: can(AppointmentStatus::Confirmed),
        can_start: can(AppointmentStatus::InProgress),
        can_complete: can(AppointmentStatus::Completed),
        can_cancel: can(AppointmentStatus::Cancelled),
        can_edit_services: Capability::from_bool(appointment.status().allows_service_changes()),
        can_delete: Capability::from_bool(actor.role == Role::Admin && !is_billed),
    }
}
