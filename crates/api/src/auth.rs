// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authorization types and services.
//!
//! Operators are managed by the wider business platform. The scheduling
//! core only receives an already-identified operator and its role.

use agenda_audit::Actor;

use crate::error::AuthError;

/// Operator roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: operators who maintain schedules and the service catalog.
    ///
    /// Admins may perform:
    /// - creation, staffing, deactivation, and deletion of schedules
    /// - service catalog maintenance
    /// - physical deletion of appointments
    /// - everything a receptionist may do
    Admin,
    /// Reception role: front-desk operators working the calendar.
    ///
    /// Receptionists may:
    /// - query availability
    /// - register clients
    /// - book appointments on behalf of clients
    /// - confirm, start, complete, and cancel appointments
    /// - edit the services of open appointments
    Reception,
}

impl Role {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Reception => "reception",
        }
    }

    /// Parses a role name, case-insensitively.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` for unknown roles.
    pub fn parse(value: &str) -> Result<Self, AuthError> {
        match value.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Self::Admin),
            "reception" => Ok(Self::Reception),
            _ => Err(AuthError::AuthenticationFailed {
                reason: format!("unknown role '{value}'"),
            }),
        }
    }
}

/// An authenticated operator with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), String::from(self.role.as_str()))
    }
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    fn require_admin(actor: &AuthenticatedActor, action: &str) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Reception => Err(AuthError::Unauthorized {
                action: String::from(action),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor is authorized to change schedule definitions.
    ///
    /// Only Admin actors may create, restaff, deactivate, reactivate, or
    /// delete schedules.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_schedules(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_schedules")
    }

    /// Checks if an actor is authorized to change the service catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_manage_catalog(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "manage_catalog")
    }

    /// Checks if an actor is authorized to physically delete an appointment.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_delete_appointment(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Self::require_admin(actor, "delete_appointment")
    }

    /// Checks if an actor is authorized to book appointments.
    ///
    /// Both Admin and Reception actors may book.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have permission.
    pub const fn authorize_book(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an actor is authorized to move appointments through
    /// their lifecycle or edit their services.
    ///
    /// Both Admin and Reception actors may do so.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have permission.
    pub const fn authorize_manage_appointments(
        _actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an actor is authorized to register clients.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have permission.
    pub const fn authorize_register_client(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }
}
