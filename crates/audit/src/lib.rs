// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

#[cfg(test)]
mod tests;

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a state change:
/// a receptionist, an administrator, or the system itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "reception", "system").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`CreateBooking`", "`CancelBooking`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A textual snapshot of the affected record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateSnapshot {
    /// A string representation of the state.
    pub data: String,
}

impl StateSnapshot {
    /// Creates a new `StateSnapshot`.
    #[must_use]
    pub const fn new(data: String) -> Self {
        Self { data }
    }

    /// A snapshot for a record that does not exist (before a create, after a
    /// delete).
    #[must_use]
    pub fn absent() -> Self {
        Self {
            data: String::from("none"),
        }
    }
}

/// The record an audit event is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditScope {
    /// Not tied to a single record.
    Global,
    /// A schedule definition.
    Schedule(i64),
    /// An appointment.
    Appointment(i64),
    /// A catalog service.
    Service(i64),
}

impl AuditScope {
    /// Returns the scope kind used for persistence.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::Schedule(_) => "schedule",
            Self::Appointment(_) => "appointment",
            Self::Service(_) => "service",
        }
    }

    /// Returns the scoped record id, if any.
    #[must_use]
    pub const fn record_id(&self) -> Option<i64> {
        match self {
            Self::Global => None,
            Self::Schedule(id) | Self::Appointment(id) | Self::Service(id) => Some(*id),
        }
    }

    /// Rebuilds a scope from its persisted parts.
    ///
    /// Unknown kinds and missing ids fall back to `Global`.
    #[must_use]
    pub fn from_parts(kind: &str, record_id: Option<i64>) -> Self {
        match (kind, record_id) {
            ("schedule", Some(id)) => Self::Schedule(id),
            ("appointment", Some(id)) => Self::Appointment(id),
            ("service", Some(id)) => Self::Service(id),
            _ => Self::Global,
        }
    }
}

/// An immutable audit event representing a state transition.
///
/// Every successful state change produces exactly one audit event, which
/// captures:
/// - Who performed the action (actor)
/// - Why it was performed (cause)
/// - What action was performed (action)
/// - The record before and after the transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// Identifier assigned on persistence; `None` before the event is stored.
    pub event_id: Option<i64>,
    /// The record this event is about.
    pub scope: AuditScope,
    /// The actor who initiated this state change.
    pub actor: Actor,
    /// The cause or reason for this state change.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The state before the transition.
    pub before: StateSnapshot,
    /// The state after the transition.
    pub after: StateSnapshot,
}

impl AuditEvent {
    /// Creates a new unscoped `AuditEvent`.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the change
    /// * `cause` - The reason for the change
    /// * `action` - The action that was performed
    /// * `before` - The state before the transition
    /// * `after` - The state after the transition
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: StateSnapshot,
        after: StateSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            scope: AuditScope::Global,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns this event scoped to a record.
    #[must_use]
    pub const fn with_scope(mut self, scope: AuditScope) -> Self {
        self.scope = scope;
        self
    }

    /// Returns this event carrying its persisted id.
    #[must_use]
    pub const fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}
