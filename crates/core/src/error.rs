// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda_domain::DomainError;

/// Errors that can occur during state transitions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A domain rule was violated.
    DomainViolation(DomainError),
    /// A command was applied to state it cannot apply to.
    Internal(String),
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DomainViolation(err) => write!(f, "Domain violation: {err}"),
            Self::Internal(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<DomainError> for CoreError {
    fn from(err: DomainError) -> Self {
        Self::DomainViolation(err)
    }
}

/// Failure while preparing a booking.
///
/// Lookups against the staff directory and service catalog can fail for
/// reasons outside the domain (for example the store being unavailable);
/// those are kept apart from rule violations so callers can report them
/// differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookingError<E> {
    /// The request violates a booking rule.
    Rejected(CoreError),
    /// A directory or catalog lookup failed.
    Lookup(E),
}

impl<E: std::fmt::Display> std::fmt::Display for BookingError<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected(err) => write!(f, "Booking rejected: {err}"),
            Self::Lookup(err) => write!(f, "Booking lookup failed: {err}"),
        }
    }
}

impl<E: std::fmt::Debug + std::fmt::Display> std::error::Error for BookingError<E> {}

impl<E> From<DomainError> for BookingError<E> {
    fn from(err: DomainError) -> Self {
        Self::Rejected(CoreError::DomainViolation(err))
    }
}

impl<E> From<CoreError> for BookingError<E> {
    fn from(err: CoreError) -> Self {
        Self::Rejected(err)
    }
}
