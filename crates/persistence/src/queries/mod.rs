// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! ## Module Organization
//!
//! - `appointments` — appointments, their service lines, status history,
//!   and billing references
//! - `audit` — audit events and timelines
//! - `catalog` — catalog services
//! - `clients` — client directory lookups
//! - `schedules` — schedule definitions and staff membership

pub mod appointments;
pub mod audit;
pub mod catalog;
pub mod clients;
pub mod schedules;

use crate::error::PersistenceError;

/// Converts a stored non-negative integer column back to `u32`.
pub(crate) fn stored_u32(value: i32, column: &str) -> Result<u32, PersistenceError> {
    u32::try_from(value).map_err(|_| {
        PersistenceError::ReconstructionError(format!("{column} out of range: {value}"))
    })
}

/// Wraps a domain validation failure on a stored row.
pub(crate) fn reconstruction<E: std::fmt::Display>(
    what: &'static str,
) -> impl FnOnce(E) -> PersistenceError {
    move |e| PersistenceError::ReconstructionError(format!("{what}: {e}"))
}
