// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! ## Module Organization
//!
//! - `audit` — audit event persistence
//! - `appointments` — appointment rows, service lines, status history,
//!   billing references
//! - `booking` — the transactional booking and lifecycle commits, and the
//!   bounded retry around them
//! - `catalog` — catalog service rows
//! - `clients` — client registration
//! - `schedules` — schedule rows and staff membership
//!
//! Row-level helpers never open transactions; the `persist_*` and
//! `commit_*` functions own the transaction boundary.

pub mod appointments;
pub mod audit;
pub mod booking;
pub mod catalog;
pub mod clients;
pub mod schedules;

use crate::error::PersistenceError;

/// Converts a domain `u32` to the `INTEGER` column type.
pub(crate) fn column_i32(value: u32, column: &str) -> Result<i32, PersistenceError> {
    i32::try_from(value)
        .map_err(|_| PersistenceError::QueryFailed(format!("{column} out of range: {value}")))
}
