// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Collaborators the booking coordinator consults.
//!
//! Staff, services, and clients are owned by other parts of the business
//! platform. The scheduling core only needs these narrow lookups. Methods
//! take `&mut self` so a single database connection can serve them.

use agenda_domain::CatalogService;
use std::collections::BTreeSet;

/// Staff membership of schedule definitions.
pub trait StaffDirectory {
    /// Lookup failure type.
    type Error;

    /// Returns true if `staff_id` is currently assigned to the schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup cannot be performed.
    fn is_staff_member(&mut self, schedule_id: i64, staff_id: i64) -> Result<bool, Self::Error>;

    /// Returns the staff currently assigned to the schedule.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup cannot be performed.
    fn list_staff_for(&mut self, schedule_id: i64) -> Result<BTreeSet<i64>, Self::Error>;
}

/// Read access to the service catalog.
pub trait ServiceCatalog {
    /// Lookup failure type.
    type Error;

    /// Resolves the given ids to catalog entries.
    ///
    /// Unknown ids are simply absent from the result; inactive services are
    /// returned with their active flag cleared.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup cannot be performed.
    fn resolve_services(&mut self, service_ids: &[i64]) -> Result<Vec<CatalogService>, Self::Error>;
}

/// Existence checks for clients.
pub trait ClientDirectory {
    /// Lookup failure type.
    type Error;

    /// Returns true if the client exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup cannot be performed.
    fn client_exists(&mut self, client_id: i64) -> Result<bool, Self::Error>;
}
