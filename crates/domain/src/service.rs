// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;

/// A bookable service as known to the service catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogService {
    service_id: Option<i64>,
    name: String,
    duration_minutes: u32,
    active: bool,
}

impl CatalogService {
    /// Creates a new active catalog entry.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidServiceDefinition` if the name is empty or
    /// the duration is zero.
    pub fn new(name: &str, duration_minutes: u32) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidServiceDefinition {
                reason: String::from("name cannot be empty"),
            });
        }
        if duration_minutes == 0 {
            return Err(DomainError::InvalidServiceDefinition {
                reason: String::from("duration must be at least one minute"),
            });
        }
        Ok(Self {
            service_id: None,
            name: name.to_string(),
            duration_minutes,
            active: true,
        })
    }

    #[must_use]
    pub const fn with_service_id(mut self, service_id: i64) -> Self {
        self.service_id = Some(service_id);
        self
    }

    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub const fn service_id(&self) -> Option<i64> {
        self.service_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn duration_minutes(&self) -> u32 {
        self.duration_minutes
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }
}

/// A service line attached to an appointment.
///
/// The duration is captured when the service is attached so later catalog
/// edits do not move existing bookings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppointmentService {
    pub service_id: i64,
    pub duration_minutes: u32,
}

/// Checks that every requested service was resolved and is active, and
/// converts them into appointment lines in request order.
///
/// Duplicate ids in the request collapse to their first occurrence.
///
/// # Arguments
///
/// * `requested` - Service ids as supplied by the caller
/// * `resolved` - What the catalog returned for those ids
///
/// # Errors
///
/// Returns `DomainError::InvalidServices` listing every id that is unknown
/// or inactive.
pub fn resolve_service_lines(
    requested: &[i64],
    resolved: &[CatalogService],
) -> Result<Vec<AppointmentService>, DomainError> {
    let mut lines: Vec<AppointmentService> = Vec::with_capacity(requested.len());
    let mut missing = Vec::new();
    let mut inactive = Vec::new();

    for id in requested {
        if lines.iter().any(|line| line.service_id == *id)
            || missing.contains(id)
            || inactive.contains(id)
        {
            continue;
        }
        match resolved.iter().find(|s| s.service_id() == Some(*id)) {
            None => missing.push(*id),
            Some(service) if !service.is_active() => inactive.push(*id),
            Some(service) => lines.push(AppointmentService {
                service_id: *id,
                duration_minutes: service.duration_minutes(),
            }),
        }
    }

    if missing.is_empty() && inactive.is_empty() {
        return Ok(lines);
    }

    let reason = match (missing.is_empty(), inactive.is_empty()) {
        (false, true) => String::from("unknown service"),
        (true, false) => String::from("service is inactive"),
        _ => format!("unknown services {missing:?}, inactive services {inactive:?}"),
    };
    let mut service_ids = missing;
    service_ids.extend(inactive);
    Err(DomainError::InvalidServices {
        service_ids,
        reason,
    })
}

/// Renders service ids as a comma separated list, or `none` when empty.
#[must_use]
pub fn join_ids(ids: &[i64]) -> String {
    if ids.is_empty() {
        return String::from("none");
    }
    ids.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
