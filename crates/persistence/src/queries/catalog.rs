// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service catalog queries.

use agenda_domain::CatalogService;
use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::diesel_schema::services;
use crate::error::PersistenceError;
use crate::queries::{reconstruction, stored_u32};

#[derive(Queryable, Selectable)]
#[diesel(table_name = services)]
struct ServiceRow {
    service_id: i64,
    name: String,
    duration_minutes: i32,
    is_active: i32,
}

fn reconstruct(row: ServiceRow) -> Result<CatalogService, PersistenceError> {
    let duration = stored_u32(row.duration_minutes, "services.duration_minutes")?;
    Ok(CatalogService::new(&row.name, duration)
        .map_err(reconstruction("service row"))?
        .with_service_id(row.service_id)
        .with_active(row.is_active != 0))
}

/// Retrieves a catalog service by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_service(
    conn: &mut SqliteConnection,
    service_id: i64,
) -> Result<Option<CatalogService>, PersistenceError> {
    services::table
        .filter(services::service_id.eq(service_id))
        .select(ServiceRow::as_select())
        .first::<ServiceRow>(conn)
        .optional()?
        .map(reconstruct)
        .transpose()
}

/// Lists the whole catalog, active and inactive, by name.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_services(conn: &mut SqliteConnection) -> Result<Vec<CatalogService>, PersistenceError> {
    services::table
        .order(services::name.asc())
        .select(ServiceRow::as_select())
        .load::<ServiceRow>(conn)?
        .into_iter()
        .map(reconstruct)
        .collect()
}

/// Looks up the given service ids.
///
/// Ids that do not exist are simply absent from the result.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn resolve_services(
    conn: &mut SqliteConnection,
    service_ids: &[i64],
) -> Result<Vec<CatalogService>, PersistenceError> {
    services::table
        .filter(services::service_id.eq_any(service_ids))
        .select(ServiceRow::as_select())
        .load::<ServiceRow>(conn)?
        .into_iter()
        .map(reconstruct)
        .collect()
}
