// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda::CatalogTransition;
use agenda_audit::AuditScope;
use agenda_domain::CatalogService;
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::services;
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::mutations::column_i32;

fn insert_service(
    conn: &mut SqliteConnection,
    service: &CatalogService,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(services::table)
        .values((
            services::name.eq(service.name()),
            services::duration_minutes.eq(column_i32(
                service.duration_minutes(),
                "services.duration_minutes",
            )?),
            services::is_active.eq(i32::from(service.is_active())),
        ))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}

fn set_service_active(
    conn: &mut SqliteConnection,
    service_id: i64,
    active: bool,
) -> Result<(), PersistenceError> {
    let rows = diesel::update(services::table.filter(services::service_id.eq(service_id)))
        .set(services::is_active.eq(i32::from(active)))
        .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("service {service_id}")));
    }
    Ok(())
}

/// Persists a catalog change and its audit event atomically.
///
/// # Returns
///
/// The stored service, carrying its id.
///
/// # Errors
///
/// Returns an error if the service does not exist (for updates) or the
/// write fails.
pub fn persist_catalog_transition(
    conn: &mut SqliteConnection,
    transition: &CatalogTransition,
) -> Result<CatalogService, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let service = &transition.service;
        let service_id: i64 = match service.service_id() {
            Some(service_id) => {
                set_service_active(conn, service_id, service.is_active())?;
                service_id
            }
            None => insert_service(conn, service)?,
        };
        persist_audit_event(
            conn,
            &transition.audit_event,
            AuditScope::Service(service_id),
        )?;
        info!(
            service_id,
            action = %transition.audit_event.action.name,
            "Catalog updated"
        );
        Ok(service.clone().with_service_id(service_id))
    })
}
