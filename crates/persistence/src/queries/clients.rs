// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::ClientData;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

/// Returns true if the client exists.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn client_exists(conn: &mut SqliteConnection, client_id: i64) -> Result<bool, PersistenceError> {
    Ok(
        diesel::select(diesel::dsl::exists(
            clients::table.filter(clients::client_id.eq(client_id)),
        ))
        .get_result(conn)?,
    )
}

/// Retrieves a client by id.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_client(
    conn: &mut SqliteConnection,
    client_id: i64,
) -> Result<Option<ClientData>, PersistenceError> {
    let row: Option<(i64, String, String)> = clients::table
        .filter(clients::client_id.eq(client_id))
        .select((
            clients::client_id,
            clients::display_name,
            clients::created_at,
        ))
        .first(conn)
        .optional()?;

    Ok(row.map(|(client_id, display_name, created_at)| ClientData {
        client_id,
        display_name,
        created_at,
    }))
}
