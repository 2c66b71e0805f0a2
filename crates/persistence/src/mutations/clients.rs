// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::clients;
use crate::error::PersistenceError;

/// Registers a client and returns its id.
///
/// # Errors
///
/// Returns an error if the name is blank or the insert fails.
pub fn register_client(
    conn: &mut SqliteConnection,
    display_name: &str,
) -> Result<i64, PersistenceError> {
    let display_name = display_name.trim();
    if display_name.is_empty() {
        return Err(PersistenceError::QueryFailed(String::from(
            "client name cannot be empty",
        )));
    }

    diesel::insert_into(clients::table)
        .values(clients::display_name.eq(display_name))
        .execute(conn)?;
    conn.get_last_insert_rowid()
}
