// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Schedule definition and staff membership queries.

use agenda_domain::{ScheduleDefinition, WeekdaySet, parse_date, parse_time_of_day};
use diesel::SqliteConnection;
use diesel::prelude::*;
use std::collections::BTreeSet;

use crate::diesel_schema::{appointments, schedule_staff, schedules};
use crate::error::PersistenceError;
use crate::queries::reconstruction;

#[derive(Queryable, Selectable)]
#[diesel(table_name = schedules)]
struct ScheduleRow {
    schedule_id: i64,
    name: String,
    start_date: String,
    end_date: String,
    weekdays: i32,
    daily_start: String,
    daily_end: String,
    is_active: i32,
}

fn reconstruct(
    row: ScheduleRow,
    staff_ids: BTreeSet<i64>,
) -> Result<ScheduleDefinition, PersistenceError> {
    let weekdays: WeekdaySet =
        WeekdaySet::from_bits(row.weekdays).map_err(reconstruction("schedule weekdays"))?;
    let start_date = parse_date(&row.start_date).map_err(reconstruction("schedule start date"))?;
    let end_date = parse_date(&row.end_date).map_err(reconstruction("schedule end date"))?;
    let daily_start =
        parse_time_of_day(&row.daily_start).map_err(reconstruction("schedule daily start"))?;
    let daily_end =
        parse_time_of_day(&row.daily_end).map_err(reconstruction("schedule daily end"))?;

    let schedule = ScheduleDefinition::new(
        &row.name,
        staff_ids,
        start_date,
        end_date,
        weekdays,
        daily_start,
        daily_end,
    )
    .map_err(reconstruction("schedule row"))?;

    Ok(schedule
        .with_schedule_id(row.schedule_id)
        .with_active(row.is_active != 0))
}

/// Lists the staff members assigned to a schedule.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_staff_for(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<BTreeSet<i64>, PersistenceError> {
    let staff: Vec<i64> = schedule_staff::table
        .filter(schedule_staff::schedule_id.eq(schedule_id))
        .select(schedule_staff::staff_id)
        .load(conn)?;
    Ok(staff.into_iter().collect())
}

/// Returns true if the staff member is currently assigned to the schedule.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn is_staff_member(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    staff_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        schedule_staff::table
            .filter(schedule_staff::schedule_id.eq(schedule_id))
            .filter(schedule_staff::staff_id.eq(staff_id)),
    ))
    .get_result(conn)?)
}

/// Retrieves a schedule with its staff membership.
///
/// Inactive schedules are returned; callers decide how to treat them.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
pub fn get_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<Option<ScheduleDefinition>, PersistenceError> {
    let row: Option<ScheduleRow> = schedules::table
        .filter(schedules::schedule_id.eq(schedule_id))
        .select(ScheduleRow::as_select())
        .first(conn)
        .optional()?;

    let Some(row) = row else {
        return Ok(None);
    };
    let staff_ids = list_staff_for(conn, schedule_id)?;
    reconstruct(row, staff_ids).map(Some)
}

/// Lists every schedule in id order.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_schedules(
    conn: &mut SqliteConnection,
) -> Result<Vec<ScheduleDefinition>, PersistenceError> {
    let rows: Vec<ScheduleRow> = schedules::table
        .order(schedules::schedule_id.asc())
        .select(ScheduleRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(|row| {
            let staff_ids = list_staff_for(conn, row.schedule_id)?;
            reconstruct(row, staff_ids)
        })
        .collect()
}

/// Counts appointments (in any status) booked under a schedule.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_appointments_for_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i64,
) -> Result<i64, PersistenceError> {
    Ok(appointments::table
        .filter(appointments::schedule_id.eq(schedule_id))
        .count()
        .get_result(conn)?)
}
