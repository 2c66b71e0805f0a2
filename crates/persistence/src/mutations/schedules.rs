// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda::ScheduleTransition;
use agenda_audit::AuditScope;
use agenda_domain::{ScheduleDefinition, format_date, format_time_of_day};
use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{schedule_staff, schedules};
use crate::error::PersistenceError;
use crate::mutations::audit::persist_audit_event;
use crate::queries::schedules::count_appointments_for_schedule;

fn replace_schedule_staff(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    schedule: &ScheduleDefinition,
) -> Result<(), PersistenceError> {
    diesel::delete(schedule_staff::table.filter(schedule_staff::schedule_id.eq(schedule_id)))
        .execute(conn)?;

    let rows: Vec<_> = schedule
        .staff_ids()
        .iter()
        .map(|staff_id| {
            (
                schedule_staff::schedule_id.eq(schedule_id),
                schedule_staff::staff_id.eq(*staff_id),
            )
        })
        .collect();
    diesel::insert_into(schedule_staff::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

fn insert_schedule(
    conn: &mut SqliteConnection,
    schedule: &ScheduleDefinition,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(schedules::table)
        .values((
            schedules::name.eq(schedule.name()),
            schedules::start_date.eq(format_date(schedule.start_date())),
            schedules::end_date.eq(format_date(schedule.end_date())),
            schedules::weekdays.eq(schedule.weekdays().bits()),
            schedules::daily_start.eq(format_time_of_day(schedule.daily_start())),
            schedules::daily_end.eq(format_time_of_day(schedule.daily_end())),
            schedules::is_active.eq(i32::from(schedule.is_active())),
        ))
        .execute(conn)?;
    let schedule_id: i64 = conn.get_last_insert_rowid()?;
    replace_schedule_staff(conn, schedule_id, schedule)?;
    Ok(schedule_id)
}

fn update_schedule(
    conn: &mut SqliteConnection,
    schedule_id: i64,
    schedule: &ScheduleDefinition,
) -> Result<(), PersistenceError> {
    let rows = diesel::update(schedules::table.filter(schedules::schedule_id.eq(schedule_id)))
        .set((
            schedules::name.eq(schedule.name()),
            schedules::start_date.eq(format_date(schedule.start_date())),
            schedules::end_date.eq(format_date(schedule.end_date())),
            schedules::weekdays.eq(schedule.weekdays().bits()),
            schedules::daily_start.eq(format_time_of_day(schedule.daily_start())),
            schedules::daily_end.eq(format_time_of_day(schedule.daily_end())),
            schedules::is_active.eq(i32::from(schedule.is_active())),
        ))
        .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("schedule {schedule_id}")));
    }
    replace_schedule_staff(conn, schedule_id, schedule)
}

fn delete_schedule(conn: &mut SqliteConnection, schedule_id: i64) -> Result<(), PersistenceError> {
    let appointment_count: i64 = count_appointments_for_schedule(conn, schedule_id)?;
    if appointment_count > 0 {
        return Err(PersistenceError::ScheduleReferenced {
            schedule_id,
            appointment_count,
        });
    }
    let rows = diesel::delete(schedules::table.filter(schedules::schedule_id.eq(schedule_id)))
        .execute(conn)?;
    if rows == 0 {
        return Err(PersistenceError::NotFound(format!("schedule {schedule_id}")));
    }
    Ok(())
}

/// Persists a schedule change and its audit event atomically.
///
/// A schedule without an id is inserted. A removed schedule is deleted,
/// which fails with `ScheduleReferenced` while any appointment points at
/// it. Anything else overwrites the stored row and staff membership.
///
/// # Returns
///
/// The stored schedule, carrying its id.
///
/// # Errors
///
/// Returns an error if the schedule is referenced, missing, or the write
/// fails.
pub fn persist_schedule_transition(
    conn: &mut SqliteConnection,
    transition: &ScheduleTransition,
) -> Result<ScheduleDefinition, PersistenceError> {
    conn.immediate_transaction(|conn| {
        let schedule = &transition.schedule;
        let schedule_id: i64 = match schedule.schedule_id() {
            None => insert_schedule(conn, schedule)?,
            Some(schedule_id) if transition.removed => {
                delete_schedule(conn, schedule_id)?;
                schedule_id
            }
            Some(schedule_id) => {
                update_schedule(conn, schedule_id, schedule)?;
                schedule_id
            }
        };
        persist_audit_event(
            conn,
            &transition.audit_event,
            AuditScope::Schedule(schedule_id),
        )?;
        info!(
            schedule_id,
            action = %transition.audit_event.action.name,
            "Schedule updated"
        );
        Ok(schedule.clone().with_schedule_id(schedule_id))
    })
}
