// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod lifecycle_tests;

use crate::{Persistence, PersistenceError};
use agenda::{
    BookingRequest, BookingRules, CatalogCommand, Command, PreparedBooking, ScheduleCommand,
    apply, apply_catalog, apply_schedule, prepare_booking,
};
use agenda_audit::{Actor, Cause};
use agenda_domain::{Appointment, ScheduleDefinition, WeekdaySet};
use time::PrimitiveDateTime;
use time::macros::{date, datetime, time};

pub const STAFF_A: i64 = 7;
pub const STAFF_B: i64 = 9;

/// Early on Monday 2 March 2026, the first day of the test schedule.
pub const NOW: PrimitiveDateTime = datetime!(2026-03-02 06:00);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("admin-1"), String::from("admin"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("test-cause"), String::from("Test operation"))
}

/// Ids of the rows created by `seed`.
pub struct Fixture {
    pub client_id: i64,
    pub schedule_id: i64,
    pub haircut_id: i64,
    pub colour_id: i64,
}

pub fn register_service(persistence: &mut Persistence, name: &str, minutes: u32) -> i64 {
    let transition = apply_catalog(
        None,
        CatalogCommand::RegisterService {
            name: name.to_string(),
            duration_minutes: minutes,
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence
        .persist_catalog_transition(&transition)
        .unwrap()
        .service_id()
        .unwrap()
}

/// Stores a March 2026 Monday-Friday schedule, 08:00-10:00.
pub fn create_schedule(persistence: &mut Persistence, staff_ids: Vec<i64>) -> ScheduleDefinition {
    let transition = apply_schedule(
        None,
        ScheduleCommand::CreateSchedule {
            name: String::from("March mornings"),
            staff_ids,
            start_date: date!(2026 - 03 - 01),
            end_date: date!(2026 - 03 - 31),
            weekdays: WeekdaySet::WORKWEEK,
            daily_start: time!(08:00),
            daily_end: time!(10:00),
        },
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.persist_schedule_transition(&transition).unwrap()
}

pub fn seed(persistence: &mut Persistence) -> Fixture {
    let client_id = persistence.register_client("Ana Gomez").unwrap();
    let haircut_id = register_service(persistence, "Haircut", 30);
    let colour_id = register_service(persistence, "Colour", 60);
    let schedule = create_schedule(persistence, vec![STAFF_A, STAFF_B]);

    Fixture {
        client_id,
        schedule_id: schedule.schedule_id().unwrap(),
        haircut_id,
        colour_id,
    }
}

pub fn prepare(
    persistence: &mut Persistence,
    fixture: &Fixture,
    staff_id: i64,
    start_at: PrimitiveDateTime,
    service_ids: Vec<i64>,
) -> PreparedBooking {
    let schedule = persistence.get_schedule(fixture.schedule_id).unwrap();
    let request = BookingRequest {
        client_id: fixture.client_id,
        staff_id,
        schedule_id: fixture.schedule_id,
        start_at,
        service_ids,
    };
    prepare_booking(
        persistence,
        schedule.as_ref(),
        &request,
        NOW,
        BookingRules::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap()
}

pub fn book(
    persistence: &mut Persistence,
    fixture: &Fixture,
    staff_id: i64,
    start_at: PrimitiveDateTime,
    service_ids: Vec<i64>,
) -> Result<Appointment, PersistenceError> {
    let prepared = prepare(persistence, fixture, staff_id, start_at, service_ids);
    persistence.commit_booking(&prepared)
}

pub fn run_command(
    persistence: &mut Persistence,
    appointment_id: i64,
    command: Command,
) -> Result<Appointment, PersistenceError> {
    let appointment = persistence.get_appointment(appointment_id).unwrap().unwrap();
    let schedule = persistence
        .get_schedule(appointment.schedule_id())
        .unwrap()
        .unwrap();
    let result = apply(
        &appointment,
        &schedule,
        command,
        BookingRules::default(),
        create_test_actor(),
        create_test_cause(),
    )
    .unwrap();
    persistence.commit_transition(&result)
}
