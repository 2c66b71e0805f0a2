// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use std::cell::RefCell;

use agenda::{LifecycleEvent, LifecycleEventKind, LifecycleNotifier, NotifyError};
use agenda_audit::Cause;
use agenda_persistence::Persistence;
use time::PrimitiveDateTime;
use time::macros::datetime;

use crate::{
    AppointmentResponse, ApiError, AuthenticatedActor, BookingConfig, CreateBookingRequest,
    CreateScheduleRequest, RegisterClientRequest, RegisterServiceRequest, Role, create_booking,
    create_schedule, register_client, register_service,
};

pub const STAFF_A: i64 = 7;
pub const STAFF_B: i64 = 9;

/// Early on Monday 2 March 2026, the first day of the test schedule.
pub const NOW: PrimitiveDateTime = datetime!(2026-03-02 06:00);

pub fn create_test_admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("admin-123"), Role::Admin)
}

pub fn create_test_receptionist() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("desk-456"), Role::Reception)
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("api-req-456"), String::from("API request"))
}

pub fn create_test_schedule_request() -> CreateScheduleRequest {
    CreateScheduleRequest {
        name: String::from("March mornings"),
        staff_ids: vec![STAFF_A, STAFF_B],
        start_date: String::from("2026-03-01"),
        end_date: String::from("2026-03-31"),
        weekdays: ["monday", "tuesday", "wednesday", "thursday", "friday"]
            .iter()
            .map(|d| (*d).to_string())
            .collect(),
        daily_start: String::from("08:00:00"),
        daily_end: String::from("10:00:00"),
    }
}

/// Notifier that remembers every event kind it receives.
#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: RefCell<Vec<LifecycleEventKind>>,
}

impl LifecycleNotifier for RecordingNotifier {
    fn notify(&self, event: &LifecycleEvent) -> Result<(), NotifyError> {
        self.seen.borrow_mut().push(event.kind);
        Ok(())
    }
}

/// Ids of the rows created by `seed`.
pub struct Fixture {
    pub client_id: i64,
    pub schedule_id: i64,
    pub haircut_id: i64,
    pub colour_id: i64,
}

pub fn seed(persistence: &mut Persistence) -> Fixture {
    let admin = create_test_admin();
    let client_id = register_client(
        persistence,
        &RegisterClientRequest {
            display_name: String::from("Ana Gomez"),
        },
        &create_test_receptionist(),
    )
    .unwrap()
    .client_id;

    let mut service = |name: &str, duration_minutes: u32| {
        register_service(
            persistence,
            &RegisterServiceRequest {
                name: name.to_string(),
                duration_minutes,
            },
            &admin,
            create_test_cause(),
        )
        .unwrap()
        .service
        .service_id
    };
    let haircut_id = service("Haircut", 30);
    let colour_id = service("Colour", 60);

    let schedule_id = create_schedule(
        persistence,
        &create_test_schedule_request(),
        &admin,
        create_test_cause(),
    )
    .unwrap()
    .schedule
    .schedule_id;

    Fixture {
        client_id,
        schedule_id,
        haircut_id,
        colour_id,
    }
}

pub fn book_at(
    persistence: &mut Persistence,
    config: &BookingConfig,
    fixture: &Fixture,
    staff_id: i64,
    start_at: &str,
    service_ids: Vec<i64>,
) -> Result<AppointmentResponse, ApiError> {
    create_booking(
        persistence,
        config,
        &CreateBookingRequest {
            client_id: fixture.client_id,
            staff_id,
            schedule_id: fixture.schedule_id,
            start_at: start_at.to_string(),
            service_ids,
        },
        &create_test_receptionist(),
        create_test_cause(),
        NOW,
        &[],
    )
}
