// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{BookingRequest, BookingRules, ServiceCatalog, StaffDirectory};
use agenda_audit::{Actor, Cause};
use agenda_domain::{
    Appointment, AppointmentService, CatalogService, ScheduleDefinition, SlotLength, WeekdaySet,
};
use std::collections::{BTreeMap, BTreeSet};
use time::PrimitiveDateTime;
use time::macros::{date, datetime, time};

pub const SCHEDULE_ID: i64 = 1;
pub const STAFF_ID: i64 = 7;
pub const CLIENT_ID: i64 = 100;
pub const HAIRCUT: i64 = 1;
pub const COLOUR: i64 = 2;
pub const RETIRED: i64 = 3;

/// Early on the first bookable day.
pub const NOW: PrimitiveDateTime = datetime!(2026-03-02 06:00);

pub fn create_test_actor() -> Actor {
    Actor::new(String::from("reception-1"), String::from("reception"))
}

pub fn create_test_cause() -> Cause {
    Cause::new(String::from("req-456"), String::from("Front desk request"))
}

/// In-memory staff directory and service catalog.
pub struct FakeDirectory {
    pub staff: BTreeMap<i64, BTreeSet<i64>>,
    pub services: Vec<CatalogService>,
    pub fail_lookups: bool,
}

impl FakeDirectory {
    pub fn new() -> Self {
        Self {
            staff: BTreeMap::from([(SCHEDULE_ID, BTreeSet::from([STAFF_ID]))]),
            services: vec![
                CatalogService::new("Haircut", 30)
                    .unwrap()
                    .with_service_id(HAIRCUT),
                CatalogService::new("Colour", 60)
                    .unwrap()
                    .with_service_id(COLOUR),
                CatalogService::new("Retired", 30)
                    .unwrap()
                    .with_service_id(RETIRED)
                    .with_active(false),
            ],
            fail_lookups: false,
        }
    }
}

impl StaffDirectory for FakeDirectory {
    type Error = String;

    fn is_staff_member(&mut self, schedule_id: i64, staff_id: i64) -> Result<bool, String> {
        if self.fail_lookups {
            return Err(String::from("directory offline"));
        }
        Ok(self
            .staff
            .get(&schedule_id)
            .is_some_and(|members| members.contains(&staff_id)))
    }

    fn list_staff_for(&mut self, schedule_id: i64) -> Result<BTreeSet<i64>, String> {
        Ok(self.staff.get(&schedule_id).cloned().unwrap_or_default())
    }
}

impl ServiceCatalog for FakeDirectory {
    type Error = String;

    fn resolve_services(&mut self, service_ids: &[i64]) -> Result<Vec<CatalogService>, String> {
        if self.fail_lookups {
            return Err(String::from("catalog offline"));
        }
        Ok(self
            .services
            .iter()
            .filter(|s| s.service_id().is_some_and(|id| service_ids.contains(&id)))
            .cloned()
            .collect())
    }
}

/// Weekdays in March 2026, 08:00 to 10:00, staffed by `STAFF_ID`.
pub fn create_test_schedule() -> ScheduleDefinition {
    ScheduleDefinition::new(
        "March mornings",
        [STAFF_ID],
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        WeekdaySet::WORKWEEK,
        time!(08:00),
        time!(10:00),
    )
    .unwrap()
    .with_schedule_id(SCHEDULE_ID)
}

pub fn create_request(start_at: PrimitiveDateTime, service_ids: &[i64]) -> BookingRequest {
    BookingRequest {
        client_id: CLIENT_ID,
        staff_id: STAFF_ID,
        schedule_id: SCHEDULE_ID,
        start_at,
        service_ids: service_ids.to_vec(),
    }
}

/// A persisted pending haircut at 08:30 on Monday 2026-03-02.
pub fn create_saved_appointment() -> Appointment {
    Appointment::new(
        CLIENT_ID,
        STAFF_ID,
        SCHEDULE_ID,
        datetime!(2026-03-02 08:30),
        vec![AppointmentService {
            service_id: HAIRCUT,
            duration_minutes: 30,
        }],
        SlotLength::DEFAULT,
    )
    .with_appointment_id(42)
}

pub fn strict_rules() -> BookingRules {
    BookingRules {
        completion_policy: agenda_domain::CompletionPolicy::RequireInProgress,
        ..BookingRules::default()
    }
}
