// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{
    Appointment, AppointmentService, AppointmentStatus, CompletionPolicy, ScheduleDefinition,
    SlotLength, WeekdaySet,
};
use time::PrimitiveDateTime;
use time::macros::{date, time};

pub const STAFF_A: i64 = 7;
pub const STAFF_B: i64 = 9;
pub const SCHEDULE_ID: i64 = 1;

/// Weekdays in March 2026, 08:00 to 10:00, staffed by `STAFF_A`.
pub fn create_morning_schedule() -> ScheduleDefinition {
    create_schedule_with_staff(&[STAFF_A])
}

pub fn create_schedule_with_staff(staff: &[i64]) -> ScheduleDefinition {
    ScheduleDefinition::new(
        "March mornings",
        staff.iter().copied(),
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        WeekdaySet::WORKWEEK,
        time!(08:00),
        time!(10:00),
    )
    .unwrap()
    .with_schedule_id(SCHEDULE_ID)
}

pub fn create_appointment(
    staff_id: i64,
    start_at: PrimitiveDateTime,
    duration_minutes: u32,
) -> Appointment {
    Appointment::new(
        100,
        staff_id,
        SCHEDULE_ID,
        start_at,
        vec![AppointmentService {
            service_id: 1,
            duration_minutes,
        }],
        SlotLength::new(1).unwrap(),
    )
}

pub fn create_cancelled_appointment(
    staff_id: i64,
    start_at: PrimitiveDateTime,
    duration_minutes: u32,
) -> Appointment {
    let mut appointment = create_appointment(staff_id, start_at, duration_minutes);
    appointment.cancel(Some("client called")).unwrap();
    assert_eq!(appointment.status(), AppointmentStatus::Cancelled);
    appointment
}

pub fn create_appointment_in(status: AppointmentStatus) -> Appointment {
    let start_at = PrimitiveDateTime::new(date!(2026 - 03 - 02), time!(08:00));
    let mut appointment = create_appointment(STAFF_A, start_at, 30);
    let path: &[AppointmentStatus] = match status {
        AppointmentStatus::Pending => &[],
        AppointmentStatus::Confirmed => &[AppointmentStatus::Confirmed],
        AppointmentStatus::InProgress => {
            &[AppointmentStatus::Confirmed, AppointmentStatus::InProgress]
        }
        AppointmentStatus::Completed => &[
            AppointmentStatus::Confirmed,
            AppointmentStatus::InProgress,
            AppointmentStatus::Completed,
        ],
        AppointmentStatus::Cancelled => &[AppointmentStatus::Cancelled],
    };
    for next in path {
        appointment
            .transition_to(*next, CompletionPolicy::RequireInProgress)
            .unwrap();
    }
    appointment
}
