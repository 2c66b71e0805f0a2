// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    STAFF_A, STAFF_B, create_appointment, create_cancelled_appointment, create_morning_schedule,
    create_schedule_with_staff,
};
use crate::{SlotLength, StaffAvailability, resolve_availability};
use time::PrimitiveDateTime;
use time::macros::{date, datetime};

const EARLY_MORNING: PrimitiveDateTime = datetime!(2026-03-02 06:00);

fn free_starts(availability: &StaffAvailability) -> Vec<PrimitiveDateTime> {
    availability.slots.iter().map(|s| s.start_at).collect()
}

#[test]
fn test_all_slots_free_without_bookings() {
    let schedule = create_morning_schedule();

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &[],
    );

    assert_eq!(result.len(), 1);
    assert_eq!(result[0].staff_id, STAFF_A);
    assert_eq!(result[0].slots.len(), 4);
}

#[test]
fn test_booked_slot_is_removed() {
    let schedule = create_morning_schedule();
    let bookings = vec![create_appointment(STAFF_A, datetime!(2026-03-02 08:30), 30)];

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &bookings,
    );

    assert_eq!(
        free_starts(&result[0]),
        vec![
            datetime!(2026-03-02 08:00),
            datetime!(2026-03-02 09:00),
            datetime!(2026-03-02 09:30),
        ]
    );
}

#[test]
fn test_long_booking_removes_every_overlapped_slot() {
    let schedule = create_morning_schedule();
    let bookings = vec![create_appointment(STAFF_A, datetime!(2026-03-02 08:15), 60)];

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &bookings,
    );

    // 08:15-09:15 touches 08:00, 08:30 and 09:00
    assert_eq!(free_starts(&result[0]), vec![datetime!(2026-03-02 09:30)]);
}

#[test]
fn test_cancelled_booking_frees_slot() {
    let schedule = create_morning_schedule();
    let bookings = vec![create_cancelled_appointment(
        STAFF_A,
        datetime!(2026-03-02 08:30),
        30,
    )];

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &bookings,
    );

    assert_eq!(result[0].slots.len(), 4);
}

#[test]
fn test_slots_at_or_before_now_are_removed() {
    let schedule = create_morning_schedule();

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        datetime!(2026-03-02 08:30),
        SlotLength::DEFAULT,
        &[],
    );

    assert_eq!(
        free_starts(&result[0]),
        vec![datetime!(2026-03-02 09:00), datetime!(2026-03-02 09:30)]
    );
}

#[test]
fn test_past_date_has_no_availability() {
    let schedule = create_morning_schedule();

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        datetime!(2026-03-03 07:00),
        SlotLength::DEFAULT,
        &[],
    );

    assert!(result[0].slots.is_empty());
}

#[test]
fn test_availability_is_per_staff_member() {
    let schedule = create_schedule_with_staff(&[STAFF_A, STAFF_B]);
    let bookings = vec![create_appointment(STAFF_B, datetime!(2026-03-02 08:00), 30)];

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 02),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &bookings,
    );

    assert_eq!(result.len(), 2);
    assert_eq!(result[0].staff_id, STAFF_A);
    assert_eq!(result[0].slots.len(), 4);
    assert_eq!(result[1].staff_id, STAFF_B);
    assert_eq!(
        free_starts(&result[1]),
        vec![
            datetime!(2026-03-02 08:30),
            datetime!(2026-03-02 09:00),
            datetime!(2026-03-02 09:30),
        ]
    );
}

#[test]
fn test_non_applicable_day_yields_empty_lists_per_staff() {
    let schedule = create_schedule_with_staff(&[STAFF_A, STAFF_B]);

    let result = resolve_availability(
        &schedule,
        date!(2026 - 03 - 07),
        EARLY_MORNING,
        SlotLength::DEFAULT,
        &[],
    );

    assert_eq!(result.len(), 2);
    assert!(result.iter().all(|entry| entry.slots.is_empty()));
}
