// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{STAFF_A, STAFF_B, create_morning_schedule, create_schedule_with_staff};
use crate::{DomainError, ScheduleDefinition, SlotLength, WeekdaySet, generate_slots};
use time::PrimitiveDateTime;
use time::macros::{date, datetime, time};

fn starts(schedule: &ScheduleDefinition, date: time::Date, minutes: u32) -> Vec<PrimitiveDateTime> {
    generate_slots(schedule, date, SlotLength::new(minutes).unwrap())
        .into_iter()
        .map(|slot| slot.start_at)
        .collect()
}

#[test]
fn test_two_hour_window_yields_four_half_hour_slots() {
    let schedule = create_morning_schedule();

    let slots = generate_slots(&schedule, date!(2026 - 03 - 02), SlotLength::DEFAULT);

    let starts: Vec<PrimitiveDateTime> = slots.iter().map(|s| s.start_at).collect();
    assert_eq!(
        starts,
        vec![
            datetime!(2026-03-02 08:00),
            datetime!(2026-03-02 08:30),
            datetime!(2026-03-02 09:00),
            datetime!(2026-03-02 09:30),
        ]
    );
    assert!(slots.iter().all(|s| s.staff_id == STAFF_A));
    assert!(slots.iter().all(|s| s.duration_minutes == 30));
    assert!(slots.iter().all(|s| s.schedule_id == Some(1)));
}

#[test]
fn test_slots_are_contiguous() {
    let schedule = create_morning_schedule();

    let slots = generate_slots(&schedule, date!(2026 - 03 - 02), SlotLength::new(20).unwrap());

    for pair in slots.windows(2) {
        assert_eq!(pair[0].end_at(), pair[1].start_at);
    }
    assert_eq!(slots.len(), 6);
}

#[test]
fn test_trailing_remainder_is_dropped() {
    let schedule = ScheduleDefinition::new(
        "Short",
        [STAFF_A],
        date!(2026 - 03 - 01),
        date!(2026 - 03 - 31),
        WeekdaySet::WORKWEEK,
        time!(08:00),
        time!(09:45),
    )
    .unwrap();

    assert_eq!(
        starts(&schedule, date!(2026 - 03 - 02), 30),
        vec![
            datetime!(2026-03-02 08:00),
            datetime!(2026-03-02 08:30),
            datetime!(2026-03-02 09:00),
        ]
    );
}

#[test]
fn test_slot_longer_than_window_yields_nothing() {
    let schedule = create_morning_schedule();

    assert!(starts(&schedule, date!(2026 - 03 - 02), 180).is_empty());
}

#[test]
fn test_no_slots_outside_validity_range() {
    let schedule = create_morning_schedule();

    assert!(starts(&schedule, date!(2026 - 02 - 27), 30).is_empty());
    assert!(starts(&schedule, date!(2026 - 04 - 01), 30).is_empty());
}

#[test]
fn test_validity_range_is_inclusive() {
    let schedule = create_morning_schedule();

    // 2026-03-31 is a Tuesday
    assert_eq!(starts(&schedule, date!(2026 - 03 - 31), 30).len(), 4);
}

#[test]
fn test_no_slots_on_non_applicable_weekday() {
    let schedule = create_morning_schedule();

    // Saturday and Sunday
    assert!(starts(&schedule, date!(2026 - 03 - 07), 30).is_empty());
    assert!(starts(&schedule, date!(2026 - 03 - 08), 30).is_empty());
}

#[test]
fn test_generation_is_deterministic() {
    let schedule = create_morning_schedule();

    let first = generate_slots(&schedule, date!(2026 - 03 - 04), SlotLength::DEFAULT);
    let second = generate_slots(&schedule, date!(2026 - 03 - 04), SlotLength::DEFAULT);

    assert_eq!(first, second);
}

#[test]
fn test_each_staff_member_gets_own_slots() {
    let schedule = create_schedule_with_staff(&[STAFF_B, STAFF_A]);

    let slots = generate_slots(&schedule, date!(2026 - 03 - 02), SlotLength::DEFAULT);

    assert_eq!(slots.len(), 8);
    assert!(slots[..4].iter().all(|s| s.staff_id == STAFF_A));
    assert!(slots[4..].iter().all(|s| s.staff_id == STAFF_B));
}

#[test]
fn test_slot_length_bounds() {
    assert_eq!(
        SlotLength::new(0),
        Err(DomainError::InvalidSlotLength { minutes: 0 })
    );
    assert_eq!(
        SlotLength::new(1441),
        Err(DomainError::InvalidSlotLength { minutes: 1441 })
    );
    assert_eq!(SlotLength::new(1440).unwrap().minutes(), 1440);
    assert_eq!(SlotLength::default().minutes(), 30);
}
