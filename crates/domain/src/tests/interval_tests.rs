// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use super::helpers::{
    STAFF_A, STAFF_B, create_appointment, create_cancelled_appointment,
};
use crate::{find_conflict, intervals_overlap};
use time::macros::datetime;

#[test]
fn test_touching_intervals_do_not_overlap() {
    assert!(!intervals_overlap(
        datetime!(2026-03-02 08:00),
        30,
        datetime!(2026-03-02 08:30),
        30
    ));
    assert!(!intervals_overlap(
        datetime!(2026-03-02 08:30),
        30,
        datetime!(2026-03-02 08:00),
        30
    ));
}

#[test]
fn test_partial_overlap_detected_both_ways() {
    assert!(intervals_overlap(
        datetime!(2026-03-02 08:00),
        45,
        datetime!(2026-03-02 08:30),
        30
    ));
    assert!(intervals_overlap(
        datetime!(2026-03-02 08:30),
        30,
        datetime!(2026-03-02 08:00),
        45
    ));
}

#[test]
fn test_contained_interval_overlaps() {
    assert!(intervals_overlap(
        datetime!(2026-03-02 08:00),
        120,
        datetime!(2026-03-02 09:00),
        15
    ));
}

#[test]
fn test_identical_intervals_overlap() {
    assert!(intervals_overlap(
        datetime!(2026-03-02 09:00),
        30,
        datetime!(2026-03-02 09:00),
        30
    ));
}

#[test]
fn test_find_conflict_ignores_cancelled_and_other_staff() {
    let start = datetime!(2026-03-02 09:00);
    let existing = vec![
        create_cancelled_appointment(STAFF_A, start, 30),
        create_appointment(STAFF_B, start, 30),
    ];

    assert!(find_conflict(STAFF_A, start, 30, &existing, None).is_none());
    assert!(find_conflict(STAFF_B, start, 30, &existing, None).is_some());
}

#[test]
fn test_find_conflict_skips_excluded_appointment() {
    let start = datetime!(2026-03-02 09:00);
    let existing = vec![create_appointment(STAFF_A, start, 30).with_appointment_id(5)];

    assert!(find_conflict(STAFF_A, start, 60, &existing, Some(5)).is_none());
    assert!(find_conflict(STAFF_A, start, 60, &existing, Some(6)).is_some());
}
