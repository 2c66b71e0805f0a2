// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Half-open interval arithmetic.
//!
//! `[start, start + duration)` is the only interval shape in the scheduling
//! core. The overlap test here is shared by availability resolution and the
//! booking commit re-check so both always agree.

use crate::appointment::Appointment;
use time::{Duration, PrimitiveDateTime};

/// Returns the exclusive end of an interval.
///
/// Saturates at the maximum representable timestamp.
#[must_use]
pub fn end_of(start: PrimitiveDateTime, duration_minutes: u32) -> PrimitiveDateTime {
    start.saturating_add(Duration::minutes(i64::from(duration_minutes)))
}

/// Returns true if `[a, a + a_minutes)` and `[b, b + b_minutes)` overlap.
///
/// Touching intervals (one ends exactly when the other starts) do not
/// overlap.
#[must_use]
pub fn intervals_overlap(
    a: PrimitiveDateTime,
    a_minutes: u32,
    b: PrimitiveDateTime,
    b_minutes: u32,
) -> bool {
    a < end_of(b, b_minutes) && b < end_of(a, a_minutes)
}

/// Finds the first non-cancelled appointment of `staff_id` that overlaps the
/// candidate interval.
///
/// # Arguments
///
/// * `staff_id` - The staff member being booked
/// * `start_at` - Candidate start
/// * `duration_minutes` - Candidate duration
/// * `existing` - Appointments to check against
/// * `exclude` - An appointment to ignore, used when an appointment is
///   re-checked against its own staff calendar
#[must_use]
pub fn find_conflict<'a>(
    staff_id: i64,
    start_at: PrimitiveDateTime,
    duration_minutes: u32,
    existing: &'a [Appointment],
    exclude: Option<i64>,
) -> Option<&'a Appointment> {
    existing.iter().find(|appointment| {
        appointment.staff_id() == staff_id
            && appointment.status().blocks_calendar()
            && (exclude.is_none() || appointment.appointment_id() != exclude)
            && intervals_overlap(
                start_at,
                duration_minutes,
                appointment.start_at(),
                appointment.duration_minutes(),
            )
    })
}
