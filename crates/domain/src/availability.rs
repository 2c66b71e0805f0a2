// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Free-slot resolution.
//!
//! A candidate slot is free when it starts strictly after `now` and does
//! not overlap any non-cancelled appointment of the same staff member.
//! Availability is reported per staff member and never merged.

use crate::appointment::Appointment;
use crate::interval::find_conflict;
use crate::schedule::ScheduleDefinition;
use crate::slot::{Slot, SlotLength, generate_slots};
use time::{Date, PrimitiveDateTime};

/// Free slots of a single staff member.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaffAvailability {
    pub staff_id: i64,
    pub slots: Vec<Slot>,
}

/// Resolves the free slots of every staff member of a schedule on `date`.
///
/// # Arguments
///
/// * `schedule` - The schedule definition
/// * `date` - The target calendar date
/// * `now` - Current business-local wall-clock time
/// * `length` - Slot length
/// * `appointments` - Existing appointments for the schedule's staff on
///   `date`; cancelled entries and other staff members are ignored
///
/// # Returns
///
/// One entry per staff member in ascending id order. A staff member with no
/// free slots still gets an entry with an empty list.
#[must_use]
pub fn resolve_availability(
    schedule: &ScheduleDefinition,
    date: Date,
    now: PrimitiveDateTime,
    length: SlotLength,
    appointments: &[Appointment],
) -> Vec<StaffAvailability> {
    let candidates = generate_slots(schedule, date, length);

    schedule
        .staff_ids()
        .iter()
        .map(|staff_id| StaffAvailability {
            staff_id: *staff_id,
            slots: candidates
                .iter()
                .filter(|slot| slot.staff_id == *staff_id)
                .filter(|slot| slot.start_at > now)
                .filter(|slot| {
                    find_conflict(
                        slot.staff_id,
                        slot.start_at,
                        slot.duration_minutes,
                        appointments,
                        None,
                    )
                    .is_none()
                })
                .copied()
                .collect(),
        })
        .collect()
}
