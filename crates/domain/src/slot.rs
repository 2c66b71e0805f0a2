// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Candidate slot generation.
//!
//! Slots are derived on demand from a schedule definition and are never
//! stored. For each staff member of the schedule, the daily window of the
//! target date is cut into contiguous, left-aligned slots of a fixed length.
//! A trailing remainder shorter than one slot is dropped.
//!
//! ## Example
//!
//! ```text
//! daily_start = 08:00, daily_end = 10:00, slot length = 30
//! -> 08:00, 08:30, 09:00, 09:30
//!
//! daily_start = 08:00, daily_end = 09:45, slot length = 30
//! -> 08:00, 08:30, 09:00            (09:30-10:00 would overrun)
//! ```

use crate::error::DomainError;
use crate::interval::end_of;
use crate::schedule::ScheduleDefinition;
use time::{Date, Duration, PrimitiveDateTime};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// Length of a candidate slot in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotLength(u32);

impl SlotLength {
    /// The default slot length of 30 minutes.
    pub const DEFAULT: Self = Self(30);

    /// Creates a slot length.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSlotLength` if `minutes` is zero or longer
    /// than one day.
    pub const fn new(minutes: u32) -> Result<Self, DomainError> {
        if minutes == 0 || minutes > MINUTES_PER_DAY {
            return Err(DomainError::InvalidSlotLength { minutes });
        }
        Ok(Self(minutes))
    }

    #[must_use]
    pub const fn minutes(self) -> u32 {
        self.0
    }

    #[must_use]
    pub fn as_duration(self) -> Duration {
        Duration::minutes(i64::from(self.0))
    }
}

impl Default for SlotLength {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A bookable candidate interval for one staff member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub staff_id: i64,
    pub schedule_id: Option<i64>,
    pub start_at: PrimitiveDateTime,
    pub duration_minutes: u32,
}

impl Slot {
    /// Exclusive end of the slot.
    #[must_use]
    pub fn end_at(&self) -> PrimitiveDateTime {
        end_of(self.start_at, self.duration_minutes)
    }
}

/// Generates the candidate slots of a schedule on `date`.
///
/// Slots are ordered by staff id, then by start time. The result is empty
/// when `date` is outside the validity range or on a weekday the schedule
/// does not cover. The active flag is not consulted here.
///
/// # Arguments
///
/// * `schedule` - The schedule definition
/// * `date` - The target calendar date
/// * `length` - Slot length
#[must_use]
pub fn generate_slots(
    schedule: &ScheduleDefinition,
    date: Date,
    length: SlotLength,
) -> Vec<Slot> {
    let starts = slot_starts(schedule, date, length);

    schedule
        .staff_ids()
        .iter()
        .flat_map(|staff_id| {
            starts.iter().map(move |start_at| Slot {
                staff_id: *staff_id,
                schedule_id: schedule.schedule_id(),
                start_at: *start_at,
                duration_minutes: length.minutes(),
            })
        })
        .collect()
}

/// Computes the slot start times of the daily window on `date`.
fn slot_starts(
    schedule: &ScheduleDefinition,
    date: Date,
    length: SlotLength,
) -> Vec<PrimitiveDateTime> {
    if !schedule.applies_on(date) {
        return Vec::new();
    }

    let window_end = PrimitiveDateTime::new(date, schedule.daily_end());
    let mut cursor = PrimitiveDateTime::new(date, schedule.daily_start());
    let mut starts = Vec::new();

    loop {
        let next = end_of(cursor, length.minutes());
        if next > window_end {
            break;
        }
        starts.push(cursor);
        cursor = next;
    }

    starts
}
