// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Recurring schedule definitions.
//!
//! A schedule definition declares when one or more staff members can be
//! booked: a validity date range, the applicable weekdays, and a daily
//! window. All values are business-local wall-clock values.
//!
//! ## Invariants
//!
//! - `daily_start < daily_end`
//! - `start_date <= end_date`
//! - at least one applicable weekday
//! - at least one staff member
//! - a non-empty name

use crate::error::DomainError;
use crate::interval::end_of;
use crate::weekday::WeekdaySet;
use std::collections::BTreeSet;
use time::{Date, PrimitiveDateTime, Time};

/// A recurring availability window for a set of staff members.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleDefinition {
    /// Persisted identifier; `None` until the schedule is saved.
    schedule_id: Option<i64>,
    name: String,
    staff_ids: BTreeSet<i64>,
    start_date: Date,
    end_date: Date,
    weekdays: WeekdaySet,
    daily_start: Time,
    daily_end: Time,
    active: bool,
}

impl ScheduleDefinition {
    /// Creates a new active schedule definition.
    ///
    /// # Arguments
    ///
    /// * `name` - Administrator-facing label
    /// * `staff_ids` - Staff members bookable under this schedule
    /// * `start_date` - First date the schedule applies (inclusive)
    /// * `end_date` - Last date the schedule applies (inclusive)
    /// * `weekdays` - Weekdays on which the schedule applies
    /// * `daily_start` - Start of the daily window
    /// * `daily_end` - End of the daily window (exclusive for slot starts)
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSchedule` if any invariant is violated.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        name: &str,
        staff_ids: impl IntoIterator<Item = i64>,
        start_date: Date,
        end_date: Date,
        weekdays: WeekdaySet,
        daily_start: Time,
        daily_end: Time,
    ) -> Result<Self, DomainError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DomainError::InvalidSchedule {
                reason: String::from("name cannot be empty"),
            });
        }
        if start_date > end_date {
            return Err(DomainError::InvalidSchedule {
                reason: format!("start date {start_date} is after end date {end_date}"),
            });
        }
        if daily_start >= daily_end {
            return Err(DomainError::InvalidSchedule {
                reason: format!(
                    "daily start {daily_start} must be earlier than daily end {daily_end}"
                ),
            });
        }
        if weekdays.is_empty() {
            return Err(DomainError::InvalidSchedule {
                reason: String::from("at least one weekday is required"),
            });
        }
        let staff_ids = validate_staff(staff_ids)?;

        Ok(Self {
            schedule_id: None,
            name: name.to_string(),
            staff_ids,
            start_date,
            end_date,
            weekdays,
            daily_start,
            daily_end,
            active: true,
        })
    }

    /// Attaches the persisted identifier.
    #[must_use]
    pub const fn with_schedule_id(mut self, schedule_id: i64) -> Self {
        self.schedule_id = Some(schedule_id);
        self
    }

    /// Sets the active flag, used when restoring a stored schedule.
    #[must_use]
    pub const fn with_active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }

    #[must_use]
    pub const fn schedule_id(&self) -> Option<i64> {
        self.schedule_id
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn staff_ids(&self) -> &BTreeSet<i64> {
        &self.staff_ids
    }

    #[must_use]
    pub const fn start_date(&self) -> Date {
        self.start_date
    }

    #[must_use]
    pub const fn end_date(&self) -> Date {
        self.end_date
    }

    #[must_use]
    pub const fn weekdays(&self) -> WeekdaySet {
        self.weekdays
    }

    #[must_use]
    pub const fn daily_start(&self) -> Time {
        self.daily_start
    }

    #[must_use]
    pub const fn daily_end(&self) -> Time {
        self.daily_end
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn has_staff(&self, staff_id: i64) -> bool {
        self.staff_ids.contains(&staff_id)
    }

    /// Returns true if the schedule applies on `date`: the date is inside the
    /// validity range and falls on an applicable weekday.
    #[must_use]
    pub fn applies_on(&self, date: Date) -> bool {
        date >= self.start_date && date <= self.end_date && self.weekdays.contains(date.weekday())
    }

    /// Replaces the staff membership.
    ///
    /// Appointments already booked are not affected.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSchedule` if the new set is empty.
    pub fn replace_staff(
        &mut self,
        staff_ids: impl IntoIterator<Item = i64>,
    ) -> Result<(), DomainError> {
        self.staff_ids = validate_staff(staff_ids)?;
        Ok(())
    }

    pub const fn deactivate(&mut self) {
        self.active = false;
    }

    pub const fn activate(&mut self) {
        self.active = true;
    }

    /// Verifies that an appointment may start at `start_at`.
    ///
    /// The date must be in range and on an applicable weekday, and the time
    /// of day must satisfy `daily_start <= t < daily_end`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutsideScheduleWindow` naming the violated bound.
    pub fn check_start(&self, start_at: PrimitiveDateTime) -> Result<(), DomainError> {
        let date = start_at.date();
        if date < self.start_date || date > self.end_date {
            return Err(DomainError::OutsideScheduleWindow {
                reason: format!(
                    "{date} is outside the validity range {} to {}",
                    self.start_date, self.end_date
                ),
            });
        }
        if !self.weekdays.contains(date.weekday()) {
            return Err(DomainError::OutsideScheduleWindow {
                reason: format!("{} is not an applicable weekday", date.weekday()),
            });
        }
        let time = start_at.time();
        if time < self.daily_start || time >= self.daily_end {
            return Err(DomainError::OutsideScheduleWindow {
                reason: format!(
                    "start time {time} is outside the daily window {} to {}",
                    self.daily_start, self.daily_end
                ),
            });
        }
        Ok(())
    }

    /// Verifies that an interval starting at `start_at` ends no later than
    /// the daily window end on the same day.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::OutsideScheduleWindow` if the interval runs past
    /// `daily_end`.
    pub fn check_end(
        &self,
        start_at: PrimitiveDateTime,
        duration_minutes: u32,
    ) -> Result<(), DomainError> {
        let end = end_of(start_at, duration_minutes);
        let limit = PrimitiveDateTime::new(start_at.date(), self.daily_end);
        if end > limit {
            return Err(DomainError::OutsideScheduleWindow {
                reason: format!(
                    "a {duration_minutes} minute appointment starting at {} ends after {}",
                    start_at.time(),
                    self.daily_end
                ),
            });
        }
        Ok(())
    }
}

fn validate_staff(staff_ids: impl IntoIterator<Item = i64>) -> Result<BTreeSet<i64>, DomainError> {
    let staff_ids: BTreeSet<i64> = staff_ids.into_iter().collect();
    if staff_ids.is_empty() {
        return Err(DomainError::InvalidSchedule {
            reason: String::from("at least one staff member is required"),
        });
    }
    Ok(staff_ids)
}
