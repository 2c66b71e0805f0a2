// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod appointment;
mod availability;
mod clock;
mod error;
mod interval;
mod schedule;
mod service;
mod slot;
mod weekday;

#[cfg(test)]
mod tests;

pub use appointment::{Appointment, AppointmentStatus, CompletionPolicy, total_duration};
pub use availability::{StaffAvailability, resolve_availability};
pub use clock::{
    BusinessClock, format_date, format_time_of_day, format_wall_clock, parse_date,
    parse_time_of_day, parse_wall_clock,
};
pub use error::DomainError;
pub use interval::{end_of, find_conflict, intervals_overlap};
pub use schedule::ScheduleDefinition;
pub use service::{AppointmentService, CatalogService, join_ids, resolve_service_lines};
pub use slot::{Slot, SlotLength, generate_slots};
pub use weekday::{WeekdaySet, parse_weekday, weekday_name};
