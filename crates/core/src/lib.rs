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

mod apply;
mod booking;
mod command;
mod directory;
mod error;
mod notify;
mod state;

#[cfg(test)]
mod tests;

// Re-export public types and functions
pub use apply::{apply, apply_catalog, apply_deletion, apply_schedule};
pub use booking::{BookingRequest, prepare_booking, resolve_services};
pub use command::{CatalogCommand, Command, ScheduleCommand};
pub use directory::{ClientDirectory, ServiceCatalog, StaffDirectory};
pub use error::{BookingError, CoreError};
pub use notify::{LifecycleEvent, LifecycleEventKind, LifecycleNotifier, NotifyError, dispatch};
pub use state::{
    BookingRules, CatalogTransition, PreparedBooking, ScheduleTransition, TransitionResult,
    appointment_snapshot, schedule_snapshot, service_snapshot,
};
