// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use agenda::BookingRules;
use agenda_domain::{BusinessClock, CompletionPolicy, DomainError, SlotLength};

/// Runtime configuration shared by every handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingConfig {
    /// Slot length for availability and the minimum appointment duration.
    pub slot_length: SlotLength,
    /// Whether `Confirmed -> Completed` is allowed.
    pub completion_policy: CompletionPolicy,
    /// The business timezone.
    pub clock: BusinessClock,
}

impl BookingConfig {
    /// Builds a configuration from raw settings.
    ///
    /// # Arguments
    ///
    /// * `timezone` - IANA timezone name of the business
    /// * `slot_length_minutes` - Slot length in minutes
    /// * `strict_completion` - Require `InProgress` before `Completed`
    ///
    /// # Errors
    ///
    /// Returns an error if the timezone is unknown or the slot length is out
    /// of range.
    pub fn new(
        timezone: &str,
        slot_length_minutes: u32,
        strict_completion: bool,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            slot_length: SlotLength::new(slot_length_minutes)?,
            completion_policy: if strict_completion {
                CompletionPolicy::RequireInProgress
            } else {
                CompletionPolicy::AllowFromConfirmed
            },
            clock: BusinessClock::new(timezone)?,
        })
    }

    /// The subset of the configuration the core rules consume.
    #[must_use]
    pub const fn rules(&self) -> BookingRules {
        BookingRules {
            slot_length: self.slot_length,
            completion_policy: self.completion_policy,
        }
    }
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            slot_length: SlotLength::DEFAULT,
            completion_policy: CompletionPolicy::AllowFromConfirmed,
            clock: BusinessClock::utc(),
        }
    }
}
