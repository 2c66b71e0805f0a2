// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Closed weekday sets for recurring schedule windows.
//!
//! A set is stored as a seven-bit integer: bit 0 is Monday and bit 6 is
//! Sunday. The same encoding is used in persistence.

use crate::error::DomainError;
use time::Weekday;

const ALL_BITS: u8 = 0b0111_1111;

const ORDERED: [Weekday; 7] = [
    Weekday::Monday,
    Weekday::Tuesday,
    Weekday::Wednesday,
    Weekday::Thursday,
    Weekday::Friday,
    Weekday::Saturday,
    Weekday::Sunday,
];

/// A set of weekdays on which a schedule applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    /// The empty set.
    pub const EMPTY: Self = Self(0);

    /// Monday through Friday.
    pub const WORKWEEK: Self = Self(0b0001_1111);

    /// Builds a set from individual weekdays.
    pub fn from_weekdays(days: impl IntoIterator<Item = Weekday>) -> Self {
        days.into_iter().fold(Self::EMPTY, |set, day| set.with(day))
    }

    /// Restores a set from its persisted bit representation.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekdayBits` if any bit above Sunday is set
    /// or the value is negative.
    pub fn from_bits(bits: i32) -> Result<Self, DomainError> {
        u8::try_from(bits)
            .ok()
            .filter(|b| b & !ALL_BITS == 0)
            .map(Self)
            .ok_or(DomainError::InvalidWeekdayBits(bits))
    }

    /// Returns the persisted bit representation.
    #[must_use]
    pub fn bits(self) -> i32 {
        i32::from(self.0)
    }

    /// Returns a copy of this set including `day`.
    #[must_use]
    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | bit(day))
    }

    #[must_use]
    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & bit(day) != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Iterates the member weekdays, Monday first.
    pub fn iter(self) -> impl Iterator<Item = Weekday> {
        ORDERED.into_iter().filter(move |day| self.contains(*day))
    }

    /// Returns the lowercase names of the member weekdays, Monday first.
    #[must_use]
    pub fn names(self) -> Vec<&'static str> {
        self.iter().map(weekday_name).collect()
    }

    /// Parses a list of weekday names such as `"monday"` or `"Tue"`.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidWeekday` for the first unrecognised name.
    pub fn parse_names<S: AsRef<str>>(names: &[S]) -> Result<Self, DomainError> {
        names.iter().try_fold(Self::EMPTY, |set, name| {
            parse_weekday(name.as_ref()).map(|day| set.with(day))
        })
    }
}

const fn bit(day: Weekday) -> u8 {
    1 << day.number_days_from_monday()
}

/// Returns the lowercase English name of a weekday.
#[must_use]
pub const fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Monday => "monday",
        Weekday::Tuesday => "tuesday",
        Weekday::Wednesday => "wednesday",
        Weekday::Thursday => "thursday",
        Weekday::Friday => "friday",
        Weekday::Saturday => "saturday",
        Weekday::Sunday => "sunday",
    }
}

/// Parses a weekday from its English name or three-letter abbreviation.
///
/// Matching is case-insensitive.
///
/// # Errors
///
/// Returns `DomainError::InvalidWeekday` if the name is not recognised.
pub fn parse_weekday(name: &str) -> Result<Weekday, DomainError> {
    let normalized = name.trim().to_ascii_lowercase();
    ORDERED
        .into_iter()
        .find(|day| {
            let full = weekday_name(*day);
            normalized == full || (normalized.len() == 3 && full.starts_with(&normalized))
        })
        .ok_or_else(|| DomainError::InvalidWeekday(name.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_monday_is_bit_zero_and_sunday_bit_six() {
        assert_eq!(WeekdaySet::from_weekdays([Weekday::Monday]).bits(), 1);
        assert_eq!(WeekdaySet::from_weekdays([Weekday::Sunday]).bits(), 64);
    }

    #[test]
    fn test_from_bits_rejects_high_bits() {
        assert!(WeekdaySet::from_bits(0b0111_1111).is_ok());
        assert!(matches!(
            WeekdaySet::from_bits(0b1000_0000),
            Err(DomainError::InvalidWeekdayBits(128))
        ));
        assert!(WeekdaySet::from_bits(-1).is_err());
    }

    #[test]
    fn test_workweek_membership() {
        let set = WeekdaySet::WORKWEEK;
        assert!(set.contains(Weekday::Friday));
        assert!(!set.contains(Weekday::Saturday));
        assert_eq!(set.iter().count(), 5);
    }

    #[test]
    fn test_parse_names_accepts_abbreviations() {
        let set = WeekdaySet::parse_names(&["Mon", "wednesday", " FRI "]).unwrap();
        assert_eq!(set.names(), vec!["monday", "wednesday", "friday"]);
    }

    #[test]
    fn test_parse_names_rejects_unknown() {
        let result = WeekdaySet::parse_names(&["monday", "funday"]);
        assert_eq!(result, Err(DomainError::InvalidWeekday(String::from("funday"))));
    }
}
