// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Business wall clock and wall-clock text formats.
//!
//! The business operates in a single declared timezone. Every time value
//! inside the scheduling core is a wall-clock `PrimitiveDateTime` in that
//! zone; conversion from a real instant happens here and nowhere else.
//!
//! ## Text formats
//!
//! - Dates: `YYYY-MM-DD`
//! - Times of day: `HH:MM` or `HH:MM:SS`
//! - Wall-clock timestamps: `YYYY-MM-DD HH:MM:SS` (a `T` separator and a
//!   missing seconds field are accepted on input)

use crate::error::DomainError;
use chrono::{DateTime, Datelike, Timelike, Utc};
use chrono_tz::Tz;
use time::macros::format_description;
use time::{Date, Month, PrimitiveDateTime, Time};

/// Converts real instants into the business's wall clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessClock {
    timezone: Tz,
}

impl BusinessClock {
    /// Creates a clock for the named IANA timezone.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidTimezone` if the name is not a known zone.
    pub fn new(timezone: &str) -> Result<Self, DomainError> {
        let timezone: Tz = timezone
            .parse()
            .map_err(|_| DomainError::InvalidTimezone(timezone.to_string()))?;
        Ok(Self { timezone })
    }

    #[must_use]
    pub const fn utc() -> Self {
        Self {
            timezone: chrono_tz::UTC,
        }
    }

    #[must_use]
    pub const fn timezone(&self) -> Tz {
        self.timezone
    }

    /// Returns the current business-local wall-clock time.
    ///
    /// # Errors
    ///
    /// Returns an error if the local calendar fields cannot be represented.
    pub fn now(&self) -> Result<PrimitiveDateTime, DomainError> {
        self.local_from_utc(Utc::now())
    }

    /// Converts a UTC instant into business-local wall-clock time.
    ///
    /// Sub-second precision is dropped.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::DateParseError` if the local calendar fields are
    /// out of range for `time`.
    pub fn local_from_utc(&self, instant: DateTime<Utc>) -> Result<PrimitiveDateTime, DomainError> {
        let local = instant.with_timezone(&self.timezone).naive_local();
        let conversion_error = |error: String| DomainError::DateParseError {
            date_string: local.to_string(),
            error,
        };

        let month = u8::try_from(local.month())
            .ok()
            .and_then(|m| Month::try_from(m).ok())
            .ok_or_else(|| conversion_error(String::from("month out of range")))?;
        let day = u8::try_from(local.day())
            .map_err(|_| conversion_error(String::from("day out of range")))?;
        let date = Date::from_calendar_date(local.year(), month, day)
            .map_err(|e| conversion_error(e.to_string()))?;

        let hour = u8::try_from(local.hour())
            .map_err(|_| conversion_error(String::from("hour out of range")))?;
        let minute = u8::try_from(local.minute())
            .map_err(|_| conversion_error(String::from("minute out of range")))?;
        let second = u8::try_from(local.second())
            .map_err(|_| conversion_error(String::from("second out of range")))?;
        let time =
            Time::from_hms(hour, minute, second).map_err(|e| conversion_error(e.to_string()))?;

        Ok(PrimitiveDateTime::new(date, time))
    }
}

impl Default for BusinessClock {
    fn default() -> Self {
        Self::utc()
    }
}

/// Parses a `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the string is not a valid date.
pub fn parse_date(value: &str) -> Result<Date, DomainError> {
    Date::parse(value.trim(), format_description!("[year]-[month]-[day]")).map_err(|e| {
        DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        }
    })
}

/// Parses a time of day in `HH:MM` or `HH:MM:SS` form.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if neither form matches.
pub fn parse_time_of_day(value: &str) -> Result<Time, DomainError> {
    let trimmed = value.trim();
    let full = if trimmed.matches(':').count() == 1 {
        format!("{trimmed}:00")
    } else {
        trimmed.to_string()
    };
    Time::parse(&full, format_description!("[hour]:[minute]:[second]"))
        .map_err(|e| DomainError::DateParseError {
            date_string: value.to_string(),
            error: e.to_string(),
        })
}

/// Parses a wall-clock timestamp such as `2026-03-02 08:30:00`.
///
/// # Errors
///
/// Returns `DomainError::DateParseError` if the value is not a timestamp.
pub fn parse_wall_clock(value: &str) -> Result<PrimitiveDateTime, DomainError> {
    let normalized = value.trim().replacen('T', " ", 1);
    let (date_part, time_part) =
        normalized
            .split_once(' ')
            .ok_or_else(|| DomainError::DateParseError {
                date_string: value.to_string(),
                error: String::from("expected a date and a time of day"),
            })?;
    let date = parse_date(date_part).map_err(|_| DomainError::DateParseError {
        date_string: value.to_string(),
        error: String::from("invalid date component"),
    })?;
    let time = parse_time_of_day(time_part).map_err(|_| DomainError::DateParseError {
        date_string: value.to_string(),
        error: String::from("invalid time component"),
    })?;
    Ok(PrimitiveDateTime::new(date, time))
}

/// Formats a date as `YYYY-MM-DD`.
#[must_use]
pub fn format_date(date: Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

/// Formats a time of day as `HH:MM:SS`.
#[must_use]
pub fn format_time_of_day(time: Time) -> String {
    format!(
        "{:02}:{:02}:{:02}",
        time.hour(),
        time.minute(),
        time.second()
    )
}

/// Formats a wall-clock timestamp as `YYYY-MM-DD HH:MM:SS`.
///
/// This form sorts lexically in chronological order.
#[must_use]
pub fn format_wall_clock(value: PrimitiveDateTime) -> String {
    format!(
        "{} {}",
        format_date(value.date()),
        format_time_of_day(value.time())
    )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use time::macros::{date, datetime, time};

    #[test]
    fn test_local_from_utc_applies_offset() {
        let clock = BusinessClock::new("America/Bogota").unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 3, 2, 13, 30, 15).unwrap();

        let local = clock.local_from_utc(instant).unwrap();

        assert_eq!(local, datetime!(2026-03-02 08:30:15));
    }

    #[test]
    fn test_local_from_utc_crosses_midnight() {
        let clock = BusinessClock::new("America/New_York").unwrap();
        let instant = Utc.with_ymd_and_hms(2026, 1, 10, 2, 0, 0).unwrap();

        let local = clock.local_from_utc(instant).unwrap();

        assert_eq!(local, datetime!(2026-01-09 21:00:00));
    }

    #[test]
    fn test_unknown_timezone_rejected() {
        let result = BusinessClock::new("Mars/Olympus_Mons");
        assert_eq!(
            result,
            Err(DomainError::InvalidTimezone(String::from(
                "Mars/Olympus_Mons"
            )))
        );
    }

    #[test]
    fn test_parse_time_of_day_accepts_both_forms() {
        assert_eq!(parse_time_of_day("08:00").unwrap(), time!(08:00));
        assert_eq!(parse_time_of_day("17:45:30").unwrap(), time!(17:45:30));
        assert!(parse_time_of_day("8am").is_err());
    }

    #[test]
    fn test_parse_wall_clock_accepts_t_separator() {
        assert_eq!(
            parse_wall_clock("2026-03-02T09:30").unwrap(),
            datetime!(2026-03-02 09:30)
        );
        assert_eq!(
            parse_wall_clock("2026-03-02 09:30:00").unwrap(),
            datetime!(2026-03-02 09:30)
        );
    }

    #[test]
    fn test_parse_wall_clock_rejects_date_only() {
        assert!(matches!(
            parse_wall_clock("2026-03-02"),
            Err(DomainError::DateParseError { .. })
        ));
    }

    #[test]
    fn test_wall_clock_format_is_zero_padded() {
        assert_eq!(format_date(date!(2026 - 03 - 02)), "2026-03-02");
        assert_eq!(
            format_wall_clock(datetime!(2026-03-02 08:05)),
            "2026-03-02 08:05:00"
        );
    }
}
