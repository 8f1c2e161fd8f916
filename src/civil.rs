// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Civil date + UTC hour, the input of the solar model.
//!
//! [`CivilTime`] keeps the calendar fields exactly as a caller would read
//! them off a clock (full year, 1-based month and day) together with the
//! fractional UTC hour. The almanac formulas work on these fields directly
//! through [`CivilTime::day_number`] rather than on a Julian Date.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc};
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Result, TerminatorError};

/// Days in a common year, used by the day-number formula.
const DAYS_PER_YEAR: i64 = 365;

/// Largest sub-second count of a regular (non-leap) second.
const MAX_NANOS: u32 = 999_999_999;

/// Fractional hour from clock fields: `h + m/60 + s/3600`.
#[inline]
pub fn fractional_hour(hours: u32, minutes: u32, seconds: u32) -> f64 {
    hours as f64 + minutes as f64 / 60.0 + seconds as f64 / 3600.0
}

/// A calendar date with a fractional UTC hour.
///
/// The unchecked constructor [`CivilTime::new`] does no validation: an
/// impossible date is a caller precondition and simply yields a meaningless
/// (but finite) sun position. Use [`CivilTime::try_new`] when the fields come
/// from untrusted input.
#[derive(Debug, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CivilTime {
    /// Full year, e.g. `2012`.
    pub year: i32,
    /// Month of year, `1..=12`.
    pub month: u32,
    /// Day of month, `1..=31`.
    pub day: u32,
    /// Fractional UTC hour, `0.0..=24.0`.
    pub hour: f64,
}

impl CivilTime {
    // ── constructors ──────────────────────────────────────────────────

    /// Create from raw fields without validation.
    #[inline]
    pub const fn new(year: i32, month: u32, day: u32, hour: f64) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// Create from raw fields, rejecting non-existent dates and hours
    /// outside `[0, 24]`.
    pub fn try_new(year: i32, month: u32, day: u32, hour: f64) -> Result<Self> {
        if NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(TerminatorError::InvalidDate { year, month, day });
        }
        if !hour.is_finite() || !(0.0..=24.0).contains(&hour) {
            return Err(TerminatorError::InvalidHour(hour));
        }
        Ok(Self::new(year, month, day, hour))
    }

    /// Create from clock fields (hours, minutes, seconds in UTC).
    #[inline]
    pub fn from_hms(
        year: i32,
        month: u32,
        day: u32,
        hours: u32,
        minutes: u32,
        seconds: u32,
    ) -> Self {
        Self::new(year, month, day, fractional_hour(hours, minutes, seconds))
    }

    // ── day number ────────────────────────────────────────────────────

    /// Day count shared by the declination and hour-angle formulas.
    ///
    /// ```text
    /// N = 365·Y + D + 31·M − 46
    /// M <  3:  N += ⌊(Y − 1) / 4⌋
    /// M >= 3:  N −= ⌊0.4·M + 2.3⌋,  N += ⌊Y / 4⌋
    /// ```
    ///
    /// Floors are truncations toward zero, like the almanac this formula
    /// comes from.
    pub fn day_number(&self) -> i64 {
        let year = self.year as i64;
        let month = self.month as i64;
        let mut n = DAYS_PER_YEAR * year + self.day as i64 + 31 * month - 46;
        if month < 3 {
            n += (year - 1) / 4;
        } else {
            n = n - (0.4 * month as f64 + 2.3) as i64 + (year as f64 / 4.0) as i64;
        }
        n
    }
}

// ── chrono conversions ────────────────────────────────────────────────────

impl From<NaiveDateTime> for CivilTime {
    /// Naive timestamps are read as UTC. A leap second is folded into
    /// second 59, so `hour` stays below 24.
    fn from(datetime: NaiveDateTime) -> Self {
        // chrono encodes a leap second as nanosecond >= 1e9
        let nanos = datetime.nanosecond().min(MAX_NANOS) as f64 / 1e9;
        Self::new(
            datetime.year(),
            datetime.month(),
            datetime.day(),
            fractional_hour(datetime.hour(), datetime.minute(), datetime.second())
                + nanos / 3600.0,
        )
    }
}

impl From<DateTime<Utc>> for CivilTime {
    #[inline]
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::from(datetime.naive_utc())
    }
}

impl fmt::Display for CivilTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:04}-{:02}-{:02} {:.6}h UTC",
            self.year, self.month, self.day, self.hour
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn fractional_hour_combines_clock_fields() {
        assert_eq!(fractional_hour(12, 0, 0), 12.0);
        assert!((fractional_hour(6, 30, 36) - 6.51).abs() < 1e-12);
        assert!((fractional_hour(23, 59, 59) - 23.999_722_222).abs() < 1e-8);
    }

    #[test]
    fn day_number_before_march_uses_previous_leap_count() {
        // 365·2012 + 15 + 31 − 46 + ⌊2011/4⌋
        let t = CivilTime::new(2012, 1, 15, 0.0);
        assert_eq!(t.day_number(), 734_380 + 502);
    }

    #[test]
    fn day_number_from_march_applies_month_correction() {
        // 365·2012 + 21 + 186 − 46 − ⌊4.7⌋ + ⌊503.0⌋
        let t = CivilTime::new(2012, 6, 21, 12.0);
        assert_eq!(t.day_number(), 734_380 + 21 + 186 - 46 - 4 + 503);
    }

    #[test]
    fn day_number_is_continuous_across_month_boundaries() {
        let feb_29 = CivilTime::new(2012, 2, 29, 0.0).day_number();
        let mar_1 = CivilTime::new(2012, 3, 1, 0.0).day_number();
        assert_eq!(mar_1 - feb_29, 1);

        let dec_31 = CivilTime::new(2011, 12, 31, 0.0).day_number();
        let jan_1 = CivilTime::new(2012, 1, 1, 0.0).day_number();
        assert_eq!(jan_1 - dec_31, 1);
    }

    #[test]
    fn day_number_counts_a_leap_year() {
        let start = CivilTime::new(2012, 1, 1, 0.0).day_number();
        let next = CivilTime::new(2013, 1, 1, 0.0).day_number();
        assert_eq!(next - start, 366);
    }

    #[test]
    fn try_new_rejects_impossible_dates() {
        assert_eq!(
            CivilTime::try_new(2012, 2, 30, 0.0),
            Err(TerminatorError::InvalidDate {
                year: 2012,
                month: 2,
                day: 30
            })
        );
        assert!(CivilTime::try_new(2012, 13, 1, 0.0).is_err());
        assert!(CivilTime::try_new(2012, 1, 32, 0.0).is_err());
    }

    #[test]
    fn try_new_rejects_bad_hours() {
        assert_eq!(
            CivilTime::try_new(2012, 6, 21, 25.0),
            Err(TerminatorError::InvalidHour(25.0))
        );
        assert!(CivilTime::try_new(2012, 6, 21, -0.5).is_err());
        assert!(CivilTime::try_new(2012, 6, 21, f64::NAN).is_err());
        assert!(CivilTime::try_new(2012, 6, 21, 24.0).is_ok());
    }

    #[test]
    fn from_datetime_matches_from_hms() {
        let dt = Utc.with_ymd_and_hms(2012, 6, 21, 18, 45, 30).unwrap();
        let from_chrono = CivilTime::from(dt);
        let from_fields = CivilTime::from_hms(2012, 6, 21, 18, 45, 30);
        assert_eq!(from_chrono, from_fields);
    }

    #[test]
    fn from_naive_keeps_subsecond_precision() {
        let naive = NaiveDate::from_ymd_opt(2024, 3, 20)
            .unwrap()
            .and_hms_milli_opt(3, 6, 0, 500)
            .unwrap();
        let t = CivilTime::from(naive);
        let expected = 3.0 + 6.0 / 60.0 + 0.5 / 3600.0;
        assert!((t.hour - expected).abs() < 1e-12);
    }

    #[test]
    fn leap_second_is_folded_into_the_last_second_of_the_day() {
        let leap = NaiveDate::from_ymd_opt(2016, 12, 31)
            .unwrap()
            .and_hms_nano_opt(23, 59, 59, 1_500_000_000)
            .unwrap();
        let t = CivilTime::from(leap);
        assert!(t.hour < 24.0, "hour {}", t.hour);
        assert!(t.hour > fractional_hour(23, 59, 59));
        assert!(CivilTime::try_new(t.year, t.month, t.day, t.hour).is_ok());
    }

    #[test]
    fn display_shows_date_and_hour() {
        let s = format!("{}", CivilTime::new(2012, 6, 21, 12.5));
        assert!(s.starts_with("2012-06-21"));
        assert!(s.contains("12.5"));
    }
}
