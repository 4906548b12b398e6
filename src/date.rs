use std::str::FromStr;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::consts::{DATE_SEPARATOR, DAYS_PER_WEEK, MIN_DAY};
use crate::prelude::*;
use crate::types::{DayOfMonth, Month, Year, days_in_month};
use crate::DateError;

/// Seconds in one civil day
const SECONDS_PER_DAY: u64 = 86_400;

/// Weekday of 1970-01-01 (Thursday, Sunday = 0)
const EPOCH_WEEKDAY: i64 = 4;

/// A concrete Gregorian date.
///
/// Equality, hashing and ordering are defined on the `(year, month, day)` triple only,
/// which is all this type holds. Annotated cells wrap it (see [`Day`](crate::Day)).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "{:04}-{:02}-{:02}", "year.get()", "month.get()", "day.get()")]
pub struct Date {
    year:  Year,
    month: Month,
    day:   DayOfMonth,
}

impl Date {
    /// Creates a validated date.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear`, `InvalidMonth` or `InvalidDay` when the triple
    /// does not name a real Gregorian day.
    pub fn new(year: u16, month: u8, day: u8) -> Result<Self, DateError> {
        Ok(Self {
            year:  Year::new(year)?,
            month: Month::new(month)?,
            day:   DayOfMonth::new(day, year, month)?,
        })
    }

    /// Const counterpart of [`Date::new`], used for built-in defaults.
    pub(crate) const fn checked(year: u16, month: u8, day: u8) -> Option<Self> {
        match (
            Year::checked(year),
            Month::checked(month),
            DayOfMonth::checked(day, year, month),
        ) {
            (Some(year), Some(month), Some(day)) => Some(Self { year, month, day }),
            _ => None,
        }
    }

    /// First day of the given month.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid year or month.
    pub fn first_of_month(year: u16, month: u8) -> Result<Self, DateError> {
        Self::new(year, month, MIN_DAY)
    }

    /// Last day of the given month.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid year or month.
    pub fn last_of_month(year: u16, month: u8) -> Result<Self, DateError> {
        Month::new(month)?;
        Self::new(year, month, days_in_month(year, month))
    }

    /// Today's date in UTC, read from the system clock.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the clock is set outside the representable years.
    pub fn today() -> Result<Self, DateError> {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        Self::from_ordinal(i64::try_from(secs / SECONDS_PER_DAY).unwrap_or(i64::MAX))
    }

    pub const fn year(&self) -> u16 {
        self.year.get()
    }

    pub const fn month(&self) -> u8 {
        self.month.get()
    }

    pub const fn day(&self) -> u8 {
        self.day.get()
    }

    /// Days since 1970-01-01 (negative before it).
    pub const fn ordinal(&self) -> i64 {
        days_from_civil(self.year.get() as i64, self.month.get() as i64, self.day.get() as i64)
    }

    /// Inverse of [`Date::ordinal`].
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` when the day lands outside years 1..=9999.
    pub fn from_ordinal(days: i64) -> Result<Self, DateError> {
        let (year, month, day) = civil_from_days(days);
        let year = u16::try_from(year).map_err(|_| DateError::InvalidYear(0))?;
        Self::new(year, month, day)
    }

    /// Day of the week, Sunday = 0 through Saturday = 6.
    pub const fn weekday(&self) -> u8 {
        (self.ordinal() + EPOCH_WEEKDAY).rem_euclid(DAYS_PER_WEEK as i64) as u8
    }

    /// Saturday or Sunday
    pub const fn is_weekend(&self) -> bool {
        let week = self.weekday();
        week == 0 || week == 6
    }

    pub const fn is_leap_year(&self) -> bool {
        self.year.is_leap()
    }

    /// Number of days in this date's month
    pub const fn days_in_month(&self) -> u8 {
        days_in_month(self.year.get(), self.month.get())
    }

    /// Shifts by a signed number of days.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` when the result leaves years 1..=9999.
    pub fn add_days(&self, days: i64) -> Result<Self, DateError> {
        Self::from_ordinal(self.ordinal() + days)
    }

    /// The following day, if representable
    pub fn succ(&self) -> Option<Self> {
        self.add_days(1).ok()
    }

    /// The preceding day, if representable
    pub fn pred(&self) -> Option<Self> {
        self.add_days(-1).ok()
    }

    /// `self - other` in whole days.
    pub const fn differ(&self, other: &Self) -> i64 {
        self.ordinal() - other.ordinal()
    }

    /// Normalized `YYYYMMDD` key used by scheme and multi-selection maps.
    pub fn key(&self) -> String {
        format!("{:04}{:02}{:02}", self.year.get(), self.month.get(), self.day.get())
    }

    pub fn is_same_month(&self, other: &Self) -> bool {
        self.year == other.year && self.month == other.month
    }

    fn parse_u16(s: &str) -> Result<u16, DateError> {
        s.parse::<u16>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    fn parse_u8(s: &str) -> Result<u8, DateError> {
        s.parse::<u8>()
            .map_err(|_| DateError::InvalidFormat(s.to_owned()))
    }

    fn parse_iso(parts: &[&str]) -> Result<Self, DateError> {
        let [year, month, day] = parts else {
            return Err(DateError::InvalidFormat(format!(
                "Expected 2 {DATE_SEPARATOR} separators, found {}",
                parts.len().saturating_sub(1)
            )));
        };
        Self::new(Self::parse_u16(year)?, Self::parse_u8(month)?, Self::parse_u8(day)?)
    }

    fn parse_compact(s: &str) -> Result<Self, DateError> {
        if s.len() != 8 || !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DateError::InvalidFormat(s.to_owned()));
        }
        Self::new(
            Self::parse_u16(&s[..4])?,
            Self::parse_u8(&s[4..6])?,
            Self::parse_u8(&s[6..])?,
        )
    }
}

impl FromStr for Date {
    type Err = DateError;

    /// Accepts `YYYY-MM-DD` and the compact key form `YYYYMMDD`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(DateError::EmptyInput);
        }

        if trimmed.contains(DATE_SEPARATOR) {
            let parts: Vec<&str> = trimmed.split(DATE_SEPARATOR).map(str::trim).collect();
            Self::parse_iso(&parts)
        } else {
            Self::parse_compact(trimmed)
        }
    }
}

impl serde::Serialize for Date {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for Date {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

// Proleptic Gregorian day counting relative to 1970-01-01, using 400-year eras.

pub(crate) const fn days_from_civil(year: i64, month: i64, day: i64) -> i64 {
    let y = if month <= 2 { year - 1 } else { year };
    let era = if y >= 0 { y } else { y - 399 } / 400;
    let yoe = y - era * 400;
    let mp = (month + 9) % 12;
    let doy = (153 * mp + 2) / 5 + day - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn civil_from_days(days: i64) -> (i64, u8, u8) {
    let z = days + 719_468;
    let era = if z >= 0 { z } else { z - 146_096 } / 146_097;
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36_524 - doe / 146_096) / 365;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = doy - (153 * mp + 2) / 5 + 1;
    let month = if mp < 10 { mp + 3 } else { mp - 9 };
    let year = yoe + era * 400 + if month <= 2 { 1 } else { 0 };
    (year, month as u8, day as u8)
}
