use crate::DateError;
use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE, LEAP_YEAR_CYCLE,
    MAX_MONTH, MAX_YEAR, MIN_YEAR,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroU8;
use std::num::NonZeroU16;

/// Gregorian year in `MIN_YEAR..=MAX_YEAR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub struct Year(NonZeroU16);

impl Year {
    /// Validated year.
    ///
    /// # Errors
    /// Returns `DateError::InvalidYear` if the value is 0 or > `MAX_YEAR`.
    pub fn new(value: u16) -> Result<Self, DateError> {
        Self::checked(value).ok_or(DateError::InvalidYear(value))
    }

    /// Const counterpart of [`Year::new`]
    pub(crate) const fn checked(value: u16) -> Option<Self> {
        if value < MIN_YEAR || value > MAX_YEAR {
            return None;
        }
        match NonZeroU16::new(value) {
            Some(non_zero) => Some(Self(non_zero)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u16 {
        self.0.get()
    }

    /// Whether this year has a February 29th
    #[inline]
    pub const fn is_leap(self) -> bool {
        is_leap_year(self.0.get())
    }
}

impl TryFrom<u16> for Year {
    type Error = DateError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Year> for u16 {
    fn from(year: Year) -> Self {
        year.0.get()
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Month number, January = 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Month(NonZeroU8);

impl Month {
    /// Validated month.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the value is 0 or > `MAX_MONTH`.
    pub fn new(value: u8) -> Result<Self, DateError> {
        Self::checked(value).ok_or(DateError::InvalidMonth(value))
    }

    /// Const counterpart of [`Month::new`]
    pub(crate) const fn checked(value: u8) -> Option<Self> {
        if value > MAX_MONTH {
            return None;
        }
        match NonZeroU8::new(value) {
            Some(non_zero) => Some(Self(non_zero)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl TryFrom<u8> for Month {
    type Error = DateError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Month> for u8 {
    fn from(month: Month) -> Self {
        month.0.get()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Day of month, checked against the month it was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DayOfMonth(NonZeroU8);

impl DayOfMonth {
    /// Validated day of `year`-`month`.
    ///
    /// # Errors
    /// Returns `DateError::InvalidDay` if the value is 0 or past the end of the month.
    pub fn new(value: u8, year: u16, month: u8) -> Result<Self, DateError> {
        let invalid = DateError::InvalidDay {
            year,
            month,
            day: value,
        };
        if month == 0 || month > MAX_MONTH {
            return Err(DateError::InvalidMonth(month));
        }
        Self::checked(value, year, month).ok_or(invalid)
    }

    /// Const counterpart of [`DayOfMonth::new`]
    pub(crate) const fn checked(value: u8, year: u16, month: u8) -> Option<Self> {
        if month == 0 || month > MAX_MONTH || value > days_in_month(year, month) {
            return None;
        }
        match NonZeroU8::new(value) {
            Some(non_zero) => Some(Self(non_zero)),
            None => None,
        }
    }

    #[inline]
    pub const fn get(self) -> u8 {
        self.0.get()
    }
}

impl From<DayOfMonth> for u8 {
    fn from(day: DayOfMonth) -> Self {
        day.0.get()
    }
}

impl fmt::Display for DayOfMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

pub const fn is_leap_year(year: u16) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: u16, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
