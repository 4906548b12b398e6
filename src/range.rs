use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LUNAR_YEAR, MIN_LUNAR_YEAR, RANGE_SEPARATOR};
use crate::{Date, DateError, prelude::*};

const DEFAULT_MIN: Date = match Date::checked(1971, 1, 1) {
    Some(date) => date,
    None => panic!("default domain minimum is not a date"),
};

const DEFAULT_MAX: Date = match Date::checked(2055, 12, 31) {
    Some(date) => date,
    None => panic!("default domain maximum is not a date"),
};

/// The inclusive span of dates a calendar may display and select.
/// Both ends lie inside the lunar table and `min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{min}/{max}")]
pub struct DateDomain {
    min: Date,
    max: Date,
}

/// Error type for date domain operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// Minimum is after maximum.
    #[error("Invalid date domain: min ({min}) is after max ({max})")]
    InvalidRange { min: Date, max: Date },

    /// Bound outside the years the lunar table covers.
    #[error("Domain bound {date} is outside {}-{}", MIN_LUNAR_YEAR, MAX_LUNAR_YEAR)]
    OutOfLunarDomain { date: Date },

    /// Error parsing a bound.
    #[error(transparent)]
    Date(#[from] DateError),

    /// Invalid domain format.
    #[error("Invalid domain format: {0}")]
    InvalidFormat(String),
}

impl Default for DateDomain {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN,
            max: DEFAULT_MAX,
        }
    }
}

impl DateDomain {
    /// Creates a domain with validation.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidRange` if min > max and `DomainError::OutOfLunarDomain`
    /// if either bound lies outside 1900-2099.
    pub fn new(min: Date, max: Date) -> Result<Self, DomainError> {
        for date in [min, max] {
            if !(MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&date.year()) {
                return Err(DomainError::OutOfLunarDomain { date });
            }
        }
        if min > max {
            return Err(DomainError::InvalidRange { min, max });
        }
        Ok(Self { min, max })
    }

    pub const fn min(&self) -> Date {
        self.min
    }

    pub const fn max(&self) -> Date {
        self.max
    }

    pub fn contains(&self, date: &Date) -> bool {
        self.min <= *date && *date <= self.max
    }

    pub fn is_before_min(&self, date: &Date) -> bool {
        *date < self.min
    }

    pub fn is_after_max(&self, date: &Date) -> bool {
        *date > self.max
    }

    /// Whether any day of the month lies in the domain
    pub fn is_month_in_range(&self, year: u16, month: u8) -> bool {
        let key = (year, month);
        (self.min.year(), self.min.month()) <= key && key <= (self.max.year(), self.max.month())
    }

    /// The date itself when inside the domain, otherwise the nearer bound.
    pub fn edge_for(&self, date: &Date) -> Date {
        if self.is_before_min(date) {
            self.min
        } else if self.is_after_max(date) {
            self.max
        } else {
            *date
        }
    }

    /// Number of days in the domain, both bounds included
    pub const fn day_count(&self) -> i64 {
        self.max.differ(&self.min) + 1
    }
}

impl FromStr for DateDomain {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let separator_count = trimmed.matches(RANGE_SEPARATOR).count();

        match separator_count {
            0 => Err(DomainError::InvalidFormat(format!(
                "No domain separator found (expected '{RANGE_SEPARATOR}'): {s}"
            ))),
            1 => {
                let (min, max) = trimmed.split_once(RANGE_SEPARATOR).ok_or_else(|| {
                    DomainError::InvalidFormat(format!("Separator '{RANGE_SEPARATOR}' not found despite count == 1"))
                })?;
                Self::new(min.trim().parse()?, max.trim().parse()?)
            },
            _ => Err(DomainError::InvalidFormat(format!(
                "Too many '{RANGE_SEPARATOR}' separators: expected 1, found {separator_count}"
            ))),
        }
    }
}

impl Serialize for DateDomain {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for DateDomain {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
