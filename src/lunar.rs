//! Gregorian to lunar conversion backed by the embedded 1900-2100 year table.
//!
//! Each table row packs one lunar year:
//! - bits 0-3: number of the leap month, 0 when the year has none
//! - bits 4-15: lengths of months 1-12, month 1 in bit 15, set = 30 days, clear = 29
//! - bit 16: length of the leap month, set = 30 days
//!
//! Lunar 1900-01-01 fell on Gregorian 1900-01-31, every other new year is found by
//! summing year lengths from there.

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_LUNAR_YEAR, MAX_MONTH, MIN_DAY, MIN_LUNAR_YEAR};
use crate::date::{Date, days_from_civil};
use crate::DateError;

const LUNAR_INFO: [u32; 201] = [
    0x04bd8, 0x04ae0, 0x0a570, 0x054d5, 0x0d260, 0x0d950, 0x16554, 0x056a0, 0x09ad0, 0x055d2, // 1900-1909
    0x04ae0, 0x0a5b6, 0x0a4d0, 0x0d250, 0x1d255, 0x0b540, 0x0d6a0, 0x0ada2, 0x095b0, 0x14977, // 1910-1919
    0x04970, 0x0a4b0, 0x0b4b5, 0x06a50, 0x06d40, 0x1ab54, 0x02b60, 0x09570, 0x052f2, 0x04970, // 1920-1929
    0x06566, 0x0d4a0, 0x0ea50, 0x06e95, 0x05ad0, 0x02b60, 0x186e3, 0x092e0, 0x1c8d7, 0x0c950, // 1930-1939
    0x0d4a0, 0x1d8a6, 0x0b550, 0x056a0, 0x1a5b4, 0x025d0, 0x092d0, 0x0d2b2, 0x0a950, 0x0b557, // 1940-1949
    0x06ca0, 0x0b550, 0x15355, 0x04da0, 0x0a5b0, 0x14573, 0x052b0, 0x0a9a8, 0x0e950, 0x06aa0, // 1950-1959
    0x0aea6, 0x0ab50, 0x04b60, 0x0aae4, 0x0a570, 0x05260, 0x0f263, 0x0d950, 0x05b57, 0x056a0, // 1960-1969
    0x096d0, 0x04dd5, 0x04ad0, 0x0a4d0, 0x0d4d4, 0x0d250, 0x0d558, 0x0b540, 0x0b6a0, 0x195a6, // 1970-1979
    0x095b0, 0x049b0, 0x0a974, 0x0a4b0, 0x0b27a, 0x06a50, 0x06d40, 0x0af46, 0x0ab60, 0x09570, // 1980-1989
    0x04af5, 0x04970, 0x064b0, 0x074a3, 0x0ea50, 0x06b58, 0x055c0, 0x0ab60, 0x096d5, 0x092e0, // 1990-1999
    0x0c960, 0x0d954, 0x0d4a0, 0x0da50, 0x07552, 0x056a0, 0x0abb7, 0x025d0, 0x092d0, 0x0cab5, // 2000-2009
    0x0a950, 0x0b4a0, 0x0baa4, 0x0ad50, 0x055d9, 0x04ba0, 0x0a5b0, 0x15176, 0x052b0, 0x0a930, // 2010-2019
    0x07954, 0x06aa0, 0x0ad50, 0x05b52, 0x04b60, 0x0a6e6, 0x0a4e0, 0x0d260, 0x0ea65, 0x0d530, // 2020-2029
    0x05aa0, 0x076a3, 0x096d0, 0x04afb, 0x04ad0, 0x0a4d0, 0x1d0b6, 0x0d250, 0x0d520, 0x0dd45, // 2030-2039
    0x0b5a0, 0x056d0, 0x055b2, 0x049b0, 0x0a577, 0x0a4b0, 0x0aa50, 0x1b255, 0x06d20, 0x0ada0, // 2040-2049
    0x14b63, 0x09370, 0x049f8, 0x04970, 0x064b0, 0x168a6, 0x0ea50, 0x06b20, 0x1a6c4, 0x0aae0, // 2050-2059
    0x0a2e0, 0x0d2e3, 0x0c960, 0x0d557, 0x0d4a0, 0x0da50, 0x05d55, 0x056a0, 0x0a6d0, 0x055d4, // 2060-2069
    0x052d0, 0x0a9b8, 0x0a950, 0x0b4a0, 0x0b6a6, 0x0ad50, 0x055a0, 0x0aba4, 0x0a5b0, 0x052b0, // 2070-2079
    0x0b273, 0x06930, 0x07337, 0x06aa0, 0x0ad50, 0x14b55, 0x04b60, 0x0a570, 0x054e4, 0x0d160, // 2080-2089
    0x0e968, 0x0d520, 0x0daa0, 0x16aa6, 0x056d0, 0x04ae0, 0x0a9d4, 0x0a2d0, 0x0d150, 0x0f252, // 2090-2099
    0x0d520, // 2100
];

/// Days since 1970-01-01 of lunar 1900-01-01
const EPOCH_ORDINAL: i64 = days_from_civil(1900, 1, 31);

/// Mask of the month 1 length bit, month `m` is at `MONTH_BIT >> m`
const MONTH_BIT: u32 = 0x10000;
const LEAP_MONTH_MASK: u32 = 0xf;
const SMALL_MONTH_DAYS: u8 = 29;
const BIG_MONTH_DAYS: u8 = 30;

/// Offset in days of every lunar new year from the epoch
const NEW_YEAR_OFFSETS: [i64; LUNAR_INFO.len()] = {
    let mut offsets = [0_i64; LUNAR_INFO.len()];
    let mut i = 1;
    while i < LUNAR_INFO.len() {
        offsets[i] = offsets[i - 1] + year_days_of(LUNAR_INFO[i - 1]) as i64;
        i += 1;
    }
    offsets
};

const fn leap_days_of(info: u32) -> u16 {
    if info & LEAP_MONTH_MASK == 0 {
        0
    } else if info & MONTH_BIT != 0 {
        BIG_MONTH_DAYS as u16
    } else {
        SMALL_MONTH_DAYS as u16
    }
}

const fn year_days_of(info: u32) -> u16 {
    let mut days = SMALL_MONTH_DAYS as u16 * MAX_MONTH as u16;
    let mut bit = MONTH_BIT >> 1;
    while bit > LEAP_MONTH_MASK {
        if info & bit != 0 {
            days += 1;
        }
        bit >>= 1;
    }
    days + leap_days_of(info)
}

const fn month_days_of(info: u32, month: u8) -> u8 {
    if info & (MONTH_BIT >> month) == 0 {
        SMALL_MONTH_DAYS
    } else {
        BIG_MONTH_DAYS
    }
}

fn table_index(year: u16) -> Result<usize, DateError> {
    if (MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR).contains(&year) {
        Ok(usize::from(year - MIN_LUNAR_YEAR))
    } else {
        Err(DateError::OutOfLunarDomain(year))
    }
}

fn check_month(month: u8) -> Result<u8, DateError> {
    if (1..=MAX_MONTH).contains(&month) {
        Ok(month)
    } else {
        Err(DateError::InvalidMonth(month))
    }
}

/// A date in the lunar calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LunarDate {
    pub year:       u16,
    pub month:      u8,
    pub day:        u8,
    /// Whether `month` is the inserted leap copy of that month
    pub is_leap:    bool,
    /// Leap month of `year`, 0 when the year has none
    pub year_leap_month: u8,
}

impl From<LunarDate> for (u16, u8, u8, bool) {
    fn from(lunar: LunarDate) -> Self {
        (lunar.year, lunar.month, lunar.day, lunar.is_leap)
    }
}

/// Converts a Gregorian date to its lunar date.
///
/// Walks the months of the lunar year containing `date`, inserting the leap month after
/// its regular twin, until the remaining offset falls inside a month.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` when `date` is outside 1900-01-31..=2099-12-31.
pub fn solar_to_lunar(date: &Date) -> Result<LunarDate, DateError> {
    let year = date.year();
    let mut index = table_index(year)?;
    let offset = date.ordinal() - EPOCH_ORDINAL;
    if offset < 0 {
        return Err(DateError::OutOfLunarDomain(year));
    }
    if offset < NEW_YEAR_OFFSETS[index] {
        index -= 1;
    }

    let info = LUNAR_INFO[index];
    let lunar_year = MIN_LUNAR_YEAR + u16::try_from(index).map_err(|_| DateError::OutOfLunarDomain(year))?;
    #[allow(clippy::cast_possible_truncation)]
    let leap = (info & LEAP_MONTH_MASK) as u8;
    let mut residual = offset - NEW_YEAR_OFFSETS[index];

    for month in 1..=MAX_MONTH {
        let days = i64::from(month_days_of(info, month));
        if residual < days {
            return Ok(lunar_day(lunar_year, month, residual, false, leap));
        }
        residual -= days;

        if month == leap {
            let days = i64::from(leap_days_of(info));
            if residual < days {
                return Ok(lunar_day(lunar_year, month, residual, true, leap));
            }
            residual -= days;
        }
    }

    Err(DateError::OutOfLunarDomain(year))
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
const fn lunar_day(year: u16, month: u8, residual: i64, is_leap: bool, year_leap_month: u8) -> LunarDate {
    LunarDate {
        year,
        month,
        day: residual as u8 + MIN_DAY,
        is_leap,
        year_leap_month,
    }
}

/// Converts a lunar date back to the Gregorian calendar.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` for a lunar year outside the table,
/// `DateError::InvalidMonth` for a month that does not exist (including a leap flag on a
/// year without that leap month) and `DateError::InvalidDay` for a day past the month end.
pub fn lunar_to_solar(year: u16, month: u8, day: u8, is_leap: bool) -> Result<Date, DateError> {
    let index = table_index(year)?;
    let month = check_month(month)?;
    let info = LUNAR_INFO[index];
    let leap = info & LEAP_MONTH_MASK;

    if is_leap && leap != u32::from(month) {
        return Err(DateError::InvalidMonth(month));
    }

    let length = if is_leap {
        u8::try_from(leap_days_of(info)).map_err(|_| DateError::InvalidMonth(month))?
    } else {
        month_days_of(info, month)
    };
    if day == 0 || day > length {
        return Err(DateError::InvalidDay { year, month, day });
    }

    let mut offset = NEW_YEAR_OFFSETS[index];
    for earlier in 1..month {
        offset += i64::from(month_days_of(info, earlier));
        if u32::from(earlier) == leap {
            offset += i64::from(leap_days_of(info));
        }
    }
    if is_leap {
        offset += i64::from(month_days_of(info, month));
    }

    Date::from_ordinal(EPOCH_ORDINAL + offset + i64::from(day - MIN_DAY))
}

/// Length of a regular lunar month, 29 or 30.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` or `DateError::InvalidMonth`.
pub fn days_in_lunar_month(year: u16, month: u8) -> Result<u8, DateError> {
    let info = LUNAR_INFO[table_index(year)?];
    Ok(month_days_of(info, check_month(month)?))
}

/// The leap month of a lunar year, if it has one.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` for a year outside the table.
pub fn leap_month(year: u16) -> Result<Option<u8>, DateError> {
    #[allow(clippy::cast_possible_truncation)]
    let leap = (LUNAR_INFO[table_index(year)?] & LEAP_MONTH_MASK) as u8;
    Ok((leap != 0).then_some(leap))
}

/// Length of the leap month, 0 when the year has none.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` for a year outside the table.
pub fn leap_month_days(year: u16) -> Result<u16, DateError> {
    Ok(leap_days_of(LUNAR_INFO[table_index(year)?]))
}

/// Total days of a lunar year, leap month included.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` for a year outside the table.
pub fn lunar_year_days(year: u16) -> Result<u16, DateError> {
    Ok(year_days_of(LUNAR_INFO[table_index(year)?]))
}

/// Gregorian date of the first day of a lunar year.
///
/// # Errors
/// Returns `DateError::OutOfLunarDomain` for a year outside the table.
pub fn lunar_new_year(year: u16) -> Result<Date, DateError> {
    Date::from_ordinal(EPOCH_ORDINAL + NEW_YEAR_OFFSETS[table_index(year)?])
}

/// Heavenly stem (0..10) and earthly branch (0..12) of a lunar year, 1984 being (0, 0).
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const fn sexagenary_year(year: u16) -> (u8, u8) {
    let cycle = year as i32 - 4;
    (cycle.rem_euclid(10) as u8, cycle.rem_euclid(12) as u8)
}
