//! Shared fixture constructors for unit tests.

use crate::{Date, DateDomain};

pub fn date(year: u16, month: u8, day: u8) -> Date {
    Date::new(year, month, day).expect("test fixture date must be valid")
}

pub fn domain(min: Date, max: Date) -> DateDomain {
    DateDomain::new(min, max).expect("test fixture domain must be valid")
}
