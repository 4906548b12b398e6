use std::cmp::Ordering;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::prelude::*;
use crate::{Date, LunarDate, Marker};

/// One cell of a month or week page.
///
/// Identity is the wrapped [`Date`] alone: two cells for the same date compare equal and
/// hash the same whatever their annotations, page flags or markers say.
#[derive(Debug, Clone, Deref, Serialize)]
pub struct Day {
    #[deref]
    date:                     Date,
    /// Whether the cell belongs to the month the page was built for
    pub is_current_month:     bool,
    pub is_today:             bool,
    /// `None` outside the lunar table
    pub lunar:                Option<LunarDate>,
    pub solar_term:           String,
    /// Fixed Gregorian festival, or the floating one falling on this date
    pub gregorian_festival:   String,
    pub traditional_festival: String,
    /// Lunar day numeral, or the month name on the first day of a lunar month
    pub lunar_text:           String,
    /// Text shown under the day number
    pub label:                String,
    pub marker:               Marker,
}

impl Day {
    /// A bare cell with no annotations.
    pub fn new(date: Date) -> Self {
        Self {
            date,
            is_current_month: false,
            is_today: false,
            lunar: None,
            solar_term: String::new(),
            gregorian_festival: String::new(),
            traditional_festival: String::new(),
            lunar_text: String::new(),
            label: String::new(),
            marker: Marker::default(),
        }
    }

    pub const fn date(&self) -> Date {
        self.date
    }

    pub fn has_scheme(&self) -> bool {
        self.marker.has_scheme()
    }

    /// The lunar month number when this cell falls inside a leap month, otherwise 0
    pub fn leap_month(&self) -> u8 {
        match self.lunar {
            Some(lunar) if lunar.is_leap => lunar.month,
            _ => 0,
        }
    }
}

impl From<Date> for Day {
    fn from(date: Date) -> Self {
        Self::new(date)
    }
}

impl PartialEq for Day {
    fn eq(&self, other: &Self) -> bool {
        self.date == other.date
    }
}

impl Eq for Day {}

impl PartialEq<Date> for Day {
    fn eq(&self, other: &Date) -> bool {
        self.date == *other
    }
}

impl Hash for Day {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.date.hash(state);
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Day {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date.cmp(&other.date)
    }
}
