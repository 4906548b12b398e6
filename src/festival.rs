use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;

use tracing::{debug, trace};

use crate::consts::{DAYS_PER_WEEK, DECEMBER};
use crate::lunar::{days_in_lunar_month, solar_to_lunar};
use crate::solar_term::{ApparentSolarTerms, SOLAR_TERMS, SolarTermSource};
use crate::{Date, DateError, Day, Labels};

const MAY: u8 = 5;
const JUNE: u8 = 6;
const NOVEMBER: u8 = 11;

/// Floating festivals of one year: Mother's Day, Father's Day, Thanksgiving
type FloatingDates = [Date; 3];

/// Fills the lunar and festival fields of calendar cells.
///
/// Solar terms and floating festivals are computed once per Gregorian year and memoized.
pub struct FestivalAnnotator {
    labels:         Labels,
    source:         Box<dyn SolarTermSource>,
    term_cache:     RefCell<HashMap<u16, [Date; SOLAR_TERMS]>>,
    floating_cache: RefCell<HashMap<u16, FloatingDates>>,
}

impl fmt::Debug for FestivalAnnotator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FestivalAnnotator")
            .field("labels", &self.labels)
            .field("cached_term_years", &self.term_cache.borrow().len())
            .finish_non_exhaustive()
    }
}

impl Default for FestivalAnnotator {
    fn default() -> Self {
        Self::new(Labels::default())
    }
}

impl FestivalAnnotator {
    /// Annotator using the apparent solar term generator.
    pub fn new(labels: Labels) -> Self {
        Self::with_source(labels, Box::new(ApparentSolarTerms))
    }

    pub fn with_source(labels: Labels, source: Box<dyn SolarTermSource>) -> Self {
        Self {
            labels,
            source,
            term_cache: RefCell::new(HashMap::new()),
            floating_cache: RefCell::new(HashMap::new()),
        }
    }

    pub const fn labels(&self) -> &Labels {
        &self.labels
    }

    /// Name of the solar term falling on `date`, empty when none does.
    pub fn solar_term(&self, date: &Date) -> String {
        let year = date.year();
        let cached = self.term_cache.borrow().get(&year).copied();
        let terms = match cached {
            Some(terms) => terms,
            None => match self.source.terms(year) {
                Ok(terms) => {
                    trace!(year, "caching solar terms");
                    self.term_cache.borrow_mut().insert(year, terms);
                    terms
                },
                Err(error) => {
                    debug!(year, %error, "no solar terms for year");
                    return String::new();
                },
            },
        };

        terms
            .iter()
            .position(|term| term == date)
            .map(|index| self.labels.solar_term(index).to_owned())
            .unwrap_or_default()
    }

    pub fn gregorian_festival(&self, month: u8, day: u8) -> &str {
        self.labels.gregorian_festival(month, day)
    }

    /// Festival of a lunar date; the last day of the twelfth month is always New Year's Eve.
    pub fn traditional_festival(&self, lunar_year: u16, lunar_month: u8, lunar_day: u8) -> &str {
        if lunar_month == DECEMBER && days_in_lunar_month(lunar_year, DECEMBER) == Ok(lunar_day) {
            return &self.labels.new_years_eve;
        }
        self.labels.traditional_festival(lunar_month, lunar_day)
    }

    /// Floating festival falling on `date`, empty when none does.
    pub fn special_festival(&self, date: &Date) -> &str {
        let year = date.year();
        let cached = self.floating_cache.borrow().get(&year).copied();
        let dates = match cached {
            Some(dates) => dates,
            None => match floating_festivals(year) {
                Ok(dates) => {
                    trace!(year, "caching floating festivals");
                    self.floating_cache.borrow_mut().insert(year, dates);
                    dates
                },
                Err(_) => return "",
            },
        };

        let names = [
            &self.labels.mothers_day,
            &self.labels.fathers_day,
            &self.labels.thanksgiving,
        ];
        dates
            .iter()
            .zip(names)
            .find_map(|(festival, name)| (festival == date).then_some(name.as_str()))
            .unwrap_or("")
    }

    /// Fills the lunar and festival fields and the display label of a cell.
    ///
    /// The label prefers the solar term, then the Gregorian festival (a floating one when no
    /// fixed festival applies), then the traditional festival, then the lunar numeral.
    /// Cells outside the lunar table keep an empty lunar text.
    pub fn annotate(&self, day: &mut Day) {
        let date = day.date();
        day.solar_term = self.solar_term(&date);

        let fixed = self.gregorian_festival(date.month(), date.day());
        day.gregorian_festival = if fixed.is_empty() {
            self.special_festival(&date).to_owned()
        } else {
            fixed.to_owned()
        };

        day.lunar = solar_to_lunar(&date).ok();
        match day.lunar {
            Some(lunar) => {
                day.traditional_festival = self
                    .traditional_festival(lunar.year, lunar.month, lunar.day)
                    .to_owned();
                day.lunar_text = if lunar.day == 1 {
                    self.labels.month_name(lunar.month, lunar.is_leap)
                } else {
                    self.labels.day_numeral(lunar.day).to_owned()
                };
            },
            None => {
                day.traditional_festival.clear();
                day.lunar_text.clear();
            },
        }

        day.label = [
            &day.solar_term,
            &day.gregorian_festival,
            &day.traditional_festival,
            &day.lunar_text,
        ]
        .into_iter()
        .find(|text| !text.is_empty())
        .cloned()
        .unwrap_or_default();
    }

    /// Display label of a single date.
    pub fn display_label(&self, date: &Date) -> String {
        let mut day = Day::new(*date);
        self.annotate(&mut day);
        day.label
    }
}

/// Dates of the floating festivals of `year`.
///
/// `start_diff` counts days from the first of the month to its first Sunday, 7 when the
/// month starts on a Sunday. The branches below place each festival from it.
fn floating_festivals(year: u16) -> Result<FloatingDates, DateError> {
    let start_diff = |month: u8| -> Result<u8, DateError> {
        Ok(DAYS_PER_WEEK - Date::first_of_month(year, month)?.weekday())
    };

    let diff = start_diff(MAY)?;
    let mothers_day = if diff == 7 { diff + 1 } else { diff + 7 + 1 };

    let diff = start_diff(JUNE)?;
    let fathers_day = if diff == 7 { diff + 7 + 1 } else { diff + 7 + 7 + 1 };

    let diff = start_diff(NOVEMBER)?;
    let thanksgiving = if diff <= 2 { diff + 21 + 5 } else { diff + 14 + 5 };

    Ok([
        Date::new(year, MAY, mothers_day)?,
        Date::new(year, JUNE, fathers_day)?,
        Date::new(year, NOVEMBER, thanksgiving)?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    fn label_of(annotator: &FestivalAnnotator, year: u16, month: u8, day: u8) -> String {
        annotator.display_label(&date(year, month, day))
    }

    #[test]
    fn test_floating_festivals() {
        struct TestCase {
            year:        u16,
            expected:    [(u8, u8); 3],
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2024,
                expected:    [(5, 12), (6, 16), (11, 28)],
                description: "May starts on Wednesday",
            },
            TestCase {
                year:        2022,
                expected:    [(5, 8), (6, 19), (11, 24)],
                description: "May starts on Sunday",
            },
            TestCase {
                year:        2025,
                expected:    [(5, 11), (6, 15), (11, 27)],
                description: "June starts on Sunday",
            },
            TestCase {
                year:        2020,
                expected:    [(5, 10), (6, 21), (11, 26)],
                description: "November starts on Sunday",
            },
        ];

        for case in &cases {
            let dates = floating_festivals(case.year).expect("floating festivals exist");
            for (found, (month, day)) in dates.iter().zip(case.expected) {
                assert_eq!(*found, date(case.year, month, day), "{}", case.description);
            }
        }
    }

    #[test]
    fn test_solar_term_lookup() {
        let annotator = FestivalAnnotator::default();
        assert_eq!(annotator.solar_term(&date(2024, 2, 4)), "Start of Spring");
        assert_eq!(annotator.solar_term(&date(2024, 12, 21)), "Winter Solstice");
        assert_eq!(annotator.solar_term(&date(2024, 2, 5)), "");
    }

    #[test]
    fn test_new_years_eve_uses_month_length() {
        let annotator = FestivalAnnotator::default();
        assert_eq!(annotator.traditional_festival(2023, 12, 30), "New Year's Eve");
        assert_eq!(annotator.traditional_festival(2023, 12, 29), "");
        assert_eq!(annotator.traditional_festival(2024, 12, 29), "New Year's Eve");
        assert_eq!(annotator.traditional_festival(2024, 1, 15), "Lantern Festival");
    }

    #[test]
    fn test_special_festival() {
        let annotator = FestivalAnnotator::default();
        assert_eq!(annotator.special_festival(&date(2024, 5, 12)), "Mother's Day");
        assert_eq!(annotator.special_festival(&date(2024, 11, 28)), "Thanksgiving");
        assert_eq!(annotator.special_festival(&date(2024, 11, 21)), "");
    }

    #[test]
    fn test_display_label_priority() {
        struct TestCase {
            date:        (u16, u8, u8),
            label:       &'static str,
            description: &'static str,
        }

        let cases = [
            TestCase {
                date:        (2024, 4, 4),
                label:       "Clear and Bright",
                description: "solar term wins over lunar numeral",
            },
            TestCase {
                date:        (2024, 1, 1),
                label:       "New Year's Day",
                description: "gregorian festival",
            },
            TestCase {
                date:        (2024, 5, 12),
                label:       "Mother's Day",
                description: "floating festival fills the gregorian slot",
            },
            TestCase {
                date:        (2024, 9, 17),
                label:       "Mid-Autumn Festival",
                description: "traditional festival",
            },
            TestCase {
                date:        (2024, 2, 9),
                label:       "New Year's Eve",
                description: "last day of a 30-day twelfth month",
            },
            TestCase {
                date:        (2025, 1, 28),
                label:       "New Year's Eve",
                description: "last day of a 29-day twelfth month",
            },
            TestCase {
                date:        (2024, 2, 14),
                label:       "Valentine's Day",
                description: "gregorian festival over lunar numeral",
            },
            TestCase {
                date:        (2024, 6, 10),
                label:       "Dragon Boat Festival",
                description: "lunar 5/5",
            },
            TestCase {
                date:        (2024, 1, 11),
                label:       "12th Month",
                description: "first day of a lunar month shows the month name",
            },
            TestCase {
                date:        (2023, 3, 22),
                label:       "Leap 2nd Month",
                description: "first day of a leap month",
            },
            TestCase {
                date:        (2024, 1, 10),
                label:       "29th",
                description: "plain lunar day",
            },
        ];

        let annotator = FestivalAnnotator::default();
        for case in &cases {
            let (year, month, day) = case.date;
            assert_eq!(label_of(&annotator, year, month, day), case.label, "{}", case.description);
        }
    }

    #[test]
    fn test_annotate_outside_lunar_table() {
        let annotator = FestivalAnnotator::default();
        let mut day = Day::new(date(1900, 1, 10));
        annotator.annotate(&mut day);
        assert!(day.lunar.is_none());
        assert_eq!(day.lunar_text, "");
        assert_eq!(day.traditional_festival, "");
    }

    struct FixedTerms;

    impl SolarTermSource for FixedTerms {
        fn terms(&self, year: u16) -> Result<[Date; SOLAR_TERMS], DateError> {
            let first = Date::new(year, 3, 1)?;
            let mut terms = [first; SOLAR_TERMS];
            for (offset, term) in (0_i64..).zip(terms.iter_mut()) {
                *term = first.add_days(offset)?;
            }
            Ok(terms)
        }
    }

    #[test]
    fn test_injected_term_source() {
        let annotator = FestivalAnnotator::with_source(Labels::default(), Box::new(FixedTerms));
        assert_eq!(annotator.solar_term(&date(2024, 3, 1)), "Minor Cold");
        assert_eq!(annotator.solar_term(&date(2024, 3, 3)), "Start of Spring");
        assert_eq!(annotator.solar_term(&date(2024, 2, 4)), "");
    }
}
