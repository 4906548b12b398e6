use crate::Date;
use crate::DateError;
use crate::date::days_from_civil;

/// Number of solar terms in a year
pub const SOLAR_TERMS: usize = 24;

/// Mean tropical year in milliseconds
const TROPICAL_YEAR_MS: f64 = 31_556_925_974.7;

const MS_PER_MINUTE: f64 = 60_000.0;
const MS_PER_DAY: f64 = 86_400_000.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Minor Cold of 1900 fell at 1900-01-06 02:05 UTC
const ANCHOR_ORDINAL: i64 = days_from_civil(1900, 1, 6);
const ANCHOR_TIME_MS: f64 = 7_500_000.0;

/// Minutes from Minor Cold to each term within a year
const TERM_MINUTES: [u32; SOLAR_TERMS] = [
    0, 21_208, 42_467, 63_836, 85_337, 107_014, 128_867, 150_921, 173_149, 195_551, 218_072,
    240_693, 263_343, 285_989, 308_563, 331_033, 353_350, 375_494, 397_447, 419_210, 440_795,
    462_224, 483_532, 504_758,
];

/// Julian day of 1970-01-01 00:00 UTC
const JD_UNIX_EPOCH: f64 = 2_440_587.5;
/// Julian day of J2000.0
const JD_J2000: f64 = 2_451_545.0;
const DAYS_PER_CENTURY: f64 = 36_525.0;

/// Apparent solar longitude of Minor Cold, in degrees
const MINOR_COLD_LONGITUDE: f64 = 285.0;
const DEGREES_PER_TERM: f64 = 15.0;

/// Terms are dated in China Standard Time, UTC+8
const UTC_OFFSET_DAYS: f64 = 8.0 / 24.0;

/// Bracket around the mean estimate, in days
const BRACKET_BEFORE: f64 = 3.0;
const BRACKET_AFTER: f64 = 4.0;
const MAX_ITERATIONS: usize = 40;
const CONVERGENCE_DAYS: f64 = 1e-6;

/// Generator of the 24 solar term dates of a Gregorian year.
///
/// Entry 0 is Minor Cold in early January, entries follow in calendar order.
pub trait SolarTermSource {
    /// # Errors
    /// Returns `DateError` when a term cannot be represented for `year`.
    fn terms(&self, year: u16) -> Result<[Date; SOLAR_TERMS], DateError>;
}

/// Days from 1970-01-01 to the UTC day the mean-year formula gives a term `minutes` after
/// Minor Cold of `year`.
#[allow(clippy::cast_possible_truncation, clippy::suboptimal_flops)]
fn mean_term_ordinal(year: u16, minutes: u32) -> i64 {
    let years = f64::from(i32::from(year) - 1900);
    let ms = TROPICAL_YEAR_MS * years + f64::from(minutes) * MS_PER_MINUTE + ANCHOR_TIME_MS;
    ANCHOR_ORDINAL + (ms / MS_PER_DAY).floor() as i64
}

/// Solar terms placed at fixed offsets along a mean tropical year.
///
/// An approximation: the real sun runs ahead of or behind the mean year by up to a day,
/// so roughly one term in twenty-five lands on a neighbouring date. End of Heat 2024, for
/// one, comes out on 08-23 instead of 08-22. Use [`ApparentSolarTerms`] for real dates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeanSolarTerms;

impl SolarTermSource for MeanSolarTerms {
    fn terms(&self, year: u16) -> Result<[Date; SOLAR_TERMS], DateError> {
        let mut terms = [Date::new(year, 1, 1)?; SOLAR_TERMS];
        for (term, minutes) in terms.iter_mut().zip(TERM_MINUTES) {
            *term = Date::from_ordinal(mean_term_ordinal(year, minutes))?;
        }
        Ok(terms)
    }
}

/// Solar terms found from the sun's apparent ecliptic longitude.
///
/// Each term is the instant the longitude reaches a multiple of 15 degrees, refined by
/// bisection from the mean estimate and dated in China Standard Time. The solar position
/// is the low-precision series of Meeus, *Astronomical Algorithms* ch. 25, good to about
/// 0.01 degrees (a quarter of an hour) over 1900-2099.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApparentSolarTerms;

impl SolarTermSource for ApparentSolarTerms {
    fn terms(&self, year: u16) -> Result<[Date; SOLAR_TERMS], DateError> {
        let delta_t = delta_t_seconds(year) / SECONDS_PER_DAY;
        let mut terms = [Date::new(year, 1, 1)?; SOLAR_TERMS];
        for (index, (term, minutes)) in terms.iter_mut().zip(TERM_MINUTES).enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let estimate = JD_UNIX_EPOCH + mean_term_ordinal(year, minutes) as f64 + delta_t;
            #[allow(clippy::cast_precision_loss)]
            let target = (MINOR_COLD_LONGITUDE + DEGREES_PER_TERM * index as f64) % 360.0;
            let jde = crossing(target, estimate - BRACKET_BEFORE, estimate + BRACKET_AFTER);
            *term = Date::from_ordinal(china_ordinal(jde - delta_t))?;
        }
        Ok(terms)
    }
}

/// Bisects for the instant the apparent longitude crosses `target` between `start` and `end`.
fn crossing(target: f64, mut start: f64, mut end: f64) -> f64 {
    let mut f_start = normalize_to_pm180(apparent_longitude(start) - target);
    for _ in 0..MAX_ITERATIONS {
        let mid = 0.5 * (start + end);
        let f_mid = normalize_to_pm180(apparent_longitude(mid) - target);
        if f_start * f_mid <= 0.0 {
            end = mid;
        } else {
            start = mid;
            f_start = f_mid;
        }
        if end - start < CONVERGENCE_DAYS {
            break;
        }
    }
    0.5 * (start + end)
}

/// Apparent geometric longitude of the sun in degrees, for a Julian ephemeris day.
#[allow(clippy::suboptimal_flops)]
fn apparent_longitude(jde: f64) -> f64 {
    let t = (jde - JD_J2000) / DAYS_PER_CENTURY;
    let mean_longitude = 280.466_46 + 36_000.769_83 * t + 0.000_303_2 * t * t;
    let anomaly = (357.529_11 + 35_999.050_29 * t - 0.000_153_7 * t * t).to_radians();
    let center = (1.914_602 - 0.004_817 * t - 0.000_014 * t * t) * anomaly.sin()
        + (0.019_993 - 0.000_101 * t) * (2.0 * anomaly).sin()
        + 0.000_289 * (3.0 * anomaly).sin();
    let node = (125.04 - 1_934.136 * t).to_radians();
    mean_longitude + center - 0.005_69 - 0.004_78 * node.sin()
}

fn normalize_to_pm180(degrees: f64) -> f64 {
    let wrapped = degrees % 360.0;
    if wrapped > 180.0 {
        wrapped - 360.0
    } else if wrapped <= -180.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Days from 1970-01-01 to the China Standard Time date of a UT Julian day.
#[allow(clippy::cast_possible_truncation)]
fn china_ordinal(jd_ut: f64) -> i64 {
    (jd_ut + UTC_OFFSET_DAYS - JD_UNIX_EPOCH).floor() as i64
}

/// TT minus UT in seconds, Espenak and Meeus polynomials for 1900-2150.
#[allow(clippy::suboptimal_flops)]
fn delta_t_seconds(year: u16) -> f64 {
    let y = f64::from(year) + 0.5;
    if y < 1920.0 {
        let t = y - 1900.0;
        -2.79 + 1.494_119 * t - 0.059_893_9 * t.powi(2) + 0.006_196_6 * t.powi(3) - 0.000_197 * t.powi(4)
    } else if y < 1941.0 {
        let t = y - 1920.0;
        21.20 + 0.844_93 * t - 0.076_100 * t.powi(2) + 0.002_093_6 * t.powi(3)
    } else if y < 1961.0 {
        let t = y - 1950.0;
        29.07 + 0.407 * t - t.powi(2) / 233.0 + t.powi(3) / 2_547.0
    } else if y < 1986.0 {
        let t = y - 1975.0;
        45.45 + 1.067 * t - t.powi(2) / 260.0 - t.powi(3) / 718.0
    } else if y < 2005.0 {
        let t = y - 2000.0;
        63.86 + 0.3345 * t - 0.060_374 * t.powi(2)
            + 0.001_727_5 * t.powi(3)
            + 0.000_651_814 * t.powi(4)
            + 0.000_023_735_99 * t.powi(5)
    } else if y < 2050.0 {
        let t = y - 2000.0;
        62.92 + 0.322_17 * t + 0.005_589 * t.powi(2)
    } else {
        let u = (y - 1820.0) / 100.0;
        -20.0 + 32.0 * u * u - 0.5628 * (2150.0 - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    const TERMS_2024: [(u8, u8); SOLAR_TERMS] = [
        (1, 6),
        (1, 20),
        (2, 4),
        (2, 19),
        (3, 5),
        (3, 20),
        (4, 4),
        (4, 19),
        (5, 5),
        (5, 20),
        (6, 5),
        (6, 21),
        (7, 6),
        (7, 22),
        (8, 7),
        (8, 22),
        (9, 7),
        (9, 22),
        (10, 8),
        (10, 23),
        (11, 7),
        (11, 22),
        (12, 6),
        (12, 21),
    ];

    #[test]
    fn test_apparent_terms_2024() {
        let terms = ApparentSolarTerms.terms(2024).expect("2024 terms are representable");
        for (index, (term, (month, day))) in terms.iter().zip(TERMS_2024).enumerate() {
            assert_eq!(*term, date(2024, month, day), "term {index}");
        }
    }

    #[test]
    fn test_apparent_terms_known_dates() {
        struct TestCase {
            year:        u16,
            index:       usize,
            expected:    Date,
            description: &'static str,
        }

        let cases = [
            TestCase {
                year:        2017,
                index:       2,
                expected:    date(2017, 2, 3),
                description: "Start of Spring 2017 came on the 3rd",
            },
            TestCase {
                year:        2022,
                index:       23,
                expected:    date(2022, 12, 22),
                description: "Winter Solstice 2022",
            },
            TestCase {
                year:        2023,
                index:       6,
                expected:    date(2023, 4, 5),
                description: "Clear and Bright 2023",
            },
            TestCase {
                year:        2020,
                index:       23,
                expected:    date(2020, 12, 21),
                description: "Winter Solstice 2020",
            },
        ];

        for case in &cases {
            let terms = ApparentSolarTerms.terms(case.year).expect("terms are representable");
            assert_eq!(terms[case.index], case.expected, "{}", case.description);
        }
    }

    #[test]
    fn test_mean_terms_drift_from_apparent() {
        let mean = MeanSolarTerms.terms(2024).expect("2024 terms are representable");
        let apparent = ApparentSolarTerms.terms(2024).expect("2024 terms are representable");

        // End of Heat: the mean year is a day late.
        assert_eq!(mean[15], date(2024, 8, 23));
        assert_eq!(apparent[15], date(2024, 8, 22));
        for (mean, apparent) in mean.iter().zip(apparent) {
            assert!(mean.differ(&apparent).abs() <= 1);
        }
    }

    #[test]
    fn test_terms_are_ordered_within_year() {
        for year in [1900_u16, 1950, 2000, 2055, 2099] {
            for terms in [
                MeanSolarTerms.terms(year).expect("terms are representable"),
                ApparentSolarTerms.terms(year).expect("terms are representable"),
            ] {
                assert!(terms.windows(2).all(|pair| pair[0] < pair[1]), "terms of {year} ascend");
                assert!(terms.iter().all(|term| term.year() == year), "terms of {year} stay in year");
            }
        }
    }

    #[test]
    fn test_anchor_year() {
        let terms = MeanSolarTerms.terms(1900).expect("1900 terms are representable");
        assert_eq!(terms[0], date(1900, 1, 6));
        let terms = ApparentSolarTerms.terms(1900).expect("1900 terms are representable");
        assert_eq!(terms[0], date(1900, 1, 6));
    }

    #[test]
    fn test_normalize_to_pm180() {
        assert!((normalize_to_pm180(359.0) + 1.0).abs() < 1e-9);
        assert!((normalize_to_pm180(-181.0) - 179.0).abs() < 1e-9);
        assert!((normalize_to_pm180(15.0) - 15.0).abs() < 1e-9);
    }
}
