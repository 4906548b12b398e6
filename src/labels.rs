use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::lunar::sexagenary_year;

const SOLAR_TERM_NAMES: [&str; 24] = [
    "Minor Cold",
    "Major Cold",
    "Start of Spring",
    "Rain Water",
    "Awakening of Insects",
    "Spring Equinox",
    "Clear and Bright",
    "Grain Rain",
    "Start of Summer",
    "Grain Buds",
    "Grain in Ear",
    "Summer Solstice",
    "Minor Heat",
    "Major Heat",
    "Start of Autumn",
    "End of Heat",
    "White Dew",
    "Autumn Equinox",
    "Cold Dew",
    "Frost's Descent",
    "Start of Winter",
    "Minor Snow",
    "Major Snow",
    "Winter Solstice",
];

const GREGORIAN_FESTIVALS: [(&str, &str); 12] = [
    ("0101", "New Year's Day"),
    ("0214", "Valentine's Day"),
    ("0308", "Women's Day"),
    ("0312", "Arbor Day"),
    ("0401", "April Fools' Day"),
    ("0501", "Labour Day"),
    ("0504", "Youth Day"),
    ("0601", "Children's Day"),
    ("0910", "Teachers' Day"),
    ("1001", "National Day"),
    ("1224", "Christmas Eve"),
    ("1225", "Christmas"),
];

const TRADITIONAL_FESTIVALS: [(&str, &str); 8] = [
    ("0101", "Spring Festival"),
    ("0115", "Lantern Festival"),
    ("0505", "Dragon Boat Festival"),
    ("0707", "Qixi Festival"),
    ("0715", "Ghost Festival"),
    ("0815", "Mid-Autumn Festival"),
    ("0909", "Double Ninth Festival"),
    ("1208", "Laba Festival"),
];

const STEMS: [&str; 10] = ["Jia", "Yi", "Bing", "Ding", "Wu", "Ji", "Geng", "Xin", "Ren", "Gui"];

const BRANCHES: [&str; 12] = [
    "Zi", "Chou", "Yin", "Mao", "Chen", "Si", "Wu", "Wei", "Shen", "You", "Xu", "Hai",
];

/// Localized text the annotator reads: month and day names, festival tables, term names.
///
/// Every lookup falls back to an empty string when an entry is missing, so a partial table
/// loaded from configuration never fails a render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Labels {
    /// Names of lunar months 1-12
    pub lunar_months:          Vec<String>,
    /// Names of lunar days 1-30
    pub lunar_days:            Vec<String>,
    pub leap_prefix:           String,
    /// The 24 solar terms, Minor Cold first
    pub solar_terms:           Vec<String>,
    /// Gregorian festivals keyed `MMDD`
    pub gregorian_festivals:   BTreeMap<String, String>,
    /// Traditional festivals keyed by lunar `MMDD`
    pub traditional_festivals: BTreeMap<String, String>,
    pub new_years_eve:         String,
    pub mothers_day:           String,
    pub fathers_day:           String,
    pub thanksgiving:          String,
    pub stems:                 Vec<String>,
    pub branches:              Vec<String>,
}

impl Default for Labels {
    fn default() -> Self {
        Self {
            lunar_months:          (1..=12).map(|m| format!("{} Month", ordinal(m))).collect(),
            lunar_days:            (1..=30).map(ordinal).collect(),
            leap_prefix:           "Leap ".to_owned(),
            solar_terms:           SOLAR_TERM_NAMES.iter().map(|s| (*s).to_owned()).collect(),
            gregorian_festivals:   to_table(&GREGORIAN_FESTIVALS),
            traditional_festivals: to_table(&TRADITIONAL_FESTIVALS),
            new_years_eve:         "New Year's Eve".to_owned(),
            mothers_day:           "Mother's Day".to_owned(),
            fathers_day:           "Father's Day".to_owned(),
            thanksgiving:          "Thanksgiving".to_owned(),
            stems:                 STEMS.iter().map(|s| (*s).to_owned()).collect(),
            branches:              BRANCHES.iter().map(|s| (*s).to_owned()).collect(),
        }
    }
}

fn to_table(entries: &[(&str, &str)]) -> BTreeMap<String, String> {
    entries
        .iter()
        .map(|(key, name)| ((*key).to_owned(), (*name).to_owned()))
        .collect()
}

fn ordinal(n: u8) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}

/// Table key of a month and day, `MMDD`
pub(crate) fn month_day_key(month: u8, day: u8) -> String {
    format!("{month:02}{day:02}")
}

fn nth(items: &[String], index: usize) -> &str {
    items.get(index).map_or("", String::as_str)
}

impl Labels {
    /// Name of a lunar month, prefixed when it is the leap copy.
    pub fn month_name(&self, month: u8, is_leap: bool) -> String {
        let name = nth(&self.lunar_months, usize::from(month).wrapping_sub(1));
        if is_leap {
            format!("{}{name}", self.leap_prefix)
        } else {
            name.to_owned()
        }
    }

    pub fn day_numeral(&self, day: u8) -> &str {
        nth(&self.lunar_days, usize::from(day).wrapping_sub(1))
    }

    pub fn solar_term(&self, index: usize) -> &str {
        nth(&self.solar_terms, index)
    }

    pub fn gregorian_festival(&self, month: u8, day: u8) -> &str {
        self.gregorian_festivals
            .get(&month_day_key(month, day))
            .map_or("", String::as_str)
    }

    pub fn traditional_festival(&self, month: u8, day: u8) -> &str {
        self.traditional_festivals
            .get(&month_day_key(month, day))
            .map_or("", String::as_str)
    }

    /// Sexagenary name of a lunar year, e.g. `Jia-Chen` for 2024.
    pub fn stem_branch(&self, year: u16) -> String {
        let (stem, branch) = sexagenary_year(year);
        format!(
            "{}-{}",
            nth(&self.stems, usize::from(stem)),
            nth(&self.branches, usize::from(branch))
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tables_are_complete() {
        let labels = Labels::default();
        assert_eq!(labels.lunar_months.len(), 12);
        assert_eq!(labels.lunar_days.len(), 30);
        assert_eq!(labels.solar_terms.len(), 24);
        assert_eq!(labels.stems.len(), 10);
        assert_eq!(labels.branches.len(), 12);
    }

    #[test]
    fn test_ordinals() {
        let labels = Labels::default();
        assert_eq!(labels.day_numeral(1), "1st");
        assert_eq!(labels.day_numeral(2), "2nd");
        assert_eq!(labels.day_numeral(11), "11th");
        assert_eq!(labels.day_numeral(22), "22nd");
        assert_eq!(labels.day_numeral(23), "23rd");
        assert_eq!(labels.day_numeral(30), "30th");
    }

    #[test]
    fn test_month_names() {
        let labels = Labels::default();
        assert_eq!(labels.month_name(1, false), "1st Month");
        assert_eq!(labels.month_name(2, true), "Leap 2nd Month");
    }

    #[test]
    fn test_missing_entries_are_empty() {
        let labels = Labels::default();
        assert_eq!(labels.day_numeral(0), "");
        assert_eq!(labels.day_numeral(31), "");
        assert_eq!(labels.solar_term(24), "");
        assert_eq!(labels.gregorian_festival(3, 3), "");
        assert_eq!(labels.month_name(0, false), "");
    }

    #[test]
    fn test_festival_lookup() {
        let labels = Labels::default();
        assert_eq!(labels.gregorian_festival(12, 25), "Christmas");
        assert_eq!(labels.traditional_festival(8, 15), "Mid-Autumn Festival");
    }

    #[test]
    fn test_stem_branch() {
        let labels = Labels::default();
        assert_eq!(labels.stem_branch(2024), "Jia-Chen");
        assert_eq!(labels.stem_branch(2023), "Gui-Mao");
    }

    #[test]
    fn test_partial_table_from_json() {
        let json = r#"{ "leap_prefix": "L", "solar_terms": [] }"#;
        let labels: Labels = serde_json::from_str(json).expect("partial labels deserialize");
        assert_eq!(labels.leap_prefix, "L");
        assert_eq!(labels.solar_term(0), "");
        assert_eq!(labels.day_numeral(1), "1st");

        let result: Result<Labels, _> = serde_json::from_str(r#"{ "colour": "red" }"#);
        assert!(result.is_err());
    }
}
