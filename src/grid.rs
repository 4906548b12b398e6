//! Month and week page layout plus pagination over a [`DateDomain`].
//!
//! Offsets follow the widget's week-start conventions: the leading offset is the number of
//! cells before the first date of interest in its row, the trailing offset the number after
//! the last one. Each convention keeps its own branch formula.

use serde::{Deserialize, Serialize};

use crate::consts::{DAYS_PER_WEEK, DECEMBER, JANUARY, MIN_DAY, MONTHS_PER_YEAR, MONTH_GRID_CELLS, MONTH_GRID_ROWS};
use crate::prelude::*;
use crate::types::days_in_month;
use crate::{Date, DateDomain, DateError, Day, FestivalAnnotator};

/// First day of a displayed week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeekStart {
    #[default]
    #[display(fmt = "sunday")]
    Sunday,
    #[display(fmt = "monday")]
    Monday,
    #[display(fmt = "saturday")]
    Saturday,
}

/// How many rows a month page shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthViewMode {
    /// Always six rows, foreign days drawn
    #[default]
    AllSixRows,
    /// Only the rows the month needs, foreign days left blank
    CurrentMonthOnly,
    /// Only the rows the month needs, foreign days drawn
    FitExact,
}

/// Which day a month page selects when the picker scrolls to it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultSelectDay {
    /// Day 1 of the page's month
    #[default]
    FirstDayOfMonth,
    /// Day of month of the last selection, clamped to the month length. A jump prefers
    /// today when it lies in the domain.
    LastSelectedDay,
    /// Like `LastSelectedDay`, but a jump never prefers today
    LastSelectedDayIgnoreToday,
}

/// Day-of-week number counting Sunday as 1
const fn week_number(date: &Date) -> u8 {
    date.weekday() + 1
}

const fn start_offset(week: u8, week_start: WeekStart) -> u8 {
    match week_start {
        WeekStart::Sunday => week - 1,
        WeekStart::Monday => {
            if week == 1 {
                6
            } else {
                week - 2
            }
        },
        WeekStart::Saturday => {
            if week == 7 {
                0
            } else {
                week
            }
        },
    }
}

const fn end_offset(week: u8, week_start: WeekStart) -> u8 {
    match week_start {
        WeekStart::Sunday => 7 - week,
        WeekStart::Monday => {
            if week == 1 {
                0
            } else {
                7 - week + 1
            }
        },
        WeekStart::Saturday => {
            if week == 7 {
                6
            } else {
                7 - week - 1
            }
        },
    }
}

/// Cells before day 1 on the first row of a month page.
///
/// # Errors
/// Returns `DateError` for an invalid year or month.
pub fn month_start_offset(year: u16, month: u8, week_start: WeekStart) -> Result<u8, DateError> {
    Ok(week_start_offset(&Date::first_of_month(year, month)?, week_start))
}

/// Cells after the last day on the last row the month needs.
///
/// # Errors
/// Returns `DateError` for an invalid year or month.
pub fn month_end_offset(year: u16, month: u8, week_start: WeekStart) -> Result<u8, DateError> {
    Ok(week_end_offset(&Date::last_of_month(year, month)?, week_start))
}

/// Days between the start of `date`'s week and `date`.
pub const fn week_start_offset(date: &Date, week_start: WeekStart) -> u8 {
    start_offset(week_number(date), week_start)
}

/// Days between `date` and the end of its week.
pub const fn week_end_offset(date: &Date, week_start: WeekStart) -> u8 {
    end_offset(week_number(date), week_start)
}

/// Number of month pages spanned by the domain, both end months included.
pub fn count_month_pages(domain: &DateDomain) -> u32 {
    let (min, max) = (domain.min(), domain.max());
    MONTHS_PER_YEAR * u32::from(max.year() - min.year()) + u32::from(max.month()) + 1
        - u32::from(min.month())
}

/// Number of week pages: the domain's days padded to whole weeks at both ends.
pub fn count_week_pages(domain: &DateDomain, week_start: WeekStart) -> u32 {
    let pre = i64::from(week_start_offset(&domain.min(), week_start));
    let next = i64::from(week_end_offset(&domain.max(), week_start));
    let weeks = (pre + domain.day_count() + next) / i64::from(DAYS_PER_WEEK);
    u32::try_from(weeks).unwrap_or(u32::MAX)
}

/// Rows a month page occupies in the given display mode.
///
/// # Errors
/// Returns `DateError` for an invalid year or month.
pub fn rows_for_month(
    year: u16,
    month: u8,
    week_start: WeekStart,
    mode: MonthViewMode,
) -> Result<u8, DateError> {
    if mode == MonthViewMode::AllSixRows {
        return Ok(MONTH_GRID_ROWS);
    }
    let pre = month_start_offset(year, month, week_start)?;
    let next = month_end_offset(year, month, week_start)?;
    Ok((pre + days_in_month(year, month) + next) / DAYS_PER_WEEK)
}

/// Year and month shown on the month page at `index`, counting from the domain's first month.
pub fn month_page_at(domain: &DateDomain, index: u32) -> Option<(u16, u8)> {
    if index >= count_month_pages(domain) {
        return None;
    }
    let months = index + u32::from(domain.min().month()) - 1;
    let year = u32::from(domain.min().year()) + months / MONTHS_PER_YEAR;
    let month = months % MONTHS_PER_YEAR + 1;
    Some((u16::try_from(year).ok()?, u8::try_from(month).ok()?))
}

/// Index of the month page showing `year`/`month`, `None` when the month is outside the domain.
pub fn month_page_index(domain: &DateDomain, year: u16, month: u8) -> Option<u32> {
    if !domain.is_month_in_range(year, month) {
        return None;
    }
    let min = domain.min();
    Some(MONTHS_PER_YEAR * u32::from(year - min.year()) + u32::from(month) - u32::from(min.month()))
}

/// Date the month page at `index` selects when scrolled to, clamped into the domain.
///
/// The `LastSelected*` modes reuse the day of month of `last_selected`, shortened to the
/// page's month length. Without a last selection every mode selects day 1.
pub fn month_page_selection(
    domain: &DateDomain,
    index: u32,
    mode: DefaultSelectDay,
    last_selected: Option<&Date>,
) -> Option<Date> {
    let (year, month) = month_page_at(domain, index)?;
    let day = match (mode, last_selected) {
        (DefaultSelectDay::FirstDayOfMonth, _) | (_, None) => MIN_DAY,
        (_, Some(last)) => last.day().min(days_in_month(year, month)),
    };
    let date = Date::new(year, month, day).ok()?;
    Some(domain.edge_for(&date))
}

/// Date selected when the picker jumps to `target`.
///
/// Today wins when it lies in the domain, unless `mode` is `LastSelectedDayIgnoreToday`.
/// Otherwise `target` is clamped into the domain.
pub fn edge_selection(domain: &DateDomain, target: &Date, today: &Date, mode: DefaultSelectDay) -> Date {
    if domain.contains(today) && mode != DefaultSelectDay::LastSelectedDayIgnoreToday {
        return *today;
    }
    domain.edge_for(target)
}

/// First day of the week page at `index`.
pub fn week_page_start(domain: &DateDomain, index: u32, week_start: WeekStart) -> Option<Date> {
    if index >= count_week_pages(domain, week_start) {
        return None;
    }
    let anchor = domain
        .min()
        .add_days(i64::from(index) * i64::from(DAYS_PER_WEEK))
        .ok()?;
    anchor
        .add_days(-i64::from(week_start_offset(&anchor, week_start)))
        .ok()
}

/// Index of the week page containing `date`, `None` when the date is outside the domain.
pub fn week_page_index(domain: &DateDomain, date: &Date, week_start: WeekStart) -> Option<u32> {
    if !domain.contains(date) {
        return None;
    }
    let pre = i64::from(week_start_offset(&domain.min(), week_start));
    u32::try_from((pre + date.differ(&domain.min())) / i64::from(DAYS_PER_WEEK)).ok()
}

/// One-based row of `date` inside its own month page.
///
/// # Errors
/// Propagates `DateError` from the month offset computation.
pub fn week_row_in_month(date: &Date, week_start: WeekStart) -> Result<u8, DateError> {
    let pre = month_start_offset(date.year(), date.month(), week_start)?;
    Ok((date.day() + pre - 1) / DAYS_PER_WEEK + 1)
}

/// Builds annotated month and week pages.
#[derive(Debug, Clone, Copy)]
pub struct GridBuilder<'a> {
    annotator:  &'a FestivalAnnotator,
    week_start: WeekStart,
    today:      Date,
}

impl<'a> GridBuilder<'a> {
    pub const fn new(annotator: &'a FestivalAnnotator, week_start: WeekStart, today: Date) -> Self {
        Self {
            annotator,
            week_start,
            today,
        }
    }

    fn cell(&self, date: Date, is_current_month: bool) -> Day {
        let mut day = Day::new(date);
        day.is_current_month = is_current_month;
        day.is_today = date == self.today;
        self.annotator.annotate(&mut day);
        day
    }

    /// The 42 cells of a month page: trailing days of the previous month, the month itself,
    /// then leading days of the next month.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid month or when a neighbouring month falls outside
    /// the representable years.
    pub fn month_grid(&self, year: u16, month: u8) -> Result<Vec<Day>, DateError> {
        let pre = month_start_offset(year, month, self.week_start)?;
        let day_count = days_in_month(year, month);

        let ((pre_year, pre_month), (next_year, next_month)) = match month {
            JANUARY => ((year.wrapping_sub(1), DECEMBER), (year, month + 1)),
            DECEMBER => ((year, month - 1), (year.wrapping_add(1), JANUARY)),
            _ => ((year, month - 1), (year, month + 1)),
        };
        // Only needed when the page shows days of the previous month.
        let pre_month_days = if pre == 0 {
            0
        } else {
            Date::last_of_month(pre_year, pre_month)?.day()
        };

        let mut cells = Vec::with_capacity(MONTH_GRID_CELLS);
        let mut next_day = MIN_DAY;
        for i in 0..MONTH_GRID_CELLS {
            #[allow(clippy::cast_possible_truncation)]
            let i = i as u8;
            let day = if i < pre {
                self.cell(Date::new(pre_year, pre_month, pre_month_days - pre + i + 1)?, false)
            } else if i >= day_count + pre {
                let date = Date::new(next_year, next_month, next_day)?;
                next_day += 1;
                self.cell(date, false)
            } else {
                self.cell(Date::new(year, month, i - pre + 1)?, true)
            };
            cells.push(day);
        }
        Ok(cells)
    }

    /// The 7 cells of the week containing `anchor`, all flagged as current.
    ///
    /// # Errors
    /// Returns `DateError` when the week runs outside the representable years.
    pub fn week_grid(&self, anchor: &Date) -> Result<Vec<Day>, DateError> {
        let first = anchor.add_days(-i64::from(week_start_offset(anchor, self.week_start)))?;
        (0..i64::from(DAYS_PER_WEEK))
            .map(|offset| Ok(self.cell(first.add_days(offset)?, true)))
            .collect()
    }
}
