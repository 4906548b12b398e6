//! The selection state machine shared by single, range and multi modes.
//!
//! Every command validates first and mutates last, so a rejected command leaves the state
//! exactly as it was. Commands return the events they produced; the engine facade forwards
//! them to listeners.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::consts::UNBOUNDED;
use crate::prelude::*;
use crate::{CalendarEvent, ConfigError, Date, DateDomain};

/// Which selection rules apply.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SelectionMode {
    #[default]
    #[display(fmt = "single")]
    Single,
    #[display(fmt = "range")]
    Range,
    #[display(fmt = "multi")]
    Multi,
}

/// Error type for rejected selection commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SelectError {
    /// Date outside the configured domain.
    #[error("{0} is outside the selectable domain")]
    OutOfRange(Date),

    /// Date blocked by the intercept predicate.
    #[error("{0} is intercepted")]
    Intercepted(Date),

    #[error("Range ending {date} spans {len} days, at least {min} required")]
    RangeTooShort { date: Date, min: i32, len: i64 },

    #[error("Range ending {date} spans {len} days, at most {max} allowed")]
    RangeTooLong { date: Date, max: i32, len: i64 },

    #[error("Cannot select {date}: already {max} dates selected")]
    MultiSelectFull { date: Date, max: u32 },

    /// Command issued while another selection mode is active.
    #[error("Command needs {expected} mode but {actual} mode is active")]
    ModeMismatch {
        expected: SelectionMode,
        actual:   SelectionMode,
    },

    #[error("Range end {end} is before start {start}")]
    ReversedRange { start: Date, end: Date },
}

/// Snapshot of what is selected.
///
/// Only the fields of the active mode are ever populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionState {
    pub mode:        SelectionMode,
    pub single:      Option<Date>,
    pub range_start: Option<Date>,
    pub range_end:   Option<Date>,
    /// Multi selection in insertion order, unique by date key
    pub multi:       Vec<Date>,
}

impl SelectionState {
    fn new(mode: SelectionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Whether the range has both ends.
    pub const fn is_range_closed(&self) -> bool {
        self.range_start.is_some() && self.range_end.is_some()
    }

    /// The most recently picked date of the active mode: the single date, the range end
    /// (or its open start), or the last multi insertion.
    pub fn last_selected(&self) -> Option<Date> {
        match self.mode {
            SelectionMode::Single => self.single,
            SelectionMode::Range => self.range_end.or(self.range_start),
            SelectionMode::Multi => self.multi.last().copied(),
        }
    }
}

type Intercept = Box<dyn Fn(&Date) -> bool>;

pub struct SelectionEngine {
    state:     SelectionState,
    min_range: i32,
    max_range: i32,
    max_multi: u32,
    intercept: Option<Intercept>,
}

impl fmt::Debug for SelectionEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SelectionEngine")
            .field("state", &self.state)
            .field("min_range", &self.min_range)
            .field("max_range", &self.max_range)
            .field("max_multi", &self.max_multi)
            .field("intercept", &self.intercept.is_some())
            .finish()
    }
}

impl Default for SelectionEngine {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl SelectionEngine {
    pub fn new(mode: SelectionMode) -> Self {
        Self {
            state:     SelectionState::new(mode),
            min_range: UNBOUNDED,
            max_range: UNBOUNDED,
            max_multi: u32::MAX,
            intercept: None,
        }
    }

    pub const fn state(&self) -> &SelectionState {
        &self.state
    }

    pub const fn mode(&self) -> SelectionMode {
        self.state.mode
    }

    pub const fn min_range(&self) -> i32 {
        self.min_range
    }

    pub const fn max_range(&self) -> i32 {
        self.max_range
    }

    pub const fn max_multi(&self) -> u32 {
        self.max_multi
    }

    /// Switches mode, dropping everything selected so far.
    pub fn set_mode(&mut self, mode: SelectionMode) {
        debug!(from = %self.state.mode, to = %mode, "selection mode changed");
        self.state = SelectionState::new(mode);
    }

    /// Sets the inclusive day-count bounds of a range, `-1` meaning no limit.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRangeBounds` when both bounds are set and min > max.
    pub fn set_range_bounds(&mut self, min: i32, max: i32) -> Result<(), ConfigError> {
        if min != UNBOUNDED && max != UNBOUNDED && min > max {
            return Err(ConfigError::InvalidRangeBounds { min, max });
        }
        self.min_range = min;
        self.max_range = max;
        debug!(min, max, "range bounds changed");
        Ok(())
    }

    /// Sets the multi-select capacity. A smaller capacity keeps the earliest selected dates.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidMultiSelectSize` for zero.
    pub fn set_max_multi(&mut self, max: u32) -> Result<(), ConfigError> {
        if max == 0 {
            return Err(ConfigError::InvalidMultiSelectSize);
        }
        self.max_multi = max;
        let capacity = usize::try_from(max).unwrap_or(usize::MAX);
        self.state.multi.truncate(capacity);
        debug!(max, size = self.state.multi.len(), "multi-select capacity changed");
        Ok(())
    }

    pub fn set_intercept(&mut self, intercept: impl Fn(&Date) -> bool + 'static) {
        self.intercept = Some(Box::new(intercept));
    }

    pub fn clear_intercept(&mut self) {
        self.intercept = None;
    }

    pub fn is_intercepted(&self, date: &Date) -> bool {
        self.intercept.as_ref().is_some_and(|intercept| intercept(date))
    }

    fn expect_mode(&self, expected: SelectionMode) -> Result<(), SelectError> {
        if self.state.mode == expected {
            Ok(())
        } else {
            Err(SelectError::ModeMismatch {
                expected,
                actual: self.state.mode,
            })
        }
    }

    fn check(&self, date: &Date, domain: &DateDomain) -> Result<(), SelectError> {
        if self.is_intercepted(date) {
            return Err(SelectError::Intercepted(*date));
        }
        if !domain.contains(date) {
            return Err(SelectError::OutOfRange(*date));
        }
        Ok(())
    }

    fn check_span(&self, end: &Date, diff: i64) -> Result<(), SelectError> {
        let len = diff + 1;
        if self.min_range != UNBOUNDED && i64::from(self.min_range) > len {
            return Err(SelectError::RangeTooShort {
                date: *end,
                min: self.min_range,
                len,
            });
        }
        if self.max_range != UNBOUNDED && i64::from(self.max_range) < len {
            return Err(SelectError::RangeTooLong {
                date: *end,
                max: self.max_range,
                len,
            });
        }
        Ok(())
    }

    fn multi_position(&self, date: &Date) -> Option<usize> {
        self.state.multi.iter().position(|selected| selected == date)
    }

    fn multi_event(&self, date: Date) -> CalendarEvent {
        CalendarEvent::MultiSelectChanged {
            date,
            size: self.state.multi.len(),
            max: self.max_multi,
        }
    }

    /// Selects one date in single mode.
    ///
    /// # Errors
    /// `Intercepted`, `OutOfRange`, or `ModeMismatch` outside single mode.
    pub fn select_single(
        &mut self,
        date: Date,
        is_click: bool,
        domain: &DateDomain,
    ) -> Result<Vec<CalendarEvent>, SelectError> {
        self.expect_mode(SelectionMode::Single)?;
        self.check(&date, domain)?;
        self.state.single = Some(date);
        Ok(vec![CalendarEvent::SelectionChanged { date, is_click }])
    }

    /// Feeds one click into the range state machine.
    ///
    /// An open range is closed by a later date whose inclusive span satisfies the bounds.
    /// An earlier date restarts the range from it. The same date closes a one-day range only
    /// when the minimum is exactly 1.
    ///
    /// # Errors
    /// `Intercepted`, `OutOfRange`, `RangeTooShort`, `RangeTooLong`, or `ModeMismatch`
    /// outside range mode.
    pub fn select_range(
        &mut self,
        date: Date,
        domain: &DateDomain,
    ) -> Result<Vec<CalendarEvent>, SelectError> {
        self.expect_mode(SelectionMode::Range)?;
        self.check(&date, domain)?;

        let start = match self.state.range_start {
            Some(start) if self.state.range_end.is_none() => start,
            _ => return Ok(self.restart_range(date)),
        };

        let diff = date.differ(&start);
        if (self.min_range == UNBOUNDED && diff <= 0) || diff < 0 {
            return Ok(self.restart_range(date));
        }
        if diff == 0 && self.min_range == 1 {
            self.state.range_end = Some(date);
            return Ok(vec![
                CalendarEvent::RangeSelected {
                    date:   start,
                    is_end: false,
                },
                CalendarEvent::RangeSelected { date, is_end: true },
            ]);
        }

        self.check_span(&date, diff)?;
        self.state.range_end = Some(date);
        Ok(vec![
            CalendarEvent::RangeSelected {
                date:   start,
                is_end: false,
            },
            CalendarEvent::RangeSelected { date, is_end: true },
        ])
    }

    fn restart_range(&mut self, date: Date) -> Vec<CalendarEvent> {
        self.state.range_start = Some(date);
        self.state.range_end = None;
        vec![CalendarEvent::RangeSelected { date, is_end: false }]
    }

    /// Adds `date` to the multi selection, or removes it when already selected.
    ///
    /// # Errors
    /// `Intercepted`, `OutOfRange`, `MultiSelectFull`, or `ModeMismatch` outside multi mode.
    pub fn toggle_multi(
        &mut self,
        date: Date,
        domain: &DateDomain,
    ) -> Result<Vec<CalendarEvent>, SelectError> {
        self.expect_mode(SelectionMode::Multi)?;
        self.check(&date, domain)?;

        if let Some(index) = self.multi_position(&date) {
            self.state.multi.remove(index);
            return Ok(vec![self.multi_event(date)]);
        }
        if self.state.multi.len() >= usize::try_from(self.max_multi).unwrap_or(usize::MAX) {
            return Err(SelectError::MultiSelectFull {
                date,
                max: self.max_multi,
            });
        }
        self.state.multi.push(date);
        Ok(vec![self.multi_event(date)])
    }

    /// Sets both ends of a range at once, under the same checks as clicking them.
    ///
    /// A zero-length range with no minimum only sets the start.
    ///
    /// # Errors
    /// `Intercepted` for either end, `ReversedRange`, `OutOfRange`, `RangeTooShort`,
    /// `RangeTooLong`, or `ModeMismatch` outside range mode.
    pub fn set_selected_range(
        &mut self,
        start: Date,
        end: Date,
        domain: &DateDomain,
    ) -> Result<Vec<CalendarEvent>, SelectError> {
        self.expect_mode(SelectionMode::Range)?;
        for date in [start, end] {
            if self.is_intercepted(&date) {
                return Err(SelectError::Intercepted(date));
            }
        }
        let diff = end.differ(&start);
        if diff < 0 {
            return Err(SelectError::ReversedRange { start, end });
        }
        for date in [start, end] {
            if !domain.contains(&date) {
                return Err(SelectError::OutOfRange(date));
            }
        }
        self.check_span(&end, diff)?;

        if self.min_range == UNBOUNDED && diff == 0 {
            return Ok(self.restart_range(start));
        }
        self.state.range_start = Some(start);
        self.state.range_end = Some(end);
        Ok(vec![
            CalendarEvent::RangeSelected {
                date:   start,
                is_end: false,
            },
            CalendarEvent::RangeSelected {
                date:   end,
                is_end: true,
            },
        ])
    }

    /// Opens a new range at `date` without emitting events.
    ///
    /// # Errors
    /// `Intercepted`, `OutOfRange`, or `ModeMismatch` outside range mode.
    pub fn set_range_start(&mut self, date: Date, domain: &DateDomain) -> Result<(), SelectError> {
        self.expect_mode(SelectionMode::Range)?;
        self.check(&date, domain)?;
        self.restart_range(date);
        Ok(())
    }

    /// Adds dates to the multi selection without emitting events, skipping dates already
    /// selected and stopping at capacity. Returns how many were added.
    pub fn put_multi(&mut self, dates: impl IntoIterator<Item = Date>) -> usize {
        let capacity = usize::try_from(self.max_multi).unwrap_or(usize::MAX);
        let mut added = 0;
        for date in dates {
            if self.state.multi.len() >= capacity {
                break;
            }
            if self.multi_position(&date).is_none() {
                self.state.multi.push(date);
                added += 1;
            }
        }
        added
    }

    /// Removes dates from the multi selection. Returns how many were removed.
    pub fn remove_multi(&mut self, dates: impl IntoIterator<Item = Date>) -> usize {
        let mut removed = 0;
        for date in dates {
            if let Some(index) = self.multi_position(&date) {
                self.state.multi.remove(index);
                removed += 1;
            }
        }
        removed
    }

    pub fn clear_single(&mut self) {
        self.state.single = None;
    }

    pub fn clear_range(&mut self) {
        self.state.range_start = None;
        self.state.range_end = None;
    }

    pub fn clear_multi(&mut self) {
        self.state.multi.clear();
    }

    /// Moves the single selection to the domain minimum when it fell outside the domain.
    pub(crate) fn retain_in_domain(&mut self, domain: &DateDomain) {
        match self.state.single {
            Some(single) if !domain.contains(&single) => {
                debug!(%single, moved_to = %domain.min(), "single selection left the domain");
                self.state.single = Some(domain.min());
            },
            _ => {},
        }
    }

    /// The multi selection in ascending date order.
    pub fn multi_selected(&self) -> Vec<Date> {
        let mut dates = self.state.multi.clone();
        dates.sort_unstable();
        dates
    }

    /// Every date of a closed range except intercepted ones. Empty while the range is open.
    pub fn range_dates(&self) -> Vec<Date> {
        let (Some(start), Some(end)) = (self.state.range_start, self.state.range_end) else {
            return Vec::new();
        };
        (0..=end.differ(&start))
            .filter_map(|offset| start.add_days(offset).ok())
            .filter(|date| !self.is_intercepted(date))
            .collect()
    }

    /// Whether `date` renders as selected in the active mode.
    pub fn is_selected(&self, date: &Date) -> bool {
        match self.state.mode {
            SelectionMode::Single => self.state.single.as_ref() == Some(date),
            SelectionMode::Range => {
                if self.is_intercepted(date) {
                    return false;
                }
                match (self.state.range_start, self.state.range_end) {
                    (Some(start), Some(end)) => start <= *date && *date <= end,
                    (Some(start), None) => start == *date,
                    _ => false,
                }
            },
            SelectionMode::Multi => self.multi_position(date).is_some(),
        }
    }
}
