mod config;
mod consts;
mod date;
mod day;
mod engine;
mod event;
mod festival;
mod grid;
mod labels;
mod lunar;
mod prelude;
mod range;
mod render;
mod scheme;
mod selection;
mod solar_term;
mod types;

#[cfg(test)]
mod test_utils;

pub use config::{CalendarConfig, ConfigError};
pub use consts::*;
pub use date::Date;
pub use day::Day;
pub use engine::CalendarEngine;
pub use event::{CalendarEvent, CalendarListener};
pub use festival::FestivalAnnotator;
pub use grid::{
    DefaultSelectDay, GridBuilder, MonthViewMode, WeekStart, count_month_pages, count_week_pages,
    edge_selection, month_end_offset, month_page_at, month_page_index, month_page_selection,
    month_start_offset, rows_for_month, week_end_offset, week_page_index, week_page_start,
    week_row_in_month, week_start_offset,
};
pub use labels::Labels;
pub use lunar::{
    LunarDate, days_in_lunar_month, leap_month, leap_month_days, lunar_new_year, lunar_to_solar,
    lunar_year_days, sexagenary_year, solar_to_lunar,
};
pub use range::{DateDomain, DomainError};
pub use render::{CellPainter, CellState, paint_grid};
pub use scheme::{Marker, Scheme, SchemeStore};
pub use selection::{SelectError, SelectionEngine, SelectionMode, SelectionState};
pub use solar_term::{ApparentSolarTerms, MeanSolarTerms, SolarTermSource};
pub use types::{DayOfMonth, Month, Year};

use crate::prelude::*;

/// Errors raised while building or converting a single date.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be 1-{})", "_0", MAX_YEAR)]
    InvalidYear(u16),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: u16, month: u8, day: u8 },
    #[display(fmt = "Empty date string")]
    EmptyInput,
    #[display(
        fmt = "Year {} is outside the lunar table ({}-{})",
        "_0",
        MIN_LUNAR_YEAR,
        MAX_LUNAR_YEAR
    )]
    OutOfLunarDomain(u16),
}

impl std::error::Error for DateError {}
