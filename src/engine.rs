//! The facade a date picker talks to.
//!
//! [`CalendarEngine`] owns the configuration, the annotator, the scheme markers and the
//! selection state. Queries build pages on demand; commands run through the selection
//! engine and forward what happened to every registered listener.

use std::collections::HashMap;
use std::fmt;

use tracing::{debug, warn};

use crate::{
    ApparentSolarTerms, CalendarConfig, CalendarEvent, CalendarListener, CellPainter, ConfigError,
    Date, DateDomain, DateError, Day, DefaultSelectDay, FestivalAnnotator, GridBuilder, Marker,
    MonthViewMode, SchemeStore, SelectError, SelectionEngine, SelectionMode, SelectionState,
    SolarTermSource, WeekStart, count_month_pages, count_week_pages, edge_selection,
    month_page_selection, paint_grid, rows_for_month,
};

pub struct CalendarEngine {
    config:    CalendarConfig,
    today:     Date,
    annotator: FestivalAnnotator,
    schemes:   SchemeStore,
    selection: SelectionEngine,
    listeners: Vec<Box<dyn CalendarListener>>,
}

impl fmt::Debug for CalendarEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CalendarEngine")
            .field("domain", &self.config.domain)
            .field("week_start", &self.config.week_start)
            .field("today", &self.today)
            .field("schemes", &self.schemes.len())
            .field("selection", &self.selection)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl CalendarEngine {
    /// Builds an engine with the apparent solar term generator.
    ///
    /// # Errors
    /// Returns the `CalendarConfig::validate` errors.
    pub fn from_config(config: CalendarConfig) -> Result<Self, ConfigError> {
        Self::with_solar_terms(config, Box::new(ApparentSolarTerms))
    }

    /// Builds an engine drawing solar terms from `source`.
    ///
    /// # Errors
    /// Returns the `CalendarConfig::validate` errors.
    pub fn with_solar_terms(
        config: CalendarConfig,
        source: Box<dyn SolarTermSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let today = Date::today().unwrap_or_else(|err| {
            warn!(%err, "system clock outside the supported years, using domain minimum as today");
            config.domain.min()
        });
        let mut selection = SelectionEngine::new(config.selection_mode);
        selection.set_range_bounds(config.min_range, config.max_range)?;
        selection.set_max_multi(config.max_multi_select)?;

        debug!(domain = %config.domain, week_start = %config.week_start, "calendar engine created");
        Ok(Self {
            annotator: FestivalAnnotator::with_source(config.labels.clone(), source),
            config,
            today,
            schemes: SchemeStore::new(),
            selection,
            listeners: Vec::new(),
        })
    }

    pub const fn config(&self) -> &CalendarConfig {
        &self.config
    }

    pub const fn domain(&self) -> &DateDomain {
        &self.config.domain
    }

    pub const fn today(&self) -> Date {
        self.today
    }

    pub const fn set_today(&mut self, today: Date) {
        self.today = today;
    }

    /// Replaces the domain. An invalid domain leaves the engine untouched.
    ///
    /// A single selection outside the new domain moves to its minimum.
    ///
    /// # Errors
    /// Returns `ConfigError::Domain` when min > max or a bound is outside the lunar table.
    pub fn set_domain(&mut self, min: Date, max: Date) -> Result<(), ConfigError> {
        let domain = DateDomain::new(min, max)?;
        self.config.domain = domain;
        self.selection.retain_in_domain(&domain);
        debug!(%domain, "domain changed");
        Ok(())
    }

    pub fn set_week_start(&mut self, week_start: WeekStart) {
        self.config.week_start = week_start;
        debug!(%week_start, "week start changed");
    }

    pub fn set_month_view_mode(&mut self, mode: MonthViewMode) {
        self.config.month_view_mode = mode;
    }

    pub fn set_default_select_day(&mut self, mode: DefaultSelectDay) {
        self.config.default_select_day = mode;
    }

    /// Switches selection mode, clearing every selection.
    pub fn set_selection_mode(&mut self, mode: SelectionMode) {
        self.config.selection_mode = mode;
        self.selection.set_mode(mode);
    }

    /// # Errors
    /// Returns `ConfigError::InvalidRangeBounds` when both bounds are set and min > max.
    pub fn set_range_bounds(&mut self, min: i32, max: i32) -> Result<(), ConfigError> {
        self.selection.set_range_bounds(min, max)?;
        self.config.min_range = min;
        self.config.max_range = max;
        Ok(())
    }

    /// # Errors
    /// Returns `ConfigError::InvalidMultiSelectSize` for zero.
    pub fn set_max_multi_select_size(&mut self, max: u32) -> Result<(), ConfigError> {
        self.selection.set_max_multi(max)?;
        self.config.max_multi_select = max;
        Ok(())
    }

    /// Blocks every date for which `intercept` returns `true`.
    pub fn set_intercept(&mut self, intercept: impl Fn(&Date) -> bool + 'static) {
        self.selection.set_intercept(intercept);
    }

    pub fn clear_intercept(&mut self) {
        self.selection.clear_intercept();
    }

    pub fn set_schemes(&mut self, markers: HashMap<String, Marker>) {
        self.schemes.set_schemes(markers);
    }

    pub fn add_schemes(&mut self, markers: HashMap<String, Marker>) {
        self.schemes.add_schemes(markers);
    }

    pub fn add_scheme(&mut self, date: &Date, marker: Marker) {
        self.schemes.add_scheme(date, marker);
    }

    pub fn remove_scheme(&mut self, date: &Date) -> Option<Marker> {
        self.schemes.remove_scheme(date)
    }

    pub fn clear_schemes(&mut self) {
        self.schemes.clear();
    }

    pub const fn schemes(&self) -> &SchemeStore {
        &self.schemes
    }

    pub fn add_listener(&mut self, listener: impl CalendarListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    const fn grid_builder(&self) -> GridBuilder<'_> {
        GridBuilder::new(&self.annotator, self.config.week_start, self.today)
    }

    fn apply_schemes(&self, cells: &mut [Day]) {
        for day in cells {
            self.schemes.apply(day, &self.config.scheme_text);
        }
    }

    /// The 42 annotated cells of a month page, scheme markers applied.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid month.
    pub fn month_grid(&self, year: u16, month: u8) -> Result<Vec<Day>, DateError> {
        let mut cells = self.grid_builder().month_grid(year, month)?;
        self.apply_schemes(&mut cells);
        Ok(cells)
    }

    /// The 7 annotated cells of the week containing `anchor`, scheme markers applied.
    ///
    /// # Errors
    /// Returns `DateError` when the week leaves the representable years.
    pub fn week_grid(&self, anchor: &Date) -> Result<Vec<Day>, DateError> {
        let mut cells = self.grid_builder().week_grid(anchor)?;
        self.apply_schemes(&mut cells);
        Ok(cells)
    }

    /// Rows the month page needs in the configured view mode.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid month.
    pub fn rows_for_month(&self, year: u16, month: u8) -> Result<u8, DateError> {
        rows_for_month(year, month, self.config.week_start, self.config.month_view_mode)
    }

    /// Builds a month page and hands it to `painter`. Returns the number of painted cells.
    ///
    /// # Errors
    /// Returns `DateError` for an invalid month.
    pub fn paint_month<P: CellPainter + ?Sized>(
        &self,
        year: u16,
        month: u8,
        painter: &mut P,
    ) -> Result<usize, DateError> {
        let cells = self.month_grid(year, month)?;
        let rows = self.rows_for_month(year, month)?;
        Ok(paint_grid(&cells, rows, self.config.month_view_mode, &self.selection, painter))
    }

    pub fn month_page_count(&self) -> u32 {
        count_month_pages(&self.config.domain)
    }

    pub fn week_page_count(&self) -> u32 {
        count_week_pages(&self.config.domain, self.config.week_start)
    }

    /// Date the month page at `index` selects when scrolled to, `None` past the last page.
    pub fn month_page_selection(&self, index: u32) -> Option<Date> {
        let last = self.selection.state().last_selected();
        month_page_selection(&self.config.domain, index, self.config.default_select_day, last.as_ref())
    }

    /// Date selected when the picker jumps to `target`.
    pub fn edge_selection(&self, target: &Date) -> Date {
        edge_selection(&self.config.domain, target, &self.today, self.config.default_select_day)
    }

    /// Text shown under `date`: solar term, festival, or lunar numeral.
    pub fn lunar_label(&self, date: &Date) -> String {
        self.annotator.display_label(date)
    }

    pub const fn current_selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn multi_selected(&self) -> Vec<Date> {
        self.selection.multi_selected()
    }

    pub fn range_dates(&self) -> Vec<Date> {
        self.selection.range_dates()
    }

    pub fn is_selected(&self, date: &Date) -> bool {
        self.selection.is_selected(date)
    }

    fn dispatch(&mut self, outcome: Result<Vec<CalendarEvent>, SelectError>) -> Result<(), SelectError> {
        match outcome {
            Ok(events) => {
                for event in &events {
                    self.notify(event);
                }
                Ok(())
            },
            Err(err) => {
                debug!(%err, "selection rejected");
                if let Some(event) = CalendarEvent::rejection(&err) {
                    self.notify(&event);
                }
                Err(err)
            },
        }
    }

    fn notify(&mut self, event: &CalendarEvent) {
        for listener in &mut self.listeners {
            listener.on_event(event);
        }
    }

    /// # Errors
    /// Returns the `SelectError` that listeners were also told about.
    pub fn select_single(&mut self, date: Date, is_click: bool) -> Result<(), SelectError> {
        let outcome = self.selection.select_single(date, is_click, &self.config.domain);
        self.dispatch(outcome)
    }

    /// # Errors
    /// Returns the `SelectError` that listeners were also told about.
    pub fn select_range(&mut self, date: Date) -> Result<(), SelectError> {
        let outcome = self.selection.select_range(date, &self.config.domain);
        self.dispatch(outcome)
    }

    /// # Errors
    /// Returns the `SelectError` that listeners were also told about.
    pub fn toggle_multi(&mut self, date: Date) -> Result<(), SelectError> {
        let outcome = self.selection.toggle_multi(date, &self.config.domain);
        self.dispatch(outcome)
    }

    /// # Errors
    /// Returns the `SelectError` that listeners were also told about.
    pub fn set_selected_range(&mut self, start: Date, end: Date) -> Result<(), SelectError> {
        let outcome = self.selection.set_selected_range(start, end, &self.config.domain);
        self.dispatch(outcome)
    }

    /// # Errors
    /// Returns the `SelectError` that listeners were also told about.
    pub fn set_range_start(&mut self, date: Date) -> Result<(), SelectError> {
        let outcome = self
            .selection
            .set_range_start(date, &self.config.domain)
            .map(|()| Vec::new());
        self.dispatch(outcome)
    }

    pub fn put_multi(&mut self, dates: impl IntoIterator<Item = Date>) -> usize {
        self.selection.put_multi(dates)
    }

    pub fn remove_multi(&mut self, dates: impl IntoIterator<Item = Date>) -> usize {
        self.selection.remove_multi(dates)
    }

    pub fn clear_single(&mut self) {
        self.selection.clear_single();
    }

    pub fn clear_range(&mut self) {
        self.selection.clear_range();
    }

    pub fn clear_multi(&mut self) {
        self.selection.clear_multi();
    }
}
