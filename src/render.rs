//! Drawing capability for built grids.
//!
//! The engine never draws. A renderer implements [`CellPainter`] and [`paint_grid`] walks
//! the cells, working out per-cell state and calling the hooks in a fixed order.

use crate::consts::DAYS_PER_WEEK;
use crate::{Date, Day, MonthViewMode, SelectionEngine};

/// What a painter needs to know about one cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellState {
    pub is_selected:      bool,
    pub has_scheme:       bool,
    /// The previous day is selected too
    pub is_pre_selected:  bool,
    /// The next day is selected too
    pub is_next_selected: bool,
}

/// Hooks called for every painted cell.
pub trait CellPainter {
    /// Draws the selection background. Returning `true` asks for the scheme to be drawn
    /// over it as well.
    fn draw_selected(&mut self, day: &Day, index: usize, state: &CellState) -> bool;

    fn draw_scheme(&mut self, day: &Day, index: usize, state: &CellState);

    /// Always called last for a painted cell.
    fn draw_text(&mut self, day: &Day, index: usize, state: &CellState);
}

fn cell_state(day: &Day, selection: &SelectionEngine) -> CellState {
    let is_selected = selection.is_selected(day);
    let neighbour_selected =
        |neighbour: Option<Date>| neighbour.is_some_and(|date| selection.is_selected(&date));
    CellState {
        is_selected,
        has_scheme: day.has_scheme(),
        is_pre_selected: is_selected && neighbour_selected(day.pred()),
        is_next_selected: is_selected && neighbour_selected(day.succ()),
    }
}

/// Paints `cells` laid out in rows of seven. Returns the number of cells painted.
///
/// `CurrentMonthOnly` skips cells of neighbouring months. `FitExact` stops after
/// `rows` full rows.
pub fn paint_grid<P: CellPainter + ?Sized>(
    cells: &[Day],
    rows: u8,
    mode: MonthViewMode,
    selection: &SelectionEngine,
    painter: &mut P,
) -> usize {
    let limit = match mode {
        MonthViewMode::AllSixRows => cells.len(),
        MonthViewMode::CurrentMonthOnly | MonthViewMode::FitExact => {
            cells.len().min(usize::from(rows) * usize::from(DAYS_PER_WEEK))
        },
    };

    let mut painted = 0;
    for (index, day) in cells.iter().enumerate().take(limit) {
        if mode == MonthViewMode::CurrentMonthOnly && !day.is_current_month {
            continue;
        }
        let state = cell_state(day, selection);
        let draw_scheme_too = state.is_selected && painter.draw_selected(day, index, &state);
        if state.has_scheme && (draw_scheme_too || !state.is_selected) {
            painter.draw_scheme(day, index, &state);
        }
        painter.draw_text(day, index, &state);
        painted += 1;
    }
    painted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{date, domain};
    use crate::{FestivalAnnotator, GridBuilder, Marker, SelectionMode, WeekStart};

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Selected(usize),
        Scheme(usize),
        Text(usize),
    }

    #[derive(Default)]
    struct Recorder {
        calls:            Vec<Call>,
        scheme_over_pick: bool,
        states:           Vec<(usize, CellState)>,
    }

    impl CellPainter for Recorder {
        fn draw_selected(&mut self, _day: &Day, index: usize, _state: &CellState) -> bool {
            self.calls.push(Call::Selected(index));
            self.scheme_over_pick
        }

        fn draw_scheme(&mut self, _day: &Day, index: usize, _state: &CellState) {
            self.calls.push(Call::Scheme(index));
        }

        fn draw_text(&mut self, _day: &Day, index: usize, state: &CellState) {
            self.calls.push(Call::Text(index));
            self.states.push((index, *state));
        }
    }

    fn march_2024() -> Vec<Day> {
        let annotator = FestivalAnnotator::default();
        GridBuilder::new(&annotator, WeekStart::Sunday, date(2024, 3, 1))
            .month_grid(2024, 3)
            .expect("March 2024 grid must build")
    }

    #[test]
    fn test_hook_order() {
        // March 2024 starts on a Friday: index 5 is 03-01, index 6 is 03-02.
        let mut cells = march_2024();
        cells[5].marker = Marker::new(1, "Pay day");
        cells[6].marker = Marker::new(1, "Trip");

        let mut selection = SelectionEngine::new(SelectionMode::Single);
        selection
            .select_single(date(2024, 3, 1), true, &domain(date(2024, 1, 1), date(2024, 12, 31)))
            .expect("in-domain date");

        struct TestCase {
            scheme_over_pick: bool,
            expected:         &'static [Call],
            description:      &'static str,
        }

        let cases = [
            TestCase {
                scheme_over_pick: false,
                expected:         &[Call::Selected(5), Call::Text(5), Call::Scheme(6), Call::Text(6)],
                description:      "selection hides the scheme",
            },
            TestCase {
                scheme_over_pick: true,
                expected:         &[
                    Call::Selected(5),
                    Call::Scheme(5),
                    Call::Text(5),
                    Call::Scheme(6),
                    Call::Text(6),
                ],
                description:      "painter asks for the scheme over the selection",
            },
        ];

        for case in &cases {
            let mut recorder = Recorder {
                scheme_over_pick: case.scheme_over_pick,
                ..Recorder::default()
            };
            paint_grid(&cells, 6, MonthViewMode::AllSixRows, &selection, &mut recorder);
            let around: Vec<Call> = recorder
                .calls
                .into_iter()
                .filter(|call| matches!(call, Call::Selected(5 | 6) | Call::Scheme(5 | 6) | Call::Text(5 | 6)))
                .collect();
            assert_eq!(around, case.expected, "{}", case.description);
        }
    }

    #[test]
    fn test_view_modes_limit_cells() {
        let cells = march_2024();
        let selection = SelectionEngine::default();
        // March 2024 with Sunday start needs 6 rows; use 5 to see the cut.
        let mut recorder = Recorder::default();
        assert_eq!(paint_grid(&cells, 5, MonthViewMode::FitExact, &selection, &mut recorder), 35);

        let mut recorder = Recorder::default();
        assert_eq!(paint_grid(&cells, 6, MonthViewMode::CurrentMonthOnly, &selection, &mut recorder), 31);

        let mut recorder = Recorder::default();
        assert_eq!(paint_grid(&cells, 6, MonthViewMode::AllSixRows, &selection, &mut recorder), 42);
    }

    #[test]
    fn test_range_neighbours() {
        let cells = march_2024();
        let mut selection = SelectionEngine::new(SelectionMode::Range);
        selection
            .set_selected_range(date(2024, 3, 4), date(2024, 3, 6), &domain(date(2024, 1, 1), date(2024, 12, 31)))
            .expect("valid range");

        let mut recorder = Recorder::default();
        paint_grid(&cells, 6, MonthViewMode::AllSixRows, &selection, &mut recorder);
        let state_of = |index: usize| {
            recorder
                .states
                .iter()
                .find(|(painted, _)| *painted == index)
                .map(|(_, state)| *state)
                .expect("cell must be painted")
        };

        // Index 8 is 03-04, index 10 is 03-06.
        assert!(!state_of(8).is_pre_selected && state_of(8).is_next_selected);
        assert!(state_of(9).is_pre_selected && state_of(9).is_next_selected);
        assert!(state_of(10).is_pre_selected && !state_of(10).is_next_selected);
        assert_eq!(state_of(11), CellState::default());
    }
}
