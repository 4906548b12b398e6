use crate::{Date, SelectError};

/// Notifications produced by selection commands, delivered in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CalendarEvent {
    /// Single selection moved to `date`
    SelectionChanged { date: Date, is_click: bool },
    /// A range endpoint was committed
    RangeSelected { date: Date, is_end: bool },
    /// A range endpoint violated the configured day-count bounds
    RangeRejected { date: Date, reason: SelectError },
    /// A date entered or left the multi selection
    MultiSelectChanged { date: Date, size: usize, max: u32 },
    /// The multi selection is at capacity
    MultiRejected { date: Date, reason: SelectError },
    OutOfRangeRejected(Date),
    InterceptedClick(Date),
}

impl CalendarEvent {
    /// The event a listener receives for a rejected command, if any.
    ///
    /// Mode mismatches and reversed programmatic ranges are only reported to the caller.
    pub fn rejection(error: &SelectError) -> Option<Self> {
        match error {
            SelectError::OutOfRange(date) => Some(Self::OutOfRangeRejected(*date)),
            SelectError::Intercepted(date) => Some(Self::InterceptedClick(*date)),
            SelectError::RangeTooShort { date, .. } | SelectError::RangeTooLong { date, .. } => {
                Some(Self::RangeRejected {
                    date:   *date,
                    reason: error.clone(),
                })
            },
            SelectError::MultiSelectFull { date, .. } => Some(Self::MultiRejected {
                date:   *date,
                reason: error.clone(),
            }),
            SelectError::ModeMismatch { .. } | SelectError::ReversedRange { .. } => None,
        }
    }

    /// The date the event concerns.
    pub const fn date(&self) -> Date {
        match self {
            Self::SelectionChanged { date, .. }
            | Self::RangeSelected { date, .. }
            | Self::RangeRejected { date, .. }
            | Self::MultiSelectChanged { date, .. }
            | Self::MultiRejected { date, .. }
            | Self::OutOfRangeRejected(date)
            | Self::InterceptedClick(date) => *date,
        }
    }
}

/// Receiver of [`CalendarEvent`]s.
pub trait CalendarListener {
    fn on_event(&mut self, event: &CalendarEvent);
}

impl<F> CalendarListener for F
where
    F: FnMut(&CalendarEvent),
{
    fn on_event(&mut self, event: &CalendarEvent) {
        self(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SelectionMode;
    use crate::test_utils::date;

    #[test]
    fn test_rejection_mapping() {
        let day = date(2024, 1, 10);

        struct TestCase {
            error:       SelectError,
            expected:    Option<CalendarEvent>,
            description: &'static str,
        }

        let too_short = SelectError::RangeTooShort {
            date: day,
            min:  5,
            len:  2,
        };
        let full = SelectError::MultiSelectFull { date: day, max: 3 };

        let cases = [
            TestCase {
                error:       SelectError::OutOfRange(day),
                expected:    Some(CalendarEvent::OutOfRangeRejected(day)),
                description: "out of range",
            },
            TestCase {
                error:       SelectError::Intercepted(day),
                expected:    Some(CalendarEvent::InterceptedClick(day)),
                description: "intercepted",
            },
            TestCase {
                error:       too_short.clone(),
                expected:    Some(CalendarEvent::RangeRejected {
                    date:   day,
                    reason: too_short,
                }),
                description: "range too short",
            },
            TestCase {
                error:       full.clone(),
                expected:    Some(CalendarEvent::MultiRejected {
                    date:   day,
                    reason: full,
                }),
                description: "multi full",
            },
            TestCase {
                error:       SelectError::ModeMismatch {
                    expected: SelectionMode::Range,
                    actual:   SelectionMode::Single,
                },
                expected:    None,
                description: "mode mismatch stays with the caller",
            },
        ];

        for case in cases {
            assert_eq!(CalendarEvent::rejection(&case.error), case.expected, "{}", case.description);
        }
    }

    #[test]
    fn test_closure_listener() {
        let mut seen = Vec::new();
        {
            let mut listener = |event: &CalendarEvent| seen.push(event.date());
            listener.on_event(&CalendarEvent::InterceptedClick(date(2024, 2, 1)));
            listener.on_event(&CalendarEvent::RangeSelected {
                date:   date(2024, 2, 3),
                is_end: true,
            });
        }
        assert_eq!(seen, vec![date(2024, 2, 1), date(2024, 2, 3)]);
    }
}
