/// Smallest year a [`Date`](crate::Date) can hold
pub const MIN_YEAR: u16 = 1;

/// Largest year a [`Date`](crate::Date) can hold (inclusive)
pub const MAX_YEAR: u16 = 9999;

/// First Gregorian year covered by the lunar table
pub const MIN_LUNAR_YEAR: u16 = 1900;

/// Last Gregorian year a domain or conversion may use (inclusive)
pub const MAX_LUNAR_YEAR: u16 = 2099;

/// Maximum valid month (December)
pub const MAX_MONTH: u8 = 12;

/// First day of month, used for lower bounds
pub const MIN_DAY: u8 = 1;

/// Month number for January
pub const JANUARY: u8 = 1;
/// Month number for February
pub const FEBRUARY: u8 = 2;
/// Month number for December
pub const DECEMBER: u8 = 12;

/// Days in February for leap years
pub const FEBRUARY_DAYS_LEAP: u8 = 29;

/// Maximum days in each month (index 0 is unused, months are 1-indexed)
/// February shows 28 days (non-leap year default)
pub const DAYS_IN_MONTH: [u8; 13] = [
    0,  // index 0 unused (months are 1-indexed)
    31, // January
    28, // February (non-leap, adjusted by is_leap_year check)
    31, // March
    30, // April
    31, // May
    30, // June
    31, // July
    31, // August
    30, // September
    31, // October
    30, // November
    31, // December
];

/// Leap year occurs every 4 years
pub(crate) const LEAP_YEAR_CYCLE: u16 = 4;
/// Century years are not leap years unless...
pub(crate) const CENTURY_CYCLE: u16 = 100;
/// ...they are divisible by 400 (Gregorian calendar correction)
pub(crate) const GREGORIAN_CYCLE: u16 = 400;

/// Days in one displayed week row
pub const DAYS_PER_WEEK: u8 = 7;

/// Rows of a full month page
pub const MONTH_GRID_ROWS: u8 = 6;

/// Cells of a full month page (6 x 7)
pub const MONTH_GRID_CELLS: usize = 42;

/// Months in a Gregorian year
pub const MONTHS_PER_YEAR: u32 = 12;

/// Range bound value meaning "no limit"
pub const UNBOUNDED: i32 = -1;

/// Date component separator (ISO 8601 format)
pub const DATE_SEPARATOR: char = '-';
/// Range separator (ISO 8601 extended format)
pub const RANGE_SEPARATOR: char = '/';
