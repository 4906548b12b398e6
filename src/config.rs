use serde::{Deserialize, Serialize};

use crate::consts::UNBOUNDED;
use crate::{DateDomain, DefaultSelectDay, DomainError, Labels, MonthViewMode, SelectionMode, WeekStart};

/// Error type for loading and validating a [`CalendarConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Both range bounds set and min > max.
    #[error("Invalid range bounds: min ({min}) is greater than max ({max})")]
    InvalidRangeBounds { min: i32, max: i32 },

    #[error("Multi-select size must be at least 1")]
    InvalidMultiSelectSize,
}

/// Everything a [`CalendarEngine`](crate::CalendarEngine) is built from.
///
/// Loaded from JSON with every field optional:
///
/// ```json
/// {
///   "domain": "2017-01-01/2020-12-31",
///   "week_start": "monday",
///   "selection_mode": "range",
///   "min_range": 2,
///   "max_range": 14
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalendarConfig {
    pub domain:             DateDomain,
    pub week_start:         WeekStart,
    pub selection_mode:     SelectionMode,
    /// Minimum inclusive days of a range, -1 for none
    pub min_range:          i32,
    /// Maximum inclusive days of a range, -1 for none
    pub max_range:          i32,
    pub max_multi_select:   u32,
    pub month_view_mode:    MonthViewMode,
    pub default_select_day: DefaultSelectDay,
    /// Label used for a scheme marker that carries none
    pub scheme_text:        String,
    pub labels:             Labels,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            domain:             DateDomain::default(),
            week_start:         WeekStart::default(),
            selection_mode:     SelectionMode::default(),
            min_range:          UNBOUNDED,
            max_range:          UNBOUNDED,
            max_multi_select:   u32::MAX,
            month_view_mode:    MonthViewMode::default(),
            default_select_day: DefaultSelectDay::default(),
            scheme_text:        String::new(),
            labels:             Labels::default(),
        }
    }
}

impl CalendarConfig {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    /// Returns `ConfigError::Json` for malformed JSON, unknown fields or a bad domain string,
    /// and the `validate` errors otherwise.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the cross-field rules serde cannot express.
    ///
    /// # Errors
    /// Returns `ConfigError::InvalidRangeBounds` or `ConfigError::InvalidMultiSelectSize`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_range != UNBOUNDED && self.max_range != UNBOUNDED && self.min_range > self.max_range {
            return Err(ConfigError::InvalidRangeBounds {
                min: self.min_range,
                max: self.max_range,
            });
        }
        if self.max_multi_select == 0 {
            return Err(ConfigError::InvalidMultiSelectSize);
        }
        Ok(())
    }
}
