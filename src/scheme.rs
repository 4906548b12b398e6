use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::consts::{MAX_LUNAR_YEAR, MIN_LUNAR_YEAR};
use crate::{Date, Day};

/// A caller-attached event or marker on one date.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Scheme {
    #[serde(rename = "type")]
    pub kind:    i32,
    pub color:   u32,
    pub label:   String,
    pub note:    String,
    /// Opaque data for the rendering layer
    pub payload: Option<serde_json::Value>,
}

/// Default marker of a cell plus its ordered schemes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Marker {
    pub color:   u32,
    pub label:   String,
    pub schemes: Vec<Scheme>,
}

impl Marker {
    pub fn new(color: u32, label: impl Into<String>) -> Self {
        Self {
            color,
            label: label.into(),
            schemes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_scheme(mut self, scheme: Scheme) -> Self {
        self.schemes.push(scheme);
        self
    }

    pub fn has_scheme(&self) -> bool {
        !self.schemes.is_empty() || !self.label.is_empty()
    }

    /// Copy of this marker with `default_label` standing in for an empty label.
    fn merged(&self, default_label: &str) -> Self {
        let mut merged = self.clone();
        if merged.label.is_empty() {
            default_label.clone_into(&mut merged.label);
        }
        merged
    }
}

/// Markers keyed by the `YYYYMMDD` key of their date.
#[derive(Debug, Clone, Default)]
pub struct SchemeStore {
    markers: HashMap<String, Marker>,
}

impl SchemeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every marker with the given map.
    ///
    /// Keys may be `YYYYMMDD` or `YYYY-MM-DD`. Keys that do not name a date inside the lunar
    /// table are dropped.
    pub fn set_schemes(&mut self, markers: HashMap<String, Marker>) {
        self.markers.clear();
        self.add_schemes(markers);
    }

    /// Merges the given map over the current markers, key by key.
    pub fn add_schemes(&mut self, markers: HashMap<String, Marker>) {
        let before = self.markers.len();
        for (key, marker) in markers {
            match normalize_key(&key) {
                Some(normalized) => {
                    self.markers.insert(normalized, marker);
                },
                None => warn!(key = %key, "dropping scheme with unusable date key"),
            }
        }
        debug!(before, after = self.markers.len(), "scheme markers merged");
    }

    pub fn add_scheme(&mut self, date: &Date, marker: Marker) {
        self.markers.insert(date.key(), marker);
    }

    pub fn remove_scheme(&mut self, date: &Date) -> Option<Marker> {
        self.markers.remove(&date.key())
    }

    pub fn clear(&mut self) {
        self.markers.clear();
    }

    pub fn get(&self, date: &Date) -> Option<&Marker> {
        self.markers.get(&date.key())
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// Sets the cell's marker from the store, or clears it when the date has none.
    pub fn apply(&self, day: &mut Day, default_label: &str) {
        day.marker = self
            .get(day)
            .map_or_else(Marker::default, |marker| marker.merged(default_label));
    }
}

fn normalize_key(key: &str) -> Option<String> {
    let date = key.parse::<Date>().ok()?;
    (MIN_LUNAR_YEAR..=MAX_LUNAR_YEAR)
        .contains(&date.year())
        .then(|| date.key())
}
