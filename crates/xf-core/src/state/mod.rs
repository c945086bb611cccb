use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Snapshot of the active predicate per dimension
///
/// Pure data: every setter and clearer touches only its own field and is
/// idempotent. Views read this to render their filter affordances without
/// querying the index; hosts may serialize it to share the current search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchState {
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub length_range: Option<(f64, f64)>,
    pub latitude_range: Option<(f64, f64)>,
    pub longitude_range: Option<(f64, f64)>,
    pub language: Option<String>,
    pub cluster: Option<i64>,
}

impl SearchState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_date_range(&mut self, range: (NaiveDate, NaiveDate)) {
        self.date_range = Some(range);
    }

    pub fn clear_date_range(&mut self) {
        self.date_range = None;
    }

    pub fn set_length_range(&mut self, range: (f64, f64)) {
        self.length_range = Some(range);
    }

    pub fn clear_length_range(&mut self) {
        self.length_range = None;
    }

    pub fn set_latitude_range(&mut self, range: (f64, f64)) {
        self.latitude_range = Some(range);
    }

    pub fn clear_latitude_range(&mut self) {
        self.latitude_range = None;
    }

    pub fn set_longitude_range(&mut self, range: (f64, f64)) {
        self.longitude_range = Some(range);
    }

    pub fn clear_longitude_range(&mut self) {
        self.longitude_range = None;
    }

    pub fn select_language(&mut self, language: impl Into<String>) {
        self.language = Some(language.into());
    }

    pub fn clear_language(&mut self) {
        self.language = None;
    }

    pub fn select_cluster(&mut self, cluster: i64) {
        self.cluster = Some(cluster);
    }

    pub fn clear_cluster(&mut self) {
        self.cluster = None;
    }

    /// Whether any dimension currently carries a predicate
    pub fn has_active_filters(&self) -> bool {
        self.date_range.is_some()
            || self.length_range.is_some()
            || self.latitude_range.is_some()
            || self.longitude_range.is_some()
            || self.language.is_some()
            || self.cluster.is_some()
    }

    /// Reset every field, e.g. when a new dataset replaces the old one
    pub fn clear_all(&mut self) {
        *self = Self::default();
    }
}
