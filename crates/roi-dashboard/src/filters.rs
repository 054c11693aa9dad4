//! Multi-field filtering shared by the dashboard's list views.

use crate::presentation::cells::display_text;
use crate::presentation::TableRow;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// Categorical value meaning "no constraint".
pub const ALL: &str = "all";
/// Reserved free-text field.
pub const SEARCH_FIELD: &str = "search";

/// Whether a filter value actually narrows the row set.
pub fn is_constrained(value: &str) -> bool {
    !(value.is_empty() || value == ALL)
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    #[error("filter field '{0}' is not declared for this view")]
    UnknownField(String),
}

/// Current selections of a list view, keyed by field name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    fields: BTreeMap<String, String>,
}

impl FilterState {
    /// Declare the categorical fields of a view. `search` is always present.
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = BTreeMap::new();
        for field in fields {
            let field = field.into();
            let default = default_value(&field);
            state.insert(field, default);
        }
        state.insert(SEARCH_FIELD.to_string(), String::new());
        Self { fields: state }
    }

    pub fn value(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    pub fn search(&self) -> &str {
        self.value(SEARCH_FIELD).unwrap_or_default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> Result<(), FilterError> {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(FilterError::UnknownField(field.to_string())),
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.fields.insert(SEARCH_FIELD.to_string(), term.into());
    }

    /// Reset every field to its "no constraint" default at once.
    pub fn clear(&mut self) {
        self.fields = self
            .fields
            .keys()
            .map(|field| (field.clone(), default_value(field)))
            .collect();
    }

    /// Constrained categorical fields plus a non-empty search term.
    pub fn active_filters_count(&self) -> usize {
        self.fields
            .iter()
            .filter(|(field, value)| {
                if field.as_str() == SEARCH_FIELD {
                    !value.is_empty()
                } else {
                    is_constrained(value)
                }
            })
            .count()
    }

    pub fn has_active_filters(&self) -> bool {
        self.active_filters_count() > 0
    }

    /// Constrained categorical fields, excluding search.
    pub fn active_fields(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields
            .iter()
            .filter(|(field, value)| field.as_str() != SEARCH_FIELD && is_constrained(value))
            .map(|(field, value)| (field.as_str(), value.as_str()))
    }

    /// Adopt saved selections for fields this view declares; others are dropped.
    pub fn restore(&mut self, saved: &FilterState) {
        for (field, value) in &saved.fields {
            if let Some(slot) = self.fields.get_mut(field) {
                *slot = value.clone();
            }
        }
    }
}

fn default_value(field: &str) -> String {
    if field == SEARCH_FIELD {
        String::new()
    } else {
        ALL.to_string()
    }
}

pub type FieldMatcher<R> = Box<dyn Fn(&R, &str) -> bool + Send + Sync>;

/// Evaluates a [`FilterState`] as a conjunction of per-field predicates.
pub struct FilterComposer<R> {
    search_fields: Vec<String>,
    matchers: BTreeMap<String, FieldMatcher<R>>,
}

impl<R> Default for FilterComposer<R> {
    fn default() -> Self {
        Self {
            search_fields: Vec::new(),
            matchers: BTreeMap::new(),
        }
    }
}

impl<R: TableRow> FilterComposer<R> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields whose text the free-text search scans.
    pub fn search_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.search_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    /// Override how `field` is matched. Without one, the row field's text must
    /// equal the selected value, ignoring case.
    pub fn matcher<F>(mut self, field: impl Into<String>, matcher: F) -> Self
    where
        F: Fn(&R, &str) -> bool + Send + Sync + 'static,
    {
        self.matchers.insert(field.into(), Box::new(matcher));
        self
    }

    /// Rows satisfying every constrained field, in input order.
    pub fn apply<'a>(&self, rows: &'a [R], state: &FilterState) -> Vec<&'a R> {
        let term = state.search().to_lowercase();
        let active: Vec<(&str, &str)> = state.active_fields().collect();

        rows.iter()
            .filter(|row| term.is_empty() || self.matches_search(row, &term))
            .filter(|row| {
                active
                    .iter()
                    .all(|(field, value)| self.matches_field(row, field, value))
            })
            .collect()
    }

    pub fn matches_search(&self, row: &R, term: &str) -> bool {
        self.search_fields.iter().any(|field| {
            row.field(field)
                .map(|value| display_text(&value).to_lowercase().contains(term))
                .unwrap_or(false)
        })
    }

    fn matches_field(&self, row: &R, field: &str, value: &str) -> bool {
        match self.matchers.get(field) {
            Some(matcher) => matcher(row, value),
            None => row
                .field(field)
                .map(|actual| display_text(&actual).eq_ignore_ascii_case(value))
                .unwrap_or(false),
        }
    }

    /// Sorted distinct values of `field`, for populating a dropdown.
    pub fn options_for(&self, field: &str, rows: &[R]) -> Vec<String> {
        rows.iter()
            .filter_map(|row| row.field(field))
            .map(|value| display_text(&value))
            .filter(|value| !value.is_empty())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<R> fmt::Debug for FilterComposer<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterComposer")
            .field("search_fields", &self.search_fields)
            .field("matchers", &self.matchers.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn action_items() -> Vec<Value> {
        vec![
            json!({ "id": "AI-1", "title": "Reconcile vendor master", "owner": "Dana", "status": "open", "priority": "high" }),
            json!({ "id": "AI-2", "title": "Enable duplicate payment checks", "owner": "Lee", "status": "closed", "priority": "high" }),
            json!({ "id": "AI-3", "title": "Review payroll exceptions", "owner": "Dana", "status": "closed", "priority": "low" }),
            json!({ "id": "AI-4", "title": "Tighten vendor onboarding", "owner": "Sam", "status": "open", "priority": "medium" }),
        ]
    }

    fn composer() -> FilterComposer<Value> {
        FilterComposer::new()
            .search_fields(["title", "owner", "id"])
            .matcher("priority", |row: &Value, value| {
                row["priority"].as_str() == Some(value)
            })
    }

    fn ids(rows: &[&Value]) -> Vec<String> {
        rows.iter()
            .map(|row| row["id"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn default_state_is_identity() {
        let rows = action_items();
        let state = FilterState::new(["status", "priority"]);
        let filtered = composer().apply(&rows, &state);
        assert_eq!(filtered, rows.iter().collect::<Vec<_>>());
    }

    #[test]
    fn fields_combine_conjunctively() {
        let rows = action_items();
        let mut state = FilterState::new(["status", "priority"]);
        state.set("status", "closed").expect("declared field");
        state.set("priority", "high").expect("declared field");

        let filtered = composer().apply(&rows, &state);
        assert_eq!(ids(&filtered), vec!["AI-2"]);
    }

    #[test]
    fn adding_a_field_only_narrows() {
        let rows = action_items();
        let composer = composer();

        let mut status_only = FilterState::new(["status", "priority"]);
        status_only.set("status", "open").expect("declared field");
        let mut priority_only = FilterState::new(["status", "priority"]);
        priority_only.set("priority", "high").expect("declared field");
        let mut both = status_only.clone();
        both.set("priority", "high").expect("declared field");

        let narrowed = composer.apply(&rows, &both);
        for partial in [&status_only, &priority_only] {
            let wider = composer.apply(&rows, partial);
            assert!(narrowed.iter().all(|row| wider.contains(row)));
        }
    }

    #[test]
    fn search_is_case_insensitive_across_fields() {
        let rows = action_items();
        let mut state = FilterState::new(["status"]);
        state.set_search("VENDOR");
        assert_eq!(ids(&composer().apply(&rows, &state)), vec!["AI-1", "AI-4"]);

        state.set_search("dana");
        assert_eq!(ids(&composer().apply(&rows, &state)), vec!["AI-1", "AI-3"]);

        state.set_search("ai-2");
        assert_eq!(ids(&composer().apply(&rows, &state)), vec!["AI-2"]);
    }

    #[test]
    fn repeated_application_is_stable() {
        let rows = action_items();
        let mut state = FilterState::new(["status"]);
        state.set("status", "OPEN").expect("declared field");
        let composer = composer();
        let first = composer.apply(&rows, &state);
        let second = composer.apply(&rows, &state);
        assert_eq!(first, second);
        assert_eq!(ids(&first), vec!["AI-1", "AI-4"]);
    }

    #[test]
    fn active_count_tracks_sentinels_and_clear_resets_everything() {
        let mut state = FilterState::new(["status", "priority"]);
        assert_eq!(state.active_filters_count(), 0);

        state.set("status", "open").expect("declared field");
        state.set_search("vendor");
        assert_eq!(state.active_filters_count(), 2);
        assert!(state.has_active_filters());

        state.set("status", ALL).expect("declared field");
        state.set("priority", "").expect("declared field");
        assert_eq!(state.active_filters_count(), 1);

        state.set("priority", "low").expect("declared field");
        state.clear();
        assert_eq!(state, FilterState::new(["status", "priority"]));
        assert_eq!(state.active_filters_count(), 0);
    }

    #[test]
    fn search_for_the_word_all_still_counts() {
        let rows = vec![
            json!({ "id": "AI-7", "title": "Overall spend review" }),
            json!({ "id": "AI-8", "title": "Vendor onboarding" }),
        ];
        let mut state = FilterState::new(["status"]);
        state.set_search(ALL);

        assert_eq!(ids(&composer().apply(&rows, &state)), vec!["AI-7"]);
        assert_eq!(state.active_filters_count(), 1);
        assert!(state.has_active_filters());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut state = FilterState::new(["status"]);
        assert_eq!(
            state.set("region", "emea"),
            Err(FilterError::UnknownField("region".to_string()))
        );
    }

    #[test]
    fn restore_ignores_fields_the_view_does_not_declare() {
        let mut saved = FilterState::new(["status", "region"]);
        saved.set("status", "open").expect("declared field");
        saved.set("region", "emea").expect("declared field");

        let mut state = FilterState::new(["status"]);
        state.restore(&saved);
        assert_eq!(state.value("status"), Some("open"));
        assert_eq!(state.value("region"), None);
    }

    #[test]
    fn options_are_sorted_and_distinct() {
        let rows = action_items();
        assert_eq!(
            composer().options_for("owner", &rows),
            vec!["Dana", "Lee", "Sam"]
        );
    }
}
