use crate::datasets::ControlRecord;
use roi_dashboard::filters::FilterState;
use roi_dashboard::presentation::{Align, TableBody, TableGrid};
use roi_dashboard::storage::{filters_key, KeyValueStore, StorageError};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use tracing::{debug, warn};

/// Key-value store persisted as one JSON object on disk.
pub(crate) struct JsonFileStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub(crate) fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, StorageError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        debug!(path = %self.path.display(), entries = entries.len(), "store written");
        Ok(())
    }

    fn update<F>(&self, change: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| StorageError::Unavailable("store lock poisoned".to_string()))?;
        let mut entries = match self.read_all() {
            Err(StorageError::Corrupt(err)) => {
                let backup = self.path.with_extension("corrupt");
                fs::rename(&self.path, &backup)?;
                warn!(
                    path = %self.path.display(),
                    backup = %backup.display(),
                    error = %err,
                    "store file is not valid JSON; starting from an empty store"
                );
                BTreeMap::new()
            }
            other => other?,
        };
        change(&mut entries);
        self.write_all(&entries)
    }
}

impl KeyValueStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value);
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.remove(key);
        })
    }
}

/// Apply saved selections for `view_id`, ignoring unreadable entries.
pub(crate) fn restore_filters(store: &dyn KeyValueStore, view_id: &str, state: &mut FilterState) {
    let key = filters_key(view_id);
    match store.get(&key) {
        Ok(Some(raw)) => match serde_json::from_str::<FilterState>(&raw) {
            Ok(saved) => state.restore(&saved),
            Err(err) => warn!(%key, error = %err, "ignoring malformed saved filters"),
        },
        Ok(None) => {}
        Err(err) => warn!(%key, error = %err, "failed to read saved filters"),
    }
}

pub(crate) fn save_filters(
    store: &dyn KeyValueStore,
    view_id: &str,
    state: &FilterState,
) -> Result<(), StorageError> {
    store.set(&filters_key(view_id), serde_json::to_string(state)?)
}

#[derive(Debug, Error)]
pub(crate) enum DatasetError {
    #[error("failed to read controls from {}: {source}", .path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

pub(crate) fn load_controls_csv(path: &Path) -> Result<Vec<ControlRecord>, DatasetError> {
    let csv_error = |source: csv::Error| DatasetError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::Reader::from_path(path).map_err(csv_error)?;
    let controls = reader
        .deserialize()
        .collect::<Result<Vec<ControlRecord>, csv::Error>>()
        .map_err(csv_error)?;
    debug!(path = %path.display(), rows = controls.len(), "loaded controls from csv");
    Ok(controls)
}

/// Parses `question=value` pairs given on the command line.
pub(crate) fn parse_answer(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((question, value)) if !question.trim().is_empty() && !value.trim().is_empty() => {
            Ok((question.trim().to_string(), value.trim().to_string()))
        }
        _ => Err(format!("expected QUESTION=VALUE, got '{raw}'")),
    }
}

/// Plain-text rendering of a presented table.
pub(crate) fn render_grid(grid: &TableGrid) -> String {
    let mut out = String::new();
    if let Some(title) = &grid.title {
        out.push_str(title);
        out.push('\n');
    }
    if let Some(subtitle) = &grid.subtitle {
        out.push_str(subtitle);
        out.push('\n');
    }

    let rows = match &grid.body {
        TableBody::Empty {
            message,
            description,
        } => {
            out.push_str(&format!("  {message}\n"));
            if let Some(description) = description {
                out.push_str(&format!("  {description}\n"));
            }
            return out;
        }
        TableBody::Rows { rows } => rows,
    };

    let mut widths: Vec<usize> = grid
        .headers
        .iter()
        .map(|header| header.label.chars().count())
        .collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(&row.cells) {
            *width = (*width).max(cell.content.text().chars().count());
        }
    }

    let separator = if grid.density == roi_dashboard::presentation::Density::Compact {
        " "
    } else {
        "  "
    };

    let header_line: Vec<String> = grid
        .headers
        .iter()
        .zip(&widths)
        .map(|(header, width)| pad(&header.label, *width, header.align))
        .collect();
    out.push_str(header_line.join(separator).trim_end());
    out.push('\n');

    let rule: Vec<String> = widths.iter().map(|width| "-".repeat(*width)).collect();
    out.push_str(&rule.join(separator));
    out.push('\n');

    for row in rows {
        let line: Vec<String> = row
            .cells
            .iter()
            .zip(&widths)
            .map(|(cell, width)| pad(cell.content.text(), *width, cell.align))
            .collect();
        out.push_str(line.join(separator).trim_end());
        out.push('\n');
    }
    out
}

fn pad(text: &str, width: usize, align: Align) -> String {
    match align {
        Align::Left => format!("{text:<width$}"),
        Align::Center => format!("{text:^width$}"),
        Align::Right => format!("{text:>width$}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use roi_dashboard::storage::assessment_key;
    use std::io::Write;

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("store.json");

        let store = JsonFileStore::new(&path);
        assert_eq!(store.get("config-acme").expect("get"), None);
        store
            .set(&assessment_key("acme"), "{\"erp_system\":\"sap\"}".to_string())
            .expect("set");

        let reopened = JsonFileStore::new(&path);
        assert_eq!(
            reopened.get("config-acme").expect("get"),
            Some("{\"erp_system\":\"sap\"}".to_string())
        );

        reopened.remove("config-acme").expect("remove");
        assert_eq!(store.get("config-acme").expect("get"), None);
    }

    #[test]
    fn corrupt_store_file_is_reported() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        fs::write(&path, "not json").expect("write");

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.get("anything"), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn writes_recover_from_a_corrupt_store_file() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("store.json");
        fs::write(&path, "{truncated").expect("write");

        let store = JsonFileStore::new(&path);
        store
            .set(&assessment_key("acme"), "{\"timeline\":\"30_60_days\"}".to_string())
            .expect("set after corruption");

        assert_eq!(
            store.get("config-acme").expect("get"),
            Some("{\"timeline\":\"30_60_days\"}".to_string())
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("store.corrupt")).expect("backup kept"),
            "{truncated"
        );
    }

    #[test]
    fn saved_filters_restore_into_a_fresh_state() {
        let dir = tempfile::tempdir().expect("temp dir");
        let store = JsonFileStore::new(dir.path().join("store.json"));

        let mut state = FilterState::new(["status", "owner"]);
        state.set("status", "overdue").expect("declared");
        state.set_search("vendor");
        save_filters(&store, "actions", &state).expect("saved");

        let mut restored = FilterState::new(["status", "owner"]);
        restore_filters(&store, "actions", &mut restored);
        assert_eq!(restored, state);

        store
            .set(&filters_key("controls"), "[]".to_string())
            .expect("set");
        let mut untouched = FilterState::new(["status"]);
        restore_filters(&store, "controls", &mut untouched);
        assert_eq!(untouched.active_filters_count(), 0);
    }

    #[test]
    fn answers_split_on_the_first_equals_sign() {
        assert_eq!(
            parse_answer("timeline = 30_60_days"),
            Ok(("timeline".to_string(), "30_60_days".to_string()))
        );
        assert!(parse_answer("timeline").is_err());
        assert!(parse_answer("=yes").is_err());
    }

    #[test]
    fn missing_csv_is_a_dataset_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_controls_csv(&dir.path().join("absent.csv")).expect_err("missing file");
        assert!(err.to_string().contains("absent.csv"));
    }

    #[test]
    fn controls_load_from_csv() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            file,
            "id,name,description,owner,category,status,risk,annual_savings,last_tested"
        )
        .expect("header");
        writeln!(
            file,
            "CTL-900,Vendor dedupe,Merges duplicate vendor records,Master Data,Vendor Management,pending,Medium,15000.5,2025-09-01"
        )
        .expect("row");

        let controls = load_controls_csv(file.path()).expect("csv loads");
        assert_eq!(controls.len(), 1);
        assert_eq!(controls[0].id, "CTL-900");
        assert_eq!(controls[0].annual_savings, 15000.5);
    }
}
