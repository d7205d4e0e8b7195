//! ft-store: file-backed PT override storage.
//!
//! One JSON file maps equipment profile ids to manually entered
//! pressure-temperature tables. Entries are only consulted for profiles
//! whose refrigerant identity is unrecognized; the gating itself lives with
//! the saturation-curve selection, not here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("no PT override stored for profile '{profile_id}'")]
    NotFound { profile_id: String },
}

/// One stored PT table, keyed by the equipment profile it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PtOverrideEntry {
    pub profile_id: String,
    /// `(temperature_f, pressure_psig)` pairs, ascending by pressure.
    pub pt: Vec<(f64, f64)>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub saved_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct OverrideStore {
    file_path: PathBuf,
}

impl OverrideStore {
    pub fn new(file_path: PathBuf) -> Self {
        Self { file_path }
    }

    /// Conventional location next to a case file: `.fieldtherm/pt_overrides.json`
    /// in the case file's directory.
    pub fn for_case(case_path: &Path) -> Self {
        let base = case_path.parent().unwrap_or_else(|| Path::new("."));
        Self::new(base.join(".fieldtherm").join("pt_overrides.json"))
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    /// Read the whole store. A missing file is an empty store, not an error.
    pub fn load(&self) -> StoreResult<BTreeMap<String, PtOverrideEntry>> {
        if !self.file_path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.file_path)?;
        let entries = serde_json::from_str(&content)?;
        Ok(entries)
    }

    pub fn save(&self, entries: &BTreeMap<String, PtOverrideEntry>) -> StoreResult<()> {
        if let Some(parent) = self.file_path.parent()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.file_path, content)?;
        Ok(())
    }

    pub fn get(&self, profile_id: &str) -> StoreResult<PtOverrideEntry> {
        self.load()?
            .remove(profile_id)
            .ok_or_else(|| StoreError::NotFound {
                profile_id: profile_id.to_string(),
            })
    }

    pub fn put(&self, entry: PtOverrideEntry) -> StoreResult<()> {
        let mut entries = self.load()?;
        debug!(profile_id = %entry.profile_id, points = entry.pt.len(), "storing PT override");
        entries.insert(entry.profile_id.clone(), entry);
        self.save(&entries)
    }

    pub fn remove(&self, profile_id: &str) -> StoreResult<PtOverrideEntry> {
        let mut entries = self.load()?;
        let removed = entries
            .remove(profile_id)
            .ok_or_else(|| StoreError::NotFound {
                profile_id: profile_id.to_string(),
            })?;
        self.save(&entries)?;
        Ok(removed)
    }

    /// All entries in profile-id order.
    pub fn list(&self) -> StoreResult<Vec<PtOverrideEntry>> {
        Ok(self.load()?.into_values().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store(tag: &str) -> OverrideStore {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .subsec_nanos();
        let dir = std::env::temp_dir().join(format!(
            "ft-store-test-{tag}-{}-{nanos}",
            std::process::id()
        ));
        OverrideStore::new(dir.join("pt_overrides.json"))
    }

    fn entry(profile_id: &str) -> PtOverrideEntry {
        PtOverrideEntry {
            profile_id: profile_id.to_string(),
            pt: vec![(10.0, 40.0), (40.0, 118.0), (70.0, 226.0)],
            description: Some("manufacturer card".to_string()),
            saved_at: Utc::now(),
        }
    }

    #[test]
    fn missing_file_is_an_empty_store() {
        let store = temp_store("empty");
        assert!(store.load().unwrap().is_empty());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn put_get_round_trip() {
        let store = temp_store("roundtrip");
        store.put(entry("wshp-9")).unwrap();
        let loaded = store.get("wshp-9").unwrap();
        assert_eq!(loaded.pt.len(), 3);
        assert_eq!(loaded.description.as_deref(), Some("manufacturer card"));
    }

    #[test]
    fn get_unknown_profile_is_not_found() {
        let store = temp_store("notfound");
        match store.get("nope") {
            Err(StoreError::NotFound { profile_id }) => assert_eq!(profile_id, "nope"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn put_replaces_existing_entry() {
        let store = temp_store("replace");
        store.put(entry("wshp-9")).unwrap();
        let mut updated = entry("wshp-9");
        updated.pt.push((100.0, 340.0));
        store.put(updated).unwrap();
        assert_eq!(store.get("wshp-9").unwrap().pt.len(), 4);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn remove_returns_the_entry_and_persists() {
        let store = temp_store("remove");
        store.put(entry("a")).unwrap();
        store.put(entry("b")).unwrap();
        let removed = store.remove("a").unwrap();
        assert_eq!(removed.profile_id, "a");
        assert_eq!(store.list().unwrap().len(), 1);
        assert!(matches!(store.remove("a"), Err(StoreError::NotFound { .. })));
    }

    #[test]
    fn list_is_ordered_by_profile_id() {
        let store = temp_store("ordered");
        store.put(entry("zeta")).unwrap();
        store.put(entry("alpha")).unwrap();
        let ids: Vec<_> = store
            .list()
            .unwrap()
            .into_iter()
            .map(|e| e.profile_id)
            .collect();
        assert_eq!(ids, vec!["alpha", "zeta"]);
    }

    #[test]
    fn for_case_uses_a_dot_directory_next_to_the_case() {
        let store = OverrideStore::for_case(Path::new("/tmp/site/unit7.yaml"));
        assert_eq!(
            store.path(),
            Path::new("/tmp/site/.fieldtherm/pt_overrides.json")
        );
    }
}
