use super::types::ScheduleState;
use anyhow::{Context, Result};
use atomic_write_file::AtomicWriteFile;
use std::fs::File;
use std::path::{Path, PathBuf};

/// Get the default availability store path (~/.config/tablemate/availability.json)
pub fn get_store_path() -> PathBuf {
    crate::config::get_config_dir().join("availability.json")
}

/// Load the schedule state from a JSON file.
///
/// If the file doesn't exist, returns a new empty state.
/// If the file exists but has an unsupported version, returns an error.
pub fn load_state(path: &Path) -> Result<ScheduleState> {
    if !path.exists() {
        return Ok(ScheduleState::new());
    }

    let file = File::open(path)
        .with_context(|| format!("Failed to open availability store at {}", path.display()))?;

    let state: ScheduleState =
        serde_json::from_reader(file).context("Failed to load availability store")?;

    // Version check
    if state.version != 1 {
        anyhow::bail!("Unsupported availability store version: {}", state.version);
    }

    Ok(state)
}

/// Save the schedule state to a JSON file atomically.
///
/// Uses atomic-write-file so a crash mid-write never leaves a corrupt store.
/// Creates the parent directory if it doesn't exist.
pub fn save_state(path: &Path, state: &ScheduleState) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create store directory {}", parent.display())
            })?;
        }
    }

    let mut file = AtomicWriteFile::open(path)
        .with_context(|| format!("Failed to open atomic write file at {}", path.display()))?;

    serde_json::to_writer_pretty(&mut file, state)
        .context("Failed to serialize availability store")?;

    file.commit().context("Failed to save availability store")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::types::{AvailabilityStatus, Table};
    use chrono::NaiveDate;

    #[test]
    fn test_load_missing_file_returns_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");

        let state = load_state(&path).unwrap();
        assert_eq!(state.version, 1);
        assert!(state.records.is_empty());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("availability.json");

        let mut state = ScheduleState::new();
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        state.set_status("alice", date, AvailabilityStatus::Available);
        state.set_status("bob", date, AvailabilityStatus::Maybe);
        state.create_table(
            "friday",
            Table::new("gm".to_string(), vec!["alice".to_string()]),
        );

        save_state(&path, &state).unwrap();
        let loaded = load_state(&path).unwrap();

        assert_eq!(loaded.version, 1);
        assert_eq!(loaded.status_of("alice", date), AvailabilityStatus::Available);
        assert_eq!(loaded.status_of("bob", date), AvailabilityStatus::Maybe);
        assert_eq!(loaded.table("friday").unwrap().owner, "gm");
    }

    #[test]
    fn test_save_creates_missing_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("availability.json");

        save_state(&path, &ScheduleState::new()).unwrap();
        let loaded = load_state(&path).unwrap();
        assert_eq!(loaded.version, 1);
    }

    #[test]
    fn test_load_rejects_unknown_version() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("availability.json");
        std::fs::write(&path, r#"{"version": 99, "records": {}, "tables": {}}"#).unwrap();

        assert!(load_state(&path).is_err());
    }
}
