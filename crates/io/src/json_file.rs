//! JSON file backend.
//!
//! All entries live in one JSON object on disk, `{"<key>": "<text>", ...}`.
//! The file is read once at open; every write rewrites it atomically
//! (write-to-temp, then rename) so a crash never leaves a torn file.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::backend::Backend;
use crate::error::StoreError;

#[derive(Debug)]
pub struct JsonFileBackend {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl JsonFileBackend {
    /// Open (or lazily create) the file at `path`.
    ///
    /// A missing file is an empty store. A file that is not a JSON object of
    /// strings is logged and treated as empty; it is replaced on first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    log::warn!("Ignoring unreadable preferences file {}: {e}", path.display());
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.as_os_str().to_owned();
        temp.push(".tmp");
        PathBuf::from(temp)
    }

    /// Persist `entries`, and only then adopt them.
    fn commit(&mut self, entries: BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let json = serde_json::to_string_pretty(&entries)?;
        let temp = self.temp_path();
        fs::write(&temp, json)?;
        if let Err(e) = fs::rename(&temp, &self.path) {
            let _ = fs::remove_file(&temp);
            return Err(e.into());
        }
        self.entries = entries;
        Ok(())
    }
}

impl Backend for JsonFileBackend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        let mut entries = self.entries.clone();
        entries.insert(key.to_string(), text.to_string());
        self.commit(entries)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        if !self.entries.contains_key(key) {
            return Ok(());
        }
        let mut entries = self.entries.clone();
        entries.remove(key);
        self.commit(entries)
    }

    fn name(&self) -> &'static str {
        "json"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = JsonFileBackend::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(backend.read("anything").unwrap(), None);
        assert!(!backend.path().exists(), "open should not create the file");
    }

    #[test]
    fn test_write_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("prefs.json");

        let mut backend = JsonFileBackend::open(&path).unwrap();
        backend.write("app.volume", "0.5").unwrap();
        backend.write("app.name", "\"Ada\"").unwrap();
        backend.delete("app.volume").unwrap();

        let reopened = JsonFileBackend::open(&path).unwrap();
        assert_eq!(reopened.read("app.name").unwrap(), Some("\"Ada\"".to_string()));
        assert_eq!(reopened.read("app.volume").unwrap(), None);
        assert!(!backend.temp_path().exists(), "temp file should be renamed away");
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let mut backend = JsonFileBackend::open(&path).unwrap();
        assert_eq!(backend.read("k").unwrap(), None);

        backend.write("k", "1").unwrap();
        let json = fs::read_to_string(&path).unwrap();
        assert!(json.contains("\"k\""));
    }

    #[test]
    fn test_failed_write_keeps_previous_state() {
        let dir = TempDir::new().unwrap();
        // The "file" is a directory, so the final rename fails.
        let path = dir.path().join("occupied");
        fs::create_dir(&path).unwrap();
        fs::write(path.join("keep"), "x").unwrap();

        let mut backend = JsonFileBackend {
            path: path.clone(),
            entries: BTreeMap::new(),
        };
        assert!(backend.write("k", "1").is_err());
        assert_eq!(backend.read("k").unwrap(), None);
        assert!(!backend.temp_path().exists(), "temp file should be cleaned up");
    }
}
