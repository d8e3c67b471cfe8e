use std::collections::HashMap;
use std::path::PathBuf;

use parking_lot::Mutex;
use tracing::warn;

use super::PreferenceStore;

/// JSON-file-backed preference store. The whole map is rewritten on every
/// `set`; the file stays tiny (a couple dozen flags).
pub struct FilePreferenceStore {
    path: PathBuf,
    values: Mutex<HashMap<String, String>>,
}

impl FilePreferenceStore {
    /// Open the store, loading existing values. A missing file is an empty
    /// store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> std::io::Result<Self> {
        let path = path.into();
        let values = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|err| {
                warn!("preference file {} unreadable, starting fresh: {}", path.display(), err);
                HashMap::new()
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(err) => return Err(err),
        };

        Ok(Self {
            path,
            values: Mutex::new(values),
        })
    }

    fn flush(&self, values: &HashMap<String, String>) {
        let raw = match serde_json::to_string_pretty(values) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("failed to serialize preferences: {}", err);
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, raw) {
            warn!("failed to persist preferences to {}: {}", self.path.display(), err);
        }
    }
}

impl PreferenceStore for FilePreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        let mut values = self.values.lock();
        values.insert(key.to_string(), value.to_string());
        self.flush(&values);
    }
}
