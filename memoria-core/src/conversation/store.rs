//! File-backed conversation store

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::entry::{ConversationEntry, ConversationLog};

/// Owns the persisted conversation log
///
/// Every append rewrites the whole file; a single writer is assumed.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    path: PathBuf,
}

impl ConversationStore {
    /// Create a store backed by the file at `path`
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Get the backing file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted log
    ///
    /// A missing file is an empty log. A file that exists but does not
    /// parse yields [`crate::Error::CorruptLog`].
    pub fn try_load(&self) -> crate::Result<ConversationLog> {
        if !self.path.exists() {
            return Ok(ConversationLog::new());
        }

        let content = std::fs::read_to_string(&self.path)?;
        serde_json::from_str(&content).map_err(|e| crate::Error::CorruptLog {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        })
    }

    /// Read the persisted log, degrading to an empty log on failure
    ///
    /// The failure is logged and the file on disk is left untouched; the
    /// next append overwrites it.
    pub fn load(&self) -> ConversationLog {
        match self.try_load() {
            Ok(log) => log,
            Err(e) => {
                warn!("Ignoring unreadable conversation log: {}", e);
                ConversationLog::new()
            }
        }
    }

    /// Append one entry and rewrite the whole file
    pub fn append(&self, entry: ConversationEntry) -> crate::Result<()> {
        let mut log = self.load();
        log.push(entry);
        self.write(&log)?;
        debug!(
            "Appended {} entry to {} ({} total)",
            log.last().map(|e| e.role.as_str()).unwrap_or_default(),
            self.path.display(),
            log.len()
        );
        Ok(())
    }

    /// Number of persisted entries
    pub fn len(&self) -> usize {
        self.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self, log: &ConversationLog) -> crate::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(log)?;
        let mut tmp = self.path.clone();
        tmp.set_extension("json.tmp");
        std::fs::write(&tmp, content)?;
        if let Err(e) = std::fs::rename(&tmp, &self.path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(e.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::StoreRole;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> ConversationStore {
        ConversationStore::new(dir.path().join("conversation.json"))
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        assert!(store.try_load().unwrap().is_empty());
        assert!(store.load().is_empty());
        assert!(store.is_empty());
    }

    #[test]
    fn test_append_grows_log_by_one() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.append(ConversationEntry::system("be kind")).unwrap();

        let before = store.load();
        let entry = ConversationEntry::consciousness("sure");
        store.append(entry.clone()).unwrap();
        let after = store.load();

        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(&after.conversation[..before.len()], &before.conversation[..]);
        assert_eq!(after.last(), Some(&entry));
    }

    #[test]
    fn test_round_trip_last_entry() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let entry = ConversationEntry {
            role: StoreRole::Master,
            content: "hello".to_string(),
            refusal: None,
        };
        store.append(entry.clone()).unwrap();

        let reloaded = ConversationStore::new(store.path()).load();
        assert_eq!(reloaded.last(), Some(&entry));
    }

    #[test]
    fn test_corrupt_file_degrades_to_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), "this is not json").unwrap();

        assert!(matches!(
            store.try_load(),
            Err(crate::Error::CorruptLog { .. })
        ));
        assert!(store.load().is_empty());
        assert_eq!(
            std::fs::read_to_string(store.path()).unwrap(),
            "this is not json"
        );
    }

    #[test]
    fn test_append_overwrites_corrupt_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::write(store.path(), "{\"conversation\": [").unwrap();

        store.append(ConversationEntry::master("fresh start")).unwrap();

        let log = store.try_load().unwrap();
        assert_eq!(log.len(), 1);
        assert_eq!(log.conversation[0].content, "fresh start");
    }

    #[test]
    fn test_file_layout_is_pretty_printed() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        store.append(ConversationEntry::master("hi")).unwrap();

        let raw = std::fs::read_to_string(store.path()).unwrap();
        let expected = "{\n  \"conversation\": [\n    {\n      \"role\": \"master\",\n      \"content\": \"hi\",\n      \"refusal\": null\n    }\n  ]\n}";
        assert_eq!(raw, expected);
    }

    #[test]
    fn test_append_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let store = ConversationStore::new(temp_dir.path().join("nested/deeper/log.json"));
        store.append(ConversationEntry::system("seed")).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_write_failure_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "file, not a directory").unwrap();
        let store = ConversationStore::new(blocker.join("conversation.json"));

        assert!(store.append(ConversationEntry::master("lost")).is_err());
    }

    #[test]
    fn test_failed_rename_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        std::fs::create_dir(store.path()).unwrap();

        assert!(store.append(ConversationEntry::master("lost")).is_err());
        assert!(!temp_dir.path().join("conversation.json.tmp").exists());
        assert!(store.path().is_dir());
    }
}
