//! JSON file session store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use shopfront_core::Session;

use super::{SessionStore, StoreError, StoredEntries};

/// Session store backed by a single JSON document.
///
/// Writes go to a temporary file in the same directory which is then renamed
/// over the target, so a reader sees either the old pair or the new pair.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Option<StoredEntries> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };

        match serde_json::from_str(&contents) {
            Ok(entries) => Some(entries),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Ignoring corrupt session file");
                None
            }
        }
    }

    fn write_entries(&self, entries: &StoredEntries) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let mut tmp = NamedTempFile::new_in(dir)?;
        serde_json::to_writer_pretty(&mut tmp, entries)?;
        tmp.write_all(b"\n")?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| e.error)?;

        debug!(path = %self.path.display(), "Session file written");
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> Session {
        self.read_entries()
            .map_or_else(Session::anonymous, StoredEntries::decode)
    }

    fn save(&mut self, session: &Session) -> Result<(), StoreError> {
        self.write_entries(&StoredEntries::encode(session)?)
    }

    fn clear(&mut self) -> Result<(), StoreError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session file removed");
                Ok(())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shopfront_core::{SessionToken, UserId, UserProfile};
    use tempfile::TempDir;

    use super::*;

    fn store_in(dir: &TempDir) -> FileSessionStore {
        FileSessionStore::new(dir.path().join("nested").join("session.json"))
    }

    fn alice() -> Session {
        Session::authenticated(
            SessionToken::new("token-user-1-1700000000"),
            UserProfile {
                username: "alice".to_string(),
                id: Some(UserId::new("user-1")),
            },
        )
    }

    #[test]
    fn test_missing_file_loads_anonymous() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        assert_eq!(store.load(), Session::anonymous());
    }

    #[test]
    fn test_save_load_round_trip() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);

        store.save(&alice()).unwrap();
        assert_eq!(store.load(), alice());

        // A fresh handle on the same path sees the same session (restart)
        assert_eq!(store_in(&dir).load(), alice());
    }

    #[test]
    fn test_file_layout_has_token_and_user_entries() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save(&alice()).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["token"], "token-user-1-1700000000");
        let user: UserProfile = serde_json::from_str(raw["user"].as_str().unwrap()).unwrap();
        assert_eq!(user.username, "alice");
    }

    #[test]
    fn test_corrupt_file_loads_anonymous() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        fs::write(store.path(), "{\"token\": ").unwrap();

        assert_eq!(store.load(), Session::anonymous());
    }

    #[test]
    fn test_clear_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save(&alice()).unwrap();

        store.clear().unwrap();
        assert!(!store.path().exists());
        store.clear().unwrap();
        assert_eq!(store.load(), Session::anonymous());
    }

    #[test]
    fn test_save_replaces_previous_session() {
        let dir = TempDir::new().unwrap();
        let mut store = store_in(&dir);
        store.save(&alice()).unwrap();

        let bob = Session::authenticated(SessionToken::new("t2"), UserProfile::new("bob"));
        store.save(&bob).unwrap();
        assert_eq!(store.load(), bob);

        // No temporary files are left behind
        let entries = fs::read_dir(store.path().parent().unwrap()).unwrap().count();
        assert_eq!(entries, 1);
    }
}
