//! Viewer identity backed by a key-value session store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use contracts::{SessionIdentity, SESSION_KEY};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("no signed-in user in the session store")]
    Missing,
    #[error("session record is not valid JSON: {0}")]
    Corrupt(#[from] serde_json::Error),
    #[error("session store io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session store lock poisoned")]
    Poisoned,
}

pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError>;
    fn set(&self, key: &str, value: String) -> Result<(), SessionError>;
    fn remove(&self, key: &str) -> Result<(), SessionError>;
}

#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(identity: &SessionIdentity) -> Result<Self, SessionError> {
        let store = Self::new();
        sign_in(&store, identity)?;
        Ok(store)
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let mut entries = self.entries.lock().map_err(|_| SessionError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }
}

/// A JSON object on disk, one string value per key. A missing file is an empty store.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    guard: Mutex<()>,
}

impl FileSessionStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            guard: Mutex::new(()),
        }
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>, SessionError> {
        match std::fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), SessionError> {
        std::fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Result<Option<String>, SessionError> {
        let _guard = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(self.read_all()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: String) -> Result<(), SessionError> {
        let _guard = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value);
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), SessionError> {
        let _guard = self.guard.lock().map_err(|_| SessionError::Poisoned)?;
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }
}

/// Stores `identity` as the signed-in viewer, replacing any previous one.
pub fn sign_in(store: &dyn SessionStore, identity: &SessionIdentity) -> Result<(), SessionError> {
    store.set(SESSION_KEY, serde_json::to_string(identity)?)?;
    tracing::info!(username = %identity.username, role = %identity.role, "session signed in");
    Ok(())
}

pub fn current_identity(store: &dyn SessionStore) -> Result<SessionIdentity, SessionError> {
    let raw = store.get(SESSION_KEY)?.ok_or(SessionError::Missing)?;
    Ok(serde_json::from_str(&raw)?)
}

/// Changes the viewer's role and writes it back to the store.
pub fn switch_role(store: &dyn SessionStore, role: &str) -> Result<SessionIdentity, SessionError> {
    let mut identity = current_identity(store)?;
    identity.role = role.to_string();
    store.set(SESSION_KEY, serde_json::to_string(&identity)?)?;
    tracing::info!(username = %identity.username, role = %identity.role, "session role switched");
    Ok(identity)
}

pub fn logout(store: &dyn SessionStore) -> Result<(), SessionError> {
    store.remove(SESSION_KEY)?;
    tracing::info!("session cleared");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analyst() -> SessionIdentity {
        SessionIdentity {
            username: "dana".to_string(),
            role: "user".to_string(),
        }
    }

    #[test]
    fn empty_store_has_no_identity() {
        let store = MemorySessionStore::new();
        assert!(matches!(current_identity(&store), Err(SessionError::Missing)));
    }

    #[test]
    fn role_switch_persists_and_logout_clears() {
        let store = MemorySessionStore::signed_in(&analyst()).expect("seed session");
        assert!(!current_identity(&store).expect("signed in").is_admin());

        let promoted = switch_role(&store, "admin").expect("switch role");
        assert!(promoted.is_admin());
        assert_eq!(current_identity(&store).expect("signed in").role, "admin");

        logout(&store).expect("logout");
        assert!(matches!(current_identity(&store), Err(SessionError::Missing)));
    }

    #[test]
    fn sign_in_replaces_previous_viewer() {
        let store = MemorySessionStore::signed_in(&analyst()).expect("seed session");
        let admin = SessionIdentity {
            username: "root".to_string(),
            role: "admin".to_string(),
        };
        sign_in(&store, &admin).expect("sign in");
        assert_eq!(current_identity(&store).expect("signed in"), admin);
    }

    #[test]
    fn corrupt_record_is_reported() {
        let store = MemorySessionStore::new();
        store.set(SESSION_KEY, "{not json".to_string()).expect("set");
        assert!(matches!(current_identity(&store), Err(SessionError::Corrupt(_))));
    }

    #[test]
    fn file_store_round_trips_across_instances() {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be monotonic")
            .as_nanos();
        let path = std::env::temp_dir().join(format!("pulseboard_session_{nanos}.json"));

        let writer = FileSessionStore::new(&path);
        assert!(writer.get(SESSION_KEY).expect("missing file reads empty").is_none());
        writer
            .set(SESSION_KEY, serde_json::to_string(&analyst()).expect("encode"))
            .expect("write");

        let reader = FileSessionStore::new(&path);
        assert_eq!(current_identity(&reader).expect("persisted"), analyst());

        logout(&reader).expect("logout");
        assert!(matches!(current_identity(&writer), Err(SessionError::Missing)));

        let _ = std::fs::remove_file(&path);
    }
}
