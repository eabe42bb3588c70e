//! Session state: the stored token and role.
//!
//! Controllers never cache either value. Every interaction reads them through [`Session`] at the
//! moment it needs them, so a logout in one place is seen everywhere immediately.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::role::Role;
use crate::{PortalError, PortalResult};

/// Key holding the bearer token.
pub const TOKEN_KEY: &str = "token";
/// Key holding the stored role string.
pub const ROLE_KEY: &str = "userRole";

/// Tracing target for session persistence.
pub const TRACING_TARGET: &str = "clinic_core::session";

/// A string key-value store for session state.
pub trait SessionStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> PortalResult<()>;
    fn remove(&self, key: &str) -> PortalResult<()>;

    /// Stores every pair, or none of them when the store can fail part way.
    fn set_all(&self, pairs: &[(&str, &str)]) -> PortalResult<()> {
        for (key, value) in pairs {
            self.set(key, value)?;
        }
        Ok(())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Process-local store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store preloaded with `entries`.
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: Mutex::new(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        lock(&self.entries).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> PortalResult<()> {
        lock(&self.entries).remove(key);
        Ok(())
    }
}

/// Store persisted as a flat JSON object, rewritten on every change.
#[derive(Debug)]
pub struct FileSessionStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileSessionStore {
    /// Opens the store at `path`. A missing file is an empty session.
    ///
    /// # Errors
    ///
    /// Returns `SessionRead` if the file exists but cannot be read and `SessionFormat` if it is not
    /// a JSON object of strings.
    pub fn open(path: impl Into<PathBuf>) -> PortalResult<Self> {
        let path = path.into();
        let entries = match fs::read(&path) {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => BTreeMap::new(),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(PortalError::SessionFormat)?,
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(PortalError::SessionRead(e)),
        };

        tracing::debug!(target: TRACING_TARGET, path = %path.display(), keys = entries.len(), "Session loaded");

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, entries: &BTreeMap<String, String>) -> PortalResult<()> {
        let json = serde_json::to_vec_pretty(entries).map_err(PortalError::SessionFormat)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(PortalError::SessionWrite)?;
        }
        fs::write(&self.path, json).map_err(PortalError::SessionWrite)
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self, key: &str) -> Option<String> {
        lock(&self.entries).get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> PortalResult<()> {
        self.set_all(&[(key, value)])
    }

    fn remove(&self, key: &str) -> PortalResult<()> {
        let mut entries = lock(&self.entries);
        if !entries.contains_key(key) {
            return Ok(());
        }
        let mut next = entries.clone();
        next.remove(key);
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }

    /// Writes the updated map to disk before the in-memory copy changes.
    fn set_all(&self, pairs: &[(&str, &str)]) -> PortalResult<()> {
        let mut entries = lock(&self.entries);
        let mut next = entries.clone();
        for (key, value) in pairs {
            next.insert(key.to_string(), value.to_string());
        }
        self.persist(&next)?;
        *entries = next;
        Ok(())
    }
}

/// Handle over the session store shared by every controller on a page.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("role", &self.role())
            .field("has_token", &self.token().is_some())
            .finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// A session over a fresh in-memory store.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn role(&self) -> Role {
        Role::from_stored(self.store.get(ROLE_KEY).as_deref())
    }

    /// The stored token, if any. Blank tokens count as absent.
    pub fn token(&self) -> Option<String> {
        self.store
            .get(TOKEN_KEY)
            .filter(|token| !token.trim().is_empty())
    }

    /// Stores the role without touching the token.
    pub fn select_role(&self, role: Role) -> PortalResult<()> {
        self.store.set(ROLE_KEY, role.as_str())
    }

    pub fn sign_in(&self, token: &str, role: Role) -> PortalResult<()> {
        self.store.set_all(&[(TOKEN_KEY, token), (ROLE_KEY, role.as_str())])
    }

    pub fn sign_out(&self) -> PortalResult<()> {
        self.store.remove(TOKEN_KEY)?;
        self.store.remove(ROLE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_session_is_anonymous_without_token() {
        let session = Session::in_memory();
        assert_eq!(session.role(), Role::AnonymousOrPatient);
        assert_eq!(session.token(), None);
    }

    #[test]
    fn sign_in_and_out_update_both_keys() {
        let store = Arc::new(MemorySessionStore::new());
        let session = Session::new(store.clone());

        session.sign_in("abc", Role::Admin).unwrap();
        assert_eq!(store.get(TOKEN_KEY).as_deref(), Some("abc"));
        assert_eq!(store.get(ROLE_KEY).as_deref(), Some("admin"));
        assert_eq!(session.role(), Role::Admin);

        session.sign_out().unwrap();
        assert_eq!(session.token(), None);
        assert_eq!(session.role(), Role::AnonymousOrPatient);
    }

    #[test]
    fn values_are_read_at_call_time() {
        let store = Arc::new(MemorySessionStore::new());
        let session = Session::new(store.clone());
        assert_eq!(session.token(), None);

        store.set(TOKEN_KEY, "late").unwrap();
        store.set(ROLE_KEY, "loggedPatient").unwrap();
        assert_eq!(session.token().as_deref(), Some("late"));
        assert_eq!(session.role(), Role::AuthenticatedPatient);
    }

    #[test]
    fn blank_token_counts_as_missing() {
        let session = Session::new(Arc::new(MemorySessionStore::with_entries([(
            TOKEN_KEY, "  ",
        )])));
        assert_eq!(session.token(), None);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("nested").join("session.json");

        {
            let store = FileSessionStore::open(&path).expect("open");
            store.set(TOKEN_KEY, "t-1").unwrap();
            store.set(ROLE_KEY, "doctor").unwrap();
        }

        let reopened = FileSessionStore::open(&path).expect("reopen");
        assert_eq!(reopened.get(TOKEN_KEY).as_deref(), Some("t-1"));
        assert_eq!(reopened.get(ROLE_KEY).as_deref(), Some("doctor"));

        reopened.remove(TOKEN_KEY).unwrap();
        let again = FileSessionStore::open(&path).expect("reopen");
        assert_eq!(again.get(TOKEN_KEY), None);
    }

    #[test]
    fn failed_write_leaves_the_store_unchanged() {
        let dir = tempfile::tempdir().expect("tempdir");
        let sub = dir.path().join("sub");
        let path = sub.join("session.json");
        let store = FileSessionStore::open(&path).expect("open");
        store.set(TOKEN_KEY, "old").unwrap();
        store.set(ROLE_KEY, "doctor").unwrap();

        // Replace the directory with a plain file so the next write fails.
        fs::remove_dir_all(&sub).unwrap();
        fs::write(&sub, b"").unwrap();
        let session = Session::new(Arc::new(store));

        let err = session.sign_in("new", Role::Admin).unwrap_err();
        assert!(matches!(err, PortalError::SessionWrite(_)));
        assert_eq!(session.token().as_deref(), Some("old"));
        assert_eq!(session.role(), Role::Doctor);

        assert!(session.sign_out().is_err());
        assert_eq!(session.token().as_deref(), Some("old"));
    }

    #[test]
    fn select_role_keeps_the_token() {
        let store = Arc::new(MemorySessionStore::with_entries([(TOKEN_KEY, "t")]));
        let session = Session::new(store);

        session.select_role(Role::AuthenticatedPatient).unwrap();

        assert_eq!(session.role(), Role::AuthenticatedPatient);
        assert_eq!(session.token().as_deref(), Some("t"));
    }

    #[test]
    fn file_store_missing_file_is_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileSessionStore::open(dir.path().join("absent.json")).expect("open");
        assert_eq!(store.get(TOKEN_KEY), None);
    }

    #[test]
    fn file_store_rejects_malformed_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("session.json");
        fs::write(&path, b"[1, 2, 3]").unwrap();

        let err = FileSessionStore::open(&path).unwrap_err();
        assert!(matches!(err, PortalError::SessionFormat(_)));
    }
}
