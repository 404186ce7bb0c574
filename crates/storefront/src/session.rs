//! Session store with a single persisted record.
//!
//! Mirrors the one-key browser-storage pattern: a single JSON record
//! holding `{user, token}`, loaded once at startup, rewritten on every
//! credential change, and deleted on logout. Token presence is only a
//! display/routing gate - the backend enforces authorization.
//!
//! The store is the sole writer of its file; reads and writes are
//! synchronous and happen under the in-memory lock.

use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::warn;

use foody_core::User;

/// Errors persisting or clearing the session record.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// On-disk shape of the session record.
#[derive(Debug, Serialize, Deserialize)]
struct PersistedSession {
    user: User,
    token: String,
}

/// The authenticated user and bearer token.
#[derive(Clone)]
pub struct Session {
    pub user: User,
    token: SecretString,
}

impl Session {
    /// The bearer token for `Authorization` headers.
    #[must_use]
    pub fn token(&self) -> &SecretString {
        &self.token
    }
}

// Manual impl so the token never lands in logs.
impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user", &self.user)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// In-memory session plus its durable copy.
///
/// Cheaply cloneable; all clones share the same state.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<SessionInner>,
}

struct SessionInner {
    path: PathBuf,
    state: Mutex<Option<Session>>,
}

impl SessionStore {
    /// Open the store, loading any persisted record.
    ///
    /// A missing or corrupt record loads as logged-out rather than an
    /// error, so a bad file can never lock the user out of the guest view.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = load(&path);

        Self {
            inner: Arc::new(SessionInner {
                path,
                state: Mutex::new(state),
            }),
        }
    }

    /// Store credentials in memory and persist the durable copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be written; in-memory state is
    /// still updated so the current session keeps working.
    pub fn set_credentials(&self, user: User, token: SecretString) -> Result<(), SessionError> {
        let session = Session { user, token };
        let persisted = PersistedSession {
            user: session.user.clone(),
            token: session.token.expose_secret().to_string(),
        };

        *self.lock() = Some(session);

        let json = serde_json::to_string(&persisted)?;
        std::fs::write(&self.inner.path, json)?;
        Ok(())
    }

    /// Clear both the in-memory session and the durable copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the record exists but cannot be removed.
    pub fn logout(&self) -> Result<(), SessionError> {
        *self.lock() = None;

        match std::fs::remove_file(&self.inner.path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(SessionError::Io(e)),
            _ => Ok(()),
        }
    }

    /// The current user, if logged in.
    #[must_use]
    pub fn user(&self) -> Option<User> {
        self.lock().as_ref().map(|s| s.user.clone())
    }

    /// The current bearer token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<SecretString> {
        self.lock().as_ref().map(|s| s.token.clone())
    }

    /// Token presence; gates protected views, nothing more.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.lock().is_some()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Session>> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Read the persisted record; anything unreadable is a logged-out start.
fn load(path: &PathBuf) -> Option<Session> {
    let raw = std::fs::read_to_string(path).ok()?;

    match serde_json::from_str::<PersistedSession>(&raw) {
        Ok(persisted) => Some(Session {
            user: persisted.user,
            token: SecretString::from(persisted.token),
        }),
        Err(e) => {
            warn!(error = %e, path = %path.display(), "Ignoring corrupt session record");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use chrono::Utc;
    use foody_core::UserId;

    fn user() -> User {
        User {
            id: UserId::new(12),
            name: "Sari Dewi".to_string(),
            email: "sari@example.com".to_string(),
            phone: "081234567890".to_string(),
            created_at: Utc
                .with_ymd_and_hms(2025, 3, 1, 8, 30, 0)
                .single()
                .expect("valid date"),
        }
    }

    #[test]
    fn test_round_trip_through_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("foody_auth.json");

        let store = SessionStore::open(&path);
        assert!(!store.is_authenticated());

        store
            .set_credentials(user(), SecretString::from("token-abc"))
            .expect("persist");

        // A fresh store sees the persisted record.
        let reopened = SessionStore::open(&path);
        assert!(reopened.is_authenticated());
        assert_eq!(reopened.user(), Some(user()));
        assert_eq!(
            reopened.token().map(|t| t.expose_secret().to_string()),
            Some("token-abc".to_string())
        );
    }

    #[test]
    fn test_logout_clears_memory_and_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("foody_auth.json");

        let store = SessionStore::open(&path);
        store
            .set_credentials(user(), SecretString::from("token-abc"))
            .expect("persist");

        store.logout().expect("logout");
        assert!(!store.is_authenticated());
        assert!(!path.exists());

        // Logging out while already logged out is fine.
        store.logout().expect("logout again");
    }

    #[test]
    fn test_corrupt_record_loads_as_logged_out() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("foody_auth.json");
        std::fs::write(&path, "{not json").expect("write");

        let store = SessionStore::open(&path);
        assert!(!store.is_authenticated());
        assert!(store.user().is_none());
    }

    #[test]
    fn test_missing_file_loads_as_logged_out() {
        let store = SessionStore::open("/nonexistent/dir/foody_auth.json");
        assert!(!store.is_authenticated());
    }
}
