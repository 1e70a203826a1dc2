//! Session persistence for Lesson Fetcher
//!
//! This module stores the authentication token and minimal profile fields
//! in a durable JSON record and keeps an in-memory copy for synchronous
//! reads during request signing. The in-memory copy is refreshed
//! explicitly: once at process start via [`SessionStore::load_from_store`]
//! and on every mutation. It is never re-read implicitly, so a concurrent
//! external change to the record is not observed until the next reload.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::constants::files;
use crate::errors::{SessionError, SessionResult};

/// Durable session record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub token: String,
    pub user_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub saved_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Derived display name: "first last", first-only, last-only, then
    /// email; blank fields count as absent
    pub fn display_name(&self) -> Option<String> {
        derive_display_name(&self.first_name, &self.last_name, &self.email)
    }
}

/// Session store backed by a JSON record on disk
///
/// Mutations persist durably first and only then flip the in-memory copy
/// (write-then-flip), so a failed write never leaves a token in memory
/// that durable storage does not hold. The in-memory copy lives in a
/// `watch` channel: reads are synchronous and screens can subscribe for
/// change notification.
pub struct SessionStore {
    path: PathBuf,
    state: watch::Sender<Option<SessionRecord>>,
}

impl SessionStore {
    /// Create a store for the record at `path`; no I/O happens here
    pub fn new(path: PathBuf) -> Self {
        let (state, _) = watch::channel(None);
        Self { path, state }
    }

    /// Populate the in-memory copy from durable storage
    ///
    /// Must run before any authenticated request is issued at process
    /// start. A missing record means logged out, not an error. Idempotent,
    /// but never re-invoked automatically.
    pub async fn load_from_store(&self) -> SessionResult<()> {
        match fs::read_to_string(&self.path).await {
            Ok(content) => {
                let record: SessionRecord =
                    serde_json::from_str(&content).map_err(|e| SessionError::InvalidRecord {
                        path: self.path.clone(),
                        source: e,
                    })?;
                debug!("Loaded session for user {}", record.user_id);
                self.state.send_replace(Some(record));
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No session record found, starting logged out");
                self.state.send_replace(None);
                Ok(())
            }
            Err(e) => Err(SessionError::Io(e)),
        }
    }

    /// Persist a new session durably, then update the in-memory copy
    pub async fn save_session(
        &self,
        token: &str,
        user_id: i64,
        first_name: &str,
        last_name: &str,
        email: &str,
    ) -> SessionResult<()> {
        let record = SessionRecord {
            token: token.to_string(),
            user_id,
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: email.to_string(),
            saved_at: Utc::now(),
        };

        self.persist(&record).await?;

        // In-memory copy flips only after the durable write succeeded
        self.state.send_replace(Some(record));
        info!("Session saved for user {}", user_id);
        Ok(())
    }

    /// Erase the durable record, then the in-memory copy
    pub async fn clear_session(&self) -> SessionResult<()> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(SessionError::Io(e)),
        }

        self.state.send_replace(None);
        info!("Session cleared");
        Ok(())
    }

    /// Current token, read synchronously from the in-memory copy
    pub fn current_token(&self) -> Option<String> {
        self.state.borrow().as_ref().map(|r| r.token.clone())
    }

    /// Current user id, if logged in
    pub fn user_id(&self) -> Option<i64> {
        self.state.borrow().as_ref().map(|r| r.user_id)
    }

    /// Derived display name for the current user
    pub fn display_name(&self) -> Option<String> {
        self.state.borrow().as_ref().and_then(|r| r.display_name())
    }

    /// Whether a session is currently held in memory
    pub fn is_logged_in(&self) -> bool {
        self.state.borrow().is_some()
    }

    /// Snapshot of the full current record
    pub fn current(&self) -> Option<SessionRecord> {
        self.state.borrow().clone()
    }

    /// Subscribe to session changes for UI binding
    pub fn subscribe(&self) -> watch::Receiver<Option<SessionRecord>> {
        self.state.subscribe()
    }

    /// Write the record to disk using the temp file + rename pattern
    async fn persist(&self, record: &SessionRecord) -> SessionResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content = serde_json::to_string_pretty(record).map_err(SessionError::Serialize)?;

        let temp_path = self.path.with_extension(format!(
            "{}{}",
            self.path.extension().unwrap_or_default().to_string_lossy(),
            files::TEMP_FILE_SUFFIX
        ));

        fs::write(&temp_path, content).await?;

        fs::rename(&temp_path, &self.path).await.map_err(|e| {
            warn!("Atomic session write failed: {}", e);
            SessionError::AtomicOperationFailed {
                temp_path: temp_path.clone(),
                final_path: self.path.clone(),
            }
        })?;

        Ok(())
    }
}

/// Display-name priority: both names, first-only, last-only, email, none
fn derive_display_name(first_name: &str, last_name: &str, email: &str) -> Option<String> {
    let first = first_name.trim();
    let last = last_name.trim();

    match (first.is_empty(), last.is_empty()) {
        (false, false) => Some(format!("{} {}", first, last)),
        (false, true) => Some(first.to_string()),
        (true, false) => Some(last.to_string()),
        (true, true) => {
            let email = email.trim();
            if email.is_empty() {
                None
            } else {
                Some(email.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SessionStore {
        SessionStore::new(dir.path().join("session.json"))
    }

    #[test]
    fn test_display_name_derivation() {
        assert_eq!(
            derive_display_name("Asha", "Rao", "a@b.com").as_deref(),
            Some("Asha Rao")
        );
        assert_eq!(
            derive_display_name("Asha", "", "a@b.com").as_deref(),
            Some("Asha")
        );
        assert_eq!(
            derive_display_name("", "Rao", "a@b.com").as_deref(),
            Some("Rao")
        );
        assert_eq!(
            derive_display_name("", "", "a@b.com").as_deref(),
            Some("a@b.com")
        );
        assert_eq!(derive_display_name("", "", ""), None);
    }

    #[tokio::test]
    async fn test_save_and_reload_round_trip() {
        let temp_dir = TempDir::new().unwrap();

        let store = store_in(&temp_dir);
        store
            .save_session("jwt-token", 42, "Asha", "Rao", "asha@example.com")
            .await
            .unwrap();

        assert_eq!(store.current_token().as_deref(), Some("jwt-token"));
        assert_eq!(store.user_id(), Some(42));

        // A fresh store over the same file starts empty until loaded
        let reloaded = store_in(&temp_dir);
        assert!(reloaded.current_token().is_none());

        reloaded.load_from_store().await.unwrap();
        assert_eq!(reloaded.current_token().as_deref(), Some("jwt-token"));
        assert_eq!(reloaded.display_name().as_deref(), Some("Asha Rao"));
    }

    #[tokio::test]
    async fn test_load_missing_record_means_logged_out() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store.load_from_store().await.unwrap();
        assert!(!store.is_logged_in());
        assert!(store.current_token().is_none());
    }

    #[tokio::test]
    async fn test_load_corrupt_record_fails() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("session.json");
        tokio::fs::write(&path, "not json at all").await.unwrap();

        let store = SessionStore::new(path);
        let result = store.load_from_store().await;
        assert!(matches!(result, Err(SessionError::InvalidRecord { .. })));
    }

    #[tokio::test]
    async fn test_clear_session_removes_record_and_memory() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);

        store
            .save_session("jwt-token", 7, "Asha", "Rao", "asha@example.com")
            .await
            .unwrap();
        store.clear_session().await.unwrap();

        assert!(!store.is_logged_in());
        assert!(!temp_dir.path().join("session.json").exists());

        // Clearing again is fine
        store.clear_session().await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_durable_write_leaves_memory_untouched() {
        let temp_dir = TempDir::new().unwrap();

        // Parent of the record path is a regular file, so persistence
        // cannot succeed
        let blocker = temp_dir.path().join("blocker");
        tokio::fs::write(&blocker, "x").await.unwrap();

        let store = SessionStore::new(blocker.join("session.json"));
        let result = store
            .save_session("jwt-token", 42, "Asha", "Rao", "asha@example.com")
            .await;

        assert!(result.is_err());
        assert!(store.current_token().is_none());
        assert!(!store.is_logged_in());
    }

    #[tokio::test]
    async fn test_subscribers_observe_session_changes() {
        let temp_dir = TempDir::new().unwrap();
        let store = store_in(&temp_dir);
        let mut rx = store.subscribe();

        assert!(rx.borrow_and_update().is_none());

        store
            .save_session("jwt-token", 42, "Asha", "Rao", "asha@example.com")
            .await
            .unwrap();

        assert!(rx.has_changed().unwrap());
        assert_eq!(
            rx.borrow_and_update().as_ref().map(|r| r.user_id),
            Some(42)
        );
    }
}
