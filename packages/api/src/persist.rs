//! Where the HTTP backend keeps its session between page loads.
//!
//! Browser builds write the session to `localStorage`, so a reload restores it
//! and the client starts signed in. Native builds keep it in memory.

use std::sync::{Arc, Mutex, PoisonError};

use crate::models::Session;

/// Storage key of the persisted session.
#[cfg(target_arch = "wasm32")]
const SESSION_KEY: &str = "projects.session";

/// Load and save the one current session.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> Option<Session>;

    /// `None` forgets the stored session.
    fn save(&self, session: Option<&Session>);
}

/// Keeps the session for the life of the process only.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    slot: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    pub fn new(session: Option<Session>) -> Self {
        Self {
            slot: Mutex::new(session),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Option<Session> {
        self.slot
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, session: Option<&Session>) {
        *self.slot.lock().unwrap_or_else(PoisonError::into_inner) = session.cloned();
    }
}

/// Persists the session as JSON in the browser's `localStorage`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageSessionStore {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageSessionStore {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

#[cfg(target_arch = "wasm32")]
impl SessionStore for LocalStorageSessionStore {
    fn load(&self) -> Option<Session> {
        let raw = local_storage()?.get_item(&self.key).ok().flatten()?;
        decode_stored(&raw)
    }

    fn save(&self, session: Option<&Session>) {
        let Some(storage) = local_storage() else {
            tracing::warn!("localStorage unavailable, session not persisted");
            return;
        };
        let result = match session {
            Some(session) => match serde_json::to_string(session) {
                Ok(raw) => storage.set_item(&self.key, &raw),
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode session");
                    return;
                }
            },
            None => storage.remove_item(&self.key),
        };
        if result.is_err() {
            tracing::warn!(key = %self.key, "failed to write localStorage");
        }
    }
}

/// A stored value that no longer decodes is treated as signed out.
#[cfg_attr(not(target_arch = "wasm32"), allow(dead_code))]
fn decode_stored(raw: &str) -> Option<Session> {
    match serde_json::from_str(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!(error = %e, "discarding unreadable stored session");
            None
        }
    }
}

/// The store the platform supports.
pub(crate) fn default_store() -> Arc<dyn SessionStore> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(LocalStorageSessionStore::new(SESSION_KEY))
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(MemorySessionStore::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Identity;

    #[test]
    fn test_memory_store_forgets_on_none() {
        let store = MemorySessionStore::new(Some(Session::new("jwt", Identity::new("u1"))));
        assert_eq!(store.load().unwrap().access_token, "jwt");

        store.save(None);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_stored_session_decodes() {
        let mut session = Session::new("jwt", Identity::new("u1").with_email("a@b.c"));
        session.refresh_token = Some("r1".to_string());
        session.expires_at = Some(1_700_000_000);

        let raw = serde_json::to_string(&session).unwrap();
        assert_eq!(decode_stored(&raw), Some(session));
        assert_eq!(decode_stored("{\"access_token\":"), None);
    }
}
