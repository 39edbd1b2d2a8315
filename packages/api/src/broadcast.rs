//! Session change fan-out shared by the backend implementations.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::backend::{SessionCallback, Subscription};
use crate::models::{Session, SessionEvent};

#[derive(Default)]
struct Listeners {
    next_id: u64,
    callbacks: BTreeMap<u64, SessionCallback>,
}

/// Registry of session listeners.
///
/// Listeners are invoked in registration order, outside the registry lock, so a
/// callback may itself subscribe or cancel.
#[derive(Clone, Default)]
pub struct SessionBroadcaster {
    listeners: Arc<Mutex<Listeners>>,
}

impl SessionBroadcaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, callback: SessionCallback) -> Subscription {
        let id = {
            let mut listeners = lock(&self.listeners);
            let id = listeners.next_id;
            listeners.next_id += 1;
            listeners.callbacks.insert(id, callback);
            id
        };

        let weak: Weak<Mutex<Listeners>> = Arc::downgrade(&self.listeners);
        Subscription::new(move || {
            if let Some(listeners) = weak.upgrade() {
                lock(&listeners).callbacks.remove(&id);
            }
        })
    }

    pub fn emit(&self, event: SessionEvent, session: Option<Session>) {
        let callbacks: Vec<SessionCallback> = lock(&self.listeners).callbacks.values().cloned().collect();
        tracing::debug!(?event, listeners = callbacks.len(), "session change");
        for callback in callbacks {
            callback(event, session.clone());
        }
    }

    pub fn listener_count(&self) -> usize {
        lock(&self.listeners).callbacks.len()
    }
}

impl std::fmt::Debug for SessionBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionBroadcaster")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

fn lock(listeners: &Mutex<Listeners>) -> MutexGuard<'_, Listeners> {
    listeners.lock().unwrap_or_else(PoisonError::into_inner)
}
