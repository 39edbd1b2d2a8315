//! # Backend collaborator traits
//!
//! The client talks to exactly one hosted backend which offers two capabilities:
//!
//! - [`AuthBackend`]: request/response calls for the current session and identity,
//!   plus a push stream of session changes delivered through a callback.
//! - [`ProjectTable`]: the four row operations on the `Projects` table, always
//!   scoped either by owner (select) or by the row's unique id (update, delete).
//!
//! The futures returned here are not required to be `Send`: on wasm the HTTP
//! client is single-threaded, and the controllers run on one cooperative executor.
//!
//! [`Subscription`] is the cancellable handle returned by
//! [`AuthBackend::on_session_change`]. Cancelling it (explicitly or by dropping it)
//! stops delivery; the cancel action runs at most once.

use std::future::Future;
use std::sync::Arc;

use crate::error::BackendError;
use crate::models::{Identity, NewProject, Project, ProjectId, ProjectPatch, Session, SessionEvent, UserId};

/// Callback invoked on every session change.
pub type SessionCallback = Arc<dyn Fn(SessionEvent, Option<Session>) + Send + Sync>;

/// Authentication half of the backend.
pub trait AuthBackend {
    /// The session the backend currently holds, if any.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, BackendError>>;

    /// Register for session changes. Delivery continues until the returned
    /// [`Subscription`] is cancelled or dropped.
    fn on_session_change(&self, callback: SessionCallback) -> Subscription;

    /// Resolve the user behind the current session.
    fn current_identity(&self) -> impl Future<Output = Result<Option<Identity>, BackendError>>;

    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<Session, BackendError>>;

    fn sign_out(&self) -> impl Future<Output = Result<(), BackendError>>;
}

/// Row operations on the projects table.
pub trait ProjectTable {
    fn select_where(&self, owner: &UserId) -> impl Future<Output = Result<Vec<Project>, BackendError>>;

    fn insert(&self, row: NewProject) -> impl Future<Output = Result<(), BackendError>>;

    fn update_where(
        &self,
        id: ProjectId,
        patch: ProjectPatch,
    ) -> impl Future<Output = Result<(), BackendError>>;

    fn delete_where(&self, id: ProjectId) -> impl Future<Output = Result<(), BackendError>>;
}

/// The full collaborator: auth plus rows.
pub trait Backend: AuthBackend + ProjectTable {}

impl<T: AuthBackend + ProjectTable> Backend for T {}

/// Handle to a registered session listener.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop delivery.
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_cancel_runs_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        let sub = Subscription::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        sub.cancel();
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_drop_cancels() {
        let count = Arc::new(AtomicUsize::new(0));
        let counter = count.clone();
        {
            let _sub = Subscription::new(move || {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        }
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
