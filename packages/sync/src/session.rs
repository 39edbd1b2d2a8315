//! # Session controller
//!
//! Owns the one "current session" value of the client and keeps it in step with
//! the backend.
//!
//! ## Lifecycle
//!
//! 1. [`SessionController::mount`] fetches the current session once and
//!    publishes it, moving the state out of [`SessionState::Loading`].
//! 2. It then registers for session changes. Every delivered value replaces the
//!    state.
//! 3. Any non-null session, initial or pushed, redirects to
//!    [`Route::Projects`]. A null session redirects nowhere; the gate in
//!    [`crate::route`] sends the user to `/auth`.
//! 4. The returned [`SessionGuard`] releases the subscription exactly once, on
//!    [`SessionGuard::teardown`] or drop. After that the state never changes
//!    again; a remount needs a new guard.
//!
//! There is no timeout: if the backend never answers the initial fetch, the
//! state stays `Loading`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use api::{AuthBackend, Session, SessionCallback, SessionEvent, Subscription, UserId};
use futures::channel::mpsc;
use futures::Stream;
use tokio::sync::watch;

use crate::error::SyncError;
use crate::route::{Navigator, Route};

/// What the client knows about the session.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum SessionState {
    /// The first value has not arrived yet.
    #[default]
    Loading,
    Resolved(Option<Session>),
}

impl SessionState {
    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }

    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionState::Resolved(session) => session.as_ref(),
            SessionState::Loading => None,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        self.session().map(Session::user_id)
    }
}

/// Where published states go: the latest value for readers, and one queue
/// per [`SessionController::updates`] stream so no value is skipped.
struct Outlets {
    state: watch::Sender<SessionState>,
    streams: Mutex<Vec<mpsc::UnboundedSender<SessionState>>>,
}

impl Outlets {
    fn publish(&self, state: SessionState) {
        self.state.send_replace(state.clone());
        // Dropped streams fall out here
        self.streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .retain(|tx| tx.unbounded_send(state.clone()).is_ok());
    }
}

/// Observes the backend session and drives redirects.
pub struct SessionController<B, N> {
    backend: Arc<B>,
    navigator: Arc<N>,
    outlets: Arc<Outlets>,
}

impl<B, N> Clone for SessionController<B, N> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            navigator: self.navigator.clone(),
            outlets: self.outlets.clone(),
        }
    }
}

impl<B, N> SessionController<B, N>
where
    B: AuthBackend,
    N: Navigator + 'static,
{
    pub fn new(backend: Arc<B>, navigator: Arc<N>) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            backend,
            navigator,
            outlets: Arc::new(Outlets {
                state,
                streams: Mutex::new(Vec::new()),
            }),
        }
    }

    pub fn state(&self) -> SessionState {
        self.outlets.state.borrow().clone()
    }

    /// The latest state only; intermediate values may be skipped.
    pub fn watch(&self) -> watch::Receiver<SessionState> {
        self.outlets.state.subscribe()
    }

    /// Every state published after this call, each one, in order of arrival.
    /// The stream never ends while the controller lives; after teardown it
    /// simply yields nothing more.
    pub fn updates(&self) -> impl Stream<Item = SessionState> {
        let (tx, rx) = mpsc::unbounded();
        self.outlets
            .streams
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(tx);
        rx
    }

    /// Fetch the current session, publish it, then subscribe to changes.
    pub async fn mount(&self) -> SessionGuard {
        let current = match self.backend.current_session().await {
            Ok(session) => session,
            Err(e) => {
                tracing::error!(error = %e, "failed to fetch current session");
                None
            }
        };
        publish(&self.outlets, self.navigator.as_ref(), current);

        let live = Arc::new(AtomicBool::new(true));
        let callback: SessionCallback = {
            let live = live.clone();
            let outlets = self.outlets.clone();
            let navigator = self.navigator.clone();
            Arc::new(move |event: SessionEvent, session: Option<Session>| {
                if !live.load(Ordering::SeqCst) {
                    return;
                }
                tracing::debug!(?event, signed_in = session.is_some(), "session changed");
                publish(&outlets, navigator.as_ref(), session);
            })
        };
        let subscription = self.backend.on_session_change(callback);

        SessionGuard {
            subscription: Some(subscription),
            live,
        }
    }

    /// Ask the backend to sign in. The new session arrives through the
    /// subscription like any other change.
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SyncError> {
        match self.backend.sign_in_with_password(email, password).await {
            Ok(_) => Ok(()),
            Err(e) => {
                tracing::error!(error = %e, "sign in failed");
                Err(e.into())
            }
        }
    }

    pub async fn sign_out(&self) -> Result<(), SyncError> {
        self.backend.sign_out().await.map_err(|e| {
            tracing::error!(error = %e, "sign out failed");
            SyncError::from(e)
        })
    }
}

fn publish<N: Navigator + ?Sized>(outlets: &Outlets, navigator: &N, session: Option<Session>) {
    let signed_in = session.is_some();
    outlets.publish(SessionState::Resolved(session));
    if signed_in {
        navigator.navigate(Route::Projects);
    }
}

/// Scoped ownership of the session subscription.
#[must_use = "dropping the guard stops session updates"]
#[derive(Debug)]
pub struct SessionGuard {
    subscription: Option<Subscription>,
    live: Arc<AtomicBool>,
}

impl SessionGuard {
    /// Stop receiving session changes.
    pub fn teardown(mut self) {
        self.release();
    }

    pub fn is_active(&self) -> bool {
        self.subscription.is_some()
    }

    fn release(&mut self) {
        self.live.store(false, Ordering::SeqCst);
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.release();
    }
}
