//! # In-memory backend
//!
//! [`MemoryBackend`] implements the whole collaborator surface in process. It
//! behaves like the hosted service where it matters to the client:
//!
//! - row operations require a session and only see the signed-in user's rows
//!   (the service's row-level security);
//! - ids and `created_at` are assigned on insert;
//! - every auth change is broadcast to subscribers.
//!
//! Tests use [`fail_next`](MemoryBackend::fail_next) to inject one failure into
//! a given call, [`hang_session_fetch`](MemoryBackend::hang_session_fetch) to
//! model a session request that never resolves, and [`calls`](MemoryBackend::calls)
//! to assert which requests were made.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::Utc;

use crate::backend::{AuthBackend, ProjectTable, SessionCallback, Subscription};
use crate::broadcast::SessionBroadcaster;
use crate::error::BackendError;
use crate::models::{
    Identity, NewProject, Project, ProjectId, ProjectPatch, Session, SessionEvent, UserId,
};

/// Backend operations, as recorded and as targeted by failure injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    CurrentSession,
    CurrentIdentity,
    SignIn,
    SignOut,
    Select,
    Insert,
    Update,
    Delete,
}

/// One request received by the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CurrentSession,
    CurrentIdentity,
    SignIn(String),
    SignOut,
    Select(UserId),
    Insert(NewProject),
    Update(ProjectId, ProjectPatch),
    Delete(ProjectId),
}

#[derive(Default)]
struct State {
    session: Option<Session>,
    accounts: HashMap<String, (String, Identity)>,
    projects: Vec<Project>,
    next_id: ProjectId,
    token_serial: u64,
    failures: HashMap<Op, BackendError>,
    hang_session: bool,
    calls: Vec<Call>,
}

/// In-process backend for tests and offline demos.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    state: Arc<Mutex<State>>,
    broadcaster: SessionBroadcaster,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an account that can sign in with email and password.
    pub fn with_account(self, email: &str, password: &str, user_id: &str) -> Self {
        self.lock().accounts.insert(
            email.to_string(),
            (password.to_string(), Identity::new(user_id).with_email(email)),
        );
        self
    }

    /// Start with an existing session, as if restored from a previous visit.
    /// No event is broadcast.
    pub fn with_session(self, user_id: &str) -> Self {
        {
            let mut state = self.lock();
            let session = state.issue(Identity::new(user_id));
            state.session = Some(session);
        }
        self
    }

    /// Sign a user in directly and broadcast `SignedIn`.
    pub fn sign_in_as(&self, user_id: &str) -> Session {
        let session = {
            let mut state = self.lock();
            let session = state.issue(Identity::new(user_id));
            state.session = Some(session.clone());
            session
        };
        self.broadcaster
            .emit(SessionEvent::SignedIn, Some(session.clone()));
        session
    }

    /// Replace the access token of the current session and broadcast
    /// `TokenRefreshed`. Returns `None` when nobody is signed in.
    pub fn refresh_token(&self) -> Option<Session> {
        let session = {
            let mut state = self.lock();
            let user = state.session.as_ref()?.user.clone();
            let session = state.issue(user);
            state.session = Some(session.clone());
            session
        };
        self.broadcaster
            .emit(SessionEvent::TokenRefreshed, Some(session.clone()));
        Some(session)
    }

    /// Drop the session and broadcast `SignedOut`.
    pub fn expire_session(&self) {
        self.lock().session = None;
        self.broadcaster.emit(SessionEvent::SignedOut, None);
    }

    /// Insert a row directly, bypassing auth. Returns the assigned id.
    pub fn seed(&self, owner: &str, title: &str, description: &str) -> ProjectId {
        let mut state = self.lock();
        state.push_row(NewProject {
            title: title.to_string(),
            description: description.to_string(),
            owner: UserId::new(owner),
        })
    }

    /// Every row, regardless of owner.
    pub fn rows(&self) -> Vec<Project> {
        self.lock().projects.clone()
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: Op, error: BackendError) {
        self.lock().failures.insert(op, error);
    }

    /// Make every future `current_session` call pend forever.
    pub fn hang_session_fetch(&self) {
        self.lock().hang_session = true;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.lock().calls.clear();
    }

    /// Number of recorded calls matching `op`.
    pub fn count(&self, op: Op) -> usize {
        self.lock()
            .calls
            .iter()
            .filter(|call| call.op() == op)
            .count()
    }

    pub fn listener_count(&self) -> usize {
        self.broadcaster.listener_count()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and pop any injected failure for it.
    fn begin(&self, call: Call) -> Result<(), BackendError> {
        let mut state = self.lock();
        let op = call.op();
        state.calls.push(call);
        match state.failures.remove(&op) {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::CurrentSession => Op::CurrentSession,
            Call::CurrentIdentity => Op::CurrentIdentity,
            Call::SignIn(_) => Op::SignIn,
            Call::SignOut => Op::SignOut,
            Call::Select(_) => Op::Select,
            Call::Insert(_) => Op::Insert,
            Call::Update(..) => Op::Update,
            Call::Delete(_) => Op::Delete,
        }
    }
}

impl State {
    fn issue(&mut self, user: Identity) -> Session {
        self.token_serial += 1;
        let mut session = Session::new(format!("token-{}", self.token_serial), user);
        session.refresh_token = Some(format!("refresh-{}", self.token_serial));
        session
    }

    fn push_row(&mut self, row: NewProject) -> ProjectId {
        self.next_id += 1;
        let id = self.next_id;
        self.projects.push(Project {
            id,
            title: row.title,
            description: row.description,
            owner: row.owner,
            created_at: Utc::now(),
            completed_at: None,
        });
        id
    }

    fn signed_in_user(&self) -> Result<UserId, BackendError> {
        self.session
            .as_ref()
            .map(|session| session.user.id.clone())
            .ok_or(BackendError::Unauthorized)
    }

    fn owned_row_mut(&mut self, id: ProjectId) -> Result<&mut Project, BackendError> {
        let user = self.signed_in_user()?;
        self.projects
            .iter_mut()
            .find(|project| project.id == id && project.owner == user)
            .ok_or_else(|| BackendError::NotFound(format!("project {id}")))
    }
}

impl AuthBackend for MemoryBackend {
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        self.begin(Call::CurrentSession)?;
        if self.lock().hang_session {
            std::future::pending::<()>().await;
        }
        Ok(self.lock().session.clone())
    }

    fn on_session_change(&self, callback: SessionCallback) -> Subscription {
        self.broadcaster.subscribe(callback)
    }

    async fn current_identity(&self) -> Result<Option<Identity>, BackendError> {
        self.begin(Call::CurrentIdentity)?;
        Ok(self.lock().session.as_ref().map(|s| s.user.clone()))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        self.begin(Call::SignIn(email.to_string()))?;
        let session = {
            let mut state = self.lock();
            let user = match state.accounts.get(email) {
                Some((expected, user)) if expected == password => user.clone(),
                _ => return Err(BackendError::rejected(400, "Invalid login credentials")),
            };
            let session = state.issue(user);
            state.session = Some(session.clone());
            session
        };
        self.broadcaster
            .emit(SessionEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        self.begin(Call::SignOut)?;
        self.expire_session();
        Ok(())
    }
}

impl ProjectTable for MemoryBackend {
    async fn select_where(&self, owner: &UserId) -> Result<Vec<Project>, BackendError> {
        self.begin(Call::Select(owner.clone()))?;
        let state = self.lock();
        let user = state.signed_in_user()?;
        Ok(state
            .projects
            .iter()
            .filter(|project| &project.owner == owner && project.owner == user)
            .cloned()
            .collect())
    }

    async fn insert(&self, row: NewProject) -> Result<(), BackendError> {
        self.begin(Call::Insert(row.clone()))?;
        let mut state = self.lock();
        let user = state.signed_in_user()?;
        if row.owner != user {
            return Err(BackendError::rejected(
                403,
                "new row violates row-level security policy",
            ));
        }
        state.push_row(row);
        Ok(())
    }

    async fn update_where(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), BackendError> {
        self.begin(Call::Update(id, patch.clone()))?;
        let mut state = self.lock();
        let project = state.owned_row_mut(id)?;
        project.title = patch.title;
        project.description = patch.description;
        Ok(())
    }

    async fn delete_where(&self, id: ProjectId) -> Result<(), BackendError> {
        self.begin(Call::Delete(id))?;
        let mut state = self.lock();
        state.owned_row_mut(id)?;
        state.projects.retain(|project| project.id != id);
        Ok(())
    }
}

impl std::fmt::Debug for MemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.lock();
        f.debug_struct("MemoryBackend")
            .field("signed_in", &state.session.is_some())
            .field("projects", &state.projects.len())
            .finish()
    }
}
