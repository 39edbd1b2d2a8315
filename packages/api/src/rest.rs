//! # HTTP backend
//!
//! [`RestBackend`] speaks to a hosted GoTrue (auth) + PostgREST (rows) service,
//! the pair behind a Supabase project.
//!
//! ## Auth
//!
//! | Call | Request |
//! |------|---------|
//! | sign in | `POST /auth/v1/token?grant_type=password` |
//! | refresh | `POST /auth/v1/token?grant_type=refresh_token` |
//! | identity | `GET /auth/v1/user` |
//! | sign out | `POST /auth/v1/logout` |
//!
//! The session is kept in a [`SessionStore`] (browser `localStorage` on wasm)
//! and restored when the backend is built, so a reload does not sign the user
//! out. Every change is saved and broadcast to subscribers.
//!
//! Before any call that needs the access token, a token that expires within
//! [`REFRESH_MARGIN_SECS`] is exchanged for a new one. If the refresh token is
//! refused the session is dropped and a `SignedOut` change is broadcast, which
//! sends the user back to the sign-in page.
//!
//! ## Rows
//!
//! Selects filter on `id_user`, updates and deletes on `id_project`. Updates and
//! deletes ask for the affected rows back (`Prefer: return=representation`) so a
//! request that matched nothing is reported as [`BackendError::NotFound`] rather
//! than silently succeeding.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::backend::{AuthBackend, ProjectTable, SessionCallback, Subscription};
use crate::broadcast::SessionBroadcaster;
use crate::config::BackendConfig;
use crate::error::BackendError;
use crate::models::{
    Identity, NewProject, Project, ProjectId, ProjectPatch, Session, SessionEvent, UserId,
};
use crate::persist::{self, SessionStore};

/// Refresh this long before the access token's stated expiry.
const REFRESH_MARGIN_SECS: i64 = 30;

#[derive(Serialize)]
struct PasswordGrant<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RefreshGrant<'a> {
    refresh_token: &'a str,
}

/// Backend client for a GoTrue + PostgREST service.
#[derive(Clone)]
pub struct RestBackend {
    http: Client,
    config: BackendConfig,
    session: Arc<Mutex<Option<Session>>>,
    store: Arc<dyn SessionStore>,
    broadcaster: SessionBroadcaster,
}

impl RestBackend {
    /// Build the backend with the platform's session store.
    pub fn new(config: BackendConfig) -> Self {
        Self::with_store(config, persist::default_store())
    }

    /// Build the backend, restoring whatever session `store` holds.
    pub fn with_store(config: BackendConfig, store: Arc<dyn SessionStore>) -> Self {
        let restored = store.load();
        if let Some(session) = &restored {
            tracing::info!(user = %session.user.id, "restored session");
        }
        Self {
            http: Client::new(),
            config,
            session: Arc::new(Mutex::new(restored)),
            store,
            broadcaster: SessionBroadcaster::new(),
        }
    }

    pub fn config(&self) -> &BackendConfig {
        &self.config
    }

    /// Exchange the refresh token for a new session.
    pub async fn refresh_session(&self) -> Result<Session, BackendError> {
        let refresh_token = self
            .stored_session()
            .and_then(|session| session.refresh_token)
            .ok_or(BackendError::Unauthorized)?;

        let request = self
            .http
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "refresh_token")])
            .json(&RefreshGrant {
                refresh_token: &refresh_token,
            });
        let session: Session = decode(self.send(request, None).await?).await?;

        tracing::debug!(user = %session.user.id, "token refreshed");
        self.replace_session(SessionEvent::TokenRefreshed, Some(session.clone()));
        Ok(session)
    }

    /// The stored session with a usable access token, refreshing it first when
    /// it is about to expire. `Ok(None)` when signed out.
    async fn live_session(&self) -> Result<Option<Session>, BackendError> {
        let Some(session) = self.stored_session() else {
            return Ok(None);
        };
        let now = chrono::Utc::now().timestamp();
        if !session.is_expired_at(now + REFRESH_MARGIN_SECS) {
            return Ok(Some(session));
        }

        match self.refresh_session().await {
            Ok(session) => Ok(Some(session)),
            Err(e @ (BackendError::Unauthorized | BackendError::Rejected { .. })) => {
                tracing::warn!(error = %e, "session could not be refreshed, signing out");
                self.replace_session(SessionEvent::SignedOut, None);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn stored_session(&self) -> Option<Session> {
        self.lock_session().clone()
    }

    fn lock_session(&self) -> MutexGuard<'_, Option<Session>> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn replace_session(&self, event: SessionEvent, session: Option<Session>) {
        *self.lock_session() = session.clone();
        self.store.save(session.as_ref());
        self.broadcaster.emit(event, session);
    }

    /// Attach the API key and the bearer credential, send, and map the status.
    async fn send(
        &self,
        request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<Response, BackendError> {
        let token = token.unwrap_or(&self.config.anon_key);
        let response = request
            .header("apikey", &self.config.anon_key)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response.text().await.unwrap_or_default();
        tracing::debug!(%status, %message, "backend rejected request");
        match status {
            StatusCode::UNAUTHORIZED => Err(BackendError::Unauthorized),
            StatusCode::NOT_FOUND => Err(BackendError::NotFound(message)),
            _ => Err(BackendError::rejected(status.as_u16(), message)),
        }
    }

    /// Rows calls carry the user's token; without a session they are refused
    /// before leaving the client.
    async fn access_token(&self) -> Result<String, BackendError> {
        self.live_session()
            .await?
            .map(|session| session.access_token)
            .ok_or(BackendError::Unauthorized)
    }

    fn filter_by_id(&self, request: RequestBuilder, id: ProjectId) -> RequestBuilder {
        request
            .query(&[("id_project", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, BackendError> {
    response
        .json::<T>()
        .await
        .map_err(|e| BackendError::Decode(e.to_string()))
}

fn expect_rows(rows: Vec<Project>, id: ProjectId) -> Result<(), BackendError> {
    if rows.is_empty() {
        Err(BackendError::NotFound(format!("project {id}")))
    } else {
        Ok(())
    }
}

impl AuthBackend for RestBackend {
    async fn current_session(&self) -> Result<Option<Session>, BackendError> {
        self.live_session().await
    }

    fn on_session_change(&self, callback: SessionCallback) -> Subscription {
        self.broadcaster.subscribe(callback)
    }

    async fn current_identity(&self) -> Result<Option<Identity>, BackendError> {
        let Some(session) = self.live_session().await? else {
            return Ok(None);
        };

        let request = self.http.get(self.config.auth_url("user"));
        let response = self.send(request, Some(&session.access_token)).await?;
        Ok(Some(decode(response).await?))
    }

    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Session, BackendError> {
        let request = self
            .http
            .post(self.config.auth_url("token"))
            .query(&[("grant_type", "password")])
            .json(&PasswordGrant { email, password });
        let session: Session = decode(self.send(request, None).await?).await?;

        tracing::info!(user = %session.user.id, "signed in");
        self.replace_session(SessionEvent::SignedIn, Some(session.clone()));
        Ok(session)
    }

    async fn sign_out(&self) -> Result<(), BackendError> {
        let result = match self.stored_session() {
            Some(session) => {
                let request = self.http.post(self.config.auth_url("logout"));
                self.send(request, Some(&session.access_token))
                    .await
                    .map(|_| ())
            }
            None => Ok(()),
        };

        // The local session is gone even when the server call failed.
        self.replace_session(SessionEvent::SignedOut, None);
        result
    }
}

impl ProjectTable for RestBackend {
    async fn select_where(&self, owner: &UserId) -> Result<Vec<Project>, BackendError> {
        let token = self.access_token().await?;
        let request = self
            .http
            .get(self.config.table_url())
            .query(&[("select", "*".to_string()), ("id_user", format!("eq.{owner}"))]);
        decode(self.send(request, Some(&token)).await?).await
    }

    async fn insert(&self, row: NewProject) -> Result<(), BackendError> {
        let token = self.access_token().await?;
        let request = self
            .http
            .post(self.config.table_url())
            .header("Prefer", "return=minimal")
            .json(&row);
        self.send(request, Some(&token)).await?;
        Ok(())
    }

    async fn update_where(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), BackendError> {
        let token = self.access_token().await?;
        let request = self.filter_by_id(self.http.patch(self.config.table_url()), id).json(&patch);
        let rows: Vec<Project> = decode(self.send(request, Some(&token)).await?).await?;
        expect_rows(rows, id)
    }

    async fn delete_where(&self, id: ProjectId) -> Result<(), BackendError> {
        let token = self.access_token().await?;
        let request = self.filter_by_id(self.http.delete(self.config.table_url()), id);
        let rows: Vec<Project> = decode(self.send(request, Some(&token)).await?).await?;
        expect_rows(rows, id)
    }
}

impl std::fmt::Debug for RestBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestBackend")
            .field("url", &self.config.url)
            .field("table", &self.config.table)
            .field("signed_in", &self.stored_session().is_some())
            .finish()
    }
}
