//! # Session and identity
//!
//! A [`Session`] is the proof of authentication handed out by the backend: an
//! opaque access token plus the [`Identity`] it was issued for. The client never
//! inspects the token; it only forwards it as a bearer credential.
//!
//! The JSON shape matches the GoTrue token response, so a `Session` deserializes
//! directly from `POST /auth/v1/token` and an `Identity` from `GET /auth/v1/user`.
//! Unknown fields are ignored.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Stable unique id of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The backend occasionally hands out users with an empty id.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// The backend's notion of the currently authenticated user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    #[serde(default)]
    pub email: Option<String>,
}

impl Identity {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: UserId::new(id),
            email: None,
        }
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Proof of authentication plus the user it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    /// Unix timestamp (seconds) at which the access token stops being accepted.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: Identity,
}

impl Session {
    pub fn new(access_token: impl Into<String>, user: Identity) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: None,
            expires_at: None,
            user,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.user.id
    }

    /// Whether the access token is no longer accepted at `now` (Unix seconds).
    /// A session without an expiry never expires.
    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }
}

/// Why a session change was delivered to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    InitialSession,
    SignedIn,
    SignedOut,
    TokenRefreshed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_from_token_response() {
        let body = r#"{
            "access_token": "jwt",
            "token_type": "bearer",
            "expires_in": 3600,
            "expires_at": 1700000000,
            "refresh_token": "r1",
            "user": { "id": "u1", "email": "a@b.c", "role": "authenticated" }
        }"#;

        let session: Session = serde_json::from_str(body).unwrap();
        assert_eq!(session.access_token, "jwt");
        assert_eq!(session.refresh_token.as_deref(), Some("r1"));
        assert_eq!(session.expires_at, Some(1_700_000_000));
        assert_eq!(session.user_id().as_str(), "u1");
        assert_eq!(session.user.email.as_deref(), Some("a@b.c"));
    }

    #[test]
    fn test_expiry() {
        let mut session = Session::new("jwt", Identity::new("u1"));
        assert!(!session.is_expired_at(i64::MAX));

        session.expires_at = Some(100);
        assert!(!session.is_expired_at(99));
        assert!(session.is_expired_at(100));
    }

    #[test]
    fn test_identity_without_email() {
        let identity: Identity = serde_json::from_str(r#"{ "id": "u2" }"#).unwrap();
        assert_eq!(identity, Identity::new("u2"));
        assert!(!identity.id.is_empty());
    }
}
