//! This crate contains all shared UI for the workspace.
//!
//! Components here are thin: state lives in the `sync` controllers, and each
//! component mirrors a controller's watch channel into a signal.

use std::sync::Arc;

use dioxus::prelude::*;

mod auth;
pub use auth::{use_auth, AuthContext, AuthForm, AuthProvider, LogoutButton};

mod platform;
pub use platform::{app_timer, BrowserConfirm};

mod projects;
pub use projects::ProjectList;

mod project_form;
pub use project_form::ProjectForm;

/// The backend every component talks to.
pub type AppBackend = api::RestBackend;

/// Get the shared backend handle provided at the root of the app.
pub fn use_backend() -> Arc<AppBackend> {
    use_context::<Arc<AppBackend>>()
}
