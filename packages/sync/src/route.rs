//! # Session gate
//!
//! The client has two destinations, `/auth` and `/projects`. [`gate`] decides
//! what a path shows for the current [`SessionState`]:
//!
//! | Path | Loading | No session | Session |
//! |------|---------|------------|---------|
//! | `/auth` | loading view | auth view | auth view |
//! | `/projects` | loading view | redirect `/auth` | project list |
//! | anything else | loading view | redirect `/auth` | redirect `/projects` |
//!
//! Controllers never touch a router directly; they go through [`Navigator`].

use crate::session::SessionState;

/// A navigable destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Auth,
    Projects,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Auth => "/auth",
            Route::Projects => "/projects",
        }
    }

    pub fn from_path(path: &str) -> Option<Self> {
        match normalize(path) {
            "/auth" => Some(Route::Auth),
            "/projects" => Some(Route::Projects),
            _ => None,
        }
    }
}

/// What to put on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Loading,
    Auth,
    ProjectList,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteOutcome {
    Render(View),
    Redirect(Route),
}

/// Something that can move the user to another route.
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}

/// Resolve `path` against the session.
pub fn gate(path: &str, session: &SessionState) -> RouteOutcome {
    if session.is_loading() {
        return RouteOutcome::Render(View::Loading);
    }
    let signed_in = session.session().is_some();

    match (Route::from_path(path), signed_in) {
        (Some(Route::Auth), _) => RouteOutcome::Render(View::Auth),
        (Some(Route::Projects), true) => RouteOutcome::Render(View::ProjectList),
        (Some(Route::Projects), false) => RouteOutcome::Redirect(Route::Auth),
        (None, true) => RouteOutcome::Redirect(Route::Projects),
        (None, false) => RouteOutcome::Redirect(Route::Auth),
    }
}

/// Drop the query string and any trailing slash.
fn normalize(path: &str) -> &str {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    match path.trim_end_matches('/') {
        "" => "/",
        trimmed => trimmed,
    }
}
