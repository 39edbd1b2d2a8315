//! # Sync crate: session and project list controllers
//!
//! The UI-independent core of the client. Two controllers talk to the backend
//! and publish their state through `tokio::sync::watch` channels; the `ui` crate
//! mirrors those channels into signals.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`session`] | [`SessionController`]: current session, change subscription, redirect on sign in |
//! | [`projects`] | [`ProjectListController`]: cached rows, writes, refresh-driven reloads, notices |
//! | [`route`] | The `/auth` / `/projects` gate and the [`Navigator`] seam |
//! | [`refresh`] | [`RefreshToggle`], the generation counter that triggers reloads |
//! | [`draft`] | Form drafts for the creation form and the edit modal |
//! | [`confirm`] | [`Confirm`], the yes/no prompt before deletes |
//! | [`timer`] | [`Timer`], fire-and-forget delays for notices |
//! | [`config`] | [`ClientConfig`] (`projects.toml`) |
//!
//! The controllers only meet through the backend: the list controller resolves
//! the user itself instead of reading the session controller.

pub mod config;
pub mod confirm;
pub mod draft;
mod error;
pub mod projects;
pub mod refresh;
pub mod route;
pub mod session;
pub mod timer;

pub use config::ClientConfig;
pub use confirm::Confirm;
pub use draft::{DraftField, EditDraft, ProjectDraft};
pub use error::SyncError;
pub use projects::{DeleteOutcome, ListPhase, ListState, ProjectListController};
pub use refresh::RefreshToggle;
pub use route::{gate, Navigator, Route, RouteOutcome, View};
pub use session::{SessionController, SessionGuard, SessionState};
#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimer;
pub use timer::Timer;

#[cfg(test)]
mod tests {
    use super::*;
    use api::memory::{Call, Op};
    use api::{MemoryBackend, UserId};
    use std::sync::{Arc, Mutex};
    use tokio::task::LocalSet;

    #[derive(Default)]
    struct RecordingNavigator {
        routes: Mutex<Vec<Route>>,
    }

    impl Navigator for RecordingNavigator {
        fn navigate(&self, route: Route) {
            self.routes.lock().unwrap().push(route);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_sign_in_opens_project_list() {
        LocalSet::new()
            .run_until(async {
                let backend = Arc::new(MemoryBackend::new());
                backend.seed("u1", "Garden", "");
                let navigator = Arc::new(RecordingNavigator::default());
                let session = SessionController::new(backend.clone(), navigator.clone());
                let _guard = session.mount().await;

                // Signed out: every protected path lands on the auth view.
                assert_eq!(
                    gate("/projects", &session.state()),
                    RouteOutcome::Redirect(Route::Auth)
                );

                backend.sign_in_as("u1");
                assert_eq!(*navigator.routes.lock().unwrap(), vec![Route::Projects]);
                assert_eq!(
                    gate("/projects", &session.state()),
                    RouteOutcome::Render(View::ProjectList)
                );

                // The list view mounts on /projects and loads the user's rows.
                let confirm: Arc<dyn Confirm> = Arc::new(|_: &str| true);
                let list = ProjectListController::new(backend.clone(), confirm, Arc::new(TokioTimer));
                let driver = list.clone();
                tokio::task::spawn_local(async move { driver.run().await });
                list.settled().await;

                assert!(backend.calls().contains(&Call::Select(UserId::new("u1"))));
                assert_eq!(backend.count(Op::Select), 1);
                assert_eq!(list.state().projects.len(), 1);
                assert_eq!(list.state().phase, ListPhase::Ready);
            })
            .await;
    }
}
