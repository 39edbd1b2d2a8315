//! # Project list controller
//!
//! Keeps a local copy of the signed-in user's projects and applies create,
//! update and delete through the backend.
//!
//! ## Refresh protocol
//!
//! The cache is never patched after a write. A successful write flips the
//! [`RefreshToggle`]; [`ProjectListController::run`] reacts to every flip with a
//! full `select_where(owner)`. The list on screen is therefore always one fresh
//! read from the backend, at the price of one extra round trip per write.
//!
//! ## Notices
//!
//! Each successful write shows a notice and schedules a clear after the notice
//! TTL (3 s by default). Timers are independent: a second write inside the
//! window overwrites the text, and the first timer will still clear it.
//!
//! ## Failures
//!
//! Nothing is ever shown for a failure. Identity and write errors are logged at
//! the call and returned; the cache, the drafts and the open forms stay as they
//! were. A failed identity lookup during a fetch empties the list.
//!
//! ## States
//!
//! `Loading` until the first fetch completes (success or not), then `Ready`
//! forever. Later fetches set `fetching` while in flight but keep `Ready`.

use std::sync::Arc;
use std::time::Duration;

use api::{Backend, NewProject, Project, ProjectId, ProjectPatch, UserId};
use tokio::sync::watch;

use crate::config::ClientConfig;
use crate::confirm::{delete_prompt, Confirm};
use crate::draft::{DraftField, EditDraft, ProjectDraft};
use crate::error::SyncError;
use crate::refresh::RefreshToggle;
use crate::timer::Timer;

pub const NOTICE_ADDED: &str = "Project added successfully!";
pub const NOTICE_UPDATED: &str = "Project updated successfully!";
pub const NOTICE_DELETED: &str = "Project deleted successfully!";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListPhase {
    #[default]
    Loading,
    Ready,
}

/// Everything the list view renders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListState {
    pub phase: ListPhase,
    /// A fetch is in flight.
    pub fetching: bool,
    /// Rows from the last successful fetch, in backend order.
    pub projects: Vec<Project>,
    /// Transient success message.
    pub notice: Option<String>,
    /// The creation form is open.
    pub creating: bool,
    pub new_draft: ProjectDraft,
    /// The edit modal, when open.
    pub editing: Option<EditDraft>,
    /// Refresh generation served by the last completed fetch.
    pub loaded_generation: Option<u64>,
}

impl ListState {
    pub fn is_loading(&self) -> bool {
        self.phase == ListPhase::Loading
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user answered no; nothing was sent.
    Declined,
}

/// Local cache of the user's projects plus the forms that edit them.
pub struct ProjectListController<B> {
    backend: Arc<B>,
    state: Arc<watch::Sender<ListState>>,
    refresh: RefreshToggle,
    confirm: Arc<dyn Confirm>,
    timer: Arc<dyn Timer>,
    notice_ttl: Duration,
}

impl<B> Clone for ProjectListController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: self.backend.clone(),
            state: self.state.clone(),
            refresh: self.refresh.clone(),
            confirm: self.confirm.clone(),
            timer: self.timer.clone(),
            notice_ttl: self.notice_ttl,
        }
    }
}

impl<B: Backend> ProjectListController<B> {
    pub fn new(backend: Arc<B>, confirm: Arc<dyn Confirm>, timer: Arc<dyn Timer>) -> Self {
        let (state, _) = watch::channel(ListState::default());
        Self {
            backend,
            state: Arc::new(state),
            refresh: RefreshToggle::new(),
            confirm,
            timer,
            notice_ttl: ClientConfig::default().notice_ttl(),
        }
    }

    pub fn with_config(mut self, config: &ClientConfig) -> Self {
        self.notice_ttl = config.notice_ttl();
        self
    }

    pub fn state(&self) -> ListState {
        self.state.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<ListState> {
        self.state.subscribe()
    }

    pub fn refresh_toggle(&self) -> &RefreshToggle {
        &self.refresh
    }

    /// Fetch once, then refetch on every refresh flip. Runs until dropped.
    pub async fn run(&self) {
        let mut generations = self.refresh.subscribe();
        loop {
            let generation = *generations.borrow_and_update();
            // Failures are logged inside and leave the list usable.
            let _ = self.fetch_list().await;
            self.state
                .send_modify(|state| state.loaded_generation = Some(generation));

            if generations.changed().await.is_err() {
                break;
            }
        }
    }

    /// Wait until the list reflects every refresh requested so far.
    pub async fn settled(&self) {
        let target = self.refresh.generation();
        let mut rx = self.state.subscribe();
        let _ = rx
            .wait_for(|state| state.loaded_generation.is_some_and(|loaded| loaded >= target))
            .await;
    }

    /// Resolve the current user, then load their projects.
    pub async fn fetch_list(&self) -> Result<Vec<Project>, SyncError> {
        match self.resolve_owner().await {
            Ok(owner) => self.fetch_list_for(&owner).await,
            Err(e) => {
                self.state.send_modify(|state| {
                    state.projects.clear();
                    state.phase = ListPhase::Ready;
                    state.fetching = false;
                });
                Err(e)
            }
        }
    }

    /// Load the projects owned by `owner` into the cache.
    pub async fn fetch_list_for(&self, owner: &UserId) -> Result<Vec<Project>, SyncError> {
        self.state.send_modify(|state| state.fetching = true);

        let result = self.backend.select_where(owner).await;
        match &result {
            Ok(projects) => tracing::debug!(owner = %owner, count = projects.len(), "projects loaded"),
            Err(e) => tracing::error!(owner = %owner, error = %e, "error fetching projects"),
        }

        self.state.send_modify(|state| {
            if let Ok(projects) = &result {
                state.projects = projects.clone();
            }
            state.phase = ListPhase::Ready;
            state.fetching = false;
        });
        result.map_err(SyncError::from)
    }

    /// Insert a project for `owner`.
    pub async fn create_item(&self, draft: ProjectDraft, owner: &UserId) -> Result<(), SyncError> {
        let row = NewProject {
            title: draft.title,
            description: draft.description,
            owner: owner.clone(),
        };
        if let Err(e) = self.backend.insert(row).await {
            tracing::error!(error = %e, "error adding project");
            return Err(e.into());
        }

        self.show_notice(NOTICE_ADDED);
        self.state.send_modify(|state| {
            state.new_draft = ProjectDraft::default();
            state.creating = false;
        });
        self.refresh.flip();
        Ok(())
    }

    /// Submit the creation form on behalf of the current user.
    pub async fn submit_new_project(&self) -> Result<(), SyncError> {
        let owner = self.resolve_owner().await?;
        let draft = self.state.borrow().new_draft.clone();
        self.create_item(draft, &owner).await
    }

    /// Apply `patch` to the project with `id`.
    pub async fn update_item(&self, id: ProjectId, patch: ProjectPatch) -> Result<(), SyncError> {
        if let Err(e) = self.backend.update_where(id, patch).await {
            tracing::error!(id, error = %e, "error updating project");
            return Err(e.into());
        }

        self.show_notice(NOTICE_UPDATED);
        self.state.send_modify(|state| state.editing = None);
        self.refresh.flip();
        Ok(())
    }

    /// Submit the edit modal.
    pub async fn submit_edit(&self) -> Result<(), SyncError> {
        let Some(edit) = self.state.borrow().editing.clone() else {
            return Err(SyncError::NoDraft);
        };
        self.update_item(edit.id, edit.draft.into()).await
    }

    /// Ask for confirmation, then delete the project with `id`.
    pub async fn delete_item(&self, id: ProjectId) -> Result<DeleteOutcome, SyncError> {
        let title = self
            .state
            .borrow()
            .project(id)
            .map(|project| project.title.clone())
            .unwrap_or_else(|| format!("#{id}"));
        if !self.confirm.confirm(&delete_prompt(&title)) {
            return Ok(DeleteOutcome::Declined);
        }

        if let Err(e) = self.backend.delete_where(id).await {
            tracing::error!(id, error = %e, "error deleting project");
            return Err(e.into());
        }

        self.show_notice(NOTICE_DELETED);
        self.refresh.flip();
        Ok(DeleteOutcome::Deleted)
    }

    /// Open or close the creation form. Closing discards the draft.
    pub fn toggle_new_form(&self) {
        self.state.send_modify(|state| {
            state.creating = !state.creating;
            if !state.creating {
                state.new_draft = ProjectDraft::default();
            }
        });
    }

    pub fn set_new_field(&self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        self.state
            .send_modify(move |state| state.new_draft.set(field, value));
    }

    /// Open the edit modal pre-filled from `project`.
    pub fn begin_edit(&self, project: &Project) {
        let edit = EditDraft {
            id: project.id,
            draft: ProjectDraft::from(project),
        };
        self.state.send_modify(move |state| state.editing = Some(edit));
    }

    pub fn set_edit_field(&self, field: DraftField, value: impl Into<String>) {
        let value = value.into();
        self.state.send_modify(move |state| {
            if let Some(edit) = state.editing.as_mut() {
                edit.draft.set(field, value);
            }
        });
    }

    pub fn cancel_edit(&self) {
        self.state.send_modify(|state| state.editing = None);
    }

    async fn resolve_owner(&self) -> Result<UserId, SyncError> {
        match self.backend.current_identity().await {
            Ok(Some(identity)) if !identity.id.is_empty() => Ok(identity.id),
            Ok(Some(_)) => {
                tracing::error!("user id is undefined");
                Err(SyncError::NoIdentity)
            }
            Ok(None) => {
                tracing::error!("no user data found");
                Err(SyncError::NoIdentity)
            }
            Err(e) => {
                tracing::error!(error = %e, "error fetching user");
                Err(e.into())
            }
        }
    }

    fn show_notice(&self, message: &str) {
        let message = message.to_string();
        self.state
            .send_modify(move |state| state.notice = Some(message));

        let state = self.state.clone();
        self.timer.schedule(
            self.notice_ttl,
            Box::new(move || state.send_modify(|state| state.notice = None)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::TokioTimer;
    use api::memory::Op;
    use api::{BackendError, MemoryBackend};
    use std::future::Future;
    use std::sync::Mutex;
    use tokio::task::LocalSet;

    struct Harness {
        backend: MemoryBackend,
        controller: ProjectListController<MemoryBackend>,
        prompts: Arc<Mutex<Vec<String>>>,
    }

    fn harness(backend: MemoryBackend, answer: bool) -> Harness {
        let prompts = Arc::new(Mutex::new(Vec::new()));
        let seen = prompts.clone();
        let confirm: Arc<dyn Confirm> = Arc::new(move |prompt: &str| {
            seen.lock().unwrap().push(prompt.to_string());
            answer
        });
        let controller =
            ProjectListController::new(Arc::new(backend.clone()), confirm, Arc::new(TokioTimer));
        Harness {
            backend,
            controller,
            prompts,
        }
    }

    impl Harness {
        fn owned_rows(&self, owner: &str) -> Vec<Project> {
            self.backend
                .rows()
                .into_iter()
                .filter(|project| project.owner.as_str() == owner)
                .collect()
        }

        fn start_driver(&self) {
            let controller = self.controller.clone();
            tokio::task::spawn_local(async move { controller.run().await });
        }
    }

    async fn local<F: Future>(f: F) -> F::Output {
        LocalSet::new().run_until(f).await
    }

    fn patch(title: &str, description: &str) -> ProjectPatch {
        ProjectPatch {
            title: title.to_string(),
            description: description.to_string(),
        }
    }

    #[tokio::test]
    async fn test_first_fetch_moves_to_ready() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        h.backend.seed("u1", "Garden", "Plant tomatoes");
        h.backend.seed("u2", "Other", "");
        assert!(h.controller.state().is_loading());

        let projects = h.controller.fetch_list().await.unwrap();

        let state = h.controller.state();
        assert_eq!(state.phase, ListPhase::Ready);
        assert!(!state.fetching);
        assert_eq!(state.projects, projects);
        assert_eq!(projects.len(), 1);
        assert!(projects.iter().all(|p| p.owner.as_str() == "u1"));
        assert_eq!(
            h.backend.calls().last(),
            Some(&api::memory::Call::Select(UserId::new("u1")))
        );
    }

    #[tokio::test]
    async fn test_missing_identity_reports_empty_list() {
        let h = harness(MemoryBackend::new(), true);

        let err = h.controller.fetch_list().await.unwrap_err();

        assert_eq!(err, SyncError::NoIdentity);
        let state = h.controller.state();
        assert_eq!(state.phase, ListPhase::Ready);
        assert!(state.projects.is_empty());
        assert_eq!(h.backend.count(Op::Select), 0);
    }

    #[tokio::test]
    async fn test_identity_error_aborts_fetch() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        h.backend.seed("u1", "Garden", "");
        h.controller.fetch_list().await.unwrap();

        h.backend
            .fail_next(Op::CurrentIdentity, BackendError::Transport("offline".to_string()));
        let err = h.controller.fetch_list().await.unwrap_err();

        assert!(matches!(err, SyncError::Backend(BackendError::Transport(_))));
        let state = h.controller.state();
        assert_eq!(state.phase, ListPhase::Ready);
        assert!(state.projects.is_empty());
        assert_eq!(h.backend.count(Op::Select), 1);
    }

    #[tokio::test]
    async fn test_select_failure_keeps_cache() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        h.backend.seed("u1", "Garden", "");
        let before = h.controller.fetch_list().await.unwrap();

        h.backend.seed("u1", "Kitchen", "");
        h.backend
            .fail_next(Op::Select, BackendError::rejected(500, "boom"));
        assert!(h.controller.fetch_list().await.is_err());

        assert_eq!(h.controller.state().projects, before);
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_reloads_and_resets_form() {
        local(async {
            let h = harness(MemoryBackend::new().with_session("u1"), true);
            h.start_driver();
            h.controller.settled().await;
            let selects = h.backend.count(Op::Select);

            h.controller.toggle_new_form();
            h.controller.set_new_field(DraftField::Title, "A");
            h.controller.set_new_field(DraftField::Description, "B");

            let owner = UserId::new("u1");
            let draft = h.controller.state().new_draft;
            assert_eq!(draft, ProjectDraft::new("A", "B"));
            h.controller.create_item(draft, &owner).await.unwrap();
            h.controller.settled().await;

            let state = h.controller.state();
            assert_eq!(h.backend.count(Op::Select), selects + 1);
            assert_eq!(state.projects, h.owned_rows("u1"));
            assert_eq!(state.projects.len(), 1);
            assert_eq!(state.projects[0].title, "A");
            assert_eq!(state.projects[0].description, "B");
            assert_eq!(state.notice.as_deref(), Some(NOTICE_ADDED));
            assert!(!state.creating);
            assert_eq!(state.new_draft, ProjectDraft::default());
        })
        .await;
    }

    #[tokio::test]
    async fn test_create_failure_leaves_everything() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        h.backend.seed("u1", "Garden", "");
        h.controller.fetch_list().await.unwrap();
        h.controller.toggle_new_form();
        h.controller.set_new_field(DraftField::Title, "A");
        let before = h.controller.state();

        h.backend
            .fail_next(Op::Insert, BackendError::rejected(400, "bad row"));
        let err = h.controller.submit_new_project().await.unwrap_err();

        assert!(matches!(err, SyncError::Backend(BackendError::Rejected { .. })));
        assert_eq!(h.controller.state(), before);
        assert_eq!(h.controller.refresh_toggle().generation(), 0);
        assert_eq!(h.backend.count(Op::Select), 1);
    }

    #[tokio::test]
    async fn test_submit_new_project_needs_identity() {
        let h = harness(MemoryBackend::new(), true);
        h.controller.toggle_new_form();
        h.controller.set_new_field(DraftField::Title, "A");

        assert_eq!(
            h.controller.submit_new_project().await,
            Err(SyncError::NoIdentity)
        );
        assert_eq!(h.backend.count(Op::Insert), 0);
        assert!(h.controller.state().creating);
    }

    #[tokio::test(start_paused = true)]
    async fn test_submit_new_project_tags_owner() {
        local(async {
            let h = harness(MemoryBackend::new().with_session("u1"), true);
            h.start_driver();
            h.controller.settled().await;

            h.controller.toggle_new_form();
            h.controller.set_new_field(DraftField::Title, "Roof");
            h.controller.submit_new_project().await.unwrap();
            h.controller.settled().await;

            let rows = h.owned_rows("u1");
            assert_eq!(rows.len(), 1);
            assert_eq!(rows[0].title, "Roof");
            assert_eq!(h.controller.state().projects, rows);
        })
        .await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_update_reloads_and_closes_modal() {
        local(async {
            let h = harness(MemoryBackend::new().with_session("u1"), true);
            let id = h.backend.seed("u1", "Garden", "Plant tomatoes");
            h.start_driver();
            h.controller.settled().await;

            let project = h.controller.state().project(id).cloned().unwrap();
            h.controller.begin_edit(&project);
            h.controller.set_edit_field(DraftField::Title, "Garden 2");
            assert_eq!(
                h.controller.state().editing.unwrap().draft,
                ProjectDraft::new("Garden 2", "Plant tomatoes")
            );

            h.controller.submit_edit().await.unwrap();
            h.controller.settled().await;

            let state = h.controller.state();
            assert_eq!(state.editing, None);
            assert_eq!(state.notice.as_deref(), Some(NOTICE_UPDATED));
            assert_eq!(state.projects, h.owned_rows("u1"));
            assert_eq!(state.project(id).unwrap().title, "Garden 2");
        })
        .await;
    }

    #[tokio::test]
    async fn test_update_failure_keeps_modal_open() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let mut id = 0;
        for n in 1..=7 {
            id = h.backend.seed("u1", &format!("Project {n}"), "");
        }
        assert_eq!(id, 7);
        h.controller.fetch_list().await.unwrap();
        let project = h.controller.state().project(7).cloned().unwrap();
        h.controller.begin_edit(&project);
        let before = h.controller.state();

        h.backend
            .fail_next(Op::Update, BackendError::rejected(409, "conflict"));
        assert!(h
            .controller
            .update_item(7, patch("New", "Text"))
            .await
            .is_err());

        let state = h.controller.state();
        assert_eq!(state, before);
        assert!(state.editing.is_some());
        assert_eq!(state.notice, None);
    }

    #[tokio::test]
    async fn test_update_of_deleted_row_is_plain_failure() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let id = h.backend.seed("u1", "Garden", "");
        h.controller.fetch_list().await.unwrap();
        h.controller.delete_item(id).await.unwrap();

        let err = h.controller.update_item(id, patch("x", "y")).await.unwrap_err();
        assert!(matches!(err, SyncError::Backend(BackendError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_submit_edit_without_modal() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        assert_eq!(h.controller.submit_edit().await, Err(SyncError::NoDraft));
        assert_eq!(h.backend.count(Op::Update), 0);
    }

    #[tokio::test]
    async fn test_cancel_edit_discards_draft() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let id = h.backend.seed("u1", "Garden", "");
        h.controller.fetch_list().await.unwrap();

        let project = h.controller.state().project(id).cloned().unwrap();
        h.controller.begin_edit(&project);
        h.controller.cancel_edit();

        assert_eq!(h.controller.state().editing, None);
        assert_eq!(h.backend.count(Op::Update), 0);
    }

    #[tokio::test]
    async fn test_closing_new_form_discards_draft() {
        let h = harness(MemoryBackend::new(), true);
        h.controller.toggle_new_form();
        h.controller.set_new_field(DraftField::Description, "half typed");
        h.controller.toggle_new_form();

        let state = h.controller.state();
        assert!(!state.creating);
        assert_eq!(state.new_draft, ProjectDraft::default());
    }

    #[tokio::test]
    async fn test_declined_delete_sends_nothing() {
        let h = harness(MemoryBackend::new().with_session("u1"), false);
        for n in 1..=42 {
            h.backend.seed("u1", &format!("Project {n}"), "");
        }
        h.controller.fetch_list().await.unwrap();
        let before = h.controller.state();
        h.backend.clear_calls();

        let outcome = h.controller.delete_item(42).await.unwrap();

        assert_eq!(outcome, DeleteOutcome::Declined);
        assert!(h.backend.calls().is_empty());
        assert_eq!(h.controller.state(), before);
        assert_eq!(
            *h.prompts.lock().unwrap(),
            vec![delete_prompt("Project 42")]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_delete_reloads() {
        local(async {
            let h = harness(MemoryBackend::new().with_session("u1"), true);
            let keep = h.backend.seed("u1", "Keep", "");
            let drop = h.backend.seed("u1", "Drop", "");
            h.start_driver();
            h.controller.settled().await;

            let outcome = h.controller.delete_item(drop).await.unwrap();
            h.controller.settled().await;

            assert_eq!(outcome, DeleteOutcome::Deleted);
            assert_eq!(h.prompts.lock().unwrap().len(), 1);
            assert_eq!(h.backend.count(Op::Delete), 1);

            let state = h.controller.state();
            assert_eq!(state.projects, h.owned_rows("u1"));
            assert!(state.project(keep).is_some());
            assert!(state.project(drop).is_none());
            assert_eq!(state.notice.as_deref(), Some(NOTICE_DELETED));
        })
        .await;
    }

    #[tokio::test]
    async fn test_delete_failure_is_silent() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let id = h.backend.seed("u1", "Garden", "");
        h.controller.fetch_list().await.unwrap();
        let before = h.controller.state();

        h.backend
            .fail_next(Op::Delete, BackendError::Transport("offline".to_string()));
        assert!(h.controller.delete_item(id).await.is_err());

        assert_eq!(h.controller.state(), before);
        assert_eq!(h.prompts.lock().unwrap().len(), 1);
        assert_eq!(h.controller.refresh_toggle().generation(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_clears_after_ttl() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);

        h.controller
            .create_item(ProjectDraft::new("A", "B"), &UserId::new("u1"))
            .await
            .unwrap();
        assert_eq!(h.controller.state().notice.as_deref(), Some(NOTICE_ADDED));

        tokio::time::sleep(Duration::from_millis(2999)).await;
        assert_eq!(h.controller.state().notice.as_deref(), Some(NOTICE_ADDED));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.controller.state().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_earlier_timer_clears_later_notice() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let id = h.backend.seed("u1", "Garden", "");

        h.controller
            .create_item(ProjectDraft::new("A", "B"), &UserId::new("u1"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(1000)).await;

        h.controller
            .update_item(id, patch("Garden 2", ""))
            .await
            .unwrap();
        assert_eq!(h.controller.state().notice.as_deref(), Some(NOTICE_UPDATED));

        tokio::time::sleep(Duration::from_millis(1999)).await;
        assert_eq!(h.controller.state().notice.as_deref(), Some(NOTICE_UPDATED));

        // Only 2 s after the update, the first timer wipes its message.
        tokio::time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.controller.state().notice, None);

        tokio::time::sleep(Duration::from_millis(1000)).await;
        assert_eq!(h.controller.state().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_notice_ttl_from_config() {
        let h = harness(MemoryBackend::new().with_session("u1"), true);
        let controller = h
            .controller
            .clone()
            .with_config(&ClientConfig::default().with_notice_ttl(Duration::from_millis(500)));

        controller
            .create_item(ProjectDraft::new("A", ""), &UserId::new("u1"))
            .await
            .unwrap();
        tokio::time::sleep(Duration::from_millis(501)).await;
        assert_eq!(controller.state().notice, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_racing_writes_end_with_last_reload() {
        local(async {
            let h = harness(MemoryBackend::new().with_session("u1"), true);
            let a = h.backend.seed("u1", "A", "");
            let b = h.backend.seed("u1", "B", "");
            h.start_driver();
            h.controller.settled().await;

            let (deleted, updated) = tokio::join!(
                h.controller.delete_item(a),
                h.controller.update_item(b, patch("B2", "")),
            );
            assert_eq!(deleted.unwrap(), DeleteOutcome::Deleted);
            updated.unwrap();
            h.controller.settled().await;

            assert_eq!(h.controller.refresh_toggle().generation(), 2);
            assert_eq!(h.controller.state().projects, h.owned_rows("u1"));
        })
        .await;
    }
}
