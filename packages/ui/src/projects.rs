//! The project list view.

use std::sync::Arc;

use dioxus::prelude::*;
use sync::{ClientConfig, DraftField, ListState, ProjectListController};

use crate::{app_timer, use_backend, BrowserConfirm, LogoutButton, ProjectForm};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Table of the user's projects with the creation form and the edit modal.
#[component]
pub fn ProjectList() -> Element {
    let backend = use_backend();
    let config = try_use_context::<ClientConfig>().unwrap_or_default();
    let controller = use_hook(move || {
        ProjectListController::new(backend, Arc::new(BrowserConfirm), app_timer())
            .with_config(&config)
    });
    let mut list = use_signal(ListState::default);

    // Initial fetch, then a refetch on every refresh flip
    let driver = controller.clone();
    use_future(move || {
        let driver = driver.clone();
        async move { driver.run().await }
    });

    let mirror = controller.clone();
    use_future(move || {
        let mut rx = mirror.watch();
        async move {
            loop {
                let current = rx.borrow_and_update().clone();
                list.set(current);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    let state = list();
    if state.is_loading() {
        return rsx! {
            p { "Loading projects..." }
        };
    }

    let toggle_form = {
        let controller = controller.clone();
        move |_| controller.toggle_new_form()
    };

    let change_new = {
        let controller = controller.clone();
        move |(field, value): (DraftField, String)| controller.set_new_field(field, value)
    };

    let submit_new = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn(async move {
                // Failures are logged by the controller and otherwise silent.
                let _ = controller.submit_new_project().await;
            });
        }
    };

    let change_edit = {
        let controller = controller.clone();
        move |(field, value): (DraftField, String)| controller.set_edit_field(field, value)
    };

    let submit_edit = {
        let controller = controller.clone();
        move |_| {
            let controller = controller.clone();
            spawn(async move {
                let _ = controller.submit_edit().await;
            });
        }
    };

    let cancel_edit = {
        let controller = controller.clone();
        move |_| controller.cancel_edit()
    };

    let rows = state.projects.iter().map(|project| {
        let edit = {
            let controller = controller.clone();
            let project = project.clone();
            move |_| controller.begin_edit(&project)
        };
        let delete = {
            let controller = controller.clone();
            let id = project.id;
            move |_| {
                let controller = controller.clone();
                async move {
                    let _ = controller.delete_item(id).await;
                }
            }
        };
        let created = project.created_at.format(DATE_FORMAT).to_string();
        let completed = project
            .completed_at
            .map(|at| at.format(DATE_FORMAT).to_string())
            .unwrap_or_else(|| "Not completed".to_string());

        rsx! {
            tr {
                key: "{project.id}",
                class: if project.is_completed() { "completed" },
                td { "{project.title}" }
                td { "{project.description}" }
                td { "{created}" }
                td { "{completed}" }
                td {
                    button { onclick: edit, "Edit" }
                    button { onclick: delete, "Delete" }
                }
            }
        }
    });

    rsx! {
        div {
            class: "projects",
            div {
                class: "projects-header",
                h1 { "Projects" }
                LogoutButton { class: "secondary" }
            }

            if let Some(notice) = state.notice.clone() {
                p { class: "confirmation-message", "{notice}" }
            }

            button { onclick: toggle_form, "New Project" }

            if state.creating {
                ProjectForm {
                    heading: "Add New Project",
                    submit_label: "Add Project",
                    draft: state.new_draft.clone(),
                    on_change: change_new,
                    on_submit: submit_new,
                }
            }

            table {
                thead {
                    tr {
                        th { "Title" }
                        th { "Description" }
                        th { "Created At" }
                        th { "Completed At" }
                        th { "Actions" }
                    }
                }
                tbody { {rows} }
            }

            if let Some(edit) = state.editing.clone() {
                div {
                    class: "modal",
                    ProjectForm {
                        heading: "Edit Project",
                        submit_label: "Save",
                        draft: edit.draft,
                        on_change: change_edit,
                        on_submit: submit_edit,
                        on_cancel: cancel_edit,
                    }
                }
            }
        }
    }
}
