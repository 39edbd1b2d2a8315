use dioxus::prelude::*;
use sync::{DraftField, ProjectDraft};

/// Title/description form used for both creating and editing a project.
#[component]
pub fn ProjectForm(
    heading: String,
    submit_label: String,
    draft: ProjectDraft,
    on_change: EventHandler<(DraftField, String)>,
    on_submit: EventHandler<()>,
    on_cancel: Option<EventHandler<()>>,
) -> Element {
    rsx! {
        div {
            class: "project-form",
            h2 { "{heading}" }

            div {
                class: "form-field",
                label { "Title:" }
                input {
                    r#type: "text",
                    name: "title",
                    value: draft.title.clone(),
                    oninput: move |evt: FormEvent| on_change.call((DraftField::Title, evt.value())),
                }
            }

            div {
                class: "form-field",
                label { "Description:" }
                textarea {
                    name: "description",
                    value: draft.description.clone(),
                    oninput: move |evt: FormEvent| on_change.call((DraftField::Description, evt.value())),
                }
            }

            div {
                class: "form-actions",
                button {
                    class: "primary",
                    onclick: move |_| on_submit.call(()),
                    "{submit_label}"
                }
                if let Some(on_cancel) = on_cancel {
                    button {
                        class: "secondary",
                        onclick: move |_| on_cancel.call(()),
                        "Cancel"
                    }
                }
            }
        }
    }
}
