use dioxus::prelude::*;
use ui::ProjectList;

/// Project list page; only reachable through the gate with a session.
#[component]
pub fn Projects() -> Element {
    rsx! {
        ProjectList {}
    }
}
