//! Sign-in page.

use dioxus::prelude::*;
use ui::AuthForm;

#[component]
pub fn Auth() -> Element {
    rsx! {
        div {
            class: "auth-container",
            style: "display: flex; flex-direction: column; align-items: center; padding: 2rem;",
            h1 { "Projects" }
            AuthForm {}
        }
    }
}
