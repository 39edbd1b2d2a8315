use dioxus::prelude::*;

/// Any unmatched path. The gate redirects before this renders.
#[component]
pub fn NotFound(segments: Vec<String>) -> Element {
    tracing::debug!(path = %segments.join("/"), "unmatched path");
    rsx! {}
}
