//! Session gate around every route.

use dioxus::prelude::*;
use sync::{gate, RouteOutcome, View};
use ui::use_auth;

use crate::Route;

/// Layout that holds back all content while the session loads, applies the
/// session controller's redirects, and keeps signed-out users on `/auth`.
#[component]
pub fn Gate() -> Element {
    let auth = use_auth();
    let route = use_route::<Route>();
    let nav = use_navigator();
    let mut redirect = auth.redirect;
    let session = auth.state;

    use_effect(move || {
        if let Some(target) = redirect() {
            redirect.set(None);
            nav.replace(Route::from(target));
        }
    });

    // Re-run when either the path or the session changes
    let path = route.to_string();
    use_effect(use_reactive!(|path| {
        if let RouteOutcome::Redirect(target) = gate(&path, &session.read()) {
            nav.replace(Route::from(target));
        }
    }));

    let outcome = gate(&path, &session.read());
    match outcome {
        RouteOutcome::Render(View::Loading) => rsx! {
            div { class: "loading", "Loading..." }
        },
        RouteOutcome::Render(_) => rsx! {
            Outlet::<Route> {}
        },
        RouteOutcome::Redirect(_) => rsx! {},
    }
}
