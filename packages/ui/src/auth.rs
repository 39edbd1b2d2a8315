//! Authentication context and hooks for the UI.

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use dioxus::prelude::*;
use sync::{Navigator, Route, SessionController, SessionGuard, SessionState, SyncError};
use tokio::sync::mpsc;

use crate::{use_backend, AppBackend};

/// Hands controller redirects over to the UI task; the router applies them.
struct ChannelNavigator {
    tx: mpsc::UnboundedSender<Route>,
}

impl Navigator for ChannelNavigator {
    fn navigate(&self, route: Route) {
        if self.tx.send(route).is_err() {
            tracing::debug!(?route, "redirect dropped, provider unmounted");
        }
    }
}

/// Session state plus the controller behind it.
#[derive(Clone)]
pub struct AuthContext {
    pub state: Signal<SessionState>,
    /// Redirect requested by the session controller and not yet applied.
    pub redirect: Signal<Option<Route>>,
    controller: SessionController<AppBackend, ChannelNavigator>,
}

impl AuthContext {
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(), SyncError> {
        self.controller.sign_in(email, password).await
    }

    pub async fn sign_out(&self) -> Result<(), SyncError> {
        self.controller.sign_out().await
    }
}

/// Get the authentication context.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
}

/// Provider component that owns the session controller.
/// Wrap the router with this component.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let backend = use_backend();
    let mut state = use_signal(SessionState::default);
    let mut redirect = use_signal(|| None::<Route>);
    let guard = use_hook(|| Rc::new(RefCell::new(None::<SessionGuard>)));

    let context = use_hook(move || {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let controller = SessionController::new(backend, Arc::new(ChannelNavigator { tx }));
        spawn(async move {
            while let Some(route) = rx.recv().await {
                redirect.set(Some(route));
            }
        });
        AuthContext {
            state,
            redirect,
            controller,
        }
    });

    // Mirror the controller into the signal
    let controller = context.controller.clone();
    use_future(move || {
        let mut rx = controller.watch();
        async move {
            loop {
                let current = rx.borrow_and_update().clone();
                state.set(current);
                if rx.changed().await.is_err() {
                    break;
                }
            }
        }
    });

    // Fetch the session on mount, then keep the subscription until unmount
    let controller = context.controller.clone();
    let slot = guard.clone();
    use_future(move || {
        let controller = controller.clone();
        let slot = slot.clone();
        async move {
            let mounted = controller.mount().await;
            *slot.borrow_mut() = Some(mounted);
        }
    });

    use_drop(move || {
        if let Some(mounted) = guard.borrow_mut().take() {
            mounted.teardown();
        }
    });

    use_context_provider(|| context);

    rsx! {
        {children}
    }
}

/// Email and password sign-in form.
#[component]
pub fn AuthForm() -> Element {
    let auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error = use_signal(|| None::<String>);
    let mut pending = use_signal(|| false);

    let onclick = move |_| {
        let auth = auth.clone();
        async move {
            pending.set(true);
            match auth.sign_in(&email(), &password()).await {
                Ok(()) => error.set(None),
                Err(e) => error.set(Some(e.to_string())),
            }
            pending.set(false);
        }
    };

    rsx! {
        div {
            class: "auth-form",
            h2 { "Sign in" }

            div {
                class: "form-field",
                label { r#for: "auth-email", "Email" }
                input {
                    id: "auth-email",
                    r#type: "email",
                    value: email(),
                    oninput: move |evt: FormEvent| email.set(evt.value()),
                }
            }

            div {
                class: "form-field",
                label { r#for: "auth-password", "Password" }
                input {
                    id: "auth-password",
                    r#type: "password",
                    value: password(),
                    oninput: move |evt: FormEvent| password.set(evt.value()),
                }
            }

            if let Some(message) = error() {
                p { class: "auth-error", "{message}" }
            }

            button {
                class: "primary",
                disabled: pending(),
                onclick: onclick,
                if pending() {
                    "Signing in..."
                } else {
                    "Sign in"
                }
            }
        }
    }
}

/// Button to sign the current user out.
#[component]
pub fn LogoutButton(
    #[props(default = "Logout".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let auth = use_auth();

    let onclick = move |_| {
        let auth = auth.clone();
        async move {
            // The null session arrives through the subscription; the gate
            // takes the user to /auth.
            let _ = auth.sign_out().await;
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
