use std::sync::Arc;

use api::{BackendConfig, RestBackend};
use dioxus::prelude::*;
use sync::ClientConfig;

use ui::AuthProvider;
use views::{Auth, Gate, NotFound, Projects};

mod views;

const CLIENT_CONFIG: &str = include_str!("../projects.toml");

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[layout(Gate)]
        #[route("/auth")]
        Auth {},
        #[route("/projects")]
        Projects {},
        #[route("/:..segments")]
        NotFound { segments: Vec<String> },
}

impl From<sync::Route> for Route {
    fn from(route: sync::Route) -> Self {
        match route {
            sync::Route::Auth => Route::Auth {},
            sync::Route::Projects => Route::Projects {},
        }
    }
}

fn main() {
    dioxus::logger::initialize_default();
    dioxus::launch(App);
}

#[component]
fn App() -> Element {
    // One backend handle for the lifetime of the app
    let configured = use_hook(|| match BackendConfig::from_env() {
        Ok(config) => {
            tracing::info!(url = %config.url, table = %config.table, "backend configured");
            provide_context(Arc::new(RestBackend::new(config)));
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot start without a backend");
            Err(e.to_string())
        }
    });

    use_context_provider(|| ClientConfig::load(CLIENT_CONFIG));

    if let Err(message) = configured {
        return rsx! {
            p { class: "config-error", "{message}" }
        };
    }

    rsx! {
        style { {STYLE} }

        AuthProvider {
            Router::<Route> {}
        }
    }
}

const STYLE: &str = r#"
body {
    font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Helvetica, Arial, sans-serif;
    color: #37352f;
    margin: 2rem;
}

.confirmation-message {
    color: #0f7b3f;
}

.modal {
    position: fixed;
    inset: 0;
    display: flex;
    align-items: center;
    justify-content: center;
    background: rgba(0, 0, 0, 0.3);
}

.modal .project-form {
    background: #ffffff;
    padding: 1.5rem;
    border-radius: 4px;
}

.form-field {
    display: flex;
    flex-direction: column;
    margin-bottom: 0.75rem;
}

tr.completed {
    color: #787774;
}

.auth-error,
.config-error {
    color: #b42318;
}
"#;
