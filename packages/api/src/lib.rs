//! # API crate: the backend collaborator for the projects client
//!
//! Everything the client needs from the hosted backend lives behind two traits
//! defined here: [`AuthBackend`] (sessions and the current identity) and
//! [`ProjectTable`] (the `Projects` rows). The controllers in the `sync` crate
//! are generic over [`Backend`], so the same logic runs against the in-memory
//! backend in tests and the HTTP backend in the browser.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`backend`] |  | The collaborator traits and the cancellable [`Subscription`] handle |
//! | [`broadcast`] |  | Listener registry that fans session changes out to subscribers |
//! | [`error`] |  | [`BackendError`], the single failure type of every backend call |
//! | [`memory`] |  | [`MemoryBackend`], a complete in-process backend for tests and demos |
//! | [`models`] |  | `Session`, `Identity`, `Project` and the insert/patch rows |
//! | `config` | `remote` | [`BackendConfig`] read from the environment |
//! | `persist` | `remote` | [`SessionStore`]: where the HTTP backend keeps its session across reloads |
//! | `rest` | `remote` | [`RestBackend`], a `reqwest` client for a GoTrue + PostgREST service |
//!
//! ## Sharing
//!
//! A backend is constructed once at start-up and handed to both controllers as an
//! `Arc`. Neither controller ever builds its own client.

pub mod backend;
pub mod broadcast;
pub mod error;
pub mod memory;
pub mod models;

#[cfg(feature = "remote")]
mod config;
#[cfg(feature = "remote")]
mod persist;
#[cfg(feature = "remote")]
mod rest;

pub use backend::{AuthBackend, Backend, ProjectTable, SessionCallback, Subscription};
pub use broadcast::SessionBroadcaster;
pub use error::BackendError;
pub use memory::MemoryBackend;
pub use models::{
    Identity, NewProject, Project, ProjectId, ProjectPatch, Session, SessionEvent, UserId,
};

#[cfg(feature = "remote")]
pub use config::BackendConfig;
#[cfg(feature = "remote")]
pub use persist::{MemorySessionStore, SessionStore};
#[cfg(all(feature = "remote", target_arch = "wasm32"))]
pub use persist::LocalStorageSessionStore;
#[cfg(feature = "remote")]
pub use rest::RestBackend;
