//! Data models shared by the backend and the controllers.

mod project;
mod session;

pub use project::{NewProject, Project, ProjectId, ProjectPatch};
pub use session::{Identity, Session, SessionEvent, UserId};
