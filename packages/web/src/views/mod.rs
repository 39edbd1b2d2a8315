mod auth;
pub use auth::Auth;

mod gate;
pub use gate::Gate;

mod not_found;
pub use not_found::NotFound;

mod projects;
pub use projects::Projects;
