//! # Project rows
//!
//! Mirrors the `Projects` table. Column names on the wire are the table's own
//! (`id_project`, `id_user`, ...); the Rust field names describe what they hold.
//!
//! - [`Project`]: a full row as returned by a select.
//! - [`NewProject`]: the insert payload; id and `created_at` are assigned by the
//!   backend.
//! - [`ProjectPatch`]: the update payload; only title and description change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::UserId;

/// Backend-assigned unique id of a project row.
pub type ProjectId = i64;

/// A project row owned by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(rename = "id_project")]
    pub id: ProjectId,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "id_user")]
    pub owner: UserId,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Project {
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }
}

/// The column is nullable; a null description reads as empty.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Insert payload for a new project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewProject {
    pub title: String,
    pub description: String,
    #[serde(rename = "id_user")]
    pub owner: UserId,
}

/// Update payload applied to a single project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectPatch {
    pub title: String,
    pub description: String,
}
