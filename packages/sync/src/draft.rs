//! Uncommitted form input.

use api::{Project, ProjectId, ProjectPatch};

/// Title and description as typed into a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
}

/// Which input of a draft changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Title,
    Description,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn set(&mut self, field: DraftField, value: impl Into<String>) {
        match field {
            DraftField::Title => self.title = value.into(),
            DraftField::Description => self.description = value.into(),
        }
    }
}

impl From<ProjectDraft> for ProjectPatch {
    fn from(draft: ProjectDraft) -> Self {
        ProjectPatch {
            title: draft.title,
            description: draft.description,
        }
    }
}

impl From<&Project> for ProjectDraft {
    fn from(project: &Project) -> Self {
        Self::new(project.title.clone(), project.description.clone())
    }
}

/// The edit modal: which project, and the pending changes to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    pub id: ProjectId,
    pub draft: ProjectDraft,
}
