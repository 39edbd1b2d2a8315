//! Blocking yes/no prompt used before destructive actions.

/// Asks the user to confirm; `true` means proceed.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> bool;
}

impl<F> Confirm for F
where
    F: Fn(&str) -> bool,
{
    fn confirm(&self, prompt: &str) -> bool {
        self(prompt)
    }
}

/// Prompt shown before a project is deleted.
pub fn delete_prompt(title: &str) -> String {
    format!("Are you sure you want to delete the project? \"{title}\"?")
}
