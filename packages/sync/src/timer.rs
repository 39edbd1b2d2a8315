//! Fire-and-forget delayed tasks.

use std::time::Duration;

/// Runs a task once after a delay. Scheduled tasks cannot be cancelled.
pub trait Timer: Send + Sync {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>);
}

/// [`Timer`] backed by the ambient tokio runtime. Must be used from within one.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioTimer;

#[cfg(not(target_arch = "wasm32"))]
impl Timer for TokioTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task();
        });
    }
}
