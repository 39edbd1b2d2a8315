//! Browser bindings for the controller seams.

use std::sync::Arc;
#[cfg(target_arch = "wasm32")]
use std::time::Duration;

use sync::{Confirm, Timer};

/// `window.confirm()`; declines when no browser window is available.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserConfirm;

impl Confirm for BrowserConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        #[cfg(target_arch = "wasm32")]
        {
            web_sys::window()
                .and_then(|window| window.confirm_with_message(prompt).ok())
                .unwrap_or(false)
        }
        #[cfg(not(target_arch = "wasm32"))]
        {
            tracing::warn!(prompt, "no confirmation dialog available, declining");
            false
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone, Copy, Default)]
struct BrowserTimer;

#[cfg(target_arch = "wasm32")]
impl Timer for BrowserTimer {
    fn schedule(&self, delay: Duration, task: Box<dyn FnOnce() + Send>) {
        let millis = u32::try_from(delay.as_millis()).unwrap_or(u32::MAX);
        gloo_timers::callback::Timeout::new(millis, task).forget();
    }
}

/// The timer notices run on for this platform.
pub fn app_timer() -> Arc<dyn Timer> {
    #[cfg(target_arch = "wasm32")]
    {
        Arc::new(BrowserTimer)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        Arc::new(sync::TokioTimer)
    }
}
