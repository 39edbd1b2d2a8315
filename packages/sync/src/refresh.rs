//! Edge-triggered refetch signal.

use std::sync::Arc;

use tokio::sync::watch;

/// Generation counter whose every change asks for a full reload of the list.
///
/// Only the change matters, never the value: a reader compares the generation
/// it last loaded against the current one.
#[derive(Debug, Clone)]
pub struct RefreshToggle {
    generation: Arc<watch::Sender<u64>>,
}

impl RefreshToggle {
    pub fn new() -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            generation: Arc::new(generation),
        }
    }

    /// Request a reload. Returns the new generation.
    pub fn flip(&self) -> u64 {
        let mut next = 0;
        self.generation.send_modify(|generation| {
            *generation += 1;
            next = *generation;
        });
        next
    }

    pub fn generation(&self) -> u64 {
        *self.generation.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}

impl Default for RefreshToggle {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_flip_wakes_subscriber() {
        let toggle = RefreshToggle::new();
        let mut rx = toggle.subscribe();
        assert!(!rx.has_changed().unwrap());

        assert_eq!(toggle.flip(), 1);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 1);

        // Two flips before the reader looks collapse into one change.
        toggle.flip();
        toggle.flip();
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), 3);
        assert!(!rx.has_changed().unwrap());
    }
}
