//! Shared baseline offset
//!
//! The sub-item alignment computed by the first reel to center itself. Every
//! reel of a pick session starts its animation from this offset so all reels
//! line up. It is written at most once and read many times.

use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct SharedBaseline {
    offset: Arc<watch::Sender<Option<f64>>>,
}

impl SharedBaseline {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(None);
        Self { offset: Arc::new(sender) }
    }

    /// Store `offset` unless a value is already set; returns whether it was stored
    ///
    /// When several reels offer in the same scheduler turn, whichever task runs
    /// first wins.
    pub fn offer(&self, offset: f64) -> bool {
        let stored = self.offset.send_if_modified(|current| {
            if current.is_some() {
                return false;
            }
            *current = Some(offset);
            true
        });

        if stored {
            debug!(offset = offset, "Baseline offset set");
        }
        stored
    }

    pub fn get(&self) -> Option<f64> {
        *self.offset.borrow()
    }

    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Resolve once the baseline has been set
    pub async fn wait(&self) -> f64 {
        let mut receiver = self.offset.subscribe();
        let value = match receiver.wait_for(Option::is_some).await {
            Ok(value) => *value,
            // The sender lives in `self`, so the channel cannot close while we wait
            Err(_) => None,
        };
        value.unwrap_or_default()
    }
}

impl Default for SharedBaseline {
    fn default() -> Self {
        Self::new()
    }
}
