//! Debounce gate between keystrokes and searches
//!
//! Each text change cancels the pending timer and starts a new one. Only the
//! last change within the quiet period comes out the other side. Text shorter
//! than the minimum length clears the results straight away.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::model::normalize_text;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GateEvent {
    /// Quiet period elapsed; search for this normalized text
    Search(String),
    /// Text fell below the minimum length
    Clear,
}

pub struct DebounceGate {
    delay: Duration,
    min_len: usize,
    tx: mpsc::UnboundedSender<GateEvent>,
    pending: Option<JoinHandle<()>>,
    generation: Arc<AtomicU64>,
}

impl DebounceGate {
    pub fn new(delay: Duration, min_len: usize) -> (Self, mpsc::UnboundedReceiver<GateEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let gate = Self {
            delay,
            min_len,
            tx,
            pending: None,
            generation: Arc::new(AtomicU64::new(0)),
        };
        (gate, rx)
    }

    pub fn on_text_changed(&mut self, text: &str) {
        self.cancel();

        let text = normalize_text(text);
        if text.chars().count() < self.min_len {
            let _ = self.tx.send(GateEvent::Clear);
            return;
        }

        let generation = self.generation.load(Ordering::SeqCst);
        let current = self.generation.clone();
        let tx = self.tx.clone();
        let delay = self.delay;

        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // An abort can lose the race with an elapsed timer
            if current.load(Ordering::SeqCst) == generation {
                tracing::debug!(query = %text, "Debounce elapsed");
                let _ = tx.send(GateEvent::Search(text));
            }
        }));
    }

    /// Drop the pending change, if any
    pub fn cancel(&mut self) {
        self.generation.fetch_add(1, Ordering::SeqCst);
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self) -> bool {
        self.pending.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for DebounceGate {
    fn drop(&mut self) {
        self.cancel();
    }
}
