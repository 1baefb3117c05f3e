//! Status side-channel: resolves per-item status after results are shown
//!
//! Probes run in batches of bounded size, yielding between batches so the
//! event loop stays responsive. Failed lookups are logged and left absent;
//! they never surface to the user and never block rendering.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

use crate::model::{StatusMap, StatusProbe};

pub struct StatusSideChannel<P: StatusProbe> {
    probe: Arc<P>,
    statuses: Arc<RwLock<StatusMap<P::Key, P::Value>>>,
    concurrency: usize,
}

impl<P: StatusProbe> Clone for StatusSideChannel<P> {
    fn clone(&self) -> Self {
        Self {
            probe: self.probe.clone(),
            statuses: self.statuses.clone(),
            concurrency: self.concurrency,
        }
    }
}

impl<P: StatusProbe> StatusSideChannel<P> {
    pub fn new(probe: Arc<P>, concurrency: usize) -> Self {
        Self {
            probe,
            statuses: Arc::new(RwLock::new(StatusMap::new())),
            concurrency: concurrency.max(1),
        }
    }

    pub fn probe(&self) -> &Arc<P> {
        &self.probe
    }

    /// Probe every key without a known status. Returns what was resolved in
    /// this call; failed keys are missing from the result.
    pub async fn enrich(&self, keys: Vec<P::Key>) -> HashMap<P::Key, P::Value> {
        let pending: Vec<P::Key> = {
            let statuses = self.statuses.read().await;
            let mut seen = std::collections::HashSet::new();
            keys.into_iter()
                .filter(|key| !statuses.contains(key) && seen.insert(key.clone()))
                .collect()
        };

        let mut resolved = HashMap::new();
        if pending.is_empty() {
            return resolved;
        }

        tracing::debug!(count = pending.len(), concurrency = self.concurrency, "Enriching item status");

        for (i, batch) in pending.chunks(self.concurrency).enumerate() {
            if i > 0 {
                tokio::task::yield_now().await;
            }

            let results = join_all(batch.iter().map(|key| {
                let probe = self.probe.clone();
                async move { (key, probe.probe(key).await) }
            }))
            .await;

            let mut statuses = self.statuses.write().await;
            for (key, result) in results {
                match result {
                    Ok(value) => {
                        statuses.insert(key.clone(), value.clone());
                        resolved.insert(key.clone(), value);
                    }
                    Err(e) => {
                        tracing::warn!(key = ?key, error = %e, "Status probe failed");
                    }
                }
            }
        }

        resolved
    }

    /// Run `enrich` in the background
    pub fn spawn_enrich(&self, keys: Vec<P::Key>) -> JoinHandle<()> {
        let channel = self.clone();
        tokio::spawn(async move {
            channel.enrich(keys).await;
        })
    }

    #[cfg(test)]
    pub async fn get(&self, key: &P::Key) -> Option<P::Value> {
        self.statuses.read().await.get(key).cloned()
    }

    pub async fn snapshot(&self) -> StatusMap<P::Key, P::Value> {
        self.statuses.read().await.clone()
    }

    /// Forget every resolved status so the next enrich probes again
    pub async fn invalidate(&self) {
        self.statuses.write().await.clear();
    }
}
