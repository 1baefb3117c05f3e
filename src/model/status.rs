//! Best-effort per-item status values resolved after first paint

use std::collections::HashMap;
use std::hash::Hash;

use anyhow::Result;
use async_trait::async_trait;

/// A single-key status lookup, e.g. "is this album fully downloaded"
#[async_trait]
pub trait StatusProbe: Send + Sync + 'static {
    type Key: Clone + Eq + Hash + std::fmt::Debug + Send + Sync + 'static;
    type Value: Clone + Send + Sync + 'static;

    async fn probe(&self, key: &Self::Key) -> Result<Self::Value>;
}

/// Resolved status values. A missing key means "not yet known".
#[derive(Clone, Debug)]
pub struct StatusMap<K, V> {
    values: HashMap<K, V>,
}

impl<K, V> Default for StatusMap<K, V> {
    fn default() -> Self {
        Self { values: HashMap::new() }
    }
}

impl<K: Eq + Hash, V> StatusMap<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.values.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.values.contains_key(key)
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.values.insert(key, value);
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

impl<K: Eq + Hash> StatusMap<K, bool> {
    /// Absent and `false` read the same for display
    pub fn is_set(&self, key: &K) -> bool {
        self.values.get(key).copied().unwrap_or(false)
    }
}
