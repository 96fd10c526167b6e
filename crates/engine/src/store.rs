//! Registry of live distributions with per-distribution serialized access.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};

use hongbao_core::DistributionId;

use crate::distribution::Distribution;
use crate::EngineError;

/// All distributions, keyed by content-derived id.
///
/// Each distribution sits behind its own mutex so claims against different
/// distributions proceed independently while claims against the same one
/// are serialized.
pub struct DistributionStore {
    inner: RwLock<HashMap<DistributionId, Arc<Mutex<Distribution>>>>,
}

impl DistributionStore {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Register a distribution under its id.
    pub fn insert(&self, dist: Distribution) -> Result<(), EngineError> {
        let mut map = self.inner.write().expect("store lock poisoned");
        match map.entry(dist.id) {
            Entry::Occupied(_) => Err(EngineError::DuplicateDistribution(hex::encode(dist.id))),
            Entry::Vacant(slot) => {
                slot.insert(Arc::new(Mutex::new(dist)));
                Ok(())
            }
        }
    }

    /// Handle to a distribution's lock.
    pub fn get(&self, id: &DistributionId) -> Result<Arc<Mutex<Distribution>>, EngineError> {
        let map = self.inner.read().expect("store lock poisoned");
        map.get(id)
            .cloned()
            .ok_or_else(|| EngineError::DistributionNotFound(hex::encode(id)))
    }

    pub(crate) fn remove(&self, id: &DistributionId) {
        let mut map = self.inner.write().expect("store lock poisoned");
        map.remove(id);
    }

    pub fn contains(&self, id: &DistributionId) -> bool {
        let map = self.inner.read().expect("store lock poisoned");
        map.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.inner.read().expect("store lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn ids(&self) -> Vec<DistributionId> {
        let map = self.inner.read().expect("store lock poisoned");
        map.keys().copied().collect()
    }
}

impl Default for DistributionStore {
    fn default() -> Self {
        Self::new()
    }
}
