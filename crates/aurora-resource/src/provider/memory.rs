//! In-process override store

use crate::error::Result;
use crate::id::ResourceId;
use crate::provider::ResourceProvider;
use bytes::Bytes;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::debug;

/// Mutable in-memory provider used to inject synthetic or patched
/// resources ahead of the file-backed providers. No persistence; lifetime
/// is bound to the owning resolver.
#[derive(Default)]
pub struct MemoryProvider {
    entries: RwLock<HashMap<ResourceId, Bytes>>,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a resource.
    pub fn add(&self, id: ResourceId, data: Bytes) {
        debug!("Memory override: {} ({} bytes)", id, data.len());
        self.entries.write().insert(id, data);
    }

    /// Drop every injected resource.
    pub fn clear(&self) {
        self.entries.write().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl ResourceProvider for MemoryProvider {
    fn find_resource_data(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        Ok(self.entries.read().get(id).cloned())
    }

    fn resource_ids(&self) -> Vec<ResourceId> {
        self.entries.read().keys().cloned().collect()
    }
}
