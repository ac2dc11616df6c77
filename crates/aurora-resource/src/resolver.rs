//! Override-priority resolver
//!
//! Holds the ordered provider list and the byte-level cache every other
//! subsystem queries through. Two tiers: transient providers (per-module
//! bundles, swapped at module load) are searched before the global list.
//! Within a tier, priority is registration order and the first match wins.

use crate::error::Result;
use crate::id::ResourceId;
use crate::provider::ResourceProvider;
use bytes::Bytes;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::{debug, trace};

/// The single high-level query surface over all registered providers.
///
/// The cache grows monotonically: once an id resolves, the same buffer is
/// returned for the rest of the session (or until [`clear`](Self::clear)).
/// Misses are not memoized, since module loads change what exists.
///
/// Provider registration is a startup-phase operation; registering while
/// other threads are already resolving is a programming error and is not
/// checked at runtime.
#[derive(Default)]
pub struct Resources {
    providers: RwLock<Vec<Arc<dyn ResourceProvider>>>,
    transient: RwLock<Vec<Arc<dyn ResourceProvider>>>,
    cache: DashMap<ResourceId, Bytes>,
}

impl Resources {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider at the lowest priority so far. Earlier
    /// registrations win conflicts.
    pub fn add_provider(&self, provider: Arc<dyn ResourceProvider>) {
        self.providers.write().push(provider);
    }

    /// Register a transient provider, searched before every global one.
    pub fn add_transient_provider(&self, provider: Arc<dyn ResourceProvider>) {
        self.transient.write().push(provider);
    }

    /// Drop all transient providers and the byte cache; used when swapping
    /// the loaded module.
    pub fn clear_transient_providers(&self) {
        self.transient.write().clear();
        self.cache.clear();
    }

    /// Raw bytes for `id`, from cache or the highest-priority provider
    /// that has it. `Ok(None)` when no provider has the resource.
    pub fn get(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        if let Some(hit) = self.cache.get(id) {
            trace!("Cache hit: {}", id);
            return Ok(Some(hit.clone()));
        }

        for tier in [&self.transient, &self.providers] {
            let providers = tier.read();
            for provider in providers.iter() {
                if let Some(data) = provider.find_resource_data(id)? {
                    debug!("Resolved {} ({} bytes)", id, data.len());
                    self.cache.insert(id.clone(), data.clone());
                    return Ok(Some(data));
                }
            }
        }

        debug!("Not found: {}", id);
        Ok(None)
    }

    /// Drop the byte cache; providers stay registered.
    pub fn clear(&self) {
        self.cache.clear();
        debug!("Resource cache cleared");
    }

    /// Every identity served by any provider, transient tiers included.
    pub fn resource_ids(&self) -> Vec<ResourceId> {
        let mut ids = Vec::new();
        for tier in [&self.transient, &self.providers] {
            for provider in tier.read().iter() {
                ids.extend(provider.resource_ids());
            }
        }
        ids.sort_by(|a, b| (a.name(), a.res_type().code()).cmp(&(b.name(), b.res_type().code())));
        ids.dedup();
        ids
    }

    /// Number of cached byte buffers.
    pub fn cached_len(&self) -> usize {
        self.cache.len()
    }
}
