//! Resource providers
//!
//! A provider answers one question: "do you have bytes for this id?" Four
//! variants cover the container families; all are immutable after
//! construction except [`MemoryProvider`], which backs runtime overrides.

mod bundle;
mod folder;
mod keybif;
mod memory;

pub use bundle::BundleProvider;
pub use folder::FolderProvider;
pub use keybif::KeyBifProvider;
pub use memory::MemoryProvider;

use crate::error::Result;
use crate::id::ResourceId;
use bytes::Bytes;

/// Capability set shared by all provider variants.
pub trait ResourceProvider: Send + Sync {
    /// Raw bytes for `id`, or `None` when this provider does not have it.
    /// Absence is a normal outcome; errors mean the container itself is
    /// unreadable.
    fn find_resource_data(&self, id: &ResourceId) -> Result<Option<Bytes>>;

    /// Every identity this provider can serve.
    fn resource_ids(&self) -> Vec<ResourceId>;
}
