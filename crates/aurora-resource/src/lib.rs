//! Layered virtual filesystem for Aurora-engine game resources
//!
//! Logical resource requests (a short name plus a typed extension) are
//! resolved to raw byte payloads sourced from KEY+BIF indexed archives,
//! ERF/MOD and RIM bundles, loose-file folders, and an in-memory override
//! store, layered in a fixed precedence order. A grow-only byte cache sits
//! in front of the providers; memoizing decode caches sit on top of that.
//!
//! ```no_run
//! use aurora_resource::{GameVersion, ResourceId, ResourceLayout};
//! use aurora_formats::ResourceType;
//!
//! # fn main() -> aurora_resource::Result<()> {
//! let layout = ResourceLayout::index(GameVersion::Kotor, "/games/kotor".as_ref())?;
//! layout.load_module("danm13")?;
//!
//! let id = ResourceId::new("c_bandit01", ResourceType::Utc);
//! if let Some(data) = layout.resources().get(&id)? {
//!     println!("{}: {} bytes", id, data.len());
//! }
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod catalog;
pub mod error;
pub mod id;
pub mod layout;
pub mod provider;
pub mod resolver;

pub use cache::MemoCache;
pub use catalog::{Catalog, Strings};
pub use error::{ResourceError, Result};
pub use id::ResourceId;
pub use layout::{GameVersion, ResourceLayout};
pub use provider::{
    BundleProvider, FolderProvider, KeyBifProvider, MemoryProvider, ResourceProvider,
};
pub use resolver::Resources;
