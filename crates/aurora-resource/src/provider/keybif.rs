//! Provider over one KEY index and its sibling BIF data archives

use crate::error::Result;
use crate::id::ResourceId;
use crate::provider::ResourceProvider;
use aurora_formats::{BifFile, KeyFile};
use bytes::Bytes;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Serves resources out of the two-file KEY+BIF scheme. The KEY table is
/// parsed at construction; each payload read reopens the matching BIF so
/// concurrent readers get independent handles.
pub struct KeyBifProvider {
    key: KeyFile,
    root: PathBuf,
}

impl KeyBifProvider {
    /// Parse the KEY file at `key_path`; BIF paths in its archive list are
    /// resolved relative to `root`.
    pub fn open(key_path: &Path, root: &Path) -> Result<Self> {
        Ok(Self {
            key: KeyFile::open(key_path)?,
            root: root.to_path_buf(),
        })
    }

    pub fn key(&self) -> &KeyFile {
        &self.key
    }
}

impl ResourceProvider for KeyBifProvider {
    fn find_resource_data(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        let Some(location) = self.key.find(id.name(), id.res_type()) else {
            return Ok(None);
        };
        let Some(filename) = self.key.archive_filename(location.archive_idx) else {
            warn!(
                "KEY entry {} points at archive {} beyond the file table",
                id, location.archive_idx
            );
            return Ok(None);
        };

        let bif = BifFile::open(&self.root.join(filename))?;
        Ok(Some(Bytes::from(bif.resource_data(location.resource_idx)?)))
    }

    fn resource_ids(&self) -> Vec<ResourceId> {
        self.key
            .keys()
            .map(|(name, ty, _)| ResourceId::new(name, ty))
            .collect()
    }
}
