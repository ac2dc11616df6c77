//! Provider over one ERF/MOD or RIM bundle

use crate::error::Result;
use crate::id::ResourceId;
use crate::provider::ResourceProvider;
use aurora_formats::BundleFile;
use bytes::Bytes;
use std::path::Path;

/// Serves resources out of a single bundle file. The table was parsed at
/// construction; payload reads reopen the file per call.
pub struct BundleProvider {
    bundle: BundleFile,
}

impl BundleProvider {
    /// Parse the bundle at `path`. Fails fast if the container is
    /// malformed; the whole archive is unusable in that case.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            bundle: BundleFile::open(path)?,
        })
    }

    pub fn bundle(&self) -> &BundleFile {
        &self.bundle
    }
}

impl ResourceProvider for BundleProvider {
    fn find_resource_data(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        let data = self.bundle.resource_data(id.name(), id.res_type())?;
        Ok(data.map(Bytes::from))
    }

    fn resource_ids(&self) -> Vec<ResourceId> {
        self.bundle
            .entries()
            .map(|(name, ty, _)| ResourceId::new(name, ty))
            .collect()
    }
}
