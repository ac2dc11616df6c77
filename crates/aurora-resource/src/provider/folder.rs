//! Provider over a loose-file directory tree

use crate::error::Result;
use crate::id::ResourceId;
use crate::provider::ResourceProvider;
use aurora_formats::ResourceType;
use bytes::Bytes;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Serves resources out of a directory tree walked once at construction.
/// File contents are read lazily per call; caching sits above, in the
/// resolver.
pub struct FolderProvider {
    root: PathBuf,
    files: HashMap<ResourceId, PathBuf>,
}

impl FolderProvider {
    /// Walk `root` depth-first. Entries within each directory are visited
    /// in lexicographic name order, so when two files map to the same
    /// (name, type) the last one encountered wins deterministically.
    pub fn open(root: &Path) -> Result<Self> {
        let mut files = HashMap::new();
        walk(root, &mut files)?;
        info!("Indexed folder {:?}: {} resources", root, files.len());
        Ok(Self {
            root: root.to_path_buf(),
            files,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

fn walk(dir: &Path, files: &mut HashMap<ResourceId, PathBuf>) -> Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?
        .collect::<std::io::Result<Vec<_>>>()?
        .into_iter()
        .map(|e| e.path())
        .collect();
    entries.sort();

    for path in entries {
        if path.is_dir() {
            walk(&path, files)?;
            continue;
        }
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let Some(res_type) = ResourceType::from_extension(&ext.to_lowercase()) else {
            debug!("Skipping unrecognized extension: {:?}", path);
            continue;
        };
        files.insert(ResourceId::new(stem, res_type), path);
    }
    Ok(())
}

impl ResourceProvider for FolderProvider {
    fn find_resource_data(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        let Some(path) = self.files.get(id) else {
            return Ok(None);
        };
        Ok(Some(Bytes::from(fs::read(path)?)))
    }

    fn resource_ids(&self) -> Vec<ResourceId> {
        self.files.keys().cloned().collect()
    }
}
