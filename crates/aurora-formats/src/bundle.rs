//! Self-contained bundle archive reader (ERF/MOD and RIM)
//!
//! Both variants keep the index and the payloads in one file. ERF and MOD
//! are byte-identical apart from the signature; RIM folds the key and
//! resource tables into one combined record. Per-module and per-area data
//! ships as bundles, so the lookup table is held fully in memory and
//! indexed by (name, type).

use crate::cursor::BinaryCursor;
use crate::error::{FormatError, Result};
use crate::types::ResourceType;
use byteorder::LittleEndian as LE;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use tracing::debug;

const ERF_SIGNATURE: &str = "ERF V1.0";
const MOD_SIGNATURE: &str = "MOD V1.0";
const RIM_SIGNATURE: &str = "RIM V1.0";

/// Which bundle layout a file carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BundleVariant {
    Erf,
    Mod,
    Rim,
}

/// Byte extent of one resource inside the bundle file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BundleEntry {
    pub offset: u32,
    pub size: u32,
}

/// Parsed bundle archive. The table lives in memory; payload reads reopen
/// the file per call.
#[derive(Debug)]
pub struct BundleFile {
    path: PathBuf,
    variant: BundleVariant,
    entries: HashMap<(String, ResourceType), BundleEntry>,
}

impl BundleFile {
    /// Open a bundle, dispatching on its signature.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cursor = BinaryCursor::open(path)?;

        let signature = cursor.read_string_at(0, 8)?;
        let variant = match signature.as_str() {
            ERF_SIGNATURE => BundleVariant::Erf,
            MOD_SIGNATURE => BundleVariant::Mod,
            RIM_SIGNATURE => BundleVariant::Rim,
            _ => {
                return Err(FormatError::SignatureMismatch {
                    expected: format!("{ERF_SIGNATURE} | {MOD_SIGNATURE} | {RIM_SIGNATURE}"),
                    actual: signature,
                });
            }
        };

        let entries = match variant {
            BundleVariant::Erf | BundleVariant::Mod => Self::read_erf(&mut cursor, variant)?,
            BundleVariant::Rim => Self::read_rim(&mut cursor)?,
        };

        debug!("Parsed {variant:?} bundle {path:?}: {} resources", entries.len());

        Ok(Self {
            path: path.to_path_buf(),
            variant,
            entries,
        })
    }

    fn read_erf(
        cursor: &mut BinaryCursor<BufReader<File>>,
        variant: BundleVariant,
    ) -> Result<HashMap<(String, ResourceType), BundleEntry>> {
        let signature = match variant {
            BundleVariant::Mod => MOD_SIGNATURE,
            _ => ERF_SIGNATURE,
        };
        cursor.seek(0)?;
        cursor.check_signature(signature)?;
        cursor.ignore(8)?; // version build + localized string count

        let entry_count = cursor.read_u32::<LE>()?;
        cursor.ignore(4)?; // localized string table offset
        let off_keys = cursor.read_u32::<LE>()?;
        let off_resources = cursor.read_u32::<LE>()?;

        // Key table: name + type; resource table: offset + size. The two
        // are aligned by index.
        cursor.seek(u64::from(off_keys))?;
        let mut keys = Vec::with_capacity(entry_count as usize);
        for _ in 0..entry_count {
            let name = cursor.read_string(16)?.to_lowercase();
            let _res_id = cursor.read_u32::<LE>()?;
            let type_code = cursor.read_u16::<LE>()?;
            cursor.ignore(2)?;
            keys.push((name, ResourceType::from_code(type_code)));
        }

        cursor.seek(u64::from(off_resources))?;
        let mut entries = HashMap::with_capacity(entry_count as usize);
        for (name, res_type) in keys {
            let offset = cursor.read_u32::<LE>()?;
            let size = cursor.read_u32::<LE>()?;
            if let Some(res_type) = res_type {
                entries.insert((name, res_type), BundleEntry { offset, size });
            }
        }

        Ok(entries)
    }

    fn read_rim(
        cursor: &mut BinaryCursor<BufReader<File>>,
    ) -> Result<HashMap<(String, ResourceType), BundleEntry>> {
        cursor.seek(0)?;
        cursor.check_signature(RIM_SIGNATURE)?;
        cursor.ignore(4)?;

        let resource_count = cursor.read_u32::<LE>()?;
        let table_off = cursor.read_u32::<LE>()?;

        cursor.seek(u64::from(table_off))?;
        let mut entries = HashMap::with_capacity(resource_count as usize);
        for _ in 0..resource_count {
            let name = cursor.read_string(16)?.to_lowercase();
            let type_code = cursor.read_u16::<LE>()?;
            cursor.ignore(6)?;
            let offset = cursor.read_u32::<LE>()?;
            let size = cursor.read_u32::<LE>()?;
            if let Some(res_type) = ResourceType::from_code(type_code) {
                entries.insert((name, res_type), BundleEntry { offset, size });
            }
        }

        Ok(entries)
    }

    pub fn variant(&self) -> BundleVariant {
        self.variant
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up the extent of a resource, lower-case name.
    pub fn find(&self, name: &str, res_type: ResourceType) -> Option<BundleEntry> {
        self.entries.get(&(name.to_lowercase(), res_type)).copied()
    }

    /// Read the raw payload for a resource, `None` when absent.
    pub fn resource_data(&self, name: &str, res_type: ResourceType) -> Result<Option<Vec<u8>>> {
        let Some(entry) = self.find(name, res_type) else {
            return Ok(None);
        };

        let mut cursor = BinaryCursor::open(&self.path)?;
        cursor.seek(u64::from(entry.offset))?;
        Ok(Some(cursor.read_bytes(entry.size as usize)?))
    }

    /// Iterate all (name, type) identities in this bundle.
    pub fn entries(&self) -> impl Iterator<Item = (&str, ResourceType, BundleEntry)> {
        self.entries
            .iter()
            .map(|((name, ty), entry)| (name.as_str(), *ty, *entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
