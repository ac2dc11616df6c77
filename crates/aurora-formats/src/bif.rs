//! BIF data archive reader
//!
//! A BIF holds the payload half of the KEY+BIF scheme. Only the resource
//! table offset and record layout matter here; the intra-archive index
//! handed over from the KEY table is authoritative for lookups, the id
//! field stored in each record is not.

use crate::cursor::BinaryCursor;
use crate::error::{FormatError, Result};
use byteorder::LittleEndian as LE;
use std::path::{Path, PathBuf};
use tracing::trace;

const SIGNATURE: &str = "BIFFV1  ";

/// Fixed size of one variable-resource table record.
const RECORD_SIZE: u64 = 16;

/// One parsed BIF resource table record.
#[derive(Debug, Clone, Copy)]
pub struct BifResourceEntry {
    pub offset: u32,
    pub size: u32,
    pub type_code: u32,
}

/// Reader for one BIF data archive.
///
/// Holds only the path and header fields; each payload read reopens the
/// file so concurrent readers get independent handles.
#[derive(Debug)]
pub struct BifFile {
    path: PathBuf,
    var_res_count: u32,
    table_off: u32,
}

impl BifFile {
    /// Validate the header of a BIF file on disk.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cursor = BinaryCursor::open(path)?;
        cursor.check_signature(SIGNATURE)?;

        let var_res_count = cursor.read_u32::<LE>()?;
        let _fixed_res_count = cursor.read_u32::<LE>()?; // never shipped, ignored
        let table_off = cursor.read_u32::<LE>()?;

        let table_end = u64::from(table_off) + u64::from(var_res_count) * RECORD_SIZE;
        if table_end > cursor.len() {
            return Err(FormatError::MalformedTable {
                container: "BIF",
                reason: format!(
                    "resource table ends at {table_end} but archive is {} bytes",
                    cursor.len()
                ),
            });
        }

        Ok(Self {
            path: path.to_path_buf(),
            var_res_count,
            table_off,
        })
    }

    /// Number of variable resources in this archive.
    pub fn resource_count(&self) -> u32 {
        self.var_res_count
    }

    /// Read the table record for one intra-archive index.
    pub fn resource_entry(&self, index: u32) -> Result<BifResourceEntry> {
        if index >= self.var_res_count {
            return Err(FormatError::IndexOutOfRange {
                index,
                count: self.var_res_count,
            });
        }

        let mut cursor = BinaryCursor::open(&self.path)?;
        cursor.seek(u64::from(self.table_off) + u64::from(index) * RECORD_SIZE)?;
        let _id = cursor.read_u32::<LE>()?;
        let offset = cursor.read_u32::<LE>()?;
        let size = cursor.read_u32::<LE>()?;
        let type_code = cursor.read_u32::<LE>()?;

        Ok(BifResourceEntry {
            offset,
            size,
            type_code,
        })
    }

    /// Extract the raw payload for one intra-archive index.
    pub fn resource_data(&self, index: u32) -> Result<Vec<u8>> {
        let entry = self.resource_entry(index)?;
        trace!(
            "BIF {:?}: reading resource {} ({} bytes at {:#x})",
            self.path, index, entry.size, entry.offset
        );

        let mut cursor = BinaryCursor::open(&self.path)?;
        cursor.seek(u64::from(entry.offset))?;
        cursor.read_bytes(entry.size as usize)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
