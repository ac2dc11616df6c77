//! KEY index file reader
//!
//! A KEY file is the index half of the two-file indexed-archive scheme: it
//! lists the sibling BIF data archives and maps each logical resource to an
//! (archive index, intra-archive index) pair packed into one u32.

use crate::cursor::BinaryCursor;
use crate::error::Result;
use crate::types::ResourceType;
use byteorder::LittleEndian as LE;
use std::collections::HashMap;
use std::path::Path;
use tracing::debug;

const SIGNATURE: &str = "KEY V1  ";

/// Decode the packed composite id from a KEY table entry.
///
/// The top 12 bits select the archive, the bottom 20 bits the resource
/// within it. This bit layout is fixed by the wire format; keep this
/// function the single point of truth for it.
pub fn decode_packed_id(id: u32) -> (u32, u32) {
    (id >> 20, id & 0xF_FFFF)
}

/// Location of one resource as recorded in the KEY table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyLocation {
    /// Index into the KEY file's archive list.
    pub archive_idx: u32,
    /// Index into the archive's own resource table.
    pub resource_idx: u32,
}

/// One entry of the KEY file's archive list.
#[derive(Debug, Clone)]
pub struct KeyArchiveEntry {
    /// Declared size of the data archive in bytes.
    pub file_size: u32,
    /// Path of the data archive relative to the game root, forward slashes.
    pub filename: String,
}

/// Parsed KEY index file.
pub struct KeyFile {
    archives: Vec<KeyArchiveEntry>,
    keys: HashMap<(String, ResourceType), KeyLocation>,
}

impl KeyFile {
    /// Parse a KEY file from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cursor = BinaryCursor::open(path)?;
        let key = Self::read(&mut cursor)?;
        debug!(
            "Parsed KEY {:?}: {} archives, {} keys",
            path,
            key.archives.len(),
            key.keys.len()
        );
        Ok(key)
    }

    /// Parse a KEY file from an open cursor.
    pub fn read<R: std::io::Read + std::io::Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.check_signature(SIGNATURE)?;

        let archive_count = cursor.read_u32::<LE>()?;
        let key_count = cursor.read_u32::<LE>()?;
        let file_table_off = cursor.read_u32::<LE>()?;
        let key_table_off = cursor.read_u32::<LE>()?;

        cursor.seek(u64::from(file_table_off))?;
        let mut archives = Vec::with_capacity(archive_count as usize);
        for _ in 0..archive_count {
            let file_size = cursor.read_u32::<LE>()?;
            let filename_off = cursor.read_u32::<LE>()?;
            let filename_len = cursor.read_u16::<LE>()?;
            cursor.ignore(2)?; // drives bitmask, unused

            let raw = cursor.read_string_at(u64::from(filename_off), filename_len as usize)?;
            let filename = raw.replace('\\', "/");
            archives.push(KeyArchiveEntry {
                file_size,
                filename,
            });
        }

        cursor.seek(u64::from(key_table_off))?;
        let mut keys = HashMap::with_capacity(key_count as usize);
        for _ in 0..key_count {
            let name = cursor.read_string(16)?.to_lowercase();
            let type_code = cursor.read_u16::<LE>()?;
            let packed_id = cursor.read_u32::<LE>()?;

            let (archive_idx, resource_idx) = decode_packed_id(packed_id);
            // Type codes outside the canonical table are skipped, same as
            // unrecognized loose-file extensions.
            if let Some(res_type) = ResourceType::from_code(type_code) {
                keys.insert(
                    (name, res_type),
                    KeyLocation {
                        archive_idx,
                        resource_idx,
                    },
                );
            }
        }

        Ok(Self { archives, keys })
    }

    /// Look up the packed location of a resource, lower-case name.
    pub fn find(&self, name: &str, res_type: ResourceType) -> Option<KeyLocation> {
        self.keys.get(&(name.to_lowercase(), res_type)).copied()
    }

    /// Relative path of the data archive at `archive_idx`.
    pub fn archive_filename(&self, archive_idx: u32) -> Option<&str> {
        self.archives
            .get(archive_idx as usize)
            .map(|e| e.filename.as_str())
    }

    /// All archives listed by this index.
    pub fn archives(&self) -> &[KeyArchiveEntry] {
        &self.archives
    }

    /// Iterate all (name, type, location) keys.
    pub fn keys(&self) -> impl Iterator<Item = (&str, ResourceType, KeyLocation)> {
        self.keys
            .iter()
            .map(|((name, ty), loc)| (name.as_str(), *ty, *loc))
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packed_id_bit_layout() {
        assert_eq!(decode_packed_id(0x0020_0005), (2, 5));
        assert_eq!(decode_packed_id(0), (0, 0));
        assert_eq!(decode_packed_id(0xFFF0_0000), (0xFFF, 0));
        assert_eq!(decode_packed_id(0x000F_FFFF), (0, 0xF_FFFF));
    }
}
