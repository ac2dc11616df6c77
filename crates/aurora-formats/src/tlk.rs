//! Talk table (TLK) reader
//!
//! The talk table maps integer string references onto localized text plus
//! an optional voice-over sound resref. Entries are 40 bytes; the text
//! itself lives in a blob addressed relative to the header's entries
//! offset.

use crate::cursor::BinaryCursor;
use crate::error::Result;
use byteorder::LittleEndian as LE;
use std::path::Path;
use tracing::debug;

const SIGNATURE: &str = "TLK V3.0";

const FLAG_TEXT_PRESENT: u32 = 1;
const FLAG_SOUND_PRESENT: u32 = 2;

/// One talk table string.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TalkString {
    pub text: String,
    pub sound_resref: String,
}

/// Parsed talk table.
pub struct TalkTable {
    language_id: u32,
    strings: Vec<TalkString>,
}

impl TalkTable {
    /// Parse a talk table from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cursor = BinaryCursor::open(path)?;
        let table = Self::read(&mut cursor)?;
        debug!("Parsed TLK {:?}: {} strings", path, table.strings.len());
        Ok(table)
    }

    /// Parse a talk table from an open cursor.
    pub fn read<R: std::io::Read + std::io::Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.check_signature(SIGNATURE)?;

        let language_id = cursor.read_u32::<LE>()?;
        let string_count = cursor.read_u32::<LE>()?;
        let entries_off = cursor.read_u32::<LE>()?;

        let mut strings = Vec::with_capacity(string_count as usize);
        for i in 0..string_count {
            cursor.seek(20 + u64::from(i) * 40)?;

            let flags = cursor.read_u32::<LE>()?;
            let sound_resref = cursor.read_string(16)?.to_lowercase();
            let _volume_variance = cursor.read_u32::<LE>()?;
            let _pitch_variance = cursor.read_u32::<LE>()?;
            let string_off = cursor.read_u32::<LE>()?;
            let string_size = cursor.read_u32::<LE>()?;
            let _sound_length = cursor.read_f32::<LE>()?;

            let text = if flags & FLAG_TEXT_PRESENT != 0 && string_size > 0 {
                cursor.read_string_at(
                    u64::from(entries_off) + u64::from(string_off),
                    string_size as usize,
                )?
            } else {
                String::new()
            };
            let sound_resref = if flags & FLAG_SOUND_PRESENT != 0 {
                sound_resref
            } else {
                String::new()
            };

            strings.push(TalkString { text, sound_resref });
        }

        Ok(Self {
            language_id,
            strings,
        })
    }

    pub fn language_id(&self) -> u32 {
        self.language_id
    }

    pub fn string_count(&self) -> usize {
        self.strings.len()
    }

    /// Look up a string by reference; out-of-range refs yield `None`.
    pub fn string(&self, str_ref: i32) -> Option<&TalkString> {
        usize::try_from(str_ref).ok().and_then(|i| self.strings.get(i))
    }
}
