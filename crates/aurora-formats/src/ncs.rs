//! Compiled script (NCS) container reader
//!
//! NCS is the one format in the set with big-endian fields: after the
//! signature comes the program-size opcode byte and a big-endian u32 giving
//! the total program length, header included. This reader validates the
//! header and extracts the raw instruction stream; decoding the bytecode is
//! the script VM's job, not the archive layer's.

use crate::cursor::BinaryCursor;
use crate::error::{FormatError, Result};
use byteorder::BigEndian as BE;
use std::io::{Read, Seek};
use std::path::Path;
use tracing::debug;

const SIGNATURE: &str = "NCS V1.0";

/// Opcode of the mandatory program-size pseudo-instruction.
const SIZE_OPCODE: u8 = 0x42;

/// Signature + size opcode + program length.
const HEADER_SIZE: u32 = 13;

/// Parsed NCS container: the declared program size and the raw bytecode.
#[derive(Debug)]
pub struct NcsScript {
    program_size: u32,
    bytecode: Vec<u8>,
}

impl NcsScript {
    /// Parse a compiled script from disk.
    pub fn open(path: &Path) -> Result<Self> {
        let mut cursor = BinaryCursor::open(path)?;
        Self::read(&mut cursor)
    }

    /// Parse a compiled script from an in-memory payload.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = BinaryCursor::from_vec(data);
        Self::read(&mut cursor)
    }

    /// Parse a compiled script from an open cursor.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.check_signature(SIGNATURE)?;

        let opcode = cursor.read_u8()?;
        if opcode != SIZE_OPCODE {
            return Err(FormatError::MalformedTable {
                container: "NCS",
                reason: format!("expected size opcode {SIZE_OPCODE:#04x}, got {opcode:#04x}"),
            });
        }

        let program_size = cursor.read_u32::<BE>()?;
        if program_size < HEADER_SIZE || u64::from(program_size) > cursor.len() {
            return Err(FormatError::MalformedTable {
                container: "NCS",
                reason: format!(
                    "declared program size {program_size} outside the {}-byte container",
                    cursor.len()
                ),
            });
        }

        let bytecode = cursor.read_bytes((program_size - HEADER_SIZE) as usize)?;
        debug!("Parsed NCS: {} bytecode bytes", bytecode.len());

        Ok(Self {
            program_size,
            bytecode,
        })
    }

    /// Declared total program length, header included.
    pub fn program_size(&self) -> u32 {
        self.program_size
    }

    /// The raw instruction stream after the header.
    pub fn bytecode(&self) -> &[u8] {
        &self.bytecode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_test_fixtures::build_ncs;

    #[test]
    fn extracts_bytecode_after_the_header() {
        // RETN is 0x20 0x00.
        let ncs = NcsScript::from_bytes(build_ncs(&[0x20, 0x00])).unwrap();
        assert_eq!(ncs.program_size(), 15);
        assert_eq!(ncs.bytecode(), [0x20, 0x00]);
    }

    #[test]
    fn program_size_is_big_endian() {
        let data = build_ncs(&[0u8; 256]);
        // 269 = 0x010D; a little-endian misread would see 0x0D010000.
        assert_eq!(&data[9..13], &[0x00, 0x00, 0x01, 0x0D]);

        let ncs = NcsScript::from_bytes(data).unwrap();
        assert_eq!(ncs.bytecode().len(), 256);
    }

    #[test]
    fn trailing_padding_beyond_the_declared_size_is_ignored() {
        let mut data = build_ncs(&[0x20, 0x00]);
        data.extend_from_slice(&[0xFF; 8]);

        let ncs = NcsScript::from_bytes(data).unwrap();
        assert_eq!(ncs.bytecode(), [0x20, 0x00]);
    }

    #[test]
    fn missing_size_opcode_is_malformed() {
        let mut data = build_ncs(&[]);
        data[8] = 0x00;

        let err = NcsScript::from_bytes(data).unwrap_err();
        assert!(matches!(err, FormatError::MalformedTable { container: "NCS", .. }));
    }

    #[test]
    fn declared_size_beyond_the_container_is_malformed() {
        let mut out = Vec::new();
        out.extend_from_slice(b"NCS V1.0");
        out.push(SIZE_OPCODE);
        out.extend_from_slice(&1_000_000u32.to_be_bytes());

        let err = NcsScript::from_bytes(out).unwrap_err();
        assert!(matches!(err, FormatError::MalformedTable { container: "NCS", .. }));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let err = NcsScript::from_bytes(b"NSS V1.0".to_vec()).unwrap_err();
        assert!(matches!(err, FormatError::SignatureMismatch { .. }));
    }
}
