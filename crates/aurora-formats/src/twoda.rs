//! Binary 2DA table reader
//!
//! Game rule tables ship as binary 2DA: tab-terminated column headers, a
//! row count, row labels, then a grid of u16 offsets into a deduplicated
//! NUL-terminated cell blob. A literal `****` cell means "no value".

use crate::cursor::BinaryCursor;
use crate::error::{FormatError, Result};
use byteorder::LittleEndian as LE;
use std::io::{Read, Seek};
use tracing::debug;

const SIGNATURE: &str = "2DA V2.b";

const EMPTY_CELL: &str = "****";

/// Parsed 2DA table with column headers and string cells.
#[derive(Debug)]
pub struct TwoDaTable {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl TwoDaTable {
    /// Parse a binary 2DA from an in-memory payload.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = BinaryCursor::from_vec(data);
        Self::read(&mut cursor)
    }

    /// Parse a binary 2DA from an open cursor.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        cursor.check_signature(SIGNATURE)?;
        let newline = cursor.read_u8()?;
        if newline != b'\n' {
            return Err(FormatError::MalformedTable {
                container: "2DA",
                reason: format!("expected newline after signature, got {newline:#04x}"),
            });
        }

        let headers = read_tokens_until_nul(cursor)?;
        let row_count = cursor.read_u32::<LE>()?;

        // Row labels precede the cell grid; the engine never consumes them.
        for _ in 0..row_count {
            read_token(cursor)?;
        }

        let column_count = headers.len();
        let cell_count = row_count as usize * column_count;
        let mut offsets = Vec::with_capacity(cell_count);
        for _ in 0..cell_count {
            offsets.push(cursor.read_u16::<LE>()?);
        }

        let _data_size = cursor.read_u16::<LE>()?;
        let data_off = cursor.tell()?;

        let mut rows = Vec::with_capacity(row_count as usize);
        for i in 0..row_count as usize {
            let mut row = Vec::with_capacity(column_count);
            for j in 0..column_count {
                let off = data_off + u64::from(offsets[i * column_count + j]);
                row.push(cursor.read_cstring_at(off)?);
            }
            rows.push(row);
        }

        debug!("Parsed 2DA: {} columns, {} rows", column_count, row_count);

        Ok(Self { headers, rows })
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Cell text, with `****` and missing cells mapped to `None`.
    pub fn get(&self, row: usize, column: &str) -> Option<&str> {
        let col_idx = self.headers.iter().position(|h| h == column)?;
        let value = self.rows.get(row)?.get(col_idx)?;
        if value == EMPTY_CELL || value.is_empty() {
            None
        } else {
            Some(value)
        }
    }

    pub fn get_int(&self, row: usize, column: &str) -> Option<i32> {
        self.get(row, column)?.parse().ok()
    }

    pub fn get_float(&self, row: usize, column: &str) -> Option<f32> {
        self.get(row, column)?.parse().ok()
    }

    /// First row whose `column` cell equals `value`.
    pub fn find_row(&self, column: &str, value: &str) -> Option<usize> {
        (0..self.rows.len()).find(|&i| self.get(i, column) == Some(value))
    }
}

fn read_token<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Option<String>> {
    let mut token = Vec::new();
    loop {
        let b = cursor.read_u8()?;
        match b {
            0 => {
                if token.is_empty() {
                    return Ok(None);
                }
                return Err(FormatError::MalformedTable {
                    container: "2DA",
                    reason: "token terminated by NUL instead of tab".to_string(),
                });
            }
            b'\t' => return Ok(Some(String::from_utf8_lossy(&token).into_owned())),
            _ => token.push(b),
        }
    }
}

fn read_tokens_until_nul<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    while let Some(token) = read_token(cursor)? {
        tokens.push(token);
    }
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurora_test_fixtures::build_2da;

    #[test]
    fn parses_headers_and_cells() {
        let data = build_2da(
            &["label", "speed"],
            &[&["bandit", "5"], &["guard", "7"]],
        );
        let table = TwoDaTable::from_bytes(data).unwrap();

        assert_eq!(table.headers(), ["label", "speed"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, "label"), Some("bandit"));
        assert_eq!(table.get_int(1, "speed"), Some(7));
        assert_eq!(table.find_row("label", "guard"), Some(1));
    }

    #[test]
    fn empty_cell_marker_maps_to_none() {
        let data = build_2da(&["label"], &[&["****"]]);
        let table = TwoDaTable::from_bytes(data).unwrap();
        assert_eq!(table.get(0, "label"), None);
    }

    #[test]
    fn duplicate_cells_share_blob_entries() {
        let data = build_2da(&["a", "b"], &[&["x", "x"], &["x", "y"]]);
        let table = TwoDaTable::from_bytes(data).unwrap();
        assert_eq!(table.get(0, "a"), Some("x"));
        assert_eq!(table.get(0, "b"), Some("x"));
        assert_eq!(table.get(1, "b"), Some("y"));
    }

    #[test]
    fn bad_signature_is_rejected() {
        let err = TwoDaTable::from_bytes(b"2DA V2.0\n".to_vec()).unwrap_err();
        assert!(matches!(err, FormatError::SignatureMismatch { .. }));
    }

    #[test]
    fn missing_newline_after_signature_is_malformed() {
        let mut data = build_2da(&["label"], &[&["bandit"]]);
        data[8] = b'\t'; // misaligned header byte
        let err = TwoDaTable::from_bytes(data).unwrap_err();
        assert!(matches!(err, FormatError::MalformedTable { container: "2DA", .. }));
    }
}
