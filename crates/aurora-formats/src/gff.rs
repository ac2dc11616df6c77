//! GFF structured-data reader
//!
//! GFF (generic file format) is the container behind every template and
//! blueprint type: creatures, items, areas, dialogs, GUI layouts. One file
//! holds a tree of typed structs; structs, fields, labels, field data,
//! field indices, and list indices each live in their own header-addressed
//! table. The 4-byte content tag in the signature varies by resource type,
//! the version half is always `V3.2`.

use crate::cursor::BinaryCursor;
use crate::error::{FormatError, Result};
use byteorder::LittleEndian as LE;
use std::io::{Read, Seek};
use tracing::{debug, warn};

const VERSION: &str = "V3.2";

const STRUCT_RECORD_SIZE: u64 = 12;
const FIELD_RECORD_SIZE: u64 = 12;
const LABEL_SIZE: u64 = 16;

/// One typed field value.
///
/// Small scalars are stored inline in the field record; everything else is
/// resolved through the field-data, field-indices, or list-indices table at
/// read time, so the parsed tree is self-contained.
#[derive(Debug, Clone, PartialEq)]
pub enum GffValue {
    Byte(u8),
    Char(i8),
    Word(u16),
    Short(i16),
    Dword(u32),
    Int(i32),
    Dword64(u64),
    Int64(i64),
    Float(f32),
    Double(f64),
    String(String),
    ResRef(String),
    /// Localized string: a talk table reference plus an optional override
    /// substring carried in the file itself.
    LocString {
        str_ref: i32,
        substring: String,
    },
    Void(Vec<u8>),
    Struct(GffStruct),
    List(Vec<GffStruct>),
    Orientation([f32; 4]),
    Vector([f32; 3]),
    StrRef(i32),
}

/// One labelled field of a struct.
#[derive(Debug, Clone, PartialEq)]
pub struct GffField {
    pub label: String,
    pub value: GffValue,
}

/// One struct node in the tree.
#[derive(Debug, Clone, PartialEq)]
pub struct GffStruct {
    struct_type: u32,
    fields: Vec<GffField>,
}

impl GffStruct {
    /// The programmer-assigned struct type id (the root is `0xFFFF_FFFF`).
    pub fn struct_type(&self) -> u32 {
        self.struct_type
    }

    pub fn fields(&self) -> &[GffField] {
        &self.fields
    }

    /// Value of the first field with this label.
    pub fn field(&self, label: &str) -> Option<&GffValue> {
        self.fields
            .iter()
            .find(|f| f.label == label)
            .map(|f| &f.value)
    }

    /// Integer view over the numeric field variants.
    pub fn get_int(&self, label: &str) -> Option<i32> {
        match self.field(label)? {
            GffValue::Byte(v) => Some(i32::from(*v)),
            GffValue::Char(v) => Some(i32::from(*v)),
            GffValue::Word(v) => Some(i32::from(*v)),
            GffValue::Short(v) => Some(i32::from(*v)),
            GffValue::Dword(v) => i32::try_from(*v).ok(),
            GffValue::Int(v) | GffValue::StrRef(v) => Some(*v),
            _ => None,
        }
    }

    /// String view over the text-carrying field variants. For localized
    /// strings this is the embedded substring, not the talk table text.
    pub fn get_string(&self, label: &str) -> Option<&str> {
        match self.field(label)? {
            GffValue::String(s) | GffValue::ResRef(s) => Some(s),
            GffValue::LocString { substring, .. } => Some(substring),
            _ => None,
        }
    }

    pub fn get_float(&self, label: &str) -> Option<f32> {
        match self.field(label)? {
            GffValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn get_struct(&self, label: &str) -> Option<&GffStruct> {
        match self.field(label)? {
            GffValue::Struct(s) => Some(s),
            _ => None,
        }
    }

    pub fn get_list(&self, label: &str) -> Option<&[GffStruct]> {
        match self.field(label)? {
            GffValue::List(items) => Some(items),
            _ => None,
        }
    }
}

/// Parsed GFF file: the content tag plus the root struct.
#[derive(Debug)]
pub struct Gff {
    file_type: String,
    root: GffStruct,
}

impl Gff {
    /// Parse a GFF from an in-memory payload.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut cursor = BinaryCursor::from_vec(data);
        Self::read(&mut cursor)
    }

    /// Parse a GFF from an open cursor.
    pub fn read<R: Read + Seek>(cursor: &mut BinaryCursor<R>) -> Result<Self> {
        let signature = cursor.read_bytes(8)?;
        if &signature[4..] != VERSION.as_bytes() {
            return Err(FormatError::SignatureMismatch {
                expected: format!("???? {VERSION}"),
                actual: String::from_utf8_lossy(&signature).into_owned(),
            });
        }
        let file_type = String::from_utf8_lossy(&signature[..4])
            .trim_end()
            .to_string();

        let struct_off = cursor.read_u32::<LE>()?;
        let struct_count = cursor.read_u32::<LE>()?;
        let field_off = cursor.read_u32::<LE>()?;
        let field_count = cursor.read_u32::<LE>()?;
        let label_off = cursor.read_u32::<LE>()?;
        let label_count = cursor.read_u32::<LE>()?;
        let field_data_off = cursor.read_u32::<LE>()?;
        cursor.ignore(4)?; // field data byte count
        let field_indices_off = cursor.read_u32::<LE>()?;
        cursor.ignore(4)?; // field indices byte count
        let list_indices_off = cursor.read_u32::<LE>()?;

        let mut reader = GffReader {
            cursor,
            struct_off,
            struct_count,
            field_off,
            field_count,
            label_off,
            label_count,
            field_data_off,
            field_indices_off,
            list_indices_off,
        };
        let root = reader.read_struct(0)?;

        debug!(
            "Parsed GFF {}: {} structs, {} fields",
            file_type, struct_count, field_count
        );

        Ok(Self { file_type, root })
    }

    /// The 4-character content tag, trailing spaces trimmed.
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    pub fn root(&self) -> &GffStruct {
        &self.root
    }
}

struct GffReader<'a, R: Read + Seek> {
    cursor: &'a mut BinaryCursor<R>,
    struct_off: u32,
    struct_count: u32,
    field_off: u32,
    field_count: u32,
    label_off: u32,
    label_count: u32,
    field_data_off: u32,
    field_indices_off: u32,
    list_indices_off: u32,
}

impl<R: Read + Seek> GffReader<'_, R> {
    fn read_struct(&mut self, idx: u32) -> Result<GffStruct> {
        if idx >= self.struct_count {
            return Err(FormatError::IndexOutOfRange {
                index: idx,
                count: self.struct_count,
            });
        }
        self.cursor
            .seek(u64::from(self.struct_off) + u64::from(idx) * STRUCT_RECORD_SIZE)?;

        let struct_type = self.cursor.read_u32::<LE>()?;
        let data = self.cursor.read_u32::<LE>()?;
        let field_count = self.cursor.read_u32::<LE>()?;

        // A single field is referenced directly; otherwise `data` is a byte
        // offset into the field-indices table.
        let field_idxs = match field_count {
            0 => Vec::new(),
            1 => vec![data],
            n => {
                self.cursor
                    .seek(u64::from(self.field_indices_off) + u64::from(data))?;
                let mut idxs = Vec::with_capacity(n as usize);
                for _ in 0..n {
                    idxs.push(self.cursor.read_u32::<LE>()?);
                }
                idxs
            }
        };

        let mut fields = Vec::with_capacity(field_idxs.len());
        for field_idx in field_idxs {
            fields.push(self.read_field(field_idx)?);
        }

        Ok(GffStruct {
            struct_type,
            fields,
        })
    }

    fn read_field(&mut self, idx: u32) -> Result<GffField> {
        if idx >= self.field_count {
            return Err(FormatError::IndexOutOfRange {
                index: idx,
                count: self.field_count,
            });
        }
        self.cursor
            .seek(u64::from(self.field_off) + u64::from(idx) * FIELD_RECORD_SIZE)?;

        let type_code = self.cursor.read_u32::<LE>()?;
        let label_idx = self.cursor.read_u32::<LE>()?;
        let data = self.cursor.read_u32::<LE>()?;

        let label = self.read_label(label_idx)?;
        let value = match type_code {
            0 => GffValue::Byte(data as u8),
            1 => GffValue::Char(data as u8 as i8),
            2 => GffValue::Word(data as u16),
            3 => GffValue::Short(data as u16 as i16),
            4 => GffValue::Dword(data),
            5 => GffValue::Int(data as i32),
            6 => GffValue::Dword64(self.data_u64(data)?),
            7 => GffValue::Int64(self.data_u64(data)? as i64),
            8 => GffValue::Float(f32::from_bits(data)),
            9 => GffValue::Double(f64::from_bits(self.data_u64(data)?)),
            10 => GffValue::String(self.data_string(data)?),
            11 => GffValue::ResRef(self.data_resref(data)?),
            12 => {
                let (str_ref, substring) = self.data_loc_string(data)?;
                GffValue::LocString { str_ref, substring }
            }
            13 => GffValue::Void(self.data_blob(data)?),
            14 => GffValue::Struct(self.read_struct(data)?),
            15 => {
                let idxs = self.list_struct_indices(data)?;
                let mut items = Vec::with_capacity(idxs.len());
                for struct_idx in idxs {
                    items.push(self.read_struct(struct_idx)?);
                }
                GffValue::List(items)
            }
            16 => GffValue::Orientation(self.data_floats::<4>(data)?),
            17 => GffValue::Vector(self.data_floats::<3>(data)?),
            18 => GffValue::StrRef(self.data_str_ref(data)?),
            other => {
                return Err(FormatError::MalformedTable {
                    container: "GFF",
                    reason: format!("unsupported field type {other} for label {label:?}"),
                });
            }
        };

        Ok(GffField { label, value })
    }

    fn read_label(&mut self, idx: u32) -> Result<String> {
        if idx >= self.label_count {
            return Err(FormatError::IndexOutOfRange {
                index: idx,
                count: self.label_count,
            });
        }
        self.cursor
            .read_string_at(u64::from(self.label_off) + u64::from(idx) * LABEL_SIZE, 16)
    }

    fn seek_data(&mut self, off: u32) -> Result<()> {
        self.cursor
            .seek(u64::from(self.field_data_off) + u64::from(off))
    }

    fn data_u64(&mut self, off: u32) -> Result<u64> {
        self.seek_data(off)?;
        self.cursor.read_u64::<LE>()
    }

    fn data_string(&mut self, off: u32) -> Result<String> {
        self.seek_data(off)?;
        let len = self.cursor.read_u32::<LE>()?;
        self.cursor.read_string(len as usize)
    }

    fn data_resref(&mut self, off: u32) -> Result<String> {
        self.seek_data(off)?;
        let len = self.cursor.read_u8()?;
        self.cursor.read_string(len as usize)
    }

    fn data_loc_string(&mut self, off: u32) -> Result<(i32, String)> {
        self.seek_data(off)?;
        let _total_size = self.cursor.read_u32::<LE>()?;
        let str_ref = self.cursor.read_i32::<LE>()?;
        let count = self.cursor.read_u32::<LE>()?;

        let substring = if count >= 1 {
            let _language = self.cursor.read_i32::<LE>()?;
            let len = self.cursor.read_u32::<LE>()?;
            self.cursor.read_string(len as usize)?
        } else {
            String::new()
        };
        if count > 1 {
            warn!("GFF localized string carries {count} substrings, keeping the first");
        }
        Ok((str_ref, substring))
    }

    fn data_blob(&mut self, off: u32) -> Result<Vec<u8>> {
        self.seek_data(off)?;
        let len = self.cursor.read_u32::<LE>()?;
        self.cursor.read_bytes(len as usize)
    }

    fn data_floats<const N: usize>(&mut self, off: u32) -> Result<[f32; N]> {
        self.seek_data(off)?;
        let mut out = [0f32; N];
        for v in &mut out {
            *v = self.cursor.read_f32::<LE>()?;
        }
        Ok(out)
    }

    fn data_str_ref(&mut self, off: u32) -> Result<i32> {
        self.seek_data(off)?;
        let _size = self.cursor.read_u32::<LE>()?;
        self.cursor.read_i32::<LE>()
    }

    fn list_struct_indices(&mut self, off: u32) -> Result<Vec<u32>> {
        self.cursor
            .seek(u64::from(self.list_indices_off) + u64::from(off))?;
        let count = self.cursor.read_u32::<LE>()?;
        let mut idxs = Vec::with_capacity(count as usize);
        for _ in 0..count {
            idxs.push(self.cursor.read_u32::<LE>()?);
        }
        Ok(idxs)
    }
}
