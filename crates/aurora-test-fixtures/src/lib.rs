//! Synthetic archive builders for tests
//!
//! Each builder produces a byte-exact container for a known set of
//! (name, type, payload) triples so round-trip tests can compare payloads
//! and identity sets against what they wrote.

/// One resource to place into a synthetic archive.
#[derive(Debug, Clone)]
pub struct FixtureResource {
    pub name: String,
    pub type_code: u16,
    pub data: Vec<u8>,
}

impl FixtureResource {
    pub fn new(name: &str, type_code: u16, data: &[u8]) -> Self {
        Self {
            name: name.to_string(),
            type_code,
            data: data.to_vec(),
        }
    }
}

fn name_field(name: &str) -> [u8; 16] {
    let mut field = [0u8; 16];
    let bytes = name.as_bytes();
    field[..bytes.len().min(16)].copy_from_slice(&bytes[..bytes.len().min(16)]);
    field
}

/// Build an ERF or MOD bundle from the given resources.
pub fn build_erf(signature: &[u8; 8], resources: &[FixtureResource]) -> Vec<u8> {
    let count = resources.len() as u32;
    let off_keys = 32u32;
    let off_resources = off_keys + count * 24;
    let data_start = off_resources + count * 8;

    let mut out = Vec::new();
    out.extend_from_slice(signature);
    out.extend_from_slice(&[0u8; 8]); // build version + localized string count
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // localized string table offset
    out.extend_from_slice(&off_keys.to_le_bytes());
    out.extend_from_slice(&off_resources.to_le_bytes());

    for (i, res) in resources.iter().enumerate() {
        out.extend_from_slice(&name_field(&res.name));
        out.extend_from_slice(&(i as u32).to_le_bytes());
        out.extend_from_slice(&res.type_code.to_le_bytes());
        out.extend_from_slice(&[0u8; 2]);
    }

    let mut offset = data_start;
    for res in resources {
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(res.data.len() as u32).to_le_bytes());
        offset += res.data.len() as u32;
    }

    for res in resources {
        out.extend_from_slice(&res.data);
    }
    out
}

/// Build a RIM bundle from the given resources.
pub fn build_rim(resources: &[FixtureResource]) -> Vec<u8> {
    let count = resources.len() as u32;
    let table_off = 20u32;
    let data_start = table_off + count * 32;

    let mut out = Vec::new();
    out.extend_from_slice(b"RIM V1.0");
    out.extend_from_slice(&[0u8; 4]);
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&table_off.to_le_bytes());

    let mut offset = data_start;
    for res in resources {
        out.extend_from_slice(&name_field(&res.name));
        out.extend_from_slice(&res.type_code.to_le_bytes());
        out.extend_from_slice(&[0u8; 6]);
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(res.data.len() as u32).to_le_bytes());
        offset += res.data.len() as u32;
    }

    for res in resources {
        out.extend_from_slice(&res.data);
    }
    out
}

/// Build a BIF data archive; resources are addressed by table index.
pub fn build_bif(resources: &[FixtureResource]) -> Vec<u8> {
    let count = resources.len() as u32;
    let table_off = 20u32;
    let data_start = table_off + count * 16;

    let mut out = Vec::new();
    out.extend_from_slice(b"BIFFV1  ");
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // fixed resources, unused
    out.extend_from_slice(&table_off.to_le_bytes());

    let mut offset = data_start;
    for (i, res) in resources.iter().enumerate() {
        out.extend_from_slice(&(i as u32).to_le_bytes());
        out.extend_from_slice(&offset.to_le_bytes());
        out.extend_from_slice(&(res.data.len() as u32).to_le_bytes());
        out.extend_from_slice(&u32::from(res.type_code).to_le_bytes());
        offset += res.data.len() as u32;
    }

    for res in resources {
        out.extend_from_slice(&res.data);
    }
    out
}

/// Build a KEY index over a list of archives.
///
/// `archives` pairs a relative filename with its declared size; `keys`
/// carries (name, type code, packed composite id).
pub fn build_key(archives: &[(&str, u32)], keys: &[(&str, u16, u32)]) -> Vec<u8> {
    let archive_count = archives.len() as u32;
    let key_count = keys.len() as u32;
    let file_table_off = 24u32;
    let filenames_off = file_table_off + archive_count * 12;
    let filenames_len: u32 = archives.iter().map(|(name, _)| name.len() as u32).sum();
    let key_table_off = filenames_off + filenames_len;

    let mut out = Vec::new();
    out.extend_from_slice(b"KEY V1  ");
    out.extend_from_slice(&archive_count.to_le_bytes());
    out.extend_from_slice(&key_count.to_le_bytes());
    out.extend_from_slice(&file_table_off.to_le_bytes());
    out.extend_from_slice(&key_table_off.to_le_bytes());

    let mut filename_off = filenames_off;
    for (name, size) in archives {
        out.extend_from_slice(&size.to_le_bytes());
        out.extend_from_slice(&filename_off.to_le_bytes());
        out.extend_from_slice(&(name.len() as u16).to_le_bytes());
        out.extend_from_slice(&[0u8; 2]); // drives bitmask
        filename_off += name.len() as u32;
    }

    for (name, _) in archives {
        out.extend_from_slice(name.as_bytes());
    }

    for (name, type_code, packed_id) in keys {
        out.extend_from_slice(&name_field(name));
        out.extend_from_slice(&type_code.to_le_bytes());
        out.extend_from_slice(&packed_id.to_le_bytes());
    }
    out
}

/// Pack an (archive index, resource index) pair into a KEY composite id.
pub fn pack_key_id(archive_idx: u32, resource_idx: u32) -> u32 {
    (archive_idx << 20) | (resource_idx & 0xF_FFFF)
}

/// Build a binary 2DA table from headers and string rows.
pub fn build_2da(headers: &[&str], rows: &[&[&str]]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"2DA V2.b\n");
    for h in headers {
        out.extend_from_slice(h.as_bytes());
        out.push(b'\t');
    }
    out.push(0);
    out.extend_from_slice(&(rows.len() as u32).to_le_bytes());
    for i in 0..rows.len() {
        out.extend_from_slice(i.to_string().as_bytes());
        out.push(b'\t');
    }

    // Deduplicated cell blob, offsets relative to its start.
    let mut blob: Vec<u8> = Vec::new();
    let mut seen: Vec<(String, u16)> = Vec::new();
    for row in rows {
        for cell in *row {
            let off = match seen.iter().find(|(s, _)| s == cell) {
                Some((_, off)) => *off,
                None => {
                    let off = blob.len() as u16;
                    blob.extend_from_slice(cell.as_bytes());
                    blob.push(0);
                    seen.push(((*cell).to_string(), off));
                    off
                }
            };
            out.extend_from_slice(&off.to_le_bytes());
        }
    }
    out.extend_from_slice(&(blob.len() as u16).to_le_bytes());
    out.extend_from_slice(&blob);
    out
}

/// Field value for [`build_gff`].
#[derive(Debug, Clone)]
pub enum GffFixtureValue<'a> {
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
    String(&'a str),
    ResRef(&'a str),
    LocString(i32, &'a str),
    Void(&'a [u8]),
    Struct(u32, Vec<(&'a str, GffFixtureValue<'a>)>),
    List(Vec<Vec<(&'a str, GffFixtureValue<'a>)>>),
    Orientation([f32; 4]),
    Vector([f32; 3]),
    StrRef(i32),
}

#[derive(Default)]
struct GffBuilder {
    structs: Vec<(u32, u32, u32)>,
    fields: Vec<(u32, u32, u32)>,
    labels: Vec<[u8; 16]>,
    field_data: Vec<u8>,
    field_indices: Vec<u8>,
    list_indices: Vec<u8>,
}

impl GffBuilder {
    fn label_index(&mut self, label: &str) -> u32 {
        let field = name_field(label);
        if let Some(i) = self.labels.iter().position(|l| *l == field) {
            return i as u32;
        }
        self.labels.push(field);
        (self.labels.len() - 1) as u32
    }

    fn push_data(&mut self, bytes: &[u8]) -> u32 {
        let off = self.field_data.len() as u32;
        self.field_data.extend_from_slice(bytes);
        off
    }

    fn add_struct(&mut self, struct_type: u32, fields: &[(&str, GffFixtureValue)]) -> u32 {
        let idx = self.structs.len();
        self.structs.push((struct_type, 0, fields.len() as u32));

        let mut field_idxs = Vec::with_capacity(fields.len());
        for (label, value) in fields {
            field_idxs.push(self.add_field(label, value));
        }
        let data = match field_idxs.as_slice() {
            [] => 0,
            [single] => *single,
            many => {
                let off = self.field_indices.len() as u32;
                for i in many {
                    self.field_indices.extend_from_slice(&i.to_le_bytes());
                }
                off
            }
        };
        self.structs[idx].1 = data;
        idx as u32
    }

    fn add_field(&mut self, label: &str, value: &GffFixtureValue) -> u32 {
        let label_idx = self.label_index(label);
        let (type_code, data) = match value {
            GffFixtureValue::Byte(v) => (0, u32::from(*v)),
            GffFixtureValue::Char(v) => (1, u32::from(*v as u8)),
            GffFixtureValue::Word(v) => (2, u32::from(*v)),
            GffFixtureValue::Short(v) => (3, u32::from(*v as u16)),
            GffFixtureValue::Dword(v) => (4, *v),
            GffFixtureValue::Int(v) => (5, *v as u32),
            GffFixtureValue::Dword64(v) => (6, self.push_data(&v.to_le_bytes())),
            GffFixtureValue::Int64(v) => (7, self.push_data(&v.to_le_bytes())),
            GffFixtureValue::Float(v) => (8, v.to_bits()),
            GffFixtureValue::Double(v) => (9, self.push_data(&v.to_le_bytes())),
            GffFixtureValue::String(s) => {
                let mut b = (s.len() as u32).to_le_bytes().to_vec();
                b.extend_from_slice(s.as_bytes());
                (10, self.push_data(&b))
            }
            GffFixtureValue::ResRef(s) => {
                let mut b = vec![s.len() as u8];
                b.extend_from_slice(s.as_bytes());
                (11, self.push_data(&b))
            }
            GffFixtureValue::LocString(str_ref, sub) => {
                let substring_len = if sub.is_empty() { 0 } else { 8 + sub.len() };
                let mut b = ((8 + substring_len) as u32).to_le_bytes().to_vec();
                b.extend_from_slice(&str_ref.to_le_bytes());
                b.extend_from_slice(&u32::from(!sub.is_empty()).to_le_bytes());
                if !sub.is_empty() {
                    b.extend_from_slice(&0i32.to_le_bytes()); // language
                    b.extend_from_slice(&(sub.len() as u32).to_le_bytes());
                    b.extend_from_slice(sub.as_bytes());
                }
                (12, self.push_data(&b))
            }
            GffFixtureValue::Void(d) => {
                let mut b = (d.len() as u32).to_le_bytes().to_vec();
                b.extend_from_slice(d);
                (13, self.push_data(&b))
            }
            GffFixtureValue::Struct(ty, fields) => (14, self.add_struct(*ty, fields)),
            GffFixtureValue::List(items) => {
                let idxs: Vec<u32> = items.iter().map(|f| self.add_struct(0, f)).collect();
                let off = self.list_indices.len() as u32;
                self.list_indices
                    .extend_from_slice(&(idxs.len() as u32).to_le_bytes());
                for i in idxs {
                    self.list_indices.extend_from_slice(&i.to_le_bytes());
                }
                (15, off)
            }
            GffFixtureValue::Orientation(q) => {
                let mut b = Vec::with_capacity(16);
                for f in q {
                    b.extend_from_slice(&f.to_le_bytes());
                }
                (16, self.push_data(&b))
            }
            GffFixtureValue::Vector(v3) => {
                let mut b = Vec::with_capacity(12);
                for f in v3 {
                    b.extend_from_slice(&f.to_le_bytes());
                }
                (17, self.push_data(&b))
            }
            GffFixtureValue::StrRef(r) => {
                let mut b = 4u32.to_le_bytes().to_vec();
                b.extend_from_slice(&r.to_le_bytes());
                (18, self.push_data(&b))
            }
        };

        let idx = self.fields.len() as u32;
        self.fields.push((type_code, label_idx, data));
        idx
    }
}

/// Build a GFF file with the given content tag and root struct fields.
pub fn build_gff(file_type: &[u8; 4], fields: &[(&str, GffFixtureValue)]) -> Vec<u8> {
    let mut builder = GffBuilder::default();
    builder.add_struct(0xFFFF_FFFF, fields);

    let struct_off = 56u32;
    let field_off = struct_off + builder.structs.len() as u32 * 12;
    let label_off = field_off + builder.fields.len() as u32 * 12;
    let field_data_off = label_off + builder.labels.len() as u32 * 16;
    let field_indices_off = field_data_off + builder.field_data.len() as u32;
    let list_indices_off = field_indices_off + builder.field_indices.len() as u32;

    let mut out = Vec::new();
    out.extend_from_slice(file_type);
    out.extend_from_slice(b"V3.2");
    out.extend_from_slice(&struct_off.to_le_bytes());
    out.extend_from_slice(&(builder.structs.len() as u32).to_le_bytes());
    out.extend_from_slice(&field_off.to_le_bytes());
    out.extend_from_slice(&(builder.fields.len() as u32).to_le_bytes());
    out.extend_from_slice(&label_off.to_le_bytes());
    out.extend_from_slice(&(builder.labels.len() as u32).to_le_bytes());
    out.extend_from_slice(&field_data_off.to_le_bytes());
    out.extend_from_slice(&(builder.field_data.len() as u32).to_le_bytes());
    out.extend_from_slice(&field_indices_off.to_le_bytes());
    out.extend_from_slice(&(builder.field_indices.len() as u32).to_le_bytes());
    out.extend_from_slice(&list_indices_off.to_le_bytes());
    out.extend_from_slice(&(builder.list_indices.len() as u32).to_le_bytes());

    for (ty, data, count) in &builder.structs {
        out.extend_from_slice(&ty.to_le_bytes());
        out.extend_from_slice(&data.to_le_bytes());
        out.extend_from_slice(&count.to_le_bytes());
    }
    for (ty, label, data) in &builder.fields {
        out.extend_from_slice(&ty.to_le_bytes());
        out.extend_from_slice(&label.to_le_bytes());
        out.extend_from_slice(&data.to_le_bytes());
    }
    for label in &builder.labels {
        out.extend_from_slice(label);
    }
    out.extend_from_slice(&builder.field_data);
    out.extend_from_slice(&builder.field_indices);
    out.extend_from_slice(&builder.list_indices);
    out
}

/// Build an NCS compiled script around the given bytecode.
pub fn build_ncs(bytecode: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(b"NCS V1.0");
    out.push(0x42);
    out.extend_from_slice(&(13 + bytecode.len() as u32).to_be_bytes());
    out.extend_from_slice(bytecode);
    out
}

/// Build a TLK talk table from (text, sound resref) pairs.
pub fn build_tlk(language_id: u32, strings: &[(&str, &str)]) -> Vec<u8> {
    let count = strings.len() as u32;
    let entries_off = 20 + count * 40;

    let mut out = Vec::new();
    out.extend_from_slice(b"TLK V3.0");
    out.extend_from_slice(&language_id.to_le_bytes());
    out.extend_from_slice(&count.to_le_bytes());
    out.extend_from_slice(&entries_off.to_le_bytes());

    let mut string_off = 0u32;
    for (text, sound) in strings {
        let mut flags = 0u32;
        if !text.is_empty() {
            flags |= 1;
        }
        if !sound.is_empty() {
            flags |= 2;
        }
        out.extend_from_slice(&flags.to_le_bytes());
        out.extend_from_slice(&name_field(sound));
        out.extend_from_slice(&0u32.to_le_bytes()); // volume variance
        out.extend_from_slice(&0u32.to_le_bytes()); // pitch variance
        out.extend_from_slice(&string_off.to_le_bytes());
        out.extend_from_slice(&(text.len() as u32).to_le_bytes());
        out.extend_from_slice(&0f32.to_le_bytes()); // sound length
        string_off += text.len() as u32;
    }

    for (text, _) in strings {
        out.extend_from_slice(text.as_bytes());
    }
    out
}
