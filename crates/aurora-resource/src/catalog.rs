//! Typed decode caches
//!
//! Thin wrappers turning "bytes for X" into "parsed X" with compute-once,
//! remember-forever discipline. Unlike the resolver's byte cache, these
//! memoize absence too, so a persistently missing table is not re-resolved
//! every frame.

use crate::cache::MemoCache;
use crate::error::Result;
use crate::id::ResourceId;
use crate::resolver::Resources;
use aurora_formats::{BinaryCursor, Gff, ResourceType, TalkTable, TwoDaTable};
use bytes::Bytes;
use std::sync::Arc;
use tracing::warn;

/// Parsed-resource caches over a shared resolver.
pub struct Catalog {
    resources: Arc<Resources>,
    gffs: MemoCache<ResourceId, Option<Arc<Gff>>>,
    two_das: MemoCache<String, Option<Arc<TwoDaTable>>>,
    talk_tables: MemoCache<String, Option<Arc<TalkTable>>>,
    raw: MemoCache<ResourceId, Option<Bytes>>,
}

impl Catalog {
    pub fn new(resources: Arc<Resources>) -> Self {
        Self {
            resources,
            gffs: MemoCache::new(),
            two_das: MemoCache::new(),
            talk_tables: MemoCache::new(),
            raw: MemoCache::new(),
        }
    }

    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    /// Parsed GFF template tree, memoized per (resref, type). Templates
    /// share one format across creature, item, area, and dialog types, so
    /// the type is part of the cache key.
    pub fn gff(&self, resref: &str, res_type: ResourceType) -> Result<Option<Arc<Gff>>> {
        let id = ResourceId::new(resref, res_type);
        self.gffs.get_or_try_add(id.clone(), || {
            let Some(data) = self.resources.get(&id)? else {
                warn!("GFF not found: {}", id);
                return Ok(None);
            };
            Ok(Some(Arc::new(Gff::from_bytes(data.to_vec())?)))
        })
    }

    /// Parsed 2DA rule table, memoized. A missing table is remembered as
    /// `None`; a structurally broken one is an error every time.
    pub fn two_da(&self, resref: &str) -> Result<Option<Arc<TwoDaTable>>> {
        let key = resref.to_lowercase();
        self.two_das.get_or_try_add(key.clone(), || {
            let id = ResourceId::new(&key, ResourceType::TwoDa);
            let Some(data) = self.resources.get(&id)? else {
                warn!("2DA not found: {}", key);
                return Ok(None);
            };
            Ok(Some(Arc::new(TwoDaTable::from_bytes(data.to_vec())?)))
        })
    }

    /// Parsed talk table, memoized.
    pub fn talk_table(&self, resref: &str) -> Result<Option<Arc<TalkTable>>> {
        let key = resref.to_lowercase();
        self.talk_tables.get_or_try_add(key.clone(), || {
            let id = ResourceId::new(&key, ResourceType::Tlk);
            let Some(data) = self.resources.get(&id)? else {
                warn!("Talk table not found: {}", key);
                return Ok(None);
            };
            let table = TalkTable::read(&mut BinaryCursor::from_vec(data.to_vec()))?;
            Ok(Some(Arc::new(table)))
        })
    }

    /// Raw payload with absence memoized, for consumers that poll for
    /// optional resources.
    pub fn raw(&self, id: &ResourceId) -> Result<Option<Bytes>> {
        self.raw
            .get_or_try_add(id.clone(), || self.resources.get(id))
    }

    /// Drop every decoded value; used alongside [`Resources::clear`].
    pub fn clear(&self) {
        self.gffs.clear();
        self.two_das.clear();
        self.talk_tables.clear();
        self.raw.clear();
    }
}

/// String lookup over the global talk table.
pub struct Strings {
    table: TalkTable,
    strip_developer_notes: bool,
}

impl Strings {
    pub fn new(table: TalkTable, strip_developer_notes: bool) -> Self {
        Self {
            table,
            strip_developer_notes,
        }
    }

    /// Text for a string reference; `-1` and out-of-range refs yield the
    /// empty string.
    pub fn get(&self, str_ref: i32) -> String {
        let Some(entry) = self.table.string(str_ref) else {
            return String::new();
        };
        let mut text = entry.text.clone();
        if self.strip_developer_notes {
            strip_braced_notes(&mut text);
        }
        text
    }

    /// Voice-over resref for a string reference, if any.
    pub fn sound(&self, str_ref: i32) -> Option<&str> {
        self.table
            .string(str_ref)
            .map(|entry| entry.sound_resref.as_str())
            .filter(|s| !s.is_empty())
    }

    pub fn table(&self) -> &TalkTable {
        &self.table
    }
}

/// Remove every `{...}` developer note from second-game dialog text.
fn strip_braced_notes(text: &mut String) {
    while let Some(open) = text.find('{') {
        let Some(close_rel) = text[open..].find('}') else {
            break;
        };
        text.replace_range(open..=open + close_rel, "");
    }
}
