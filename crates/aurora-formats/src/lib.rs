//! Binary readers for Aurora-engine archive and table formats
//!
//! This crate parses the container formats the engine stores its game data
//! in: the two-file KEY+BIF indexed-archive scheme, the single-file ERF/MOD
//! and RIM bundles, plus the payload formats carried inside them: GFF
//! template trees, TLK talk tables, binary 2DA rule tables, and NCS compiled
//! scripts. All parsing goes through [`BinaryCursor`], and every reader
//! validates its signature before touching any other field.

pub mod bif;
pub mod bundle;
pub mod cursor;
pub mod error;
pub mod gff;
pub mod key;
pub mod ncs;
pub mod tlk;
pub mod twoda;
pub mod types;

pub use bif::BifFile;
pub use bundle::{BundleEntry, BundleFile, BundleVariant};
pub use cursor::BinaryCursor;
pub use error::{FormatError, Result};
pub use gff::{Gff, GffField, GffStruct, GffValue};
pub use key::{KeyFile, KeyLocation, decode_packed_id};
pub use ncs::NcsScript;
pub use tlk::{TalkString, TalkTable};
pub use twoda::TwoDaTable;
pub use types::ResourceType;
