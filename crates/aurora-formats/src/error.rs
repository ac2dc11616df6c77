//! Error types for format parsing

use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FormatError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Unexpected end of stream at offset {offset}: needed {needed} more bytes")]
    EndOfStream { offset: u64, needed: usize },

    #[error("Signature mismatch: expected {expected:?}, got {actual:?}")]
    SignatureMismatch { expected: String, actual: String },

    #[error("Malformed {container} table: {reason}")]
    MalformedTable {
        container: &'static str,
        reason: String,
    },

    #[error("Resource index {index} out of range (table holds {count})")]
    IndexOutOfRange { index: u32, count: u32 },
}

pub type Result<T> = std::result::Result<T, FormatError>;
