//! Error types for resource resolution

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResourceError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Format(#[from] aurora_formats::FormatError),

    #[error("Required game file not found: {}", .0.display())]
    MissingGameFile(PathBuf),
}

pub type Result<T> = std::result::Result<T, ResourceError>;
