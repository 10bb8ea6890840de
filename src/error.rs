//! Error kinds shared across the controller.
//!
//! All of these degrade gracefully at their call sites: a container that
//! cannot be parsed still plays as plain media, a failed chapter lookup
//! clamps to the first chapter, and a rejected cover simply stays hidden.

use std::path::PathBuf;
use thiserror::Error;

use crate::player::CoverTagType;

/// Failures while opening or parsing a chaptered container.
#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("cannot read container {path}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse container {path}: {detail}")]
    Malformed { path: PathBuf, detail: String },
}

/// A position that no chapter covers despite a non-empty table.
///
/// Chapters are contiguous and gapless by construction and lookups clamp at
/// both ends, so reaching this means the table broke its own guarantees.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("position {position}s is outside all {chapters} chapters")]
pub struct LocateError {
    pub position: u64,
    pub chapters: usize,
}

/// Cover art that was present in the media but not usable.
#[derive(Debug, Error)]
pub enum CoverError {
    #[error("unsupported cover image tag type {0:?}")]
    UnsupportedImageType(CoverTagType),
    #[error("cover image failed to decode")]
    Decode(#[from] image::ImageError),
}
