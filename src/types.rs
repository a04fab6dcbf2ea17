//!
//! src/types.rs
//!
//! Records shared by the extractor, resolver, and segmenter
//!
//!

use serde::{Deserialize, Serialize};

/// One entry of the inferred track listing. Timestamps stay opaque text
/// in `MM:SS` or `H:MM:SS` form; the segmenter consumes them verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Track number as text, zero-padded to at least two digits
    pub number: String,
    /// Title taken verbatim from the quoted segment of the listing line
    pub title: String,
    pub start: String,
    /// Start of the following track; `None` means "until end of file"
    pub stop: Option<String>,
}

/// Album-level fields, each independently overridable during
/// confirmation and omitted from tagging when absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub title: Option<String>,
    pub year: Option<String>,
    pub artist: Option<String>,
    pub genre: Option<String>,
    /// Length of the resolved track list, never the raw line count
    pub num_tracks: usize,
}
