//!
//! src/album.rs
//!
//! Derives album-level fields from the full source title and runs
//! them past the user before any tagging starts
//!
//!

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AlbumizerError;
use crate::prompt::Prompt;
use crate::types::{AlbumRecord, TrackRecord};

/// Heuristic default; not a detection
const DEFAULT_GENRE: &str = "Rock";

static YEAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("year pattern is valid"));

/// First run of four consecutive digits in the title, if any.
fn guess_year(full_title: &str) -> Option<String> {
    YEAR.find(full_title).map(|m| m.as_str().to_string())
}

/// Build the confirmed [`AlbumRecord`]. Each field is presented with
/// its derived value as an editable default (artist has none); the
/// reply becomes the final value and the record is immutable for the
/// rest of the run. `num_tracks` comes from the resolved track list,
/// so this must run after extraction.
pub fn resolve_album(
    full_title: &str,
    tracks: &[TrackRecord],
    prompt: &dyn Prompt,
) -> Result<AlbumRecord, AlbumizerError> {
    let year = guess_year(full_title);

    let title = prompt.confirm_field("Album title", Some(full_title))?;
    let year = prompt.confirm_field("Year", year.as_deref())?;
    let artist = prompt.confirm_field("Artist", None)?;
    let genre = prompt.confirm_field("Genre", Some(DEFAULT_GENRE))?;

    Ok(AlbumRecord {
        title,
        year,
        artist,
        genre,
        num_tracks: tracks.len(),
    })
}
