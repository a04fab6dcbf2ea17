//!
//! src/extract.rs
//!
//! Infers the track listing from the free-text description attached
//! to the source. Deliberately a best-effort pattern match, not a
//! strict parser: lines that don't look like a listing entry are
//! silently dropped
//!
//!

use std::sync::LazyLock;

use regex::Regex;

use crate::types::TrackRecord;

/// A listing line: leading track number, a lenient single-character
/// separator, a double-quoted title somewhere after it, then a
/// `MM:SS` or `H:MM:SS` timestamp. Arbitrary text is allowed around
/// the captures so titles with punctuation still match. A title
/// containing an escaped or nested double quote cuts the capture
/// short at the inner quote; known limitation.
static LISTING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^(\d+)..*?"(.*?)".*?(\d+:\d+(?::\d+)?)"#).expect("listing pattern is valid")
});

/// Left-pad a track number with '0' only when shorter than two
/// characters; longer numbers keep their natural width.
fn pad_number(raw: &str) -> String {
    if raw.len() < 2 {
        format!("0{raw}")
    } else {
        raw.to_string()
    }
}

/// Extract the ordered track listing from `description`.
///
/// Order of appearance is authoritative even when the embedded numbers
/// are non-sequential or duplicated; each track's `stop` is the
/// following track's `start`, and the final track's `stop` is `None`
/// ("until end of file"). Timestamps are not validated for
/// monotonicity. An empty result is not an error here; callers decide
/// whether zero tracks is fatal.
pub fn extract_tracks(description: &str) -> Vec<TrackRecord> {
    let mut tracks: Vec<TrackRecord> = description
        .lines()
        .map(str::trim)
        .filter_map(|line| LISTING_LINE.captures(line))
        .map(|caps| TrackRecord {
            number: pad_number(&caps[1]),
            title: caps[2].to_string(),
            start: caps[3].to_string(),
            stop: None,
        })
        .collect();

    let starts: Vec<String> = tracks.iter().skip(1).map(|t| t.start.clone()).collect();
    for (track, next_start) in tracks.iter_mut().zip(starts) {
        track.stop = Some(next_start);
    }

    tracks
}
