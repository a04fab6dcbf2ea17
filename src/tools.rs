//!
//! src/tools.rs
//!
//! Clients for the external collaborators: metadata probe, media
//! downloader, and the ffmpeg segmenter. Each builds its argument
//! vector separately from running it so the construction stays
//! testable without spawning anything
//!
//!

use std::path::{Path, PathBuf};

use serde::Deserialize;
use url::Url;

use crate::config::{DOWNLOAD_DEBUG_OPTS, DOWNLOAD_OPTS, PROBE_OPTS, ToolConfig};
use crate::errors::AlbumizerError;
use crate::runner::ProcessRunner;
use crate::types::{AlbumRecord, TrackRecord};

const ALREADY_DOWNLOADED: &str = " has already been downloaded";

/// Raw metadata as printed by the probe in JSON form.
#[derive(Debug, Clone, Deserialize)]
pub struct ProbeMetadata {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    fulltitle: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl ProbeMetadata {
    pub fn full_title(&self) -> &str {
        self.fulltitle
            .as_deref()
            .or(self.title.as_deref())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct MetadataProbe {
    path: String,
}

impl MetadataProbe {
    pub fn new(cfg: &ToolConfig) -> Self {
        Self {
            path: cfg.downloader_path.clone(),
        }
    }

    pub fn args(&self, url: &Url) -> Vec<String> {
        let mut args: Vec<String> = PROBE_OPTS.iter().map(|s| s.to_string()).collect();
        args.push(url.to_string());
        args
    }

    pub async fn probe(
        &self,
        runner: &dyn ProcessRunner,
        url: &Url,
    ) -> Result<ProbeMetadata, AlbumizerError> {
        let output = runner.run(&self.path, &self.args(url)).await?;
        let metadata: ProbeMetadata = serde_json::from_str(output.stdout.trim())?;
        Ok(metadata)
    }
}

#[derive(Debug, Clone)]
pub struct Downloader {
    path: String,
    tmp_dir: PathBuf,
    verbose: bool,
}

impl Downloader {
    pub fn new(cfg: &ToolConfig, verbose: bool) -> Self {
        Self {
            path: cfg.downloader_path.clone(),
            tmp_dir: std::env::temp_dir(),
            verbose,
        }
    }

    #[cfg(test)]
    fn with_tmp_dir(mut self, tmp_dir: &Path) -> Self {
        self.tmp_dir = tmp_dir.to_path_buf();
        self
    }

    pub fn args(&self, url: &Url) -> Vec<String> {
        let template = self.tmp_dir.join("%(title)s-%(id)s.%(ext)s");
        let mut args: Vec<String> = DOWNLOAD_OPTS.iter().map(|s| s.to_string()).collect();
        args.push("-o".to_string());
        args.push(template.to_string_lossy().to_string());
        if self.verbose {
            args.extend(DOWNLOAD_DEBUG_OPTS.iter().map(|s| s.to_string()));
        }
        args.push(url.to_string());
        args
    }

    /// Fetch the media and return the local file path. The path is
    /// scraped out of the tool chatter: first line mentioning the
    /// temp directory, with the "already downloaded" marker removed so
    /// a re-run lands on the same success contract.
    pub async fn download(
        &self,
        runner: &dyn ProcessRunner,
        url: &Url,
    ) -> Result<PathBuf, AlbumizerError> {
        let output = runner.run(&self.path, &self.args(url)).await?;

        let file_path = locate_in_output(&output.combined(), &self.tmp_dir).ok_or_else(|| {
            AlbumizerError::Lookup("no downloaded file path in tool output".to_string())
        })?;

        if !file_path.exists() {
            return Err(AlbumizerError::Lookup(format!(
                "unable to find tmp file: '{}'",
                file_path.display()
            )));
        }
        Ok(file_path)
    }
}

fn locate_in_output(output: &str, tmp_dir: &Path) -> Option<PathBuf> {
    let prefix = tmp_dir.to_string_lossy();
    for line in output.lines() {
        if let Some(idx) = line.find(prefix.as_ref()) {
            let path = line[idx..].trim_end().replace(ALREADY_DOWNLOADED, "");
            return Some(PathBuf::from(path));
        }
    }
    None
}

#[derive(Debug, Clone)]
pub struct Segmenter {
    path: String,
    embed_tags: bool,
}

impl Segmenter {
    pub fn new(cfg: &ToolConfig, embed_tags: bool) -> Self {
        Self {
            path: cfg.segmenter_path.clone(),
            embed_tags,
        }
    }

    /// Tag pairs for one output file; absent album fields are omitted.
    fn tags(album: &AlbumRecord, track: &TrackRecord) -> Vec<(&'static str, String)> {
        let mut tags = vec![("title", track.title.clone())];

        let number = track.number.trim_start_matches('0');
        let number = if number.is_empty() { "0" } else { number };
        tags.push(("track", format!("{number}/{}", album.num_tracks)));

        if let Some(title) = &album.title {
            tags.push(("album", title.clone()));
        }
        if let Some(year) = &album.year {
            tags.push(("date", year.clone()));
        }
        if let Some(artist) = &album.artist {
            tags.push(("artist", artist.clone()));
        }
        if let Some(genre) = &album.genre {
            tags.push(("genre", genre.clone()));
        }
        tags
    }

    pub fn args(
        &self,
        input: &Path,
        album: &AlbumRecord,
        track: &TrackRecord,
        output: &Path,
    ) -> Vec<String> {
        let mut args = vec![
            "-y".to_string(),
            "-i".to_string(),
            input.to_string_lossy().to_string(),
            "-vn".to_string(),
            "-c".to_string(),
            "copy".to_string(),
        ];

        if self.embed_tags {
            for (key, value) in Self::tags(album, track) {
                args.push("-metadata".to_string());
                args.push(format!("{key}={value}"));
            }
        }

        args.push("-ss".to_string());
        args.push(track.start.clone());
        if let Some(stop) = &track.stop {
            args.push("-to".to_string());
            args.push(stop.clone());
        }
        args.push(output.to_string_lossy().to_string());
        args
    }

    /// Cut one track's time range out of `input` and write it tagged.
    pub async fn segment(
        &self,
        runner: &dyn ProcessRunner,
        input: &Path,
        album: &AlbumRecord,
        track: &TrackRecord,
        output: &Path,
    ) -> Result<(), AlbumizerError> {
        runner
            .run(&self.path, &self.args(input, album, track, output))
            .await?;
        Ok(())
    }
}
