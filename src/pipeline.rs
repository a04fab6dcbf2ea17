//!
//! src/pipeline.rs
//!
//! Sequences the run: probe metadata, infer the listing, confirm the
//! album, download, then cut one output file per track. Single
//! control thread; any failure terminates the run immediately
//!
//!

use std::path::PathBuf;

use tracing::{info, warn};
use url::Url;

use crate::album::resolve_album;
use crate::config::{AUDIO_FORMAT, AppConfig};
use crate::errors::AlbumizerError;
use crate::extract::extract_tracks;
use crate::prompt::Prompt;
use crate::runner::ProcessRunner;
use crate::tools::{Downloader, MetadataProbe, Segmenter};
use crate::types::TrackRecord;

/// Per-run switches carried from the CLI.
#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub verbose: bool,
    pub skip_download: bool,
    pub embed_tags: bool,
}

pub struct Pipeline<'a> {
    cfg: &'a AppConfig,
    runner: &'a dyn ProcessRunner,
    prompt: &'a dyn Prompt,
    opts: RunOptions,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        cfg: &'a AppConfig,
        runner: &'a dyn ProcessRunner,
        prompt: &'a dyn Prompt,
        opts: RunOptions,
    ) -> Self {
        Self {
            cfg,
            runner,
            prompt,
            opts,
        }
    }

    /// Run the whole pipeline for one source URL, returning the paths
    /// written (or merely planned, in skip-download mode).
    pub async fn run(&self, url: &Url) -> Result<Vec<PathBuf>, AlbumizerError> {
        if !self.opts.output_dir.is_dir() {
            return Err(AlbumizerError::Config(format!(
                "output directory '{}' does not exist",
                self.opts.output_dir.display()
            )));
        }

        info!("loading metadata");
        let probe = MetadataProbe::new(&self.cfg.tools);
        let metadata = probe.probe(self.runner, url).await?;

        info!("checking for track listing");
        let tracks = extract_tracks(&metadata.description);
        if tracks.is_empty() {
            warn!("no track listing found in the description");
            let go_on = self
                .prompt
                .confirm("No track listing found; continue with zero tracks?", false)?;
            if !go_on {
                return Err(AlbumizerError::Config(
                    "no track listing found in the description".to_string(),
                ));
            }
        }

        // Confirmation happens before any download or segmentation;
        // the album record never changes once tagging starts.
        let album = resolve_album(metadata.full_title(), &tracks, self.prompt)?;

        let planned: Vec<PathBuf> = tracks.iter().map(|t| self.output_path(t)).collect();

        if self.opts.skip_download {
            info!(tracks = tracks.len(), "plan only, skipping download");
            return Ok(planned);
        }

        info!("downloading");
        let downloader = Downloader::new(&self.cfg.tools, self.opts.verbose);
        let file = downloader.download(self.runner, url).await?;

        info!(tracks = tracks.len(), file = %file.display(), "splitting");
        let segmenter = Segmenter::new(&self.cfg.tools, self.opts.embed_tags);
        for (track, output) in tracks.iter().zip(&planned) {
            segmenter
                .segment(self.runner, &file, &album, track, output)
                .await?;
        }

        Ok(planned)
    }

    fn output_path(&self, track: &TrackRecord) -> PathBuf {
        let name = format!("{}. {}.{AUDIO_FORMAT}", track.number, track.title);
        self.opts.output_dir.join(sanitize_file_name(&name))
    }
}

/// Replace characters the filesystem won't take in a file name.
fn sanitize_file_name(input: &str) -> String {
    input
        .chars()
        .map(|c| match c {
            '/' | '\\' | '?' | '*' | '"' | '<' | '>' | '|' | ':' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;
    use crate::config::{LoggingConfig, ToolConfig};
    use crate::prompt::AcceptDefaults;
    use crate::runner::testing::ScriptedRunner;

    const THREE_TRACKS: &str =
        "01. \\\"Intro\\\" 00:00\\n02. \\\"Main Theme\\\" 03:15\\n03. \\\"Outro\\\" 07:42";

    fn cfg() -> AppConfig {
        AppConfig {
            tools: ToolConfig {
                downloader_path: "yt-dlp".to_string(),
                segmenter_path: "ffmpeg".to_string(),
                timeout: std::time::Duration::from_secs(600),
            },
            logging: LoggingConfig::default(),
        }
    }

    fn opts(output_dir: &Path, skip_download: bool) -> RunOptions {
        RunOptions {
            output_dir: output_dir.to_path_buf(),
            verbose: false,
            skip_download,
            embed_tags: true,
        }
    }

    fn probe_reply(description_escaped: &str) -> Result<crate::runner::ToolOutput, AlbumizerError> {
        ScriptedRunner::stdout(&format!(
            "{{\"fulltitle\": \"Concert 1985\", \"description\": \"{description_escaped}\"}}"
        ))
    }

    fn source_url() -> Url {
        Url::parse("https://example.com/watch?v=abc123").unwrap()
    }

    #[tokio::test]
    async fn full_run_writes_one_file_per_track() {
        let out_dir = tempfile::tempdir().unwrap();
        let media_dir = std::env::temp_dir();
        let media = media_dir.join("Concert-abc123.m4a");
        std::fs::write(&media, b"media").unwrap();

        let runner = ScriptedRunner::new([
            probe_reply(THREE_TRACKS),
            ScriptedRunner::stdout(&format!("[ExtractAudio] Destination: {}\n", media.display())),
            ScriptedRunner::stdout(""),
            ScriptedRunner::stdout(""),
            ScriptedRunner::stdout(""),
        ]);

        let cfg = cfg();
        let pipeline = Pipeline::new(&cfg, &runner, &AcceptDefaults, opts(out_dir.path(), false));
        let written = pipeline.run(&source_url()).await.unwrap();

        assert_eq!(
            written,
            vec![
                out_dir.path().join("01. Intro.m4a"),
                out_dir.path().join("02. Main Theme.m4a"),
                out_dir.path().join("03. Outro.m4a"),
            ]
        );

        let calls = runner.calls.lock().unwrap();
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0].0, "yt-dlp");
        assert_eq!(calls[1].0, "yt-dlp");
        assert_eq!(calls[2].0, "ffmpeg");

        // middle track gets both boundaries, last track runs to the end
        let middle = calls[3].1.join(" ");
        assert!(middle.contains("-ss 03:15 -to 07:42"));
        assert!(middle.contains("-metadata track=2/3"));
        assert!(middle.contains("-metadata album=Concert 1985"));
        assert!(middle.contains("-metadata date=1985"));
        let last = calls[4].1.join(" ");
        assert!(last.contains("-ss 07:42"));
        assert!(!last.contains("-to"));

        let _ = std::fs::remove_file(&media);
    }

    #[tokio::test]
    async fn skip_download_returns_the_plan_without_more_calls() {
        let out_dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new([probe_reply(THREE_TRACKS)]);

        let cfg = cfg();
        let pipeline = Pipeline::new(&cfg, &runner, &AcceptDefaults, opts(out_dir.path(), true));
        let planned = pipeline.run(&source_url()).await.unwrap();

        assert_eq!(planned.len(), 3);
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn zero_tracks_aborts_without_confirmation() {
        let out_dir = tempfile::tempdir().unwrap();
        let runner = ScriptedRunner::new([probe_reply("just chatter, no listing")]);

        let cfg = cfg();
        let pipeline = Pipeline::new(&cfg, &runner, &AcceptDefaults, opts(out_dir.path(), true));
        let err = pipeline.run(&source_url()).await.unwrap_err();

        assert!(matches!(err, AlbumizerError::Config(_)));
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn missing_output_directory_attempts_nothing() {
        let runner = ScriptedRunner::new([]);
        let cfg = cfg();
        let pipeline = Pipeline::new(
            &cfg,
            &runner,
            &AcceptDefaults,
            opts(Path::new("/no/such/directory"), false),
        );
        let err = pipeline.run(&source_url()).await.unwrap_err();

        assert!(matches!(err, AlbumizerError::Config(_)));
        assert!(runner.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn segmenter_failure_stops_mid_album() {
        let out_dir = tempfile::tempdir().unwrap();
        let media = std::env::temp_dir().join("Concert-failing.m4a");
        std::fs::write(&media, b"media").unwrap();

        let runner = ScriptedRunner::new([
            probe_reply(THREE_TRACKS),
            ScriptedRunner::stdout(&format!("[ExtractAudio] Destination: {}\n", media.display())),
            ScriptedRunner::stdout(""),
            Err(AlbumizerError::Tool {
                tool: "ffmpeg".to_string(),
                status: 1,
                output: "bad timestamp".to_string(),
            }),
        ]);

        let cfg = cfg();
        let pipeline = Pipeline::new(&cfg, &runner, &AcceptDefaults, opts(out_dir.path(), false));
        let err = pipeline.run(&source_url()).await.unwrap_err();

        assert!(matches!(err, AlbumizerError::Tool { .. }));
        // one probe, one download, two segment attempts, no skip-and-continue
        assert_eq!(runner.calls.lock().unwrap().len(), 4);

        let _ = std::fs::remove_file(&media);
    }

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(sanitize_file_name("03. AC/DC: Live.m4a"), "03. AC_DC_ Live.m4a");
        assert_eq!(sanitize_file_name("plain.m4a"), "plain.m4a");
    }
}
