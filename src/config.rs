//!
//! src/config.rs
//!
//! Assembles tool, timeout, and logging configuration from the
//! environment so no collaborator reads process-wide state itself
//!
//!

use std::time;

use crate::errors::AlbumizerError;

/// Defaults for external tool invocation
pub const TOOL_TIMEOUT_SECS: u64 = 600;
pub const AUDIO_FORMAT: &str = "m4a";
pub const DOWNLOAD_OPTS: [&str; 3] = ["-x", "--audio-format", AUDIO_FORMAT];
pub const DOWNLOAD_DEBUG_OPTS: [&str; 2] = ["--write-info-json", "--write-description"];
pub const PROBE_OPTS: [&str; 1] = ["-qj"];

/// Read an env var, falling back to a default when unset or blank
fn env_or(key: &str, default: &str) -> String {
    match std::env::var(key) {
        Ok(v) if !v.trim().is_empty() => v,
        _ => default.to_string(),
    }
}

///
/// Configuration for the external downloader and segmenter binaries
///
#[derive(Debug, Clone)]
pub struct ToolConfig {
    pub downloader_path: String,
    pub segmenter_path: String,
    pub timeout: time::Duration,
}

fn build_tools() -> Result<ToolConfig, AlbumizerError> {
    let downloader_path = env_or("ALBUMIZER_YTDLP", "yt-dlp");
    let segmenter_path = env_or("ALBUMIZER_FFMPEG", "ffmpeg");

    let timeout_secs = match std::env::var("ALBUMIZER_TOOL_TIMEOUT_SECS") {
        Ok(s) => s.parse::<u64>().map_err(|_| {
            AlbumizerError::Config("ALBUMIZER_TOOL_TIMEOUT_SECS must be an integer".to_string())
        })?,
        Err(_) => TOOL_TIMEOUT_SECS,
    };
    if timeout_secs == 0 {
        return Err(AlbumizerError::Config(
            "ALBUMIZER_TOOL_TIMEOUT_SECS must be greater than zero".to_string(),
        ));
    }

    Ok(ToolConfig {
        downloader_path,
        segmenter_path,
        timeout: time::Duration::from_secs(timeout_secs),
    })
}

///
/// Configuration for Logger
///

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub filter_directives: String,
    pub format: LogFormat,
    pub with_ansi: bool,
    pub include_target: bool,
    pub include_file_line: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter_directives: "warn,albumizer=info".to_string(),
            format: LogFormat::Pretty,
            with_ansi: true,
            include_target: false,
            include_file_line: false,
        }
    }
}

///
/// AppConfig holding everything the pipeline collaborators need
///
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub tools: ToolConfig,
    pub logging: LoggingConfig,
}

///
/// Return all environment-derived configuration at program start.
///
pub fn load_config() -> Result<AppConfig, AlbumizerError> {
    dotenvy::dotenv().ok();

    let tools = build_tools()?;
    let logging = LoggingConfig::default();

    Ok(AppConfig { tools, logging })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn env_or_falls_back_on_blank() {
        // key chosen to not collide with anything set in CI
        unsafe { std::env::set_var("ALBUMIZER_TEST_BLANK", "   ") };
        assert_eq!(env_or("ALBUMIZER_TEST_BLANK", "fallback"), "fallback");
        assert_eq!(env_or("ALBUMIZER_TEST_UNSET", "yt-dlp"), "yt-dlp");
    }
}
