//!
//! src/errors.rs
//!
//! Defines enums and methods of error conversion
//! for errors the pipeline uses
//!
//!

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlbumizerError {
    #[error("config error: {0}")]
    Config(String),
    #[error("{tool} exited with status {status}:\n{output}")]
    Tool {
        tool: String,
        status: i32,
        output: String,
    },
    #[error("{tool} did not finish within {secs}s")]
    Timeout { tool: String, secs: u64 },
    #[error("parse error: {0}")]
    Parse(String),
    #[error("not found: {0}")]
    Lookup(String),
    #[error("prompt error: {0}")]
    Prompt(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for AlbumizerError {
    fn from(e: serde_json::Error) -> Self {
        AlbumizerError::Parse(e.to_string())
    }
}
