use std::path::PathBuf;
use reporec::RecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Rec(#[from] RecError),

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed record {index} in {}: {reason}", .path.display())]
    Format {
        path: PathBuf,
        index: usize,
        reason: String,
    },

    #[error("unknown user `{0}`")]
    UnknownUser(String),
}
