use std::path::PathBuf;
use thiserror::Error;

pub type BackendResult<T> = Result<T, BackendError>;
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Failures while obtaining a trace from the execution backend
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("could not reach backend: {0}")]
    Transport(String),

    /// Non-2xx response; `detail` is the server's message verbatim
    #[error("backend returned {status}: {detail}")]
    Http { status: u16, detail: String },

    /// The program failed or the language is unsupported
    #[error("{0}")]
    Execution(String),

    #[error("nothing to display: the trace is empty")]
    EmptyTrace,

    #[error("malformed backend response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        BackendError::Transport(err.to_string())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}
