use std::path::PathBuf;

use thiserror::Error;

/// Malformed evaluation input. Raised before any check runs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    #[error("article is missing required field `{field}`")]
    MissingField { field: &'static str },

    #[error("article body contains no sentences")]
    NoSentences,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config value `{field}`: {reason}")]
    Invalid { field: String, reason: String },

    #[error("duplicate check id `{0}` in catalog")]
    DuplicateCheck(String),
}

/// A single check could not compute its metric. Never escapes the evaluator:
/// it becomes a `fail` result for that check only.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CheckError {
    #[error("catalog entry `{check}` has no `{bound}` bound")]
    MissingBound { check: String, bound: &'static str },

    #[error("metric undefined: {0}")]
    Undefined(&'static str),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GateError {
    #[error("export blocked: {}", reasons.join("; "))]
    ExportBlocked { reasons: Vec<String> },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, Error>;
