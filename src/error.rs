use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("owner file {path} unreadable: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("owner file {path} malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("usage: blockguard <config.yaml> [events-file]")]
    Usage,
    #[error("config {path} unreadable: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("config {path} invalid yaml: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("config invalid: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EventParseError {
    #[error("unknown event kind '{0}'")]
    UnknownKind(String),
    #[error("missing {0}")]
    Missing(&'static str),
    #[error("expected integer {label}, got '{value}'")]
    InvalidCoordinate { label: &'static str, value: String },
    #[error("unexpected trailing input '{0}'")]
    Trailing(String),
    #[error("empty actor identity")]
    EmptyActor,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("logging init failed: {0}")]
    Logging(String),
    #[error("events input {path} unreadable: {source}")]
    Input {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("output write failed: {0}")]
    Output(#[source] std::io::Error),
}
