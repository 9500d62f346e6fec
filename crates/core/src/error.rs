use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which input document an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    Graph,
    Rules,
    Labels,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Graph => write!(f, "Graph"),
            InputKind::Rules => write!(f, "Rules"),
            InputKind::Labels => write!(f, "Labels"),
        }
    }
}

#[derive(Error, Debug)]
pub enum ScreeningError {
    #[error("{kind} file not found: {}", path.display())]
    InputNotFound { kind: InputKind, path: PathBuf },

    #[error("{kind} file {} is not valid: {source}", path.display())]
    MalformedInput {
        kind: InputKind,
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(String),
}

pub type Result<T> = std::result::Result<T, ScreeningError>;
