use std::path::Path;
use thiserror::Error;

pub type ModResult<T> = Result<T, ModError>;

#[derive(Error, Debug)]
pub enum ModError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("WalkDir error: {0}")]
    WalkDir(#[from] walkdir::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Format mismatch: {0}")]
    FormatMismatch(String),

    #[error("Path error: {0}")]
    Path(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Archive error: {0}")]
    Archive(String),

    #[error("Duplicate mod: {0}")]
    Duplicate(String),

    #[error("Mod list is locked: {0}")]
    Locked(String),

    #[error("Cancelled: {0}")]
    Cancelled(String),

    #[error("Background task failed: {0}")]
    Task(String),

    #[error("Persisted {written} of {total} record(s) before failing: {source}")]
    PartialWrite {
        written: usize,
        total: usize,
        source: Box<ModError>,
    },
}

impl ModError {
    /// Classify an I/O failure against the path that caused it.
    ///
    /// A missing file becomes `NotFound`; anything else stays an `Io` failure.
    pub fn io(path: &Path, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            ModError::NotFound(path.display().to_string())
        } else {
            ModError::Io(err)
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ModError::NotFound(_))
    }

    pub fn is_format_mismatch(&self) -> bool {
        matches!(self, ModError::FormatMismatch(_))
    }
}
