use std::fmt;
use std::path::PathBuf;

/// Error loading data from outside the simulation (config files, zone layouts).
///
/// The simulation itself never fails: bad runtime situations are no-ops.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The file could not be read.
    Io { path: PathBuf, message: String },
    /// The contents were not valid for the expected type.
    Parse { what: &'static str, message: String },
}

impl LoadError {
    pub(crate) fn io(path: impl Into<PathBuf>, err: &std::io::Error) -> Self {
        LoadError::Io {
            path: path.into(),
            message: err.to_string(),
        }
    }

    pub(crate) fn parse(what: &'static str, err: &serde_json::Error) -> Self {
        LoadError::Parse {
            what,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Io { path, message } => {
                write!(f, "failed to read {}: {}", path.display(), message)
            }
            LoadError::Parse { what, message } => write!(f, "invalid {}: {}", what, message),
        }
    }
}

impl std::error::Error for LoadError {}
