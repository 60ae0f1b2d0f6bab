use std::path::PathBuf;

use thiserror::Error;

/// Errors from building a pipeline or from host-side file handling.
///
/// The rewriting operations themselves never fail; malformed markup degrades
/// to a no-op instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// A file was read but is not valid UTF-8 text.
    #[error("{}: not valid UTF-8", path.display())]
    NotUtf8 { path: PathBuf },
    /// An attribute pattern could not be compiled.
    #[error("Invalid attribute pattern: {0}")]
    Pattern(#[from] regex::Error),
    /// An ignore glob is malformed.
    #[error("Invalid ignore pattern: {0}")]
    Glob(#[from] glob::PatternError),
    /// The configuration file is not valid JSON for [`crate::Options`].
    #[error("Invalid config: {0}")]
    Config(#[from] serde_json::Error),
    /// An attribute name is empty or contains characters that cannot start a markup attribute.
    #[error("Invalid attribute name: {0:?}")]
    AttributeName(String),
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
