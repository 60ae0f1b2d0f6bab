//! Decides which files are transformed.

use std::path::Path;

use glob::Pattern;

use crate::Options;
use crate::error::Result;

/// Extension allow-list plus glob ignore-list.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    ignore: Vec<Pattern>,
}

impl FileFilter {
    /// # Errors
    ///
    /// * If an ignore pattern is not a valid glob
    pub fn new<S: AsRef<str>>(extensions: &[S], ignore: &[S]) -> Result<Self> {
        Ok(Self {
            extensions: extensions
                .iter()
                .map(|ext| ext.as_ref().trim_start_matches('.').to_ascii_lowercase())
                .collect(),
            ignore: ignore
                .iter()
                .map(|pattern| Pattern::new(pattern.as_ref()))
                .collect::<std::result::Result<_, _>>()?,
        })
    }

    /// # Errors
    ///
    /// * If an ignore pattern is not a valid glob
    pub fn from_options(options: &Options) -> Result<Self> {
        Self::new(&options.extensions, &options.ignore)
    }

    /// Whether `path` should be transformed. Ignore patterns are matched
    /// against the path as given, so pass paths relative to the scan root.
    pub fn accepts(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|ext| ext.to_str()) else {
            return false;
        };
        let ext = ext.to_ascii_lowercase();

        self.extensions.contains(&ext)
            && !self.ignore.iter().any(|pattern| pattern.matches_path(path))
    }
}
