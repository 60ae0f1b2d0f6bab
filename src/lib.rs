//! Rewrites modifier attributes into prefixed utility classes.
//!
//! `class:sm:hover="underline"` becomes
//! `class="sm:hover:underline sm:underline hover:underline"`, adjacent
//! `class` attributes are merged into one, and the generated classes are
//! collected so they can be written to an artifact that a class scanner can
//! read.
//!
//! ```
//! use modifier_attrs::{Dialect, Pipeline};
//!
//! let pipeline = Pipeline::standard();
//! let result = pipeline.transform(r#"<p class="p-2" class:hover="underline">"#, Dialect::Class);
//! assert_eq!(result.code, r#"<p class="p-2 hover:underline">"#);
//! assert!(result.modifier_classes.contains("hover:underline"));
//! ```

pub mod artifact;
pub mod error;
pub mod extract;
pub mod filter;
pub mod host;
pub mod merge;
pub mod patterns;
pub mod registry;
pub mod rewrite;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

pub use artifact::{ArtifactWriter, ensure_gitignored, render_artifact};
pub use error::{Error, Result};
pub use extract::{extract, extract_with_depth};
pub use filter::FileFilter;
pub use host::{Build, FileStatus, Summary};
pub use merge::{AttributeMerger, merge_attributes};
pub use patterns::{AttributePatterns, MAX_MODIFIER_DEPTH};
pub use registry::ClassRegistry;
pub use rewrite::{rewrite_modifiers, rewrite_modifiers_with_depth};

/// Configuration for the pipeline and the file host.
///
/// Every field can be set from a JSON config file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Options {
    /// Single-modifier variants emitted per token for nested chains
    pub max_modifier_depth: usize,
    /// File extensions (without the dot) that are transformed
    pub extensions: Vec<String>,
    /// Extensions that use `className` instead of `class`
    pub jsx_extensions: Vec<String>,
    /// Glob patterns for paths that are never transformed
    pub ignore: Vec<String>,
    /// Where the class artifact is written
    pub artifact: PathBuf,
    /// Add the artifact to the `.gitignore` next to it
    pub gitignore: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            max_modifier_depth: MAX_MODIFIER_DEPTH,
            extensions: ["svelte", "vue", "html", "astro", "jsx", "tsx"]
                .map(String::from)
                .to_vec(),
            jsx_extensions: ["jsx", "tsx"].map(String::from).to_vec(),
            ignore: ["**/node_modules/**", "**/.git/**", "**/dist/**"]
                .map(String::from)
                .to_vec(),
            artifact: PathBuf::from("modifier-classes.html"),
            gitignore: true,
        }
    }
}

impl Options {
    /// Load options from a JSON file.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read
    /// * If the file is not valid JSON for [`Options`]
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(serde_json::from_str(&text)?)
    }

    /// The dialect used for `path`, by extension.
    pub fn dialect_for(&self, path: &Path) -> Dialect {
        let is_jsx = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.jsx_extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)));

        if is_jsx { Dialect::ClassName } else { Dialect::Class }
    }
}

/// Which standard attribute a file uses for classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dialect {
    /// `class` (HTML, Svelte, Vue, Astro)
    Class,
    /// `className` (JSX, TSX)
    ClassName,
}

impl Dialect {
    pub fn attribute(self) -> &'static str {
        match self {
            Dialect::Class => "class",
            Dialect::ClassName => "className",
        }
    }
}

/// Output of transforming one file.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformResult {
    /// The rewritten source
    pub code: String,
    /// Every class found in the file, static or generated
    pub classes: BTreeSet<String>,
    /// Generated classes that belong in the registry
    pub modifier_classes: BTreeSet<String>,
    /// Whether `code` differs from the input
    pub changed: bool,
}

/// Precompiled patterns for one dialect.
#[derive(Debug, Clone)]
struct Stage {
    patterns: AttributePatterns,
    merger: AttributeMerger,
}

impl Stage {
    fn new(dialect: Dialect) -> Result<Self> {
        Ok(Self {
            patterns: AttributePatterns::new(dialect.attribute())?,
            merger: AttributeMerger::new(dialect.attribute())?,
        })
    }
}

/// Runs extract, rewrite and merge over one file at a time.
///
/// A pipeline holds no per-file state, so one instance can serve every file
/// of a build (and can be shared across threads).
#[derive(Debug, Clone)]
pub struct Pipeline {
    options: Options,
    class: Stage,
    class_name: Stage,
}

impl Pipeline {
    /// # Errors
    ///
    /// * If an attribute pattern fails to compile
    pub fn new(options: Options) -> Result<Self> {
        Ok(Self {
            options,
            class: Stage::new(Dialect::Class)?,
            class_name: Stage::new(Dialect::ClassName)?,
        })
    }

    /// A pipeline with default [`Options`].
    pub fn standard() -> Self {
        // The built-in attribute names always produce valid patterns.
        Self::new(Options::default()).unwrap_or_else(|e| unreachable!("{e}"))
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Transform `source`, choosing the dialect from the file extension.
    pub fn transform_path(&self, path: &Path, source: &str) -> TransformResult {
        self.transform(source, self.options.dialect_for(path))
    }

    /// Transform `source` written in `dialect`.
    pub fn transform(&self, source: &str, dialect: Dialect) -> TransformResult {
        let stage = match dialect {
            Dialect::Class => &self.class,
            Dialect::ClassName => &self.class_name,
        };
        let depth = self.options.max_modifier_depth;

        let mut classes = BTreeSet::new();
        let mut derived = BTreeSet::new();
        extract_with_depth(
            source,
            &mut classes,
            &mut derived,
            stage.patterns.style(),
            stage.patterns.modifier(),
            depth,
        );

        let mut modifier_classes = BTreeSet::new();
        let rewritten = rewrite_modifiers_with_depth(
            source,
            &mut modifier_classes,
            stage.patterns.modifier(),
            stage.patterns.name(),
            depth,
        );
        let code = stage.merger.merge(&rewritten);

        log::debug!(
            "transformed {} classes ({} from modifiers, {} registered)",
            classes.len(),
            derived.len(),
            modifier_classes.len()
        );

        TransformResult {
            changed: code != source,
            code,
            classes,
            modifier_classes,
        }
    }
}
