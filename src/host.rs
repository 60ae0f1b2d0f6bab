//! File-tree driver: the part a build tool plugin would normally own.
//!
//! Walks a source tree, transforms every accepted file, feeds the generated
//! classes into a [`ClassRegistry`] and keeps the artifact in step with it.
//! A file that cannot be processed is logged and passed through unmodified.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::artifact::{ArtifactWriter, ensure_gitignored};
use crate::error::{Error, Result};
use crate::filter::FileFilter;
use crate::registry::ClassRegistry;
use crate::{Options, Pipeline};

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The file contained modifier or duplicate attributes and was rewritten
    Transformed,
    /// Nothing to rewrite
    Unchanged,
    /// The file could not be processed and was passed through as-is
    Failed,
}

/// Totals for one run over a tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub transformed: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub classes: usize,
}

impl Summary {
    pub fn files(&self) -> usize {
        self.transformed + self.unchanged + self.failed
    }
}

/// One build over a source tree.
#[derive(Debug)]
pub struct Build {
    pipeline: Pipeline,
    filter: FileFilter,
    registry: ClassRegistry,
    writer: ArtifactWriter,
    gitignore: bool,
}

impl Build {
    /// # Errors
    ///
    /// * If an ignore pattern is not a valid glob
    /// * If an attribute pattern fails to compile
    pub fn new(options: Options) -> Result<Self> {
        Ok(Self {
            filter: FileFilter::from_options(&options)?,
            writer: ArtifactWriter::new(&options.artifact),
            gitignore: options.gitignore,
            pipeline: Pipeline::new(options)?,
            registry: ClassRegistry::new(),
        })
    }

    pub fn registry(&self) -> &ClassRegistry {
        &self.registry
    }

    pub fn artifact(&self) -> &Path {
        self.writer.path()
    }

    /// Accepted files under `root`, relative to it and sorted.
    pub fn collect_files(&self, root: &Path) -> Vec<PathBuf> {
        // The artifact may live inside the tree; never treat it as a source.
        let artifact = fs::canonicalize(self.writer.path()).ok();

        let mut files: Vec<PathBuf> = WalkDir::new(root)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .filter(|e| {
                artifact
                    .as_deref()
                    .is_none_or(|a| fs::canonicalize(e.path()).ok().as_deref() != Some(a))
            })
            .filter_map(|e| e.path().strip_prefix(root).ok().map(Path::to_path_buf))
            .filter(|rel| self.filter.accepts(rel))
            .collect();

        files.sort();
        files
    }

    /// Transform every accepted file under `root`.
    ///
    /// With `out_dir`, transformed files are written to the same relative
    /// path under it; without, only the registry and artifact are updated.
    /// `on_file` is called once per file.
    ///
    /// # Errors
    ///
    /// * If the artifact or `.gitignore` cannot be written
    pub fn run(
        &mut self,
        root: &Path,
        out_dir: Option<&Path>,
        mut on_file: impl FnMut(&Path, FileStatus),
    ) -> Result<Summary> {
        self.registry.clear();
        let mut summary = Summary::default();

        for rel in self.collect_files(root) {
            // The artifact is synced once below, so its errors never fail a file.
            let status = match self.transform_file(root, &rel, out_dir) {
                Ok(status) => status,
                Err(e) => {
                    log::error!("{e}; leaving {} unmodified", rel.display());
                    if let Some(out_dir) = out_dir {
                        pass_through(&root.join(&rel), &out_dir.join(&rel));
                    }
                    FileStatus::Failed
                }
            };

            match status {
                FileStatus::Transformed => summary.transformed += 1,
                FileStatus::Unchanged => summary.unchanged += 1,
                FileStatus::Failed => summary.failed += 1,
            }
            on_file(&rel, status);
        }

        self.writer.sync(&self.registry)?;
        if self.gitignore {
            self.ignore_artifact()?;
        }

        summary.classes = self.registry.len();
        Ok(summary)
    }

    /// Transform one file and record its classes. The artifact is rewritten
    /// as soon as the registry grows.
    ///
    /// # Errors
    ///
    /// * If the file cannot be read or is not UTF-8
    /// * If the output or artifact cannot be written
    pub fn process_file(
        &mut self,
        root: &Path,
        rel: &Path,
        out_dir: Option<&Path>,
    ) -> Result<FileStatus> {
        let before = self.registry.len();
        let status = self.transform_file(root, rel, out_dir)?;
        if self.registry.len() != before {
            self.writer.sync(&self.registry)?;
        }
        Ok(status)
    }

    fn transform_file(
        &mut self,
        root: &Path,
        rel: &Path,
        out_dir: Option<&Path>,
    ) -> Result<FileStatus> {
        let path = root.join(rel);
        let bytes = fs::read(&path).map_err(|e| Error::io(&path, e))?;
        let source = String::from_utf8(bytes).map_err(|_| Error::NotUtf8 { path: path.clone() })?;

        let result = self.pipeline.transform_path(rel, &source);

        if let Some(out_dir) = out_dir {
            write_creating_parents(&out_dir.join(rel), &result.code)?;
        }

        self.registry.record(rel, &result.modifier_classes);

        log::debug!(
            "{}: {} classes, {} generated",
            rel.display(),
            result.classes.len(),
            result.modifier_classes.len()
        );

        Ok(if result.changed {
            FileStatus::Transformed
        } else {
            FileStatus::Unchanged
        })
    }

    fn ignore_artifact(&self) -> Result<bool> {
        let path = self.writer.path();
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return Ok(false);
        };
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or(Path::new("."));

        ensure_gitignored(dir, name)
    }
}

fn write_creating_parents(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| Error::io(path, e))
}

fn pass_through(from: &Path, to: &Path) {
    let copied = to
        .parent()
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::copy(from, to));

    if let Err(e) = copied {
        log::error!("could not copy {} to {}: {e}", from.display(), to.display());
    }
}
