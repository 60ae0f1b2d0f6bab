//! Writes the registry to a markup file that a class scanner can read.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::registry::ClassRegistry;

const HEADER: &str = "<!-- generated by modattr; do not edit -->";

/// Render `classes` as a minimal markup document, one class per line.
///
/// The output depends only on the set of classes, so rewriting an unchanged
/// registry produces identical bytes.
pub fn render_artifact(classes: &BTreeSet<String>) -> String {
    if classes.is_empty() {
        return format!("{HEADER}\n<div class=\"\"></div>\n");
    }

    let mut out = String::with_capacity(64 + classes.iter().map(|c| c.len() + 3).sum::<usize>());
    out.push_str(HEADER);
    out.push_str("\n<div class=\"\n");
    for class in classes {
        out.push_str("  ");
        out.push_str(class);
        out.push('\n');
    }
    out.push_str("\"></div>\n");
    out
}

/// Keeps the artifact file in step with a [`ClassRegistry`].
///
/// The last rendered document is kept, so a registry that changed without
/// changing size (after [`ClassRegistry::clear`] or [`ClassRegistry::forget`])
/// is still written.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    path: PathBuf,
    written: Option<String>,
}

impl ArtifactWriter {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            written: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the artifact if its contents differ from the last write.
    ///
    /// The first call always writes. Returns whether the file was written.
    ///
    /// # Errors
    ///
    /// * If the artifact or its parent directory cannot be written
    pub fn sync(&mut self, registry: &ClassRegistry) -> Result<bool> {
        let rendered = render_artifact(registry.classes());
        if self.written.as_deref() == Some(rendered.as_str()) {
            return Ok(false);
        }

        self.write(rendered, registry.len())?;
        Ok(true)
    }

    /// Write the artifact unconditionally.
    ///
    /// # Errors
    ///
    /// * If the artifact or its parent directory cannot be written
    pub fn force_write(&mut self, registry: &ClassRegistry) -> Result<()> {
        self.write(render_artifact(registry.classes()), registry.len())
    }

    fn write(&mut self, rendered: String, count: usize) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
        }

        // A failed write leaves nothing cached, so the next sync retries.
        self.written = None;
        fs::write(&self.path, &rendered).map_err(|e| Error::io(&self.path, e))?;
        self.written = Some(rendered);

        log::debug!("wrote {count} classes to {}", self.path.display());
        Ok(())
    }
}

/// Make sure `entry` is listed in `dir/.gitignore`, creating the file if needed.
///
/// Returns `true` if the file was changed.
///
/// # Errors
///
/// * If the `.gitignore` cannot be read or written
pub fn ensure_gitignored(dir: &Path, entry: &str) -> Result<bool> {
    let path = dir.join(".gitignore");
    let existing = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => return Err(Error::io(&path, e)),
    };

    let listed = existing.lines().map(str::trim).any(|line| {
        line == entry || line.strip_prefix('/') == Some(entry)
    });
    if listed {
        return Ok(false);
    }

    let mut updated = existing;
    if !updated.is_empty() && !updated.ends_with('\n') {
        updated.push('\n');
    }
    updated.push_str(entry);
    updated.push('\n');

    fs::write(&path, updated).map_err(|e| Error::io(&path, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn registry(items: &[&str]) -> ClassRegistry {
        let classes: BTreeSet<String> = items.iter().map(|s| (*s).to_string()).collect();
        let mut registry = ClassRegistry::new();
        registry.record("a.svelte", &classes);
        registry
    }

    #[test]
    fn test_render_sorted() {
        let rendered = render_artifact(registry(&["sm:b", "hover:a"]).classes());
        assert_eq!(
            rendered,
            "<!-- generated by modattr; do not edit -->\n<div class=\"\n  hover:a\n  sm:b\n\"></div>\n"
        );
    }

    #[test]
    fn test_render_empty() {
        assert_eq!(
            render_artifact(&BTreeSet::new()),
            "<!-- generated by modattr; do not edit -->\n<div class=\"\"></div>\n"
        );
    }

    #[test]
    fn test_sync_writes_only_on_change() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/out.html");
        let mut writer = ArtifactWriter::new(&path);
        let mut registry = registry(&["sm:a"]);

        assert!(writer.sync(&registry).unwrap());
        assert!(!writer.sync(&registry).unwrap());

        registry.record("b.svelte", &BTreeSet::from(["md:b".to_string()]));
        assert!(writer.sync(&registry).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("  md:b\n"));
    }

    #[test]
    fn test_sync_rewrites_same_size_registry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut writer = ArtifactWriter::new(&path);
        let mut registry = registry(&["hover:x"]);
        assert!(writer.sync(&registry).unwrap());

        registry.forget(Path::new("a.svelte"));
        registry.record("b.svelte", &BTreeSet::from(["focus:y".to_string()]));
        assert_eq!(registry.len(), 1);

        assert!(writer.sync(&registry).unwrap());
        let rendered = fs::read_to_string(&path).unwrap();
        assert!(rendered.contains("  focus:y\n"));
        assert!(!rendered.contains("hover:x"));
    }

    #[test]
    fn test_sync_after_clear_and_rerecord() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut writer = ArtifactWriter::new(&path);
        let mut registry = registry(&["sm:a", "sm:b"]);
        assert!(writer.sync(&registry).unwrap());

        registry.clear();
        registry.record("a.svelte", &BTreeSet::from(["md:a".to_string(), "md:b".to_string()]));
        assert!(writer.sync(&registry).unwrap());
        assert_eq!(fs::read_to_string(&path).unwrap(), render_artifact(registry.classes()));
        assert!(!writer.sync(&registry).unwrap());
    }

    #[test]
    fn test_force_write_restores_deleted_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.html");
        let mut writer = ArtifactWriter::new(&path);
        let registry = registry(&["sm:a"]);
        writer.sync(&registry).unwrap();

        fs::remove_file(&path).unwrap();
        assert!(!writer.sync(&registry).unwrap());
        writer.force_write(&registry).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("  sm:a\n"));
    }

    #[test]
    fn test_gitignore_created_and_appended_once() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ensure_gitignored(dir.path(), "modifier-classes.html").unwrap());
        assert!(!ensure_gitignored(dir.path(), "modifier-classes.html").unwrap());
        assert_eq!(
            fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
            "modifier-classes.html\n"
        );
    }

    #[test]
    fn test_gitignore_keeps_existing_lines() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "node_modules").unwrap();
        assert!(ensure_gitignored(dir.path(), "out.html").unwrap());
        assert_eq!(
            fs::read_to_string(dir.path().join(".gitignore")).unwrap(),
            "node_modules\nout.html\n"
        );
    }

    #[test]
    fn test_gitignore_accepts_rooted_entry() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(".gitignore"), "/out.html\n").unwrap();
        assert!(!ensure_gitignored(dir.path(), "out.html").unwrap());
    }
}
