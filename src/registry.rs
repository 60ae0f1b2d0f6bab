//! Cross-file set of generated classes.

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Every modifier-generated class seen during a build, plus which file
/// contributed it.
///
/// The set only grows while files are re-recorded; a class that disappears
/// from an edited file stays registered until [`ClassRegistry::forget`] or
/// [`ClassRegistry::clear`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassRegistry {
    classes: BTreeSet<String>,
    files: BTreeMap<PathBuf, BTreeSet<String>>,
}

impl ClassRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the classes generated for `path`. Returns `true` if the registry grew.
    pub fn record<'a>(
        &mut self,
        path: impl Into<PathBuf>,
        classes: impl IntoIterator<Item = &'a String>,
    ) -> bool {
        let before = self.classes.len();
        let contributed = self.files.entry(path.into()).or_default();

        for class in classes {
            contributed.insert(class.clone());
            self.classes.insert(class.clone());
        }

        self.classes.len() != before
    }

    /// Drop everything `path` contributed (for deleted files). Returns `true` if the registry shrank.
    pub fn forget(&mut self, path: &Path) -> bool {
        if self.files.remove(path).is_none() {
            return false;
        }

        let before = self.classes.len();
        self.classes = self.files.values().flatten().cloned().collect();
        self.classes.len() != before
    }

    /// Forget every file and class (start of a build or an explicit rescan).
    pub fn clear(&mut self) {
        self.classes.clear();
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn contains(&self, class: &str) -> bool {
        self.classes.contains(class)
    }

    /// All registered classes, sorted.
    pub fn classes(&self) -> &BTreeSet<String> {
        &self.classes
    }

    /// Number of files that have been recorded.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn set(items: &[&str]) -> BTreeSet<String> {
        items.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_record_reports_growth() {
        let mut registry = ClassRegistry::new();
        assert!(registry.record("a.svelte", &set(&["hover:x"])));
        assert!(!registry.record("b.svelte", &set(&["hover:x"])));
        assert!(registry.record("b.svelte", &set(&["focus:y"])));
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.file_count(), 2);
    }

    #[test]
    fn test_rerecording_is_idempotent() {
        let mut registry = ClassRegistry::new();
        let classes = set(&["sm:a", "md:b"]);
        registry.record("a.svelte", &classes);
        let snapshot = registry.clone();

        assert!(!registry.record("a.svelte", &classes));
        assert_eq!(registry, snapshot);
    }

    #[test]
    fn test_edits_never_shrink() {
        let mut registry = ClassRegistry::new();
        registry.record("a.svelte", &set(&["sm:a"]));
        registry.record("a.svelte", &set(&["sm:b"]));
        assert_eq!(registry.classes(), &set(&["sm:a", "sm:b"]));
    }

    #[test]
    fn test_forget_keeps_shared_classes() {
        let mut registry = ClassRegistry::new();
        registry.record("a.svelte", &set(&["sm:a", "shared:x"]));
        registry.record("b.svelte", &set(&["shared:x"]));

        assert!(registry.forget(Path::new("a.svelte")));
        assert_eq!(registry.classes(), &set(&["shared:x"]));
        assert!(!registry.forget(Path::new("a.svelte")));
        assert!(registry.forget(Path::new("b.svelte")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_record_tracks_per_file_contribution() {
        let mut registry = ClassRegistry::new();
        registry.record("a.svelte", &set(&["sm:a", "sm:a"]));
        registry.record("a.svelte", &set(&["sm:a", "md:b"]));
        registry.record("b.svelte", &set(&["md:b"]));

        assert_eq!(registry.len(), 2);
        assert!(!registry.forget(Path::new("b.svelte")));
        assert!(registry.forget(Path::new("a.svelte")));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut registry = ClassRegistry::new();
        registry.record("a.svelte", &set(&["sm:a"]));
        registry.clear();
        assert!(registry.is_empty());
        assert_eq!(registry.file_count(), 0);
        assert!(!registry.contains("sm:a"));
    }
}
