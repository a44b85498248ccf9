/// Extension-based file categorization.
///
/// A file's category is its extension, lower-cased and without the leading dot.
/// Files without an extension fall into the empty-string category, whose
/// destination directory is the organized root itself.
///
/// # Examples
///
/// ```
/// use extsort::file_category::Category;
/// use std::path::Path;
///
/// assert_eq!(Category::of(Path::new("notes/b.TXT")).as_str(), "txt");
/// assert_eq!(Category::of(Path::new("archive.tar.gz")).as_str(), "gz");
/// assert!(Category::of(Path::new("Makefile")).is_empty());
/// assert!(Category::of(Path::new(".bashrc")).is_empty());
/// ```
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Label used wherever the empty-string category has to be shown to a person.
pub const NO_EXTENSION_LABEL: &str = "(no extension)";

/// The lower-case extension a file is sorted under.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Category(String);

impl Category {
    /// Derives the category of a path from its final component.
    pub fn of(path: &Path) -> Self {
        let ext = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();
        Category(ext)
    }

    /// The raw category key; empty for files without an extension.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the destination directory for this category inside `organized_root`.
    pub fn dir_in(&self, organized_root: &Path) -> PathBuf {
        if self.is_empty() {
            organized_root.to_path_buf()
        } else {
            organized_root.join(&self.0)
        }
    }

    /// Returns a human-readable name, substituting a label for the empty category.
    pub fn label(&self) -> &str {
        if self.is_empty() {
            NO_EXTENSION_LABEL
        } else {
            &self.0
        }
    }
}

/// Per-category count of the files moved during one run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    counts: BTreeMap<Category, usize>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one more file under `category`.
    pub fn record(&mut self, category: &Category) {
        *self.counts.entry(category.clone()).or_insert(0) += 1;
    }

    /// Number of files counted under the category with the given key.
    pub fn count(&self, category: &str) -> usize {
        self.counts
            .get(&Category(category.to_string()))
            .copied()
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates categories in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&Category, usize)> {
        self.counts.iter().map(|(category, count)| (category, *count))
    }
}
