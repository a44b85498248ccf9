/// File organization system for sorting files into per-extension directories.
///
/// This module walks a directory tree, classifies every regular file by its
/// extension and moves it into `<root>/Organized/<ext>/`, resolving name clashes
/// either by replacing the existing file or by probing `_1`, `_2`, ... suffixes.
/// Every move is recorded in the run log and counted in the returned [`Summary`].
///
/// The first failure aborts the remaining work. Files moved before the failure
/// stay where they were moved.
use crate::action_log::{ActionLog, LOG_FILE_NAME};
use crate::config::Configuration;
use crate::file_category::{Category, Summary};
use crate::output::OutputFormatter;
use std::collections::{HashMap, HashSet};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the destination directory created under the organized root.
pub const ORGANIZED_DIR_NAME: &str = "Organized";

/// Errors that can occur while walking the tree or moving files.
#[derive(Debug)]
pub enum FilesystemError {
    /// The root directory does not exist or is not a directory.
    InvalidRoot { path: PathBuf, source: io::Error },
    /// Failed to create the organized root or a category directory.
    DirectoryCreationFailed { path: PathBuf, source: io::Error },
    /// Failed to read part of the source tree.
    WalkFailed { path: PathBuf, source: io::Error },
    /// Failed to delete an existing file that was about to be replaced.
    RemoveFailed { path: PathBuf, source: io::Error },
    /// Failed to move a file to its category directory.
    FileMoveFailure {
        source: PathBuf,
        destination: PathBuf,
        source_error: io::Error,
    },
    /// Failed to open the run log.
    LogFileFailed { path: PathBuf, source: io::Error },
}

impl std::fmt::Display for FilesystemError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidRoot { path, source } => {
                write!(f, "Invalid root directory {}: {}", path.display(), source)
            }
            Self::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            Self::WalkFailed { path, source } => {
                write!(f, "Failed to read {}: {}", path.display(), source)
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "Failed to remove {}: {}", path.display(), source)
            }
            Self::FileMoveFailure {
                source,
                destination,
                source_error,
            } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    source.display(),
                    destination.display(),
                    source_error
                )
            }
            Self::LogFileFailed { path, source } => {
                write!(f, "Failed to open log file {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for FilesystemError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidRoot { source, .. }
            | Self::DirectoryCreationFailed { source, .. }
            | Self::WalkFailed { source, .. }
            | Self::RemoveFailed { source, .. }
            | Self::LogFileFailed { source, .. } => Some(source),
            Self::FileMoveFailure { source_error, .. } => Some(source_error),
        }
    }
}

/// Result type for file organization operations.
pub type OrganizeResult<T> = Result<T, FilesystemError>;

/// What currently sits at a candidate destination path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Occupant {
    Vacant,
    File,
    Directory,
}

/// Where a file will land and whether something has to make room for it.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Destination {
    /// Nothing is in the way.
    Free(PathBuf),
    /// An existing file of the same name is replaced.
    Replace(PathBuf),
}

impl Destination {
    fn path(&self) -> &Path {
        match self {
            Destination::Free(path) | Destination::Replace(path) => path,
        }
    }
}

/// Appends `_<n>` to the stem of `name`, keeping its extension.
///
/// `photo.jpg` becomes `photo_1.jpg`; `notes` becomes `notes_1`.
fn suffixed_name(name: &OsStr, n: u64) -> OsString {
    let as_path = Path::new(name);
    let stem = as_path.file_stem().unwrap_or(name);

    let mut out = stem.to_os_string();
    out.push(format!("_{}", n));
    if let Some(ext) = as_path.extension() {
        out.push(".");
        out.push(ext);
    }
    out
}

/// Picks the destination for `source` inside `dir`.
///
/// A free name is used unchanged. When the name is taken by a file, it is either
/// replaced (`overwrite`) or given the first free suffix counting from 1.
/// Directories are never replaced.
fn resolve_destination(
    source: &Path,
    file_name: &OsStr,
    dir: &Path,
    overwrite: bool,
    occupant: impl Fn(&Path) -> Occupant,
) -> Destination {
    let candidate = dir.join(file_name);
    if candidate == source {
        return Destination::Free(candidate);
    }

    match occupant(&candidate) {
        Occupant::Vacant => return Destination::Free(candidate),
        Occupant::File if overwrite => return Destination::Replace(candidate),
        Occupant::File | Occupant::Directory => {}
    }

    Destination::Free(first_free_suffix(file_name, dir, occupant))
}

/// Returns `dir/<stem>_<n><.ext>` for the smallest `n >= 1` that is vacant.
fn first_free_suffix(
    file_name: &OsStr,
    dir: &Path,
    occupant: impl Fn(&Path) -> Occupant,
) -> PathBuf {
    let mut n = 1;
    loop {
        let candidate = dir.join(suffixed_name(file_name, n));
        if occupant(&candidate) == Occupant::Vacant {
            return candidate;
        }
        n += 1;
    }
}

fn disk_occupant(path: &Path) -> Occupant {
    match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => Occupant::Directory,
        Ok(_) => Occupant::File,
        Err(_) => Occupant::Vacant,
    }
}

/// A move the organizer would perform, as reported by a dry run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedMove {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub category: Category,
    /// True when an existing file at `destination` would be replaced.
    pub replaces_existing: bool,
    /// True when `source` is an extension-less file sitting where a category
    /// directory has to be created, and is moved aside to a suffixed name.
    pub clears_category_dir: bool,
}

/// Result of a dry run: every planned move plus the counts it would produce.
#[derive(Debug, Clone, Default)]
pub struct Plan {
    pub moves: Vec<PlannedMove>,
    pub summary: Summary,
}

/// Sorts the files under a root directory into per-extension directories.
#[derive(Debug, Clone)]
pub struct FileOrganizer {
    root: PathBuf,
    config: Configuration,
    include_organized: bool,
    show_progress: bool,
}

impl FileOrganizer {
    /// Creates an organizer for `root` using the given settings.
    ///
    /// By default the `Organized` subtree is left out of the walk and no progress
    /// bar is drawn.
    pub fn new(root: &Path, config: Configuration) -> Self {
        Self {
            root: root.to_path_buf(),
            config,
            include_organized: false,
            show_progress: false,
        }
    }

    /// Also walk files already inside `Organized/` from earlier runs.
    pub fn include_organized(mut self, include: bool) -> Self {
        self.include_organized = include;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// The directory being organized, as given.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The destination root, `<root>/Organized`.
    pub fn organized_root(&self) -> PathBuf {
        self.root.join(ORGANIZED_DIR_NAME)
    }

    /// The run log, `<root>/Organized/organize_log.txt`.
    pub fn log_path(&self) -> PathBuf {
        self.organized_root().join(LOG_FILE_NAME)
    }

    /// Moves every non-skipped file under the root into its category directory.
    ///
    /// Creates the organized root and the run log first, then walks the tree,
    /// moves each file and logs the move. Returns the per-category counts.
    ///
    /// # Errors
    ///
    /// Returns the first `FilesystemError` encountered. The error is also written to
    /// the run log when the log could be opened. Nothing is rolled back.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use extsort::{Configuration, FileOrganizer};
    /// use std::path::Path;
    ///
    /// let summary = FileOrganizer::new(Path::new("/path/to/dir"), Configuration::default())
    ///     .organize()
    ///     .expect("organize failed");
    /// println!("moved {} files", summary.total());
    /// ```
    pub fn organize(&self) -> OrganizeResult<Summary> {
        let root = self.resolve_root()?;
        let organized_root = root.join(ORGANIZED_DIR_NAME);

        fs::create_dir_all(&organized_root).map_err(|e| {
            FilesystemError::DirectoryCreationFailed {
                path: organized_root.clone(),
                source: e,
            }
        })?;

        let log_path = organized_root.join(LOG_FILE_NAME);
        let log = ActionLog::open(&log_path, self.config.log_level).map_err(|e| {
            FilesystemError::LogFileFailed {
                path: log_path.clone(),
                source: e,
            }
        })?;

        log.in_scope(|| {
            let result = self.run(&root, &organized_root, &log_path);
            match &result {
                Ok(summary) => {
                    tracing::info!(
                        "Organization process completed. {} file(s) moved.",
                        summary.total()
                    );
                }
                Err(e) => tracing::error!("Error during organization process: {}", e),
            }
            result
        })
    }

    /// Computes what [`organize`](Self::organize) would do without touching the
    /// filesystem: no directories, no moves, no deletions, no log file.
    pub fn plan(&self) -> OrganizeResult<Plan> {
        let root = self.resolve_root()?;
        let organized_root = root.join(ORGANIZED_DIR_NAME);
        let log_path = organized_root.join(LOG_FILE_NAME);
        let files = self.collect_files(&root, &organized_root, &log_path)?;

        let mut plan = Plan::default();
        // Paths that will hold a moved file, and category directories that will
        // exist, once the planned moves have happened.
        let mut reserved: HashSet<PathBuf> = HashSet::new();
        let mut planned_dirs: HashSet<PathBuf> = HashSet::new();
        let mut relocated: HashMap<PathBuf, PathBuf> = HashMap::new();

        for source in files {
            let source = relocated.get(&source).cloned().unwrap_or(source);
            let category = Category::of(&source);
            if self.config.skips(category.as_str()) {
                continue;
            }
            let Some(file_name) = source.file_name() else {
                continue;
            };

            let occupant = |candidate: &Path| {
                if planned_dirs.contains(candidate) {
                    Occupant::Directory
                } else if reserved.contains(candidate) {
                    Occupant::File
                } else {
                    disk_occupant(candidate)
                }
            };

            let dir = category.dir_in(&organized_root);
            let blocker = (!category.is_empty() && occupant(&dir) == Occupant::File)
                .then(|| {
                    let name = dir.file_name().unwrap_or_default();
                    first_free_suffix(name, &organized_root, occupant)
                });

            let destination = resolve_destination(
                &source,
                file_name,
                &dir,
                self.config.overwrite_existing,
                occupant,
            );
            let replaces_existing = matches!(destination, Destination::Replace(_));
            let destination = destination.path().to_path_buf();

            if let Some(aside) = blocker {
                reserved.remove(&dir);
                reserved.insert(aside.clone());
                relocated.insert(dir.clone(), aside.clone());
                plan.moves.push(PlannedMove {
                    source: dir.clone(),
                    destination: aside,
                    category: Category::of(&dir),
                    replaces_existing: false,
                    clears_category_dir: true,
                });
            }

            reserved.insert(destination.clone());
            planned_dirs.insert(dir);
            plan.summary.record(&category);
            plan.moves.push(PlannedMove {
                source,
                destination,
                category,
                replaces_existing,
                clears_category_dir: false,
            });
        }

        Ok(plan)
    }

    fn resolve_root(&self) -> OrganizeResult<PathBuf> {
        let root = fs::canonicalize(&self.root).map_err(|e| FilesystemError::InvalidRoot {
            path: self.root.clone(),
            source: e,
        })?;
        if !root.is_dir() {
            return Err(FilesystemError::InvalidRoot {
                path: self.root.clone(),
                source: io::Error::new(io::ErrorKind::InvalidInput, "not a directory"),
            });
        }
        Ok(root)
    }

    fn run(&self, root: &Path, organized_root: &Path, log_path: &Path) -> OrganizeResult<Summary> {
        let files = self.collect_files(root, organized_root, log_path)?;
        tracing::debug!("Found {} file(s) under '{}'", files.len(), root.display());

        let pb = OutputFormatter::create_progress_bar(files.len() as u64, self.show_progress);
        let mut summary = Summary::new();
        let mut relocated = HashMap::new();
        let result = files.iter().try_for_each(|source| {
            let source = relocated.get(source).cloned().unwrap_or_else(|| source.clone());
            let moved = self.organize_file(&source, organized_root, &mut summary, &mut relocated);
            pb.inc(1);
            moved
        });
        pb.finish_and_clear();

        result.map(|()| summary)
    }

    /// Collects every regular file under `root` before anything is moved.
    ///
    /// The run log is never collected; the organized subtree only when requested.
    fn collect_files(
        &self,
        root: &Path,
        organized_root: &Path,
        log_path: &Path,
    ) -> OrganizeResult<Vec<PathBuf>> {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| self.include_organized || entry.path() != organized_root);

        let mut files = Vec::new();
        for entry in walker {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| root.to_path_buf());
                FilesystemError::WalkFailed {
                    path,
                    source: io::Error::from(e),
                }
            })?;

            if entry.file_type().is_file() && entry.path() != log_path {
                files.push(entry.into_path());
            }
        }
        Ok(files)
    }

    /// Classifies, moves and counts a single file.
    fn organize_file(
        &self,
        source: &Path,
        organized_root: &Path,
        summary: &mut Summary,
        relocated: &mut HashMap<PathBuf, PathBuf>,
    ) -> OrganizeResult<()> {
        let category = Category::of(source);
        if self.config.skips(category.as_str()) {
            return Ok(());
        }

        let dir = category.dir_in(organized_root);
        if !category.is_empty() && disk_occupant(&dir) == Occupant::File {
            if let Some(aside) = Self::move_aside(&dir, organized_root)? {
                relocated.insert(dir.clone(), aside);
            }
        }
        fs::create_dir_all(&dir).map_err(|e| FilesystemError::DirectoryCreationFailed {
            path: dir.clone(),
            source: e,
        })?;

        let file_name = source
            .file_name()
            .ok_or_else(|| FilesystemError::FileMoveFailure {
                source: source.to_path_buf(),
                destination: dir.clone(),
                source_error: io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "file has no name component",
                ),
            })?;

        let destination = resolve_destination(
            source,
            file_name,
            &dir,
            self.config.overwrite_existing,
            disk_occupant,
        );

        if let Destination::Replace(existing) = &destination {
            fs::remove_file(existing).map_err(|e| FilesystemError::RemoveFailed {
                path: existing.clone(),
                source: e,
            })?;
            tracing::debug!("Removed existing '{}'", existing.display());
        }

        let destination = destination.path();
        fs::rename(source, destination).map_err(|e| FilesystemError::FileMoveFailure {
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
            source_error: e,
        })?;

        let final_name = destination
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        tracing::info!(
            "Moved '{}' to '{}' as '{}'",
            source.display(),
            dir.display(),
            final_name
        );

        summary.record(&category);
        Ok(())
    }

    /// Moves an extension-less file that sits where the category directory `dir`
    /// belongs to the first free suffixed name next to it (`txt` to `txt_1`).
    ///
    /// Returns the file's new path.
    fn move_aside(dir: &Path, organized_root: &Path) -> OrganizeResult<Option<PathBuf>> {
        let Some(name) = dir.file_name() else {
            return Ok(None);
        };
        let aside = first_free_suffix(name, organized_root, disk_occupant);

        fs::rename(dir, &aside).map_err(|e| FilesystemError::FileMoveFailure {
            source: dir.to_path_buf(),
            destination: aside.clone(),
            source_error: e,
        })?;

        let final_name = aside
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();
        tracing::info!(
            "Moved '{}' to '{}' as '{}' to make room for its category directory",
            dir.display(),
            organized_root.display(),
            final_name
        );
        Ok(Some(aside))
    }
}

/// Organizes `root` with `config`, returning the per-category counts.
///
/// Shorthand for `FileOrganizer::new(root, config.clone()).organize()`.
pub fn organize(root: &Path, config: &Configuration) -> OrganizeResult<Summary> {
    FileOrganizer::new(root, config.clone()).organize()
}
