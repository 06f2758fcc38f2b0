//! Source reader abstraction for checks.
//!
//! Checks never touch the filesystem directly. They receive a `SourceReader`
//! that answers existence questions, lists files, returns cached contents and
//! exposes the project's `.env` values.

pub mod env;
#[cfg(test)]
pub mod mock;

#[cfg(test)]
pub use mock::MockSource;

use anyhow::Context;
use dashmap::DashMap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::{debug, warn};

/// A file inside the scanned project
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SourceFile {
    /// Path relative to the project root, `/`-separated
    pub relative: String,
    /// Absolute (or root-joined) path
    pub path: PathBuf,
}

impl SourceFile {
    pub fn new(root: &Path, relative: impl Into<String>) -> Self {
        let relative = relative.into();
        let path = root.join(&relative);
        Self { relative, path }
    }

    /// Final path component
    pub fn file_name(&self) -> &str {
        self.relative.rsplit('/').next().unwrap_or(&self.relative)
    }

    /// True when the file name ends with `suffix` (e.g. `.php`, `.blade.php`)
    pub fn has_suffix(&self, suffix: &str) -> bool {
        self.file_name().ends_with(suffix)
    }
}

/// Trait for providing project files and configuration to checks.
///
/// Implementations must be `Send + Sync` so a single reader can be shared
/// across rayon workers. All relative paths use `/` separators and are
/// resolved against [`SourceReader::root`].
pub trait SourceReader: Send + Sync {
    /// The project root path.
    fn root(&self) -> &Path;

    /// Whether a file or directory exists at `rel`.
    fn exists(&self, rel: &str) -> bool;

    /// Every file below `rel_dir`, recursively, sorted by path. Dot-files and
    /// dot-directories are skipped. A missing directory yields nothing.
    fn all_files(&self, rel_dir: &str) -> Vec<SourceFile>;

    /// Direct children of `rel_dir` that are files, sorted by path.
    fn files(&self, rel_dir: &str) -> Vec<SourceFile>;

    /// Read (or return cached) file content.
    fn read(&self, file: &SourceFile) -> anyhow::Result<Arc<String>>;

    /// A value from the project's `.env` file.
    fn env(&self, key: &str) -> Option<String>;

    /// Recursive listing filtered by file-name suffix.
    fn files_with_suffix(&self, rel_dir: &str, suffix: &str) -> Vec<SourceFile> {
        self.all_files(rel_dir)
            .into_iter()
            .filter(|f| f.has_suffix(suffix))
            .collect()
    }

    /// Content of the file at `rel`, or `None` when it does not exist.
    fn read_path(&self, rel: &str) -> anyhow::Result<Option<Arc<String>>> {
        let rel = normalize(rel);
        if !self.exists(rel) {
            return Ok(None);
        }
        self.read(&SourceFile::new(self.root(), rel)).map(Some)
    }
}

/// Strip leading/trailing separators so `"app/"` and `"app"` agree
pub(crate) fn normalize(rel: &str) -> &str {
    rel.trim_matches('/')
}

/// Filesystem-backed reader with a shared content cache
pub struct ProjectSource {
    root: PathBuf,
    contents: DashMap<PathBuf, Arc<String>>,
    dotenv: OnceLock<HashMap<String, String>>,
}

impl ProjectSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            contents: DashMap::new(),
            dotenv: OnceLock::new(),
        }
    }

    fn resolve(&self, rel: &str) -> PathBuf {
        let rel = normalize(rel);
        if rel.is_empty() {
            self.root.clone()
        } else {
            self.root.join(rel)
        }
    }

    fn relative_of(&self, path: &Path) -> Option<String> {
        let rel = path.strip_prefix(&self.root).ok()?;
        let parts: Vec<String> = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy().into_owned())
            .collect();
        Some(parts.join("/"))
    }

    fn dotenv(&self) -> &HashMap<String, String> {
        self.dotenv.get_or_init(|| {
            let path = self.root.join(".env");
            if !path.is_file() {
                debug!("No .env file at {}", path.display());
                return HashMap::new();
            }
            match env::load_dotenv(&path) {
                Ok(values) => {
                    debug!("Loaded {} values from {}", values.len(), path.display());
                    values
                }
                Err(e) => {
                    warn!("Could not load {}: {:#}", path.display(), e);
                    HashMap::new()
                }
            }
        })
    }
}

fn is_hidden(name: &str) -> bool {
    name.starts_with('.')
}

impl SourceReader for ProjectSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, rel: &str) -> bool {
        self.resolve(rel).exists()
    }

    fn all_files(&self, rel_dir: &str) -> Vec<SourceFile> {
        let dir = self.resolve(rel_dir);
        if !dir.is_dir() {
            return Vec::new();
        }

        let walker = ignore::WalkBuilder::new(&dir)
            .hidden(true)
            .ignore(false)
            .git_ignore(false)
            .git_global(false)
            .git_exclude(false)
            .parents(false)
            .follow_links(false)
            .build();

        let mut files: Vec<SourceFile> = walker
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter_map(|e| {
                let relative = self.relative_of(e.path())?;
                Some(SourceFile {
                    relative,
                    path: e.path().to_path_buf(),
                })
            })
            .collect();
        files.sort();
        files
    }

    fn files(&self, rel_dir: &str) -> Vec<SourceFile> {
        let dir = self.resolve(rel_dir);
        let Ok(entries) = std::fs::read_dir(&dir) else {
            return Vec::new();
        };

        let mut files: Vec<SourceFile> = entries
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
            .filter(|e| !is_hidden(&e.file_name().to_string_lossy()))
            .filter_map(|e| {
                let path = e.path();
                let relative = self.relative_of(&path)?;
                Some(SourceFile { relative, path })
            })
            .collect();
        files.sort();
        files
    }

    fn read(&self, file: &SourceFile) -> anyhow::Result<Arc<String>> {
        if let Some(content) = self.contents.get(&file.path) {
            return Ok(Arc::clone(&content));
        }

        let bytes = std::fs::read(&file.path)
            .with_context(|| format!("Failed to read {}", file.path.display()))?;
        let content = Arc::new(String::from_utf8_lossy(&bytes).into_owned());
        self.contents.insert(file.path.clone(), Arc::clone(&content));
        Ok(content)
    }

    fn env(&self, key: &str) -> Option<String> {
        self.dotenv().get(key).cloned()
    }
}
