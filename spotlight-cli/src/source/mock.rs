//! In-memory source reader for unit tests.

use super::{normalize, SourceFile, SourceReader};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub struct MockSource {
    root: PathBuf,
    files: BTreeMap<String, Arc<String>>,
    dirs: BTreeSet<String>,
    env: HashMap<String, String>,
}

impl MockSource {
    /// Build a mock from `(relative_path, content)` pairs.
    ///
    /// Paths are prefixed with `/mock/repo/` so tests never touch real files.
    pub fn new(entries: Vec<(&str, &str)>) -> Self {
        let files = entries
            .into_iter()
            .map(|(rel, body)| (normalize(rel).to_string(), Arc::new(body.to_string())))
            .collect();
        Self {
            root: PathBuf::from("/mock/repo"),
            files,
            dirs: BTreeSet::new(),
            env: HashMap::new(),
        }
    }

    /// Declare an (empty) directory
    pub fn with_dir(mut self, rel: &str) -> Self {
        self.dirs.insert(normalize(rel).to_string());
        self
    }

    pub fn with_env(mut self, key: &str, value: &str) -> Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    fn under<'a>(&'a self, rel_dir: &str) -> impl Iterator<Item = (&'a String, String)> + 'a {
        let dir = normalize(rel_dir);
        let prefix = if dir.is_empty() {
            String::new()
        } else {
            format!("{dir}/")
        };
        self.files.keys().filter_map(move |key| {
            key.strip_prefix(prefix.as_str())
                .map(|rest| (key, rest.to_string()))
        })
    }
}

impl SourceReader for MockSource {
    fn root(&self) -> &Path {
        &self.root
    }

    fn exists(&self, rel: &str) -> bool {
        let rel = normalize(rel);
        if rel.is_empty() || self.files.contains_key(rel) {
            return true;
        }
        let prefix = format!("{rel}/");
        self.dirs
            .iter()
            .any(|d| d == rel || d.starts_with(&prefix))
            || self.files.keys().any(|k| k.starts_with(&prefix))
    }

    fn all_files(&self, rel_dir: &str) -> Vec<SourceFile> {
        self.under(rel_dir)
            .filter(|(_, rest)| !rest.split('/').any(|part| part.starts_with('.')))
            .map(|(key, _)| SourceFile::new(&self.root, key.clone()))
            .collect()
    }

    fn files(&self, rel_dir: &str) -> Vec<SourceFile> {
        self.under(rel_dir)
            .filter(|(_, rest)| !rest.contains('/') && !rest.starts_with('.'))
            .map(|(key, _)| SourceFile::new(&self.root, key.clone()))
            .collect()
    }

    fn read(&self, file: &SourceFile) -> anyhow::Result<Arc<String>> {
        self.files
            .get(&file.relative)
            .cloned()
            .ok_or_else(|| anyhow::anyhow!("No such mock file: {}", file.relative))
    }

    fn env(&self, key: &str) -> Option<String> {
        self.env.get(key).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_listing() {
        let source = MockSource::new(vec![
            ("app/Models/User.php", "a"),
            ("app/Http/Kernel.php", "b"),
            ("app/.git/config", "c"),
        ])
        .with_dir("app/Services");

        assert!(source.exists("app"));
        assert!(source.exists("app/Services"));
        assert!(source.exists("app/Models/User.php"));
        assert!(!source.exists("app/Mod"));
        assert_eq!(source.all_files("app").len(), 2);
        assert!(source.files("app").is_empty());
        assert_eq!(source.files("app/Models")[0].relative, "app/Models/User.php");
        assert_eq!(source.read_path("app/Http/Kernel.php").unwrap().unwrap().as_str(), "b");
    }
}
