// src/fs/mock.rs

use super::FileSystem;
use anyhow::{Result, anyhow};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockEntry {
    File,
    Dir,
}

/// In-memory filesystem for startup tests.
///
/// Paths are stored verbatim; `canonicalize` returns its input unchanged, so
/// tests should use absolute paths. Paths marked with
/// [`MockFileSystem::deny_canonicalize`] exist but fail to resolve, which
/// stands in for permission errors.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    entries: Arc<Mutex<HashMap<PathBuf, MockEntry>>>,
    unresolvable: Arc<Mutex<Vec<PathBuf>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_file(&self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        let mut entries = self.entries.lock().unwrap();
        if let Some(parent) = path.parent() {
            Self::ensure_dirs(&mut entries, parent);
        }
        entries.insert(path.to_path_buf(), MockEntry::File);
    }

    /// Register a directory and all of its ancestors.
    pub fn add_dir(&self, path: impl AsRef<Path>) {
        let mut entries = self.entries.lock().unwrap();
        Self::ensure_dirs(&mut entries, path.as_ref());
    }

    pub fn deny_canonicalize(&self, path: impl AsRef<Path>) {
        self.unresolvable
            .lock()
            .unwrap()
            .push(path.as_ref().to_path_buf());
    }

    fn ensure_dirs(entries: &mut HashMap<PathBuf, MockEntry>, path: &Path) {
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            entries
                .entry(ancestor.to_path_buf())
                .or_insert(MockEntry::Dir);
        }
    }
}

impl FileSystem for MockFileSystem {
    fn exists(&self, path: &Path) -> bool {
        self.entries.lock().unwrap().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(
            self.entries.lock().unwrap().get(path),
            Some(MockEntry::Dir)
        )
    }

    fn canonicalize(&self, path: &Path) -> Result<PathBuf> {
        if self.unresolvable.lock().unwrap().iter().any(|p| p == path) {
            return Err(anyhow!("Permission denied: {:?}", path));
        }
        if !self.exists(path) {
            return Err(anyhow!("File not found: {:?}", path));
        }
        Ok(path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_file_registers_parent_dirs() {
        let fs = MockFileSystem::new();
        fs.add_file("/srv/app/requirements.txt");

        assert!(fs.is_dir(Path::new("/srv/app")));
        assert!(fs.is_dir(Path::new("/srv")));
        assert!(fs.exists(Path::new("/srv/app/requirements.txt")));
        assert!(!fs.is_dir(Path::new("/srv/app/requirements.txt")));
    }

    #[test]
    fn denied_paths_exist_but_do_not_canonicalize() {
        let fs = MockFileSystem::new();
        fs.add_dir("/locked");
        fs.deny_canonicalize("/locked");

        assert!(fs.exists(Path::new("/locked")));
        assert!(fs.canonicalize(Path::new("/locked")).is_err());
    }
}
