// src/env/workdir.rs

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::errors::{KeepaliveError, Result};
use crate::fs::FileSystem;

/// Check that `path` is an existing, accessible directory and return its
/// canonical form.
pub fn resolve_working_directory(fs: &dyn FileSystem, path: &Path) -> Result<PathBuf> {
    let failure = |reason: String| KeepaliveError::WorkingDirectory {
        path: path.to_path_buf(),
        reason,
    };

    if !fs.exists(path) {
        return Err(failure("directory does not exist".to_string()));
    }

    if !fs.is_dir(path) {
        return Err(failure("path is not a directory".to_string()));
    }

    let resolved = fs
        .canonicalize(path)
        .map_err(|e| failure(format!("{e:#}")))?;

    debug!(requested = %path.display(), resolved = %resolved.display(), "working directory resolved");
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::MockFileSystem;

    #[test]
    fn existing_directory_resolves() {
        let fs = MockFileSystem::new();
        fs.add_dir("/srv/app");

        let resolved = resolve_working_directory(&fs, Path::new("/srv/app")).unwrap();
        assert_eq!(resolved, PathBuf::from("/srv/app"));
    }

    #[test]
    fn missing_directory_is_fatal() {
        let fs = MockFileSystem::new();

        let err = resolve_working_directory(&fs, Path::new("/nowhere")).unwrap_err();
        assert!(err.is_startup_failure());
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn file_is_not_a_working_directory() {
        let fs = MockFileSystem::new();
        fs.add_file("/srv/app.toml");

        let err = resolve_working_directory(&fs, Path::new("/srv/app.toml")).unwrap_err();
        assert!(matches!(err, KeepaliveError::WorkingDirectory { ref reason, .. } if reason.contains("not a directory")));
    }

    #[test]
    fn inaccessible_directory_is_fatal() {
        let fs = MockFileSystem::new();
        fs.add_dir("/root/private");
        fs.deny_canonicalize("/root/private");

        let err = resolve_working_directory(&fs, Path::new("/root/private")).unwrap_err();
        assert!(err.to_string().contains("Permission denied"));
    }
}
