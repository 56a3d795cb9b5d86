//! Scratch-file lifecycle.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log;
use rand::Rng;

/// Owns a filesystem path and deletes it when dropped.
///
/// Construction creates the parent directories and an empty file, so the
/// path exists for the guard's whole lifetime. Deletion runs on normal
/// scope exit and on unwind alike; a failed deletion is logged, never
/// panicked on. Ownership moves with the value, so a path is deleted
/// exactly once no matter how the guard travels.
#[derive(Debug)]
pub struct FileGuard {
    path: PathBuf,
}

impl FileGuard {
    /// Creates an empty file at `path`, and any missing parent
    /// directories, and guards it.
    pub fn new<P: Into<PathBuf>>(path: P) -> io::Result<FileGuard> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::File::create(&path)?;
        Ok(FileGuard { path })
    }

    /// The guarded path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for FileGuard {
    fn drop(&mut self) {
        if let Err(err) = fs::remove_file(&self.path) {
            log::error!(
                "error deleting temporary file {}: {}",
                self.path.display(),
                err
            );
        }
    }
}

/// Mints a fresh randomly-named scratch path under `./tmp/`.
pub fn scratch_path() -> PathBuf {
    let token: u64 = rand::thread_rng().gen();
    PathBuf::from(format!("./tmp/tmp_{}.txt", token))
}

#[cfg(test)]
mod test {
    use std::panic;

    use super::{scratch_path, FileGuard};

    #[test]
    fn test_guard_creates_and_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("guarded.txt");

        {
            let guard = FileGuard::new(&path).unwrap();
            assert!(guard.path().exists());
        }
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_creates_missing_parents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deep").join("guarded.txt");

        let guard = FileGuard::new(&path).unwrap();
        assert!(guard.path().exists());
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_moved_guard_deletes_exactly_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("moved.txt");

        fn pass_through(guard: FileGuard) -> FileGuard {
            guard
        }

        let guard = FileGuard::new(&path).unwrap();
        let guard = pass_through(guard);
        assert!(path.exists());
        drop(guard);
        assert!(!path.exists());
    }

    #[test]
    fn test_guard_deletes_on_unwind() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unwound.txt");

        let created = path.clone();
        let result = panic::catch_unwind(move || {
            let _guard = FileGuard::new(&created).unwrap();
            panic!("boom");
        });

        assert!(result.is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_scratch_paths_are_fresh() {
        let first = scratch_path();
        let second = scratch_path();

        assert!(first.to_string_lossy().starts_with("./tmp/tmp_"));
        assert!(first.to_string_lossy().ends_with(".txt"));
        assert_ne!(first, second);
    }
}
