//! Local file storage for filestash.
//!
//! Stored files live flat under a single root directory, keyed by filename.
//! The directory listing is the source of truth: there is no index or
//! metadata sidecar.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::{Result, StashError};

/// Counter used to keep temp file names distinct between concurrent saves.
static TEMP_SEQ: AtomicU64 = AtomicU64::new(0);

/// File storage rooted at a single directory.
///
/// A filename maps directly to `{root}/{name}`. Uploading the same name
/// twice overwrites the earlier file (last writer wins).
#[derive(Debug, Clone)]
pub struct LocalStorage {
    /// Root directory for stored files.
    root: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage with the given root directory.
    ///
    /// The directory (and any missing parents) will be created if it
    /// doesn't exist; a pre-existing directory is fine.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// Get the root directory of this storage.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Save content under the given filename, overwriting any existing file.
    ///
    /// The content is written to a temporary sibling first and renamed into
    /// place, so a concurrent reader never observes a partial file.
    pub fn save(&self, name: &str, content: &[u8]) -> Result<()> {
        Self::validate_name(name)?;

        let final_path = self.root.join(name);
        let temp_path = self.root.join(format!(
            ".{}.tmp-{}-{}",
            name,
            std::process::id(),
            TEMP_SEQ.fetch_add(1, Ordering::Relaxed)
        ));

        fs::write(&temp_path, content)?;
        if let Err(e) = fs::rename(&temp_path, &final_path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        Ok(())
    }

    /// Resolve a stored filename to its path on disk.
    ///
    /// Fails with NotFound if no file with that name exists. The file is
    /// not opened.
    pub fn load(&self, name: &str) -> Result<PathBuf> {
        Self::validate_name(name)?;

        let path = self.root.join(name);
        match fs::metadata(&path) {
            Ok(_) => Ok(path),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StashError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Check if a file exists in storage.
    pub fn exists(&self, name: &str) -> bool {
        Self::validate_name(name).is_ok() && self.root.join(name).exists()
    }

    /// Get the size of a stored file.
    pub fn file_size(&self, name: &str) -> Result<u64> {
        Self::validate_name(name)?;

        match fs::metadata(self.root.join(name)) {
            Ok(m) => Ok(m.len()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(StashError::NotFound(format!("File: {name}")))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Reject names that could escape the storage root.
    ///
    /// A valid name is a single path segment: non-empty, no separators, no
    /// NUL, and not `.` or `..`.
    fn validate_name(name: &str) -> Result<()> {
        if name.is_empty()
            || name == "."
            || name == ".."
            || name.contains('/')
            || name.contains('\\')
            || name.contains('\0')
        {
            return Err(StashError::Validation(format!("invalid file name: {name:?}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup_storage() -> (TempDir, LocalStorage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = LocalStorage::new(temp_dir.path()).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_new_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("uploads");

        assert!(!root.exists());

        let storage = LocalStorage::new(&root).unwrap();

        assert!(root.exists());
        assert_eq!(storage.root(), root);
    }

    #[test]
    fn test_new_with_existing_directory() {
        let temp_dir = TempDir::new().unwrap();

        // Root already exists; must not fail
        let storage = LocalStorage::new(temp_dir.path());
        assert!(storage.is_ok());
    }

    #[test]
    fn test_new_creates_missing_parents() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("a").join("b").join("uploads");

        LocalStorage::new(&root).unwrap();

        assert!(root.is_dir());
    }

    #[test]
    fn test_save_and_load() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"Hello, World!";

        storage.save("test.txt", content).unwrap();

        let path = storage.load("test.txt").unwrap();
        assert_eq!(path, storage.root().join("test.txt"));
        assert_eq!(fs::read(path).unwrap(), content);
    }

    #[test]
    fn test_save_overwrites() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("doc.txt", b"first").unwrap();
        storage.save("doc.txt", b"second").unwrap();

        let path = storage.load("doc.txt").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"second");
    }

    #[test]
    fn test_save_leaves_no_temp_files() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("a.txt", b"data").unwrap();

        let entries: Vec<_> = fs::read_dir(storage.root())
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        assert_eq!(entries, vec!["a.txt".to_string()]);
    }

    #[test]
    fn test_load_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.load("nonexistent.txt");

        assert!(matches!(result, Err(StashError::NotFound(_))));
    }

    #[test]
    fn test_load_does_not_escape_root() {
        let (_temp_dir, storage) = setup_storage();

        for name in ["../etc/passwd", "..\\secrets", "a/b.txt", "..", ".", ""] {
            let result = storage.load(name);
            assert!(
                matches!(result, Err(StashError::Validation(_))),
                "expected rejection for {name:?}"
            );
        }
    }

    #[test]
    fn test_save_rejects_traversal_names() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.save("../escape.txt", b"data");
        assert!(matches!(result, Err(StashError::Validation(_))));
    }

    #[test]
    fn test_exists() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("test.txt", b"data").unwrap();

        assert!(storage.exists("test.txt"));
        assert!(!storage.exists("nonexistent.txt"));
        assert!(!storage.exists("../test.txt"));
    }

    #[test]
    fn test_file_size() {
        let (_temp_dir, storage) = setup_storage();
        let content = b"Hello, World!";

        storage.save("test.txt", content).unwrap();

        assert_eq!(storage.file_size("test.txt").unwrap(), content.len() as u64);
    }

    #[test]
    fn test_file_size_not_found() {
        let (_temp_dir, storage) = setup_storage();

        let result = storage.file_size("nonexistent.txt");
        assert!(matches!(result, Err(StashError::NotFound(_))));
    }

    #[test]
    fn test_binary_content() {
        let (_temp_dir, storage) = setup_storage();

        let content: Vec<u8> = (0..=255).collect();

        storage.save("binary.bin", &content).unwrap();
        let path = storage.load("binary.bin").unwrap();

        assert_eq!(fs::read(path).unwrap(), content);
    }

    #[test]
    fn test_large_file() {
        let (_temp_dir, storage) = setup_storage();

        // 1MB file
        let content: Vec<u8> = vec![0xAB; 1024 * 1024];

        storage.save("large.bin", &content).unwrap();

        assert_eq!(storage.file_size("large.bin").unwrap(), 1024 * 1024);
    }

    #[test]
    fn test_unicode_filename() {
        let (_temp_dir, storage) = setup_storage();

        storage.save("日本語ファイル.txt", b"data").unwrap();

        assert!(storage.exists("日本語ファイル.txt"));
        let path = storage.load("日本語ファイル.txt").unwrap();
        assert_eq!(fs::read(path).unwrap(), b"data");
    }
}
