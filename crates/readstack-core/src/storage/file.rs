//! File-backed slot
//!
//! Each slot is a JSON file `<data_dir>/<slot>.json`. Writes are atomic
//! (write to temp file, sync, rename) so an interrupted save never leaves a
//! half-written collection behind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{Slot, StorageError, StorageResult};

/// A slot stored as a single file
#[derive(Debug, Clone)]
pub struct FileSlot {
    name: String,
    path: PathBuf,
}

impl FileSlot {
    /// Create a slot named `name` inside `dir`
    pub fn new(dir: impl AsRef<Path>, name: impl Into<String>) -> Self {
        let name = name.into();
        let path = dir.as_ref().join(format!("{}.json", name));
        Self { name, path }
    }
}

impl Slot for FileSlot {
    fn name(&self) -> &str {
        &self.name
    }

    fn load(&self) -> StorageResult<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(StorageError::ReadError {
                path: self.path.clone(),
                source: e,
            }),
        }
    }

    fn save(&mut self, payload: &str) -> StorageResult<()> {
        atomic_write(&self.path, payload.as_bytes())
    }
}

/// Write data to a file atomically
///
/// 1. Write to a temporary file in the same directory
/// 2. Sync the file to disk
/// 3. Rename the temp file to the target path
pub(crate) fn atomic_write(path: &Path, data: &[u8]) -> StorageResult<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| StorageError::CreateDirectory {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let temp_path = path.with_extension("tmp");

    let mut file =
        File::create(&temp_path).map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.write_all(data)
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;
    file.sync_all()
        .map_err(|e| StorageError::from_io(e, temp_path.clone()))?;

    fs::rename(&temp_path, path).map_err(|source| StorageError::AtomicWriteFailed {
        from: temp_path.clone(),
        to: path.to_path_buf(),
        source,
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_loads_none() {
        let temp_dir = TempDir::new().unwrap();
        let slot = FileSlot::new(temp_dir.path(), "readStackBooks");

        assert!(!slot.path.exists());
        assert!(slot.load().unwrap().is_none());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(temp_dir.path(), "readStackBooks");

        slot.save(r#"[{"id":"1"}]"#).unwrap();
        assert!(slot.path.exists());
        assert!(slot.path.ends_with("readStackBooks.json"));
        assert_eq!(slot.load().unwrap().as_deref(), Some(r#"[{"id":"1"}]"#));

        // No temp file left behind
        assert!(!slot.path.with_extension("tmp").exists());
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let nested_path = temp_dir.path().join("a").join("b").join("file.json");

        atomic_write(&nested_path, b"[]").unwrap();

        assert_eq!(fs::read_to_string(&nested_path).unwrap(), "[]");
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let temp_dir = TempDir::new().unwrap();
        let mut slot = FileSlot::new(temp_dir.path(), "books");

        slot.save("[1]").unwrap();
        slot.save("[]").unwrap();
        assert_eq!(slot.load().unwrap().as_deref(), Some("[]"));
    }
}
