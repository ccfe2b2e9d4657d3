//! File-backed blob store - one JSON file per key inside the data directory

use std::fs::{self, File, OpenOptions};
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

use fs2::FileExt;

use crate::domain::result::Result;
use crate::ports::BlobStore;

/// Blob store writing `<dir>/<key>.json`
///
/// Reads take a shared lock and writes an exclusive one, so a reader never
/// sees a half-written blob. Two writers still race: last write wins.
#[derive(Debug, Clone)]
pub struct FileBlobStore {
    dir: PathBuf,
}

impl FileBlobStore {
    /// Create a store rooted at `dir`, creating the directory if needed
    pub fn new(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)?;
        Ok(Self { dir: dir.to_path_buf() })
    }

    /// File backing `key`; characters unsafe in file names become `_`
    pub fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl BlobStore for FileBlobStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let mut file = match File::open(self.path_for(key)) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        file.lock_shared()?;
        let mut content = String::new();
        let read = file.read_to_string(&mut content);
        file.unlock()?;
        read?;

        // A writer may have created the file without filling it yet
        if content.is_empty() {
            return Ok(None);
        }
        Ok(Some(content))
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(self.path_for(key))?;

        file.lock_exclusive()?;
        let written = file
            .set_len(0)
            .and_then(|_| file.write_all(value.as_bytes()))
            .and_then(|_| file.sync_all());
        file.unlock()?;
        written?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.get("csv_templates").unwrap(), None);
    }

    #[test]
    fn test_put_overwrites_shorter_content() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path()).unwrap();

        store.put("csv-field-config", "[1, 2, 3, 4, 5]").unwrap();
        store.put("csv-field-config", "[]").unwrap();
        assert_eq!(store.get("csv-field-config").unwrap().as_deref(), Some("[]"));
        assert!(temp_dir.path().join("csv-field-config.json").exists());
    }

    #[test]
    fn test_key_is_sanitized() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path()).unwrap();
        assert_eq!(store.path_for("../etc/passwd"), temp_dir.path().join("___etc_passwd.json"));
    }

    #[test]
    fn test_empty_file_reads_as_missing() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileBlobStore::new(temp_dir.path()).unwrap();
        File::create(store.path_for("bank-statements")).unwrap();
        assert_eq!(store.get("bank-statements").unwrap(), None);
    }
}
