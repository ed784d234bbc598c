//! File helpers shared by the file-backed stores and the CLI

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tempfile::NamedTempFile;

use crate::domain::result::Result;

/// Replace `path` with `contents` in one rename, so readers never see a
/// half-written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(contents)?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Sibling lock file for `path`: `tables.json` -> `tables.json.lock`
pub(crate) fn lock_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".lock");
    path.with_file_name(name)
}

/// Advisory lock held on a lock file until dropped
pub(crate) struct FileLock {
    file: File,
}

impl FileLock {
    fn open(lock_path: &Path) -> Result<File> {
        if let Some(dir) = lock_path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        Ok(OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(lock_path)?)
    }

    pub(crate) fn shared(lock_path: &Path) -> Result<Self> {
        let file = Self::open(lock_path)?;
        file.lock_shared()?;
        Ok(Self { file })
    }

    pub(crate) fn exclusive(lock_path: &Path) -> Result<Self> {
        let file = Self::open(lock_path)?;
        file.lock_exclusive()?;
        Ok(Self { file })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}
