//! Saving downloaded reports to disk.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::Builder;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{} exists and is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("cannot create download directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },
    #[error("cannot write {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

/// Creates `dir` (and parents) unless it already exists as a directory.
pub fn prepare_download_dir(dir: &Path) -> Result<(), StoreError> {
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(StoreError::NotADirectory(dir.to_path_buf())),
        Err(_) => fs::create_dir_all(dir).map_err(|source| StoreError::CreateDir {
            path: dir.to_path_buf(),
            source,
        }),
    }
}

/// Directory that downloaded reports are saved into.
///
/// Bytes go to a hidden `.partial-*` file next to the target, which is then
/// renamed over it. A failed save leaves neither a partial file nor a
/// truncated report.
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
}

impl ReportStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn save(&self, filename: &str, bytes: &[u8]) -> Result<PathBuf, StoreError> {
        prepare_download_dir(&self.dir)?;
        let target = self.dir.join(filename);
        let write_err = |source| StoreError::Write {
            path: target.clone(),
            source,
        };

        let mut partial = Builder::new()
            .prefix(".partial-")
            .tempfile_in(&self.dir)
            .map_err(write_err)?;
        partial.write_all(bytes).map_err(write_err)?;
        partial.as_file().sync_all().map_err(write_err)?;
        // Replaces an earlier copy of the same report.
        partial
            .persist(&target)
            .map_err(|err| write_err(err.error))?;
        Ok(target)
    }
}
