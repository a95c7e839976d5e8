use std::{
    fs::{self, File},
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use super::{io_error, Archive};
use crate::{stream::ReadStream, FileType, Metadata, Result, VfsError};

/// A real directory of the host filesystem.
#[derive(Debug)]
pub struct DirectoryArchive {
    root: PathBuf,
    allow_symlinks: bool,
}

impl DirectoryArchive {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            allow_symlinks: false,
        }
    }

    /// Symbolic links are hidden unless permitted
    #[must_use]
    pub fn with_symlinks(mut self, allow_symlinks: bool) -> Self {
        self.allow_symlinks = allow_symlinks;
        self
    }

    fn resolve(&self, path: &str) -> Option<PathBuf> {
        let mut real_path = self.root.clone();
        for component in path.split('/').filter(|component| !component.is_empty()) {
            real_path.push(component);
            if !self.allow_symlinks && fs::symlink_metadata(&real_path).ok()?.is_symlink() {
                return None;
            }
        }
        Some(real_path)
    }
}

impl Archive for DirectoryArchive {
    fn stat(&self, path: &str) -> Option<Metadata> {
        let metadata = fs::metadata(self.resolve(path)?).ok()?;
        let file_type = if metadata.is_dir() {
            FileType::Directory
        } else if metadata.is_file() {
            FileType::Regular
        } else {
            return None;
        };

        Some(Metadata {
            file_type,
            size: if metadata.is_file() { metadata.len() } else { 0 },
            modified: metadata.modified().ok().and_then(unix_time),
            read_only: metadata.permissions().readonly(),
        })
    }

    fn open(&self, path: &str) -> Result<ReadStream> {
        let real_path = self
            .resolve(path)
            .ok_or_else(|| VfsError::NotFound(path.into()))?;
        let file = File::open(&real_path).map_err(|e| io_error(path, e))?;
        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(VfsError::NotAFile(path.into()));
        }

        Ok(ReadStream::new(file, metadata.len()))
    }

    fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let real_path = self
            .resolve(path)
            .ok_or_else(|| VfsError::NotFound(path.into()))?;
        let mut names = vec![];
        for entry in fs::read_dir(&real_path).map_err(|e| io_error(path, e))? {
            let entry = entry?;
            if !self.allow_symlinks && entry.file_type()?.is_symlink() {
                continue;
            }

            if let Some(name) = entry.file_name().to_str() {
                names.push(name.to_string());
            }
        }
        names.sort();
        Ok(names)
    }
}

/// Converts a timestamp to seconds since the unix epoch
pub(crate) fn unix_time(time: SystemTime) -> Option<i64> {
    match time.duration_since(UNIX_EPOCH) {
        Ok(elapsed) => i64::try_from(elapsed.as_secs()).ok(),
        Err(before_epoch) => i64::try_from(before_epoch.duration().as_secs())
            .ok()
            .map(|seconds| -seconds),
    }
}
