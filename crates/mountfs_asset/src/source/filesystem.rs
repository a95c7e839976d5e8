use std::{io, path::PathBuf};

use mountfs_vfs::VfsError;

use super::FileSource;
use crate::{AssetError, Result};

/// Files of the host filesystem, relative to a root directory.
#[derive(Debug, Default, Clone)]
pub struct FileSystem {
    root: PathBuf,
}

impl FileSystem {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Uses the `assets` directory next to the crate manifest when run
    /// through cargo, next to the executable otherwise
    ///
    /// # Errors
    ///
    /// This function will return an error if the executable path cannot be acquired
    pub fn from_executable_dir() -> Result<Self> {
        let mut root = if let Ok(manifest_path) = std::env::var("CARGO_MANIFEST_DIR") {
            PathBuf::from(manifest_path)
        } else {
            let mut path =
                std::env::current_exe().map_err(AssetError::ExecutablePathAcquisitionFailed)?;
            path.pop();
            path
        };
        root.push("assets");
        Ok(Self { root })
    }

    fn map_io_error(path: &str, error: io::Error) -> VfsError {
        if error.kind() == io::ErrorKind::NotFound {
            VfsError::NotFound(path.into())
        } else {
            VfsError::Io(error)
        }
    }
}

impl FileSource for FileSystem {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        std::fs::read(self.root.join(path))
            .map_err(|e| AssetError::ReadFailed(Self::map_io_error(path, e)))
    }

    fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }
        std::fs::write(self.root.join(path), data)
            .map_err(|e| AssetError::WriteFailed(Self::map_io_error(path, e)))
    }
}
