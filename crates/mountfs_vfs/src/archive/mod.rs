use std::{io, path::Path};

use crate::{stream::ReadStream, Metadata, Result, VfsError};

pub mod directory;
pub mod memory;
pub mod tarball;
pub mod zipfile;

/// A source of files that can be mounted in the search path.
///
/// Paths handed to an archive are sanitized and relative to the archive
/// root, the empty path being the root itself.
pub trait Archive: Send + Sync {
    /// Returns the metadata of the entry at the given path, if it exists
    fn stat(&self, path: &str) -> Option<Metadata>;

    /// Opens the regular file at the given path for reading
    ///
    /// # Errors
    ///
    /// An error will be returned if the path doesn't exist, is not a regular
    /// file or cannot be read
    fn open(&self, path: &str) -> Result<ReadStream>;

    /// Lists the names of the entries of the directory at the given path
    ///
    /// # Errors
    ///
    /// An error will be returned if the path is not a readable directory
    fn read_dir(&self, path: &str) -> Result<Vec<String>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Zip,
    Tar,
    TarGz,
}

impl Format {
    fn detect(name: &str, data: &[u8]) -> Option<Self> {
        let name = name.to_ascii_lowercase();
        if name.ends_with(".zip") {
            Some(Self::Zip)
        } else if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            Some(Self::TarGz)
        } else if name.ends_with(".tar") {
            Some(Self::Tar)
        } else if data.starts_with(b"PK\x03\x04") || data.starts_with(b"PK\x05\x06") {
            Some(Self::Zip)
        } else if data.starts_with(&[0x1f, 0x8b]) {
            Some(Self::TarGz)
        } else if data.get(257..262) == Some(b"ustar".as_slice()) {
            Some(Self::Tar)
        } else {
            None
        }
    }
}

pub(crate) fn io_error(path: &str, error: io::Error) -> VfsError {
    if error.kind() == io::ErrorKind::NotFound {
        VfsError::NotFound(path.into())
    } else {
        VfsError::Io(error)
    }
}

/// Opens a real directory or archive file
pub(crate) fn open_path(source: &Path, allow_symlinks: bool) -> Result<Box<dyn Archive>> {
    let name = source.to_string_lossy();
    let metadata = std::fs::metadata(source).map_err(|e| io_error(&name, e))?;
    if metadata.is_dir() {
        return Ok(Box::new(
            directory::DirectoryArchive::new(source).with_symlinks(allow_symlinks),
        ));
    }

    let data = std::fs::read(source).map_err(|e| io_error(&name, e))?;
    from_memory(&data, &name)
}

/// Opens archive data, using its name as a format hint
pub(crate) fn from_memory(data: &[u8], name: &str) -> Result<Box<dyn Archive>> {
    match Format::detect(name, data) {
        Some(Format::Zip) => Ok(Box::new(zipfile::read_zip(data)?)),
        Some(Format::Tar) => Ok(Box::new(tarball::read_tar(data)?)),
        Some(Format::TarGz) => Ok(Box::new(tarball::read_tar_gz(data)?)),
        None => Err(VfsError::UnsupportedArchive(name.into())),
    }
}
