#![warn(clippy::pedantic)]

//! A virtual filesystem for game assets.
//!
//! Real directories and archives are mounted into a single namespace using
//! platform-independent paths (`/` separated, no `.` or `..`). Mounts form the
//! search path: when a path is looked up, mounts are consulted in the order
//! they were added and the first one containing the path wins. Writing is
//! only possible below the write directory, which is a real directory of the
//! host filesystem.

use std::{
    collections::BTreeSet,
    fmt,
    fs::{self, OpenOptions},
    io::Write,
    path::{Path, PathBuf},
};

use log::{debug, warn};

pub mod archive;
pub mod config;
pub mod global;
pub mod path;
pub mod stream;

pub use archive::{directory::DirectoryArchive, memory::MemoryArchive, Archive};
pub use config::{MountConfig, VfsConfig};
pub use stream::{ReadStream, WriteStream};

pub type Result<T> = std::result::Result<T, VfsError>;

#[derive(Debug, thiserror::Error)]
pub enum VfsError {
    #[error("the virtual filesystem is not initialized")]
    NotInitialized,
    #[error("the virtual filesystem is already initialized")]
    AlreadyInitialized,
    #[error("invalid path '{0}'")]
    BadFilename(String),
    #[error("'{0}' not found")]
    NotFound(String),
    #[error("'{0}' is not a regular file")]
    NotAFile(String),
    #[error("'{0}' is not a directory")]
    NotADirectory(String),
    #[error("'{0}' is not mounted")]
    NotMounted(String),
    #[error("'{0}' is not a supported archive")]
    UnsupportedArchive(String),
    #[error("cannot mount '{0}', the data is empty")]
    EmptyArchive(String),
    #[error("no write directory is set")]
    NoWriteDir,
    #[error("no preference directory is available on this platform")]
    NoPrefDir,
    #[error("'{0}' is not valid UTF-8 text")]
    InvalidText(String),
    #[error("invalid zip archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("invalid configuration: {0}")]
    Config(#[from] ron::error::SpannedError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileType {
    Regular,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Metadata {
    pub file_type: FileType,
    pub size: u64,
    /// Last modification time in seconds since the unix epoch, if known
    pub modified: Option<i64>,
    pub read_only: bool,
}

impl Metadata {
    #[must_use]
    pub fn is_file(&self) -> bool {
        self.file_type == FileType::Regular
    }

    #[must_use]
    pub fn is_dir(&self) -> bool {
        self.file_type == FileType::Directory
    }

    fn implicit_directory() -> Self {
        Self {
            file_type: FileType::Directory,
            size: 0,
            modified: None,
            read_only: true,
        }
    }
}

struct Mount {
    source: String,
    mount_point: String,
    archive: Box<dyn Archive>,
}

pub struct Vfs {
    search_path: Vec<Mount>,
    write_dir: Option<PathBuf>,
    allow_symlinks: bool,
}

impl Vfs {
    /// Creates a virtual filesystem with an empty search path.
    ///
    /// The write directory defaults to the current working directory.
    #[must_use]
    pub fn new() -> Self {
        let write_dir = match std::env::current_dir() {
            Ok(working_directory) => Some(working_directory),
            Err(e) => {
                warn!("Couldn't determine the working directory, no write directory set: {e}");
                None
            }
        };

        debug!("Initialized the virtual filesystem");
        Self {
            search_path: vec![],
            write_dir,
            allow_symlinks: false,
        }
    }

    /// Creates a virtual filesystem and applies the given configuration
    ///
    /// # Errors
    ///
    /// Will return an error if the write directory cannot be set or if a
    /// source cannot be mounted
    pub fn from_config(config: &VfsConfig) -> Result<Self> {
        let mut vfs = Self::new();
        vfs.permit_symlinks(config.allow_symlinks);
        if let Some(write_dir) = &config.write_dir {
            vfs.set_write_dir(write_dir)?;
        }

        for mount in &config.mounts {
            vfs.mount(&mount.source, &mount.mount_point)?;
        }

        Ok(vfs)
    }

    /// Allows directories mounted afterwards to expose symbolic links
    pub fn permit_symlinks(&mut self, allow_symlinks: bool) {
        self.allow_symlinks = allow_symlinks;
    }

    #[must_use]
    pub fn symlinks_permitted(&self) -> bool {
        self.allow_symlinks
    }

    /// Mounts a directory or an archive file at the given mount point, at the
    /// end of the search path.
    ///
    /// An empty mount point or `/` mounts at the root. Mounting a source that
    /// is already mounted does nothing.
    ///
    /// # Errors
    ///
    /// Will return an error if the source doesn't exist, is not a supported
    /// archive, or if the mount point is invalid
    pub fn mount(&mut self, source: impl AsRef<Path>, mount_point: &str) -> Result<()> {
        let source = source.as_ref();
        let name = source.to_string_lossy().into_owned();
        if self.is_mounted(&name) {
            debug!("'{name}' is already mounted");
            return Ok(());
        }

        let archive = archive::open_path(source, self.allow_symlinks)
            .inspect_err(|e| warn!("Failed to mount '{name}' at '{mount_point}': {e}"))?;
        self.push_mount(name, archive, mount_point)
    }

    /// Mounts archive data kept in memory.
    ///
    /// `name` identifies the mount for [`Vfs::unmount`] and hints the archive
    /// format, for example `data.tar.gz`.
    ///
    /// # Errors
    ///
    /// Will return an error if the data is empty, is not a supported archive,
    /// or if the mount point is invalid
    pub fn mount_from_memory(&mut self, data: &[u8], name: &str, mount_point: &str) -> Result<()> {
        if data.is_empty() {
            warn!("Cannot mount '{name}', the data is empty");
            return Err(VfsError::EmptyArchive(name.into()));
        }

        if self.is_mounted(name) {
            debug!("'{name}' is already mounted");
            return Ok(());
        }

        let archive = archive::from_memory(data, name)
            .inspect_err(|e| warn!("Failed to mount '{name}' at '{mount_point}': {e}"))?;
        self.push_mount(name.into(), archive, mount_point)
    }

    /// Mounts an arbitrary archive under the given name
    ///
    /// # Errors
    ///
    /// Will return an error if the mount point is invalid
    pub fn mount_archive<A>(&mut self, name: &str, archive: A, mount_point: &str) -> Result<()>
    where
        A: Archive + 'static,
    {
        if self.is_mounted(name) {
            debug!("'{name}' is already mounted");
            return Ok(());
        }

        self.push_mount(name.into(), Box::new(archive), mount_point)
    }

    fn push_mount(
        &mut self,
        source: String,
        archive: Box<dyn Archive>,
        mount_point: &str,
    ) -> Result<()> {
        let mount_point = path::sanitize(mount_point)?;
        debug!("Mounted '{source}' at '/{mount_point}'");
        self.search_path.push(Mount {
            source,
            mount_point,
            archive,
        });
        Ok(())
    }

    /// Removes a source from the search path, using the name it was mounted with
    ///
    /// # Errors
    ///
    /// Will return [`VfsError::NotMounted`] if the source is not mounted
    pub fn unmount(&mut self, source: impl AsRef<Path>) -> Result<()> {
        let name = source.as_ref().to_string_lossy();
        let Some(index) = self.search_path.iter().position(|mount| mount.source == name) else {
            warn!("Failed to unmount '{name}'");
            return Err(VfsError::NotMounted(name.into_owned()));
        };

        self.search_path.remove(index);
        debug!("Unmounted '{name}'");
        Ok(())
    }

    #[must_use]
    pub fn is_mounted(&self, source: &str) -> bool {
        self.search_path.iter().any(|mount| mount.source == source)
    }

    /// Mounted sources, in lookup order
    pub fn search_path(&self) -> impl Iterator<Item = &str> {
        self.search_path.iter().map(|mount| mount.source.as_str())
    }

    /// Returns where the given source is mounted, `""` being the root
    #[must_use]
    pub fn mount_point(&self, source: impl AsRef<Path>) -> Option<&str> {
        let name = source.as_ref().to_string_lossy();
        self.search_path
            .iter()
            .find(|mount| mount.source == name)
            .map(|mount| mount.mount_point.as_str())
    }

    fn resolve<'p>(&self, path: &'p str) -> Option<(&Mount, &'p str, Metadata)> {
        self.search_path.iter().find_map(|mount| {
            let inner_path = path::strip_mount_point(path, &mount.mount_point)?;
            let metadata = mount.archive.stat(inner_path)?;
            Some((mount, inner_path, metadata))
        })
    }

    fn is_implicit_directory(&self, path: &str) -> bool {
        path.is_empty()
            || self
                .search_path
                .iter()
                .any(|mount| path::child_of_mount_point(path, &mount.mount_point).is_some())
    }

    /// Returns the metadata of the given path
    ///
    /// # Errors
    ///
    /// Will return an error if the path is invalid or doesn't exist in the search path
    pub fn stat(&self, path: &str) -> Result<Metadata> {
        let sanitized = path::sanitize(path)?;
        if let Some((_, _, metadata)) = self.resolve(&sanitized) {
            return Ok(metadata);
        }

        if self.is_implicit_directory(&sanitized) {
            return Ok(Metadata::implicit_directory());
        }

        Err(VfsError::NotFound(path.into()))
    }

    #[must_use]
    pub fn exists(&self, path: &str) -> bool {
        self.stat(path).is_ok()
    }

    /// Checks if a regular file exists in the search path
    #[must_use]
    pub fn file_exists(&self, path: &str) -> bool {
        self.stat(path).is_ok_and(|metadata| metadata.is_file())
    }

    /// Checks if a directory exists in the search path
    #[must_use]
    pub fn directory_exists(&self, path: &str) -> bool {
        self.stat(path).is_ok_and(|metadata| metadata.is_dir())
    }

    /// Returns the last modification time of the given path in seconds since
    /// the unix epoch, or `None` if the archive doesn't record it
    ///
    /// # Errors
    ///
    /// Will return an error if the path doesn't exist in the search path
    pub fn mod_time(&self, path: &str) -> Result<Option<i64>> {
        self.stat(path)
            .map(|metadata| metadata.modified)
            .inspect_err(|e| warn!("Cannot get the modification time of '{path}': {e}"))
    }

    /// Returns the name of the mounted source providing the given path
    #[must_use]
    pub fn real_dir(&self, path: &str) -> Option<&str> {
        let sanitized = path::sanitize(path).ok()?;
        self.resolve(&sanitized)
            .map(|(mount, _, _)| mount.source.as_str())
    }

    /// Opens a file of the search path for reading
    ///
    /// # Errors
    ///
    /// Will return an error if the path doesn't name a readable regular file
    pub fn open_read(&self, path: &str) -> Result<ReadStream> {
        let sanitized = path::sanitize(path)?;
        match self.resolve(&sanitized) {
            Some((mount, inner_path, metadata)) if metadata.is_file() => {
                mount.archive.open(inner_path)
            }
            Some(_) => Err(VfsError::NotAFile(path.into())),
            None if self.is_implicit_directory(&sanitized) => {
                Err(VfsError::NotAFile(path.into()))
            }
            None => {
                warn!("Tried to load unexisting file '{path}'");
                Err(VfsError::NotFound(path.into()))
            }
        }
    }

    /// Reads the whole content of a file of the search path
    ///
    /// # Errors
    ///
    /// Will return an error if the file cannot be opened or read
    pub fn read(&self, path: &str) -> Result<Vec<u8>> {
        self.open_read(path)?.read_all()
    }

    /// Reads the whole content of a text file of the search path
    ///
    /// # Errors
    ///
    /// Will return an error if the file cannot be read or is not UTF-8
    pub fn read_to_string(&self, path: &str) -> Result<String> {
        String::from_utf8(self.read(path)?).map_err(|_| VfsError::InvalidText(path.into()))
    }

    /// Lists the entries of a directory, merged across every mount containing it
    ///
    /// # Errors
    ///
    /// Will return an error if the path doesn't name a directory of the search path
    pub fn read_dir(&self, path: &str) -> Result<Vec<String>> {
        let metadata = self.stat(path).inspect_err(|e| {
            warn!("Can't get files from non-existent directory '{path}': {e}");
        })?;
        if !metadata.is_dir() {
            return Err(VfsError::NotADirectory(path.into()));
        }

        let sanitized = path::sanitize(path)?;
        let mut names = BTreeSet::new();
        for mount in &self.search_path {
            if let Some(child) = path::child_of_mount_point(&sanitized, &mount.mount_point) {
                names.insert(child.to_string());
                continue;
            }

            let Some(inner_path) = path::strip_mount_point(&sanitized, &mount.mount_point) else {
                continue;
            };
            if !mount
                .archive
                .stat(inner_path)
                .is_some_and(|metadata| metadata.is_dir())
            {
                continue;
            }

            match mount.archive.read_dir(inner_path) {
                Ok(entries) => names.extend(entries),
                Err(e) => warn!("Couldn't list '{path}' in '{}': {e}", mount.source),
            }
        }

        Ok(names.into_iter().collect())
    }

    /// Sets the real directory below which files are written
    ///
    /// # Errors
    ///
    /// Will return an error if the path is not an existing directory
    pub fn set_write_dir(&mut self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        let name = dir.to_string_lossy();
        let metadata = fs::metadata(dir)
            .map_err(|e| archive::io_error(&name, e))
            .inspect_err(|e| warn!("Failed to set the write directory: {e}"))?;
        if !metadata.is_dir() {
            warn!("Failed to set the write directory: '{name}' is not a directory");
            return Err(VfsError::NotADirectory(name.into_owned()));
        }

        debug!("Write directory set to '{name}'");
        self.write_dir = Some(dir.to_path_buf());
        Ok(())
    }

    #[must_use]
    pub fn write_dir(&self) -> Option<&Path> {
        self.write_dir.as_deref()
    }

    /// Disables writing
    pub fn clear_write_dir(&mut self) {
        self.write_dir = None;
    }

    fn write_path(&self, path: &str) -> Result<PathBuf> {
        let write_dir = self.write_dir.as_ref().ok_or(VfsError::NoWriteDir)?;
        let sanitized = path::sanitize(path)?;
        if sanitized.is_empty() {
            return Err(VfsError::BadFilename(path.into()));
        }
        Ok(write_dir.join(sanitized))
    }

    /// Creates or truncates a file of the write directory
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the file
    /// cannot be created
    pub fn open_write(&self, path: &str) -> Result<WriteStream> {
        let real_path = self.write_path(path)?;
        let file = fs::File::create(real_path).map_err(|e| archive::io_error(path, e))?;
        Ok(WriteStream::new(file))
    }

    /// Opens a file of the write directory for appending, creating it if needed
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the file
    /// cannot be opened
    pub fn open_append(&self, path: &str) -> Result<WriteStream> {
        let real_path = self.write_path(path)?;
        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(real_path)
            .map_err(|e| archive::io_error(path, e))?;
        Ok(WriteStream::new(file))
    }

    /// Writes a file of the write directory.
    ///
    /// Writing no data succeeds without touching the file.
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the file
    /// cannot be written
    pub fn write(&self, path: &str, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let mut stream = self
            .open_write(path)
            .inspect_err(|e| warn!("Couldn't open '{path}' for writing: {e}"))?;
        stream.write_all(data)?;
        stream.flush()?;
        Ok(())
    }

    /// Writes a text file of the write directory
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the file
    /// cannot be written
    pub fn write_string(&self, path: &str, text: &str) -> Result<()> {
        self.write(path, text.as_bytes())
    }

    /// Creates a directory and its parents in the write directory
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the
    /// directory cannot be created
    pub fn mkdir(&self, path: &str) -> Result<()> {
        Ok(fs::create_dir_all(self.write_path(path)?)?)
    }

    /// Deletes a file or an empty directory of the write directory
    ///
    /// # Errors
    ///
    /// Will return an error if there is no write directory or if the entry
    /// cannot be deleted
    pub fn delete(&self, path: &str) -> Result<()> {
        let real_path = self.write_path(path)?;
        let metadata = fs::symlink_metadata(&real_path).map_err(|e| archive::io_error(path, e))?;
        if metadata.is_dir() {
            fs::remove_dir(real_path)?;
        } else {
            fs::remove_file(real_path)?;
        }
        Ok(())
    }
}

impl Default for Vfs {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Vfs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vfs")
            .field(
                "search_path",
                &self
                    .search_path
                    .iter()
                    .map(|mount| (&mount.source, &mount.mount_point))
                    .collect::<Vec<_>>(),
            )
            .field("write_dir", &self.write_dir)
            .field("allow_symlinks", &self.allow_symlinks)
            .finish()
    }
}

/// Returns the per-user directory where an application may store its data,
/// creating it if needed
///
/// # Errors
///
/// Will return an error if the platform has no such directory, if a name is
/// empty or if the directory cannot be created
pub fn pref_dir(organization: &str, application: &str) -> Result<PathBuf> {
    for name in [organization, application] {
        if name.is_empty() || path::sanitize(name)?.contains('/') {
            return Err(VfsError::BadFilename(name.into()));
        }
    }

    let mut dir = dirs::data_dir().ok_or(VfsError::NoPrefDir)?;
    dir.push(organization);
    dir.push(application);
    fs::create_dir_all(&dir)?;
    debug!("Preference directory: '{}'", dir.display());
    Ok(dir)
}

/// Returns the directory containing the running executable
///
/// # Errors
///
/// Will return an error if the executable path cannot be determined
pub fn base_dir() -> Result<PathBuf> {
    let mut dir = std::env::current_exe()?;
    dir.pop();
    Ok(dir)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("text.txt"), "Hello, World!").unwrap();
        fs::create_dir(dir.path().join("images")).unwrap();
        fs::write(dir.path().join("images/image.png"), [0x89, b'P', b'N', b'G']).unwrap();
        dir
    }

    fn tar_data(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (file_path, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, file_path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn mount_directory() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.mount(resources.path(), "assets")?;

        assert!(vfs.file_exists("assets/text.txt"));
        assert!(!vfs.file_exists("MissingFile.txt"));
        assert!(!vfs.file_exists("assets"));
        assert!(vfs.directory_exists("assets"));
        assert!(vfs.directory_exists("assets/images"));
        assert!(vfs.directory_exists("/"));
        assert!(!vfs.directory_exists("MissingDirectory"));
        assert_eq!(vfs.read_to_string("assets/text.txt")?, "Hello, World!");
        Ok(())
    }

    #[test]
    fn mount_missing_source() {
        let mut vfs = Vfs::new();
        assert!(matches!(
            vfs.mount("MissingDirectory", ""),
            Err(VfsError::NotFound(_))
        ));
        assert_eq!(vfs.search_path().count(), 0);
    }

    #[test]
    fn mount_twice_is_noop() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.mount(resources.path(), "assets")?;
        vfs.mount(resources.path(), "other")?;
        assert_eq!(vfs.search_path().count(), 1);
        assert_eq!(vfs.mount_point(resources.path()), Some("assets"));
        Ok(())
    }

    #[test]
    fn unmount() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.mount(resources.path(), "/")?;
        assert!(vfs.file_exists("text.txt"));

        vfs.unmount(resources.path())?;
        assert!(!vfs.file_exists("text.txt"));
        assert!(matches!(
            vfs.unmount("MissingDirectory"),
            Err(VfsError::NotMounted(_))
        ));
        Ok(())
    }

    #[test]
    fn first_mount_wins() -> Result<()> {
        let mut base = MemoryArchive::new();
        base.insert_file("config.ron", b"base".as_slice(), None)?;
        base.insert_file("base_only.txt", b"base".as_slice(), None)?;
        let mut patch = MemoryArchive::new();
        patch.insert_file("config.ron", b"patch".as_slice(), None)?;

        let mut vfs = Vfs::new();
        vfs.mount_archive("patch", patch, "")?;
        vfs.mount_archive("base", base, "")?;

        assert_eq!(vfs.read("config.ron")?, b"patch");
        assert_eq!(vfs.read("base_only.txt")?, b"base");
        assert_eq!(vfs.real_dir("config.ron"), Some("patch"));
        assert_eq!(vfs.real_dir("base_only.txt"), Some("base"));
        assert_eq!(vfs.search_path().collect::<Vec<_>>(), vec!["patch", "base"]);
        Ok(())
    }

    #[test]
    fn read_dir_merges_mounts() -> Result<()> {
        let resources = resources();
        let mut extra = MemoryArchive::new();
        extra.insert_file("extra.txt", b"extra".as_slice(), None)?;
        extra.insert_file("text.txt", b"shadowed".as_slice(), None)?;

        let mut vfs = Vfs::new();
        vfs.mount(resources.path(), "assets")?;
        vfs.mount_archive("extra", extra, "assets")?;
        vfs.mount_archive("dlc", MemoryArchive::new(), "assets/dlc/pack")?;

        assert_eq!(
            vfs.read_dir("assets")?,
            vec!["dlc", "extra.txt", "images", "text.txt"]
        );
        assert_eq!(vfs.read_dir("")?, vec!["assets"]);
        assert_eq!(vfs.read_dir("assets/dlc")?, vec!["pack"]);
        assert!(matches!(
            vfs.read_dir("assets/text.txt"),
            Err(VfsError::NotADirectory(_))
        ));
        assert!(matches!(
            vfs.read_dir("MissingDirectory"),
            Err(VfsError::NotFound(_))
        ));
        Ok(())
    }

    #[test]
    fn read_missing_file() {
        let vfs = Vfs::new();
        assert!(matches!(
            vfs.read("MissingFile.txt"),
            Err(VfsError::NotFound(_))
        ));
        assert!(matches!(vfs.read("/"), Err(VfsError::NotAFile(_))));
        assert!(matches!(
            vfs.read("../outside.txt"),
            Err(VfsError::BadFilename(_))
        ));
    }

    #[test]
    fn read_invalid_text() -> Result<()> {
        let mut archive = MemoryArchive::new();
        archive.insert_file("binary.bin", vec![0xff, 0xfe, 0x00], None)?;
        let mut vfs = Vfs::new();
        vfs.mount_archive("memory", archive, "")?;
        assert!(matches!(
            vfs.read_to_string("binary.bin"),
            Err(VfsError::InvalidText(_))
        ));
        Ok(())
    }

    #[test]
    fn mod_time() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.mount(resources.path(), "assets")?;
        assert!(vfs.mod_time("assets/text.txt")?.unwrap() > 1000);
        assert!(vfs.mod_time("MissingFile.txt").is_err());
        Ok(())
    }

    #[test]
    fn mount_tar_from_memory() -> Result<()> {
        let data = tar_data(&[("text.txt", &b"Hello from tar"[..])]);
        let mut vfs = Vfs::new();
        vfs.mount_from_memory(&data, "data.tar", "packed")?;
        assert_eq!(vfs.read_to_string("packed/text.txt")?, "Hello from tar");

        vfs.unmount("data.tar")?;
        assert!(!vfs.exists("packed"));
        Ok(())
    }

    #[test]
    fn mount_tar_file() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let archive_path = dir.path().join("resources.tar");
        fs::write(&archive_path, tar_data(&[("a/b.txt", &b"nested"[..])]))?;

        let mut vfs = Vfs::new();
        vfs.mount(&archive_path, "")?;
        assert!(vfs.directory_exists("a"));
        assert_eq!(vfs.read("a/b.txt")?, b"nested");
        Ok(())
    }

    #[test]
    fn mount_zip_file() -> Result<()> {
        let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
        writer.start_file("res/text.txt", zip::write::SimpleFileOptions::default())?;
        writer.write_all(b"Hello from zip")?;
        let data = writer.finish()?.into_inner();

        let dir = tempfile::tempdir()?;
        let archive_path = dir.path().join("data.zip");
        fs::write(&archive_path, data)?;

        let mut vfs = Vfs::new();
        vfs.mount(&archive_path, "")?;
        assert!(vfs.directory_exists("res"));
        assert_eq!(vfs.read_to_string("res/text.txt")?, "Hello from zip");
        assert_eq!(vfs.real_dir("res/text.txt"), archive_path.to_str());
        Ok(())
    }

    #[test]
    fn mount_empty_memory() {
        let mut vfs = Vfs::new();
        assert!(matches!(
            vfs.mount_from_memory(&[], "data.tar", ""),
            Err(VfsError::EmptyArchive(_))
        ));
    }

    #[test]
    fn write_then_read_back() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.set_write_dir(resources.path())?;
        vfs.mount(resources.path(), "")?;

        vfs.write("saved.txt", b"Hello")?;
        assert_eq!(fs::read(resources.path().join("saved.txt"))?, b"Hello");
        assert_eq!(vfs.read("saved.txt")?, b"Hello");

        vfs.write_string("saved.txt", "Hello World")?;
        assert_eq!(vfs.read_to_string("saved.txt")?, "Hello World");

        {
            let mut stream = vfs.open_append("saved.txt")?;
            stream.write_all(b"!")?;
        }
        assert_eq!(vfs.read_to_string("saved.txt")?, "Hello World!");

        vfs.mkdir("saves/slot1")?;
        assert!(vfs.directory_exists("saves/slot1"));
        vfs.delete("saves/slot1")?;
        assert!(!vfs.exists("saves/slot1"));
        vfs.delete("saved.txt")?;
        assert!(!vfs.exists("saved.txt"));
        Ok(())
    }

    #[test]
    fn empty_write_does_not_create_file() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        vfs.set_write_dir(resources.path())?;
        vfs.write("empty.txt", &[])?;
        assert!(!resources.path().join("empty.txt").exists());
        Ok(())
    }

    #[test]
    fn write_without_write_dir() {
        let mut vfs = Vfs::new();
        vfs.clear_write_dir();
        assert!(matches!(
            vfs.write("saved.txt", b"Hello"),
            Err(VfsError::NoWriteDir)
        ));
    }

    #[test]
    fn set_write_dir() -> Result<()> {
        let resources = resources();
        let mut vfs = Vfs::new();
        assert_eq!(vfs.write_dir(), std::env::current_dir().ok().as_deref());

        vfs.set_write_dir(resources.path())?;
        assert_eq!(vfs.write_dir(), Some(resources.path()));
        assert!(vfs.set_write_dir("MissingDirectory").is_err());
        assert!(matches!(
            vfs.set_write_dir(resources.path().join("text.txt")),
            Err(VfsError::NotADirectory(_))
        ));
        assert_eq!(vfs.write_dir(), Some(resources.path()));
        Ok(())
    }

    #[test]
    fn from_config() -> Result<()> {
        let resources = resources();
        let config = VfsConfig {
            write_dir: Some(resources.path().to_path_buf()),
            allow_symlinks: false,
            mounts: vec![MountConfig {
                source: resources.path().to_path_buf(),
                mount_point: "assets".into(),
            }],
        };

        let vfs = Vfs::from_config(&config)?;
        assert!(vfs.file_exists("assets/images/image.png"));
        assert_eq!(vfs.write_dir(), Some(resources.path()));
        Ok(())
    }

    #[test]
    fn pref_dir_rejects_bad_names() {
        assert!(matches!(
            pref_dir("", "game"),
            Err(VfsError::BadFilename(_))
        ));
        assert!(matches!(
            pref_dir("studio", "a/b"),
            Err(VfsError::BadFilename(_))
        ));
    }
}
