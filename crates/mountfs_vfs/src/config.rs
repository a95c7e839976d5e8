use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Startup configuration of a [`Vfs`](crate::Vfs), usually stored as RON.
///
/// ```ron
/// (
///     write_dir: Some("saves"),
///     mounts: [
///         (source: "assets"),
///         (source: "dlc.tar.gz", mount_point: "dlc"),
///     ],
/// )
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct VfsConfig {
    pub write_dir: Option<PathBuf>,
    pub allow_symlinks: bool,
    /// Mounted in order, earlier mounts taking precedence
    pub mounts: Vec<MountConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MountConfig {
    pub source: PathBuf,
    #[serde(default)]
    pub mount_point: String,
}

impl VfsConfig {
    /// Parses a configuration from RON
    ///
    /// # Errors
    ///
    /// Will return an error if the RON is malformed
    pub fn from_ron_str(config: &str) -> Result<Self> {
        Ok(ron::from_str(config)?)
    }

    /// Reads a configuration from a RON file of the host filesystem
    ///
    /// # Errors
    ///
    /// Will return an error if the file cannot be read or is malformed
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_ron_str(&std::fs::read_to_string(path)?)
    }
}
