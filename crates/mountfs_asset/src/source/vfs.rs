use mountfs_vfs::{global, Vfs};

use super::FileSource;
use crate::{AssetError, Result};

impl FileSource for Vfs {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        self.read(path).map_err(AssetError::ReadFailed)
    }

    fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()> {
        self.write(path, data).map_err(AssetError::WriteFailed)
    }
}

/// The process-wide virtual filesystem of [`mountfs_vfs::global`].
///
/// Installing it with [`AssetStore::set_source`](crate::AssetStore::set_source)
/// makes every load and save of the store go through the search path and the
/// write directory of the shared instance.
#[derive(Debug, Default, Clone, Copy)]
pub struct GlobalVfs;

impl FileSource for GlobalVfs {
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>> {
        global::with(|vfs| vfs.read(path))
            .and_then(std::convert::identity)
            .map_err(AssetError::ReadFailed)
    }

    fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()> {
        global::with(|vfs| vfs.write(path, data))
            .and_then(std::convert::identity)
            .map_err(AssetError::WriteFailed)
    }
}

#[cfg(test)]
mod tests {
    use mountfs_vfs::{MemoryArchive, VfsError};

    use super::*;
    use crate::AssetStore;

    #[test]
    fn store_over_vfs() -> Result<()> {
        let dir = tempfile::tempdir().unwrap();
        let mut archive = MemoryArchive::new();
        archive
            .insert_file("text.txt", b"Hello, World!".as_slice(), None)
            .unwrap();

        let mut vfs = Vfs::new();
        vfs.mount_archive("memory", archive, "assets").unwrap();
        vfs.set_write_dir(dir.path()).unwrap();

        let asset_store = AssetStore::new(vfs);
        assert_eq!(&asset_store.load_file_text("assets/text.txt")?[7..12], "World");
        asset_store.save_file_data("SaveFileData.txt", b"Hello")?;
        assert_eq!(std::fs::read(dir.path().join("SaveFileData.txt")).unwrap(), b"Hello");
        Ok(())
    }

    // The only test of this crate touching the process-wide instance.
    #[test]
    fn global_source() -> Result<()> {
        let asset_store = AssetStore::new(GlobalVfs);
        assert!(matches!(
            asset_store.load_file_data("text.txt"),
            Err(AssetError::ReadFailed(VfsError::NotInitialized))
        ));

        let mut archive = MemoryArchive::new();
        archive
            .insert_file("text.txt", b"global".as_slice(), None)
            .unwrap();
        let mut vfs = Vfs::new();
        vfs.mount_archive("memory", archive, "").unwrap();
        global::init_with(vfs).unwrap();

        let loaded = asset_store.load_file_text("text.txt");
        global::deinit().unwrap();
        assert_eq!(loaded?, "global");
        Ok(())
    }
}
