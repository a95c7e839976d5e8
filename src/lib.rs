//! Mount directories and archives into one read-only search path with a
//! separate write directory, then load game assets out of it.

pub use mountfs_asset as asset;
pub use mountfs_audio as audio;
pub use mountfs_font as font;
pub use mountfs_graphics as graphics;
pub use mountfs_image as image;
pub use mountfs_vfs as vfs;

pub use mountfs_asset::{source::vfs::GlobalVfs, AssetStore};
pub use mountfs_vfs::{global, Vfs, VfsConfig, VfsError};
