use crate::{AssetError, Result};

pub mod filesystem;
pub mod vfs;

/// Where an [`AssetStore`](crate::AssetStore) reads and saves files.
pub trait FileSource {
    /// Reads the content of the file at the given path
    ///
    /// # Errors
    /// An error will be returned if the file cannot be read
    fn read_bytes(&self, path: &str) -> Result<Vec<u8>>;

    /// Writes the given data to the file at the given path
    ///
    /// # Errors
    /// An error will be returned if the file cannot be written
    fn write_bytes(&self, path: &str, data: &[u8]) -> Result<()>;

    /// Reads the content of the text file at the given path
    ///
    /// # Errors
    /// An error will be returned if the file cannot be read or is not UTF-8
    fn read_text(&self, path: &str) -> Result<String> {
        String::from_utf8(self.read_bytes(path)?).map_err(|_| AssetError::InvalidText(path.into()))
    }

    /// Writes the given text to the file at the given path
    ///
    /// # Errors
    /// An error will be returned if the file cannot be written
    fn write_text(&self, path: &str, text: &str) -> Result<()> {
        self.write_bytes(path, text.as_bytes())
    }
}
