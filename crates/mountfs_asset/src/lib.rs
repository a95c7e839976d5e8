#![warn(clippy::pedantic)]

use log::{debug, warn};
use std::{any::Any, ffi::OsStr, hash::Hasher, marker::PhantomData, path::Path};

use mountfs_vfs::VfsError;
use source::FileSource;

pub mod source;
pub type Result<T> = std::result::Result<T, AssetError>;

#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("read failed: {0}")]
    ReadFailed(#[source] VfsError),
    #[error("write failed: {0}")]
    WriteFailed(#[source] VfsError),
    #[error("'{0}' is empty")]
    EmptyFile(String),
    #[error("'{0}' is not valid UTF-8 text")]
    InvalidText(String),
    #[error("decoding failed: {0}")]
    DecodingFailed(String),
    #[error("unsupported format '{0}'")]
    UnsupportedFormat(String),
    #[error("couldn't locate the executable: {0}")]
    ExecutablePathAcquisitionFailed(#[source] std::io::Error),
}

#[derive(Debug)]
pub struct AssetHandle<T> {
    id: usize,
    _marker: PhantomData<T>,
}

impl<T> AssetHandle<T> {
    #[must_use]
    pub fn id(&self) -> usize {
        self.id
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for AssetHandle<T> {}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> std::hash::Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T: 'static> AssetHandle<T> {
    #[must_use]
    fn new(id: usize) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

pub type LoaderSettings<A> = <<A as Asset>::Loader as AssetLoader<A>>::Settings;

pub struct AssetStore {
    source: Box<dyn FileSource>,
    assets: Vec<Box<dyn Any>>,
}
impl AssetStore {
    #[must_use]
    pub fn new<S>(source: S) -> Self
    where
        S: FileSource + 'static,
    {
        Self {
            source: Box::new(source),
            assets: vec![],
        }
    }

    /// Routes every subsequent file load and save through the given source
    pub fn set_source<S>(&mut self, source: S)
    where
        S: FileSource + 'static,
    {
        debug!("Asset file source replaced");
        self.source = Box::new(source);
    }

    /// Reads the content of a file
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or is empty
    pub fn load_file_data(&self, path: &str) -> Result<Vec<u8>> {
        let bytes = self
            .source
            .read_bytes(path)
            .inspect_err(|e| warn!("Couldn't load '{path}': {e}"))?;
        if bytes.is_empty() {
            warn!("Tried to load empty file '{path}'");
            return Err(AssetError::EmptyFile(path.into()));
        }
        Ok(bytes)
    }

    /// Reads the content of a text file
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read, is
    /// empty or is not UTF-8
    pub fn load_file_text(&self, path: &str) -> Result<String> {
        let text = self
            .source
            .read_text(path)
            .inspect_err(|e| warn!("Couldn't load '{path}': {e}"))?;
        if text.is_empty() {
            warn!("Tried to load empty file '{path}'");
            return Err(AssetError::EmptyFile(path.into()));
        }
        Ok(text)
    }

    /// Saves data to a file
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be written
    pub fn save_file_data(&self, path: &str, data: &[u8]) -> Result<()> {
        self.source
            .write_bytes(path, data)
            .inspect_err(|e| warn!("Couldn't save '{path}': {e}"))
    }

    /// Saves text to a file
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be written
    pub fn save_file_text(&self, path: &str, text: &str) -> Result<()> {
        self.source
            .write_text(path, text)
            .inspect_err(|e| warn!("Couldn't save '{path}': {e}"))
    }

    /// Loads an asset using an asset path and returns the asset without storing it
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or if
    /// the asset cannot be decoded.
    pub fn load_without_storing<A>(&self, asset_path: &str) -> Result<A>
    where
        A: 'static + Asset,
    {
        self.load_with_settings(asset_path, &Default::default())
    }

    /// Loads an asset using an asset path and loader settings, without storing it
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or if
    /// the asset cannot be decoded.
    pub fn load_with_settings<A>(
        &self,
        asset_path: &str,
        settings: &LoaderSettings<A>,
    ) -> Result<A>
    where
        A: 'static + Asset,
    {
        let bytes = self.load_file_data(asset_path)?;
        A::Loader::load(&bytes, &extension(asset_path), settings)
            .inspect_err(|e| warn!("Couldn't decode '{asset_path}': {e}"))
    }

    /// Loads an asset using an asset path
    ///
    /// # Errors
    ///
    /// This function will return an error if the file cannot be read or if
    /// the asset cannot be decoded.
    pub fn load<A>(&mut self, asset_path: &str) -> Result<AssetHandle<A>>
    where
        A: 'static + Asset,
    {
        Ok(self.store(self.load_without_storing(asset_path)?))
    }

    pub fn store<A>(&mut self, asset: A) -> AssetHandle<A>
    where
        A: 'static + Asset,
    {
        let asset_id = self.assets.len();
        self.assets.push(Box::new(asset));
        AssetHandle::new(asset_id)
    }

    #[must_use]
    pub fn get<T: 'static>(&self, handle: AssetHandle<T>) -> Option<&T> {
        self.assets.get(handle.id)?.downcast_ref()
    }

    pub fn get_mut<T: 'static>(&mut self, handle: AssetHandle<T>) -> Option<&mut T> {
        self.assets.get_mut(handle.id)?.downcast_mut()
    }

    #[must_use]
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }
}

pub trait Asset: Sized {
    type Loader: AssetLoader<Self>;
}

pub trait AssetLoader<T> {
    type Settings: Default;

    /// Loads an asset from the content of its file.
    ///
    /// `extension` is the lowercase extension of the file, without the dot,
    /// and serves as a format hint.
    ///
    /// # Errors
    ///
    /// This function will return an error if the the asset cannot be loaded
    fn load(file_content: &[u8], extension: &str, settings: &Self::Settings) -> Result<T>;
}

/// Returns the lowercase extension of a path, without the dot
#[must_use]
pub fn extension(path: &str) -> String {
    Path::new(path)
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_ascii_lowercase)
        .unwrap_or_default()
}
