#![warn(clippy::pedantic)]

use std::io::Cursor;

use image::ImageReader;
use mountfs_asset::{Asset, AssetError, AssetLoader};

#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    RGBA8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    data: Vec<u8>,
    width: u32,
    height: u32,
    format: ImageFormat,
}

impl Image {
    /// Creates an image from raw RGBA8 pixels
    ///
    /// # Errors
    ///
    /// Will return an error if the pixel count doesn't match the dimensions
    pub fn from_rgba8(width: u32, height: u32, data: Vec<u8>) -> mountfs_asset::Result<Self> {
        let expected_len = (width as usize)
            .checked_mul(height as usize)
            .and_then(|pixels| pixels.checked_mul(4));
        if expected_len != Some(data.len()) {
            return Err(AssetError::DecodingFailed(format!(
                "{} bytes don't make a {width}x{height} RGBA8 image",
                data.len()
            )));
        }

        Ok(Self {
            data,
            width,
            height,
            format: ImageFormat::RGBA8,
        })
    }

    /// Decodes an encoded image, using the file extension as a format hint.
    ///
    /// The format is guessed from the content when the extension is unknown.
    ///
    /// # Errors
    ///
    /// Will return an error if the image cannot be decoded
    pub fn from_memory(extension: &str, file_content: &[u8]) -> mountfs_asset::Result<Self> {
        let image_reader = ImageReader::new(Cursor::new(file_content));
        let image_reader = match image::ImageFormat::from_extension(extension) {
            Some(format) => {
                let mut image_reader = image_reader;
                image_reader.set_format(format);
                image_reader
            }
            None => image_reader
                .with_guessed_format()
                .map_err(|e| AssetError::DecodingFailed(e.to_string()))?,
        };

        let image = image_reader
            .decode()
            .map_err(|e| AssetError::DecodingFailed(e.to_string()))?;

        let width = image.width();
        let height = image.height();

        Ok(Image {
            data: image.into_rgba8().into_vec(),
            width,
            height,
            format: ImageFormat::RGBA8,
        })
    }

    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn format(&self) -> ImageFormat {
        self.format
    }
}

impl Asset for Image {
    type Loader = ImageLoader;
}

pub struct ImageLoader;
impl AssetLoader<Image> for ImageLoader {
    type Settings = ();

    fn load(file_content: &[u8], extension: &str, _settings: &()) -> mountfs_asset::Result<Image> {
        Image::from_memory(extension, file_content)
    }
}
