#![warn(clippy::pedantic)]

use mountfs_asset::{AssetError, AssetStore};
use mountfs_image::Image;

pub mod shader;
pub mod texture;

use shader::ShaderSource;

pub type Result<T> = std::result::Result<T, GraphicsError>;

#[derive(Debug, thiserror::Error)]
pub enum GraphicsError {
    #[error(transparent)]
    Asset(#[from] AssetError),
    #[error("no shader stage could be loaded")]
    MissingShaderSources,
    #[error("graphics backend failure: {0}")]
    Backend(String),
}

/// The GPU side: textures and shaders are created by the application's renderer.
pub trait GraphicsBackend {
    type Texture;
    type Shader;

    /// Uploads pixels to a new texture
    ///
    /// # Errors
    ///
    /// Will return an error if the texture cannot be created
    fn create_texture(&mut self, descriptor: &texture::Descriptor) -> Result<Self::Texture>;

    /// Compiles and links a shader program
    ///
    /// # Errors
    ///
    /// Will return an error if the program cannot be built
    fn compile_shader(&mut self, source: &ShaderSource) -> Result<Self::Shader>;
}

pub struct Graphics<B: GraphicsBackend> {
    backend: B,
    textures: texture::Cache<B::Texture>,
}

impl<B: GraphicsBackend> Graphics<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            textures: texture::Cache::new(),
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    /// Uploads an image as a texture
    ///
    /// # Errors
    ///
    /// Will return an error if the backend cannot create the texture
    pub fn upload_image(&mut self, image: &Image) -> Result<texture::Id> {
        let texture = self.backend.create_texture(&texture::Descriptor {
            data: image.data(),
            width: image.width(),
            height: image.height(),
        })?;
        Ok(self.textures.insert(texture))
    }

    /// Loads an image and uploads it as a texture
    ///
    /// # Errors
    ///
    /// Will return an error if the image cannot be loaded or uploaded
    pub fn load_texture(&mut self, asset_store: &AssetStore, path: &str) -> Result<texture::Id> {
        let image = asset_store.load_without_storing::<Image>(path)?;
        self.upload_image(&image)
    }

    #[must_use]
    pub fn texture(&self, id: texture::Id) -> Option<&B::Texture> {
        self.textures.get(id)
    }

    /// Loads the given shader stages and builds a program out of them
    ///
    /// # Errors
    ///
    /// Will return an error if neither stage can be loaded or if the backend
    /// cannot build the program
    pub fn load_shader(
        &mut self,
        asset_store: &AssetStore,
        vertex_path: Option<&str>,
        fragment_path: Option<&str>,
    ) -> Result<B::Shader> {
        let source = ShaderSource::load(asset_store, vertex_path, fragment_path)?;
        self.backend.compile_shader(&source)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use mountfs_vfs::{MemoryArchive, Vfs};

    use super::*;

    #[derive(Default)]
    struct RecordingBackend {
        uploads: Vec<(u32, u32, usize)>,
    }

    #[derive(Debug, PartialEq)]
    struct Program(ShaderSource);

    impl GraphicsBackend for RecordingBackend {
        type Texture = (u32, u32);
        type Shader = Program;

        fn create_texture(&mut self, descriptor: &texture::Descriptor) -> Result<(u32, u32)> {
            self.uploads
                .push((descriptor.width, descriptor.height, descriptor.data.len()));
            Ok((descriptor.width, descriptor.height))
        }

        fn compile_shader(&mut self, source: &ShaderSource) -> Result<Program> {
            if source
                .fragment
                .as_deref()
                .is_some_and(|fragment| !fragment.contains("void main"))
            {
                return Err(GraphicsError::Backend("no entry point".into()));
            }
            Ok(Program(source.clone()))
        }
    }

    fn asset_store() -> AssetStore {
        let mut png = Cursor::new(Vec::new());
        image::RgbaImage::new(16, 8)
            .write_to(&mut png, image::ImageFormat::Png)
            .unwrap();

        let mut archive = MemoryArchive::new();
        archive
            .insert_file("textures/atlas.png", png.into_inner(), None)
            .unwrap();
        archive
            .insert_file("shaders/base.vs", b"void main() {}".as_slice(), None)
            .unwrap();
        archive
            .insert_file("shaders/base.fs", b"void main() {}".as_slice(), None)
            .unwrap();
        archive
            .insert_file("shaders/broken.fs", b"oops".as_slice(), None)
            .unwrap();

        let mut vfs = Vfs::new();
        vfs.mount_archive("memory", archive, "").unwrap();
        AssetStore::new(vfs)
    }

    #[test]
    fn load_texture() -> Result<()> {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        let id = graphics.load_texture(&asset_store, "textures/atlas.png")?;
        assert_eq!(graphics.texture(id), Some(&(16, 8)));
        assert_eq!(graphics.backend().uploads, vec![(16, 8, 16 * 8 * 4)]);
        Ok(())
    }

    #[test]
    fn load_missing_texture() {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        assert!(matches!(
            graphics.load_texture(&asset_store, "MissingFile.png"),
            Err(GraphicsError::Asset(_))
        ));
        assert!(graphics.backend().uploads.is_empty());
    }

    #[test]
    fn load_shader_both_stages() -> Result<()> {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        let program =
            graphics.load_shader(&asset_store, Some("shaders/base.vs"), Some("shaders/base.fs"))?;
        assert_eq!(program.0.vertex.as_deref(), Some("void main() {}"));
        assert_eq!(program.0.fragment.as_deref(), Some("void main() {}"));
        Ok(())
    }

    #[test]
    fn load_shader_missing_stage_is_skipped() -> Result<()> {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        let program =
            graphics.load_shader(&asset_store, Some("MissingFile.vs"), Some("shaders/base.fs"))?;
        assert_eq!(program.0.vertex, None);
        assert!(program.0.fragment.is_some());
        Ok(())
    }

    #[test]
    fn load_shader_without_sources() {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        assert!(matches!(
            graphics.load_shader(&asset_store, Some("MissingFile.txt"), Some("MissingFile.txt")),
            Err(GraphicsError::MissingShaderSources)
        ));
        assert!(matches!(
            graphics.load_shader(&asset_store, None, None),
            Err(GraphicsError::MissingShaderSources)
        ));
    }

    #[test]
    fn backend_failure_is_reported() {
        let asset_store = asset_store();
        let mut graphics = Graphics::new(RecordingBackend::default());
        assert!(matches!(
            graphics.load_shader(&asset_store, None, Some("shaders/broken.fs")),
            Err(GraphicsError::Backend(_))
        ));
    }
}
