use log::warn;
use mountfs_asset::AssetStore;

use crate::{GraphicsError, Result};

/// Source code of the stages of a shader program.
///
/// A missing stage means the backend's default one should be used.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: Option<String>,
    pub fragment: Option<String>,
}

impl ShaderSource {
    /// Loads the source of each given stage.
    ///
    /// A stage whose file cannot be loaded is skipped.
    ///
    /// # Errors
    ///
    /// Will return [`GraphicsError::MissingShaderSources`] if no stage could be loaded
    pub fn load(
        asset_store: &AssetStore,
        vertex_path: Option<&str>,
        fragment_path: Option<&str>,
    ) -> Result<Self> {
        let load_stage = |path: Option<&str>| {
            let path = path?;
            asset_store
                .load_file_text(path)
                .inspect_err(|e| warn!("Skipping shader stage '{path}': {e}"))
                .ok()
        };

        let source = Self {
            vertex: load_stage(vertex_path),
            fragment: load_stage(fragment_path),
        };
        if source.vertex.is_none() && source.fragment.is_none() {
            return Err(GraphicsError::MissingShaderSources);
        }

        Ok(source)
    }
}
