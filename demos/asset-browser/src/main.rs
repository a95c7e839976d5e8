//! Mounts the directories and archives given on the command line (or the
//! mounts listed in a `.ron` configuration file) and walks the merged tree,
//! decoding every asset it recognizes.
//!
//! `RUST_LOG=debug cargo run -p asset-browser -- mounts.ron assets/ patch.zip`

use log::{error, info, warn};
use mountfs::{
    asset::extension,
    audio::Wave,
    font::Font,
    global,
    image::Image,
    vfs::Metadata,
    AssetStore, GlobalVfs, Vfs, VfsConfig, VfsError,
};

fn main() -> Result<(), VfsError> {
    env_logger::init();

    let vfs = build_vfs(std::env::args().skip(1))?;
    global::init_with(vfs)?;

    let asset_store = AssetStore::new(GlobalVfs);
    walk(&asset_store, "")?;

    global::deinit()
}

/// Applies the configuration file, if any, then mounts the other arguments
/// at the root after the configured mounts
fn build_vfs(arguments: impl IntoIterator<Item = String>) -> Result<Vfs, VfsError> {
    let (configs, sources): (Vec<String>, Vec<String>) = arguments
        .into_iter()
        .partition(|argument| argument.ends_with(".ron"));

    let mut vfs = match configs.as_slice() {
        [] => Vfs::new(),
        [config] => Vfs::from_config(&VfsConfig::load(config)?)?,
        [_, extra, ..] => {
            error!("Only one configuration file can be given");
            return Err(VfsError::BadFilename(extra.clone()));
        }
    };
    for source in &sources {
        vfs.mount(source, "")?;
    }
    Ok(vfs)
}

fn walk(asset_store: &AssetStore, dir: &str) -> Result<(), VfsError> {
    for name in global::with(|vfs| vfs.read_dir(dir))?? {
        let path = if dir.is_empty() {
            name
        } else {
            format!("{dir}/{name}")
        };
        let metadata = global::with(|vfs| vfs.stat(&path))??;
        describe(asset_store, &path, &metadata);
        if metadata.is_dir() {
            walk(asset_store, &path)?;
        }
    }
    Ok(())
}

fn describe(asset_store: &AssetStore, path: &str, metadata: &Metadata) {
    if metadata.is_dir() {
        info!("{path}/");
        return;
    }

    let origin = global::with(|vfs| vfs.real_dir(path).map(str::to_owned))
        .ok()
        .flatten()
        .unwrap_or_default();
    let description = match extension(path).as_str() {
        "png" | "jpg" | "jpeg" | "bmp" | "tga" | "gif" | "qoi" => asset_store
            .load_without_storing::<Image>(path)
            .map(|image| format!("{}x{} image", image.width(), image.height())),
        "wav" | "wave" | "ogg" | "mp3" | "flac" => asset_store
            .load_without_storing::<Wave>(path)
            .map(|wave| {
                format!(
                    "{} frames of {}Hz audio",
                    wave.frame_count(),
                    wave.sample_rate()
                )
            }),
        "ttf" | "otf" => asset_store
            .load_without_storing::<Font>(path)
            .map(|font| format!("font with {} glyphs", font.glyphs().len())),
        "txt" | "ron" | "vs" | "fs" | "glsl" => asset_store
            .load_file_text(path)
            .map(|text| format!("{} lines of text", text.lines().count())),
        _ => Ok(format!("{} bytes", metadata.size)),
    };

    match description {
        Ok(description) => info!("{path} ({origin}): {description}"),
        Err(e) => warn!("{path} ({origin}): {e}"),
    }
}
