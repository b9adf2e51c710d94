/// Image file loader
///
/// Reads and decodes an image file into RGBA8 at its natural resolution.
/// Decoding runs on the blocking pool so the UI thread stays responsive.

use std::path::{Path, PathBuf};
use tokio::task;

use crate::error::{Error, Result};
use crate::state::data::SourceImage;

/// Extensions accepted by the editor's file dialog
pub const EDITOR_EXTENSIONS: [&str; 3] = ["png", "jpg", "jpeg"];

/// Extensions of every format the `image` crate can decode
pub fn decodable_extensions() -> Vec<&'static str> {
    image::ImageFormat::all()
        .filter(|format| format.reading_enabled())
        .flat_map(|format| format.extensions_str().iter().copied())
        .collect()
}

/// Load an image file
///
/// # Returns
/// * `Ok(SourceImage)` - RGBA8 pixels and natural dimensions
/// * `Err(Error::Read)` - the file could not be read
/// * `Err(Error::Decode)` - the bytes are not a supported image
pub async fn load_image(path: PathBuf) -> Result<SourceImage> {
    // Decoding large JPEGs is CPU-bound
    task::spawn_blocking(move || load_image_blocking(&path)).await?
}

/// Blocking implementation of image loading
pub fn load_image_blocking(path: &Path) -> Result<SourceImage> {
    let bytes = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let decoded = image::load_from_memory(&bytes).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })?;

    let source = SourceImage::from_rgba(decoded.into_rgba8());
    log::info!(
        "Loaded {}: {}x{}",
        path.display(),
        source.width,
        source.height
    );

    Ok(source)
}
