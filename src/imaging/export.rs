/// PNG export for the composite preview and the grayscale widget

use image::{ImageFormat, RgbaImage};
use std::io::Cursor;
use std::path::Path;

use crate::error::{Error, Result};

/// File name suggested by the grayscale widget's save dialog
pub const PROCESSED_FILE_NAME: &str = "processed-image.png";
/// File name suggested when saving the nail preview
pub const PREVIEW_FILE_NAME: &str = "nail-preview.png";

/// Encode pixels as an in-memory PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(Error::Encode)?;
    Ok(bytes)
}

/// Encode and write a PNG file
pub fn save_png(image: &RgbaImage, path: &Path) -> Result<()> {
    let bytes = encode_png(image)?;

    std::fs::write(path, &bytes).map_err(|source| Error::Write {
        path: path.to_path_buf(),
        source,
    })?;

    log::info!("Saved {}x{} PNG to {}", image.width(), image.height(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_encode_png_has_signature() {
        let bytes = encode_png(&RgbaImage::new(2, 2)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn test_saved_png_is_lossless() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(PROCESSED_FILE_NAME);
        let mut image = RgbaImage::from_pixel(3, 2, Rgba([9, 8, 7, 255]));
        image.put_pixel(2, 1, Rgba([200, 100, 50, 128]));

        save_png(&image, &path).unwrap();

        let reloaded = image::open(&path).unwrap().into_rgba8();
        assert_eq!(reloaded, image);
    }

    #[test]
    fn test_save_into_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.png");

        assert!(matches!(
            save_png(&RgbaImage::new(1, 1), &path),
            Err(Error::Write { .. })
        ));
    }
}
