/// Grayscale filter for the demo panel
use image::RgbaImage;

use crate::error::Result;
use crate::state::data::SourceImage;

/// Replace R, G and B of every pixel with their rounded mean.
/// Alpha is left untouched.
pub fn grayscale_in_place(image: &mut RgbaImage) {
    for pixel in image.pixels_mut() {
        let [r, g, b, _] = pixel.0;
        let sum = r as u16 + g as u16 + b as u16;
        // Thirds never tie, so (sum + 1) / 3 is round-to-nearest
        let mean = ((sum + 1) / 3) as u8;
        pixel.0[0] = mean;
        pixel.0[1] = mean;
        pixel.0[2] = mean;
    }
}

/// Grayscale copy of a loaded image
pub fn grayscale(source: &SourceImage) -> Result<RgbaImage> {
    let mut canvas = source.to_canvas()?;
    grayscale_in_place(&mut canvas);
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_mean_is_rounded_and_alpha_kept() {
        let mut image = RgbaImage::new(3, 1);
        image.put_pixel(0, 0, Rgba([1, 1, 2, 255])); // 1.33
        image.put_pixel(1, 0, Rgba([1, 2, 2, 10])); // 1.67
        image.put_pixel(2, 0, Rgba([255, 255, 255, 0]));

        grayscale_in_place(&mut image);

        assert_eq!(*image.get_pixel(0, 0), Rgba([1, 1, 1, 255]));
        assert_eq!(*image.get_pixel(1, 0), Rgba([2, 2, 2, 10]));
        assert_eq!(*image.get_pixel(2, 0), Rgba([255, 255, 255, 0]));
    }

    #[test]
    fn test_grayscale_is_idempotent() {
        let source = SourceImage::from_rgba(RgbaImage::from_fn(16, 16, |x, y| {
            Rgba([(x * 16) as u8, (y * 13) as u8, ((x * y) % 256) as u8, 200])
        }));

        let once = grayscale(&source).unwrap();
        let mut twice = once.clone();
        grayscale_in_place(&mut twice);

        assert_eq!(once, twice);
    }

    #[test]
    fn test_broken_buffer_reports_context_error() {
        let source = SourceImage {
            width: 2,
            height: 2,
            data: vec![0; 3],
        };
        let error = grayscale(&source).unwrap_err();
        assert_eq!(error.to_string(), "Canvas context not available");
    }
}
