use crate::error::EditorError;
use image::{DynamicImage, RgbaImage};
use std::path::Path;

/// Extensions offered in the file dialogs and accepted for open.
/// Anything else the `image` crate recognizes by extension still loads.
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "webp"];

/// Decode an image file into RGBA pixels.
pub fn load(path: &Path) -> Result<RgbaImage, EditorError> {
    let img = image::open(path)?;
    log::info!(
        "loaded {} ({}x{})",
        path.display(),
        img.width(),
        img.height()
    );
    Ok(img.to_rgba8())
}

/// Encode `pixels` to `path`, with the format chosen by the destination
/// extension. JPEG has no alpha channel, so it is flattened to RGB first.
pub fn save(path: &Path, pixels: &RgbaImage) -> Result<(), EditorError> {
    let ext = path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "jpg" | "jpeg" => {
            DynamicImage::ImageRgba8(pixels.clone()).to_rgb8().save(path)?;
        }
        _ => {
            pixels.save(path)?;
        }
    }
    log::info!("saved {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn save_rejects_an_unknown_extension() {
        let pixels = RgbaImage::from_pixel(2, 2, Rgba([0, 0, 0, 255]));
        let path = std::env::temp_dir().join("pixelpad_test.notanimage");
        assert!(save(&path, &pixels).is_err());
    }

    #[test]
    fn png_round_trip_preserves_pixels() {
        let mut pixels = RgbaImage::from_pixel(3, 3, Rgba([255, 255, 255, 255]));
        pixels.put_pixel(1, 1, Rgba([12, 34, 56, 255]));
        let path = std::env::temp_dir().join("pixelpad_test_roundtrip.png");

        save(&path, &pixels).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.as_raw(), pixels.as_raw());

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn jpeg_save_flattens_alpha() {
        let pixels = RgbaImage::from_pixel(4, 4, Rgba([10, 200, 30, 255]));
        let path = std::env::temp_dir().join("pixelpad_test_flatten.jpg");

        save(&path, &pixels).unwrap();
        let loaded = load(&path).unwrap();
        assert_eq!(loaded.dimensions(), (4, 4));
        assert!(loaded.pixels().all(|p| p.0[3] == 255));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn load_reports_missing_files_as_io_failures() {
        let path = std::env::temp_dir().join("pixelpad_does_not_exist.png");
        assert!(matches!(load(&path), Err(EditorError::IoFailure(_))));
    }
}
