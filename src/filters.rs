use image::{DynamicImage, RgbaImage, imageops};

/// Gaussian sigma used for the blur filter.
const BLUR_SIGMA: f32 = 2.0;

/// Laplacian edge kernel; inverted afterwards to get dark contours on a
/// light ground.
const CONTOUR_KERNEL: [f32; 9] = [-1.0, -1.0, -1.0, -1.0, 8.0, -1.0, -1.0, -1.0, -1.0];

/// Whole-canvas filters, delegating to the `image` crate's built-in
/// routines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    Grayscale,
    Blur,
    Contour,
    /// Brightness adjustment in percent, -100..=100.
    Brightness(i32),
}

impl Filter {
    pub fn name(self) -> &'static str {
        match self {
            Filter::Grayscale => "Grayscale",
            Filter::Blur => "Blur",
            Filter::Contour => "Contour",
            Filter::Brightness(_) => "Brightness",
        }
    }
}

/// Apply `filter` to a copy of `pixels` and return the result. The input is
/// left untouched so the caller can snapshot it first.
pub fn apply(pixels: &RgbaImage, filter: Filter) -> RgbaImage {
    match filter {
        Filter::Grayscale => DynamicImage::ImageRgba8(pixels.clone())
            .grayscale()
            .to_rgba8(),
        Filter::Blur => imageops::blur(pixels, BLUR_SIGMA),
        Filter::Contour => {
            let mut out = imageops::filter3x3(pixels, &CONTOUR_KERNEL);
            imageops::invert(&mut out);
            // The zero-sum kernel also zeroes the alpha channel; the canvas
            // is opaque, so force it back.
            for pixel in out.pixels_mut() {
                pixel.0[3] = 255;
            }
            out
        }
        Filter::Brightness(percent) => {
            let offset = percent.clamp(-100, 100) * 255 / 100;
            imageops::brighten(pixels, offset)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn test_image() -> RgbaImage {
        let mut img = RgbaImage::from_pixel(8, 8, Rgba([200, 100, 50, 255]));
        img.put_pixel(4, 4, Rgba([10, 20, 30, 255]));
        img
    }

    #[test]
    fn grayscale_equalizes_the_color_channels() {
        let out = apply(&test_image(), Filter::Grayscale);
        for pixel in out.pixels() {
            assert_eq!(pixel.0[0], pixel.0[1]);
            assert_eq!(pixel.0[1], pixel.0[2]);
            assert_eq!(pixel.0[3], 255);
        }
    }

    #[test]
    fn brightness_saturates_at_the_channel_limits() {
        let out = apply(&test_image(), Filter::Brightness(100));
        assert_eq!(out.get_pixel(0, 0).0[0], 255);

        let out = apply(&test_image(), Filter::Brightness(-100));
        assert_eq!(out.get_pixel(0, 0).0[2], 0);
    }

    #[test]
    fn brightness_zero_is_identity() {
        let img = test_image();
        let out = apply(&img, Filter::Brightness(0));
        assert_eq!(out.as_raw(), img.as_raw());
    }

    #[test]
    fn contour_output_stays_opaque() {
        let out = apply(&test_image(), Filter::Contour);
        for pixel in out.pixels() {
            assert_eq!(pixel.0[3], 255);
        }
    }

    #[test]
    fn filters_preserve_dimensions() {
        let img = test_image();
        for filter in [
            Filter::Grayscale,
            Filter::Blur,
            Filter::Contour,
            Filter::Brightness(40),
        ] {
            let out = apply(&img, filter);
            assert_eq!(out.dimensions(), img.dimensions());
        }
    }
}
