//! Gaussian blur step.

use image::RgbaImage;

/// Blur `image` with a gaussian of standard deviation `sigma` pixels.
///
/// A non-positive or non-finite sigma returns the image unchanged.
pub fn gaussian_blur(image: &RgbaImage, sigma: f32) -> RgbaImage {
    if !(sigma.is_finite() && sigma > 0.0) || image.width() == 0 || image.height() == 0 {
        return image.clone();
    }
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn test_zero_sigma_is_identity() {
        let img = RgbaImage::from_fn(4, 4, |x, y| Rgba([(x * 60) as u8, (y * 60) as u8, 0, 255]));
        assert_eq!(gaussian_blur(&img, 0.0), img);
        assert_eq!(gaussian_blur(&img, f32::NAN), img);
    }

    #[test]
    fn test_blur_softens_edge() {
        let img = RgbaImage::from_fn(8, 1, |x, _| {
            if x < 4 {
                Rgba([0, 0, 0, 255])
            } else {
                Rgba([255, 255, 255, 255])
            }
        });
        let out = gaussian_blur(&img, 1.0);
        assert_eq!(out.dimensions(), (8, 1));
        let left = out.get_pixel(3, 0)[0];
        let right = out.get_pixel(4, 0)[0];
        assert!(left > 0 && right < 255);
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let img = RgbaImage::from_pixel(5, 5, Rgba([90, 90, 90, 255]));
        let out = gaussian_blur(&img, 2.0);
        let px = out.get_pixel(2, 2);
        assert!(px[0] >= 89 && px[0] <= 90);
        assert_eq!(px[0], px[1]);
    }
}
