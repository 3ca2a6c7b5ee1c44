//! Pixel transforms. Each one borrows its input and returns a new buffer.

use image::imageops::{self, FilterType};

use crate::buffer::{PixelBuffer, WHITE};
use crate::format::{FilterName, FilterSettings};

/// Upper bound on the blur sigma; larger kernels cost a lot and look the same.
pub const MAX_BLUR_SIGMA: f32 = 100.0;

/// Contrast is a percentage in this range; values outside are clamped.
pub const CONTRAST_LIMIT: i32 = 100;

pub const PROFILE_PICTURE_SIZE: u32 = 400;

/// Crop the largest centered square. Never adds pixels.
pub fn square_crop(buffer: &PixelBuffer) -> PixelBuffer {
    let (width, height) = buffer.dimensions();
    let size = width.min(height);
    let offset_x = (width - size) / 2;
    let offset_y = (height - size) / 2;

    imageops::crop_imm(buffer.as_rgba(), offset_x, offset_y, size, size)
        .to_image()
        .into()
}

/// Center the image on an opaque white square canvas. Never crops.
pub fn fit_to_square(buffer: &PixelBuffer) -> PixelBuffer {
    let (width, height) = buffer.dimensions();
    let frame = width.max(height);
    let offset_x = (frame - width) / 2;
    let offset_y = (frame - height) / 2;

    let mut canvas = PixelBuffer::filled(frame, frame, WHITE).into_rgba();
    // replace copies source pixels as-is, alpha included, with no blending
    imageops::replace(
        &mut canvas,
        buffer.as_rgba(),
        i64::from(offset_x),
        i64::from(offset_y),
    );

    canvas.into()
}

pub fn invert(buffer: &PixelBuffer) -> PixelBuffer {
    let mut out = buffer.as_rgba().clone();
    for pixel in out.pixels_mut() {
        let [r, g, b, a] = pixel.0;
        pixel.0 = [255 - r, 255 - g, 255 - b, a];
    }
    out.into()
}

pub fn apply_filter(buffer: &PixelBuffer, settings: &FilterSettings) -> PixelBuffer {
    match settings.name {
        FilterName::Blur => blur(buffer, settings.intensity),
        FilterName::Grayscale => grayscale_contrast(buffer, settings.intensity),
    }
}

fn blur(buffer: &PixelBuffer, intensity: i32) -> PixelBuffer {
    let sigma = (intensity as f32).clamp(0.0, MAX_BLUR_SIGMA);
    if sigma != intensity as f32 {
        log::debug!("Blur intensity {} clamped to {}", intensity, sigma);
    }
    if sigma == 0.0 {
        return buffer.clone();
    }

    imageops::blur(buffer.as_rgba(), sigma).into()
}

fn grayscale_contrast(buffer: &PixelBuffer, intensity: i32) -> PixelBuffer {
    let contrast = intensity.clamp(-CONTRAST_LIMIT, CONTRAST_LIMIT);
    if contrast != intensity {
        log::debug!("Contrast {} clamped to {}", intensity, contrast);
    }

    // Luma keeps the alpha channel alongside the gray value
    buffer
        .to_dynamic()
        .grayscale()
        .adjust_contrast(contrast as f32)
        .into()
}

/// Pad to a square, then scale to a fixed avatar size.
pub fn profile_picture(buffer: &PixelBuffer) -> PixelBuffer {
    let framed = fit_to_square(buffer);
    imageops::resize(
        framed.as_rgba(),
        PROFILE_PICTURE_SIZE,
        PROFILE_PICTURE_SIZE,
        FilterType::Lanczos3,
    )
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    /// Every pixel is distinct so offsets can be checked exactly.
    fn gradient(width: u32, height: u32) -> PixelBuffer {
        let mut img = RgbaImage::new(width, height);
        for (x, y, pixel) in img.enumerate_pixels_mut() {
            *pixel = Rgba([x as u8, y as u8, (x * 3 + y) as u8, 255]);
        }
        img.into()
    }

    #[test]
    fn square_crop_uses_shorter_side() {
        for (w, h) in [(30, 20), (20, 30), (7, 1), (1, 9)] {
            let cropped = square_crop(&gradient(w, h));
            let side = w.min(h);
            assert_eq!(cropped.dimensions(), (side, side));
        }
    }

    #[test]
    fn square_crop_is_centered_with_truncating_offsets() {
        let src = gradient(7, 4);
        let cropped = square_crop(&src);
        // (7 - 4) / 2 = 1
        assert_eq!(cropped.pixel(0, 0), src.pixel(1, 0));
        assert_eq!(cropped.pixel(3, 3), src.pixel(4, 3));

        let src = gradient(3, 8);
        let cropped = square_crop(&src);
        // (8 - 3) / 2 = 2
        assert_eq!(cropped.pixel(0, 0), src.pixel(0, 2));
    }

    #[test]
    fn square_crop_leaves_square_image_unchanged() {
        let src = gradient(16, 16);
        assert_eq!(square_crop(&src), src);
    }

    #[test]
    fn fit_to_square_uses_longer_side() {
        for (w, h) in [(30, 20), (20, 30), (5, 5), (1, 6)] {
            let framed = fit_to_square(&gradient(w, h));
            let side = w.max(h);
            assert_eq!(framed.dimensions(), (side, side));
        }
    }

    #[test]
    fn fit_to_square_pastes_source_unchanged_on_white() {
        let src = gradient(9, 4);
        let framed = fit_to_square(&src);
        // (9 - 4) / 2 = 2 rows of padding on top, 3 below
        for y in 0..9 {
            for x in 0..9 {
                let expected = if (2..6).contains(&y) {
                    src.pixel(x, y - 2)
                } else {
                    WHITE
                };
                assert_eq!(framed.pixel(x, y), expected, "pixel ({x}, {y})");
            }
        }
    }

    #[test]
    fn fit_to_square_copies_transparent_pixels_without_blending() {
        let src = PixelBuffer::filled(2, 4, Rgba([10, 20, 30, 0]));
        let framed = fit_to_square(&src);
        assert_eq!(framed.pixel(1, 0), Rgba([10, 20, 30, 0]));
        assert_eq!(framed.pixel(0, 0), WHITE);
        assert_eq!(framed.pixel(3, 3), WHITE);
    }

    #[test]
    fn invert_flips_color_and_keeps_alpha() {
        let src = PixelBuffer::filled(2, 2, Rgba([0, 100, 255, 42]));
        let inverted = invert(&src);
        assert_eq!(inverted.pixel(1, 1), Rgba([255, 155, 0, 42]));
    }

    #[test]
    fn invert_twice_is_identity() {
        let src = gradient(13, 11);
        assert_eq!(invert(&invert(&src)), src);
    }

    #[test]
    fn blur_with_zero_or_negative_intensity_is_identity() {
        let src = gradient(10, 10);
        for intensity in [0, -5] {
            let settings = FilterSettings::new(FilterName::Blur, intensity);
            assert_eq!(apply_filter(&src, &settings), src);
        }
    }

    #[test]
    fn blur_softens_hard_edges() {
        let mut img = RgbaImage::from_pixel(20, 20, Rgba([0, 0, 0, 255]));
        for y in 0..20 {
            for x in 10..20 {
                img.put_pixel(x, y, Rgba([255, 255, 255, 255]));
            }
        }
        let blurred = apply_filter(&img.into(), &FilterSettings::new(FilterName::Blur, 3));
        assert_eq!(blurred.dimensions(), (20, 20));

        let left = blurred.pixel(9, 10).0[0];
        let right = blurred.pixel(10, 10).0[0];
        assert!(left > 0 && left < 255, "left edge pixel {left}");
        assert!(right > 0 && right < 255, "right edge pixel {right}");
    }

    #[test]
    fn grayscale_desaturates_and_keeps_alpha() {
        let src = PixelBuffer::filled(3, 3, Rgba([200, 40, 90, 128]));
        let gray = apply_filter(&src, &FilterSettings::new(FilterName::Grayscale, 0));
        let Rgba([r, g, b, a]) = gray.pixel(1, 1);
        assert_eq!(r, g);
        assert_eq!(g, b);
        assert_eq!(a, 128);
    }

    #[test]
    fn grayscale_contrast_direction_follows_sign() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([80, 80, 80, 255]));
        img.put_pixel(1, 0, Rgba([180, 180, 180, 255]));
        let src = PixelBuffer::from(img);
        let spread = |buffer: &PixelBuffer| {
            i32::from(buffer.pixel(1, 0).0[0]) - i32::from(buffer.pixel(0, 0).0[0])
        };

        let neutral = apply_filter(&src, &FilterSettings::new(FilterName::Grayscale, 0));
        let more = apply_filter(&src, &FilterSettings::new(FilterName::Grayscale, 40));
        let less = apply_filter(&src, &FilterSettings::new(FilterName::Grayscale, -40));

        assert!(spread(&more) > spread(&neutral));
        assert!(spread(&less) < spread(&neutral));
        assert!(spread(&less) >= 0);
    }

    #[test]
    fn grayscale_minimum_contrast_flattens_to_mid_gray() {
        let src = gradient(8, 8);
        let flat = apply_filter(&src, &FilterSettings::new(FilterName::Grayscale, -250));
        for pixel in flat.as_rgba().pixels() {
            assert!((127..=128).contains(&pixel.0[0]), "got {:?}", pixel);
        }
    }

    #[test]
    fn profile_picture_is_fixed_size() {
        for (w, h) in [(300, 200), (50, 120), (1000, 1000)] {
            let avatar = profile_picture(&gradient(w, h));
            assert_eq!(avatar.dimensions(), (PROFILE_PICTURE_SIZE, PROFILE_PICTURE_SIZE));
        }
    }
}
