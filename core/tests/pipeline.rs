use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use image_converter_core::pipeline::{self, Operation};
use image_converter_core::{ConvertError, ConvertOptions, FilterSettings, OutputFormat};

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn opaque_sample(width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    for (x, y, pixel) in img.enumerate_pixels_mut() {
        *pixel = Rgba([(x % 200) as u8, (y % 200) as u8, ((x + y) % 180) as u8, 255]);
    }
    img
}

fn encode_as(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    DynamicImage::ImageRgba8(img.clone())
        .to_rgb8()
        .write_to(&mut out, format)
        .unwrap();
    out.into_inner()
}

fn decode_output(bytes: &[u8]) -> RgbaImage {
    image::load_from_memory(bytes).unwrap().into_rgba8()
}

#[test]
fn fit_to_square_png_pads_landscape_with_white_rows() {
    let src = opaque_sample(300, 200);
    let input = encode_as(&src, ImageFormat::Png);

    let options = ConvertOptions::new(OutputFormat::Png, 80);
    let encoded = pipeline::fit_to_square(Cursor::new(input), options).unwrap();
    assert_eq!(encoded.content_type, "image/png");

    let out = decode_output(&encoded.bytes);
    assert_eq!(out.dimensions(), (300, 300));

    for x in 0..300 {
        for y in (0..50).chain(250..300) {
            assert_eq!(*out.get_pixel(x, y), WHITE, "border pixel ({x}, {y})");
        }
        for y in 50..250 {
            assert_eq!(out.get_pixel(x, y), src.get_pixel(x, y - 50), "pixel ({x}, {y})");
        }
    }
}

#[test]
fn square_crop_output_is_jpeg_of_shorter_side() {
    let input = encode_as(&opaque_sample(120, 75), ImageFormat::Png);
    let encoded = pipeline::square_crop(Cursor::new(input)).unwrap();

    assert_eq!(encoded.format, OutputFormat::Jpeg);
    assert_eq!(encoded.content_type, "image/jpeg");
    assert_eq!(decode_output(&encoded.bytes).dimensions(), (75, 75));
}

#[test]
fn square_crop_keeps_square_dimensions() {
    let input = encode_as(&opaque_sample(64, 64), ImageFormat::Bmp);
    let encoded = pipeline::square_crop(Cursor::new(input)).unwrap();
    assert_eq!(decode_output(&encoded.bytes).dimensions(), (64, 64));
}

#[test]
fn convert_quality_bounds_for_lossy_formats() {
    let input = encode_as(&opaque_sample(16, 16), ImageFormat::Png);

    for format in [OutputFormat::Jpeg, OutputFormat::Webp] {
        for quality in [0, 101] {
            let result = pipeline::convert(Cursor::new(&input), ConvertOptions::new(format, quality));
            assert!(
                matches!(result, Err(ConvertError::InvalidQuality(q)) if q == quality),
                "{format} at quality {quality}"
            );
        }
        for quality in [1, 100] {
            let encoded =
                pipeline::convert(Cursor::new(&input), ConvertOptions::new(format, quality))
                    .unwrap();
            assert_eq!(encoded.format, format);
            assert_eq!(decode_output(&encoded.bytes).dimensions(), (16, 16));
        }
    }
}

#[test]
fn convert_png_accepts_any_quality() {
    let src = opaque_sample(10, 6);
    let input = encode_as(&src, ImageFormat::Jpeg);

    for quality in [-1, 0, 80, 101, 5000] {
        let options = ConvertOptions::new(OutputFormat::Png, quality);
        let encoded = pipeline::convert(Cursor::new(&input), options).unwrap();
        assert_eq!(encoded.content_type, "image/png");
    }
}

#[test]
fn convert_accepts_gif_input() {
    let input = encode_as(&opaque_sample(20, 10), ImageFormat::Gif);
    let encoded = pipeline::convert(Cursor::new(input), OutputFormat::Webp.into()).unwrap();
    assert_eq!(encoded.content_type, "image/webp");
    assert_eq!(decode_output(&encoded.bytes).dimensions(), (20, 10));
}

#[test]
fn invert_twice_through_jpeg_stays_close() {
    let src = opaque_sample(40, 30);
    let once = pipeline::run(
        Cursor::new(encode_as(&src, ImageFormat::Png)),
        &Operation::Invert,
    )
    .unwrap();

    // Fixed JPEG output is lossy, so compare with a tolerance
    let twice = pipeline::invert(Cursor::new(once.bytes)).unwrap();
    let out = decode_output(&twice.bytes);
    let max_diff = out
        .pixels()
        .zip(src.pixels())
        .flat_map(|(a, b)| (0..3).map(move |c| a.0[c].abs_diff(b.0[c])))
        .max()
        .unwrap();
    assert!(max_diff < 40, "max channel difference {max_diff}");
}

#[test]
fn unknown_filter_fails_for_any_intensity() {
    for intensity in [0, 10, -3, 9999] {
        assert!(matches!(
            FilterSettings::parse("sepia", intensity),
            Err(ConvertError::UnknownFilter(_))
        ));
    }
}

#[test]
fn apply_filter_outputs_jpeg() {
    let input = encode_as(&opaque_sample(32, 24), ImageFormat::Png);
    let settings = FilterSettings::parse("grayscale", 25).unwrap();
    let encoded = pipeline::apply_filter(Cursor::new(input), settings).unwrap();

    assert_eq!(encoded.content_type, "image/jpeg");
    let out = decode_output(&encoded.bytes);
    assert_eq!(out.dimensions(), (32, 24));
}

#[test]
fn profile_picture_is_400_square_jpeg() {
    let input = encode_as(&opaque_sample(300, 200), ImageFormat::Png);
    let encoded = pipeline::profile_picture(Cursor::new(input)).unwrap();
    assert_eq!(encoded.content_type, "image/jpeg");
    assert_eq!(decode_output(&encoded.bytes).dimensions(), (400, 400));
}

#[test]
fn garbage_input_is_a_decode_error() {
    let result = pipeline::invert(Cursor::new(b"definitely not pixels".to_vec()));
    assert!(matches!(result, Err(ConvertError::Decode(_))));
}
