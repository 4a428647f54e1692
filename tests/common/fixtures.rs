//! Test fixtures: generated images and multipart bodies.

use image::{ImageFormat, RgbImage};
use std::io::Cursor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];
pub const BLUE: [u8; 3] = [0, 0, 255];
pub const WHITE: [u8; 3] = [255, 255, 255];

const BOUNDARY: &str = "chromapie-test-boundary";

fn encode(img: &RgbImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, format).expect("Failed to encode image");
    buf.into_inner()
}

/// The 2x2 image red, red / green, blue
pub fn two_by_two_png() -> Vec<u8> {
    let pixels = [RED, RED, GREEN, BLUE];
    let img = RgbImage::from_fn(2, 2, |x, y| image::Rgb(pixels[(y * 2 + x) as usize]));
    encode(&img, ImageFormat::Png)
}

/// Horizontal bands: 50% white, 30% red, 20% blue (100x10)
pub fn banded_png() -> Vec<u8> {
    let img = RgbImage::from_fn(100, 10, |x, _| {
        image::Rgb(match x {
            0..=49 => WHITE,
            50..=79 => RED,
            _ => BLUE,
        })
    });
    encode(&img, ImageFormat::Png)
}

/// A solid-color JPEG
pub fn solid_jpeg(color: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(16, 16, image::Rgb(color));
    encode(&img, ImageFormat::Jpeg)
}

/// A 1x1 GIF (not an accepted format)
pub fn tiny_gif() -> Vec<u8> {
    b"GIF89a\x01\x00\x01\x00\x80\x00\x00\xff\xff\xff\x00\x00\x00!\xf9\x04\x01\x00\x00\x00\x00,\x00\x00\x00\x00\x01\x00\x01\x00\x00\x02\x02D\x01\x00;".to_vec()
}

/// A PNG cut off after its header
pub fn truncated_png() -> Vec<u8> {
    let mut png = two_by_two_png();
    png.truncate(24);
    png
}

/// Multipart body with one file field; returns (Content-Type header, body)
pub fn multipart_body(
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n")
            .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {content_type}\r\n\r\n").as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (multipart_content_type(), body)
}

/// Multipart body with a single text field
pub fn multipart_text_body(field: &str, value: &str) -> (String, Vec<u8>) {
    let body = format!(
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"\r\n\r\n{value}\r\n--{BOUNDARY}--\r\n"
    );
    (multipart_content_type(), body.into_bytes())
}

pub fn multipart_content_type() -> String {
    format!("multipart/form-data; boundary={BOUNDARY}")
}
