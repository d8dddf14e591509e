#![allow(dead_code)]

use std::io::Cursor;

use image::{ImageFormat, Rgba, RgbaImage};
use responsive_sprite_core::InputImage;

pub fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, Rgba(rgba))
}

pub fn encode(img: &RgbaImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        ImageFormat::Jpeg => image::DynamicImage::ImageRgba8(img.clone())
            .to_rgb8()
            .write_to(&mut buf, format)
            .expect("encode jpeg"),
        _ => img.write_to(&mut buf, format).expect("encode"),
    }
    buf.into_inner()
}

pub fn png_input(name: &str, img: &RgbaImage) -> InputImage {
    InputImage::new(name, encode(img, ImageFormat::Png))
}
