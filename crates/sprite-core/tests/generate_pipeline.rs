mod common;

use image::{GenericImageView, ImageFormat as Codec};
use responsive_sprite_core::prelude::*;
use responsive_sprite_core::{STYLESHEET_HEADER, SpriteError, decode_inputs, to_json};

fn two_inputs() -> Vec<InputImage> {
    vec![
        common::png_input("imgB.png", &common::solid_image(50, 50, [0, 0, 255, 255])),
        common::png_input("imgA.png", &common::solid_image(100, 50, [255, 0, 0, 128])),
    ]
}

#[test]
fn png_sprite_end_to_end() {
    let mut out = generate(two_inputs(), SpriteConfig::default()).expect("generate");
    assert_eq!(out.format, OutputFormat::Png);
    assert_eq!((out.layout.width, out.layout.height), (100, 100));

    let img = image::load_from_memory_with_format(&out.image, Codec::Png).expect("decode sprite");
    assert_eq!(img.dimensions(), (100, 100));
    let rgba = img.to_rgba8();
    // alpha preserved on copy
    assert_eq!(rgba.get_pixel(0, 0).0, [255, 0, 0, 128]);
    assert_eq!(rgba.get_pixel(0, 50).0, [0, 0, 255, 255]);
    assert_eq!(rgba.get_pixel(60, 60)[3], 0);

    assert!(out.stylesheet.starts_with(STYLESHEET_HEADER));
    assert!(out.stylesheet.contains("\n.imga, .imgb\n{ max-width: 100%; background-size: 100%; background-image: url('png.png'); }\n\n"));
    assert!(out.stylesheet.ends_with(
        ".imga { background-position: 0 0%; background-size: 100%; }\n\
         .imgb { background-position: 0 100%; background-size: 200%; }\n"
    ));

    assert_eq!(out.placeholders.len(), 2);
    assert!(out.placeholders.get(100, 50).is_some());
    assert!(out.placeholders.get(50, 50).is_some());

    let html = out.markup();
    assert_eq!(html.lines().count(), 2);
    assert!(html.starts_with("<img class=\"imga\" alt=\"\" src=\"data:image/png;base64,"));
    assert!(out.data_uri().starts_with("data:image/png;base64,"));

    let debug = format!("{out:?}");
    assert!(debug.starts_with("SpriteOutput {"));
    assert!(debug.contains("placeholders"));
}

#[test]
fn decoded_inputs_are_debuggable() {
    let decoded = decode_inputs(&two_inputs(), &SpriteConfig::default()).expect("decode");
    let debug = format!("{:?}", decoded[0]);
    assert!(debug.starts_with("DecodedImage {"));
    assert!(debug.contains("\"imgB.png\""));
}

#[test]
fn jpeg_output_respects_format_and_url() {
    let cfg = SpriteConfig::builder()
        .output_format(OutputFormat::Jpeg)
        .jpeg_quality(90)
        .reduce_artifacts(true)
        .css_url(Some("/static/sprite.jpg".into()))
        .build();
    let out = generate(two_inputs(), cfg).expect("generate");
    // 100 -> 112, 50 -> 64
    assert_eq!((out.layout.width, out.layout.height), (112, 128));
    let img = image::load_from_memory_with_format(&out.image, Codec::Jpeg).expect("decode jpeg");
    assert_eq!(img.dimensions(), (112, 128));
    assert!(out.stylesheet.contains("url('/static/sprite.jpg')"));
    assert!(out.data_uri().starts_with("data:image/jpeg;base64,"));
}

#[test]
fn gif_output_and_mixed_inputs() {
    let inputs = vec![
        InputImage::new(
            "photo.jpg",
            common::encode(&common::solid_image(24, 8, [10, 200, 10, 255]), Codec::Jpeg),
        ),
        InputImage::new(
            "anim.gif",
            common::encode(&common::solid_image(8, 8, [200, 10, 10, 255]), Codec::Gif),
        ),
    ];
    let cfg = SpriteConfig::builder().output_format(OutputFormat::Gif).build();
    let out = generate(inputs, cfg).expect("generate");
    let formats: Vec<ImageFormat> = out.layout.images.iter().map(|i| i.source.format).collect();
    assert_eq!(formats, [ImageFormat::Jpeg, ImageFormat::Gif]);
    let img = image::load_from_memory_with_format(&out.image, Codec::Gif).expect("decode gif");
    assert_eq!(img.dimensions(), (24, 16));
    assert!(out.stylesheet.contains("url('gif.gif')"));
}

#[test]
fn empty_batch_is_rejected() {
    let err = generate(Vec::new(), SpriteConfig::default()).err().expect("error");
    assert!(matches!(err, SpriteError::EmptyBatch));
}

#[test]
fn unknown_container_is_unsupported() {
    let mut inputs = two_inputs();
    inputs.push(InputImage::new("notes.txt", b"just some text".to_vec()));
    let err = generate(inputs, SpriteConfig::default()).err().expect("error");
    assert!(matches!(err, SpriteError::UnsupportedFormat { .. }));
    assert_eq!(err.entry_name(), Some("notes.txt"));
}

#[test]
fn truncated_png_is_decode_failure() {
    let mut bytes = common::encode(&common::solid_image(4, 4, [1, 2, 3, 4]), Codec::Png);
    bytes.truncate(20);
    let mut inputs = two_inputs();
    inputs.push(InputImage::new("broken.png", bytes));
    let err = generate(inputs, SpriteConfig::default()).err().expect("error");
    match err {
        SpriteError::DecodeFailure { name, .. } => assert_eq!(name, "broken.png"),
        other => panic!("expected DecodeFailure, got {other:?}"),
    }
}

#[test]
fn invalid_quality_is_rejected() {
    let cfg = SpriteConfig::builder().jpeg_quality(101).build();
    let err = generate(two_inputs(), cfg).err().expect("error");
    assert!(matches!(err, SpriteError::InvalidConfig(_)));
}

#[test]
fn json_export_and_layout_only_agree() {
    let out = generate(two_inputs(), SpriteConfig::default()).expect("generate");
    let layout = pack_layout(vec![("imgB.png", 50, 50), ("imgA.png", 100, 50)], &SpriteConfig::default())
        .expect("layout");
    for (a, b) in out.layout.images.iter().zip(&layout.images) {
        assert_eq!((a.x, a.y), (b.x, b.y));
        assert_eq!(a.css_rule, b.css_rule);
    }

    let json = to_json(&out.layout);
    let obj = json.as_object().expect("object");
    assert_eq!(obj["width"], 100);
    assert_eq!(obj["height"], 100);
    let images = obj["images"].as_array().expect("images");
    assert_eq!(images[1]["selector"], "imgb");
    assert_eq!(images[1]["frame"]["y"], 50);
    assert_eq!(images[1]["backgroundSize"], 200.0);
}
