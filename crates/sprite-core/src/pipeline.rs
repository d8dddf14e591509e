use std::io::Cursor;

use image::codecs::gif::GifEncoder;
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, Frame, RgbaImage};
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::compositing::composite;
use crate::config::{OutputFormat, SpriteConfig};
use crate::error::{Result, SpriteError};
use crate::model::{ImageFormat, Layout, SourceImage};
use crate::packer::pack;
use crate::placeholder::{Placeholders, to_data_uri};
use crate::stylesheet::{build_markup, build_stylesheet};

/// Encoded input file (name + raw bytes).
#[derive(Debug, Clone)]
pub struct InputImage {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl InputImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Catalog record plus decoded RGBA pixels.
#[derive(Debug, Clone)]
pub struct DecodedImage {
    pub source: SourceImage,
    pub rgba: RgbaImage,
}

/// Everything a run produces.
#[derive(Debug, Clone)]
pub struct SpriteOutput {
    pub layout: Layout,
    /// Composite encoded as `format`.
    pub image: Vec<u8>,
    pub format: OutputFormat,
    pub stylesheet: String,
    /// One placeholder per distinct natural size in the batch.
    pub placeholders: Placeholders,
}

impl SpriteOutput {
    /// Composite as a `data:` URI.
    pub fn data_uri(&self) -> String {
        to_data_uri(&self.format.mime_type(), &self.image)
    }

    /// `<img>` markup referencing the placeholders.
    pub fn markup(&mut self) -> String {
        build_markup(&self.layout, &mut self.placeholders)
    }

    /// Stylesheet with a different sprite URL (e.g. [`Self::data_uri`]).
    pub fn stylesheet_with_url(&self, url: &str) -> String {
        build_stylesheet(&self.layout, url)
    }
}

/// Identify the container of `input` and decode it.
///
/// Containers other than GIF, PNG and JPEG are rejected as
/// `UnsupportedFormat`; unparsable data as `DecodeFailure`.
pub fn decode_input(input: &InputImage, reduce_artifacts: bool) -> Result<DecodedImage> {
    let format = image::guess_format(&input.bytes)
        .ok()
        .and_then(ImageFormat::from_image_format)
        .ok_or_else(|| SpriteError::UnsupportedFormat {
            name: input.name.clone(),
        })?;
    let image = image::load_from_memory_with_format(&input.bytes, format.to_image_format())
        .map_err(|source| SpriteError::DecodeFailure {
            name: input.name.clone(),
            source,
        })?;
    let rgba = image.to_rgba8();
    let (w, h) = rgba.dimensions();
    debug!(name = %input.name, ?format, w, h, "decoded input");
    Ok(DecodedImage {
        source: SourceImage::new(input.name.clone(), w, h, format, reduce_artifacts),
        rgba,
    })
}

/// Decode every input, preserving input order. Stops at the first failure.
pub fn decode_inputs(inputs: &[InputImage], cfg: &SpriteConfig) -> Result<Vec<DecodedImage>> {
    #[cfg(feature = "parallel")]
    {
        if cfg.parallel {
            return inputs
                .par_iter()
                .map(|inp| decode_input(inp, cfg.reduce_artifacts))
                .collect();
        }
    }
    inputs
        .iter()
        .map(|inp| decode_input(inp, cfg.reduce_artifacts))
        .collect()
}

#[instrument(skip_all)]
/// Builds the sprite image, stylesheet and placeholders for `inputs`.
///
/// Either every output is produced or an error is returned; nothing partial.
pub fn generate(inputs: Vec<InputImage>, cfg: SpriteConfig) -> Result<SpriteOutput> {
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(SpriteError::EmptyBatch);
    }

    let decoded = decode_inputs(&inputs, &cfg)?;
    drop(inputs);

    let catalog: Vec<SourceImage> = decoded.iter().map(|d| d.source.clone()).collect();
    let layout = pack(&catalog, &cfg)?;
    let canvas = composite(&layout, &decoded, cfg.reduce_artifacts)?;
    drop(decoded);

    let image = encode_composite(&canvas, cfg.output_format, cfg.jpeg_quality)?;
    let stylesheet = build_stylesheet(&layout, &cfg.resolved_css_url());

    let mut placeholders = Placeholders::new();
    for (w, h) in layout.distinct_sizes() {
        placeholders.get_or_encode(w, h);
    }

    debug!(
        width = layout.width,
        height = layout.height,
        bytes = image.len(),
        placeholders = placeholders.len(),
        "sprite generated"
    );
    Ok(SpriteOutput {
        layout,
        image,
        format: cfg.output_format,
        stylesheet,
        placeholders,
    })
}

/// Encode the composite into `format`. JPEG drops alpha; quality is clamped
/// to the encoder's 1..=100 range.
pub fn encode_composite(
    canvas: &RgbaImage,
    format: OutputFormat,
    jpeg_quality: u8,
) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    match format {
        OutputFormat::Png => canvas.write_to(&mut buf, image::ImageFormat::Png)?,
        OutputFormat::Gif => {
            let mut enc = GifEncoder::new(&mut buf);
            enc.encode_frame(Frame::new(canvas.clone()))?;
        }
        OutputFormat::Jpeg => {
            let rgb = DynamicImage::ImageRgba8(canvas.clone()).to_rgb8();
            let mut enc = JpegEncoder::new_with_quality(&mut buf, jpeg_quality.clamp(1, 100));
            enc.encode_image(&rgb)?;
        }
    }
    Ok(buf.into_inner())
}

// ---------------- Layout-only API ----------------

/// Packs `(name, width, height)` triples without any pixel data.
///
/// Every entry is catalogued as PNG; the format has no effect on layout.
pub fn pack_layout<K: Into<String>>(
    inputs: Vec<(K, u32, u32)>,
    cfg: &SpriteConfig,
) -> Result<Layout> {
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(SpriteError::EmptyBatch);
    }
    let catalog: Vec<SourceImage> = inputs
        .into_iter()
        .map(|(name, w, h)| {
            SourceImage::new(name, w, h, ImageFormat::Png, cfg.reduce_artifacts)
        })
        .collect();
    pack(&catalog, cfg)
}
