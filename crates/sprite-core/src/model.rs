use serde::{Deserialize, Serialize};

use crate::align::align_to_boundary;

/// Source image container formats accepted by the pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    Gif,
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Maps a sniffed container onto the accepted set; anything else is `None`.
    pub fn from_image_format(f: image::ImageFormat) -> Option<Self> {
        match f {
            image::ImageFormat::Gif => Some(Self::Gif),
            image::ImageFormat::Png => Some(Self::Png),
            image::ImageFormat::Jpeg => Some(Self::Jpeg),
            _ => None,
        }
    }

    /// Decoder selector for the `image` crate.
    pub fn to_image_format(self) -> image::ImageFormat {
        match self {
            Self::Gif => image::ImageFormat::Gif,
            Self::Png => image::ImageFormat::Png,
            Self::Jpeg => image::ImageFormat::Jpeg,
        }
    }
}

/// Catalog record for one input image.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceImage {
    /// Original filename; drives the class name and the tie-break order.
    pub name: String,
    /// Natural width in pixels.
    pub width: u32,
    /// Natural height in pixels.
    pub height: u32,
    /// Width rounded up to the alignment boundary (equal to `width` when not aligning).
    pub aligned_width: u32,
    /// Height rounded up to the alignment boundary (equal to `height` when not aligning).
    pub aligned_height: u32,
    pub format: ImageFormat,
}

impl SourceImage {
    pub fn new(
        name: impl Into<String>,
        width: u32,
        height: u32,
        format: ImageFormat,
        align: bool,
    ) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            aligned_width: align_to_boundary(width, align),
            aligned_height: align_to_boundary(height, align),
            format,
        }
    }

    /// Natural `(width, height)`.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A source image after packing: position within the composite plus its CSS.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedImage {
    pub source: SourceImage,
    /// Index of this image in the batch handed to the packer.
    pub input_index: usize,
    pub x: u32,
    pub y: u32,
    /// Full class name (prefix + derived fragment), without the leading dot.
    pub selector: String,
    /// Vertical `background-position` percentage, rounded to 6 decimals.
    pub background_position: f64,
    /// `background-size` percentage, rounded to 6 decimals.
    pub background_size: f64,
    /// Complete CSS rule for this image, newline terminated.
    pub css_rule: String,
}

/// Result of packing a batch: composite size and images in packed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Layout {
    pub width: u32,
    pub height: u32,
    pub images: Vec<PlacedImage>,
}

impl Layout {
    /// Distinct natural sizes in packed order of first appearance.
    pub fn distinct_sizes(&self) -> Vec<(u32, u32)> {
        let mut seen = Vec::new();
        for img in &self.images {
            let size = img.source.size();
            if !seen.contains(&size) {
                seen.push(size);
            }
        }
        seen
    }
}
