use std::cmp::Ordering;

use tracing::debug;

use crate::config::SpriteConfig;
use crate::error::{Result, SpriteError};
use crate::model::{Layout, PlacedImage, SourceImage};

pub mod selector;

pub use selector::filename_to_selector;

/// Packed order: `aligned_width` descending, then name ascending (byte-wise).
/// Equal keys keep their input order.
pub fn compare_for_packing(a: &SourceImage, b: &SourceImage) -> Ordering {
    b.aligned_width
        .cmp(&a.aligned_width)
        .then_with(|| a.name.as_bytes().cmp(b.name.as_bytes()))
}

/// Indices into `batch` in packed order.
pub fn packing_order(batch: &[SourceImage]) -> Vec<usize> {
    let mut order: Vec<usize> = (0..batch.len()).collect();
    order.sort_by(|&a, &b| compare_for_packing(&batch[a], &batch[b]));
    order
}

/// Lays out `batch` in a single column and derives each image's CSS.
///
/// The composite is as wide as the first image in packed order and as tall
/// as all aligned heights plus `padding` between neighbours. Every image sits
/// at `x = 0`. An empty batch yields an empty 0x0 layout; callers are
/// expected to reject it before getting here.
///
/// Fails with [`SpriteError::LayoutTooLarge`] when the column height does
/// not fit in `u32`.
pub fn pack(batch: &[SourceImage], cfg: &SpriteConfig) -> Result<Layout> {
    let order = packing_order(batch);

    let width = order.first().map_or(0, |&i| batch[i].aligned_width);
    let mut height = 0u32;
    for (n, &i) in order.iter().enumerate() {
        let gap = if n > 0 { cfg.padding } else { 0 };
        height = height
            .checked_add(gap)
            .and_then(|h| h.checked_add(batch[i].aligned_height))
            .ok_or(SpriteError::LayoutTooLarge {
                count: batch.len(),
                padding: cfg.padding,
            })?;
    }

    let mut images = Vec::with_capacity(order.len());
    let mut y = 0u32;
    for &i in &order {
        let source = batch[i].clone();
        let size = round6(percent(width, source.width));
        let position = round6(percent(y, height - source.height));
        let class = filename_to_selector(&source.name, &cfg.css_prefix);
        let selector = format!("{}{}", cfg.css_prefix, class);
        let css_rule = format!(
            ".{} {{ background-position: 0 {}%; background-size: {}%; }}\n",
            selector,
            format_percent(position),
            format_percent(size)
        );
        // Offset past the last image is never read.
        let next_y = y.saturating_add(source.aligned_height).saturating_add(cfg.padding);
        images.push(PlacedImage {
            source,
            input_index: i,
            x: 0,
            y,
            selector,
            background_position: position,
            background_size: size,
            css_rule,
        });
        y = next_y;
    }

    debug!(width, height, count = images.len(), "packed sprite layout");
    Ok(Layout {
        width,
        height,
        images,
    })
}

/// `100 * num / den`, or 0 when `den` is zero.
///
/// A zero denominator happens for the position of an image as tall as the
/// whole composite (e.g. a single image), which is always at the top.
fn percent(num: u32, den: u32) -> f64 {
    if den == 0 {
        return 0.0;
    }
    100.0 * num as f64 / den as f64
}

fn round6(v: f64) -> f64 {
    (v * 1_000_000.0).round() / 1_000_000.0
}

/// Render a percentage with at most 6 decimals and no trailing zeros.
pub fn format_percent(v: f64) -> String {
    let s = format!("{:.6}", round6(v));
    let s = s.trim_end_matches('0').trim_end_matches('.');
    if s == "-0" { "0".into() } else { s.into() }
}
