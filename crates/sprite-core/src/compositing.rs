use image::{Rgba, RgbaImage};
use tracing::trace;

use crate::error::{Result, SpriteError};
use crate::model::Layout;
use crate::pipeline::DecodedImage;

/// Background of a fresh composite: white with zero alpha, so formats
/// without an alpha channel render the empty area white.
pub const TRANSPARENT: Rgba<u8> = Rgba([255, 255, 255, 0]);

/// Allocate a fully transparent canvas.
pub fn blank_canvas(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_pixel(width, height, TRANSPARENT)
}

/// Copy all of `src` into `canvas` with its top-left at (dx, dy).
///
/// Pixels replace the destination as-is (no blending), so source alpha is
/// preserved. Anything falling outside the canvas is clipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        if dy + yy >= ch {
            break;
        }
        for xx in 0..sw {
            if dx + xx >= cw {
                break;
            }
            canvas.put_pixel(dx + xx, dy + yy, *src.get_pixel(xx, yy));
        }
    }
}

/// Fill the slack between a placed image's natural and aligned size with
/// copies of its last column and row.
///
/// Columns `w..aligned_w` first receive the last natural column (natural
/// height only). Rows `h..aligned_h` then receive the last natural row read
/// back from the canvas at the full aligned width, which also fills the
/// bottom-right corner.
pub fn extend_edges(
    canvas: &mut RgbaImage,
    dx: u32,
    dy: u32,
    w: u32,
    h: u32,
    aligned_w: u32,
    aligned_h: u32,
) {
    if w == 0 || h == 0 {
        return;
    }
    let (cw, ch) = canvas.dimensions();

    let last_x = dx + w - 1;
    if last_x < cw {
        for xx in w..aligned_w {
            if dx + xx >= cw {
                break;
            }
            for yy in 0..h {
                if dy + yy >= ch {
                    break;
                }
                let p = *canvas.get_pixel(last_x, dy + yy);
                canvas.put_pixel(dx + xx, dy + yy, p);
            }
        }
    }

    let last_y = dy + h - 1;
    if last_y < ch {
        for yy in h..aligned_h {
            if dy + yy >= ch {
                break;
            }
            for xx in 0..aligned_w {
                if dx + xx >= cw {
                    break;
                }
                let p = *canvas.get_pixel(dx + xx, last_y);
                canvas.put_pixel(dx + xx, dy + yy, p);
            }
        }
    }
}

/// Render the composite for `layout`.
///
/// `decoded` is the batch the layout was packed from; each placed image
/// looks up its pixels by `input_index`.
pub fn composite(
    layout: &Layout,
    decoded: &[DecodedImage],
    reduce_artifacts: bool,
) -> Result<RgbaImage> {
    let mut canvas = blank_canvas(layout.width, layout.height);
    for placed in &layout.images {
        let src = decoded.get(placed.input_index).ok_or_else(|| {
            SpriteError::InvalidConfig(format!(
                "no pixel data for {} (index {})",
                placed.source.name, placed.input_index
            ))
        })?;
        if src.rgba.dimensions() != placed.source.size() {
            return Err(SpriteError::InvalidConfig(format!(
                "pixel data for {} is {:?}, layout expects {:?}",
                placed.source.name,
                src.rgba.dimensions(),
                placed.source.size()
            )));
        }
        blit_rgba(&src.rgba, &mut canvas, placed.x, placed.y);
        if reduce_artifacts {
            let s = &placed.source;
            extend_edges(
                &mut canvas,
                placed.x,
                placed.y,
                s.width,
                s.height,
                s.aligned_width,
                s.aligned_height,
            );
        }
        trace!(name = %placed.source.name, x = placed.x, y = placed.y, "composited");
    }
    Ok(canvas)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blit_clips_to_canvas() {
        let src = RgbaImage::from_pixel(4, 4, Rgba([1, 2, 3, 255]));
        let mut canvas = blank_canvas(3, 3);
        blit_rgba(&src, &mut canvas, 1, 1);
        assert_eq!(*canvas.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*canvas.get_pixel(2, 2), Rgba([1, 2, 3, 255]));
    }

    #[test]
    fn blit_replaces_without_blending() {
        let src = RgbaImage::from_pixel(1, 1, Rgba([10, 20, 30, 40]));
        let mut canvas = RgbaImage::from_pixel(1, 1, Rgba([200, 200, 200, 255]));
        blit_rgba(&src, &mut canvas, 0, 0);
        assert_eq!(*canvas.get_pixel(0, 0), Rgba([10, 20, 30, 40]));
    }
}
