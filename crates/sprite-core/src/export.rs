use crate::model::Layout;
use serde_json::{Value, json};

/// Serialize a layout as `{ width, height, images: [...] }`.
/// Percentages are emitted as numbers, sizes use `w`/`h` keys.
pub fn to_json(layout: &Layout) -> Value {
    let images: Vec<Value> = layout
        .images
        .iter()
        .map(|img| {
            let s = &img.source;
            json!({
                "name": s.name,
                "format": s.format,
                "selector": img.selector,
                "frame": {"x": img.x, "y": img.y, "w": s.width, "h": s.height},
                "alignedSize": {"w": s.aligned_width, "h": s.aligned_height},
                "backgroundPosition": img.background_position,
                "backgroundSize": img.background_size,
            })
        })
        .collect();
    json!({
        "width": layout.width,
        "height": layout.height,
        "images": images,
    })
}
