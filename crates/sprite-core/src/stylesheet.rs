use crate::model::Layout;
use crate::placeholder::Placeholders;

pub const STYLESHEET_HEADER: &str = "/* Generated by responsive-sprite */\n";

/// Selectors per line in the base rule.
const SELECTORS_PER_LINE: usize = 5;

/// Build the stylesheet for `layout` with the sprite served from `url`.
///
/// A base rule lists every class and sets the sprite image; it is followed
/// by each image's own rule in packed order.
pub fn build_stylesheet(layout: &Layout, url: &str) -> String {
    let mut base = String::new();
    let mut rules = String::new();
    for (i, img) in layout.images.iter().enumerate() {
        if !base.is_empty() {
            base.push_str(", ");
        }
        if i % SELECTORS_PER_LINE == 0 {
            base.push('\n');
        }
        base.push('.');
        base.push_str(&img.selector);
        rules.push_str(&img.css_rule);
    }

    let mut css = String::with_capacity(STYLESHEET_HEADER.len() + base.len() + rules.len() + 128);
    css.push_str(STYLESHEET_HEADER);
    css.push_str(&base);
    css.push_str(&format!(
        "\n{{ max-width: 100%; background-size: 100%; background-image: url('{}'); }}\n\n",
        url
    ));
    css.push_str(&rules);
    css
}

/// HTML for the sprite: one `<img>` per image in packed order, sized by a
/// transparent placeholder of the image's natural dimensions.
///
/// Placeholders are encoded into `placeholders` as needed.
pub fn build_markup(layout: &Layout, placeholders: &mut Placeholders) -> String {
    let mut html = String::new();
    for img in &layout.images {
        let (w, h) = img.source.size();
        placeholders.get_or_encode(w, h);
        let src = placeholders.data_uri(w, h).unwrap_or_default();
        html.push_str(&format!(
            "<img class=\"{}\" alt=\"\" src=\"{}\">\n",
            escape_attr(&img.selector),
            src
        ));
    }
    html
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
