/// Prepended to class names that would otherwise start with a digit.
pub const DIGIT_PREFIX: &str = "img-";

/// Convert a filename into a CSS class fragment.
///
/// Lowercases, drops the extension and apostrophes, maps everything outside
/// `[a-z0-9]` to `-`, collapses runs of `-` and trims them from both ends.
/// When `css_prefix` is empty a leading digit gets [`DIGIT_PREFIX`].
pub fn filename_to_selector(name: &str, css_prefix: &str) -> String {
    let lower = name.to_lowercase();
    let stem = match lower.rfind('.') {
        Some(dot) => &lower[..dot],
        None => lower.as_str(),
    };

    let mut out = String::with_capacity(stem.len());
    for c in stem.chars().filter(|&c| c != '\'') {
        let c = if c.is_ascii_lowercase() || c.is_ascii_digit() {
            c
        } else {
            '-'
        };
        if c == '-' && out.ends_with('-') {
            continue;
        }
        out.push(c);
    }
    let trimmed = out.strip_prefix('-').unwrap_or(&out);
    let trimmed = trimmed.strip_suffix('-').unwrap_or(trimmed);

    if css_prefix.is_empty() && trimmed.starts_with(|c: char| c.is_ascii_digit()) {
        format!("{DIGIT_PREFIX}{trimmed}")
    } else {
        trimmed.to_string()
    }
}
