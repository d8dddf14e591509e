//! Core library for building responsive CSS sprites.
//!
//! - Layout: images stacked in one column, widest first, with optional padding
//! - Compositing: RGBA copy with optional 16px alignment and edge extension to absorb JPEG artifacts
//! - Stylesheet: percentage `background-position`/`background-size` rules that scale with the sprite
//! - Placeholders: minimal transparent PNGs (one per image size) for sizing `<img>` elements
//!
//! Quick example:
//! ```ignore
//! use responsive_sprite_core::{InputImage, SpriteConfig, generate};
//! # fn main() -> anyhow::Result<()> {
//! let inputs = vec![
//!   InputImage::new("a.png", std::fs::read("a.png")?),
//!   InputImage::new("b.png", std::fs::read("b.png")?),
//! ];
//! let mut out = generate(inputs, SpriteConfig::default())?;
//! std::fs::write("sprite.png", &out.image)?;
//! std::fs::write("sprite.css", &out.stylesheet)?;
//! println!("{}", out.markup());
//! # Ok(()) }
//! ```

pub mod align;
pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod pipeline;
pub mod placeholder;
pub mod stylesheet;

pub use align::*;
pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use pipeline::*;
pub use placeholder::*;
pub use stylesheet::*;

/// Convenience prelude for common types and functions.
/// Importing `responsive_sprite_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{OutputFormat, SpriteConfig, SpriteConfigBuilder};
    pub use crate::model::{ImageFormat, Layout, PlacedImage, SourceImage};
    pub use crate::placeholder::Placeholders;
    pub use crate::{InputImage, SpriteOutput, generate, pack_layout};
}
