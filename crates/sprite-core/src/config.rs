use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Container format of the encoded composite image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Png,
    Jpeg,
    Gif,
}

impl OutputFormat {
    /// Lowercase format name, as used in MIME types (`image/<name>`).
    pub fn name(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Gif => "gif",
        }
    }

    /// Conventional file extension.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Gif => "gif",
        }
    }

    pub fn mime_type(self) -> String {
        format!("image/{}", self.name())
    }

    /// Stylesheet URL used when the caller does not supply one.
    pub fn default_url(self) -> String {
        format!("{}.{}", self.name(), self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "gif" => Ok(Self::Gif),
            _ => Err(()),
        }
    }
}

/// Options for a sprite run. Every field has a default.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpriteConfig {
    /// Container format of the composite.
    #[serde(default)]
    pub output_format: OutputFormat,
    /// JPEG quality (0..=100). Only used for `jpeg` output.
    #[serde(default = "default_jpeg_quality")]
    pub jpeg_quality: u8,
    /// Prefix prepended to every generated class name.
    #[serde(default)]
    pub css_prefix: String,
    /// Pixels inserted between consecutive images.
    #[serde(default)]
    pub padding: u32,
    /// Align images to 16px boundaries and fill the slack with replicated edge pixels.
    #[serde(default)]
    pub reduce_artifacts: bool,
    /// `background-image` URL written into the stylesheet.
    /// None => `<format>.<extension>`.
    #[serde(default)]
    pub css_url: Option<String>,
    /// Decode inputs in parallel when the `parallel` feature is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SpriteConfig {
    fn default() -> Self {
        Self {
            output_format: OutputFormat::default(),
            jpeg_quality: default_jpeg_quality(),
            css_prefix: String::new(),
            padding: 0,
            reduce_artifacts: false,
            css_url: None,
            parallel: false,
        }
    }
}

impl SpriteConfig {
    /// Validates the configuration parameters.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteError;

        if self.jpeg_quality > 100 {
            return Err(SpriteError::InvalidConfig(format!(
                "jpeg_quality must be within 0..=100, got {}",
                self.jpeg_quality
            )));
        }
        Ok(())
    }

    /// URL of the sprite image as referenced from the stylesheet.
    pub fn resolved_css_url(&self) -> String {
        match &self.css_url {
            Some(url) if !url.is_empty() => url.clone(),
            _ => self.output_format.default_url(),
        }
    }

    /// Create a fluent builder for `SpriteConfig`.
    pub fn builder() -> SpriteConfigBuilder {
        SpriteConfigBuilder::new()
    }
}

fn default_jpeg_quality() -> u8 {
    75
}

/// Builder for `SpriteConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct SpriteConfigBuilder {
    cfg: SpriteConfig,
}

impl SpriteConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SpriteConfig::default(),
        }
    }
    pub fn output_format(mut self, v: OutputFormat) -> Self {
        self.cfg.output_format = v;
        self
    }
    pub fn jpeg_quality(mut self, v: u8) -> Self {
        self.cfg.jpeg_quality = v;
        self
    }
    pub fn css_prefix(mut self, v: impl Into<String>) -> Self {
        self.cfg.css_prefix = v.into();
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn reduce_artifacts(mut self, v: bool) -> Self {
        self.cfg.reduce_artifacts = v;
        self
    }
    pub fn css_url(mut self, v: Option<String>) -> Self {
        self.cfg.css_url = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> SpriteConfig {
        self.cfg
    }
}
