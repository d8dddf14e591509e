use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteError {
    #[error("No images supplied")]
    EmptyBatch,
    #[error("Invalid image file - {name}")]
    UnsupportedFormat { name: String },
    #[error("Could not decode image {name}: {source}")]
    DecodeFailure {
        name: String,
        #[source]
        source: image::ImageError,
    },
    #[error("Sprite of {count} images with padding {padding} is too tall")]
    LayoutTooLarge { count: usize, padding: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl SpriteError {
    /// Name of the offending input for per-entry failures.
    pub fn entry_name(&self) -> Option<&str> {
        match self {
            Self::UnsupportedFormat { name } | Self::DecodeFailure { name, .. } => {
                Some(name.as_str())
            }
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, SpriteError>;
