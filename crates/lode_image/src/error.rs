//! Texture loading errors

use thiserror::Error;

use crate::key::TextureKey;

/// Underlying cause of a failed texture load
///
/// Cloneable so that one failure can be handed to every waiter of a shared
/// in-flight load.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TextureError {
    /// The asset source has nothing at this path
    #[error("asset not found: {0}")]
    NotFound(String),

    /// IO error while reading the asset
    #[error("IO error: {0}")]
    Io(String),

    /// Raster image decoding failed
    #[error("image decode failed: {0}")]
    Decode(String),

    /// SVG parsing error
    #[error("SVG parsing error: {0}")]
    SvgParse(String),

    /// SVG could not be rendered at the requested size
    #[error("SVG rasterization failed: {0}")]
    Rasterize(String),

    /// The source dropped the request before answering
    #[error("load aborted: {0}")]
    Aborted(String),
}

impl From<image::ImageError> for TextureError {
    fn from(err: image::ImageError) -> Self {
        TextureError::Decode(err.to_string())
    }
}

/// A failed load for one texture key
#[derive(Error, Debug, Clone, PartialEq)]
#[error("failed to load texture {path} (size {size}): {cause}")]
pub struct ResourceLoadError {
    /// Source path as requested (before asset mapping)
    pub path: String,
    /// Requested size
    pub size: u32,
    #[source]
    pub cause: TextureError,
}

impl ResourceLoadError {
    pub fn new(key: &TextureKey, cause: TextureError) -> Self {
        Self {
            path: key.path().to_string(),
            size: key.size(),
            cause,
        }
    }
}

/// Result type for texture decoding
pub type Result<T> = std::result::Result<T, TextureError>;
