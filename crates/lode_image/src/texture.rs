//! Decoded texture data

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::key::{SourceFormat, TextureKey};

/// Process-unique texture identifier
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureId(u64);

impl TextureId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Decoded RGBA8 bitmap (straight alpha), ready for GPU upload
///
/// Textures are owned by the [`TextureFactory`](crate::TextureFactory) cache
/// and handed out as `Rc<Texture>`; equal keys always yield the same
/// allocation.
pub struct Texture {
    id: TextureId,
    key: TextureKey,
    format: SourceFormat,
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Texture {
    pub(crate) fn new(
        key: TextureKey,
        format: SourceFormat,
        width: u32,
        height: u32,
        pixels: Vec<u8>,
    ) -> Self {
        debug_assert_eq!(pixels.len(), (width as usize) * (height as usize) * 4);
        Self {
            id: TextureId::next(),
            key,
            format,
            width,
            height,
            pixels,
        }
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn key(&self) -> &TextureKey {
        &self.key
    }

    pub fn format(&self) -> SourceFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA pixel data
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn byte_len(&self) -> usize {
        self.pixels.len()
    }
}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id)
            .field("key", &self.key)
            .field("format", &self.format)
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}
