//! Texture cache keys

use std::fmt;

/// Identity of a cached texture: source path plus target pixel size
///
/// `size == 0` requests the asset's native size. Vector sources rasterized at
/// different sizes are different keys and never share a texture.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureKey {
    path: String,
    size: u32,
}

impl TextureKey {
    pub fn new(path: impl Into<String>, size: u32) -> Self {
        Self {
            path: path.into(),
            size,
        }
    }

    /// Key for the asset at its native size
    pub fn native(path: impl Into<String>) -> Self {
        Self::new(path, 0)
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    /// Same path at a different size
    pub fn with_size(&self, size: u32) -> Self {
        Self::new(self.path.clone(), size)
    }
}

impl fmt::Display for TextureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.size == 0 {
            write!(f, "{}", self.path)
        } else {
            write!(f, "{}@{}", self.path, self.size)
        }
    }
}

/// Encoding family of a source asset
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// PNG / JPEG / WebP, decoded with `image`
    Raster,
    /// SVG, rasterized with `resvg`
    Vector,
}

impl SourceFormat {
    /// Decide how to decode an asset from its path and leading bytes
    pub fn detect(path: &str, bytes: &[u8]) -> Self {
        let by_extension = path
            .rsplit('.')
            .next()
            .map(|ext| ext.eq_ignore_ascii_case("svg") || ext.eq_ignore_ascii_case("svgz"))
            .unwrap_or(false);
        if by_extension {
            return SourceFormat::Vector;
        }

        let head = &bytes[..bytes.len().min(256)];
        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            SourceFormat::Vector
        } else {
            SourceFormat::Raster
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_equality() {
        assert_eq!(TextureKey::new("a.svg", 64), TextureKey::new("a.svg", 64));
        assert_ne!(TextureKey::new("a.svg", 64), TextureKey::new("a.svg", 32));
        assert_eq!(TextureKey::native("a.png").size(), 0);
    }

    #[test]
    fn test_key_display() {
        assert_eq!(TextureKey::new("a.svg", 64).to_string(), "a.svg@64");
        assert_eq!(TextureKey::native("a.png").to_string(), "a.png");
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(SourceFormat::detect("icons/Ore.SVG", b""), SourceFormat::Vector);
        assert_eq!(
            SourceFormat::detect("blob", b"  <svg xmlns='http://www.w3.org/2000/svg'/>"),
            SourceFormat::Vector
        );
        assert_eq!(
            SourceFormat::detect("blob", b"<?xml version=\"1.0\"?><svg/>"),
            SourceFormat::Vector
        );
        assert_eq!(
            SourceFormat::detect("gem.png", &[0x89, b'P', b'N', b'G']),
            SourceFormat::Raster
        );
    }
}
