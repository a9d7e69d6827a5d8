//! Lode Image
//!
//! Texture loading for the Lode render core:
//!
//! - [`TextureFactory`] - process-wide cache keyed by [`TextureKey`], with at
//!   most one in-flight load per key
//! - [`AssetSource`] - where bytes come from ([`FileSource`], [`MemorySource`],
//!   [`DeferredSource`])
//! - raster decoding via `image`, vector rasterization via `resvg`
//!
//! # Example
//!
//! ```ignore
//! use lode_image::{FileSource, TextureFactory, TextureKey};
//!
//! let textures = TextureFactory::new(FileSource::new("assets"));
//! let pickaxe = textures.load_texture(TextureKey::new("icons/pickaxe.svg", 64)).await?;
//! println!("{}x{}", pickaxe.width(), pickaxe.height());
//! ```

mod decode;
mod error;
mod factory;
mod key;
mod source;
mod texture;

pub use decode::{decode_raster, rasterize_svg, MAX_TEXTURE_SIZE};
pub use error::{ResourceLoadError, Result, TextureError};
pub use factory::{LoadFuture, LoadResult, TextureFactory, TextureStats};
pub use key::{SourceFormat, TextureKey};
pub use source::{AssetSource, DeferredSource, FetchFuture, FileSource, MemorySource};
pub use texture::{Texture, TextureId};
