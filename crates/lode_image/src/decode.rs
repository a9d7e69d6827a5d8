//! Raster decoding and SVG rasterization
//!
//! Raster assets go through `image`; vector assets are parsed with `usvg` and
//! rendered with `resvg` into a `tiny-skia` pixmap. Both paths produce
//! straight-alpha RGBA8.

use image::imageops::FilterType;
use image::GenericImageView;
use tiny_skia::{Pixmap, Transform};
use usvg::{Options, Tree};

use crate::error::{Result, TextureError};
use crate::key::{SourceFormat, TextureKey};
use crate::texture::Texture;

/// Largest texture edge, in pixels, that decoding will produce
pub const MAX_TEXTURE_SIZE: u32 = 8192;

/// Decode fetched bytes into a texture for `key`
pub(crate) fn decode_texture(key: &TextureKey, bytes: &[u8]) -> Result<Texture> {
    let format = SourceFormat::detect(key.path(), bytes);
    let (width, height, pixels) = match format {
        SourceFormat::Vector => rasterize_svg(bytes, key.size())?,
        SourceFormat::Raster => decode_raster(bytes, key.size())?,
    };
    Ok(Texture::new(key.clone(), format, width, height, pixels))
}

/// Decode a raster image, optionally scaling it to fit a `size × size` box
pub fn decode_raster(bytes: &[u8], size: u32) -> Result<(u32, u32, Vec<u8>)> {
    if size > MAX_TEXTURE_SIZE {
        return Err(TextureError::Decode(format!(
            "requested size {size} exceeds {MAX_TEXTURE_SIZE}"
        )));
    }
    let mut img = image::load_from_memory(bytes)?;
    if size > 0 {
        let (w, h) = img.dimensions();
        if w != size || h != size {
            // Fits within the box, aspect preserved
            img = img.resize(size, size, FilterType::Triangle);
        }
    }
    let (width, height) = img.dimensions();
    Ok((width, height, img.to_rgba8().into_raw()))
}

/// Rasterize SVG data
///
/// With `size > 0` the document is scaled to fit a `size × size` pixmap while
/// keeping its aspect ratio, centered. With `size == 0` the document's own
/// dimensions are used.
pub fn rasterize_svg(data: &[u8], size: u32) -> Result<(u32, u32, Vec<u8>)> {
    let tree = Tree::from_data(data, &Options::default())
        .map_err(|e| TextureError::SvgParse(e.to_string()))?;

    let svg_size = tree.size();
    let (width, height) = if size > 0 {
        (size, size)
    } else {
        (
            svg_size.width().ceil() as u32,
            svg_size.height().ceil() as u32,
        )
    };
    if width == 0 || height == 0 {
        return Err(TextureError::Rasterize(
            "Invalid dimensions: width and height must be > 0".into(),
        ));
    }
    if width > MAX_TEXTURE_SIZE || height > MAX_TEXTURE_SIZE {
        return Err(TextureError::Rasterize(format!(
            "{width}x{height} exceeds the {MAX_TEXTURE_SIZE}px texture limit"
        )));
    }

    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| TextureError::Rasterize("Failed to create pixmap".into()))?;

    // Fit inside the target while maintaining aspect ratio
    let scale_x = width as f32 / svg_size.width();
    let scale_y = height as f32 / svg_size.height();
    let scale = scale_x.min(scale_y);

    let offset_x = (width as f32 - svg_size.width() * scale) / 2.0;
    let offset_y = (height as f32 - svg_size.height() * scale) / 2.0;

    let transform = Transform::from_scale(scale, scale).post_translate(offset_x, offset_y);
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok((width, height, unpremultiply_alpha(pixmap.data())))
}

/// tiny-skia renders premultiplied alpha; textures carry straight alpha
fn unpremultiply_alpha(data: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(data.len());

    for chunk in data.chunks_exact(4) {
        let a = chunk[3] as f32 / 255.0;
        if a > 0.0 {
            let r = (chunk[0] as f32 / a).min(255.0) as u8;
            let g = (chunk[1] as f32 / a).min(255.0) as u8;
            let b = (chunk[2] as f32 / a).min(255.0) as u8;
            result.extend_from_slice(&[r, g, b, chunk[3]]);
        } else {
            result.extend_from_slice(&[0, 0, 0, 0]);
        }
    }

    result
}
