//! Resource resolvers
//!
//! A [`ResourceResolver`] turns a resource description into a primitive. It
//! is the only thing that differs between sprite, vector, text and container
//! renderers; the lifecycle and race handling live in
//! [`RendererComponent`](crate::RendererComponent).
//!
//! | Resolver | Resource | Placeholder | Resolution |
//! |----------|----------|-------------|------------|
//! | [`VectorImageResolver`] | `TextureKey` (path + raster size) | empty sprite | cache hit or async load |
//! | [`SpriteResolver`] | raster path | empty sprite | cache hit or async load at native size |
//! | [`TextResolver`] | `String` | empty text | immediate |
//! | [`ContainerResolver`] | `()` | container | immediate |

use futures::future::{FutureExt, LocalBoxFuture};
use lode_image::{ResourceLoadError, TextureKey};

use crate::context::RenderContext;
use crate::primitive::RenderPrimitive;

/// Outcome of a resolved primitive load
pub type PrimitiveResult = Result<RenderPrimitive, ResourceLoadError>;

/// Result of asking a resolver for a primitive
pub enum Resolution {
    /// Primitive available now
    Ready(RenderPrimitive),
    /// Primitive available once the future completes
    Pending(LocalBoxFuture<'static, PrimitiveResult>),
}

impl Resolution {
    pub fn is_ready(&self) -> bool {
        matches!(self, Resolution::Ready(_))
    }
}

/// Strategy that produces the primitive for a resource
pub trait ResourceResolver: 'static {
    type Resource: Clone + std::fmt::Debug + 'static;

    /// Short name used in log context
    fn name(&self) -> &'static str;

    /// Primitive shown before any resource has been applied
    fn placeholder(&self) -> RenderPrimitive;

    /// Resolve `resource` into a primitive
    fn resolve(&self, ctx: &RenderContext, resource: &Self::Resource) -> Resolution;
}

/// Sprite resolution shared by the texture-backed resolvers
fn resolve_texture(ctx: &RenderContext, key: TextureKey) -> Resolution {
    if let Some(texture) = ctx.textures.lookup(&key) {
        return Resolution::Ready(RenderPrimitive::sprite(Some(texture)));
    }
    let load = ctx
        .textures
        .load_texture(key)
        .map(|result| result.map(|texture| RenderPrimitive::sprite(Some(texture))));
    Resolution::Pending(load.boxed_local())
}

// =============================================================================
// RESOLVERS
// =============================================================================

/// Vector images rasterized at a requested size
#[derive(Clone, Copy, Debug, Default)]
pub struct VectorImageResolver;

impl ResourceResolver for VectorImageResolver {
    type Resource = TextureKey;

    fn name(&self) -> &'static str {
        "vector_image"
    }

    fn placeholder(&self) -> RenderPrimitive {
        RenderPrimitive::sprite(None)
    }

    fn resolve(&self, ctx: &RenderContext, resource: &TextureKey) -> Resolution {
        resolve_texture(ctx, resource.clone())
    }
}

/// Raster sprites at their native size
#[derive(Clone, Copy, Debug, Default)]
pub struct SpriteResolver;

impl ResourceResolver for SpriteResolver {
    type Resource = String;

    fn name(&self) -> &'static str {
        "sprite"
    }

    fn placeholder(&self) -> RenderPrimitive {
        RenderPrimitive::sprite(None)
    }

    fn resolve(&self, ctx: &RenderContext, resource: &String) -> Resolution {
        resolve_texture(ctx, TextureKey::native(resource.as_str()))
    }
}

/// Text labels
#[derive(Clone, Copy, Debug)]
pub struct TextResolver {
    pub font_size: f32,
}

impl Default for TextResolver {
    fn default() -> Self {
        Self { font_size: 16.0 }
    }
}

impl TextResolver {
    pub fn new(font_size: f32) -> Self {
        Self { font_size }
    }
}

impl ResourceResolver for TextResolver {
    type Resource = String;

    fn name(&self) -> &'static str {
        "text"
    }

    fn placeholder(&self) -> RenderPrimitive {
        RenderPrimitive::text(String::new(), self.font_size)
    }

    fn resolve(&self, _ctx: &RenderContext, resource: &String) -> Resolution {
        Resolution::Ready(RenderPrimitive::text(resource.clone(), self.font_size))
    }
}

/// Plain containers; the resource carries no data
#[derive(Clone, Copy, Debug, Default)]
pub struct ContainerResolver;

impl ResourceResolver for ContainerResolver {
    type Resource = ();

    fn name(&self) -> &'static str {
        "container"
    }

    fn placeholder(&self) -> RenderPrimitive {
        RenderPrimitive::container()
    }

    fn resolve(&self, _ctx: &RenderContext, _resource: &()) -> Resolution {
        Resolution::Ready(RenderPrimitive::container())
    }
}
