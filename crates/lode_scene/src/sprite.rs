//! Vector sprite helper

use std::ops::Deref;

use lode_image::TextureKey;

use crate::component::RendererComponent;
use crate::context::{RenderContext, RendererConfig};
use crate::resolver::VectorImageResolver;
use crate::scene::NodeId;

/// A renderer component showing one rasterized vector image
///
/// Thin wrapper over `RendererComponent<VectorImageResolver>` that speaks in
/// paths and sizes instead of texture keys. Derefs to the component.
pub struct VectorSprite {
    component: RendererComponent<VectorImageResolver>,
}

impl VectorSprite {
    pub fn new(
        ctx: RenderContext,
        node: NodeId,
        config: RendererConfig,
        path: impl Into<String>,
        size: u32,
    ) -> Self {
        let key = TextureKey::new(path, size);
        Self {
            component: RendererComponent::new(ctx, node, config, VectorImageResolver, Some(key)),
        }
    }

    /// Show a different image; `size: None` keeps the current raster size
    pub fn set_source(&self, path: impl Into<String>, size: Option<u32>) {
        let size = size.unwrap_or_else(|| self.size());
        self.component.set_resource(TextureKey::new(path, size));
    }

    pub fn path(&self) -> Option<String> {
        self.component.resource().map(|key| key.path().to_string())
    }

    /// Current raster size
    pub fn size(&self) -> u32 {
        self.component.resource().map(|key| key.size()).unwrap_or(0)
    }

    pub fn component(&self) -> &RendererComponent<VectorImageResolver> {
        &self.component
    }
}

impl Deref for VectorSprite {
    type Target = RendererComponent<VectorImageResolver>;

    fn deref(&self) -> &Self::Target {
        &self.component
    }
}
