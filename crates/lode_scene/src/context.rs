//! Render context and per-component visual configuration

use std::fmt;
use std::rc::Rc;

use futures::task::LocalSpawn;
use lode_core::{Anchor, Color, LogSink, Size};
use lode_image::TextureFactory;

use crate::primitive::RenderPrimitive;
use crate::scene::SharedScene;

/// Collaborators every renderer component needs
///
/// Cheap to clone; all fields are shared handles.
#[derive(Clone)]
pub struct RenderContext {
    pub scene: SharedScene,
    pub textures: Rc<TextureFactory>,
    /// Executor for pending resource loads
    pub spawner: Rc<dyn LocalSpawn>,
    pub log: Rc<dyn LogSink>,
}

impl RenderContext {
    pub fn new(
        scene: SharedScene,
        textures: Rc<TextureFactory>,
        spawner: Rc<dyn LocalSpawn>,
        log: Rc<dyn LogSink>,
    ) -> Self {
        Self {
            scene,
            textures,
            spawner,
            log,
        }
    }
}

impl fmt::Debug for RenderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("textures", &self.textures.stats())
            .finish_non_exhaustive()
    }
}

/// Visual properties a component re-applies to every primitive it owns
#[derive(Clone, Debug, PartialEq)]
pub struct RendererConfig {
    pub tint: Color,
    pub alpha: f32,
    pub visible: bool,
    pub anchor: Anchor,
    pub size: Option<Size>,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            tint: Color::WHITE,
            alpha: 1.0,
            visible: true,
            anchor: Anchor::Center,
            size: None,
        }
    }
}

impl RendererConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn tint(mut self, tint: Color) -> Self {
        self.tint = tint;
        self
    }

    /// Opacity, clamped to `0.0..=1.0`
    pub fn alpha(mut self, alpha: f32) -> Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    /// Write these properties onto a primitive
    pub fn apply(&self, primitive: &mut RenderPrimitive) {
        primitive.tint = self.tint;
        primitive.alpha = self.alpha;
        primitive.visible = self.visible;
        primitive.anchor = self.anchor;
        primitive.size = self.size;
    }
}
