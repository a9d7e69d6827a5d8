//! Render primitives and the visual properties applied to them

use std::rc::Rc;

use lode_core::{Anchor, Color, Size};
use lode_image::Texture;

/// What a primitive draws
#[derive(Clone, Debug)]
pub enum PrimitiveKind {
    /// Textured quad; `None` while the texture is still loading
    Sprite { texture: Option<Rc<Texture>> },
    /// A run of text
    Text { content: String, font_size: f32 },
    /// Invisible grouping box (debug outlines, hit areas)
    Container,
}

/// A drawable owned by exactly one scene node
///
/// Freshly built primitives carry default visual properties. Owners apply
/// their own configuration after every replacement.
#[derive(Clone, Debug)]
pub struct RenderPrimitive {
    pub kind: PrimitiveKind,
    pub tint: Color,
    pub alpha: f32,
    pub visible: bool,
    pub anchor: Anchor,
    /// Display size; `None` uses the content's natural size
    pub size: Option<Size>,
}

impl RenderPrimitive {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            kind,
            tint: Color::WHITE,
            alpha: 1.0,
            visible: true,
            anchor: Anchor::Center,
            size: None,
        }
    }

    pub fn sprite(texture: Option<Rc<Texture>>) -> Self {
        Self::new(PrimitiveKind::Sprite { texture })
    }

    pub fn text(content: impl Into<String>, font_size: f32) -> Self {
        Self::new(PrimitiveKind::Text {
            content: content.into(),
            font_size,
        })
    }

    pub fn container() -> Self {
        Self::new(PrimitiveKind::Container)
    }

    /// Texture shown by a sprite, if any
    pub fn texture(&self) -> Option<&Rc<Texture>> {
        match &self.kind {
            PrimitiveKind::Sprite { texture } => texture.as_ref(),
            _ => None,
        }
    }

    pub fn text_content(&self) -> Option<&str> {
        match &self.kind {
            PrimitiveKind::Text { content, .. } => Some(content),
            _ => None,
        }
    }

    /// Size the primitive occupies on screen
    ///
    /// An explicit size wins; sprites otherwise use their texture dimensions.
    pub fn display_size(&self) -> Size {
        if let Some(size) = self.size {
            return size;
        }
        match self.texture() {
            Some(texture) => Size::new(texture.width() as f32, texture.height() as f32),
            None => Size::default(),
        }
    }
}
