//! Lode Scene
//!
//! The scene arena and the renderer components that populate it.
//!
//! # Architecture
//!
//! ```text
//! RendererComponent<R> ──resolve──▶ R: ResourceResolver ──▶ TextureFactory
//!        │                                                        │
//!        └──attach / replace / detach──▶ Scene ◀── textures ──────┘
//! ```
//!
//! - [`Scene`] - slotmap-backed node tree; nodes own primitives
//! - [`RenderPrimitive`] - sprite, text or container plus visual properties
//! - [`RendererComponent`] - lifecycle, resource generation and the
//!   disposal-safe application of async loads
//! - Resolvers - [`VectorImageResolver`], [`SpriteResolver`],
//!   [`TextResolver`], [`ContainerResolver`]
//! - [`VectorSprite`] - path + size convenience over the vector resolver

mod component;
mod context;
mod error;
mod primitive;
mod resolver;
mod scene;
mod sprite;

pub use component::{Lifecycle, RendererComponent, ResourceState};
pub use context::{RenderContext, RendererConfig};
pub use error::{Result, SceneError};
pub use primitive::{PrimitiveKind, RenderPrimitive};
pub use resolver::{
    ContainerResolver, PrimitiveResult, Resolution, ResourceResolver, SpriteResolver,
    TextResolver, VectorImageResolver,
};
pub use scene::{DetachQueue, NodeId, PrimitiveId, Scene, SceneNode, SharedScene};
pub use sprite::VectorSprite;
