//! Lode
//!
//! Rendering and presentation core for 2D idle games.
//!
//! This crate re-exports the Lode crates and wires them together in an
//! [`Engine`]:
//!
//! - `lode_core` - geometry, log sink, reactive store
//! - `lode_platform` - safe-area insets, viewport events, asset mapping
//! - `lode_image` - texture factory with in-flight deduplication
//! - `lode_scene` - scene arena and renderer components
//! - `lode_layout` - responsive layout, layout store, debug overlay
//!
//! # Example
//!
//! ```ignore
//! use lode_runtime::prelude::*;
//!
//! let mut engine = Engine::from_config_file("layout.toml", "assets", UnsupportedPlatform)?;
//! engine.handle_viewport(ViewportEvent::resized(375.0, 812.0));
//!
//! let node = engine.create_node("ore")?;
//! let ore = VectorSprite::new(engine.context(), node, RendererConfig::new(), "ore.svg", 64);
//! ore.on_added();
//!
//! loop {
//!     engine.run_until_stalled();
//!     // draw engine.scene()
//! }
//! ```

mod engine;

pub use engine::{Engine, MANIFEST_FILE};

pub use lode_core as core;
pub use lode_image as image;
pub use lode_layout as layout;
pub use lode_platform as platform;
pub use lode_scene as scene;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::Engine;

    pub use lode_core::{Anchor, Color, LogSink, Point, Rect, Size, TracingSink};
    pub use lode_image::{FileSource, MemorySource, TextureFactory, TextureKey};
    pub use lode_layout::{
        compute_layout, DeviceClass, LayoutConfig, LayoutState, LayoutStore, RegionName,
    };
    pub use lode_platform::{
        read_safe_insets, InsetProvider, SafeInsets, SharedInsets, StaticInsets,
        UnsupportedPlatform, ViewportEvent,
    };
    pub use lode_scene::{
        ContainerResolver, RenderContext, RendererComponent, RendererConfig, SpriteResolver,
        TextResolver, VectorImageResolver, VectorSprite,
    };
}
