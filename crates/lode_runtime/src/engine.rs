//! Engine wiring
//!
//! [`Engine`] owns the cooperative executor and builds the shared
//! [`RenderContext`] every component receives, next to the
//! [`LayoutController`] that turns viewport events into layout snapshots.

use std::path::Path;
use std::rc::Rc;

use anyhow::{Context, Result};
use futures::executor::LocalPool;
use lode_core::{LogSink, TracingSink};
use lode_image::{AssetSource, FileSource, TextureFactory};
use lode_layout::{LayoutConfig, LayoutController, LayoutState, LayoutStore};
use lode_platform::{AssetManifest, InsetProvider, ViewportEvent};
use lode_scene::{NodeId, RenderContext, Scene, SharedScene};

/// Asset manifest looked up in the assets root by [`Engine::from_config_file`]
pub const MANIFEST_FILE: &str = "manifest.json";

/// Scene, textures, executor and layout for one game view
pub struct Engine {
    pool: LocalPool,
    context: RenderContext,
    layout: LayoutController,
}

impl Engine {
    /// Assemble an engine from prepared parts
    pub fn new(
        config: LayoutConfig,
        textures: Rc<TextureFactory>,
        insets: impl InsetProvider + 'static,
        log: Rc<dyn LogSink>,
    ) -> Self {
        let pool = LocalPool::new();
        let scene = Scene::shared();
        let context = RenderContext::new(scene.clone(), textures, Rc::new(pool.spawner()), log);
        let layout = LayoutController::new(config, insets, scene);
        Self {
            pool,
            context,
            layout,
        }
    }

    /// Engine reading assets from `source`, logging through `tracing`
    pub fn with_source(
        config: LayoutConfig,
        source: impl AssetSource + 'static,
        insets: impl InsetProvider + 'static,
    ) -> Self {
        Self::new(
            config,
            TextureFactory::new(source),
            insets,
            Rc::new(TracingSink),
        )
    }

    /// Engine configured from a layout TOML file and an assets directory
    ///
    /// If the assets directory contains a `manifest.json`, texture paths are
    /// mapped through it.
    pub fn from_config_file(
        config_path: impl AsRef<Path>,
        assets_root: impl AsRef<Path>,
        insets: impl InsetProvider + 'static,
    ) -> Result<Self> {
        let config_path = config_path.as_ref();
        let config = LayoutConfig::from_file(config_path)
            .with_context(|| format!("loading layout config {}", config_path.display()))?;

        let root = assets_root.as_ref();
        let source = FileSource::new(root);
        let manifest_path = root.join(MANIFEST_FILE);
        let textures = if manifest_path.is_file() {
            let json = std::fs::read_to_string(&manifest_path)
                .with_context(|| format!("reading {}", manifest_path.display()))?;
            let manifest = AssetManifest::from_json(&json)
                .with_context(|| format!("parsing {}", manifest_path.display()))?;
            tracing::info!(entries = manifest.len(), "asset manifest loaded");
            TextureFactory::with_resolver(source, manifest)
        } else {
            TextureFactory::new(source)
        };

        Ok(Self::new(config, textures, insets, Rc::new(TracingSink)))
    }

    /// Context handed to renderer components
    pub fn context(&self) -> RenderContext {
        self.context.clone()
    }

    pub fn scene(&self) -> SharedScene {
        Rc::clone(&self.context.scene)
    }

    pub fn textures(&self) -> Rc<TextureFactory> {
        Rc::clone(&self.context.textures)
    }

    /// Create a node directly under the scene root
    pub fn create_node(&self, name: &str) -> lode_scene::Result<NodeId> {
        let mut scene = self.context.scene.borrow_mut();
        let root = scene.root();
        scene.create_node(root, name)
    }

    pub fn layout(&self) -> &LayoutController {
        &self.layout
    }

    pub fn layout_mut(&mut self) -> &mut LayoutController {
        &mut self.layout
    }

    pub fn layout_store(&self) -> LayoutStore {
        self.layout.store()
    }

    pub fn handle_viewport(&mut self, event: ViewportEvent) -> LayoutState {
        self.layout.handle_viewport(event)
    }

    pub fn enable_layout_debug(&mut self) -> bool {
        self.layout.enable_layout_debug()
    }

    pub fn disable_layout_debug(&mut self) -> bool {
        self.layout.disable_layout_debug()
    }

    /// Drive pending loads until none can make progress, then flush
    /// primitive detaches deferred while the scene was borrowed
    pub fn run_until_stalled(&mut self) {
        self.pool.run_until_stalled();
        if let Ok(mut scene) = self.context.scene.try_borrow_mut() {
            scene.flush_detached();
        }
    }
}
