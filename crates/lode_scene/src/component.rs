//! Renderer component
//!
//! [`RendererComponent`] owns one primitive on one scene node and keeps it in
//! sync with a resource through a [`ResourceResolver`].
//!
//! # Lifecycle
//!
//! ```text
//! Constructed --on_added--> Attached --dispose--> Disposed
//!      \_______________________dispose___________/
//! ```
//!
//! Independently, the resource state moves between `Idle`, `Loading`,
//! `Applied` and `Failed` while the component is alive.
//!
//! # Pending loads
//!
//! A pending resolution runs as a task on the context's spawner. The task
//! holds only a `Weak` reference to the component and the generation number
//! it was started with. When it finishes it applies the result only if the
//! component still exists, has not been disposed, and no newer resource was
//! requested in the meantime. Anything else is dropped without touching the
//! scene, so disposing a component while its texture is loading is always
//! safe. The texture itself still lands in the factory cache.
//!
//! # Example
//!
//! ```ignore
//! let ore = RendererComponent::new(
//!     ctx.clone(),
//!     node,
//!     RendererConfig::new().anchor(Anchor::TopLeft),
//!     VectorImageResolver,
//!     Some(TextureKey::new("icons/ore.svg", 64)),
//! );
//! ore.on_added();
//! // ...later
//! ore.set_resource(TextureKey::new("icons/gem.svg", 64));
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use futures::task::LocalSpawnExt;
use lode_core::{Color, LogContext, Size};
use lode_image::ResourceLoadError;

use crate::context::{RenderContext, RendererConfig};
use crate::error::SceneError;
use crate::primitive::RenderPrimitive;
use crate::resolver::{PrimitiveResult, Resolution, ResourceResolver};
use crate::scene::{DetachQueue, NodeId, PrimitiveId};

const LOG_SOURCE: &str = "lode_scene";

/// Where a component is in its lifetime
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Constructed,
    Attached,
    /// Terminal
    Disposed,
}

/// State of the component's current resource
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceState {
    /// No resource requested yet
    Idle,
    Loading,
    Applied,
    /// Last request failed; the previous primitive is still shown
    Failed,
}

struct ComponentState<R: ResourceResolver> {
    ctx: RenderContext,
    node: NodeId,
    config: RendererConfig,
    resolver: R,
    primitive: Option<PrimitiveId>,
    lifecycle: Lifecycle,
    resource_state: ResourceState,
    resource: Option<R::Resource>,
    /// Bumped on every resource change and on dispose
    generation: u64,
    /// Fallback when the scene is borrowed at dispose time
    detached: DetachQueue,
}

impl<R: ResourceResolver> ComponentState<R> {
    fn log_context(&self) -> LogContext {
        LogContext::new(LOG_SOURCE).with("component", self.resolver.name())
    }

    fn report_scene_error(&self, err: &SceneError) {
        tracing::warn!(component = self.resolver.name(), error = %err, "scene mutation failed");
        self.ctx
            .log
            .warn(&format!("scene mutation failed: {}", err), &self.log_context());
    }

    fn report_load_failure(&self, err: &ResourceLoadError) {
        let ctx = self
            .log_context()
            .with("path", &err.path)
            .with("size", err.size);
        self.ctx.log.error("resource load failed", err, &ctx);
    }

    /// Re-apply the visual configuration to the current primitive
    fn apply_props(&self) {
        let Some(id) = self.primitive else {
            return;
        };
        let missing = {
            let mut scene = self.ctx.scene.borrow_mut();
            match scene.primitive_mut(id) {
                Some(primitive) => {
                    self.config.apply(primitive);
                    false
                }
                None => true,
            }
        };
        if missing {
            self.report_scene_error(&SceneError::MissingPrimitive(id));
        }
    }

    /// Put a fresh primitive in place of the current one
    fn swap_in(&mut self, mut primitive: RenderPrimitive) -> bool {
        self.config.apply(&mut primitive);
        let result = {
            let mut scene = self.ctx.scene.borrow_mut();
            match self.primitive {
                Some(old) => scene.replace_primitive(old, primitive),
                None => scene.attach_primitive(self.node, primitive),
            }
        };
        match result {
            Ok(id) => {
                self.primitive = Some(id);
                true
            }
            Err(err) => {
                self.primitive = None;
                self.report_scene_error(&err);
                false
            }
        }
    }

    /// Single application point for resolved resources
    fn finish(state: &Rc<RefCell<Self>>, generation: u64, outcome: PrimitiveResult) {
        let mut this = state.borrow_mut();
        if this.lifecycle == Lifecycle::Disposed {
            tracing::trace!(
                component = this.resolver.name(),
                "dropping resolved resource for disposed component"
            );
            return;
        }
        if this.generation != generation {
            tracing::trace!(
                component = this.resolver.name(),
                stale = generation,
                current = this.generation,
                "dropping stale resource"
            );
            return;
        }

        match outcome {
            Ok(primitive) => {
                let applied = this.swap_in(primitive);
                this.resource_state = if applied {
                    ResourceState::Applied
                } else {
                    ResourceState::Failed
                };
            }
            Err(err) => {
                this.resource_state = ResourceState::Failed;
                this.report_load_failure(&err);
            }
        }
    }

    fn dispose(&mut self) {
        if self.lifecycle == Lifecycle::Disposed {
            return;
        }
        self.lifecycle = Lifecycle::Disposed;
        self.generation += 1;

        let Some(id) = self.primitive.take() else {
            return;
        };
        let Ok(mut scene) = self.ctx.scene.try_borrow_mut() else {
            tracing::debug!(
                component = self.resolver.name(),
                "scene busy during dispose, detach queued"
            );
            self.detached.push(id);
            return;
        };
        if let Err(err) = scene.detach_primitive(id) {
            // The owning node was removed along with its primitives
            tracing::debug!(component = self.resolver.name(), error = %err, "primitive already gone");
        }
    }
}

/// Component owning one primitive, resolved through `R`
pub struct RendererComponent<R: ResourceResolver> {
    state: Rc<RefCell<ComponentState<R>>>,
}

impl<R: ResourceResolver> RendererComponent<R> {
    /// Create the component and attach its placeholder to `node`
    ///
    /// When `resource` is given, resolution starts right away.
    pub fn new(
        ctx: RenderContext,
        node: NodeId,
        config: RendererConfig,
        resolver: R,
        resource: Option<R::Resource>,
    ) -> Self {
        let mut placeholder = resolver.placeholder();
        config.apply(&mut placeholder);
        let (attached, detached) = {
            let mut scene = ctx.scene.borrow_mut();
            (scene.attach_primitive(node, placeholder), scene.detach_queue())
        };

        let mut state = ComponentState {
            ctx,
            node,
            config,
            resolver,
            primitive: None,
            lifecycle: Lifecycle::Constructed,
            resource_state: ResourceState::Idle,
            resource: None,
            generation: 0,
            detached,
        };
        match attached {
            Ok(id) => state.primitive = Some(id),
            Err(err) => state.report_scene_error(&err),
        }

        let component = Self {
            state: Rc::new(RefCell::new(state)),
        };
        if let Some(resource) = resource {
            component.set_resource(resource);
        }
        component
    }

    /// Mark the component as added to the live scene
    ///
    /// Idempotent. Re-applies visual properties every time.
    pub fn on_added(&self) {
        let mut state = self.state.borrow_mut();
        match state.lifecycle {
            Lifecycle::Disposed => return,
            Lifecycle::Constructed => state.lifecycle = Lifecycle::Attached,
            Lifecycle::Attached => {}
        }
        state.apply_props();
    }

    /// Request a new resource
    ///
    /// Any load still pending for an earlier resource is superseded.
    pub fn set_resource(&self, resource: R::Resource) {
        let (ctx, generation, resolution) = {
            let mut state = self.state.borrow_mut();
            if state.lifecycle == Lifecycle::Disposed {
                tracing::debug!(
                    component = state.resolver.name(),
                    "ignoring resource change on disposed component"
                );
                return;
            }
            state.generation += 1;
            state.resource_state = ResourceState::Loading;
            state.resource = Some(resource.clone());
            let resolution = state.resolver.resolve(&state.ctx, &resource);
            (state.ctx.clone(), state.generation, resolution)
        };

        match resolution {
            Resolution::Ready(primitive) => {
                ComponentState::finish(&self.state, generation, Ok(primitive));
            }
            Resolution::Pending(load) => {
                let weak = Rc::downgrade(&self.state);
                let task = async move {
                    let outcome = load.await;
                    if let Some(state) = weak.upgrade() {
                        ComponentState::finish(&state, generation, outcome);
                    }
                };
                if let Err(err) = ctx.spawner.spawn_local(task) {
                    let mut state = self.state.borrow_mut();
                    state.resource_state = ResourceState::Failed;
                    ctx.log
                        .error("could not schedule resource load", &err, &state.log_context());
                }
            }
        }
    }

    /// Resolve the current resource again, e.g. after a failure
    pub fn reload(&self) {
        let resource = self.state.borrow().resource.clone();
        if let Some(resource) = resource {
            self.set_resource(resource);
        }
    }

    /// Change visual properties and apply them to the current primitive
    pub fn update_config(&self, f: impl FnOnce(&mut RendererConfig)) {
        let mut state = self.state.borrow_mut();
        if state.lifecycle == Lifecycle::Disposed {
            return;
        }
        f(&mut state.config);
        state.apply_props();
    }

    pub fn set_tint(&self, tint: Color) {
        self.update_config(|c| c.tint = tint);
    }

    pub fn set_alpha(&self, alpha: f32) {
        self.update_config(|c| c.alpha = alpha.clamp(0.0, 1.0));
    }

    pub fn set_visible(&self, visible: bool) {
        self.update_config(|c| c.visible = visible);
    }

    pub fn set_size(&self, size: Option<Size>) {
        self.update_config(|c| c.size = size);
    }

    /// Detach and remove the primitive
    ///
    /// Safe while a load is pending; idempotent.
    pub fn dispose(&self) {
        match self.state.try_borrow_mut() {
            Ok(mut state) => state.dispose(),
            Err(_) => tracing::warn!("component state busy during dispose"),
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.state.borrow().lifecycle
    }

    pub fn is_disposed(&self) -> bool {
        self.lifecycle() == Lifecycle::Disposed
    }

    pub fn resource_state(&self) -> ResourceState {
        self.state.borrow().resource_state
    }

    /// True once the most recently requested resource has been applied
    pub fn is_resource_loaded(&self) -> bool {
        self.resource_state() == ResourceState::Applied
    }

    /// True when the applied primitive shows a texture
    pub fn is_texture_loaded(&self) -> bool {
        self.is_resource_loaded()
            && self
                .with_primitive(|p| p.texture().is_some())
                .unwrap_or(false)
    }

    /// Most recently requested resource
    pub fn resource(&self) -> Option<R::Resource> {
        self.state.borrow().resource.clone()
    }

    pub fn config(&self) -> RendererConfig {
        self.state.borrow().config.clone()
    }

    pub fn node(&self) -> NodeId {
        self.state.borrow().node
    }

    pub fn primitive_id(&self) -> Option<PrimitiveId> {
        self.state.borrow().primitive
    }

    /// Read the current primitive
    ///
    /// The scene is borrowed for the duration of `f`.
    pub fn with_primitive<T>(&self, f: impl FnOnce(&RenderPrimitive) -> T) -> Option<T> {
        let state = self.state.borrow();
        let id = state.primitive?;
        let scene = state.ctx.scene.borrow();
        scene.primitive(id).map(f)
    }
}

impl<R: ResourceResolver> Drop for RendererComponent<R> {
    fn drop(&mut self) {
        self.dispose();
    }
}
