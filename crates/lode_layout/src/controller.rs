//! Layout controller
//!
//! The single writer of the [`LayoutStore`]. Each viewport signal runs one
//! pass: read insets, compute the layout, refresh the debug overlay if it is
//! on, publish one snapshot.

use lode_platform::{read_safe_insets, InsetProvider, ViewportEvent};
use lode_scene::SharedScene;

use crate::config::LayoutConfig;
use crate::debug::DebugOverlay;
use crate::engine::compute_layout;
use crate::result::LayoutResult;
use crate::store::{LayoutState, LayoutStore};

/// Drives layout recomputation from viewport events
pub struct LayoutController {
    config: LayoutConfig,
    insets: Box<dyn InsetProvider>,
    scene: SharedScene,
    store: LayoutStore,
    viewport: Option<ViewportEvent>,
    overlay: Option<DebugOverlay>,
}

impl LayoutController {
    pub fn new(
        config: LayoutConfig,
        insets: impl InsetProvider + 'static,
        scene: SharedScene,
    ) -> Self {
        Self {
            config,
            insets: Box::new(insets),
            scene,
            store: LayoutStore::new(),
            viewport: None,
            overlay: None,
        }
    }

    /// Read handle for UI code
    pub fn store(&self) -> LayoutStore {
        self.store.clone()
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Swap the configuration and recompute for the last viewport
    pub fn set_config(&mut self, config: LayoutConfig) -> Option<LayoutState> {
        self.config = config;
        self.recompute()
    }

    /// Last viewport measurement, if any
    pub fn viewport(&self) -> Option<ViewportEvent> {
        self.viewport
    }

    /// Run a layout pass for a resize, rotation or inset change
    pub fn handle_viewport(&mut self, event: ViewportEvent) -> LayoutState {
        let (width, height) = event.sanitized_size();
        let insets = read_safe_insets(&*self.insets);
        let layout = compute_layout(width, height, insets, &self.config);

        tracing::debug!(
            width,
            height,
            change = ?event.change,
            device_class = ?layout.device_class,
            orientation = ?layout.orientation,
            "layout recomputed"
        );

        self.viewport = Some(event);
        self.refresh_overlay(&layout);

        let state = LayoutState {
            is_mobile: layout.is_mobile(),
            current_layout: Some(layout),
            screen_width: width,
            screen_height: height,
        };
        self.store.publish(state.clone());
        state
    }

    /// Repeat the last pass, picking up new insets or configuration
    ///
    /// Returns `None` before the first viewport event.
    pub fn recompute(&mut self) -> Option<LayoutState> {
        let event = self.viewport?;
        Some(self.handle_viewport(event))
    }

    /// Show the region overlay; returns `false` if it was already shown
    pub fn enable_layout_debug(&mut self) -> bool {
        if self.overlay.is_some() {
            return false;
        }
        let mut overlay = match DebugOverlay::attach(self.scene.clone()) {
            Ok(overlay) => overlay,
            Err(err) => {
                tracing::warn!(error = %err, "could not create layout debug overlay");
                return false;
            }
        };
        if let Some(layout) = self.store.with(|s| s.current_layout.clone()) {
            if let Err(err) = overlay.refresh(&layout) {
                tracing::warn!(error = %err, "could not draw layout debug overlay");
            }
        }
        self.overlay = Some(overlay);
        true
    }

    /// Remove the region overlay; returns `false` if it was not shown
    pub fn disable_layout_debug(&mut self) -> bool {
        let Some(overlay) = self.overlay.take() else {
            return false;
        };
        if let Err(err) = overlay.remove() {
            tracing::debug!(error = %err, "layout debug overlay already removed");
        }
        true
    }

    pub fn is_layout_debug_enabled(&self) -> bool {
        self.overlay.is_some()
    }

    pub fn overlay(&self) -> Option<&DebugOverlay> {
        self.overlay.as_ref()
    }

    fn refresh_overlay(&mut self, layout: &LayoutResult) {
        let Some(overlay) = self.overlay.as_mut() else {
            return;
        };
        if let Err(err) = overlay.refresh(layout) {
            tracing::warn!(error = %err, "layout debug overlay lost, disabling");
            self.overlay = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::RegionName;
    use lode_platform::{SafeInsets, SharedInsets, StaticInsets, ViewportChange};
    use lode_scene::Scene;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn setup(insets: impl InsetProvider + 'static) -> (LayoutController, SharedScene) {
        let scene = Scene::shared();
        (
            LayoutController::new(LayoutConfig::default(), insets, scene.clone()),
            scene,
        )
    }

    fn overlay_nodes(scene: &SharedScene) -> usize {
        let s = scene.borrow();
        s.node(s.root())
            .unwrap()
            .children()
            .iter()
            .filter(|id| s.node(**id).unwrap().name == DebugOverlay::NODE_NAME)
            .count()
    }

    #[test]
    fn test_publishes_consistent_snapshots() {
        let insets = StaticInsets(SafeInsets::new(40.0, 0.0, 20.0, 0.0));
        let (mut controller, _scene) = setup(insets);
        let store = controller.store();

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = Rc::clone(&seen);
        let _handle = store.subscribe(move |state| {
            let layout = state.current_layout.as_ref().unwrap();
            assert_eq!(state.is_mobile, layout.is_mobile());
            assert_eq!(state.screen_width, layout.viewport.width());
            assert_eq!(state.screen_height, layout.viewport.height());
            seen_clone.borrow_mut().push(state.is_mobile);
        });

        let state = controller.handle_viewport(ViewportEvent::new(375.0, 812.0, ViewportChange::Initial));
        assert!(state.is_mobile);
        assert_eq!(
            state.current_layout.as_ref().unwrap().safe_area.height(),
            752.0
        );

        controller.handle_viewport(ViewportEvent::resized(1440.0, 900.0));
        assert_eq!(*seen.borrow(), vec![true, false]);
        assert_eq!(store.snapshot().screen_width, 1440.0);
        assert_eq!(store.version(), 2);
    }

    #[test]
    fn test_recompute_reads_fresh_insets() {
        let host = SharedInsets::new(SafeInsets::ZERO);
        let (mut controller, _scene) = setup(host.clone());

        assert!(controller.recompute().is_none());
        assert_eq!(controller.store().version(), 0);

        controller.handle_viewport(ViewportEvent::resized(390.0, 844.0));
        host.set(SafeInsets::new(47.0, 0.0, 34.0, 0.0));
        let state = controller.recompute().unwrap();

        let safe = state.current_layout.unwrap().safe_area;
        assert_eq!(safe.y(), 47.0);
        assert_eq!(safe.height(), 844.0 - 81.0);
    }

    #[test]
    fn test_set_config_recomputes() {
        let (mut controller, _scene) = setup(StaticInsets::default());
        controller.handle_viewport(ViewportEvent::resized(700.0, 900.0));
        assert!(controller.store().snapshot().is_mobile);

        let config = LayoutConfig {
            mobile_breakpoint: 600.0,
            ..LayoutConfig::default()
        };
        let state = controller.set_config(config).unwrap();
        assert!(!state.is_mobile);
    }

    #[test]
    fn test_debug_overlay_is_idempotent_and_observational() {
        let (mut controller, scene) = setup(StaticInsets::default());
        controller.handle_viewport(ViewportEvent::resized(1280.0, 720.0));
        let before = controller.store().snapshot();

        assert!(controller.enable_layout_debug());
        assert!(!controller.enable_layout_debug());
        assert_eq!(overlay_nodes(&scene), 1);
        assert_eq!(controller.overlay().unwrap().marker_count(), 4);

        let after = controller.recompute().unwrap();
        assert_eq!(before.current_layout, after.current_layout);
        assert_eq!(overlay_nodes(&scene), 1);

        assert!(controller.disable_layout_debug());
        assert!(!controller.disable_layout_debug());
        assert_eq!(overlay_nodes(&scene), 0);
        assert_eq!(scene.borrow().primitive_count(), 0);
    }

    #[test]
    fn test_overlay_tracks_device_class_changes() {
        let (mut controller, scene) = setup(StaticInsets::default());
        assert!(controller.enable_layout_debug());
        assert_eq!(controller.overlay().unwrap().marker_count(), 0);

        controller.handle_viewport(ViewportEvent::resized(1280.0, 720.0));
        assert_eq!(controller.overlay().unwrap().marker_count(), 4);

        controller.handle_viewport(ViewportEvent::new(
            720.0,
            1280.0,
            ViewportChange::OrientationChanged,
        ));
        let overlay = controller.overlay().unwrap();
        assert_eq!(overlay.marker_count(), 3);
        assert!(scene
            .borrow()
            .find_child(overlay.node(), RegionName::SidePanel.label())
            .is_none());
    }

    #[test]
    fn test_overlay_removed_externally_is_dropped() {
        let (mut controller, scene) = setup(StaticInsets::default());
        controller.enable_layout_debug();
        let node = controller.overlay().unwrap().node();
        scene.borrow_mut().remove_node(node).unwrap();

        controller.handle_viewport(ViewportEvent::resized(800.0, 600.0));
        assert!(!controller.is_layout_debug_enabled());
    }
}
