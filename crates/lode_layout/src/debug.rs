//! Layout debug overlay
//!
//! Draws each region's rectangle and a label on top of the scene. The overlay
//! only reads layout results; it never feeds back into layout.

use std::collections::BTreeMap;

use lode_core::{Anchor, Color, Point, Size};
use lode_scene::{
    NodeId, PrimitiveId, PrimitiveKind, RenderPrimitive, Result, SceneError, SharedScene,
};

use crate::result::{LayoutResult, Region, RegionName};

const LABEL_FONT_SIZE: f32 = 12.0;
const OUTLINE_ALPHA: f32 = 0.3;

#[derive(Clone, Copy, Debug)]
struct RegionMarker {
    node: NodeId,
    outline: PrimitiveId,
    label: PrimitiveId,
}

/// Scene nodes visualizing a layout
pub struct DebugOverlay {
    scene: SharedScene,
    node: NodeId,
    markers: BTreeMap<RegionName, RegionMarker>,
}

impl DebugOverlay {
    /// Name of the overlay node under the scene root
    pub const NODE_NAME: &'static str = "layout-debug";

    /// Create the (empty) overlay node as the last child of the scene root
    pub fn attach(scene: SharedScene) -> Result<Self> {
        let node = {
            let mut s = scene.borrow_mut();
            let root = s.root();
            s.create_node(root, Self::NODE_NAME)?
        };
        Ok(Self {
            scene,
            node,
            markers: BTreeMap::new(),
        })
    }

    /// Sync the markers with `layout`
    pub fn refresh(&mut self, layout: &LayoutResult) -> Result<()> {
        let mut scene = self.scene.borrow_mut();

        let gone: Vec<RegionName> = self
            .markers
            .keys()
            .copied()
            .filter(|name| layout.region(*name).is_none())
            .collect();
        for name in gone {
            if let Some(marker) = self.markers.remove(&name) {
                scene.remove_node(marker.node)?;
            }
        }

        for (name, region) in layout.iter() {
            let marker = match self.markers.get(&name) {
                Some(marker) => *marker,
                None => {
                    let node = scene.create_node(self.node, name.label())?;
                    let mut outline = RenderPrimitive::container();
                    outline.tint = region_color(name);
                    outline.alpha = OUTLINE_ALPHA;
                    outline.anchor = Anchor::TopLeft;
                    let outline = scene.attach_primitive(node, outline)?;
                    let mut label = RenderPrimitive::text(String::new(), LABEL_FONT_SIZE);
                    label.anchor = Anchor::TopLeft;
                    let label = scene.attach_primitive(node, label)?;

                    let marker = RegionMarker {
                        node,
                        outline,
                        label,
                    };
                    self.markers.insert(name, marker);
                    marker
                }
            };

            scene.set_position(marker.node, Point::new(region.x, region.y))?;
            scene
                .primitive_mut(marker.outline)
                .ok_or(SceneError::MissingPrimitive(marker.outline))?
                .size = Some(Size::new(region.width, region.height));
            scene
                .primitive_mut(marker.label)
                .ok_or(SceneError::MissingPrimitive(marker.label))?
                .kind = PrimitiveKind::Text {
                content: label_text(name, region),
                font_size: LABEL_FONT_SIZE,
            };
        }
        Ok(())
    }

    /// The overlay's node under the scene root
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Number of region markers currently drawn
    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Remove the overlay and all of its markers from the scene
    pub fn remove(self) -> Result<()> {
        self.scene.borrow_mut().remove_node(self.node)
    }
}

fn label_text(name: RegionName, region: &Region) -> String {
    format!("{} {:.0}x{:.0}", name, region.width, region.height)
}

fn region_color(name: RegionName) -> Color {
    match name {
        RegionName::TopHud => Color::from_hex(0x4fc3f7),
        RegionName::PlayArea => Color::GREEN,
        RegionName::ActionBar => Color::from_hex(0xffb74d),
        RegionName::SidePanel => Color::MAGENTA,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::engine::compute_layout;
    use lode_platform::SafeInsets;
    use lode_scene::Scene;

    #[test]
    fn test_markers_follow_layout() {
        let scene = Scene::shared();
        let mut overlay = DebugOverlay::attach(scene.clone()).unwrap();
        let config = LayoutConfig::default();

        let desktop = compute_layout(1280.0, 720.0, SafeInsets::ZERO, &config);
        overlay.refresh(&desktop).unwrap();
        assert_eq!(overlay.marker_count(), 4);
        assert_eq!(scene.borrow().primitive_count(), 8);

        let play = desktop.region(RegionName::PlayArea).unwrap();
        {
            let s = scene.borrow();
            let marker_node = s.find_child(overlay.node(), "play-area").unwrap();
            assert_eq!(s.node(marker_node).unwrap().position, Point::new(play.x, play.y));
            let outline = s.node(marker_node).unwrap().primitives()[0];
            assert_eq!(
                s.primitive(outline).unwrap().size,
                Some(Size::new(play.width, play.height))
            );
        }

        let phone = compute_layout(375.0, 812.0, SafeInsets::ZERO, &config);
        overlay.refresh(&phone).unwrap();
        assert_eq!(overlay.marker_count(), 3);
        assert_eq!(scene.borrow().primitive_count(), 6);
        assert!(scene
            .borrow()
            .find_child(overlay.node(), "side-panel")
            .is_none());

        overlay.remove().unwrap();
        assert_eq!(scene.borrow().primitive_count(), 0);
        assert_eq!(scene.borrow().node_count(), 1);
    }

    #[test]
    fn test_label_text() {
        let region = Region::new(lode_core::Rect::new(0.0, 0.0, 343.4, 73.6), Anchor::TopCenter);
        assert_eq!(label_text(RegionName::TopHud, &region), "top-hud 343x74");
    }
}
