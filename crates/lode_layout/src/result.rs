//! Layout output types

use std::collections::BTreeMap;
use std::fmt;

use lode_core::{Anchor, Point, Rect};
use lode_platform::Orientation;
use serde::{Deserialize, Serialize};

/// Coarse device bucket selecting a region profile
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeviceClass {
    Mobile,
    Desktop,
}

/// Named UI regions
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionName {
    TopHud,
    PlayArea,
    ActionBar,
    SidePanel,
}

impl RegionName {
    pub const ALL: [RegionName; 4] = [
        RegionName::TopHud,
        RegionName::PlayArea,
        RegionName::ActionBar,
        RegionName::SidePanel,
    ];

    /// Anchor UI code uses to position content inside the region
    pub const fn anchor(self) -> Anchor {
        match self {
            RegionName::TopHud => Anchor::TopCenter,
            RegionName::PlayArea => Anchor::Center,
            RegionName::ActionBar => Anchor::BottomCenter,
            RegionName::SidePanel => Anchor::TopRight,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RegionName::TopHud => "top-hud",
            RegionName::PlayArea => "play-area",
            RegionName::ActionBar => "action-bar",
            RegionName::SidePanel => "side-panel",
        }
    }
}

impl fmt::Display for RegionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A rectangular area of the safe content rect
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Region {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub anchor: Anchor,
}

impl Region {
    pub fn new(rect: Rect, anchor: Anchor) -> Self {
        Self {
            x: rect.x(),
            y: rect.y(),
            width: rect.width(),
            height: rect.height(),
            anchor,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Position of the region's anchor in viewport coordinates
    pub fn anchor_point(&self) -> Point {
        self.rect().anchor_point(self.anchor)
    }
}

/// Output of one layout pass
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutResult {
    pub regions: BTreeMap<RegionName, Region>,
    pub device_class: DeviceClass,
    pub orientation: Orientation,
    pub viewport: Rect,
    /// Viewport minus the platform insets
    pub safe_area: Rect,
}

impl LayoutResult {
    pub fn region(&self, name: RegionName) -> Option<&Region> {
        self.regions.get(&name)
    }

    pub fn is_mobile(&self) -> bool {
        self.device_class == DeviceClass::Mobile
    }

    /// Regions in a stable order
    pub fn iter(&self) -> impl Iterator<Item = (RegionName, &Region)> {
        self.regions.iter().map(|(name, region)| (*name, region))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_anchor_point() {
        let region = Region::new(Rect::new(10.0, 20.0, 100.0, 40.0), Anchor::BottomCenter);
        assert_eq!(region.anchor_point(), Point::new(60.0, 60.0));
        assert_eq!(region.rect(), Rect::new(10.0, 20.0, 100.0, 40.0));
    }

    #[test]
    fn test_region_names() {
        assert_eq!(RegionName::TopHud.to_string(), "top-hud");
        assert_eq!(RegionName::SidePanel.anchor(), Anchor::TopRight);
        assert!(RegionName::TopHud < RegionName::SidePanel);
    }
}
