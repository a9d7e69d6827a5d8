//! Region partitioning
//!
//! [`compute_layout`] is a pure function of the viewport size, the platform
//! insets and the configuration. It has no error path: bad inputs are
//! clamped, never rejected.
//!
//! ```text
//! ┌───────────── viewport ─────────────┐
//! │  inset top                         │
//! │ ┌────────── safe area ───────────┐ │
//! │ │ margin                         │ │
//! │ │ ┌────────── TopHud ──────────┐ │ │
//! │ │ └────────────────────────────┘ │ │
//! │ │ ┌─ PlayArea ──────┐ ┌ Side ──┐ │ │
//! │ │ │                 │ │ Panel  │ │ │
//! │ │ └─────────────────┘ └────────┘ │ │
//! │ │ ┌───────── ActionBar ────────┐ │ │
//! │ │ └────────────────────────────┘ │ │
//! │ └────────────────────────────────┘ │
//! └────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use lode_core::Rect;
use lode_platform::{Orientation, SafeInsets};

use crate::config::{LayoutConfig, RegionProfile};
use crate::result::{LayoutResult, Region, RegionName};

/// Compute the layout for a viewport
///
/// Deterministic: identical inputs give equal results. Every region lies
/// inside the safe area and no two regions overlap. When the safe area cannot
/// hold every region at the configured minimum size, the regions and gaps
/// shrink proportionally (down to zero area) instead of overlapping or
/// spilling into the insets.
pub fn compute_layout(
    width: f32,
    height: f32,
    insets: SafeInsets,
    config: &LayoutConfig,
) -> LayoutResult {
    let width = non_negative(width);
    let height = non_negative(height);
    let viewport = Rect::new(0.0, 0.0, width, height);

    let insets = insets.sanitized();
    let safe_area = viewport.inset_edges(insets.top, insets.right, insets.bottom, insets.left);

    let device_class = config.classify(width);
    let profile = config.profile(device_class);
    let regions = partition(safe_area, profile, non_negative(config.min_region_size));

    LayoutResult {
        regions,
        device_class,
        orientation: Orientation::from_size(width, height),
        viewport,
        safe_area,
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

/// Clamp an extent to at least `min`, but never beyond `available`
fn clamp_extent(value: f32, min: f32, available: f32) -> f32 {
    value.max(min).min(available).max(0.0)
}

/// Shrink a row of extents and the gaps between them so they fit `available`
///
/// Extents that already fit are returned unchanged. Otherwise every extent and
/// gap is scaled by the same factor, so the row fills `available` exactly and
/// neighbours never overlap.
fn fit_extents<const N: usize>(mut extents: [f32; N], gap: f32, available: f32) -> ([f32; N], f32) {
    let gaps = gap * N.saturating_sub(1) as f32;
    let total = extents.iter().sum::<f32>() + gaps;
    if total <= available || total <= 0.0 {
        return (extents, gap);
    }
    let scale = available / total;
    for extent in &mut extents {
        *extent *= scale;
    }
    (extents, gap * scale)
}

fn partition(safe: Rect, profile: &RegionProfile, min: f32) -> BTreeMap<RegionName, Region> {
    let margin = non_negative(profile.margin);
    let gap = non_negative(profile.gap);
    let content = safe.inset(margin, margin);
    let (x, y, w, h) = (content.x(), content.y(), content.width(), content.height());

    // Vertical band: HUD, middle, action bar
    let hud_h = clamp_extent(h * profile.hud_fraction, min, h);
    let bar_h = clamp_extent(h * profile.action_bar_fraction, min, h);
    let middle_h = clamp_extent(h - hud_h - bar_h - 2.0 * gap, min, h);
    let ([hud_h, middle_h, bar_h], v_gap) = fit_extents([hud_h, middle_h, bar_h], gap, h);
    let middle_y = y + hud_h + v_gap;

    let mut regions = BTreeMap::new();
    let mut put = |name: RegionName, rect: Rect| {
        regions.insert(name, Region::new(rect, name.anchor()));
    };

    put(RegionName::TopHud, Rect::new(x, y, w, hud_h));
    put(RegionName::ActionBar, Rect::new(x, y + h - bar_h, w, bar_h));

    if profile.side_panel_fraction > 0.0 {
        let side_w = clamp_extent(w * profile.side_panel_fraction, min, w);
        let play_w = clamp_extent(w - side_w - gap, min, w);
        let ([play_w, side_w], _) = fit_extents([play_w, side_w], gap, w);
        put(
            RegionName::SidePanel,
            Rect::new(x + w - side_w, middle_y, side_w, middle_h),
        );
        put(RegionName::PlayArea, Rect::new(x, middle_y, play_w, middle_h));
    } else {
        put(RegionName::PlayArea, Rect::new(x, middle_y, w, middle_h));
    }

    regions
}
