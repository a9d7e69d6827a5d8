//! Lode Layout
//!
//! Safe-area aware responsive layout:
//!
//! - [`compute_layout`] - pure partition of the safe area into named regions
//! - [`LayoutConfig`] - breakpoint, minimum sizes and per-device proportions
//! - [`LayoutStore`] / [`LayoutState`] - reactive snapshot readers subscribe to
//! - [`LayoutController`] - viewport events → insets → layout → store
//! - [`DebugOverlay`] - region outlines drawn into the scene
//!
//! # Example
//!
//! ```rust
//! use lode_layout::{compute_layout, DeviceClass, LayoutConfig};
//! use lode_platform::SafeInsets;
//!
//! let insets = SafeInsets::new(40.0, 0.0, 20.0, 0.0);
//! let layout = compute_layout(375.0, 812.0, insets, &LayoutConfig::default());
//! assert_eq!(layout.device_class, DeviceClass::Mobile);
//! assert_eq!(layout.safe_area.height(), 752.0);
//! ```

mod config;
mod controller;
mod debug;
mod engine;
mod result;
mod store;

pub use config::{ConfigError, LayoutConfig, RegionProfile};
pub use controller::LayoutController;
pub use debug::DebugOverlay;
pub use engine::compute_layout;
pub use result::{DeviceClass, LayoutResult, Region, RegionName};
pub use store::{LayoutState, LayoutStore};
