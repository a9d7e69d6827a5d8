//! Lode Core
//!
//! Foundational types shared by every Lode crate:
//!
//! - **Geometry**: `Point`, `Size`, `Rect`, `Color` and the fixed `Anchor` set
//! - **Logging**: the injected [`LogSink`] collaborator plus `tracing` setup
//! - **Store**: a single-value reactive [`Store`] with ordered subscribers
//!
//! # Example
//!
//! ```rust
//! use lode_core::{Anchor, Rect};
//!
//! let viewport = Rect::new(0.0, 0.0, 375.0, 812.0);
//! let safe = viewport.inset_edges(40.0, 0.0, 20.0, 0.0);
//! assert_eq!(safe.height(), 752.0);
//! assert_eq!(safe.anchor_point(Anchor::TopLeft).y, 40.0);
//! ```

pub mod geometry;
pub mod logging;
pub mod store;

pub use geometry::{Anchor, Color, Point, Rect, Size};
pub use logging::{
    init_tracing, LogContext, LogLevel, LogRecord, LogSink, RecordingSink, TracingSink,
};
pub use store::{Store, SubscriptionHandle};
