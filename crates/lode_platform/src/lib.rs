//! Lode Platform Boundary
//!
//! Everything the core needs from the host shell, expressed as small traits
//! and value types:
//!
//! - [`InsetProvider`] / [`read_safe_insets`] - safe-display-area insets
//! - [`ViewportEvent`] / [`Orientation`] - resize and rotation signals
//! - [`AssetResolver`] / [`AssetManifest`] - source name to asset path mapping
//!
//! # Example
//!
//! ```rust
//! use lode_platform::{read_safe_insets, SafeInsets, StaticInsets, UnsupportedPlatform};
//!
//! let notch = StaticInsets(SafeInsets::new(44.0, 0.0, 34.0, 0.0));
//! assert_eq!(read_safe_insets(&notch).top, 44.0);
//!
//! // Unsupported hosts degrade to zero instead of failing
//! assert!(read_safe_insets(&UnsupportedPlatform).is_zero());
//! ```

mod assets;
mod error;
mod event;
mod insets;

pub use assets::{AssetManifest, AssetResolver, IdentityResolver};
pub use error::{PlatformError, Result};
pub use event::{Orientation, ViewportChange, ViewportEvent};
pub use insets::{
    parse_css_length, read_safe_insets, CssEnvInsets, InsetProvider, SafeInsets, SharedInsets,
    StaticInsets, UnsupportedPlatform, CSS_INSET_PROPERTIES,
};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::assets::{AssetResolver, IdentityResolver};
    pub use crate::event::{Orientation, ViewportEvent};
    pub use crate::insets::{read_safe_insets, InsetProvider, SafeInsets};
}
