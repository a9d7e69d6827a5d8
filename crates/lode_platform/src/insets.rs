//! Safe-display-area insets
//!
//! Hosts report how many pixels of each viewport edge are occluded by system
//! UI (camera notch, status bar, home indicator, rounded corners). The values
//! arrive through an [`InsetProvider`]; [`read_safe_insets`] is the single
//! entry point the layout path uses and it never fails.
//!
//! # Limitation
//!
//! Web-style hosts resolve `env(safe-area-inset-*)` lazily and report `0`
//! until the page has settled. An all-zero result therefore means either "no
//! occlusion" or "not ready yet"; this module does not try to tell the two
//! apart. Hosts that care should trigger another recompute once their UI has
//! settled.

use std::cell::Cell;
use std::rc::Rc;

use crate::error::{PlatformError, Result};

/// Insets from each viewport edge, in logical pixels
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct SafeInsets {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl SafeInsets {
    pub const ZERO: SafeInsets = SafeInsets {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub const fn uniform(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    /// Replace negative and non-finite values with zero
    pub fn sanitized(self) -> Self {
        fn clean(v: f32) -> f32 {
            if v.is_finite() && v > 0.0 {
                v
            } else {
                0.0
            }
        }
        Self {
            top: clean(self.top),
            right: clean(self.right),
            bottom: clean(self.bottom),
            left: clean(self.left),
        }
    }

    /// True when every edge reports zero
    ///
    /// See the module docs: this cannot distinguish "no occlusion" from
    /// "host not ready".
    pub fn is_zero(&self) -> bool {
        self.top == 0.0 && self.right == 0.0 && self.bottom == 0.0 && self.left == 0.0
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }
}

// =============================================================================
// PROVIDERS
// =============================================================================

/// Source of raw inset values
///
/// Queries are synchronous and side-effect free. Returning an error is the
/// provider's way of saying the platform cannot answer; callers degrade to
/// zero insets.
pub trait InsetProvider {
    fn query(&self) -> Result<SafeInsets>;
}

/// Fixed insets, for desktop hosts and tests
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StaticInsets(pub SafeInsets);

impl InsetProvider for StaticInsets {
    fn query(&self) -> Result<SafeInsets> {
        Ok(self.0)
    }
}

/// Insets pushed by the host into a shared cell
///
/// Clones share the same cell, so the host keeps one handle to update and the
/// layout controller keeps another to read.
#[derive(Clone, Debug, Default)]
pub struct SharedInsets {
    cell: Rc<Cell<SafeInsets>>,
}

impl SharedInsets {
    pub fn new(initial: SafeInsets) -> Self {
        Self {
            cell: Rc::new(Cell::new(initial)),
        }
    }

    pub fn set(&self, insets: SafeInsets) {
        self.cell.set(insets);
    }

    pub fn get(&self) -> SafeInsets {
        self.cell.get()
    }
}

impl InsetProvider for SharedInsets {
    fn query(&self) -> Result<SafeInsets> {
        Ok(self.cell.get())
    }
}

/// Provider for hosts without any notion of safe areas
#[derive(Clone, Copy, Debug, Default)]
pub struct UnsupportedPlatform;

impl InsetProvider for UnsupportedPlatform {
    fn query(&self) -> Result<SafeInsets> {
        Err(PlatformError::Unsupported(
            "host does not report safe-area insets".to_string(),
        ))
    }
}

/// Custom properties a web shell publishes from `env(safe-area-inset-*)`
pub const CSS_INSET_PROPERTIES: [&str; 4] = [
    "--safe-area-inset-top",
    "--safe-area-inset-right",
    "--safe-area-inset-bottom",
    "--safe-area-inset-left",
];

/// Insets read from CSS custom properties
///
/// `lookup` returns the computed value of a property (e.g. `"44px"`), or
/// `None` when the property is not defined at all. When none of the four
/// properties exist the platform is treated as unsupported. An edge whose
/// value cannot be parsed reads as zero; the other edges are kept.
pub struct CssEnvInsets<F>
where
    F: Fn(&str) -> Option<String>,
{
    lookup: F,
}

impl<F> CssEnvInsets<F>
where
    F: Fn(&str) -> Option<String>,
{
    pub fn new(lookup: F) -> Self {
        Self { lookup }
    }
}

impl<F> InsetProvider for CssEnvInsets<F>
where
    F: Fn(&str) -> Option<String>,
{
    fn query(&self) -> Result<SafeInsets> {
        let mut values = [0.0f32; 4];
        let mut defined = 0;

        for (slot, property) in values.iter_mut().zip(CSS_INSET_PROPERTIES) {
            if let Some(raw) = (self.lookup)(property) {
                defined += 1;
                *slot = match parse_css_length(property, &raw) {
                    Ok(v) => v,
                    Err(err) => {
                        tracing::warn!(property, error = %err, "unreadable safe-area inset, using zero");
                        0.0
                    }
                };
            }
        }

        if defined == 0 {
            return Err(PlatformError::Unsupported(
                "safe-area custom properties are not defined".to_string(),
            ));
        }

        let [top, right, bottom, left] = values;
        Ok(SafeInsets::new(top, right, bottom, left))
    }
}

/// Parse a computed CSS length such as `"44px"` or `"0"`
///
/// Empty strings and unresolved `env(...)` expressions read as zero: that is
/// what hosts report before layout has settled.
pub fn parse_css_length(property: &str, raw: &str) -> Result<f32> {
    let value = raw.trim();
    if value.is_empty() || value.starts_with("env(") {
        return Ok(0.0);
    }

    let number = value.strip_suffix("px").unwrap_or(value).trim();
    match number.parse::<f32>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(PlatformError::InvalidValue {
            property: property.to_string(),
            value: raw.to_string(),
        }),
    }
}

// =============================================================================
// READER
// =============================================================================

/// Read the current safe-area insets
///
/// Never fails. Provider errors and negative or non-finite values degrade to
/// zero so layout can always proceed.
pub fn read_safe_insets(provider: &dyn InsetProvider) -> SafeInsets {
    match provider.query() {
        Ok(insets) => insets.sanitized(),
        Err(err) => {
            tracing::debug!(error = %err, "safe-area insets unavailable, using zero");
            SafeInsets::ZERO
        }
    }
}
