//! Asset path mapping
//!
//! Game code refers to textures by their source names (`"icons/pickaxe.svg"`).
//! The build pipeline fingerprints and relocates those files, publishing a
//! manifest that maps each source name to its final location. An
//! [`AssetResolver`] performs that mapping; everything downstream treats the
//! resolved string as an opaque loadable path.
//!
//! Manifest format:
//!
//! ```json
//! {
//!   "base": "assets/",
//!   "assets": { "icons/pickaxe.svg": "pickaxe.3f2a91.svg" }
//! }
//! ```

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::error::{PlatformError, Result};

/// Maps source asset names to loadable paths
pub trait AssetResolver {
    fn resolve(&self, source: &str) -> String;
}

/// Resolver that returns paths unchanged
#[derive(Clone, Copy, Debug, Default)]
pub struct IdentityResolver;

impl AssetResolver for IdentityResolver {
    fn resolve(&self, source: &str) -> String {
        source.to_string()
    }
}

/// Build-time asset manifest
#[derive(Clone, Debug, Default, Deserialize)]
pub struct AssetManifest {
    /// Prefix joined onto every mapped entry
    #[serde(default)]
    base: Option<String>,
    #[serde(default)]
    assets: FxHashMap<String, String>,
}

impl AssetManifest {
    /// Parse a JSON manifest
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| PlatformError::Manifest(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl AssetResolver for AssetManifest {
    /// Unknown names pass through unchanged so hand-placed assets still load
    fn resolve(&self, source: &str) -> String {
        match (self.assets.get(source), &self.base) {
            (Some(mapped), Some(base)) => {
                format!("{}/{}", base.trim_end_matches('/'), mapped)
            }
            (Some(mapped), None) => mapped.clone(),
            (None, _) => source.to_string(),
        }
    }
}
