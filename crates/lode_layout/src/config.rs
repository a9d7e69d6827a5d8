//! Layout configuration
//!
//! Loaded from TOML at startup. Every field has a default, so an empty file
//! (or no file) gives the stock mobile/desktop profiles.
//!
//! ```toml
//! mobile_breakpoint = 768.0
//! min_region_size = 24.0
//!
//! [desktop]
//! hud_fraction = 0.08
//! action_bar_fraction = 0.1
//! side_panel_fraction = 0.25
//! margin = 16.0
//! gap = 8.0
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::result::DeviceClass;

/// Errors loading a layout configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read layout config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse layout config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid layout config value for `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Proportions used to split the safe area for one device class
///
/// Fractions are of the content rect (safe area minus margin): the HUD and
/// action bar take a share of its height, the side panel a share of its width.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RegionProfile {
    pub hud_fraction: f32,
    pub action_bar_fraction: f32,
    /// `0.0` disables the side panel
    pub side_panel_fraction: f32,
    /// Space kept between the safe area edges and the regions
    pub margin: f32,
    /// Space between adjacent regions
    pub gap: f32,
}

impl RegionProfile {
    pub fn mobile() -> Self {
        Self {
            hud_fraction: 0.1,
            action_bar_fraction: 0.14,
            side_panel_fraction: 0.0,
            margin: 8.0,
            gap: 4.0,
        }
    }

    pub fn desktop() -> Self {
        Self {
            hud_fraction: 0.08,
            action_bar_fraction: 0.1,
            side_panel_fraction: 0.22,
            margin: 16.0,
            gap: 8.0,
        }
    }

    fn validate(&self, name: &str) -> Result<(), ConfigError> {
        let fractions = [
            ("hud_fraction", self.hud_fraction),
            ("action_bar_fraction", self.action_bar_fraction),
            ("side_panel_fraction", self.side_panel_fraction),
        ];
        for (field, value) in fractions {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::invalid(
                    format!("{name}.{field}"),
                    format!("{value} is outside 0.0..1.0"),
                ));
            }
        }
        if self.hud_fraction + self.action_bar_fraction >= 1.0 {
            return Err(ConfigError::invalid(
                name,
                "hud and action bar leave no room for the play area",
            ));
        }
        for (field, value) in [("margin", self.margin), ("gap", self.gap)] {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::invalid(
                    format!("{name}.{field}"),
                    format!("{value} must be a non-negative number"),
                ));
            }
        }
        Ok(())
    }
}

/// Layout engine configuration
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewports narrower than this (logical px) use the mobile profile
    pub mobile_breakpoint: f32,
    /// Smallest width/height a region is given while space allows
    pub min_region_size: f32,
    pub mobile: RegionProfile,
    pub desktop: RegionProfile,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            mobile_breakpoint: 768.0,
            min_region_size: 24.0,
            mobile: RegionProfile::mobile(),
            desktop: RegionProfile::desktop(),
        }
    }
}

impl LayoutConfig {
    /// Parse and validate a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: LayoutConfig = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.mobile_breakpoint.is_finite() || self.mobile_breakpoint <= 0.0 {
            return Err(ConfigError::invalid(
                "mobile_breakpoint",
                format!("{} must be a positive number", self.mobile_breakpoint),
            ));
        }
        if !self.min_region_size.is_finite() || self.min_region_size < 0.0 {
            return Err(ConfigError::invalid(
                "min_region_size",
                format!("{} must be a non-negative number", self.min_region_size),
            ));
        }
        self.mobile.validate("mobile")?;
        self.desktop.validate("desktop")
    }

    /// Profile for a device class
    pub fn profile(&self, class: DeviceClass) -> &RegionProfile {
        match class {
            DeviceClass::Mobile => &self.mobile,
            DeviceClass::Desktop => &self.desktop,
        }
    }

    /// Device class for a viewport width
    pub fn classify(&self, width: f32) -> DeviceClass {
        if width < self.mobile_breakpoint {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(LayoutConfig::default().validate().is_ok());
    }

    #[test]
    fn test_empty_toml_gives_defaults() {
        let config = LayoutConfig::from_toml_str("").unwrap();
        assert_eq!(config, LayoutConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = LayoutConfig::from_toml_str(
            r#"
            mobile_breakpoint = 600.0

            [mobile]
            hud_fraction = 0.12
            action_bar_fraction = 0.12
            side_panel_fraction = 0.0
            margin = 4.0
            gap = 2.0
            "#,
        )
        .unwrap();

        assert_eq!(config.mobile_breakpoint, 600.0);
        assert_eq!(config.mobile.hud_fraction, 0.12);
        assert_eq!(config.desktop, RegionProfile::desktop());
        assert_eq!(config.min_region_size, 24.0);
    }

    #[test]
    fn test_rejects_bad_values() {
        let err = LayoutConfig::from_toml_str("mobile_breakpoint = -1.0").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "mobile_breakpoint"));

        let mut config = LayoutConfig::default();
        config.desktop.hud_fraction = 0.6;
        config.desktop.action_bar_fraction = 0.5;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid { .. })));

        config = LayoutConfig::default();
        config.mobile.gap = f32::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_parse_error() {
        let err = LayoutConfig::from_toml_str("mobile_breakpoint = \"wide\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let path = std::env::temp_dir().join(format!("lode-layout-{}.toml", std::process::id()));
        std::fs::write(&path, "min_region_size = 40.0\n").unwrap();
        let config = LayoutConfig::from_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(config.min_region_size, 40.0);

        assert!(matches!(
            LayoutConfig::from_file(path.with_extension("missing")),
            Err(ConfigError::Io(_))
        ));
    }

    #[test]
    fn test_classify() {
        let config = LayoutConfig::default();
        assert_eq!(config.classify(375.0), DeviceClass::Mobile);
        assert_eq!(config.classify(768.0), DeviceClass::Desktop);
    }
}
