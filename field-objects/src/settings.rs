//! Catalog query settings consumed by the selection filters.
//!
//! Magnitude limits are offsets from a nominal (expected target) magnitude.
//! Each side of the range can be switched off on its own with
//! [`MagLimit::Disabled`].
//!
//! Settings persist as pretty-printed JSON:
//!
//! ```json
//! {
//!   "apply_limits": true,
//!   "nominal_mag": 12.0,
//!   "upper_limit": { "offset": 1.0 },
//!   "lower_limit": "disabled",
//!   "min_observations": 2
//! }
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::CatalogError;

/// One side of the magnitude window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagLimit {
    /// No limit on this side
    Disabled,
    /// Limit at `nominal_mag + offset`
    Offset(f64),
}

impl MagLimit {
    pub fn is_disabled(&self) -> bool {
        matches!(self, MagLimit::Disabled)
    }

    /// Absolute magnitude of this limit around `nominal_mag`
    pub fn resolve(&self, nominal_mag: f64) -> Option<f64> {
        match self {
            MagLimit::Disabled => None,
            MagLimit::Offset(offset) => Some(nominal_mag + offset),
        }
    }
}

/// Selection settings for one catalog query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSettings {
    /// Whether the magnitude limits filter is active at all
    pub apply_limits: bool,
    /// Expected target magnitude in the current band
    pub nominal_mag: f64,
    /// Faint-side limit (numerically larger magnitudes)
    pub upper_limit: MagLimit,
    /// Bright-side limit (numerically smaller magnitudes)
    pub lower_limit: MagLimit,
    /// Minimum number of catalog observations for a star to be kept
    pub min_observations: u32,
}

impl CatalogSettings {
    pub fn is_upper_limit_disabled(&self) -> bool {
        self.upper_limit.is_disabled()
    }

    pub fn is_lower_limit_disabled(&self) -> bool {
        self.lower_limit.is_disabled()
    }

    /// Faintest accepted magnitude, or `None` when that side is disabled
    pub fn upper_mag_range(&self) -> Option<f64> {
        self.upper_limit.resolve(self.nominal_mag)
    }

    /// Brightest accepted magnitude, or `None` when that side is disabled
    pub fn lower_mag_range(&self) -> Option<f64> {
        self.lower_limit.resolve(self.nominal_mag)
    }

    /// Check `mag` against the enabled sides of the window (bounds inclusive).
    ///
    /// Ignores `apply_limits`; the collection decides whether to consult
    /// this at all.
    pub fn accepts_mag(&self, mag: f64) -> bool {
        let below_upper = self.upper_mag_range().is_none_or(|upper| mag <= upper);
        let above_lower = self.lower_mag_range().is_none_or(|lower| mag >= lower);
        below_upper && above_lower
    }

    /// Save to JSON file
    pub fn save_to_file(&self, path: &Path) -> Result<(), CatalogError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from JSON file. Missing keys take their default values.
    pub fn load_from_file(path: &Path) -> Result<Self, CatalogError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Default for CatalogSettings {
    fn default() -> Self {
        Self {
            apply_limits: false,
            nominal_mag: 12.0,
            upper_limit: MagLimit::Disabled,
            lower_limit: MagLimit::Disabled,
            min_observations: 1,
        }
    }
}
