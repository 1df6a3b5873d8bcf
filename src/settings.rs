//! User settings and preferences
//!
//! Persisted in LocalStorage. The simulator config is derived from these
//! rather than stored, so tuning changes apply to old saves too.

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_FALL_SPEED, DEFAULT_MAX_SPRITES, DEFAULT_SPIN_PER_TICK};
use crate::sim::FieldConfig;

/// How crowded the field gets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Density {
    Sparse,
    #[default]
    Normal,
    Dense,
}

impl Density {
    /// Display name, used in startup logs
    pub fn as_str(&self) -> &'static str {
        match self {
            Density::Sparse => "Sparse",
            Density::Normal => "Normal",
            Density::Dense => "Dense",
        }
    }

    /// Population cap for this density
    pub fn max_sprites(&self) -> usize {
        match self {
            Density::Sparse => DEFAULT_MAX_SPRITES / 2,
            Density::Normal => DEFAULT_MAX_SPRITES,
            Density::Dense => DEFAULT_MAX_SPRITES * 3 / 2,
        }
    }
}

/// Display preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Population preset
    pub density: Density,
    /// Slower fall and spin
    #[serde(default)]
    pub reduced_motion: bool,
    /// Canvas width as a multiple of the window width.
    /// Values above 1 let sprites drift in past the right edge.
    pub width_scale: f32,
    /// Image drawn for every sprite
    pub sprite_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            density: Density::Normal,
            reduced_motion: false,
            width_scale: 1.2,
            sprite_url: "waffle.png".to_string(),
        }
    }
}

impl Settings {
    /// Simulator config for these preferences
    pub fn to_field_config(&self) -> FieldConfig {
        let max_sprites = self.density.max_sprites();
        let motion = if self.reduced_motion { 0.5 } else { 1.0 };

        FieldConfig {
            max_sprites,
            initial_sprites: max_sprites / 2,
            fall_speed: DEFAULT_FALL_SPEED * motion,
            spin_per_tick: DEFAULT_SPIN_PER_TICK * motion,
            ..FieldConfig::default()
        }
    }

    /// Canvas backing size for a window of the given inner size
    pub fn canvas_size(&self, inner_width: f64, inner_height: f64) -> (u32, u32) {
        let scale = if self.width_scale.is_finite() && self.width_scale > 0.0 {
            self.width_scale as f64
        } else {
            1.0
        };
        let width = (inner_width * scale).round().max(0.0) as u32;
        let height = inner_height.round().max(0.0) as u32;
        (width, height)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "waffle_rain_settings";

    /// Read preferences from LocalStorage, falling back to defaults
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let stored = local_storage().and_then(|s| s.get_item(Self::STORAGE_KEY).ok().flatten());
        let Some(json) = stored else {
            log::info!("No settings under '{}', using defaults", Self::STORAGE_KEY);
            return Self::default();
        };

        Self::from_json(&json).unwrap_or_else(|e| {
            log::warn!(
                "Settings under '{}' unreadable ({}), using defaults",
                Self::STORAGE_KEY,
                e
            );
            Self::default()
        })
    }

    /// Write preferences to LocalStorage
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let Some(storage) = local_storage() else {
            log::warn!("LocalStorage unavailable, settings not saved");
            return;
        };

        match serde_json::to_string(self) {
            Ok(json) => match storage.set_item(Self::STORAGE_KEY, &json) {
                Ok(()) => log::debug!("Saved settings under '{}'", Self::STORAGE_KEY),
                Err(e) => log::warn!("Saving settings failed: {:?}", e),
            },
            Err(e) => log::warn!("Serializing settings failed: {}", e),
        }
    }

    /// Parse a stored settings payload
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Native runs have no storage
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {}
}

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}
