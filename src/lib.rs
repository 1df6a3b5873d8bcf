//! Waffle Rain - a decorative field of falling, spinning sprites
//!
//! Core modules:
//! - `sim`: Sprite lifecycle, non-overlapping placement, per-frame tick
//! - `renderer`: Render surface abstraction (2D canvas on the web, headless natively)
//! - `settings`: User preferences and the simulator config derived from them
//! - `error`: Browser setup errors

pub mod error;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use error::SetupError;
pub use settings::{Density, Settings};

use std::f32::consts::TAU;

/// Field configuration constants
pub mod consts {
    /// Placement candidates sampled before an overlapping one is accepted
    pub const PLACEMENT_ATTEMPTS: u32 = 100;
    /// Fallback sprite size when the field has no usable area
    pub const MIN_SPRITE_SIZE: f32 = 1.0;

    /// Field defaults
    pub const DEFAULT_MAX_SPRITES: usize = 20;
    pub const DEFAULT_FALL_SPEED: f32 = 2.0; // pixels per tick
    pub const DEFAULT_SPIN_PER_TICK: f32 = 0.01; // radians per tick
    pub const DEFAULT_SIZE_DIVISOR: f32 = 15.0;
    pub const DEFAULT_SIZE_JITTER: f32 = 0.5; // fraction of base size
    pub const DEFAULT_SIZE_MULTIPLIER: f32 = 3.0;
    /// Spawn band height in sprite sizes above the top edge
    pub const DEFAULT_STAGGER_ROWS: f32 = 10.0;
    /// Random delay between timed spawns (ms)
    pub const SPAWN_INTERVAL_MIN_MS: f64 = 100.0;
    pub const SPAWN_INTERVAL_MAX_MS: f64 = 500.0;

    /// Headless runner clock (60 Hz)
    pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
}

/// Wrap an angle into [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU { 0.0 } else { wrapped }
}

/// True when both dimensions describe a drawable area
#[inline]
pub fn is_drawable(width: f32, height: f32) -> bool {
    width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(TAU + 0.5) - 0.5).abs() < 1e-5);
        assert!((wrap_angle(-0.5) - (TAU - 0.5)).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        assert!(wrap_angle(-1e-9) < TAU);
    }

    #[test]
    fn test_is_drawable() {
        assert!(is_drawable(800.0, 600.0));
        assert!(!is_drawable(0.0, 600.0));
        assert!(!is_drawable(800.0, -1.0));
        assert!(!is_drawable(f32::NAN, 600.0));
        assert!(!is_drawable(f32::INFINITY, 600.0));
    }
}
