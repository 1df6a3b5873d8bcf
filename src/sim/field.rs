//! Field state: the live sprite collection and its spawn clock
//!
//! All mutable simulation state is owned here so the tick can run against a
//! plain value in tests, with no canvas around.

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::placement::{compute_sprite_size, find_non_overlapping_placement};
use super::sprite::Sprite;
use crate::consts::*;
use crate::is_drawable;

/// Simulator tunables
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldConfig {
    /// Population cap
    pub max_sprites: usize,
    /// Sprites created by a reseed (clamped to `max_sprites`)
    pub initial_sprites: usize,
    /// Fall speed in pixels per tick
    pub fall_speed: f32,
    /// Rotation per tick in radians
    pub spin_per_tick: f32,
    /// Base size is `min(width, height) / size_divisor`
    pub size_divisor: f32,
    /// Random extra size as a fraction of the base
    pub size_jitter: f32,
    /// Final size multiplier
    pub size_multiplier: f32,
    /// Spawn band height in sprite sizes
    pub stagger_rows: f32,
    /// Timed spawn delay range in ms, inclusive
    pub spawn_interval_ms: (f64, f64),
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            max_sprites: DEFAULT_MAX_SPRITES,
            initial_sprites: DEFAULT_MAX_SPRITES / 2,
            fall_speed: DEFAULT_FALL_SPEED,
            spin_per_tick: DEFAULT_SPIN_PER_TICK,
            size_divisor: DEFAULT_SIZE_DIVISOR,
            size_jitter: DEFAULT_SIZE_JITTER,
            size_multiplier: DEFAULT_SIZE_MULTIPLIER,
            stagger_rows: DEFAULT_STAGGER_ROWS,
            spawn_interval_ms: (SPAWN_INTERVAL_MIN_MS, SPAWN_INTERVAL_MAX_MS),
        }
    }
}

impl FieldConfig {
    /// Replace unusable tunables with their defaults.
    ///
    /// Fall speed, size divisor and size multiplier must be finite and
    /// positive. Jitter, stagger and spin must be finite and non-negative. The
    /// spawn interval must be a finite, non-negative, ordered range.
    pub fn sanitized(self) -> Self {
        let defaults = Self::default();

        let (lo, hi) = self.spawn_interval_ms;
        let spawn_interval_ms = if lo.is_finite() && hi.is_finite() && lo >= 0.0 && lo <= hi {
            (lo, hi)
        } else {
            log::warn!(
                "spawn_interval_ms ({}, {}) unusable, using ({}, {})",
                lo,
                hi,
                defaults.spawn_interval_ms.0,
                defaults.spawn_interval_ms.1
            );
            defaults.spawn_interval_ms
        };

        Self {
            max_sprites: self.max_sprites,
            initial_sprites: self.initial_sprites,
            fall_speed: positive_or("fall_speed", self.fall_speed, defaults.fall_speed),
            spin_per_tick: non_negative_or(
                "spin_per_tick",
                self.spin_per_tick,
                defaults.spin_per_tick,
            ),
            size_divisor: positive_or("size_divisor", self.size_divisor, defaults.size_divisor),
            size_jitter: non_negative_or("size_jitter", self.size_jitter, defaults.size_jitter),
            size_multiplier: positive_or(
                "size_multiplier",
                self.size_multiplier,
                defaults.size_multiplier,
            ),
            stagger_rows: non_negative_or("stagger_rows", self.stagger_rows, defaults.stagger_rows),
            spawn_interval_ms,
        }
    }
}

fn positive_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        log::warn!("{} {} must be positive, using {}", name, value, fallback);
        fallback
    }
}

fn non_negative_or(name: &str, value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value >= 0.0 {
        value
    } else {
        log::warn!("{} {} must not be negative, using {}", name, value, fallback);
        fallback
    }
}

/// The simulated field
#[derive(Debug, Clone)]
pub struct Field {
    config: FieldConfig,
    width: f32,
    height: f32,
    /// Live sprites, in spawn order
    pub(super) sprites: Vec<Sprite>,
    rng: Pcg32,
    /// Frame clock time of the last timed spawn (ms)
    pub(super) last_spawn_ms: f64,
    /// Delay that must pass before the next timed spawn (ms)
    pub(super) spawn_interval_ms: f64,
}

impl Field {
    /// Create a field and seed it for the given dimensions.
    ///
    /// The config is sanitized first, so every live sprite falls and has a
    /// positive size.
    pub fn new(config: FieldConfig, width: f32, height: f32, seed: u64) -> Self {
        let mut field = Self {
            config: config.sanitized(),
            width,
            height,
            sprites: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            last_spawn_ms: 0.0,
            spawn_interval_ms: 0.0,
        };
        field.spawn_interval_ms = field.next_spawn_interval();
        field.reseed(width, height);
        field
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn width(&self) -> f32 {
        self.width
    }

    pub fn height(&self) -> f32 {
        self.height
    }

    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.sprites.len() >= self.config.max_sprites
    }

    /// Build a new sprite for the current dimensions without inserting it
    pub fn spawn_sprite(&mut self) -> Sprite {
        Self::spawn_against(
            &mut self.rng,
            &self.config,
            self.width,
            self.height,
            &self.sprites,
        )
    }

    /// Insert a sprite unless the field is full
    pub fn insert(&mut self, sprite: Sprite) -> bool {
        if self.is_full() {
            return false;
        }
        self.sprites.push(sprite);
        true
    }

    /// Replace the whole population with a fresh one for new dimensions.
    ///
    /// The new collection is built on the side and swapped in, so nothing
    /// from the previous dimensions survives. Degenerate dimensions leave the
    /// field empty.
    pub fn reseed(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;

        let mut fresh = Vec::with_capacity(self.config.max_sprites);
        if is_drawable(width, height) {
            let count = self.config.initial_sprites.min(self.config.max_sprites);
            for _ in 0..count {
                let sprite =
                    Self::spawn_against(&mut self.rng, &self.config, width, height, &fresh);
                fresh.push(sprite);
            }
        }
        self.sprites = fresh;

        log::info!(
            "Reseeded {:.0}x{:.0} field with {} sprites",
            width,
            height,
            self.sprites.len()
        );
    }

    /// Restart the spawn clock, e.g. when the frame loop resumes after a pause
    pub fn reset_spawn_clock(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
        self.spawn_interval_ms = self.next_spawn_interval();
    }

    /// True when a timed spawn is allowed at `now_ms`
    pub fn spawn_due(&self, now_ms: f64) -> bool {
        is_drawable(self.width, self.height)
            && !self.is_full()
            && now_ms - self.last_spawn_ms >= self.spawn_interval_ms
    }

    /// Record a timed spawn and draw the delay before the next one
    pub(super) fn mark_spawned(&mut self, now_ms: f64) {
        self.last_spawn_ms = now_ms;
        self.spawn_interval_ms = self.next_spawn_interval();
    }

    fn next_spawn_interval(&mut self) -> f64 {
        let (lo, hi) = self.config.spawn_interval_ms;
        let hi = hi.max(lo);
        lo + self.rng.random::<f64>() * (hi - lo)
    }

    fn spawn_against(
        rng: &mut Pcg32,
        config: &FieldConfig,
        width: f32,
        height: f32,
        existing: &[Sprite],
    ) -> Sprite {
        let size = compute_sprite_size(rng, width, height, config);
        let placement = find_non_overlapping_placement(rng, size, width, existing, config);
        let angle = rng.random::<f32>() * TAU;
        Sprite::new(placement.pos, size, config.fall_speed, angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::placement::base_sprite_size;
    use proptest::prelude::*;

    fn assert_within_field(field: &Field) {
        let config = field.config();
        let width = field.width();
        let base = base_sprite_size(width, field.height(), config);
        for sprite in field.sprites() {
            assert!(sprite.size > 0.0);
            assert!(sprite.speed > 0.0);
            assert!(sprite.pos.x >= 0.0);
            assert!(sprite.pos.x + sprite.size <= width * (1.0 + 1e-5));
            assert!(sprite.size >= base * config.size_multiplier * 0.9999);
            assert!(sprite.pos.y <= -sprite.size);
            assert!(sprite.pos.y >= -sprite.size * (1.0 + config.stagger_rows) * 1.0001);
        }
    }

    #[test]
    fn test_new_field_seeds_initial_population() {
        let field = Field::new(FieldConfig::default(), 800.0, 600.0, 42);
        assert_eq!(field.len(), 10);
        assert_within_field(&field);
    }

    #[test]
    fn test_reseed_on_shrink() {
        let mut field = Field::new(FieldConfig::default(), 800.0, 600.0, 42);
        field.reseed(400.0, 300.0);

        assert_eq!(field.width(), 400.0);
        assert_eq!(field.height(), 300.0);
        assert_eq!(field.len(), 10);
        for sprite in field.sprites() {
            assert!(sprite.pos.x + sprite.size <= 400.0 + 1e-3);
            // base = 300 / 15 = 20, size in [60, 90)
            assert!(sprite.size >= 60.0 && sprite.size < 90.0);
        }
        assert_within_field(&field);
    }

    #[test]
    fn test_reseed_discards_previous_sprites() {
        let mut field = Field::new(FieldConfig::default(), 800.0, 600.0, 42);
        let stale = Sprite::new(glam::Vec2::new(700.0, 500.0), 170.0, 2.0, 0.0);
        field.sprites[0] = stale;
        field.reseed(400.0, 300.0);
        assert!(field.sprites().iter().all(|s| *s != stale));
    }

    #[test]
    fn test_reseed_degenerate_is_empty() {
        let mut field = Field::new(FieldConfig::default(), 800.0, 600.0, 42);
        field.reseed(0.0, 600.0);
        assert!(field.is_empty());
        assert!(!field.spawn_due(10_000.0));

        field.reseed(800.0, f32::NAN);
        assert!(field.is_empty());
    }

    #[test]
    fn test_initial_clamped_to_max() {
        let config = FieldConfig {
            max_sprites: 3,
            initial_sprites: 8,
            ..FieldConfig::default()
        };
        let field = Field::new(config, 800.0, 600.0, 1);
        assert_eq!(field.len(), 3);
        assert!(field.is_full());
    }

    #[test]
    fn test_spawn_sprite_does_not_insert() {
        let mut field = Field::new(FieldConfig::default(), 800.0, 600.0, 5);
        let before = field.len();
        let sprite = field.spawn_sprite();
        assert_eq!(field.len(), before);
        assert!(sprite.angle >= 0.0 && sprite.angle < TAU);
        assert_eq!(sprite.speed, DEFAULT_FALL_SPEED);
    }

    #[test]
    fn test_insert_respects_cap() {
        let config = FieldConfig {
            max_sprites: 2,
            initial_sprites: 0,
            ..FieldConfig::default()
        };
        let mut field = Field::new(config, 800.0, 600.0, 5);
        let sprite = field.spawn_sprite();
        assert!(field.insert(sprite));
        assert!(field.insert(sprite));
        assert!(!field.insert(sprite));
        assert_eq!(field.len(), 2);
    }

    #[test]
    fn test_spawn_interval_in_range() {
        let mut field = Field::new(FieldConfig::default(), 800.0, 600.0, 9);
        for i in 0..200 {
            field.reset_spawn_clock(i as f64);
            assert!(field.spawn_interval_ms >= SPAWN_INTERVAL_MIN_MS);
            assert!(field.spawn_interval_ms <= SPAWN_INTERVAL_MAX_MS);
        }
    }

    #[test]
    fn test_zero_fall_speed_falls_back_to_default() {
        let config = FieldConfig {
            fall_speed: 0.0,
            ..FieldConfig::default()
        };
        let mut field = Field::new(config, 800.0, 600.0, 3);

        assert_eq!(field.config().fall_speed, DEFAULT_FALL_SPEED);
        assert!(!field.is_empty());
        assert!(field.sprites().iter().all(|s| s.speed > 0.0));
        assert!(field.spawn_sprite().speed > 0.0);
    }

    #[test]
    fn test_sanitized_replaces_unusable_values() {
        let config = FieldConfig {
            fall_speed: f32::NAN,
            spin_per_tick: -0.5,
            size_divisor: 0.0,
            size_jitter: f32::INFINITY,
            size_multiplier: -3.0,
            stagger_rows: f32::NAN,
            spawn_interval_ms: (500.0, 100.0),
            ..FieldConfig::default()
        }
        .sanitized();

        assert_eq!(config, FieldConfig::default());
    }

    #[test]
    fn test_sanitized_keeps_valid_values() {
        let config = FieldConfig {
            max_sprites: 7,
            initial_sprites: 2,
            fall_speed: 0.25,
            spin_per_tick: 0.0,
            stagger_rows: 0.0,
            spawn_interval_ms: (0.0, 0.0),
            ..FieldConfig::default()
        };
        assert_eq!(config.clone().sanitized(), config);
    }

    #[test]
    fn test_negative_speed_field_keeps_cycling() {
        let config = FieldConfig {
            fall_speed: -2.0,
            ..FieldConfig::default()
        };
        let mut field = Field::new(config, 800.0, 600.0, 4);

        let mut removed = 0;
        for frame in 0..5_000 {
            removed += crate::sim::tick(&mut field, frame as f64 * HEADLESS_FRAME_MS).removed;
        }
        assert!(removed > 0);
        assert!(field.sprites().iter().all(|s| s.speed > 0.0));
    }

    #[test]
    fn test_subnormal_width_sprites_fit() {
        let width = 1e-44_f32;
        let field = Field::new(FieldConfig::default(), width, 600.0, 3);

        assert_eq!(field.len(), field.config().initial_sprites);
        for sprite in field.sprites() {
            assert!(sprite.size > 0.0);
            assert!(sprite.pos.x >= 0.0);
            assert!(sprite.pos.x + sprite.size <= width);
        }
    }

    proptest! {
        #[test]
        fn reseed_respects_new_dimensions(
            seed in any::<u64>(),
            width in 0.01f32..3000.0,
            height in 0.01f32..3000.0,
        ) {
            let mut field = Field::new(FieldConfig::default(), 1920.0, 1080.0, seed);
            field.reseed(width, height);
            prop_assert_eq!(field.len(), field.config().initial_sprites);
            assert_within_field(&field);
        }
    }
}
