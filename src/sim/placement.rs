//! Sprite sizing and non-overlapping placement
//!
//! Placement is rejection sampling with a fixed attempt budget. When the
//! budget runs out the last candidate is used anyway, so a crowded field gets
//! overlapping sprites instead of a stalled spawn.

use glam::Vec2;
use rand::Rng;

use super::field::FieldConfig;
use super::sprite::{Sprite, overlaps_at};
use crate::consts::{MIN_SPRITE_SIZE, PLACEMENT_ATTEMPTS};
use crate::is_drawable;

/// Outcome of a placement search
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Chosen top-left corner
    pub pos: Vec2,
    /// Candidates sampled, including the accepted one
    pub attempts: u32,
    /// False when the budget ran out and `pos` overlaps something
    pub clear: bool,
}

/// Base sprite size for a field: `min(w, h) / divisor`
#[inline]
pub fn base_sprite_size(width: f32, height: f32, config: &FieldConfig) -> f32 {
    width.min(height) / config.size_divisor
}

/// Size for a new sprite, scaled to the current field dimensions
pub fn compute_sprite_size<R: Rng>(
    rng: &mut R,
    width: f32,
    height: f32,
    config: &FieldConfig,
) -> f32 {
    if !is_drawable(width, height) {
        return MIN_SPRITE_SIZE;
    }

    let base = base_sprite_size(width, height, config);
    let jitter = rng.random::<f32>() * base * config.size_jitter;
    let size = (base + jitter) * config.size_multiplier;

    if size.is_finite() && size > 0.0 {
        size
    } else {
        // Underflow on a sliver of a field; never wider than the field itself
        MIN_SPRITE_SIZE.min(width.min(height))
    }
}

/// True if a sprite of `size` at `pos` clears every sprite in `existing`
pub fn fits(pos: Vec2, size: f32, existing: &[Sprite]) -> bool {
    let center = pos + Vec2::splat(size / 2.0);
    !existing.iter().any(|other| overlaps_at(center, size, other))
}

/// Random candidate in the spawn band above the field.
///
/// `x` is uniform over `[0, width - size]` (collapsed to 0 when the sprite is
/// wider than the field), `y` is staggered between one and
/// `1 + stagger_rows` sprite sizes above the top edge.
pub fn spawn_candidate<R: Rng>(
    rng: &mut R,
    size: f32,
    width: f32,
    stagger_rows: f32,
) -> Vec2 {
    let span = width - size;
    let span = if span.is_finite() { span.max(0.0) } else { 0.0 };
    let x = rng.random::<f32>() * span;
    let y = -size * (1.0 + rng.random::<f32>() * stagger_rows.max(0.0));
    Vec2::new(x, y)
}

/// Rejection-sample candidates from `sample` until one fits.
///
/// Always samples at least once and never more than `max_attempts` times.
pub fn place_by_rejection<F>(
    size: f32,
    existing: &[Sprite],
    max_attempts: u32,
    mut sample: F,
) -> Placement
where
    F: FnMut() -> Vec2,
{
    let max_attempts = max_attempts.max(1);
    let mut attempts = 0;

    loop {
        let pos = sample();
        attempts += 1;
        let clear = fits(pos, size, existing);
        if clear || attempts >= max_attempts {
            return Placement {
                pos,
                attempts,
                clear,
            };
        }
    }
}

/// Find a spawn-band position for a sprite of `size` that avoids `existing`
pub fn find_non_overlapping_placement<R: Rng>(
    rng: &mut R,
    size: f32,
    width: f32,
    existing: &[Sprite],
    config: &FieldConfig,
) -> Placement {
    let placement = place_by_rejection(size, existing, PLACEMENT_ATTEMPTS, || {
        spawn_candidate(&mut *rng, size, width, config.stagger_rows)
    });

    if !placement.clear {
        log::debug!(
            "No clear spot for size {:.1} among {} sprites, accepting overlap",
            size,
            existing.len()
        );
    }

    placement
}
