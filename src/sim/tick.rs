//! Per-frame simulation tick
//!
//! Population policy is respawn-on-timer: sprites that fall past the bottom
//! edge are dropped, and a new one is appended whenever the random spawn delay
//! has elapsed and the field is below its cap.

use super::field::Field;

/// What a single tick changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    /// Sprites dropped after leaving the bottom edge
    pub removed: usize,
    /// A timed spawn happened this tick
    pub spawned: bool,
}

/// Advance the field by one frame.
///
/// `now_ms` is the frame clock timestamp; only the spawn timer reads it, so
/// motion is per tick rather than per millisecond.
pub fn tick(field: &mut Field, now_ms: f64) -> TickStats {
    let spin = field.config().spin_per_tick;
    let height = field.height();

    for sprite in &mut field.sprites {
        sprite.update(spin);
    }

    let before = field.sprites.len();
    field.sprites.retain(|s| !s.is_below(height));
    let removed = before - field.sprites.len();

    let mut spawned = false;
    if field.spawn_due(now_ms) {
        let sprite = field.spawn_sprite();
        spawned = field.insert(sprite);
        field.mark_spawned(now_ms);
        log::debug!(
            "Spawned sprite (size {:.1}), population {}",
            sprite.size,
            field.len()
        );
    }

    TickStats { removed, spawned }
}
