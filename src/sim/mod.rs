//! Particle field simulation
//!
//! Everything that moves lives here:
//! - Sprite entity (fall + spin)
//! - Size and non-overlapping placement
//! - Field state with reseed on resize
//! - Per-frame tick with timed respawn
//!
//! No rendering or platform dependencies.

pub mod field;
pub mod placement;
pub mod sprite;
pub mod tick;

pub use field::{Field, FieldConfig};
pub use placement::{
    Placement, base_sprite_size, compute_sprite_size, find_non_overlapping_placement, fits,
    place_by_rejection, spawn_candidate,
};
pub use sprite::Sprite;
pub use tick::{TickStats, tick};
