//! Sprite entity
//!
//! A square image anchored at its top-left corner that falls at a constant
//! speed and spins about its own center.

use glam::Vec2;

use crate::wrap_angle;

/// A single falling, rotating sprite
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    /// Top-left corner in field pixels
    pub pos: Vec2,
    /// Side length of the square bounding box
    pub size: f32,
    /// Fall speed in pixels per tick
    pub speed: f32,
    /// Rotation in radians, kept in [0, 2π)
    pub angle: f32,
}

impl Sprite {
    pub fn new(pos: Vec2, size: f32, speed: f32, angle: f32) -> Self {
        Self {
            pos,
            size,
            speed,
            angle: wrap_angle(angle),
        }
    }

    /// Center of the bounding box
    #[inline]
    pub fn center(&self) -> Vec2 {
        self.pos + Vec2::splat(self.size / 2.0)
    }

    /// Advance one tick: fall by `speed`, spin by `spin` radians
    pub fn update(&mut self, spin: f32) {
        self.pos.y += self.speed;
        self.angle = wrap_angle(self.angle + spin);
    }

    /// Circle test on centers, with the sum of half-sizes as minimum distance
    pub fn overlaps(&self, other: &Sprite) -> bool {
        overlaps_at(self.center(), self.size, other)
    }

    /// True once the sprite's top edge has left the bottom of the field
    #[inline]
    pub fn is_below(&self, height: f32) -> bool {
        self.pos.y > height
    }
}

/// Overlap test for a candidate that has not been built into a sprite yet
#[inline]
pub(crate) fn overlaps_at(center: Vec2, size: f32, other: &Sprite) -> bool {
    let min_distance = (size + other.size) / 2.0;
    center.distance(other.center()) < min_distance
}
