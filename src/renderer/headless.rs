//! Headless surface for native runs and tests

use glam::Vec2;

use super::RenderSurface;

/// Surface that only records what would have been drawn
#[derive(Debug, Clone, Default)]
pub struct HeadlessSurface {
    pub width: f32,
    pub height: f32,
    /// Total clear calls
    pub clears: u64,
    /// Total sprite draws
    pub draws: u64,
    /// Sprite draws since the last clear
    pub last_frame_draws: usize,
    /// Draws that landed fully or partly inside the visible area
    pub visible_draws: u64,
}

impl HeadlessSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }
}

impl RenderSurface for HeadlessSurface {
    type Image = ();

    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.last_frame_draws = 0;
    }

    fn draw_rotated_sprite(&mut self, _image: &(), pos: Vec2, size: f32, _angle: f32) {
        self.draws += 1;
        self.last_frame_draws += 1;
        if pos.y + size > 0.0 && pos.y < self.height && pos.x < self.width {
            self.visible_draws += 1;
        }
    }
}
