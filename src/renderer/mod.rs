//! Rendering module
//!
//! The simulator only needs a surface that can report its size, clear itself
//! and draw one image rotated about its own center. The browser build backs
//! this with a 2D canvas context; the native build uses a counting surface.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod headless;

#[cfg(target_arch = "wasm32")]
pub use canvas::{CanvasSurface, loaded_image};
pub use headless::HeadlessSurface;

use glam::Vec2;

use crate::sim::Field;

/// Drawable area the field is rendered onto
pub trait RenderSurface {
    /// Image handle the surface knows how to draw
    type Image: ?Sized;

    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Clear the whole drawable area
    fn clear(&mut self);

    /// Draw `image` scaled to `size`x`size` with its top-left at `pos`,
    /// rotated by `angle` radians about the square's center
    fn draw_rotated_sprite(&mut self, image: &Self::Image, pos: Vec2, size: f32, angle: f32);
}

/// Clear the surface and draw every sprite.
///
/// A missing image (still loading, or failed) skips the sprites for this
/// frame. Returns the number of sprites drawn.
pub fn draw_field<S: RenderSurface>(
    surface: &mut S,
    field: &Field,
    image: Option<&S::Image>,
) -> usize {
    surface.clear();

    let Some(image) = image else {
        return 0;
    };

    for sprite in field.sprites() {
        surface.draw_rotated_sprite(image, sprite.pos, sprite.size, sprite.angle);
    }
    field.len()
}
