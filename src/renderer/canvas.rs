//! 2D canvas surface (WASM only)

use glam::Vec2;
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement};

use super::RenderSurface;
use crate::SetupError;

/// Canvas element plus its 2D context
pub struct CanvasSurface {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
}

impl CanvasSurface {
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, SetupError> {
        let ctx = canvas
            .get_context("2d")
            .map_err(|_| SetupError::NoContext)?
            .ok_or(SetupError::NoContext)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SetupError::NoContext)?;

        Ok(Self { canvas, ctx })
    }

    /// Resize the backing store (also resets the context transform)
    pub fn resize(&mut self, width: u32, height: u32) {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
    }
}

impl RenderSurface for CanvasSurface {
    type Image = HtmlImageElement;

    fn width(&self) -> f32 {
        self.canvas.width() as f32
    }

    fn height(&self) -> f32 {
        self.canvas.height() as f32
    }

    fn clear(&mut self) {
        self.ctx.clear_rect(
            0.0,
            0.0,
            self.canvas.width() as f64,
            self.canvas.height() as f64,
        );
    }

    fn draw_rotated_sprite(&mut self, image: &HtmlImageElement, pos: Vec2, size: f32, angle: f32) {
        let half = size as f64 / 2.0;
        let size = size as f64;

        self.ctx.save();
        let drawn = self
            .ctx
            .translate(pos.x as f64 + half, pos.y as f64 + half)
            .and_then(|_| self.ctx.rotate(angle as f64))
            .and_then(|_| self.ctx.translate(-half, -half))
            .and_then(|_| {
                self.ctx
                    .draw_image_with_html_image_element_and_dw_and_dh(image, 0.0, 0.0, size, size)
            });
        self.ctx.restore();

        if let Err(e) = drawn {
            log::warn!("Sprite draw failed: {:?}", e);
        }
    }
}

/// The image if it has finished loading and decoded to a real bitmap
pub fn loaded_image(image: &HtmlImageElement) -> Option<&HtmlImageElement> {
    if image.complete() && image.natural_width() > 0 {
        Some(image)
    } else {
        None
    }
}
