//! Waffle Rain entry point
//!
//! Handles platform-specific initialization and runs the animation loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{HtmlCanvasElement, HtmlImageElement};

    use waffle_rain::renderer::{CanvasSurface, draw_field, loaded_image};
    use waffle_rain::sim::{Field, tick};
    use waffle_rain::{SetupError, Settings};

    const CANVAS_ID: &str = "waffleCanvas";

    /// Everything the frame callback touches
    struct App {
        field: Field,
        surface: CanvasSurface,
        image: HtmlImageElement,
        settings: Settings,
        /// Pending animation frame, if the loop is running
        frame_id: Option<i32>,
        running: bool,
    }

    impl App {
        /// One frame: advance, then redraw
        fn frame(&mut self, time: f64) {
            let stats = tick(&mut self.field, time);
            if stats.removed > 0 {
                log::debug!("{} sprites left the field", stats.removed);
            }
            draw_field(&mut self.surface, &self.field, loaded_image(&self.image));
        }

        /// Resize the canvas to the window and reseed for the new size
        fn fit_to_window(&mut self, window: &web_sys::Window) {
            let (width, height) = window_canvas_size(window, &self.settings);
            self.surface.resize(width, height);
            self.field.reseed(width as f32, height as f32);
        }
    }

    fn window_canvas_size(window: &web_sys::Window, settings: &Settings) -> (u32, u32) {
        let inner_w = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let inner_h = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        settings.canvas_size(inner_w, inner_h)
    }

    pub async fn run() -> Result<(), SetupError> {
        console_error_panic_hook::set_once();
        if console_log::init_with_level(log::Level::Info).is_err() {
            web_sys::console::warn_1(&"Logger already initialized".into());
        }

        log::info!("Waffle Rain starting...");

        let window = web_sys::window().ok_or(SetupError::NoWindow)?;
        let document = window.document().ok_or(SetupError::NoDocument)?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id(CANVAS_ID)
            .ok_or_else(|| SetupError::CanvasNotFound(CANVAS_ID.to_string()))?
            .dyn_into()
            .map_err(|_| SetupError::NotACanvas(CANVAS_ID.to_string()))?;

        let settings = Settings::load();
        // Write back so preferences can be edited from devtools
        settings.save();

        let (width, height) = window_canvas_size(&window, &settings);
        let mut surface = CanvasSurface::new(canvas)?;
        surface.resize(width, height);

        // The loop starts right away; frames skip drawing until the image is ready
        let image = HtmlImageElement::new().map_err(|e| SetupError::Image(format!("{:?}", e)))?;
        image.set_src(&settings.sprite_url);
        watch_image_load(image.clone(), settings.sprite_url.clone());

        let seed = js_sys::Date::now() as u64;
        let field = Field::new(
            settings.to_field_config(),
            width as f32,
            height as f32,
            seed,
        );
        log::info!(
            "Field initialized with seed: {} ({} density, {} max sprites)",
            seed,
            settings.density.as_str(),
            settings.density.max_sprites()
        );

        let app = Rc::new(RefCell::new(App {
            field,
            surface,
            image,
            settings,
            frame_id: None,
            running: true,
        }));

        setup_resize_handler(&window, app.clone())?;
        setup_visibility_handler(&document, app.clone())?;

        request_animation_frame(app);

        log::info!("Waffle Rain running!");
        Ok(())
    }

    /// Log when the sprite image finishes decoding (or fails to)
    fn watch_image_load(image: HtmlImageElement, url: String) {
        wasm_bindgen_futures::spawn_local(async move {
            match JsFuture::from(image.decode()).await {
                Ok(_) => log::info!(
                    "Sprite image loaded: {} ({}x{})",
                    url,
                    image.natural_width(),
                    image.natural_height()
                ),
                Err(e) => log::warn!("Sprite image {} failed to load: {:?}", url, e),
            }
        });
    }

    fn setup_resize_handler(
        window: &web_sys::Window,
        app: Rc<RefCell<App>>,
    ) -> Result<(), SetupError> {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let mut a = app.borrow_mut();
            a.fit_to_window(&window);
            log::info!(
                "Resized to {}x{}",
                a.field.width() as u32,
                a.field.height() as u32
            );
        });
        window
            .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())
            .map_err(|_| SetupError::Listener("resize"))?;
        closure.forget();
        Ok(())
    }

    /// Stop the loop while the tab is hidden, resume when it is shown again
    fn setup_visibility_handler(
        document: &web_sys::Document,
        app: Rc<RefCell<App>>,
    ) -> Result<(), SetupError> {
        let document_clone = document.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            if document_clone.visibility_state() == web_sys::VisibilityState::Hidden {
                stop_loop(&app);
            } else {
                resume_loop(app.clone());
            }
        });
        document
            .add_event_listener_with_callback("visibilitychange", closure.as_ref().unchecked_ref())
            .map_err(|_| SetupError::Listener("visibilitychange"))?;
        closure.forget();
        Ok(())
    }

    fn stop_loop(app: &Rc<RefCell<App>>) {
        let mut a = app.borrow_mut();
        if !a.running {
            return;
        }
        a.running = false;
        if let (Some(id), Some(window)) = (a.frame_id.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(id);
        }
        log::info!("Animation stopped (tab hidden)");
    }

    fn resume_loop(app: Rc<RefCell<App>>) {
        {
            let mut a = app.borrow_mut();
            if a.running {
                return;
            }
            a.running = true;
            // Timer spawns measure from the resume, not from before the pause
            a.field.reset_spawn_clock(now_ms());
        }
        log::info!("Animation resumed");
        request_animation_frame(app);
    }

    /// Same clock as requestAnimationFrame timestamps
    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let app_clone = app.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app_clone, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => app.borrow_mut().frame_id = Some(id),
            Err(e) => log::error!("requestAnimationFrame failed: {:?}", e),
        }
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();
            a.frame_id = None;
            if !a.running {
                return;
            }
            a.frame(time);
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Waffle Rain failed to start: {}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Waffle Rain (native) starting...");
    log::info!("Native mode runs headless - serve the wasm build for the canvas version");

    run_headless(600);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Simulate against a counting surface, shrinking the field halfway through
#[cfg(not(target_arch = "wasm32"))]
fn run_headless(frames: u32) {
    use waffle_rain::Settings;
    use waffle_rain::consts::HEADLESS_FRAME_MS;
    use waffle_rain::renderer::{HeadlessSurface, RenderSurface, draw_field};
    use waffle_rain::sim::{Field, tick};

    let settings = Settings::load();
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut surface = HeadlessSurface::new(800.0, 600.0);
    let mut field = Field::new(
        settings.to_field_config(),
        surface.width(),
        surface.height(),
        seed,
    );
    log::info!(
        "Headless field seeded with {} ({} density)",
        seed,
        settings.density.as_str()
    );

    let mut spawned = 0usize;
    let mut removed = 0usize;
    let mut peak = field.len();

    for frame in 0..frames {
        if frame == frames / 2 {
            surface.resize(400.0, 300.0);
            field.reseed(surface.width(), surface.height());
        }

        let stats = tick(&mut field, frame as f64 * HEADLESS_FRAME_MS);
        spawned += stats.spawned as usize;
        removed += stats.removed;
        peak = peak.max(field.len());

        draw_field(&mut surface, &field, Some(&()));

        if frame % 60 == 0 {
            log::info!(
                "frame {:>4}: {} sprites, {} drawn",
                frame,
                field.len(),
                surface.last_frame_draws
            );
        }
    }

    log::info!(
        "Done: {} frames, {} spawned, {} removed, peak {} / {}, {} visible draws",
        frames,
        spawned,
        removed,
        peak,
        field.config().max_sprites,
        surface.visible_draws
    );
}
