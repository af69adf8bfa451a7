//! Physics Demos entry point
//!
//! In the browser: binds the canvas and page controls and runs the
//! animation-frame loop. Natively: a headless run that logs the reference
//! computations.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use web_sys::{Element, HtmlCanvasElement, HtmlInputElement, KeyboardEvent, PointerEvent};

    use physics_demos::controls::{self, Command};
    use physics_demos::renderer::{self, RenderState};
    use physics_demos::shadow_api::{self, ShadowRequest};
    use physics_demos::sim::{Pointer, PointerKind, Scene, SimulationKind, TickInput};
    use physics_demos::{CanvasSize, Settings};

    /// App instance holding all state
    struct App {
        scene: Scene,
        settings: Settings,
        pointer: Pointer,
        input: TickInput,
        render_state: Option<RenderState>,
        /// Light scene revision last sent to the shadow endpoint
        posted_revision: Option<u64>,
        /// Readouts last written to the page
        readouts: Vec<(String, String)>,
    }

    impl App {
        fn new(scene: Scene, settings: Settings) -> Self {
            Self {
                scene,
                settings,
                pointer: Pointer::default(),
                input: TickInput::default(),
                render_state: None,
                posted_revision: None,
                readouts: Vec::new(),
            }
        }

        /// One animation frame: update, render, publish
        fn frame(&mut self, time: f64) {
            let mut input = std::mem::take(&mut self.input);
            input.now_ms = time;
            if input.reset {
                self.scene.cancel_drag(&mut self.pointer);
            }
            self.scene.update(&input);

            self.render();
            self.post_shadow_geometry();
            self.update_page();
        }

        fn render(&mut self) {
            let vertices = renderer::build(&self.scene, self.settings.quality);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Send the light scene geometry whenever it changed (result is only logged)
        fn post_shadow_geometry(&mut self) {
            let (Scene::Light(scene), Some(endpoint)) = (&self.scene, &self.settings.shadow_endpoint)
            else {
                return;
            };
            if self.posted_revision == Some(scene.revision()) || self.pointer.is_dragging() {
                return;
            }
            self.posted_revision = Some(scene.revision());
            shadow_api::post(endpoint.clone(), ShadowRequest::from_scene(scene));
        }

        /// Write readouts, sync control values and hide missing entity panels
        fn update_page(&mut self) {
            let readouts = controls::readouts(&self.scene);
            if readouts == self.readouts {
                return;
            }
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            for (key, text) in &readouts {
                for el in select(&document, &format!("[data-readout=\"{key}\"]")) {
                    el.set_text_content(Some(text));
                }
                for el in select(&document, &format!("input[data-control=\"{key}\"]")) {
                    if let Ok(input) = el.dyn_into::<HtmlInputElement>() {
                        if input.type_() != "checkbox" && input.value() != *text {
                            input.set_value(text);
                        }
                    }
                }
            }

            let live = controls::entities(&self.scene);
            for el in select(&document, "[data-entity]") {
                let key = el.get_attribute("data-entity").unwrap_or_default();
                let _ = el.class_list().toggle_with_force("hidden", !live.contains(&key));
            }

            self.readouts = readouts;
        }

        fn command(&mut self, key: &str, value: &str) {
            let App { scene, pointer, .. } = self;
            match Command::parse(key, value).and_then(|c| c.run(scene, pointer)) {
                Ok(()) => log::debug!("{} = {:?}", key, value),
                Err(e) => log::warn!("{}: {}", key, e),
            }
        }
    }

    /// All elements matching a selector
    fn select(document: &web_sys::Document, selector: &str) -> Vec<Element> {
        let Ok(list) = document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..list.length())
            .filter_map(|i| list.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    /// Pointer position in logical canvas pixels
    fn canvas_point(canvas: &HtmlCanvasElement, event: &PointerEvent, size: CanvasSize) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        let scale_x = if rect.width() > 0.0 { size.width as f64 / rect.width() } else { 1.0 };
        let scale_y = if rect.height() > 0.0 { size.height as f64 / rect.height() } else { 1.0 };
        Vec2::new(
            ((event.client_x() as f64 - rect.left()) * scale_x) as f32,
            ((event.client_y() as f64 - rect.top()) * scale_y) as f32,
        )
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        log::info!("Physics demos starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        let canvas: HtmlCanvasElement = document
            .query_selector("canvas[data-simulation]")?
            .ok_or("no canvas with data-simulation")?
            .dyn_into()?;
        let kind_attr = canvas.get_attribute("data-simulation").unwrap_or_default();
        let kind = SimulationKind::from_str(&kind_attr)
            .ok_or_else(|| JsValue::from_str(&format!("unknown simulation {kind_attr:?}")))?;

        let settings = Settings::load(&canvas);

        // Canvas size follows the viewport; the backing store is scaled by the DPR
        let viewport = window.inner_width()?.as_f64().unwrap_or(1024.0) as f32;
        let size = CanvasSize::for_viewport(viewport);
        let dpr = window.device_pixel_ratio();
        let width = (size.width as f64 * dpr) as u32;
        let height = (size.height as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        canvas.set_attribute(
            "style",
            &format!("width:{}px;height:{}px;touch-action:none", size.width, size.height),
        )?;

        let seed = js_sys::Date::now() as u64;
        let scene = Scene::new(kind, size, &settings, seed);
        let app = Rc::new(RefCell::new(App::new(scene, settings)));

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });
        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| JsValue::from_str(&format!("surface: {e}")))?;
        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| JsValue::from_str(&format!("adapter: {e}")))?;
        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height, size)
            .await
            .map_err(|e| JsValue::from_str(&format!("device: {e}")))?;
        app.borrow_mut().render_state = Some(render_state);

        setup_pointer_handlers(&canvas, app.clone(), size)?;
        setup_keyboard(app.clone())?;
        setup_controls(&document, app.clone())?;

        request_animation_frame(app);

        log::info!("Physics demos running!");
        Ok(())
    }

    fn setup_pointer_handlers(
        canvas: &HtmlCanvasElement,
        app: Rc<RefCell<App>>,
        size: CanvasSize,
    ) -> Result<(), JsValue> {
        // Press: pick and start dragging
        {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let at = canvas_point(&target, &event, size);
                let kind = PointerKind::from_dom(&event.pointer_type());
                let mut a = app.borrow_mut();
                let App { scene, pointer, .. } = &mut *a;
                scene.pointer_down(pointer, event.pointer_id(), at, kind);
                if pointer.owns(event.pointer_id()) {
                    event.prevent_default();
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
            });
            canvas.add_event_listener_with_callback("pointerdown", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Move: stream into the held entity
        {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                if !a.pointer.owns(event.pointer_id()) {
                    return;
                }
                event.prevent_default();
                let at = canvas_point(&target, &event, size);
                let App { scene, pointer, .. } = &mut *a;
                scene.pointer_move(pointer, event.pointer_id(), at);
            });
            canvas.add_event_listener_with_callback("pointermove", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        // Release and cancel end the drag of the owning pointer
        for name in ["pointerup", "pointercancel"] {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                let mut a = app.borrow_mut();
                let App { scene, pointer, .. } = &mut *a;
                scene.pointer_up(pointer, event.pointer_id());
            });
            canvas.add_event_listener_with_callback(name, closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn setup_keyboard(app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
            // Leave typing in form fields alone
            if let Some(target) = event.target().and_then(|t| t.dyn_into::<HtmlInputElement>().ok()) {
                if target.type_() == "text" {
                    return;
                }
            }
            let mut a = app.borrow_mut();
            if a.scene.kind() == SimulationKind::Pendulum && a.input.key(&event.key()) {
                event.prevent_default();
            }
        });
        window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    fn setup_controls(document: &web_sys::Document, app: Rc<RefCell<App>>) -> Result<(), JsValue> {
        for el in select(document, "input[data-control]") {
            let Ok(input) = el.dyn_into::<HtmlInputElement>() else {
                continue;
            };
            let app = app.clone();
            let source = input.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let key = source.get_attribute("data-control").unwrap_or_default();
                let value = if source.type_() == "checkbox" {
                    source.checked().to_string()
                } else {
                    source.value()
                };
                app.borrow_mut().command(&key, &value);
            });
            input.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        for el in select(document, "[data-action]") {
            let app = app.clone();
            let source = el.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let key = source.get_attribute("data-action").unwrap_or_default();
                app.borrow_mut().command(&key, "");
            });
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn app_loop(app: Rc<RefCell<App>>, time: f64) {
        app.borrow_mut().frame(time);
        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() -> Result<(), JsValue> {
    wasm_app::run().await
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Physics demos (native) starting...");
    log::info!("Rendering needs a browser canvas - build for wasm32 to run the demos");

    if let Err(e) = headless_demo() {
        log::error!("Headless demo failed: {}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Run both simulations without a canvas and log what they compute
#[cfg(not(target_arch = "wasm32"))]
fn headless_demo() -> Result<(), physics_demos::SimError> {
    use physics_demos::controls::{Command, readouts};
    use physics_demos::shadow_api::{ShadowRequest, ShadowResponse};
    use physics_demos::sim::{Scene, SimulationKind, TickInput, integrate, point_shadow};
    use physics_demos::{CanvasSize, Settings, ShadowAnchor};

    let settings = Settings::default();
    let canvas = CanvasSize::default();

    // Light scene: one point light and one extended light
    let mut light = Scene::new(SimulationKind::LightAndShadow, canvas, &settings, 1);
    if let Scene::Light(s) = &light {
        if let Some(shadow) = point_shadow(s.lights[0].pos, &s.stick, s.ground_y, ShadowAnchor::Ground)
        {
            log::info!(
                "Point shadow: start {:.1}, end {:.1}, length {:.1}",
                shadow.start,
                shadow.end,
                shadow.length
            );
        }
    }
    Command::AddLight.apply(&mut light)?;
    Command::parse("light.1.extended", "true")?.apply(&mut light)?;
    if let Scene::Light(s) = &light {
        let response = ShadowResponse::evaluate(&ShadowRequest::from_scene(s));
        let json = serde_json::to_string_pretty(&response)?;
        log::info!("Shadow endpoint answer:\n{}", json);
    }

    // Pendulum scene: one reference step, then a few seconds of swinging
    let (angle, vel) = integrate(
        std::f32::consts::FRAC_PI_4,
        0.0,
        200.0,
        0.995,
        Default::default(),
    );
    log::info!("Reference step: angle {:.5}, velocity {:.6}", angle, vel);

    let mut pendulum = Scene::new(SimulationKind::Pendulum, canvas, &settings, 1);
    Command::AddPendulum.apply(&mut pendulum)?;
    for frame in 0..180 {
        pendulum.update(&TickInput {
            now_ms: frame as f64 * 1000.0 / 60.0,
            ..Default::default()
        });
    }
    for (key, text) in readouts(&pendulum) {
        log::info!("{} = {}", key, text);
    }

    Ok(())
}
