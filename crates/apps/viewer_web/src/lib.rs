use console_error_panic_hook::set_once;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

use gpu::{GlobeSession, GlobeSurface, RevealSession, RevealSurface};
use runtime::MountSlot;
use scene::SurfaceSize;
use scene::globe::{GlobeConfig, GlobeState, arcs_from_json};
use scene::reveal::{RevealConfig, RevealState, gradient_css};

mod raf;
mod wgpu;
use raf::AnimationFrameScheduler;
use wgpu::{WgpuGlobeSurface, WgpuRevealSurface};

type RevealSlot = MountSlot<RevealSession<WgpuRevealSurface>, AnimationFrameScheduler>;
type GlobeSlot = MountSlot<GlobeSession<WgpuGlobeSurface>, AnimationFrameScheduler>;

fn js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

fn document() -> Result<web_sys::Document, JsValue> {
    web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("document missing"))
}

fn client_size(el: &web_sys::Element) -> SurfaceSize {
    SurfaceSize::from_measured(el.client_width() as f64, el.client_height() as f64)
}

fn window_size() -> SurfaceSize {
    let Some(window) = web_sys::window() else {
        return SurfaceSize::from_measured(1.0, 1.0);
    };
    let read = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
    SurfaceSize::from_measured(read(window.inner_width()), read(window.inner_height()))
}

fn set_styles(el: &web_sys::HtmlElement, styles: &[(&str, &str)]) -> Result<(), JsValue> {
    let style = el.style();
    for (name, value) in styles {
        style.set_property(name, value)?;
    }
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    set_once();
    Ok(())
}

/// Animated dot-grid background mounted into a host element.
///
/// Each `mount`/`reconfigure` tears the previous canvas and GPU context down
/// before building new ones, so at most one frame loop runs per instance.
#[wasm_bindgen]
pub struct RevealEffect {
    host: web_sys::HtmlElement,
    scheduler: AnimationFrameScheduler,
    slot: Rc<RefCell<RevealSlot>>,
    generation: Rc<Cell<u64>>,
    wrapper: Option<web_sys::HtmlElement>,
}

#[wasm_bindgen]
impl RevealEffect {
    #[wasm_bindgen(constructor)]
    pub fn new(host: web_sys::HtmlElement) -> Result<RevealEffect, JsValue> {
        Ok(Self {
            host,
            scheduler: AnimationFrameScheduler::new()?,
            slot: Rc::new(RefCell::new(MountSlot::new())),
            generation: Rc::new(Cell::new(0)),
            wrapper: None,
        })
    }

    /// Builds the wrapper, canvas and optional overlay, then starts drawing
    /// once the GPU context is ready. `config_json` is a camelCase config
    /// object; an empty string uses the defaults.
    pub fn mount(&mut self, config_json: &str) -> Result<(), JsValue> {
        let config = if config_json.trim().is_empty() {
            RevealConfig::default()
        } else {
            RevealConfig::from_json(config_json).map_err(js_err)?
        };
        self.unmount();

        let doc = document()?;
        let wrapper: web_sys::HtmlElement = doc.create_element("div")?.dyn_into()?;
        wrapper.set_class_name(&config.container_classes());
        let canvas: web_sys::HtmlCanvasElement = doc.create_element("canvas")?.dyn_into()?;
        set_styles(
            &canvas,
            &[("position", "absolute"), ("inset", "0"), ("width", "100%"), ("height", "100%")],
        )?;
        wrapper.append_child(&canvas)?;
        if config.show_gradient {
            let overlay: web_sys::HtmlElement = doc.create_element("div")?.dyn_into()?;
            let gradient = gradient_css();
            set_styles(
                &overlay,
                &[
                    ("position", "absolute"),
                    ("inset", "0"),
                    ("pointer-events", "none"),
                    ("background-image", gradient.as_str()),
                ],
            )?;
            wrapper.append_child(&overlay)?;
        }
        self.host.append_child(&wrapper)?;

        let state = match RevealState::new(config, client_size(&wrapper)) {
            Ok(state) => state,
            Err(err) => {
                wrapper.remove();
                return Err(js_err(err));
            }
        };
        self.wrapper = Some(wrapper);

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let current = self.generation.clone();
        let slot = self.slot.clone();
        let scheduler = self.scheduler.clone();
        spawn_local(async move {
            let size = state.size();
            match WgpuRevealSurface::new(canvas, size).await {
                // Unmounted or remounted while the context was being created.
                Ok(mut surface) if current.get() != generation => surface.release(),
                Ok(surface) => {
                    slot.borrow_mut()
                        .replace("reveal", scheduler, RevealSession::new(state, surface));
                }
                Err(err) => log(&format!("reveal init error: {err}")),
            }
        });
        Ok(())
    }

    /// Same as a fresh `mount` with the new config.
    pub fn reconfigure(&mut self, config_json: &str) -> Result<(), JsValue> {
        self.mount(config_json)
    }

    pub fn unmount(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.slot.borrow_mut().clear();
        if let Some(wrapper) = self.wrapper.take() {
            wrapper.remove();
        }
    }

    pub fn is_running(&self) -> bool {
        self.slot.borrow().get().is_some_and(|m| m.is_active())
    }
}

impl Drop for RevealEffect {
    fn drop(&mut self) {
        self.unmount();
    }
}

/// Rotating globe with one marker per distinct arc endpoint.
#[wasm_bindgen]
pub struct Globe {
    canvas: web_sys::HtmlCanvasElement,
    scheduler: AnimationFrameScheduler,
    slot: Rc<RefCell<GlobeSlot>>,
    // Scene built before the GPU context is ready.
    pending: Rc<RefCell<Option<GlobeState>>>,
    generation: Rc<Cell<u64>>,
    on_resize: Option<Closure<dyn FnMut()>>,
}

#[wasm_bindgen]
impl Globe {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: web_sys::HtmlCanvasElement) -> Result<Globe, JsValue> {
        Ok(Self {
            canvas,
            scheduler: AnimationFrameScheduler::new()?,
            slot: Rc::new(RefCell::new(MountSlot::new())),
            pending: Rc::new(RefCell::new(None)),
            generation: Rc::new(Cell::new(0)),
            on_resize: None,
        })
    }

    /// `config_json` is a camelCase globe config, `data_json` an array of arcs.
    pub fn mount(&mut self, config_json: &str, data_json: &str) -> Result<(), JsValue> {
        let config = if config_json.trim().is_empty() {
            GlobeConfig::default()
        } else {
            GlobeConfig::from_json(config_json).map_err(js_err)?
        };
        let arcs = arcs_from_json(data_json).map_err(js_err)?;
        self.unmount();

        let size = client_size(&self.canvas);
        *self.pending.borrow_mut() = Some(GlobeState::new(config, arcs, size).map_err(js_err)?);
        self.listen_for_resize()?;

        let generation = self.generation.get().wrapping_add(1);
        self.generation.set(generation);
        let current = self.generation.clone();
        let pending = self.pending.clone();
        let slot = self.slot.clone();
        let scheduler = self.scheduler.clone();
        let canvas = self.canvas.clone();
        spawn_local(async move {
            match WgpuGlobeSurface::new(canvas, size).await {
                Ok(mut surface) if current.get() != generation => surface.release(),
                Ok(mut surface) => {
                    let Some(state) = pending.borrow_mut().take() else {
                        surface.release();
                        return;
                    };
                    // Resized while the context was being created.
                    if state.size != size {
                        surface.resize(state.size);
                    }
                    slot.borrow_mut()
                        .replace("globe", scheduler, GlobeSession::new(state, surface));
                }
                Err(err) => log(&format!("globe init error: {err}")),
            }
        });
        Ok(())
    }

    /// Replaces the arcs. On error the current markers stay.
    pub fn set_data(&mut self, data_json: &str) -> Result<(), JsValue> {
        let arcs = arcs_from_json(data_json).map_err(js_err)?;
        if let Some(mount) = self.slot.borrow().get() {
            return mount.with_session(|s| s.set_arcs(arcs)).map_err(js_err);
        }
        match self.pending.borrow_mut().as_mut() {
            Some(state) => state.set_arcs(arcs).map_err(js_err),
            None => Err(JsValue::from_str("globe is not mounted")),
        }
    }

    /// Current markers as a JSON array.
    pub fn points_json(&self) -> Result<String, JsValue> {
        let json = if let Some(mount) = self.slot.borrow().get() {
            mount.with_session(|s| serde_json::to_string(&s.state().points))
        } else if let Some(state) = self.pending.borrow().as_ref() {
            serde_json::to_string(&state.points)
        } else {
            Ok("[]".to_string())
        };
        json.map_err(js_err)
    }

    pub fn pointer_down(&self, x: f64, y: f64) {
        if let Some(mount) = self.slot.borrow().get() {
            mount.with_session(|s| s.pointer_down(x, y));
        }
    }

    pub fn pointer_move(&self, x: f64, y: f64) {
        let height = self.canvas.client_height() as f64;
        if let Some(mount) = self.slot.borrow().get() {
            mount.with_session(|s| s.pointer_move(x, y, height));
        }
    }

    pub fn pointer_up(&self) {
        if let Some(mount) = self.slot.borrow().get() {
            mount.with_session(|s| s.pointer_up());
        }
    }

    pub fn unmount(&mut self) {
        self.generation.set(self.generation.get().wrapping_add(1));
        self.slot.borrow_mut().clear();
        self.pending.borrow_mut().take();
        if let Some(closure) = self.on_resize.take()
            && let Some(window) = web_sys::window()
        {
            let _ = window
                .remove_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        }
    }

    fn listen_for_resize(&mut self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        let slot = self.slot.clone();
        let pending = self.pending.clone();
        let canvas = self.canvas.clone();
        let closure = Closure::wrap(Box::new(move || {
            let container = canvas
                .parent_element()
                .map(|parent| client_size(&parent))
                .unwrap_or_else(|| client_size(&canvas));
            if let Some(mount) = slot.borrow().get() {
                mount.with_session(|s| s.resize(window_size(), container));
            } else if let Some(state) = pending.borrow_mut().as_mut() {
                state.resize(window_size(), container);
            }
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        self.on_resize = Some(closure);
        Ok(())
    }
}

impl Drop for Globe {
    fn drop(&mut self) {
        self.unmount();
    }
}
