//! WASM exports for the maintenance desktop
//!
//! This module provides wasm-bindgen exports for the DesktopEngine and the
//! expansion background:
//! - `dom`: applies window effects to the document
//! - `fetch`: performs content requests and feeds results back
//! - `logger`: `log` backend over the browser console
//!
//! Content actions that need page-side libraries (HLS playback, captcha
//! widgets, panel rendering) go to a JS handler set with
//! `setContentHandler`; the page reports back through `contentEvent`.

mod dom;
mod fetch;
mod logger;

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::Function;
use wasm_bindgen::prelude::*;
use web_sys::HtmlAudioElement;

use crate::config::{PageConfig, SoundSettings};
use crate::content::{ContentAction, ContentEvent, Sound};
use crate::engine::DesktopEngine;
use crate::particles::{AnimationParam, ExpansionParams, Universe};
use crate::viewport::Viewport;
use crate::window::{Effect, WindowId, WindowKind};

pub use dom::DomError;
use dom::DomAdapter;

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = Date, js_name = now)]
    fn date_now() -> f64;
}

/// State shared between the controller and the listener closures
struct Shared {
    engine: RefCell<DesktopEngine>,
    dom: RefCell<DomAdapter>,
    content_handler: RefCell<Option<Function>>,
}

/// Run an engine operation and apply what it returns
///
/// The engine borrow is released before effects are applied, so fetch
/// completions and listeners can re-enter.
fn dispatch<F>(shared: &Rc<Shared>, f: F)
where
    F: FnOnce(&mut DesktopEngine) -> Vec<Effect>,
{
    let effects = {
        let Ok(mut engine) = shared.engine.try_borrow_mut() else {
            log::warn!("engine busy; event dropped");
            return;
        };
        f(&mut engine)
    };
    apply_effects(shared, effects);
}

fn apply_effects(shared: &Rc<Shared>, effects: Vec<Effect>) {
    for effect in effects {
        match effect {
            Effect::Content { window_id, action } => route_content(shared, window_id, action),
            Effect::PlaySound { sound } => {
                let settings = shared.engine.borrow().config.sounds.clone();
                play_sound(&settings, sound);
            }
            other => {
                let result = match shared.dom.try_borrow_mut() {
                    Ok(mut dom) => dom.apply(&other),
                    Err(_) => Err(DomError::Js("adapter busy".into())),
                };
                if let Err(e) = result {
                    log::warn!("failed to apply {:?}: {}", other, e);
                }
            }
        }
    }
}

fn route_content(shared: &Rc<Shared>, window_id: WindowId, action: ContentAction) {
    match action {
        ContentAction::Fetch { request } => {
            let weak = Rc::downgrade(shared);
            wasm_bindgen_futures::spawn_local(async move {
                let event = fetch::perform(request).await;
                if let Some(shared) = weak.upgrade() {
                    dispatch(&shared, |engine| engine.content_event(window_id, event, date_now()));
                }
            });
        }
        ContentAction::PlaySound { sound } => {
            let settings = shared.engine.borrow().config.sounds.clone();
            play_sound(&settings, sound);
        }
        other => forward_to_page(shared, window_id, &other),
    }
}

fn forward_to_page(shared: &Rc<Shared>, window_id: WindowId, action: &ContentAction) {
    let handler = shared.content_handler.borrow();
    let Some(handler) = handler.as_ref() else {
        log::debug!("no content handler; dropping action for window {}", window_id);
        return;
    };
    let json = match serde_json::to_string(action) {
        Ok(json) => json,
        Err(e) => {
            log::error!("failed to encode content action: {}", e);
            return;
        }
    };
    if let Err(e) = handler.call2(
        &JsValue::NULL,
        &JsValue::from_f64(window_id as f64),
        &JsValue::from_str(&json),
    ) {
        log::warn!("content handler threw: {:?}", e);
    }
}

fn play_sound(settings: &SoundSettings, sound: Sound) {
    let src = match sound {
        Sound::Start => &settings.start,
        Sound::Success => &settings.success,
        Sound::Error => &settings.error,
        Sound::Typing => &settings.typing,
    };
    let audio = match HtmlAudioElement::new_with_src(src) {
        Ok(audio) => audio,
        Err(e) => {
            log::debug!("audio unavailable: {:?}", e);
            return;
        }
    };
    audio.set_volume(settings.volume as f64);
    if let Ok(promise) = audio.play() {
        wasm_bindgen_futures::spawn_local(async move {
            // Autoplay policies may reject; sound is decorative
            if let Err(e) = wasm_bindgen_futures::JsFuture::from(promise).await {
                log::debug!("sound playback rejected: {:?}", e);
            }
        });
    }
}

/// Install the panic hook and console logger
#[wasm_bindgen(start)]
pub fn start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

/// Change the console log level ("error", "warn", "info", "debug", "trace")
#[wasm_bindgen(js_name = setLogLevel)]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let level: log::LevelFilter = level
        .parse()
        .map_err(|_| JsValue::from_str(&format!("unknown log level: {}", level)))?;
    logger::init(level);
    Ok(())
}

fn parse_kind(kind: &str) -> Result<WindowKind, JsValue> {
    serde_json::from_value(serde_json::Value::String(kind.to_string()))
        .map_err(|_| JsValue::from_str(&format!("unknown window kind: {}", kind)))
}

/// Desktop controller for WASM - wraps DesktopEngine and the DOM adapter
#[wasm_bindgen]
pub struct DesktopController {
    shared: Rc<Shared>,
}

#[wasm_bindgen]
impl DesktopController {
    /// Create a controller from a JSON page configuration (empty for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: &str, width: f32, height: f32) -> Result<DesktopController, JsValue> {
        let config = if config_json.trim().is_empty() {
            PageConfig::default()
        } else {
            PageConfig::from_json(config_json).map_err(|e| JsValue::from_str(&e.to_string()))?
        };
        let engine = DesktopEngine::new(config, Viewport::new(width, height));

        let shared = Rc::new_cyclic(|weak| Shared {
            engine: RefCell::new(engine),
            dom: RefCell::new(DomAdapter::new(weak.clone())),
            content_handler: RefCell::new(None),
        });
        log::info!("desktop controller ready ({}x{})", width, height);
        Ok(Self { shared })
    }

    // =========================================================================
    // Page integration
    // =========================================================================

    /// Set the callback receiving `(windowId, actionJson)` for content actions
    #[wasm_bindgen(js_name = setContentHandler)]
    pub fn set_content_handler(&self, handler: Function) {
        *self.shared.content_handler.borrow_mut() = Some(handler);
    }

    /// Deliver a JSON content event (media events, form submits, buttons)
    #[wasm_bindgen(js_name = contentEvent)]
    pub fn content_event(&self, window_id: u64, event_json: &str) -> Result<(), JsValue> {
        let event: ContentEvent =
            serde_json::from_str(event_json).map_err(|e| JsValue::from_str(&format!("bad event: {}", e)))?;
        dispatch(&self.shared, |engine| engine.content_event(window_id, event, date_now()));
        Ok(())
    }

    /// Fire due timers; call from the animation loop
    #[wasm_bindgen]
    pub fn tick(&self) {
        if let Ok(mut dom) = self.shared.dom.try_borrow_mut() {
            dom.flush_retired();
        }
        dispatch(&self.shared, |engine| engine.tick(date_now()));
    }

    /// Reload the current page with a clean cache, after a notice
    #[wasm_bindgen]
    pub fn refresh(&self) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let path = window.location().pathname()?;
        dispatch(&self.shared, |engine| engine.refresh(&path, date_now()));
        Ok(())
    }

    /// Resize the viewport
    #[wasm_bindgen]
    pub fn resize(&self, width: f32, height: f32) {
        dispatch(&self.shared, |engine| engine.resize_viewport(width, height));
    }

    // =========================================================================
    // Windows
    // =========================================================================

    /// Open (or reveal) a window of the given kind; returns its id
    #[wasm_bindgen]
    pub fn open(&self, kind: &str) -> Result<u64, JsValue> {
        let kind = parse_kind(kind)?;
        let mut opened = None;
        dispatch(&self.shared, |engine| {
            let (outcome, effects) = engine.open_kind(kind, date_now());
            opened = Some(outcome.id());
            effects
        });
        opened.ok_or_else(|| JsValue::from_str("engine busy"))
    }

    /// Open a message dialog; returns its id
    #[wasm_bindgen(js_name = showDialog)]
    pub fn show_dialog(&self, title: &str, message: &str) -> Result<u64, JsValue> {
        let mut opened = None;
        dispatch(&self.shared, |engine| {
            let (outcome, effects) = engine.show_dialog(title, message, date_now());
            opened = Some(outcome.id());
            effects
        });
        opened.ok_or_else(|| JsValue::from_str("engine busy"))
    }

    /// Close a window
    #[wasm_bindgen]
    pub fn close(&self, window_id: u64) {
        dispatch(&self.shared, |engine| engine.close_window(window_id, date_now()));
    }

    /// Close every window (page unload)
    #[wasm_bindgen(js_name = closeAll)]
    pub fn close_all(&self) {
        dispatch(&self.shared, |engine| engine.close_all(date_now()));
    }

    /// Get all windows as JSON
    #[wasm_bindgen(js_name = windowsJson)]
    pub fn windows_json(&self) -> String {
        let engine = self.shared.engine.borrow();
        let windows: Vec<_> = engine
            .windows()
            .iter()
            .map(|w| {
                serde_json::json!({
                    "id": w.id,
                    "kind": w.kind,
                    "title": w.title,
                    "state": w.state,
                    "zOrder": w.z_order,
                    "geometry": w.geometry,
                    "status": w.content().and_then(|c| c.status()),
                })
            })
            .collect();
        serde_json::to_string(&windows).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Expansion background for WASM - wraps Universe
#[wasm_bindgen]
pub struct UniverseController {
    universe: Universe,
}

#[wasm_bindgen]
impl UniverseController {
    /// Create from JSON parameters (empty for defaults)
    #[wasm_bindgen(constructor)]
    pub fn new(params_json: &str) -> Result<UniverseController, JsValue> {
        let params = if params_json.trim().is_empty() {
            ExpansionParams::default()
        } else {
            serde_json::from_str::<ExpansionParams>(params_json)
                .map_err(|e| JsValue::from_str(&format!("bad parameters: {}", e)))?
                .clamped()
        };
        Ok(Self {
            universe: Universe::new(params, rand::random()),
        })
    }

    /// Advance by `delta_s` seconds; returns JSON array of layers that appeared
    #[wasm_bindgen]
    pub fn step(&mut self, delta_s: f64) -> String {
        let added = self.universe.step(delta_s);
        serde_json::to_string(&added).unwrap_or_else(|_| "[]".to_string())
    }

    /// Particle positions as xyz triples
    #[wasm_bindgen]
    pub fn positions(&self) -> js_sys::Float32Array {
        js_sys::Float32Array::from(self.universe.positions())
    }

    /// Galaxy cluster positions, once the layer has appeared
    #[wasm_bindgen(js_name = galaxyPositions)]
    pub fn galaxy_positions(&self) -> Option<js_sys::Float32Array> {
        self.universe
            .galaxy()
            .map(|g| js_sys::Float32Array::from(g.positions.as_slice()))
    }

    /// Set a parameter by name; returns the clamped value applied
    #[wasm_bindgen(js_name = setParam)]
    pub fn set_param(&mut self, name: &str, value: f32) -> Result<f32, JsValue> {
        let param: AnimationParam = serde_json::from_value(serde_json::Value::String(name.to_string()))
            .map_err(|_| JsValue::from_str(&format!("unknown parameter: {}", name)))?;
        Ok(self.universe.set_param(param, value))
    }

    /// Current parameters, nebula and camera as JSON
    #[wasm_bindgen(js_name = stateJson)]
    pub fn state_json(&self) -> String {
        let camera = self.universe.camera();
        serde_json::to_string(&serde_json::json!({
            "params": self.universe.params(),
            "elapsed": self.universe.elapsed(),
            "nebula": self.universe.nebula(),
            "camera": {
                "position": camera.position(),
                "fov": camera.fov_deg,
            },
        }))
        .unwrap_or_else(|_| "{}".to_string())
    }
}
