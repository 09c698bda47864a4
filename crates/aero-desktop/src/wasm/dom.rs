//! DOM adapter - applies engine effects to the document
//!
//! Each window is rendered as:
//!
//! ```text
//! div.aero-overlay#aero-window-{id}-overlay      (dialogs only)
//! div.window.{kind class}#aero-window-{id}
//!   div.title-bar
//!     div.title-bar-text
//!     div.title-bar-controls > button[aria-label] x3
//!   div.window-body#aero-window-{id}-body
//!   div.resize-handle.resize-{dir}                (resizable kinds, x8)
//! ```
//!
//! Listener closures are owned here. A closure may be the one currently
//! running when its window is torn down, so removed closures are retired
//! and only dropped from [`DomAdapter::flush_retired`], which runs outside
//! any listener.

use std::collections::HashMap;
use std::rc::Weak;

use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, MouseEvent};

use crate::math::{Rect, CHROME_STYLE};
use crate::window::{Effect, GestureKind, PointerTarget, ResizeDirection, TitleButton, WindowId, WindowKind};
use super::{dispatch, date_now, Shared};

type MouseClosure = Closure<dyn FnMut(MouseEvent)>;

/// DOM adapter failures
#[derive(Debug, Error)]
pub enum DomError {
    #[error("no global window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("no element for window {0}")]
    MissingElement(WindowId),
    #[error("DOM call failed: {0}")]
    Js(String),
}

impl From<JsValue> for DomError {
    fn from(value: JsValue) -> Self {
        DomError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}

impl From<DomError> for JsValue {
    fn from(e: DomError) -> Self {
        JsValue::from_str(&e.to_string())
    }
}

fn document() -> Result<Document, DomError> {
    web_sys::window()
        .ok_or(DomError::NoWindow)?
        .document()
        .ok_or(DomError::NoDocument)
}

fn html_element(doc: &Document, tag: &str, class: &str) -> Result<HtmlElement, DomError> {
    let element: HtmlElement = doc.create_element(tag)?.dyn_into().map_err(|_| DomError::Js(tag.to_string()))?;
    element.set_class_name(class);
    Ok(element)
}

fn listen(target: &Element, event: &str, closure: &MouseClosure) -> Result<(), DomError> {
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    Ok(())
}

/// Elements and listeners of one window
struct WindowElements {
    root: HtmlElement,
    title_bar: HtmlElement,
    overlay: Option<HtmlElement>,
    handles: Vec<(HtmlElement, MouseClosure)>,
    closures: Vec<MouseClosure>,
}

/// Document-level pointer-move/pointer-up pair of the active gesture
struct DocumentListenerSet {
    window_id: WindowId,
    on_move: MouseClosure,
    on_up: MouseClosure,
}

/// Applies effects to the live document
pub(super) struct DomAdapter {
    shared: Weak<Shared>,
    windows: HashMap<WindowId, WindowElements>,
    document_listeners: Option<DocumentListenerSet>,
    retired: Vec<MouseClosure>,
}

impl DomAdapter {
    pub fn new(shared: Weak<Shared>) -> Self {
        Self {
            shared,
            windows: HashMap::new(),
            document_listeners: None,
            retired: Vec::new(),
        }
    }

    /// Drop closures removed from the document
    pub fn flush_retired(&mut self) {
        self.retired.clear();
    }

    /// Closure that routes a mouse event into the engine
    fn handler<F>(&self, mut f: F) -> MouseClosure
    where
        F: FnMut(&mut crate::DesktopEngine, &MouseEvent) -> Vec<Effect> + 'static,
    {
        let shared = self.shared.clone();
        Closure::wrap(Box::new(move |event: MouseEvent| {
            if let Some(shared) = shared.upgrade() {
                dispatch(&shared, |engine| f(engine, &event));
            }
        }) as Box<dyn FnMut(MouseEvent)>)
    }

    fn window(&self, id: WindowId) -> Result<&WindowElements, DomError> {
        self.windows.get(&id).ok_or(DomError::MissingElement(id))
    }

    /// Apply a single non-content effect
    pub fn apply(&mut self, effect: &Effect) -> Result<(), DomError> {
        match effect {
            Effect::CreateElement {
                window_id,
                kind,
                title,
                maximize_enabled,
            } => self.create_element(*window_id, *kind, title, *maximize_enabled),
            Effect::SetVisible { window_id, visible } => {
                let w = self.window(*window_id)?;
                let display = if *visible { "" } else { "none" };
                w.root.style().set_property("display", display)?;
                if let Some(overlay) = &w.overlay {
                    overlay.style().set_property("display", display)?;
                }
                Ok(())
            }
            Effect::SetMinimized { window_id, minimized } => {
                let w = self.window(*window_id)?;
                w.root.class_list().toggle_with_force("minimized", *minimized)?;
                Ok(())
            }
            Effect::SetMaximized { window_id, maximized } => {
                let w = self.window(*window_id)?;
                w.root.class_list().toggle_with_force("maximized", *maximized)?;
                Ok(())
            }
            Effect::SetGeometry {
                window_id,
                rect,
                centered,
            } => self.set_geometry(*window_id, rect, *centered),
            Effect::SetZOrder { window_id, z_order } => {
                let w = self.window(*window_id)?;
                w.root.style().set_property("z-index", &z_order.to_string())?;
                if let Some(overlay) = &w.overlay {
                    overlay.style().set_property("z-index", &z_order.saturating_sub(1).to_string())?;
                }
                Ok(())
            }
            Effect::InstallResizeHandles { window_id } => self.install_handles(*window_id),
            Effect::RemoveResizeHandles { window_id } => {
                if let Some(w) = self.windows.get_mut(window_id) {
                    for (handle, closure) in w.handles.drain(..) {
                        handle.remove();
                        self.retired.push(closure);
                    }
                }
                Ok(())
            }
            Effect::AttachDocumentListeners { window_id, gesture } => self.attach_document(*window_id, *gesture),
            Effect::DetachDocumentListeners { window_id } => {
                self.detach_document(*window_id);
                Ok(())
            }
            Effect::SetDragCursor { window_id, grabbing } => {
                let w = self.window(*window_id)?;
                let cursor = if *grabbing { "grabbing" } else { "move" };
                w.title_bar.style().set_property("cursor", cursor)?;
                Ok(())
            }
            Effect::RemoveElement { window_id } => {
                if let Some(w) = self.windows.remove(window_id) {
                    w.root.remove();
                    if let Some(overlay) = &w.overlay {
                        overlay.remove();
                    }
                    self.retired.extend(w.closures);
                    for (handle, closure) in w.handles {
                        handle.remove();
                        self.retired.push(closure);
                    }
                }
                Ok(())
            }
            Effect::BlockPointerEvents { duration_ms } => block_pointer_events(*duration_ms),
            Effect::Reload { url } => {
                let window = web_sys::window().ok_or(DomError::NoWindow)?;
                window.location().set_href(url)?;
                Ok(())
            }
            Effect::Content { .. } | Effect::PlaySound { .. } => Ok(()),
        }
    }

    fn create_element(&mut self, id: WindowId, kind: WindowKind, title: &str, maximize_enabled: bool) -> Result<(), DomError> {
        let doc = document()?;
        let body = doc.body().ok_or(DomError::NoDocument)?;
        let mut closures = Vec::new();

        let overlay = if kind == WindowKind::Dialog {
            let overlay = html_element(&doc, "div", "aero-overlay")?;
            overlay.set_id(&format!("aero-window-{}-overlay", id));
            let on_click = self.handler(move |engine, event| {
                // Only clicks on the overlay itself, not bubbled ones
                let on_self = match (event.target(), event.current_target()) {
                    (Some(t), Some(c)) => t == c,
                    _ => false,
                };
                if on_self {
                    engine.click_overlay(id, date_now())
                } else {
                    Vec::new()
                }
            });
            listen(&overlay, "click", &on_click)?;
            closures.push(on_click);
            body.append_child(&overlay)?;
            Some(overlay)
        } else {
            None
        };

        let root = html_element(&doc, "div", &format!("window {}", kind.css_class()))?;
        root.set_id(&format!("aero-window-{}", id));
        root.set_attribute("data-window-id", &id.to_string())?;

        let title_bar = html_element(&doc, "div", "title-bar")?;
        let text = html_element(&doc, "div", "title-bar-text")?;
        text.set_text_content(Some(title));
        title_bar.append_child(&text)?;

        let controls = html_element(&doc, "div", "title-bar-controls")?;
        for button in [TitleButton::Minimize, TitleButton::Maximize, TitleButton::Close] {
            let label = match button {
                TitleButton::Minimize => "Minimize",
                TitleButton::Maximize => "Maximize",
                TitleButton::Close => "Close",
            };
            let element: HtmlButtonElement = doc
                .create_element("button")?
                .dyn_into()
                .map_err(|_| DomError::Js("button".into()))?;
            element.set_attribute("aria-label", label)?;
            if button == TitleButton::Maximize && !maximize_enabled {
                element.set_disabled(true);
            }
            let on_click = self.handler(move |engine, event| {
                event.stop_propagation();
                let Some(button) = event
                    .current_target()
                    .and_then(|t| t.dyn_into::<Element>().ok())
                    .and_then(|el| el.get_attribute("aria-label"))
                    .and_then(|label| TitleButton::from_aria_label(&label))
                else {
                    return Vec::new();
                };
                engine.click_button(id, button, date_now())
            });
            listen(&element, "click", &on_click)?;
            closures.push(on_click);
            controls.append_child(&element)?;
        }
        title_bar.append_child(&controls)?;

        let on_down = self.handler(move |engine, event| {
            // Buttons handle their own clicks
            let on_button = event
                .target()
                .and_then(|t| t.dyn_into::<Element>().ok())
                .and_then(|el| el.closest("button").ok().flatten())
                .is_some();
            if on_button || event.button() != 0 {
                return Vec::new();
            }
            event.prevent_default();
            event.stop_propagation();
            engine.pointer_down(
                id,
                PointerTarget::TitleBar,
                event.client_x() as f32,
                event.client_y() as f32,
                date_now(),
            )
        });
        listen(&title_bar, "mousedown", &on_down)?;
        closures.push(on_down);

        // Focus on any press inside the window
        let on_focus = self.handler(move |engine, _| engine.focus(id));
        listen(&root, "mousedown", &on_focus)?;
        closures.push(on_focus);

        let window_body = html_element(&doc, "div", "window-body")?;
        window_body.set_id(&format!("aero-window-{}-body", id));

        root.append_child(&title_bar)?;
        root.append_child(&window_body)?;
        body.append_child(&root)?;

        self.windows.insert(
            id,
            WindowElements {
                root,
                title_bar,
                overlay,
                handles: Vec::new(),
                closures,
            },
        );
        log::debug!("created element for window {} ({:?})", id, kind);
        Ok(())
    }

    fn set_geometry(&self, id: WindowId, rect: &Rect, centered: bool) -> Result<(), DomError> {
        let style = self.window(id)?.root.style();
        if centered {
            style.set_property("left", "50%")?;
            style.set_property("top", "50%")?;
            style.set_property("transform", "translate(-50%, -50%)")?;
        } else {
            style.set_property("left", &format!("{}px", rect.x))?;
            style.set_property("top", &format!("{}px", rect.y))?;
            style.set_property("transform", "none")?;
        }
        style.set_property("width", &format!("{}px", rect.width))?;
        style.set_property("height", &format!("{}px", rect.height))?;
        Ok(())
    }

    fn install_handles(&mut self, id: WindowId) -> Result<(), DomError> {
        let doc = document()?;
        let mut created = Vec::with_capacity(ResizeDirection::ALL.len());
        for direction in ResizeDirection::ALL {
            let handle = html_element(&doc, "div", &format!("resize-handle resize-{}", direction.as_str()))?;
            let style = handle.style();
            style.set_property("position", "absolute")?;
            style.set_property("cursor", direction.cursor())?;
            let edge = format!("{}px", CHROME_STYLE.edge_handle);
            let corner = format!("{}px", CHROME_STYLE.corner_handle);
            let outset = format!("-{}px", CHROME_STYLE.handle_outset);
            if direction.is_corner() {
                style.set_property("width", &corner)?;
                style.set_property("height", &corner)?;
            } else if direction.moves_top() || direction.moves_bottom() {
                style.set_property("left", &corner)?;
                style.set_property("right", &corner)?;
                style.set_property("height", &edge)?;
            } else {
                style.set_property("top", &corner)?;
                style.set_property("bottom", &corner)?;
                style.set_property("width", &edge)?;
            }
            if direction.moves_top() {
                style.set_property("top", &outset)?;
            }
            if direction.moves_bottom() {
                style.set_property("bottom", &outset)?;
            }
            if direction.moves_left() {
                style.set_property("left", &outset)?;
            }
            if direction.moves_right() {
                style.set_property("right", &outset)?;
            }

            let on_down = self.handler(move |engine, event| {
                if event.button() != 0 {
                    return Vec::new();
                }
                event.prevent_default();
                event.stop_propagation();
                engine.pointer_down(
                    id,
                    PointerTarget::ResizeHandle(direction),
                    event.client_x() as f32,
                    event.client_y() as f32,
                    date_now(),
                )
            });
            listen(&handle, "mousedown", &on_down)?;
            created.push((handle, on_down));
        }

        let w = self.windows.get_mut(&id).ok_or(DomError::MissingElement(id))?;
        for (handle, _) in &created {
            w.root.append_child(handle)?;
        }
        w.handles.extend(created);
        Ok(())
    }

    fn attach_document(&mut self, id: WindowId, gesture: GestureKind) -> Result<(), DomError> {
        let doc = document()?;
        // The engine detaches first when a gesture is replaced; be safe anyway
        self.detach_document(id);

        let on_move = self.handler(|engine, event| engine.pointer_move(event.client_x() as f32, event.client_y() as f32));
        let on_up = self.handler(|engine, _| engine.pointer_up());
        let target: &web_sys::EventTarget = doc.as_ref();
        target.add_event_listener_with_callback("mousemove", on_move.as_ref().unchecked_ref())?;
        target.add_event_listener_with_callback("mouseup", on_up.as_ref().unchecked_ref())?;

        log::trace!("document listeners attached for {:?} on window {}", gesture, id);
        self.document_listeners = Some(DocumentListenerSet {
            window_id: id,
            on_move,
            on_up,
        });
        Ok(())
    }

    fn detach_document(&mut self, id: WindowId) {
        let Some(set) = self.document_listeners.take() else {
            return;
        };
        if set.window_id != id {
            log::debug!("detaching listeners of window {} on behalf of {}", set.window_id, id);
        }
        if let Ok(doc) = document() {
            let target: &web_sys::EventTarget = doc.as_ref();
            let _ = target.remove_event_listener_with_callback("mousemove", set.on_move.as_ref().unchecked_ref());
            let _ = target.remove_event_listener_with_callback("mouseup", set.on_up.as_ref().unchecked_ref());
        }
        self.retired.push(set.on_move);
        self.retired.push(set.on_up);
    }
}

fn block_pointer_events(duration_ms: f64) -> Result<(), DomError> {
    let window = web_sys::window().ok_or(DomError::NoWindow)?;
    let body = document()?.body().ok_or(DomError::NoDocument)?;
    body.style().set_property("pointer-events", "none")?;

    let restore = Closure::once_into_js(move || {
        let _ = body.style().remove_property("pointer-events");
    });
    window.set_timeout_with_callback_and_timeout_and_arguments_0(restore.unchecked_ref(), duration_ms as i32)?;
    Ok(())
}
