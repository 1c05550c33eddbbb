//! Pointer event wiring.
//!
//! Pointer-down is captured on the gallery root; move/up/cancel live on the
//! window so a drag keeps tracking outside the element. A single pointer id
//! owns the session. Tap listeners sit on the tiles and route through the
//! controller's disambiguation before the host callback fires.

use crate::core::geometry::GalleryItem;
use crate::core::motion::{MotionController, PointerKind};
use crate::dom;
use crate::input::{pointer_root_px, VelocityTracker};
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys as web;

/// Listener registry that owns its closures, unlike a `forget()`-style
/// registration, so teardown can unhook everything it added.
#[derive(Default)]
pub struct Listeners {
    entries: Vec<(web::EventTarget, &'static str, js_sys::Function)>,
    closures: Vec<Closure<dyn FnMut(web::Event)>>,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(
        &mut self,
        target: &web::EventTarget,
        event: &'static str,
        closure: Closure<dyn FnMut(web::Event)>,
    ) {
        let function: js_sys::Function = closure.as_ref().unchecked_ref::<js_sys::Function>().clone();
        _ = target.add_event_listener_with_callback(event, &function);
        self.entries.push((target.clone(), event, function));
        self.closures.push(closure);
    }

    pub fn remove_all(&mut self) {
        for (target, event, function) in self.entries.drain(..) {
            _ = target.remove_event_listener_with_callback(event, &function);
        }
        self.closures.clear();
    }
}

impl Drop for Listeners {
    fn drop(&mut self) {
        self.remove_all();
    }
}

/// Shared handles cloned into every pointer closure.
#[derive(Clone)]
pub struct InputWiring {
    pub root: web::HtmlElement,
    pub controller: Rc<RefCell<MotionController>>,
    pub sphere: Rc<RefCell<Option<web::HtmlElement>>>,
    pub velocity: Rc<RefCell<VelocityTracker>>,
    pub active_pointer: Rc<Cell<Option<i32>>>,
    pub items: Rc<RefCell<Vec<GalleryItem>>>,
    pub payloads: Rc<RefCell<Vec<JsValue>>>,
    pub on_tap: Rc<RefCell<Option<js_sys::Function>>>,
    pub epoch: Instant,
}

impl InputWiring {
    #[inline]
    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }
}

pub fn wire_input_handlers(w: &InputWiring, listeners: &mut Listeners) {
    wire_pointerdown(w, listeners);
    wire_pointermove(w, listeners);
    wire_pointerup(w, listeners);
    wire_pointercancel(w, listeners);
}

fn wire_pointerdown(w: &InputWiring, listeners: &mut Listeners) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let ev: &web::PointerEvent = ev.unchecked_ref();
        if w.active_pointer.get().is_some() {
            return;
        }
        let pos = pointer_root_px(ev, &w.root);
        if !w.controller.borrow_mut().drag_start(pos) {
            return;
        }
        w.active_pointer.set(Some(ev.pointer_id()));
        {
            let mut velocity = w.velocity.borrow_mut();
            velocity.clear();
            velocity.push(pos, w.now_ms());
        }
        _ = w.root.set_pointer_capture(ev.pointer_id());
        if let Some(document) = dom::window_document() {
            dom::lock_body_scroll(&document);
        }
        ev.prevent_default();
    }) as Box<dyn FnMut(web::Event)>);
    listeners.add(w.root.as_ref(), "pointerdown", closure);
}

fn wire_pointermove(w: &InputWiring, listeners: &mut Listeners) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let ev: &web::PointerEvent = ev.unchecked_ref();
        if w.active_pointer.get() != Some(ev.pointer_id()) {
            return;
        }
        let pos = pointer_root_px(ev, &w.root);
        w.velocity.borrow_mut().push(pos, w.now_ms());
        let moved = w.controller.borrow_mut().drag_move(pos);
        if moved {
            let rotation = w.controller.borrow().rotation();
            dom::apply_sphere_transform(w.sphere.borrow().as_ref(), rotation);
        }
    }) as Box<dyn FnMut(web::Event)>);
    if let Some(window) = web::window() {
        listeners.add(window.as_ref(), "pointermove", closure);
    }
}

fn wire_pointerup(w: &InputWiring, listeners: &mut Listeners) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let ev: &web::PointerEvent = ev.unchecked_ref();
        if w.active_pointer.get() != Some(ev.pointer_id()) {
            return;
        }
        w.active_pointer.set(None);
        let pos = pointer_root_px(ev, &w.root);
        let now = w.now_ms();
        let release_velocity = {
            let mut velocity = w.velocity.borrow_mut();
            velocity.push(pos, now);
            velocity.release_velocity()
        };
        w.controller.borrow_mut().drag_end(pos, release_velocity, now);
        if let Some(document) = dom::window_document() {
            dom::unlock_body_scroll(&document);
        }
    }) as Box<dyn FnMut(web::Event)>);
    if let Some(window) = web::window() {
        listeners.add(window.as_ref(), "pointerup", closure);
    }
}

fn wire_pointercancel(w: &InputWiring, listeners: &mut Listeners) {
    let w = w.clone();
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        let ev: &web::PointerEvent = ev.unchecked_ref();
        if w.active_pointer.get() != Some(ev.pointer_id()) {
            return;
        }
        w.active_pointer.set(None);
        let pos = pointer_root_px(ev, &w.root);
        // No coast after a cancelled gesture.
        w.controller
            .borrow_mut()
            .drag_end(pos, glam::DVec2::ZERO, w.now_ms());
        if let Some(document) = dom::window_document() {
            dom::unlock_body_scroll(&document);
        }
    }) as Box<dyn FnMut(web::Event)>);
    if let Some(window) = web::window() {
        listeners.add(window.as_ref(), "pointercancel", closure);
    }
}

/// Attach tap listeners to each tile. Touch and pen fire on the release
/// itself; mouse fires on click. The controller de-duplicates the
/// synthesized click that follows a handled touch release.
pub fn wire_tile_taps(w: &InputWiring, listeners: &mut Listeners, tiles: &[web::HtmlElement]) {
    for (index, tile) in tiles.iter().enumerate() {
        let wu = w.clone();
        let up = Closure::wrap(Box::new(move |ev: web::Event| {
            let ev: &web::PointerEvent = ev.unchecked_ref();
            let kind = pointer_kind(&ev.pointer_type());
            let now = wu.now_ms();
            if wu.controller.borrow_mut().tap_on_pointer_up(kind, now) {
                fire_tap(&wu, index);
            }
        }) as Box<dyn FnMut(web::Event)>);
        listeners.add(tile.as_ref(), "pointerup", up);

        let wc = w.clone();
        let click = Closure::wrap(Box::new(move |ev: web::Event| {
            let kind = ev
                .dyn_ref::<web::PointerEvent>()
                .map(|p| pointer_kind(&p.pointer_type()))
                .unwrap_or(PointerKind::Mouse);
            let now = wc.now_ms();
            if wc.controller.borrow_mut().tap_on_click(kind, now) {
                fire_tap(&wc, index);
            }
        }) as Box<dyn FnMut(web::Event)>);
        listeners.add(tile.as_ref(), "click", click);
    }
}

fn pointer_kind(pointer_type: &str) -> PointerKind {
    match pointer_type {
        "touch" => PointerKind::Touch,
        "pen" => PointerKind::Pen,
        _ => PointerKind::Mouse,
    }
}

fn fire_tap(w: &InputWiring, index: usize) {
    let Some(callback) = w.on_tap.borrow().clone() else {
        return;
    };
    let (image, source_index) = {
        let items = w.items.borrow();
        let Some(item) = items.get(index) else {
            return;
        };
        (item.image.clone(), item.source_index)
    };

    let detail = js_sys::Object::new();
    _ = js_sys::Reflect::set(&detail, &"index".into(), &JsValue::from_f64(index as f64));
    _ = js_sys::Reflect::set(&detail, &"src".into(), &JsValue::from_str(&image.url));
    if let Some(alt) = &image.alt {
        _ = js_sys::Reflect::set(&detail, &"alt".into(), &JsValue::from_str(alt));
    }
    if let Some(id) = &image.id {
        _ = js_sys::Reflect::set(&detail, &"id".into(), &JsValue::from_str(id));
    }
    let payload = source_index
        .and_then(|i| w.payloads.borrow().get(i).cloned())
        .unwrap_or(JsValue::NULL);
    _ = js_sys::Reflect::set(&detail, &"payload".into(), &payload);

    log::info!("[tap] item {}", index);
    if let Err(e) = callback.call1(&JsValue::NULL, &detail) {
        log::warn!("tap callback failed: {:?}", e);
    }
}
