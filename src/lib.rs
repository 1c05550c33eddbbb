#![cfg(target_arch = "wasm32")]
//! Interactive spherical image gallery for the web.
//!
//! Images are arranged on the inside of a virtual sphere; the user rotates
//! it by dragging, releases into a decaying coast, and an optional
//! autopilot keeps it turning while idle. Taps on individual tiles are
//! disambiguated from drags and reported to the host with the tile's
//! payload. The simulation lives in `core` and is platform-free; this
//! crate's shell wires browser pointer events and a requestAnimationFrame
//! loop into it.

use anyhow::anyhow;
use fnv::FnvHashSet;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys as web;

mod constants;
mod core;
mod dom;
mod events;
mod frame;
mod input;

use crate::constants::{DEFAULT_FIT, DEFAULT_SEGMENTS, MAX_RADIUS_PX, MIN_RADIUS_PX};
use crate::core::geometry::{self, GalleryItem, ImageRef};
use crate::core::motion::{MotionController, MotionTuning};

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    Ok(())
}

struct GalleryOptions {
    tuning: MotionTuning,
    segments: u32,
    fit: f64,
    min_radius: f64,
    max_radius: f64,
    images: Vec<ImageRef>,
    payloads: Vec<JsValue>,
}

fn get_f64(raw: &JsValue, key: &str) -> Option<f64> {
    js_sys::Reflect::get(raw, &key.into()).ok().and_then(|v| v.as_f64())
}

fn get_bool(raw: &JsValue, key: &str) -> Option<bool> {
    js_sys::Reflect::get(raw, &key.into()).ok().and_then(|v| v.as_bool())
}

fn get_string(raw: &JsValue, key: &str) -> Option<String> {
    js_sys::Reflect::get(raw, &key.into()).ok().and_then(|v| v.as_string())
}

fn parse_options(raw: &JsValue) -> GalleryOptions {
    let mut opts = GalleryOptions {
        tuning: MotionTuning::default(),
        segments: DEFAULT_SEGMENTS,
        fit: DEFAULT_FIT,
        min_radius: MIN_RADIUS_PX,
        max_radius: MAX_RADIUS_PX,
        images: Vec::new(),
        payloads: Vec::new(),
    };
    if !raw.is_object() {
        return opts;
    }
    if let Some(v) = get_f64(raw, "segments") {
        opts.segments = v.max(0.0) as u32;
    }
    if let Some(v) = get_f64(raw, "dragSensitivity") {
        opts.tuning.drag_sensitivity = v;
    }
    if let Some(v) = get_f64(raw, "dampening") {
        opts.tuning.dampening = v;
    }
    if let Some(v) = get_f64(raw, "maxPitch") {
        opts.tuning.max_pitch_deg = v;
    }
    if let Some(v) = get_bool(raw, "autoRotate") {
        opts.tuning.auto_rotate = v;
    }
    if let Some(v) = get_f64(raw, "autoRotateSpeed") {
        opts.tuning.auto_rotate_speed = v;
    }
    if let Some(v) = get_f64(raw, "fit") {
        if v.is_finite() && v > 0.0 {
            opts.fit = v;
        }
    }
    if let Some(v) = get_f64(raw, "minRadius") {
        if v.is_finite() && v > 0.0 {
            opts.min_radius = v;
        }
    }
    if let Some(v) = get_f64(raw, "maxRadius") {
        if v.is_finite() && v > 0.0 {
            opts.max_radius = v.max(opts.min_radius);
        }
    }
    if let Ok(v) = js_sys::Reflect::get(raw, &"images".into()) {
        let (images, payloads) = parse_images(&v);
        opts.images = images;
        opts.payloads = payloads;
    }
    opts
}

// Accepts either plain URL strings or `{ src, alt, id, payload }` records.
fn parse_images(value: &JsValue) -> (Vec<ImageRef>, Vec<JsValue>) {
    let mut images = Vec::new();
    let mut payloads = Vec::new();
    if !js_sys::Array::is_array(value) {
        return (images, payloads);
    }
    for entry in js_sys::Array::from(value).iter() {
        if let Some(url) = entry.as_string() {
            images.push(ImageRef {
                url,
                alt: None,
                id: None,
            });
            payloads.push(JsValue::NULL);
        } else if entry.is_object() {
            let url = get_string(&entry, "src")
                .or_else(|| get_string(&entry, "url"))
                .unwrap_or_default();
            let alt = get_string(&entry, "alt");
            let id = get_string(&entry, "id");
            let payload = js_sys::Reflect::get(&entry, &"payload".into()).unwrap_or(JsValue::NULL);
            images.push(ImageRef { url, alt, id });
            payloads.push(payload);
        }
    }
    (images, payloads)
}

/// Everything the resize path needs to re-fit the sphere to its viewport.
#[derive(Clone)]
struct LayoutState {
    root: web::HtmlElement,
    tiles: Rc<RefCell<Vec<web::HtmlElement>>>,
    items: Rc<RefCell<Vec<GalleryItem>>>,
    radius: Rc<Cell<f64>>,
    segments: Rc<Cell<u32>>,
    fit: f64,
    min_radius: f64,
    max_radius: f64,
}

impl LayoutState {
    fn refresh(&self) {
        let rect = self.root.get_bounding_client_rect();
        let base = rect.width().min(rect.height());
        let radius = (base * self.fit).clamp(self.min_radius, self.max_radius);
        self.radius.set(radius);
        let items = self.items.borrow();
        let tiles = self.tiles.borrow();
        let segments = self.segments.get();
        for (el, item) in tiles.iter().zip(items.iter()) {
            dom::position_tile(el, item.slot, segments, radius);
        }
    }
}

fn wire_resize(layout: LayoutState, listeners: &mut events::Listeners) {
    if let Some(window) = web::window() {
        let closure = wasm_bindgen::closure::Closure::wrap(Box::new(move |_ev: web::Event| {
            layout.refresh();
        }) as Box<dyn FnMut(web::Event)>);
        listeners.add(window.as_ref(), "resize", closure);
    }
}

#[wasm_bindgen]
pub struct SphereGallery {
    controller: Rc<RefCell<MotionController>>,
    sphere: Rc<RefCell<Option<web::HtmlElement>>>,
    items: Rc<RefCell<Vec<GalleryItem>>>,
    payloads: Rc<RefCell<Vec<JsValue>>>,
    tiles: Rc<RefCell<Vec<web::HtmlElement>>>,
    highlighted: Rc<RefCell<FnvHashSet<String>>>,
    on_tap: Rc<RefCell<Option<js_sys::Function>>>,
    listeners: Rc<RefCell<events::Listeners>>,
    tile_listeners: Rc<RefCell<events::Listeners>>,
    loop_handle: frame::FrameLoop,
    layout: LayoutState,
    wiring: events::InputWiring,
    destroyed: Cell<bool>,
}

#[wasm_bindgen]
impl SphereGallery {
    /// Mount the gallery under the element with the given id. `options`
    /// is a plain object; unknown or malformed fields fall back to
    /// defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(root_id: &str, options: &JsValue) -> Result<SphereGallery, JsValue> {
        Self::init(root_id, options).map_err(|e| JsValue::from_str(&format!("{e:#}")))
    }

    fn init(root_id: &str, options: &JsValue) -> anyhow::Result<SphereGallery> {
        let document = dom::window_document().ok_or_else(|| anyhow!("no window/document"))?;
        let root: web::HtmlElement = document
            .get_element_by_id(root_id)
            .ok_or_else(|| anyhow!("missing gallery root #{root_id}"))?
            .dyn_into()
            .map_err(|_| anyhow!("#{root_id} is not an HTML element"))?;

        let opts = parse_options(options);
        let built = geometry::build_items(&opts.images, opts.segments);
        log::info!(
            "[gallery] {} slots across {} segments ({} adjacent duplicates)",
            built.len(),
            opts.segments,
            geometry::adjacent_duplicate_pairs(&built)
        );

        let controller = Rc::new(RefCell::new(MotionController::new(opts.tuning)));
        let items = Rc::new(RefCell::new(built));
        let payloads = Rc::new(RefCell::new(opts.payloads));
        let sphere_el =
            dom::build_sphere(&document, &root).ok_or_else(|| anyhow!("failed to build sphere element"))?;
        let sphere = Rc::new(RefCell::new(Some(sphere_el)));
        let tiles = Rc::new(RefCell::new(Vec::new()));
        let radius = Rc::new(Cell::new(opts.min_radius));
        let segments = Rc::new(Cell::new(opts.segments));
        let on_tap: Rc<RefCell<Option<js_sys::Function>>> = Rc::new(RefCell::new(None));

        let layout = LayoutState {
            root: root.clone(),
            tiles: tiles.clone(),
            items: items.clone(),
            radius: radius.clone(),
            segments: segments.clone(),
            fit: opts.fit,
            min_radius: opts.min_radius,
            max_radius: opts.max_radius,
        };

        let wiring = events::InputWiring {
            root: root.clone(),
            controller: controller.clone(),
            sphere: sphere.clone(),
            velocity: Rc::new(RefCell::new(input::VelocityTracker::default())),
            active_pointer: Rc::new(Cell::new(None)),
            items: items.clone(),
            payloads: payloads.clone(),
            on_tap: on_tap.clone(),
            epoch: Instant::now(),
        };

        let mut listeners = events::Listeners::new();
        events::wire_input_handlers(&wiring, &mut listeners);
        wire_resize(layout.clone(), &mut listeners);

        let gallery = SphereGallery {
            controller: controller.clone(),
            sphere: sphere.clone(),
            items,
            payloads,
            tiles,
            highlighted: Rc::new(RefCell::new(FnvHashSet::default())),
            on_tap,
            listeners: Rc::new(RefCell::new(listeners)),
            tile_listeners: Rc::new(RefCell::new(events::Listeners::new())),
            loop_handle: frame::start_loop(Rc::new(RefCell::new(frame::FrameContext {
                controller,
                sphere,
                last_instant: Instant::now(),
            }))),
            layout,
            wiring,
            destroyed: Cell::new(false),
        };

        gallery.rebuild_tiles(&document);
        Ok(gallery)
    }

    /// Replace the image pool; slots are reassigned deterministically.
    #[wasm_bindgen(js_name = setImages)]
    pub fn set_images(&self, images: &JsValue) {
        if self.destroyed.get() {
            return;
        }
        let (parsed, payloads) = parse_images(images);
        let segments = self.layout.segments.get();
        *self.items.borrow_mut() = geometry::build_items(&parsed, segments);
        *self.payloads.borrow_mut() = payloads;
        if let Some(document) = dom::window_document() {
            self.rebuild_tiles(&document);
        }
    }

    /// Host-controlled focus flag; while set, drags are suppressed.
    #[wasm_bindgen(js_name = setFocused)]
    pub fn set_focused(&self, focused: bool) {
        self.controller.borrow_mut().set_focused(focused);
    }

    #[wasm_bindgen(js_name = setAutoRotate)]
    pub fn set_auto_rotate(&self, enabled: bool) {
        self.controller.borrow_mut().set_auto_rotate(enabled);
    }

    /// Ids whose tiles get the highlighted class. Membership test only.
    #[wasm_bindgen(js_name = setHighlighted)]
    pub fn set_highlighted(&self, ids: &JsValue) {
        let mut set = FnvHashSet::default();
        if js_sys::Array::is_array(ids) {
            for entry in js_sys::Array::from(ids).iter() {
                if let Some(id) = entry.as_string() {
                    set.insert(id);
                }
            }
        }
        *self.highlighted.borrow_mut() = set;
        self.apply_highlights();
    }

    /// Register the per-item tap callback. Pass `undefined` to clear.
    #[wasm_bindgen(js_name = onTap)]
    pub fn on_tap(&self, callback: Option<js_sys::Function>) {
        *self.on_tap.borrow_mut() = callback;
    }

    /// Current orientation as `{ pitch, yaw }` degrees, for minimap or
    /// debug consumers.
    pub fn rotation(&self) -> JsValue {
        let rotation = self.controller.borrow().rotation();
        let obj = js_sys::Object::new();
        _ = js_sys::Reflect::set(&obj, &"pitch".into(), &JsValue::from_f64(rotation.pitch_deg));
        _ = js_sys::Reflect::set(&obj, &"yaw".into(), &JsValue::from_f64(rotation.yaw_deg));
        obj.into()
    }

    /// Restore the initial orientation (ignored while a drag is live).
    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&self) {
        let rotation = self.controller.borrow_mut().reset_view();
        dom::apply_sphere_transform(self.sphere.borrow().as_ref(), rotation);
    }

    /// Tear the gallery down: cancel the frame loop, remove every
    /// listener, release the scroll lock, and detach the sphere element.
    /// Idempotent.
    pub fn destroy(&self) {
        if self.destroyed.replace(true) {
            return;
        }
        self.loop_handle.cancel();
        self.listeners.borrow_mut().remove_all();
        self.tile_listeners.borrow_mut().remove_all();
        if let Some(document) = dom::window_document() {
            dom::unlock_body_scroll(&document);
        }
        if let Some(sphere) = self.sphere.borrow_mut().take() {
            sphere.remove();
        }
        self.tiles.borrow_mut().clear();
        log::info!("[gallery] destroyed");
    }
}

impl SphereGallery {
    fn rebuild_tiles(&self, document: &web::Document) {
        let Some(sphere) = self.sphere.borrow().clone() else {
            return;
        };
        dom::clear_children(&sphere);
        self.layout.refresh();
        let segments = self.layout.segments.get();
        let radius = self.layout.radius.get();
        let new_tiles = dom::build_tiles(document, &sphere, &self.items.borrow(), segments, radius);

        let mut tile_listeners = events::Listeners::new();
        events::wire_tile_taps(&self.wiring, &mut tile_listeners, &new_tiles);
        *self.tile_listeners.borrow_mut() = tile_listeners;
        *self.tiles.borrow_mut() = new_tiles;
        self.apply_highlights();
        dom::apply_sphere_transform(Some(&sphere), self.controller.borrow().rotation());
    }

    fn apply_highlights(&self) {
        let set = self.highlighted.borrow();
        let items = self.items.borrow();
        for (el, item) in self.tiles.borrow().iter().zip(items.iter()) {
            let on = item
                .image
                .id
                .as_ref()
                .map(|id| set.contains(id))
                .unwrap_or(false);
            dom::set_tile_highlight(el, on);
        }
    }
}
