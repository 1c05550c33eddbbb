//! DOM plumbing: sphere and tile construction, transform application,
//! scroll locking. Every helper tolerates a missing target by doing
//! nothing — losing the render element mid-animation must never throw.

use crate::constants::{PERSPECTIVE_PX, TILE_SIZE_FACTOR};
use crate::core::geometry::{base_rotation, AngularSlot, GalleryItem};
use crate::core::rotation::Rotation;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// Create the rotating sphere element inside the viewport root.
pub fn build_sphere(document: &web::Document, root: &web::HtmlElement) -> Option<web::HtmlElement> {
    let style = root.style();
    _ = style.set_property("perspective", &format!("{PERSPECTIVE_PX}px"));
    _ = style.set_property("overflow", "hidden");
    _ = style.set_property("touch-action", "none");
    _ = style.set_property("position", "relative");

    let sphere: web::HtmlElement = document.create_element("div").ok()?.dyn_into().ok()?;
    _ = sphere.set_attribute("class", "sg-sphere");
    let style = sphere.style();
    _ = style.set_property("position", "absolute");
    _ = style.set_property("left", "50%");
    _ = style.set_property("top", "50%");
    _ = style.set_property("transform-style", "preserve-3d");
    root.append_child(&sphere).ok()?;
    Some(sphere)
}

/// Create one tile element per gallery item and append them to the sphere.
pub fn build_tiles(
    document: &web::Document,
    sphere: &web::HtmlElement,
    items: &[GalleryItem],
    segments: u32,
    radius_px: f64,
) -> Vec<web::HtmlElement> {
    let mut tiles = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let Ok(el) = document.create_element("div") else {
            continue;
        };
        let Ok(el) = el.dyn_into::<web::HtmlElement>() else {
            continue;
        };
        _ = el.set_attribute("class", "sg-tile");
        _ = el.set_attribute("data-index", &index.to_string());
        _ = el.set_attribute("role", "img");
        if let Some(alt) = &item.image.alt {
            _ = el.set_attribute("aria-label", alt);
        }
        let style = el.style();
        _ = style.set_property("position", "absolute");
        _ = style.set_property("left", "50%");
        _ = style.set_property("top", "50%");
        _ = style.set_property("background-size", "cover");
        _ = style.set_property("background-position", "center");
        if !item.image.url.is_empty() {
            let url = item.image.url.replace('"', "%22");
            _ = style.set_property("background-image", &format!("url(\"{url}\")"));
        }
        position_tile(&el, item.slot, segments, radius_px);
        _ = sphere.append_child(&el);
        tiles.push(el);
    }
    tiles
}

/// Size a tile and place it at its slot's base rotation on the sphere.
pub fn position_tile(el: &web::HtmlElement, slot: AngularSlot, segments: u32, radius_px: f64) {
    let rot = base_rotation(slot, segments);
    let size = radius_px * TILE_SIZE_FACTOR;
    let style = el.style();
    _ = style.set_property("width", &format!("{size:.1}px"));
    _ = style.set_property("height", &format!("{size:.1}px"));
    _ = style.set_property(
        "transform",
        &format!(
            "translate(-50%, -50%) rotateY({:.3}deg) rotateX({:.3}deg) translateZ({:.1}px)",
            rot.rot_y_deg, rot.rot_x_deg, -radius_px
        ),
    );
}

/// Apply the current orientation to the sphere element. A missing element
/// skips the write.
pub fn apply_sphere_transform(sphere: Option<&web::HtmlElement>, rotation: Rotation) {
    let Some(sphere) = sphere else {
        return;
    };
    _ = sphere.style().set_property(
        "transform",
        &format!(
            "translate(-50%, -50%) rotateX({:.4}deg) rotateY({:.4}deg)",
            rotation.pitch_deg, rotation.yaw_deg
        ),
    );
}

pub fn set_tile_highlight(el: &web::HtmlElement, on: bool) {
    let cl = el.class_list();
    if on {
        _ = cl.add_1("sg-highlighted");
    } else {
        _ = cl.remove_1("sg-highlighted");
    }
}

// Body scroll is locked for the duration of a drag and on teardown the lock
// must be gone; leaving it behind leaks across component remounts.
pub fn lock_body_scroll(document: &web::Document) {
    if let Some(body) = document.body() {
        let style = body.style();
        _ = style.set_property("overflow", "hidden");
        _ = style.set_property("touch-action", "none");
    }
}

pub fn unlock_body_scroll(document: &web::Document) {
    if let Some(body) = document.body() {
        let style = body.style();
        _ = style.remove_property("overflow");
        _ = style.remove_property("touch-action");
    }
}

/// Remove every child of an element (used when rebuilding tiles).
pub fn clear_children(el: &web::HtmlElement) {
    while let Some(child) = el.first_child() {
        _ = el.remove_child(&child);
    }
}
