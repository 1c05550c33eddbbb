//! Frame loop: one mutation pass per animation frame.
//!
//! Coasting and autopilot both advance from here; they are mutually
//! exclusive with an active drag by construction (the controller's phase),
//! so the loop never needs to coordinate writers itself.

use crate::constants::MAX_FRAME_DT_NORM;
use crate::core::motion::{MotionController, BASELINE_FRAME_MS};
use crate::dom;
use instant::Instant;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub struct FrameContext {
    pub controller: Rc<RefCell<MotionController>>,
    pub sphere: Rc<RefCell<Option<web::HtmlElement>>>,
    pub last_instant: Instant,
}

impl FrameContext {
    pub fn frame(&mut self) {
        let now = Instant::now();
        let dt = now - self.last_instant;
        self.last_instant = now;
        let dt_norm = (dt.as_secs_f64() * 1000.0 / BASELINE_FRAME_MS).min(MAX_FRAME_DT_NORM);

        {
            let mut controller = self.controller.borrow_mut();
            if controller.is_coasting() {
                controller.coast_step();
            } else {
                controller.autopilot_tick(dt_norm);
            }
        }

        let rotation = self.controller.borrow().rotation();
        dom::apply_sphere_transform(self.sphere.borrow().as_ref(), rotation);
    }
}

/// Handle to a running requestAnimationFrame chain. The tick closure is
/// owned here rather than leaked, so the chain can be cancelled when the
/// gallery is torn down.
pub struct FrameLoop {
    raf_id: Rc<Cell<Option<i32>>>,
    alive: Rc<Cell<bool>>,
    _tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>>,
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext>>) -> FrameLoop {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let raf_id: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
    let alive = Rc::new(Cell::new(true));

    let tick_clone = tick.clone();
    let raf_clone = raf_id.clone();
    let alive_clone = alive.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if !alive_clone.get() {
            return;
        }
        frame_ctx.borrow_mut().frame();
        if let Some(window) = web::window() {
            if let Some(cb) = tick_clone.borrow().as_ref() {
                raf_clone.set(
                    window
                        .request_animation_frame(cb.as_ref().unchecked_ref())
                        .ok(),
                );
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(window) = web::window() {
        if let Some(cb) = tick.borrow().as_ref() {
            raf_id.set(
                window
                    .request_animation_frame(cb.as_ref().unchecked_ref())
                    .ok(),
            );
        }
    }

    FrameLoop {
        raf_id,
        alive,
        _tick: tick,
    }
}

impl FrameLoop {
    /// Stop the chain and drop the pending callback registration.
    pub fn cancel(&self) {
        self.alive.set(false);
        if let Some(id) = self.raf_id.take() {
            if let Some(window) = web::window() {
                _ = window.cancel_animation_frame(id);
            }
        }
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
    }
}
