use std::cell::{Cell, RefCell};
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

type FrameCallback = Closure<dyn FnMut(f64)>;

fn request_frame(callback: &FrameCallback) -> Result<i32, JsValue> {
    let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
    window.request_animation_frame(callback.as_ref().unchecked_ref())
}

/// A `requestAnimationFrame` chain.
///
/// The step closure receives the frame timestamp and returns whether to keep
/// going. The closure re-requests itself through a shared slot, so it has to
/// be created first and stored before the first request.
pub struct FrameLoop {
    running: Rc<Cell<bool>>,
    /// Id of the frame request that has not fired yet.
    pending: Rc<Cell<Option<i32>>>,
    callback: Rc<RefCell<Option<FrameCallback>>>,
}

impl FrameLoop {
    pub fn start(mut step: impl FnMut(f64) -> bool + 'static) -> Result<Self, JsValue> {
        let running = Rc::new(Cell::new(true));
        let pending: Rc<Cell<Option<i32>>> = Rc::new(Cell::new(None));
        let callback: Rc<RefCell<Option<FrameCallback>>> = Rc::new(RefCell::new(None));

        let closure = {
            let running = Rc::clone(&running);
            let pending = Rc::clone(&pending);
            let slot = Rc::clone(&callback);
            Closure::<dyn FnMut(f64)>::new(move |now: f64| {
                pending.set(None);
                if !running.get() {
                    return;
                }
                // `step` may cancel us through a host callback; check again after it.
                if !step(now) || !running.get() {
                    running.set(false);
                    return;
                }
                let next = slot.borrow().as_ref().map(request_frame);
                match next {
                    Some(Ok(id)) => pending.set(Some(id)),
                    Some(Err(err)) => {
                        log::warn!("frame loop stopped: {:?}", err);
                        running.set(false);
                    }
                    None => running.set(false),
                }
            })
        };

        let id = request_frame(&closure)?;
        *callback.borrow_mut() = Some(closure);
        pending.set(Some(id));

        Ok(Self { running, pending, callback })
    }

    /// Stop scheduling and withdraw the pending frame request. Idempotent.
    pub fn cancel(&self) {
        self.running.set(false);
        if let Some(id) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(id);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.get()
    }
}

impl Drop for FrameLoop {
    fn drop(&mut self) {
        self.cancel();
        // Breaks the closure → slot → closure cycle.
        if let Ok(mut slot) = self.callback.try_borrow_mut() {
            slot.take();
        }
    }
}
