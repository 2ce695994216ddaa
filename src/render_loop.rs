use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// A repeating `requestAnimationFrame` task with an explicit stop handle.
///
/// The tick returns `false` once there is nothing left to draw (e.g. the
/// canvas left the document); the loop then stops rescheduling itself.
/// Dropping the handle cancels any pending frame.
pub struct RenderLoop {
    callback: FrameCallback,
    pending: Rc<Cell<Option<i32>>>,
    running: Rc<Cell<bool>>,
}

impl RenderLoop {
    pub fn start(mut tick: impl FnMut() -> bool + 'static) -> Result<Self, String> {
        let window = web_sys::window().ok_or("No window")?;

        let callback: FrameCallback = Rc::new(RefCell::new(None));
        let pending = Rc::new(Cell::new(None));
        let running = Rc::new(Cell::new(true));

        // The closure only holds a weak reference to itself so that dropping
        // the handle frees it.
        let weak_cb = Rc::downgrade(&callback);
        let pending_cb = pending.clone();
        let running_cb = running.clone();
        *callback.borrow_mut() = Some(Closure::new(move || {
            pending_cb.set(None);
            if !running_cb.get() {
                return;
            }
            if !tick() {
                log::debug!("render loop finished");
                running_cb.set(false);
                return;
            }
            let Some(cb) = weak_cb.upgrade() else { return };
            let Some(window) = web_sys::window() else { return };
            let cb = cb.borrow();
            if let Some(f) = cb.as_ref() {
                if let Ok(handle) = window.request_animation_frame(f.as_ref().unchecked_ref()) {
                    pending_cb.set(Some(handle));
                }
            }
        }));

        let handle = {
            let cb = callback.borrow();
            let f = cb.as_ref().ok_or("Render callback missing")?;
            window
                .request_animation_frame(f.as_ref().unchecked_ref())
                .map_err(|e| format!("requestAnimationFrame failed: {e:?}"))?
        };
        pending.set(Some(handle));

        Ok(Self { callback, pending, running })
    }

    /// Stop the loop. Safe to call more than once.
    pub fn cancel(&self) {
        self.running.set(false);
        if let Some(handle) = self.pending.take() {
            if let Some(window) = web_sys::window() {
                let _ = window.cancel_animation_frame(handle);
            }
        }
    }
}

impl Drop for RenderLoop {
    fn drop(&mut self) {
        self.cancel();
        self.callback.borrow_mut().take();
    }
}
