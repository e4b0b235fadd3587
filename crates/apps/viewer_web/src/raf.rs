use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use runtime::{Frame, FrameCallback, FrameScheduler, LoopHandle, NOMINAL_DT_S};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

type RafClosure = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

struct RafLoop {
    request_id: Option<i32>,
    closure: RafClosure,
}

struct RafInner {
    window: web_sys::Window,
    next_id: u64,
    loops: HashMap<u64, RafLoop>,
}

impl RafInner {
    fn cancel(&self, entry: RafLoop) {
        if let Some(request_id) = entry.request_id {
            let _ = self.window.cancel_animation_frame(request_id);
        }
        // Dropping the closure breaks its self-reference cycle. It may be the
        // closure that is running right now, so the drop waits for a microtask.
        let closure = entry.closure.borrow_mut().take();
        spawn_local(async move {
            drop(closure);
        });
    }
}

impl Drop for RafInner {
    fn drop(&mut self) {
        let loops: Vec<RafLoop> = self.loops.drain().map(|(_, entry)| entry).collect();
        for entry in loops {
            self.cancel(entry);
        }
    }
}

/// [`FrameScheduler`] backed by `window.requestAnimationFrame`.
///
/// Each loop keeps its closure in an `Rc<RefCell<Option<_>>>` so the closure
/// can re-request itself after every frame.
#[derive(Clone)]
pub struct AnimationFrameScheduler {
    inner: Rc<RefCell<RafInner>>,
}

impl AnimationFrameScheduler {
    pub fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("window missing"))?;
        Ok(Self {
            inner: Rc::new(RefCell::new(RafInner {
                window,
                next_id: 0,
                loops: HashMap::new(),
            })),
        })
    }
}

fn request(window: &web_sys::Window, closure: &RafClosure) -> Option<i32> {
    let closure = closure.borrow();
    let callback = closure.as_ref()?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .ok()
}

impl FrameScheduler for AnimationFrameScheduler {
    fn start(&self, mut callback: FrameCallback) -> LoopHandle {
        let (id, window) = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            (id, inner.window.clone())
        };

        let closure: RafClosure = Rc::new(RefCell::new(None));
        let weak_inner = Rc::downgrade(&self.inner);
        let self_ref = closure.clone();
        let loop_window = window.clone();
        let mut frame = Frame::first(NOMINAL_DT_S);

        *closure.borrow_mut() = Some(Closure::wrap(Box::new(move || {
            let Some(inner) = weak_inner.upgrade() else {
                return;
            };
            if !inner.borrow().loops.contains_key(&id) {
                return;
            }

            callback(frame);
            frame = frame.next();

            // The callback may have stopped this loop.
            if !inner.borrow().loops.contains_key(&id) {
                return;
            }
            let next = request(&loop_window, &self_ref);
            if let Some(entry) = inner.borrow_mut().loops.get_mut(&id) {
                entry.request_id = next;
            }
        }) as Box<dyn FnMut()>));

        let request_id = request(&window, &closure);
        self.inner.borrow_mut().loops.insert(
            id,
            RafLoop {
                request_id,
                closure,
            },
        );
        LoopHandle(id)
    }

    fn stop(&self, handle: LoopHandle) {
        let mut inner = self.inner.borrow_mut();
        if let Some(entry) = inner.loops.remove(&handle.0) {
            inner.cancel(entry);
        }
    }

    fn is_running(&self, handle: LoopHandle) -> bool {
        self.inner.borrow().loops.contains_key(&handle.0)
    }
}
