//! `requestAnimationFrame` driver on top of [`FrameLoop`].

use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use crate::util::frame_loop::FrameLoop;

type FrameCallback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

fn request_frame(callback: &FrameCallback) {
    let Some(window) = web_sys::window() else {
        log::error!("no window, frame loop stopped");
        return;
    };
    if let Some(closure) = callback.borrow().as_ref() {
        if let Err(e) =
            window.request_animation_frame(closure.as_ref().unchecked_ref())
        {
            log::error!("requestAnimationFrame failed: {e:?}");
        }
    }
}

/// A running animation-frame chain.
pub(crate) struct AnimationLoop {
    frame_loop: FrameLoop,
    callback: FrameCallback,
}

impl AnimationLoop {
    /// Start calling `tick` once per display refresh.
    pub(crate) fn start(mut tick: impl FnMut() + 'static) -> Self {
        let frame_loop = FrameLoop::new();
        let callback: FrameCallback = Rc::new(RefCell::new(None));

        let chain = callback.clone();
        let state = frame_loop.clone();
        *callback.borrow_mut() = Some(Closure::new(move || {
            if !state.begin_tick() {
                log::debug!("frame loop parked after {} ticks", state.ticks());
                return;
            }
            tick();
            request_frame(&chain);
        }));
        request_frame(&callback);

        Self {
            frame_loop,
            callback,
        }
    }

    /// Stop re-registering after the current tick.
    pub(crate) fn stop(&self) {
        self.frame_loop.cancel();
    }

    /// Whether frames are still being requested.
    pub(crate) fn is_running(&self) -> bool {
        self.frame_loop.is_running()
    }

    /// Resume a stopped loop.
    pub(crate) fn restart(&self) {
        if self.frame_loop.restart() {
            request_frame(&self.callback);
        }
    }
}
