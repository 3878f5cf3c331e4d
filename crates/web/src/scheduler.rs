//! Deferred-callback primitives the controllers are driven by.
//!
//! Controllers never call `setTimeout` or `requestAnimationFrame` directly.
//! They hold a [`SharedScheduler`] so the same state machines run against
//! the browser event loop or a virtual clock in tests.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use crate::error::describe_js_error;

pub type SharedScheduler = Rc<dyn Scheduler>;

pub trait Scheduler {
    /// Run `callback` once after `delay`.
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>);

    /// Run `callback` once before the next repaint.
    fn request_frame(&self, callback: Box<dyn FnOnce()>);
}

/// Scheduler backed by `window.setTimeout` and `window.requestAnimationFrame`.
pub struct WindowScheduler {
    window: web_sys::Window,
}

impl WindowScheduler {
    pub fn new(window: web_sys::Window) -> Self {
        Self { window }
    }

    pub fn shared(window: web_sys::Window) -> SharedScheduler {
        Rc::new(Self::new(window))
    }
}

impl Scheduler for WindowScheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let closure = Closure::once_into_js(move || callback());
        let millis = delay.as_millis().min(i32::MAX as u128) as i32;
        if let Err(err) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(closure.unchecked_ref(), millis)
        {
            log::warn!("setTimeout failed: {}", describe_js_error(&err));
        }
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        let closure = Closure::once_into_js(move || callback());
        if let Err(err) = self.window.request_animation_frame(closure.unchecked_ref()) {
            log::warn!("requestAnimationFrame failed: {}", describe_js_error(&err));
        }
    }
}

/// Cancels a self-rescheduling loop. The pending callback still fires but
/// does nothing and schedules nothing further.
#[derive(Clone, Debug, Default)]
pub struct StopHandle(Rc<Cell<bool>>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.set(true);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.get()
    }
}
