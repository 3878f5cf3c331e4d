//! Deterministic stand-ins for the browser: a virtual clock scheduler and
//! in-memory DOM nodes.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use crate::dom::{DomNode, Viewport};
use crate::scheduler::Scheduler;

struct Timer {
    due: Duration,
    seq: u64,
    callback: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Queue {
    now: Duration,
    seq: u64,
    timers: Vec<Timer>,
    frames: Vec<Box<dyn FnOnce()>>,
}

/// Scheduler whose clock only moves when a test advances it.
#[derive(Default)]
pub(crate) struct ManualScheduler {
    queue: RefCell<Queue>,
}

impl ManualScheduler {
    pub(crate) fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    pub(crate) fn now(&self) -> Duration {
        self.queue.borrow().now
    }

    /// Move the clock forward, firing every timer that falls due on the way
    /// (including timers scheduled by those callbacks).
    pub(crate) fn advance(&self, by: Duration) {
        let target = self.now() + by;
        loop {
            let next = {
                let mut queue = self.queue.borrow_mut();
                let index = queue
                    .timers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.due <= target)
                    .min_by_key(|(_, t)| (t.due, t.seq))
                    .map(|(i, _)| i);
                index.map(|i| {
                    let timer = queue.timers.swap_remove(i);
                    queue.now = timer.due;
                    timer.callback
                })
            };
            match next {
                Some(callback) => callback(),
                None => break,
            }
        }
        self.queue.borrow_mut().now = target;
    }

    /// Run the callbacks queued for the next frame.
    pub(crate) fn run_frame(&self) {
        let frames = std::mem::take(&mut self.queue.borrow_mut().frames);
        for frame in frames {
            frame();
        }
    }

    pub(crate) fn pending_timers(&self) -> usize {
        self.queue.borrow().timers.len()
    }

    pub(crate) fn pending_frames(&self) -> usize {
        self.queue.borrow().frames.len()
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay: Duration, callback: Box<dyn FnOnce()>) {
        let mut queue = self.queue.borrow_mut();
        let due = queue.now + delay;
        let seq = queue.seq;
        queue.seq += 1;
        queue.timers.push(Timer { due, seq, callback });
    }

    fn request_frame(&self, callback: Box<dyn FnOnce()>) {
        self.queue.borrow_mut().frames.push(callback);
    }
}

#[derive(Default)]
struct FakeNode {
    text: String,
    classes: Vec<String>,
    attributes: HashMap<String, String>,
    styles: HashMap<String, String>,
    children: Vec<(String, FakeElement)>,
    detached: bool,
    top: f64,
    height: f64,
}

/// In-memory element. Clones share the same node; equality is identity.
#[derive(Clone, Default)]
pub(crate) struct FakeElement(Rc<RefCell<FakeNode>>);

impl PartialEq for FakeElement {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for FakeElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("FakeElement")
            .field("classes", &node.classes)
            .field("attributes", &node.attributes)
            .finish()
    }
}

impl FakeElement {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_class(self, class: &str) -> Self {
        self.add_class(class);
        self
    }

    pub(crate) fn with_attr(self, name: &str, value: &str) -> Self {
        self.0
            .borrow_mut()
            .attributes
            .insert(name.to_string(), value.to_string());
        self
    }

    /// Register `child` as the match for `selector` in [`DomNode::find`].
    pub(crate) fn with_child(self, selector: &str, child: FakeElement) -> Self {
        self.0
            .borrow_mut()
            .children
            .push((selector.to_string(), child));
        self
    }

    pub(crate) fn with_layout(self, top: f64, height: f64) -> Self {
        {
            let mut node = self.0.borrow_mut();
            node.top = top;
            node.height = height;
        }
        self
    }

    pub(crate) fn text(&self) -> String {
        self.0.borrow().text.clone()
    }

    pub(crate) fn style(&self, property: &str) -> Option<String> {
        self.0.borrow().styles.get(property).cloned()
    }

    pub(crate) fn style_writes(&self) -> usize {
        self.0.borrow().styles.len()
    }

    pub(crate) fn is_attached(&self) -> bool {
        !self.0.borrow().detached
    }
}

impl DomNode for FakeElement {
    fn set_text(&self, text: &str) {
        self.0.borrow_mut().text = text.to_string();
    }

    fn add_class(&self, class: &str) {
        let mut node = self.0.borrow_mut();
        if !node.classes.iter().any(|c| c == class) {
            node.classes.push(class.to_string());
        }
    }

    fn remove_class(&self, class: &str) {
        self.0.borrow_mut().classes.retain(|c| c != class);
    }

    fn has_class(&self, class: &str) -> bool {
        self.0.borrow().classes.iter().any(|c| c == class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.0.borrow().attributes.get(name).cloned()
    }

    fn set_style(&self, property: &str, value: &str) {
        self.0
            .borrow_mut()
            .styles
            .insert(property.to_string(), value.to_string());
    }

    fn detach(&self) {
        self.0.borrow_mut().detached = true;
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.0
            .borrow()
            .children
            .iter()
            .find(|(s, _)| s == selector)
            .map(|(_, child)| child.clone())
    }

    fn layout_top(&self) -> f64 {
        self.0.borrow().top
    }

    fn layout_height(&self) -> f64 {
        self.0.borrow().height
    }
}

/// Viewport that records smooth-scroll requests instead of scrolling.
#[derive(Default)]
pub(crate) struct FakeViewport {
    scroll_y: Cell<f64>,
    size: Cell<(f64, f64)>,
    scrolls: RefCell<Vec<f64>>,
}

impl FakeViewport {
    pub(crate) fn new(width: f64, height: f64) -> Rc<Self> {
        let viewport = Self::default();
        viewport.size.set((width, height));
        Rc::new(viewport)
    }

    pub(crate) fn set_scroll_y(&self, y: f64) {
        self.scroll_y.set(y);
    }

    pub(crate) fn scrolls(&self) -> Vec<f64> {
        self.scrolls.borrow().clone()
    }
}

impl Viewport for FakeViewport {
    fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    fn smooth_scroll_to(&self, top: f64) {
        self.scrolls.borrow_mut().push(top);
    }

    fn size(&self) -> (f64, f64) {
        self.size.get()
    }
}

impl<V: Viewport> Viewport for Rc<V> {
    fn scroll_y(&self) -> f64 {
        (**self).scroll_y()
    }

    fn smooth_scroll_to(&self, top: f64) {
        (**self).smooth_scroll_to(top)
    }

    fn size(&self) -> (f64, f64) {
        (**self).size()
    }
}
