//! Scroll-triggered reveal of page blocks, fired once per element.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, HtmlElement, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit,
};

use crate::dom::{self, DomNode};
use crate::error::SetupError;
use crate::scheduler::SharedScheduler;

/// Elements that animate in when scrolled into view.
pub const ANIMATABLE_SELECTOR: &str =
    ".skill-item, .timeline-item, .contact-info, .contact-form, .fade-in";
pub const REVEAL_CLASS: &str = "animate";
pub const SKILL_CLASS: &str = "skill-item";
pub const SKILL_PROGRESS_SELECTOR: &str = ".skill-progress";
pub const SKILL_WIDTH_ATTRIBUTE: &str = "data-width";

pub const VISIBILITY_THRESHOLD: f64 = 0.2;
pub const ROOT_MARGIN: &str = "0px 0px -50px 0px";
pub const SKILL_FILL_DELAY: Duration = Duration::from_millis(300);

pub struct ScrollReveal<E> {
    observed: Vec<E>,
    scheduler: SharedScheduler,
}

impl<E: DomNode> ScrollReveal<E> {
    pub fn new(elements: Vec<E>, scheduler: SharedScheduler) -> Self {
        Self {
            observed: elements,
            scheduler,
        }
    }

    pub fn observed(&self) -> &[E] {
        &self.observed
    }

    /// Handle one observer batch of `(element, is_intersecting)` pairs.
    /// Returns the elements revealed by this batch; the caller stops
    /// observing them.
    pub fn handle_intersections(&mut self, entries: impl IntoIterator<Item = (E, bool)>) -> Vec<E> {
        entries
            .into_iter()
            .filter(|(_, intersecting)| *intersecting)
            .filter_map(|(element, _)| self.reveal(&element).then_some(element))
            .collect()
    }

    fn reveal(&mut self, element: &E) -> bool {
        let Some(position) = self.observed.iter().position(|e| e == element) else {
            return false;
        };
        self.observed.swap_remove(position);

        element.add_class(REVEAL_CLASS);
        if element.has_class(SKILL_CLASS) {
            self.fill_skill_bar(element);
        }
        true
    }

    fn fill_skill_bar(&self, skill: &E) {
        let Some(bar) = skill.find(SKILL_PROGRESS_SELECTOR) else {
            log::debug!("skill item without {SKILL_PROGRESS_SELECTOR}");
            return;
        };
        let Some(width) = bar.attribute(SKILL_WIDTH_ATTRIBUTE) else {
            log::debug!("skill progress bar without {SKILL_WIDTH_ATTRIBUTE}");
            return;
        };
        self.scheduler.set_timeout(
            SKILL_FILL_DELAY,
            Box::new(move || bar.set_style("width", &width)),
        );
    }
}

/// Observe every animatable element on the page.
pub fn install(document: &Document, scheduler: SharedScheduler) -> Result<IntersectionObserver, SetupError> {
    let elements = dom::query_all(document, ANIMATABLE_SELECTOR)?;
    let count = elements.len();
    let reveal = Rc::new(RefCell::new(ScrollReveal::new(elements.clone(), scheduler)));

    let callback = Closure::<dyn FnMut(js_sys::Array, IntersectionObserver)>::new(
        move |entries: js_sys::Array, observer: IntersectionObserver| {
            let batch: Vec<(HtmlElement, bool)> = entries
                .iter()
                .filter_map(|entry| entry.dyn_into::<IntersectionObserverEntry>().ok())
                .filter_map(|entry| {
                    let intersecting = entry.is_intersecting();
                    entry
                        .target()
                        .dyn_into::<HtmlElement>()
                        .ok()
                        .map(|el| (el, intersecting))
                })
                .collect();

            for element in reveal.borrow_mut().handle_intersections(batch) {
                observer.unobserve(&element);
            }
        },
    );

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(VISIBILITY_THRESHOLD));
    options.set_root_margin(ROOT_MARGIN);
    let observer =
        IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    callback.forget();

    for element in &elements {
        observer.observe(element);
    }
    log::debug!("observing {count} reveal targets");
    Ok(observer)
}
