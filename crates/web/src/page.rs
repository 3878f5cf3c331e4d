//! Wires every enhancement onto the current document.
//!
//! Features are independent: one that fails to set up is logged and
//! skipped, the rest still run.

use std::cell::RefCell;

use web_sys::{HtmlElement, IntersectionObserver};

use crate::config::PageConfig;
use crate::dom;
use crate::error::SetupError;
use crate::scheduler::{StopHandle, WindowScheduler};
use crate::typewriter::{Typewriter, TypewriterEffect};
use crate::{contact, header, loading, navigation, particles, reveal};

pub const TYPEWRITER_SELECTOR: &str = "#typewriter";

/// Handles to the long-running pieces of an initialized page.
#[derive(Default)]
pub struct PageHandles {
    pub typewriter: Option<StopHandle>,
    pub particles: Option<StopHandle>,
    pub reveal_observer: Option<IntersectionObserver>,
}

impl PageHandles {
    pub fn stop(&self) {
        for handle in [&self.typewriter, &self.particles].into_iter().flatten() {
            handle.stop();
        }
        if let Some(observer) = &self.reveal_observer {
            observer.disconnect();
        }
    }
}

thread_local! {
    static HANDLES: RefCell<Option<PageHandles>> = const { RefCell::new(None) };
}

fn skip<T>(feature: &str, result: Result<T, SetupError>) -> Option<T> {
    match result {
        Ok(value) => {
            log::debug!("{feature} ready");
            Some(value)
        }
        Err(err) => {
            log::warn!("{feature} disabled: {err}");
            None
        }
    }
}

pub fn init(config: &PageConfig) -> Result<(), SetupError> {
    let window = dom::window()?;
    let document = dom::document()?;
    let scheduler = WindowScheduler::shared(window.clone());

    let mut handles = PageHandles::default();

    handles.typewriter = skip(
        "typewriter",
        dom::query::<HtmlElement>(&document, TYPEWRITER_SELECTOR, "HTMLElement").map(|element| {
            Typewriter::new(config.phrases.clone(), config.typewriter).map(|typewriter| {
                TypewriterEffect::start(element, typewriter, scheduler.clone(), js_sys::Math::random)
                    .stop_handle()
            })
        }),
    )
    .flatten();
    if handles.typewriter.is_none() {
        log::debug!("typewriter not running");
    }

    handles.reveal_observer = skip("scroll reveal", reveal::install(&document, scheduler.clone()));
    skip("smooth navigation", navigation::install(&window, &document));
    skip("header background", header::install(&window, &document));
    skip("contact form", contact::install(&document, scheduler.clone()));
    skip("loading overlay", loading::install(&window, &document, scheduler.clone()));

    if config.particles {
        handles.particles = skip(
            "particle background",
            particles::install(&window, &document, scheduler.clone()),
        );
    }

    HANDLES.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(handles) {
            previous.stop();
        }
    });
    log::info!("portfolio page initialized");
    Ok(())
}

/// Stop the recurring animations and the reveal observer.
pub fn stop() {
    HANDLES.with(|slot| {
        if let Some(handles) = slot.borrow_mut().take() {
            handles.stop();
        }
    });
}
