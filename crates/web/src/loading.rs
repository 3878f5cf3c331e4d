//! Full-screen spinner shown until the page has loaded.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::dom::{self, DomNode};
use crate::error::SetupError;
use crate::scheduler::SharedScheduler;

pub const OVERLAY_ID: &str = "loading-overlay";
/// Time the overlay stays up after `load`.
pub const FADE_DELAY: Duration = Duration::from_millis(1000);
/// Must match the overlay's CSS opacity transition.
pub const FADE_DURATION: Duration = Duration::from_millis(500);

const OVERLAY_CSS: &str = "position: fixed; top: 0; left: 0; width: 100%; height: 100%; \
                           background-color: black; display: flex; justify-content: center; \
                           align-items: center; z-index: 9999; transition: opacity 0.5s ease;";

const OVERLAY_HTML: &str = r#"<div style="text-align: center;">
    <div style="width: 50px; height: 50px; border: 3px solid #333; border-top: 3px solid #b74b4b; border-radius: 50%; animation: spin 1s linear infinite; margin: 0 auto 20px;"></div>
    <p style="color: white; font-size: 1.6rem;">Loading...</p>
</div>"#;

const SPIN_KEYFRAMES: &str = "@keyframes spin { 0% { transform: rotate(0deg); } 100% { transform: rotate(360deg); } }";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayPhase {
    Visible,
    Fading,
    Removed,
}

pub struct LoadingOverlay<E> {
    overlay: E,
    phase: Rc<Cell<OverlayPhase>>,
    loaded: Cell<bool>,
    scheduler: SharedScheduler,
}

impl<E: DomNode> LoadingOverlay<E> {
    /// Take over an overlay that is already in the document.
    pub fn new(overlay: E, scheduler: SharedScheduler) -> Self {
        Self {
            overlay,
            phase: Rc::new(Cell::new(OverlayPhase::Visible)),
            loaded: Cell::new(false),
            scheduler,
        }
    }

    pub fn phase(&self) -> OverlayPhase {
        self.phase.get()
    }

    /// Start the fade-out sequence. Only the first call has an effect.
    pub fn on_load(&self) {
        if self.loaded.replace(true) {
            return;
        }

        let overlay = self.overlay.clone();
        let phase = self.phase.clone();
        let scheduler = self.scheduler.clone();
        self.scheduler.set_timeout(
            FADE_DELAY,
            Box::new(move || {
                overlay.set_style("opacity", "0");
                phase.set(OverlayPhase::Fading);
                scheduler.set_timeout(
                    FADE_DURATION,
                    Box::new(move || {
                        overlay.detach();
                        phase.set(OverlayPhase::Removed);
                    }),
                );
            }),
        );
    }
}

/// Insert the overlay now and remove it once the window has loaded (right
/// away if it already has).
pub fn install(
    window: &Window,
    document: &Document,
    scheduler: SharedScheduler,
) -> Result<(), SetupError> {
    let body = document.body().ok_or(SetupError::MissingElement { selector: "body" })?;

    match document.head() {
        Some(head) => {
            let style = dom::create::<HtmlElement>(document, "style")?;
            style.set_text_content(Some(SPIN_KEYFRAMES));
            head.append_child(&style)?;
        }
        None => log::debug!("no <head>; spinner will not rotate"),
    }

    let overlay = dom::create::<HtmlElement>(document, "div")?;
    overlay.set_id(OVERLAY_ID);
    overlay.style().set_css_text(OVERLAY_CSS);
    overlay.set_inner_html(OVERLAY_HTML);
    body.append_child(&overlay)?;

    let controller = LoadingOverlay::new(overlay, scheduler);
    // `load` does not fire again for a page that has already loaded.
    if document.ready_state() == "complete" {
        controller.on_load();
        return Ok(());
    }
    let closure = Closure::once_into_js(move || controller.on_load());
    window.add_event_listener_with_callback("load", closure.unchecked_ref())?;
    Ok(())
}
