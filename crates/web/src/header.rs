use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::dom::{self, BrowserViewport, DomNode, Viewport};
use crate::error::SetupError;
use crate::navigation::HEADER_SELECTOR;

/// Scroll offset past which the header turns darker and blurrier.
pub const SCROLL_THRESHOLD: f64 = 100.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HeaderStyle {
    pub background_color: &'static str,
    pub backdrop_filter: &'static str,
}

impl HeaderStyle {
    pub const RESTING: HeaderStyle = HeaderStyle {
        background_color: "rgba(0, 0, 0, 0.9)",
        backdrop_filter: "blur(10px)",
    };

    pub const SCROLLED: HeaderStyle = HeaderStyle {
        background_color: "rgba(0, 0, 0, 0.95)",
        backdrop_filter: "blur(20px)",
    };

    pub fn for_scroll(scroll_y: f64) -> HeaderStyle {
        if scroll_y > SCROLL_THRESHOLD {
            Self::SCROLLED
        } else {
            Self::RESTING
        }
    }
}

pub struct HeaderBackground<E, V> {
    header: E,
    viewport: V,
}

impl<E: DomNode, V: Viewport> HeaderBackground<E, V> {
    pub fn new(header: E, viewport: V) -> Self {
        Self { header, viewport }
    }

    pub fn update(&self) -> HeaderStyle {
        let style = HeaderStyle::for_scroll(self.viewport.scroll_y());
        self.header.set_style("background-color", style.background_color);
        self.header.set_style("backdrop-filter", style.backdrop_filter);
        style
    }
}

pub fn install(window: &Window, document: &Document) -> Result<(), SetupError> {
    let header = dom::query::<HtmlElement>(document, HEADER_SELECTOR, "HTMLElement")?;
    let background = Rc::new(HeaderBackground::new(
        header,
        BrowserViewport::new(window.clone()),
    ));

    let closure = Closure::<dyn FnMut()>::new(move || {
        background.update();
    });
    window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}
