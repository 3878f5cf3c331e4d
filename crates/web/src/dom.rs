//! The narrow slice of the DOM the controllers touch.
//!
//! Controllers are generic over [`DomNode`] and [`Viewport`] so their logic
//! runs against `web_sys` in the browser and against fakes in unit tests.

use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::error::{SetupError, describe_js_error};

pub trait DomNode: Clone + PartialEq + 'static {
    fn set_text(&self, text: &str);
    fn add_class(&self, class: &str);
    fn remove_class(&self, class: &str);
    fn has_class(&self, class: &str) -> bool;
    fn attribute(&self, name: &str) -> Option<String>;
    fn set_style(&self, property: &str, value: &str);
    /// Remove the node from the document.
    fn detach(&self);
    /// First descendant matching `selector`.
    fn find(&self, selector: &str) -> Option<Self>;
    /// Distance from the offset parent's top edge (`offsetTop`).
    fn layout_top(&self) -> f64;
    /// Rendered height (`offsetHeight`).
    fn layout_height(&self) -> f64;
}

impl DomNode for HtmlElement {
    fn set_text(&self, text: &str) {
        self.set_text_content(Some(text));
    }

    fn add_class(&self, class: &str) {
        if let Err(err) = self.class_list().add_1(class) {
            log::debug!("classList.add({class}) failed: {}", describe_js_error(&err));
        }
    }

    fn remove_class(&self, class: &str) {
        if let Err(err) = self.class_list().remove_1(class) {
            log::debug!("classList.remove({class}) failed: {}", describe_js_error(&err));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        self.class_list().contains(class)
    }

    fn attribute(&self, name: &str) -> Option<String> {
        self.get_attribute(name)
    }

    fn set_style(&self, property: &str, value: &str) {
        if let Err(err) = self.style().set_property(property, value) {
            log::debug!("style {property} rejected: {}", describe_js_error(&err));
        }
    }

    fn detach(&self) {
        web_sys::Element::remove(self);
    }

    fn find(&self, selector: &str) -> Option<Self> {
        self.query_selector(selector)
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    }

    fn layout_top(&self) -> f64 {
        HtmlElement::offset_top(self) as f64
    }

    fn layout_height(&self) -> f64 {
        HtmlElement::offset_height(self) as f64
    }
}

/// Scroll position and size of the visible area.
pub trait Viewport: 'static {
    fn scroll_y(&self) -> f64;
    fn smooth_scroll_to(&self, top: f64);
    fn size(&self) -> (f64, f64);
}

#[derive(Clone)]
pub struct BrowserViewport {
    window: Window,
}

impl BrowserViewport {
    pub fn new(window: Window) -> Self {
        Self { window }
    }
}

impl Viewport for BrowserViewport {
    fn scroll_y(&self) -> f64 {
        self.window.scroll_y().unwrap_or(0.0)
    }

    fn smooth_scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn size(&self) -> (f64, f64) {
        let width = self
            .window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        let height = self
            .window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(0.0);
        (width, height)
    }
}

pub(crate) fn window() -> Result<Window, SetupError> {
    web_sys::window().ok_or(SetupError::NoWindow)
}

pub(crate) fn document() -> Result<Document, SetupError> {
    window()?.document().ok_or(SetupError::NoDocument)
}

/// First element matching `selector`, required to be an `HTMLElement`.
pub(crate) fn query<T: JsCast>(
    document: &Document,
    selector: &'static str,
    expected: &'static str,
) -> Result<T, SetupError> {
    document
        .query_selector(selector)?
        .ok_or(SetupError::MissingElement { selector })?
        .dyn_into::<T>()
        .map_err(|_| SetupError::WrongElementType { selector, expected })
}

/// Every `HTMLElement` matching `selector`, in document order.
pub(crate) fn query_all(document: &Document, selector: &str) -> Result<Vec<HtmlElement>, SetupError> {
    let list = document.query_selector_all(selector)?;
    Ok((0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<HtmlElement>().ok())
        .collect())
}

pub(crate) fn create<T: JsCast>(document: &Document, tag: &str) -> Result<T, SetupError> {
    document
        .create_element(tag)?
        .dyn_into::<T>()
        .map_err(|_| SetupError::Js(format!("<{tag}> has an unexpected type")))
}
