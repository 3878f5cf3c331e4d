//! Smooth in-page navigation and active-section highlighting.

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Document, HtmlElement, Window};

use crate::dom::{self, BrowserViewport, DomNode, Viewport};
use crate::error::SetupError;

pub const NAV_LINK_SELECTOR: &str = "nav a[href^=\"#\"]";
pub const SECTION_SELECTOR: &str = "section[id]";
pub const HEADER_SELECTOR: &str = "header";
pub const LOGO_SELECTOR: &str = ".logo";
pub const ACTIVE_CLASS: &str = "active";

/// Gap left between the header and a section scrolled into place.
pub const SCROLL_GAP: f64 = 20.0;
/// How far above a section (below the header) it already counts as current.
pub const PROBE_LEAD: f64 = 100.0;

#[derive(Clone, Debug, PartialEq)]
pub struct SectionLayout {
    pub id: String,
    pub top: f64,
    pub height: f64,
}

impl SectionLayout {
    /// Scroll offsets at which this section is the current one.
    pub fn probe_window(&self, header_height: f64) -> std::ops::Range<f64> {
        let start = self.top - header_height - PROBE_LEAD;
        start..start + self.height
    }
}

/// Scroll offset that puts a section just under the header.
pub fn scroll_destination(section_top: f64, header_height: f64) -> f64 {
    section_top - header_height - SCROLL_GAP
}

/// The section containing `scroll_y` in its probe window. When windows
/// overlap, the last match in document order wins.
pub fn active_section(sections: &[SectionLayout], scroll_y: f64, header_height: f64) -> Option<&str> {
    sections
        .iter()
        .rev()
        .find(|s| s.probe_window(header_height).contains(&scroll_y))
        .map(|s| s.id.as_str())
}

pub struct SmoothNavigator<E, V> {
    viewport: V,
    header: Option<E>,
    links: Vec<E>,
    sections: Vec<E>,
    resolve: Box<dyn Fn(&str) -> Option<E>>,
}

impl<E: DomNode, V: Viewport> SmoothNavigator<E, V> {
    /// `resolve` looks an anchor target up by id (without the `#`).
    pub fn new(
        viewport: V,
        header: Option<E>,
        links: Vec<E>,
        sections: Vec<E>,
        resolve: impl Fn(&str) -> Option<E> + 'static,
    ) -> Self {
        Self {
            viewport,
            header,
            links,
            sections,
            resolve: Box::new(resolve),
        }
    }

    /// `None` without a header: offsets cannot be computed, so anchor
    /// scrolling and section tracking do nothing.
    fn header_height(&self) -> Option<f64> {
        self.header.as_ref().map(|h| h.layout_height())
    }

    /// Scroll to the target of an anchor href like `#about`. Returns the
    /// destination offset, or `None` when the target or header is missing.
    pub fn navigate(&self, href: &str) -> Option<f64> {
        let id = href.strip_prefix('#')?;
        if id.is_empty() {
            return None;
        }
        let Some(target) = (self.resolve)(id) else {
            log::debug!("anchor target {href} not found");
            return None;
        };
        let header_height = self.header_height()?;
        let destination = scroll_destination(target.layout_top(), header_height);
        self.viewport.smooth_scroll_to(destination);
        Some(destination)
    }

    pub fn scroll_to_top(&self) {
        self.viewport.smooth_scroll_to(0.0);
    }

    pub fn section_layouts(&self) -> Vec<SectionLayout> {
        self.sections
            .iter()
            .filter_map(|s| {
                Some(SectionLayout {
                    id: s.attribute("id")?,
                    top: s.layout_top(),
                    height: s.layout_height(),
                })
            })
            .collect()
    }

    /// Recompute the current section and move the active marker to its link.
    /// Without a header the links are left as they are.
    pub fn update_active(&self) -> Option<String> {
        let header_height = self.header_height()?;
        let layouts = self.section_layouts();
        let current = active_section(&layouts, self.viewport.scroll_y(), header_height)
            .map(|id| format!("#{id}"));

        for link in &self.links {
            link.remove_class(ACTIVE_CLASS);
            if current.is_some() && link.attribute("href") == current {
                link.add_class(ACTIVE_CLASS);
            }
        }
        current
    }
}

/// Wire nav links, the logo and scroll tracking.
pub fn install(window: &Window, document: &Document) -> Result<(), SetupError> {
    let links = dom::query_all(document, NAV_LINK_SELECTOR)?;
    let sections = dom::query_all(document, SECTION_SELECTOR)?;
    let header = dom::query::<HtmlElement>(document, HEADER_SELECTOR, "HTMLElement").ok();
    if header.is_none() {
        log::debug!("no <header>; anchor scrolling and section tracking disabled");
    }

    let lookup = document.clone();
    let navigator = Rc::new(SmoothNavigator::new(
        BrowserViewport::new(window.clone()),
        header,
        links.clone(),
        sections,
        move |id| {
            lookup
                .get_element_by_id(id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        },
    ));

    for link in &links {
        let navigator = navigator.clone();
        let anchor = link.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
            event.prevent_default();
            if let Some(href) = anchor.attribute("href") {
                navigator.navigate(&href);
            }
        });
        link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    match dom::query::<HtmlElement>(document, LOGO_SELECTOR, "HTMLElement") {
        Ok(logo) => {
            let navigator = navigator.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                event.prevent_default();
                navigator.scroll_to_top();
            });
            logo.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Err(err) => log::debug!("logo scroll-to-top disabled: {err}"),
    }

    {
        let closure = Closure::<dyn FnMut()>::new(move || {
            navigator.update_active();
        });
        window.add_event_listener_with_callback("scroll", closure.as_ref().unchecked_ref())?;
        closure.forget();
    }

    log::debug!("smooth navigation wired for {} links", links.len());
    Ok(())
}
