//! Portfolio Web - behavioral enhancements for the portfolio landing page.
//!
//! Typewriter hero text, scroll reveals, smooth navigation, header
//! background, contact form validation, an optional particle background
//! and a loading overlay.

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod contact;
pub mod dom;
pub mod error;
pub mod header;
pub mod loading;
pub mod logging;
pub mod navigation;
pub mod page;
pub mod particles;
pub mod reveal;
pub mod scheduler;
pub mod timing;
pub mod typewriter;

#[cfg(test)]
pub(crate) mod testing;

pub use config::PageConfig;
pub use error::{ConfigError, SetupError};

/// Set by pages that call [`init_with_config`] themselves.
const MANUAL_START_FLAG: &str = "PORTFOLIO_MANUAL_START";

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    let config = PageConfig::default();
    logging::init(config.level_filter());
    if manual_start_requested() {
        log::debug!("automatic start disabled by page");
        return;
    }
    when_dom_ready(config);
}

/// Initialize the page with a configuration object (camelCase keys, all
/// optional).
#[wasm_bindgen]
pub fn init_with_config(config: JsValue) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = PageConfig::from_js(config).map_err(|e| JsValue::from_str(&e.to_string()))?;
    logging::init(config.level_filter());
    when_dom_ready(config);
    Ok(())
}

/// Stop the typewriter and particle loops and disconnect the reveal observer.
#[wasm_bindgen]
pub fn stop_animations() {
    page::stop();
}

fn manual_start_requested() -> bool {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &MANUAL_START_FLAG.into()).ok())
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

fn when_dom_ready(config: PageConfig) {
    let Ok(document) = dom::document() else {
        log::error!("no document; page enhancements disabled");
        return;
    };

    let run = move || {
        if let Err(err) = page::init(&config) {
            log::error!("page init failed: {err}");
        }
    };

    if document.ready_state() != "loading" {
        run();
        return;
    }

    let closure = Closure::once_into_js(run);
    if let Err(err) =
        document.add_event_listener_with_callback("DOMContentLoaded", closure.unchecked_ref())
    {
        log::error!("DOMContentLoaded listener failed: {}", error::describe_js_error(&err));
    }
}
