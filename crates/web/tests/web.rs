#![cfg(target_arch = "wasm32")]

use std::time::Duration;

use portfolio_web::contact::{self, ContactForm, FormView, HtmlContactForm, ValidationError};
use portfolio_web::dom::DomNode;
use portfolio_web::loading::{self, FADE_DELAY, FADE_DURATION, LoadingOverlay, OverlayPhase, OVERLAY_ID};
use portfolio_web::scheduler::WindowScheduler;
use portfolio_web::PageConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;
use web_sys::HtmlElement;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

async fn sleep(duration: Duration) {
    let promise = js_sys::Promise::new(&mut |resolve, _| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                &resolve,
                duration.as_millis() as i32,
            )
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

#[wasm_bindgen_test]
fn test_config_from_undefined_is_default() {
    let config = PageConfig::from_js(JsValue::UNDEFINED).unwrap();
    assert_eq!(config, PageConfig::default());
}

#[wasm_bindgen_test]
fn test_html_element_dom_node() {
    let doc = document();
    let el: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    doc.body().unwrap().append_child(&el).unwrap();

    el.add_class("animate");
    assert!(el.has_class("animate"));
    el.set_style("width", "40%");
    assert_eq!(el.style().get_property_value("width").unwrap(), "40%");
    el.set_text("hello");
    assert_eq!(el.text_content().as_deref(), Some("hello"));

    el.detach();
    assert!(!el.is_connected());
}

#[wasm_bindgen_test]
fn test_contact_form_in_document() {
    let doc = document();
    let wrapper: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    wrapper.set_class_name("contact-form");
    wrapper.set_inner_html(
        r#"<form><input type="text" value="Ada"><input type="email" value="ada@home"><textarea>Hi</textarea></form>"#,
    );
    doc.body().unwrap().append_child(&wrapper).unwrap();

    let view = HtmlContactForm::find(&doc).unwrap();
    assert_eq!(view.submission().name, "Ada");

    let form = ContactForm::new(view, WindowScheduler::shared(web_sys::window().unwrap()));
    assert_eq!(form.submit(), Err(ValidationError::InvalidEmail));
    assert!(form.has_message());
    assert_eq!(doc.query_selector_all(".form-message.error").unwrap().length(), 1);

    assert_eq!(form.submit(), Err(ValidationError::InvalidEmail));
    assert_eq!(doc.query_selector_all(".form-message").unwrap().length(), 1);

    wrapper.remove();
    assert!(contact::HtmlContactForm::find(&doc).is_err());
}

#[wasm_bindgen_test]
async fn test_loading_overlay_removed_after_load() {
    let doc = document();
    let overlay: HtmlElement = doc.create_element("div").unwrap().dyn_into().unwrap();
    doc.body().unwrap().append_child(&overlay).unwrap();

    let loading = LoadingOverlay::new(overlay.clone(), WindowScheduler::shared(web_sys::window().unwrap()));
    loading.on_load();
    assert_eq!(loading.phase(), OverlayPhase::Visible);

    sleep(FADE_DELAY + FADE_DURATION + Duration::from_millis(100)).await;
    assert_eq!(loading.phase(), OverlayPhase::Removed);
    assert!(!overlay.is_connected());
}

#[wasm_bindgen_test]
async fn test_loading_install_inserts_overlay_and_clears_after_load() {
    let window = web_sys::window().unwrap();
    let doc = document();

    loading::install(&window, &doc, WindowScheduler::shared(window.clone())).unwrap();

    let overlay = doc.get_element_by_id(OVERLAY_ID).expect("overlay inserted");
    assert_eq!(
        overlay.parent_element().map(|p| p.tag_name().to_lowercase()).as_deref(),
        Some("body")
    );
    let head_css = doc.head().unwrap().inner_html();
    assert!(head_css.contains("@keyframes spin"));

    // The test page has normally finished loading already, in which case no
    // further `load` event arrives; otherwise deliver it.
    if doc.ready_state() != "complete" {
        let load = web_sys::Event::new("load").unwrap();
        window.dispatch_event(&load).unwrap();
    }

    sleep(FADE_DELAY + FADE_DURATION + Duration::from_millis(100)).await;
    assert!(doc.get_element_by_id(OVERLAY_ID).is_none());
}
