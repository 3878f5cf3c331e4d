use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failure to wire one page feature. Never fatal: the page keeps working
/// without the feature that failed.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no global window")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("element not found: {selector}")]
    MissingElement { selector: &'static str },
    #[error("element {selector} is not a {expected}")]
    WrongElementType {
        selector: &'static str,
        expected: &'static str,
    },
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        SetupError::Js(describe_js_error(&value))
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid page configuration: {0}")]
    Invalid(String),
}

pub(crate) fn describe_js_error(value: &JsValue) -> String {
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}
