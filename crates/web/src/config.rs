use std::str::FromStr;

use log::LevelFilter;
use serde::Deserialize;
use wasm_bindgen::JsValue;

use crate::error::ConfigError;
use crate::typewriter::TypewriterConfig;

/// Roles cycled by the hero typewriter when the page supplies none.
pub const DEFAULT_PHRASES: [&str; 5] = [
    "Computer Security (UG)",
    "CTF Player",
    "Web Developer",
    "Backend Developer",
    "Full Stack Developer",
];

/// Page-level settings, read from a plain JS object with camelCase keys.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageConfig {
    pub typewriter: TypewriterConfig,
    pub phrases: Vec<String>,
    /// The particle background is off unless a page opts in.
    pub particles: bool,
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            typewriter: TypewriterConfig::default(),
            phrases: DEFAULT_PHRASES.iter().map(|p| p.to_string()).collect(),
            particles: false,
            log_level: "info".to_string(),
        }
    }
}

impl PageConfig {
    /// Parse a configuration object. `undefined` and `null` yield the defaults.
    pub fn from_js(value: JsValue) -> Result<Self, ConfigError> {
        if value.is_undefined() || value.is_null() {
            return Ok(Self::default());
        }
        serde_wasm_bindgen::from_value(value).map_err(|e| ConfigError::Invalid(e.to_string()))
    }

    pub fn level_filter(&self) -> LevelFilter {
        LevelFilter::from_str(&self.log_level).unwrap_or(LevelFilter::Info)
    }
}
