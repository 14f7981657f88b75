use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no global window available")]
    NoWindow,
    #[error("window has no document")]
    NoDocument,
    #[error("invalid config JSON: {0}")]
    ConfigJson(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Config(String),
    #[error("javascript error: {0}")]
    Js(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        SetupError::Js(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
    }
}
