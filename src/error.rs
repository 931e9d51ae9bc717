use thiserror::Error;

#[derive(Debug, Error)]
pub enum EnhanceError {
    #[error("window is not available")]
    MissingWindow,
    #[error("document is not available")]
    MissingDocument,
    #[error("document has no body")]
    MissingBody,
    #[error("dom operation failed: {0}")]
    Dom(String),
    #[error("clipboard api is not available")]
    ClipboardUnavailable,
    #[error("copy command was rejected")]
    CopyCommandRejected,
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(target_arch = "wasm32")]
impl From<wasm_bindgen::JsValue> for EnhanceError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        use wasm_bindgen::JsCast;

        let message = value
            .dyn_ref::<js_sys::Error>()
            .map(|error| String::from(error.message()))
            .or_else(|| value.as_string())
            .unwrap_or_else(|| format!("{value:?}"));
        Self::Dom(message)
    }
}

impl From<serde_json::Error> for EnhanceError {
    fn from(value: serde_json::Error) -> Self {
        Self::InvalidConfig(value.to_string())
    }
}
