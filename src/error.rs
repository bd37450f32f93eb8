use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Error, Debug)]
pub enum SiteError {
    #[error("no global window")]
    MissingWindow,

    #[error("window has no document")]
    MissingDocument,

    #[error("JavaScript error: {0}")]
    Js(String),

    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Style injection error: {0}")]
    Style(String),

    #[error("error initializing log: {0}")]
    Logger(#[from] log::SetLoggerError),
}

impl From<JsValue> for SiteError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        SiteError::Js(message)
    }
}

impl From<stylist::Error> for SiteError {
    fn from(err: stylist::Error) -> Self {
        SiteError::Style(err.to_string())
    }
}

impl From<SiteError> for JsValue {
    fn from(err: SiteError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SiteError>;
