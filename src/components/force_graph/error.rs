use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures of the browser plumbing around the graph. The layout itself cannot fail.
#[derive(Debug, Error)]
#[allow(missing_docs)]
pub enum GraphError {
	#[error("no global window")]
	NoWindow,
	#[error("canvas has no 2d context")]
	NoContext,
	#[error("javascript error: {0}")]
	Js(String),
	#[error("invalid graph json: {0}")]
	Json(#[from] serde_json::Error),
}

impl From<JsValue> for GraphError {
	fn from(value: JsValue) -> Self {
		GraphError::Js(value.as_string().unwrap_or_else(|| format!("{value:?}")))
	}
}
