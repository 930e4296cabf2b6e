//! Crate error type.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures at the edges of the app: API payload text and DOM queries.
///
/// The tree and geometry code never produce these; callers log them and
/// render an empty or partial result instead.
#[derive(Error, Debug)]
pub enum AppError {
	/// Response body was not valid JSON for the expected shape.
	#[error("Malformed payload: {0}")]
	MalformedPayload(#[from] serde_json::Error),

	/// A browser API call threw.
	#[error("DOM error: {0}")]
	Dom(String),
}

impl AppError {
	pub(crate) fn dom(err: JsValue) -> Self {
		AppError::Dom(err.as_string().unwrap_or_else(|| format!("{err:?}")))
	}
}
