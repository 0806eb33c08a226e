//! Failures that prevent the effect from mounting.

use thiserror::Error;

use super::types::ParticleKind;

/// The effect cannot run in this environment. Logged once, never retried.
#[derive(Debug, Error)]
pub enum MountError {
	#[error("no global window")]
	NoWindow,
	#[error("canvas has no 2d context: {0}")]
	NoContext(String),
	#[error("could not measure the viewport")]
	Viewport,
	#[error("{0:?} particles need a sprite url")]
	MissingSprite(ParticleKind),
	#[error("browser call failed: {0}")]
	Js(String),
}

impl From<wasm_bindgen::JsValue> for MountError {
	fn from(value: wasm_bindgen::JsValue) -> Self {
		MountError::Js(format!("{value:?}"))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_name_the_cause() {
		assert_eq!(
			MountError::MissingSprite(ParticleKind::Veil).to_string(),
			"Veil particles need a sprite url"
		);
		assert_eq!(
			MountError::NoContext("null".into()).to_string(),
			"canvas has no 2d context: null"
		);
	}
}
