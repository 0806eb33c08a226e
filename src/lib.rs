//! petal-drift: animated canvas background of drifting petals, veils and confetti.
//!
//! This crate provides a WASM-based Leptos component that fills the viewport
//! with a decorative particle animation, redrawn once per display refresh.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;

pub use components::bg_effect::{BgEffect, EffectSettings, ParticleKind};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("petal-drift: logging initialized");
}

/// Parse settings JSON, falling back to defaults on malformed input.
pub fn parse_settings(json_text: &str) -> EffectSettings {
	match serde_json::from_str::<EffectSettings>(json_text) {
		Ok(settings) => {
			info!("petal-drift: using {:?} particles", settings.kind);
			settings
		}
		Err(e) => {
			warn!("petal-drift: failed to parse effect settings: {}", e);
			EffectSettings::default()
		}
	}
}

/// Load effect settings from a script element with id="bg-effect-settings".
/// Expected format: JSON with { kind: "petal" | "veil" | "confetti", sprite: "<url>" }
fn load_settings() -> Option<EffectSettings> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("bg-effect-settings")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;
	Some(parse_settings(&json_text))
}

/// Main application component.
/// Reads effect settings from the DOM and mounts the background canvas.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let settings = load_settings().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" />
		<Title text="petal-drift" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="bg-effect-layer" style="position: fixed; inset: 0; z-index: -1;">
			<BgEffect kind=settings.kind sprite=settings.sprite />
		</div>
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn malformed_settings_fall_back_to_confetti() {
		assert_eq!(parse_settings("not json"), EffectSettings::default());
		assert_eq!(parse_settings(r#"{"kind": 3}"#).kind, ParticleKind::Confetti);
	}

	#[test]
	fn settings_pick_variant() {
		let s = parse_settings(r#"{"kind": "petal", "sprite": "/icons/petal.png"}"#);
		assert_eq!(s.kind, ParticleKind::Petal);
		assert_eq!(s.sprite.as_deref(), Some("/icons/petal.png"));
	}
}
