//! Plain data shared between the effect core and the host page.

use serde::Deserialize;

/// Drawable area in canvas pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
	pub width: f64,
	pub height: f64,
}

impl Viewport {
	pub const fn new(width: f64, height: f64) -> Self {
		Self { width, height }
	}

	pub fn area(&self) -> f64 {
		self.width * self.height
	}
}

/// Which particle variant a pool is made of.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParticleKind {
	/// Tumbling petals blown in from the top and left edges.
	Petal,
	/// Large translucent rotating shapes falling slowly.
	Veil,
	/// Small colored dots.
	#[default]
	Confetti,
}

impl ParticleKind {
	/// Whether this variant blits a sprite image instead of drawing primitives.
	pub fn uses_sprite(self) -> bool {
		matches!(self, ParticleKind::Petal | ParticleKind::Veil)
	}
}

/// Host-page settings for the background effect.
///
/// Read from a `<script id="bg-effect-settings">` JSON block, e.g.
/// `{ "kind": "petal", "sprite": "/icons/petal.png" }`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct EffectSettings {
	#[serde(default)]
	pub kind: ParticleKind,
	/// Image URL for the petal and veil variants.
	#[serde(default)]
	pub sprite: Option<String>,
}
