//! Visual tuning for the background effect.
//!
//! Every randomized particle parameter is described by a [`Span`]: a minimum
//! plus a random spread. The defaults reproduce the look of the hand-tuned
//! petal, veil and confetti effects.

use std::f64::consts::TAU;

use super::random::RandomSource;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn to_css(self) -> String {
		format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
	}
}

/// Half-open random interval `[min, min + spread)`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Span {
	pub min: f64,
	pub spread: f64,
}

impl Span {
	pub const fn new(min: f64, spread: f64) -> Self {
		Self { min, spread }
	}

	pub fn max(&self) -> f64 {
		self.min + self.spread
	}

	pub fn sample(&self, rng: &mut impl RandomSource) -> f64 {
		self.min + rng.next_f64() * self.spread
	}

	/// Closed-interval membership, used to check sampled values.
	pub fn contains(&self, value: f64) -> bool {
		value >= self.min && value <= self.max()
	}
}

/// How many particles a viewport gets.
#[derive(Clone, Debug)]
pub struct PoolStyle {
	/// Hard cap regardless of viewport size.
	pub max_count: usize,
	/// Square pixels of viewport per particle.
	pub area_per_particle: f64,
}

/// Drifting petal tuning.
#[derive(Clone, Debug)]
pub struct PetalStyle {
	pub width: Span,
	pub height: Span,
	/// Opacity is `width / opacity_divisor`.
	pub opacity_divisor: f64,
	pub flip: Span,
	pub x_speed: Span,
	pub y_speed: Span,
	pub flip_speed: Span,
}

/// Falling veil tuning.
#[derive(Clone, Debug)]
pub struct VeilStyle {
	pub scale: Span,
	pub speed: Span,
	pub sway: Span,
	pub rotation: Span,
	pub rotate_speed: Span,
	pub alpha: Span,
	/// Distance below the viewport at which a veil is recycled.
	pub exit_margin: f64,
	/// Height a recycled veil re-enters at.
	pub respawn_y: f64,
}

/// Confetti dot tuning.
#[derive(Clone, Debug)]
pub struct ConfettiStyle {
	pub size: Span,
	pub speed: Span,
	pub sway: Span,
	pub alpha: Span,
	pub exit_margin: f64,
	pub respawn_y: f64,
	pub palette: Vec<Color>,
}

impl ConfettiStyle {
	/// Uniform pick from the palette.
	pub fn pick_color(&self, rng: &mut impl RandomSource) -> Color {
		let n = self.palette.len();
		let i = (rng.next_f64() * n as f64).floor() as usize;
		self.palette[i.min(n.saturating_sub(1))]
	}
}

/// Complete tuning for all variants.
#[derive(Clone, Debug)]
pub struct EffectTheme {
	pub pool: PoolStyle,
	pub petal: PetalStyle,
	pub veil: VeilStyle,
	pub confetti: ConfettiStyle,
}

impl EffectTheme {
	/// Soft spring palette (default)
	pub fn spring() -> Self {
		Self {
			pool: PoolStyle {
				max_count: 45,
				area_per_particle: 35_000.0,
			},
			petal: PetalStyle {
				width: Span::new(35.0, 15.0),
				height: Span::new(30.0, 10.0),
				opacity_divisor: 80.0,
				flip: Span::new(0.0, 1.0),
				x_speed: Span::new(0.6, 0.8),
				y_speed: Span::new(0.4, 0.4),
				flip_speed: Span::new(0.0, 0.02),
			},
			veil: VeilStyle {
				scale: Span::new(0.28, 0.32),
				speed: Span::new(0.25, 0.4),
				sway: Span::new(0.6, 1.2),
				rotation: Span::new(0.0, TAU),
				rotate_speed: Span::new(-0.0015, 0.003),
				alpha: Span::new(0.28, 0.22),
				exit_margin: 400.0,
				respawn_y: -300.0,
			},
			confetti: ConfettiStyle {
				size: Span::new(4.0, 6.0),
				speed: Span::new(0.4, 0.8),
				sway: Span::new(0.0, 0.6),
				alpha: Span::new(0.35, 0.5),
				exit_margin: 20.0,
				respawn_y: -20.0,
				palette: vec![
					Color::rgba(255, 250, 240, 0.9), // Ivory
					Color::rgba(200, 215, 205, 0.9), // Sage
					Color::rgba(245, 200, 180, 0.9), // Apricot
				],
			},
		}
	}
}

impl Default for EffectTheme {
	fn default() -> Self {
		Self::spring()
	}
}

#[cfg(test)]
mod tests {
	use super::super::random::testing::Scripted;
	use super::*;

	#[test]
	fn span_sample_bounds() {
		let span = Span::new(0.28, 0.22);
		assert_eq!(span.sample(&mut Scripted::constant(0.0)), 0.28);
		let top = span.sample(&mut Scripted::constant(0.999_999));
		assert!(top < span.max() && span.contains(top));
	}

	#[test]
	fn palette_pick_covers_all_entries() {
		let style = EffectTheme::default().confetti;
		assert_eq!(style.pick_color(&mut Scripted::constant(0.0)), style.palette[0]);
		assert_eq!(style.pick_color(&mut Scripted::constant(0.5)), style.palette[1]);
		assert_eq!(style.pick_color(&mut Scripted::constant(0.999)), style.palette[2]);
	}

	#[test]
	fn css_keeps_translucency() {
		assert_eq!(
			Color::rgba(200, 215, 205, 0.9).to_css(),
			"rgba(200, 215, 205, 0.9)"
		);
	}
}
