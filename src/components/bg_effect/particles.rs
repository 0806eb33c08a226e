//! The three particle variants.
//!
//! Every particle owns only its own kinematic and appearance fields. The
//! viewport, tuning, random source and drawing context are passed in by the
//! pool, so a particle never holds a reference to shared resources.
//!
//! Particles are recycled in place: when one leaves the screen its parameters
//! are re-rolled and it is moved to a re-entry point.

use super::random::RandomSource;
use super::surface::{DrawContext, Sprite};
use super::theme::{Color, ConfettiStyle, EffectTheme, PetalStyle, VeilStyle};
use super::types::{ParticleKind, Viewport};

/// Vertical frequency of the sideways sway.
const SWAY_FREQUENCY: f64 = 0.01;

/// Where a recycled petal re-enters, given a sample drawn uniformly over
/// `[0, width + height)`.
///
/// Samples past the width land on the left edge, the rest on the top edge, so
/// each edge receives re-entries in proportion to its length.
pub fn reentry_point(sample: f64, width: f64, height: f64) -> (f64, f64) {
	debug_assert!(sample <= width + height);
	if sample > width {
		(0.0, sample - width)
	} else {
		(sample, 0.0)
	}
}

/// Tumbling petal blown diagonally across the screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Petal {
	pub x: f64,
	pub y: f64,
	pub w: f64,
	pub h: f64,
	pub opacity: f64,
	/// Phase driving the width/height warp.
	pub flip: f64,
	pub x_speed: f64,
	pub y_speed: f64,
	pub flip_speed: f64,
}

impl Petal {
	/// Spread over the screen and up to one screen height above it.
	pub fn spawn(view: Viewport, style: &PetalStyle, rng: &mut impl RandomSource) -> Self {
		let x = rng.next_f64() * view.width;
		let y = rng.next_f64() * view.height * 2.0 - view.height;
		let mut petal = Self {
			x,
			y,
			w: 0.0,
			h: 0.0,
			opacity: 0.0,
			flip: 0.0,
			x_speed: 0.0,
			y_speed: 0.0,
			flip_speed: 0.0,
		};
		petal.initialize(style, rng);
		petal
	}

	/// Re-roll size, opacity and speeds. Position is left untouched.
	pub fn initialize(&mut self, style: &PetalStyle, rng: &mut impl RandomSource) {
		self.w = style.width.sample(rng);
		self.h = style.height.sample(rng);
		self.opacity = self.w / style.opacity_divisor;
		self.flip = style.flip.sample(rng);
		self.x_speed = style.x_speed.sample(rng);
		self.y_speed = style.y_speed.sample(rng);
		self.flip_speed = style.flip_speed.sample(rng);
	}

	pub fn advance(&mut self, view: Viewport, style: &PetalStyle, rng: &mut impl RandomSource) {
		self.x += self.x_speed;
		self.y += self.y_speed;
		self.flip += self.flip_speed;

		if self.y > view.height || self.x > view.width {
			self.initialize(style, rng);
			let sample = rng.next_f64() * (view.width + view.height);
			(self.x, self.y) = reentry_point(sample, view.width, view.height);
		}
	}

	/// Width factor in `[0.6, 0.94]`.
	pub fn width_warp(&self) -> f64 {
		0.6 + self.flip.cos().abs() / 3.0
	}

	/// Height factor in `[0.8, 1.0]`.
	pub fn height_warp(&self) -> f64 {
		0.8 + self.flip.sin().abs() / 5.0
	}

	pub fn draw<D: DrawContext>(&self, ctx: &mut D, sprite: Option<&D::Image>) {
		let Some(img) = sprite else {
			return;
		};
		ctx.set_global_alpha(self.opacity);
		ctx.draw_image(
			img,
			self.x,
			self.y,
			self.w * self.width_warp(),
			self.h * self.height_warp(),
		);
	}
}

/// Shared fall-and-sway motion for veils and confetti.
#[derive(Clone, Debug, PartialEq)]
pub struct Drift {
	pub x: f64,
	pub y: f64,
	pub speed: f64,
	pub sway: f64,
}

impl Drift {
	/// Fall by `speed`, then sway sideways as a sine of the new height.
	pub fn step(&mut self) {
		self.y += self.speed;
		self.x += (self.y * SWAY_FREQUENCY).sin() * self.sway;
	}

	fn place(
		view: Viewport,
		initial: bool,
		respawn_y: f64,
		rng: &mut impl RandomSource,
	) -> (f64, f64) {
		let x = rng.next_f64() * view.width;
		let y = if initial {
			rng.next_f64() * view.height
		} else {
			respawn_y
		};
		(x, y)
	}
}

/// Large translucent sprite falling slowly while rotating.
#[derive(Clone, Debug, PartialEq)]
pub struct Veil {
	pub drift: Drift,
	pub scale: f64,
	pub rotation: f64,
	pub rotate_speed: f64,
	pub alpha: f64,
}

impl Veil {
	pub fn spawn(view: Viewport, style: &VeilStyle, rng: &mut impl RandomSource) -> Self {
		let mut veil = Self {
			drift: Drift {
				x: 0.0,
				y: 0.0,
				speed: 0.0,
				sway: 0.0,
			},
			scale: 0.0,
			rotation: 0.0,
			rotate_speed: 0.0,
			alpha: 0.0,
		};
		veil.reset(view, style, true, rng);
		veil
	}

	/// Re-roll everything. `initial` scatters over the viewport, otherwise the
	/// veil starts above it at `respawn_y`.
	pub fn reset(
		&mut self,
		view: Viewport,
		style: &VeilStyle,
		initial: bool,
		rng: &mut impl RandomSource,
	) {
		let (x, y) = Drift::place(view, initial, style.respawn_y, rng);
		self.scale = style.scale.sample(rng);
		self.drift = Drift {
			x,
			y,
			speed: style.speed.sample(rng),
			sway: style.sway.sample(rng),
		};
		self.rotation = style.rotation.sample(rng);
		self.rotate_speed = style.rotate_speed.sample(rng);
		self.alpha = style.alpha.sample(rng);
	}

	pub fn advance(&mut self, view: Viewport, style: &VeilStyle, rng: &mut impl RandomSource) {
		self.drift.step();
		self.rotation += self.rotate_speed;

		if self.drift.y > view.height + style.exit_margin {
			self.reset(view, style, false, rng);
		}
	}

	pub fn draw<D: DrawContext>(&self, ctx: &mut D, sprite: Option<&D::Image>) {
		let Some(img) = sprite else {
			return;
		};
		let (w, h) = (img.width() * self.scale, img.height() * self.scale);

		let mut ctx = ctx.saved();
		ctx.translate(self.drift.x, self.drift.y);
		ctx.rotate(self.rotation);
		ctx.set_global_alpha(self.alpha);
		ctx.draw_image(img, -w / 2.0, -h / 2.0, w, h);
	}
}

/// Small filled dot.
#[derive(Clone, Debug, PartialEq)]
pub struct Confetti {
	pub drift: Drift,
	/// Radius in pixels.
	pub size: f64,
	pub alpha: f64,
	pub color: Color,
}

impl Confetti {
	pub fn spawn(view: Viewport, style: &ConfettiStyle, rng: &mut impl RandomSource) -> Self {
		let mut dot = Self {
			drift: Drift {
				x: 0.0,
				y: 0.0,
				speed: 0.0,
				sway: 0.0,
			},
			size: 0.0,
			alpha: 0.0,
			color: Color::rgba(0, 0, 0, 0.0),
		};
		dot.reset(view, style, true, rng);
		dot
	}

	pub fn reset(
		&mut self,
		view: Viewport,
		style: &ConfettiStyle,
		initial: bool,
		rng: &mut impl RandomSource,
	) {
		let (x, y) = Drift::place(view, initial, style.respawn_y, rng);
		self.size = style.size.sample(rng);
		self.drift = Drift {
			x,
			y,
			speed: style.speed.sample(rng),
			sway: style.sway.sample(rng),
		};
		self.alpha = style.alpha.sample(rng);
		self.color = style.pick_color(rng);
	}

	pub fn advance(&mut self, view: Viewport, style: &ConfettiStyle, rng: &mut impl RandomSource) {
		self.drift.step();

		if self.drift.y > view.height + style.exit_margin {
			self.reset(view, style, false, rng);
		}
	}

	pub fn draw<D: DrawContext>(&self, ctx: &mut D) {
		let mut ctx = ctx.saved();
		ctx.set_global_alpha(self.alpha);
		ctx.set_fill_style(&self.color.to_css());
		ctx.fill_circle(self.drift.x, self.drift.y, self.size);
	}
}

/// One particle of any variant.
#[derive(Clone, Debug, PartialEq)]
pub enum Particle {
	Petal(Petal),
	Veil(Veil),
	Confetti(Confetti),
}

impl Particle {
	pub fn spawn(
		kind: ParticleKind,
		view: Viewport,
		theme: &EffectTheme,
		rng: &mut impl RandomSource,
	) -> Self {
		match kind {
			ParticleKind::Petal => Particle::Petal(Petal::spawn(view, &theme.petal, rng)),
			ParticleKind::Veil => Particle::Veil(Veil::spawn(view, &theme.veil, rng)),
			ParticleKind::Confetti => {
				Particle::Confetti(Confetti::spawn(view, &theme.confetti, rng))
			}
		}
	}

	pub fn kind(&self) -> ParticleKind {
		match self {
			Particle::Petal(_) => ParticleKind::Petal,
			Particle::Veil(_) => ParticleKind::Veil,
			Particle::Confetti(_) => ParticleKind::Confetti,
		}
	}

	pub fn position(&self) -> (f64, f64) {
		match self {
			Particle::Petal(p) => (p.x, p.y),
			Particle::Veil(v) => (v.drift.x, v.drift.y),
			Particle::Confetti(c) => (c.drift.x, c.drift.y),
		}
	}

	/// Move one frame, recycling the particle if it left the screen.
	pub fn advance(&mut self, view: Viewport, theme: &EffectTheme, rng: &mut impl RandomSource) {
		match self {
			Particle::Petal(p) => p.advance(view, &theme.petal, rng),
			Particle::Veil(v) => v.advance(view, &theme.veil, rng),
			Particle::Confetti(c) => c.advance(view, &theme.confetti, rng),
		}
	}

	/// Draw at the current position. Image variants draw nothing without a sprite.
	pub fn draw<D: DrawContext>(&self, ctx: &mut D, sprite: Option<&D::Image>) {
		match self {
			Particle::Petal(p) => p.draw(ctx, sprite),
			Particle::Veil(v) => v.draw(ctx, sprite),
			Particle::Confetti(c) => c.draw(ctx),
		}
	}

	pub fn animate<D: DrawContext>(
		&mut self,
		view: Viewport,
		theme: &EffectTheme,
		rng: &mut impl RandomSource,
		ctx: &mut D,
		sprite: Option<&D::Image>,
	) {
		self.advance(view, theme, rng);
		self.draw(ctx, sprite);
	}
}
