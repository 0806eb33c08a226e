//! Particle pool and the animation driver state machine.
//!
//! The driver is platform independent: the browser hands it a drawing context,
//! a random source and a [`FrameScheduler`] on every call. It never holds a
//! callback itself, which keeps the lifecycle testable on the host.

use log::{debug, info};

use super::particles::Particle;
use super::random::RandomSource;
use super::surface::DrawContext;
use super::theme::{EffectTheme, PoolStyle};
use super::types::{ParticleKind, Viewport};

/// Opaque id of a pending frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameHandle(pub i32);

/// Requests and cancels per-refresh callbacks.
pub trait FrameScheduler {
	/// Ask for the next frame. `None` means the host refused.
	fn request_frame(&mut self) -> Option<FrameHandle>;
	fn cancel_frame(&mut self, handle: FrameHandle);
}

/// Number of particles for a viewport: one per `area_per_particle` square
/// pixels, capped at `max_count`.
pub fn particle_count(view: Viewport, style: &PoolStyle) -> usize {
	let by_area = (view.area() / style.area_per_particle).floor();
	if by_area.is_finite() && by_area > 0.0 {
		(by_area as usize).min(style.max_count)
	} else {
		0
	}
}

/// Fixed-size collection of one particle variant.
#[derive(Clone, Debug)]
pub struct ParticlePool {
	kind: ParticleKind,
	view: Viewport,
	particles: Vec<Particle>,
}

impl ParticlePool {
	/// Build a freshly randomized pool sized to `view`.
	pub fn populate(
		kind: ParticleKind,
		view: Viewport,
		theme: &EffectTheme,
		rng: &mut impl RandomSource,
	) -> Self {
		let count = particle_count(view, &theme.pool);
		let particles = (0..count)
			.map(|_| Particle::spawn(kind, view, theme, rng))
			.collect();
		debug!(
			"bg-effect: pool of {} {:?} for {}x{}",
			count, kind, view.width, view.height
		);
		Self {
			kind,
			view,
			particles,
		}
	}

	pub fn kind(&self) -> ParticleKind {
		self.kind
	}

	pub fn viewport(&self) -> Viewport {
		self.view
	}

	pub fn len(&self) -> usize {
		self.particles.len()
	}

	pub fn is_empty(&self) -> bool {
		self.particles.is_empty()
	}

	pub fn particles(&self) -> &[Particle] {
		&self.particles
	}

	/// Advance and draw every particle in pool order.
	pub fn animate<D: DrawContext>(
		&mut self,
		theme: &EffectTheme,
		rng: &mut impl RandomSource,
		ctx: &mut D,
		sprite: Option<&D::Image>,
	) {
		for p in &mut self.particles {
			p.animate(self.view, theme, rng, ctx, sprite);
		}
	}
}

/// Lifecycle of an [`AnimationDriver`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverPhase {
	Uninitialized,
	Running,
	/// Terminal. No further frames are drawn or requested.
	TornDown,
}

/// Owns the pool and drives the clear / animate / reschedule loop.
pub struct AnimationDriver<I> {
	kind: ParticleKind,
	theme: EffectTheme,
	sprite: Option<I>,
	pool: ParticlePool,
	phase: DriverPhase,
	pending: Option<FrameHandle>,
	frames: u64,
}

impl<I> AnimationDriver<I> {
	pub fn new(kind: ParticleKind, theme: EffectTheme, sprite: Option<I>) -> Self {
		Self {
			kind,
			theme,
			sprite,
			pool: ParticlePool {
				kind,
				view: Viewport::default(),
				particles: Vec::new(),
			},
			phase: DriverPhase::Uninitialized,
			pending: None,
			frames: 0,
		}
	}

	pub fn phase(&self) -> DriverPhase {
		self.phase
	}

	pub fn pool(&self) -> &ParticlePool {
		&self.pool
	}

	pub fn pending(&self) -> Option<FrameHandle> {
		self.pending
	}

	/// Frames drawn since start.
	pub fn frames(&self) -> u64 {
		self.frames
	}

	/// Build the pool for `view` and render the first frame, which also
	/// requests the next one. Ignored unless the driver is uninitialized.
	pub fn start<D>(
		&mut self,
		view: Viewport,
		ctx: &mut D,
		rng: &mut impl RandomSource,
		scheduler: &mut impl FrameScheduler,
	) -> bool
	where
		D: DrawContext<Image = I>,
	{
		if self.phase != DriverPhase::Uninitialized {
			return false;
		}
		self.pool = ParticlePool::populate(self.kind, view, &self.theme, rng);
		self.phase = DriverPhase::Running;
		info!(
			"bg-effect: started {:?} with {} particles",
			self.kind,
			self.pool.len()
		);
		self.frame(ctx, rng, scheduler);
		true
	}

	/// One refresh: clear the surface, animate every particle, request the
	/// next frame. Does nothing unless running.
	pub fn frame<D>(
		&mut self,
		ctx: &mut D,
		rng: &mut impl RandomSource,
		scheduler: &mut impl FrameScheduler,
	) where
		D: DrawContext<Image = I>,
	{
		if self.phase != DriverPhase::Running {
			return;
		}
		self.pending = None;

		let view = self.pool.view;
		ctx.clear(view.width, view.height);
		self.pool
			.animate(&self.theme, rng, ctx, self.sprite.as_ref());
		self.frames += 1;

		self.pending = scheduler.request_frame();
	}

	/// Replace the pool with a fresh one sized to `view`. Old particles are
	/// discarded. Ignored unless running.
	pub fn resize(&mut self, view: Viewport, rng: &mut impl RandomSource) -> bool {
		if self.phase != DriverPhase::Running {
			return false;
		}
		self.pool = ParticlePool::populate(self.kind, view, &self.theme, rng);
		true
	}

	/// Cancel the pending frame and enter the terminal phase. Safe to call
	/// any number of times.
	pub fn stop(&mut self, scheduler: &mut impl FrameScheduler) {
		if let Some(handle) = self.pending.take() {
			scheduler.cancel_frame(handle);
		}
		if self.phase != DriverPhase::TornDown {
			info!("bg-effect: stopped after {} frames", self.frames);
		}
		self.phase = DriverPhase::TornDown;
	}
}

#[cfg(test)]
mod tests {
	use super::super::random::testing::{Scripted, Seeded};
	use super::super::surface::testing::{Op, Recorder, StubSprite};
	use super::*;

	/// Hands out increasing ids and remembers what was cancelled.
	#[derive(Default)]
	struct CountingScheduler {
		next: i32,
		requested: usize,
		cancelled: Vec<FrameHandle>,
	}

	impl FrameScheduler for CountingScheduler {
		fn request_frame(&mut self) -> Option<FrameHandle> {
			self.requested += 1;
			self.next += 1;
			Some(FrameHandle(self.next))
		}

		fn cancel_frame(&mut self, handle: FrameHandle) {
			self.cancelled.push(handle);
		}
	}

	const SPRITE: StubSprite = StubSprite {
		width: 64.0,
		height: 64.0,
	};

	fn driver(kind: ParticleKind) -> AnimationDriver<StubSprite> {
		AnimationDriver::new(kind, EffectTheme::default(), Some(SPRITE))
	}

	#[test]
	fn count_scales_with_area_and_caps() {
		let style = EffectTheme::default().pool;
		assert_eq!(particle_count(Viewport::new(100.0, 100.0), &style), 0);
		assert_eq!(particle_count(Viewport::new(3000.0, 3000.0), &style), 45);
		assert_eq!(particle_count(Viewport::new(800.0, 600.0), &style), 13);
		assert_eq!(particle_count(Viewport::new(0.0, 900.0), &style), 0);
	}

	#[test]
	fn empty_pool_draws_only_the_clear() {
		let mut d = driver(ParticleKind::Confetti);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		assert!(d.start(Viewport::new(100.0, 100.0), &mut rec, &mut Seeded::new(1), &mut sched));

		assert!(d.pool().is_empty());
		assert_eq!(rec.ops, vec![Op::Clear(100.0, 100.0)]);
		assert_eq!(d.pending(), Some(FrameHandle(1)));
	}

	#[test]
	fn start_renders_first_frame_and_schedules_next() {
		let mut d = driver(ParticleKind::Confetti);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(2);
		d.start(Viewport::new(800.0, 600.0), &mut rec, &mut rng, &mut sched);

		assert_eq!(d.phase(), DriverPhase::Running);
		assert_eq!(d.pool().len(), 13);
		assert_eq!(d.frames(), 1);
		assert_eq!(sched.requested, 1);
		assert_eq!(rec.ops[0], Op::Clear(800.0, 600.0));
		assert_eq!(rec.count(|op| matches!(op, Op::Circle { .. })), 13);

		d.frame(&mut rec, &mut rng, &mut sched);
		assert_eq!(d.frames(), 2);
		assert_eq!(d.pending(), Some(FrameHandle(2)));
	}

	#[test]
	fn start_twice_is_ignored() {
		let mut d = driver(ParticleKind::Veil);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(3);
		assert!(d.start(Viewport::new(800.0, 600.0), &mut rec, &mut rng, &mut sched));
		assert!(!d.start(Viewport::new(3000.0, 3000.0), &mut rec, &mut rng, &mut sched));
		assert_eq!(d.pool().len(), 13);
		assert_eq!(sched.requested, 1);
	}

	#[test]
	fn frame_before_start_does_nothing() {
		let mut d = driver(ParticleKind::Petal);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		d.frame(&mut rec, &mut Seeded::new(4), &mut sched);
		assert!(rec.ops.is_empty());
		assert_eq!(sched.requested, 0);
		assert!(!d.resize(Viewport::new(800.0, 600.0), &mut Seeded::new(4)));
	}

	#[test]
	fn resize_rebuilds_a_fresh_pool() {
		let mut d = driver(ParticleKind::Confetti);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(5);
		d.start(Viewport::new(800.0, 600.0), &mut rec, &mut rng, &mut sched);
		for _ in 0..10 {
			d.frame(&mut rec, &mut rng, &mut sched);
		}
		let old = d.pool().particles().to_vec();

		// A constant source gives every new particle the same recognizable state.
		let mut fresh = Scripted::constant(0.5);
		assert!(d.resize(Viewport::new(1400.0, 1000.0), &mut fresh));
		assert_eq!(d.pool().len(), 40);
		assert_eq!(d.pool().viewport(), Viewport::new(1400.0, 1000.0));

		let expected = Particle::spawn(
			ParticleKind::Confetti,
			Viewport::new(1400.0, 1000.0),
			&EffectTheme::default(),
			&mut Scripted::constant(0.5),
		);
		assert_eq!(d.pool().kind(), ParticleKind::Confetti);
		for p in d.pool().particles() {
			assert_eq!(p.kind(), ParticleKind::Confetti);
			assert_eq!(*p, expected);
			assert!(!old.contains(p));
		}
		assert_eq!(d.phase(), DriverPhase::Running);
	}

	#[test]
	fn resize_to_tiny_viewport_empties_pool() {
		let mut d = driver(ParticleKind::Petal);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(6);
		d.start(Viewport::new(3000.0, 3000.0), &mut rec, &mut rng, &mut sched);
		assert_eq!(d.pool().len(), 45);

		d.resize(Viewport::new(100.0, 100.0), &mut rng);
		rec.ops.clear();
		d.frame(&mut rec, &mut rng, &mut sched);
		assert_eq!(rec.ops, vec![Op::Clear(100.0, 100.0)]);
	}

	#[test]
	fn stop_cancels_pending_and_is_idempotent() {
		let mut d = driver(ParticleKind::Confetti);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(7);
		d.start(Viewport::new(800.0, 600.0), &mut rec, &mut rng, &mut sched);

		d.stop(&mut sched);
		d.stop(&mut sched);
		assert_eq!(d.phase(), DriverPhase::TornDown);
		assert_eq!(sched.cancelled, vec![FrameHandle(1)]);
		assert_eq!(d.pending(), None);

		// A callback that was already in flight must not draw or reschedule.
		rec.ops.clear();
		d.frame(&mut rec, &mut rng, &mut sched);
		assert!(rec.ops.is_empty());
		assert_eq!(sched.requested, 1);
		assert!(!d.resize(Viewport::new(800.0, 600.0), &mut rng));
	}

	#[test]
	fn stop_before_start_is_terminal() {
		let mut d = driver(ParticleKind::Veil);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		d.stop(&mut sched);
		assert!(sched.cancelled.is_empty());
		assert!(!d.start(Viewport::new(800.0, 600.0), &mut rec, &mut Seeded::new(8), &mut sched));
		assert_eq!(sched.requested, 0);
	}

	#[test]
	fn frames_never_touch_viewport_or_cancel() {
		let mut d = driver(ParticleKind::Veil);
		let (mut rec, mut sched) = (Recorder::default(), CountingScheduler::default());
		let mut rng = Seeded::new(9);
		let view = Viewport::new(1024.0, 768.0);
		d.start(view, &mut rec, &mut rng, &mut sched);
		for _ in 0..500 {
			d.frame(&mut rec, &mut rng, &mut sched);
		}
		assert_eq!(d.pool().viewport(), view);
		assert!(sched.cancelled.is_empty());
		assert_eq!(sched.requested, 501);
		assert_eq!(rec.depth(), 0);
		assert_eq!(rec.max_depth, 1);
	}
}
