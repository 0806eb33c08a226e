//! Leptos component wrapping the background effect canvas.
//!
//! The component creates a canvas that fills the viewport, builds an
//! [`AnimationDriver`] once the 2D context (and, for image variants, the
//! sprite) is available, and keeps it running through `requestAnimationFrame`.
//! Window resizes rebuild the particle pool. Unmounting cancels the pending
//! frame and detaches every listener.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use send_wrapper::SendWrapper;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlImageElement, Window};

use super::error::MountError;
use super::random::JsRandom;
use super::state::{AnimationDriver, FrameHandle, FrameScheduler};
use super::theme::EffectTheme;
use super::types::{ParticleKind, Viewport};

type Callback = Rc<RefCell<Option<Closure<dyn FnMut()>>>>;

/// `requestAnimationFrame` bound to the session's frame callback.
struct RafScheduler {
	window: Window,
	callback: Callback,
}

impl FrameScheduler for RafScheduler {
	fn request_frame(&mut self) -> Option<FrameHandle> {
		let callback = self.callback.borrow();
		let cb = callback.as_ref()?;
		self.window
			.request_animation_frame(cb.as_ref().unchecked_ref())
			.ok()
			.map(FrameHandle)
	}

	fn cancel_frame(&mut self, handle: FrameHandle) {
		let _ = self.window.cancel_animation_frame(handle.0);
	}
}

/// Everything the frame callback touches.
struct Mounted {
	driver: AnimationDriver<HtmlImageElement>,
	window: Window,
	canvas: HtmlCanvasElement,
	ctx: CanvasRenderingContext2d,
	rng: JsRandom,
	scheduler: RafScheduler,
}

/// Shared handles between the component, its closures and its cleanup.
#[derive(Clone, Default)]
struct Session {
	mounted: Rc<RefCell<Option<Mounted>>>,
	animate: Callback,
	on_resize: Callback,
	on_load: Callback,
	sprite: Rc<RefCell<Option<HtmlImageElement>>>,
	started: Rc<Cell<bool>>,
	torn_down: Rc<Cell<bool>>,
}

/// Size the canvas to the window and report the resulting drawing area.
fn fit_canvas(window: &Window, canvas: &HtmlCanvasElement) -> Result<Viewport, MountError> {
	let w = window.inner_width()?.as_f64().ok_or(MountError::Viewport)?;
	let h = window.inner_height()?.as_f64().ok_or(MountError::Viewport)?;
	canvas.set_width(w as u32);
	canvas.set_height(h as u32);
	Ok(Viewport::new(canvas.width() as f64, canvas.height() as f64))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Result<CanvasRenderingContext2d, MountError> {
	canvas
		.get_context("2d")?
		.ok_or_else(|| MountError::NoContext("null".into()))?
		.dyn_into()
		.map_err(|obj| MountError::NoContext(format!("{obj:?}")))
}

impl Session {
	/// Resolve the context and start right away, or once the sprite loads.
	fn mount(
		&self,
		canvas: HtmlCanvasElement,
		kind: ParticleKind,
		sprite_url: Option<String>,
	) -> Result<(), MountError> {
		if self.started.replace(true) {
			return Ok(());
		}
		let window = web_sys::window().ok_or(MountError::NoWindow)?;
		let ctx = context_2d(&canvas)?;

		if !kind.uses_sprite() {
			return self.launch(window, canvas, ctx, kind, None);
		}

		let url = sprite_url.ok_or(MountError::MissingSprite(kind))?;
		let img = HtmlImageElement::new()?;
		let (session, load_img) = (self.clone(), img.clone());
		let mut pending = Some((window, canvas, ctx));
		*self.on_load.borrow_mut() = Some(Closure::new(move || {
			let Some((window, canvas, ctx)) = pending.take() else {
				return;
			};
			if let Err(e) = session.launch(window, canvas, ctx, kind, Some(load_img.clone())) {
				error!("bg-effect: {}", e);
			}
		}));
		if let Some(ref cb) = *self.on_load.borrow() {
			img.add_event_listener_with_callback("load", cb.as_ref().unchecked_ref())?;
		}
		img.set_src(&url);
		info!("bg-effect: loading sprite {}", url);
		*self.sprite.borrow_mut() = Some(img);
		Ok(())
	}

	fn launch(
		&self,
		window: Window,
		canvas: HtmlCanvasElement,
		mut ctx: CanvasRenderingContext2d,
		kind: ParticleKind,
		sprite: Option<HtmlImageElement>,
	) -> Result<(), MountError> {
		if self.torn_down.get() {
			return Ok(());
		}
		let view = fit_canvas(&window, &canvas)?;

		let session = self.clone();
		*self.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut m) = *session.mounted.borrow_mut() {
				let Mounted {
					driver,
					ctx,
					rng,
					scheduler,
					..
				} = m;
				driver.frame(ctx, rng, scheduler);
			}
		}));

		let mut driver = AnimationDriver::new(kind, EffectTheme::default(), sprite);
		let (mut rng, mut scheduler) = (
			JsRandom,
			RafScheduler {
				window: window.clone(),
				callback: self.animate.clone(),
			},
		);
		driver.start(view, &mut ctx, &mut rng, &mut scheduler);

		let session = self.clone();
		*self.on_resize.borrow_mut() = Some(Closure::new(move || {
			if let Some(ref mut m) = *session.mounted.borrow_mut() {
				match fit_canvas(&m.window, &m.canvas) {
					Ok(view) => {
						m.driver.resize(view, &mut m.rng);
					}
					Err(e) => warn!("bg-effect: resize skipped: {}", e),
				}
			}
		}));
		if let Some(ref cb) = *self.on_resize.borrow() {
			window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref())?;
		}

		*self.mounted.borrow_mut() = Some(Mounted {
			driver,
			window,
			canvas,
			ctx,
			rng,
			scheduler,
		});
		Ok(())
	}

	/// Stop the loop and release every callback. Safe to call repeatedly.
	fn teardown(&self) {
		self.torn_down.set(true);

		let mounted = self.mounted.borrow_mut().take();
		if let Some(mut m) = mounted {
			m.driver.stop(&mut m.scheduler);
			if let Some(cb) = self.on_resize.borrow_mut().take() {
				let _ = m
					.window
					.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let sprite = self.sprite.borrow_mut().take();
		if let (Some(img), Some(cb)) = (sprite, self.on_load.borrow_mut().take()) {
			let _ = img.remove_event_listener_with_callback("load", cb.as_ref().unchecked_ref());
		}

		self.animate.borrow_mut().take();
		self.on_resize.borrow_mut().take();
	}
}

/// Full-viewport canvas of drifting particles.
///
/// `kind` picks the variant (confetti by default). Petals and veils blit the
/// image at `sprite`; without it they cannot mount and an error is logged.
#[component]
pub fn BgEffect(
	#[prop(default = ParticleKind::Confetti)] kind: ParticleKind,
	#[prop(default = None)] sprite: Option<String>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let session = Session::default();
	let session_init = session.clone();

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		if let Err(e) = session_init.mount(canvas.into(), kind, sprite.clone()) {
			error!("bg-effect: {}", e);
		}
	});

	let session = SendWrapper::new(session);
	on_cleanup(move || session.teardown());

	view! {
		<canvas
			node_ref=canvas_ref
			class="bg-effect"
			style="display: block; width: 100%; height: 100%; pointer-events: none;"
		/>
	}
}
