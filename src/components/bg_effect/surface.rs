//! Drawing capability used by the particles.
//!
//! The core only needs a handful of 2D primitives, so it draws through
//! [`DrawContext`] instead of `CanvasRenderingContext2d` directly. The browser
//! implementation lives at the bottom of this file.

use std::f64::consts::PI;
use std::ops::{Deref, DerefMut};

use web_sys::{CanvasRenderingContext2d, HtmlImageElement};

/// A decoded raster image with known intrinsic size.
pub trait Sprite {
	fn width(&self) -> f64;
	fn height(&self) -> f64;
}

/// The 2D drawing primitives the effect consumes.
pub trait DrawContext {
	type Image: Sprite;

	/// Clear the rectangle `(0, 0, width, height)`.
	fn clear(&mut self, width: f64, height: f64);
	fn set_global_alpha(&mut self, alpha: f64);
	fn set_fill_style(&mut self, css: &str);
	fn draw_image(&mut self, image: &Self::Image, x: f64, y: f64, width: f64, height: f64);
	fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
	fn translate(&mut self, x: f64, y: f64);
	fn rotate(&mut self, angle: f64);
	fn save(&mut self);
	fn restore(&mut self);

	/// Push the current transform and style; they are restored when the guard drops.
	fn saved(&mut self) -> Saved<'_, Self>
	where
		Self: Sized,
	{
		Saved::new(self)
	}
}

/// Scoped `save()`/`restore()` pair.
pub struct Saved<'a, D: DrawContext> {
	ctx: &'a mut D,
}

impl<'a, D: DrawContext> Saved<'a, D> {
	pub fn new(ctx: &'a mut D) -> Self {
		ctx.save();
		Self { ctx }
	}
}

impl<D: DrawContext> Deref for Saved<'_, D> {
	type Target = D;

	fn deref(&self) -> &D {
		&*self.ctx
	}
}

impl<D: DrawContext> DerefMut for Saved<'_, D> {
	fn deref_mut(&mut self) -> &mut D {
		&mut *self.ctx
	}
}

impl<D: DrawContext> Drop for Saved<'_, D> {
	fn drop(&mut self) {
		self.ctx.restore();
	}
}

impl Sprite for HtmlImageElement {
	fn width(&self) -> f64 {
		self.natural_width() as f64
	}

	fn height(&self) -> f64 {
		self.natural_height() as f64
	}
}

impl DrawContext for CanvasRenderingContext2d {
	type Image = HtmlImageElement;

	fn clear(&mut self, width: f64, height: f64) {
		self.clear_rect(0.0, 0.0, width, height);
	}

	fn set_global_alpha(&mut self, alpha: f64) {
		CanvasRenderingContext2d::set_global_alpha(self, alpha);
	}

	fn set_fill_style(&mut self, css: &str) {
		self.set_fill_style_str(css);
	}

	fn draw_image(&mut self, image: &HtmlImageElement, x: f64, y: f64, width: f64, height: f64) {
		let _ = self.draw_image_with_html_image_element_and_dw_and_dh(image, x, y, width, height);
	}

	fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
		self.begin_path();
		let _ = self.arc(x, y, radius, 0.0, PI * 2.0);
		self.fill();
	}

	fn translate(&mut self, x: f64, y: f64) {
		let _ = CanvasRenderingContext2d::translate(self, x, y);
	}

	fn rotate(&mut self, angle: f64) {
		let _ = CanvasRenderingContext2d::rotate(self, angle);
	}

	fn save(&mut self) {
		CanvasRenderingContext2d::save(self);
	}

	fn restore(&mut self) {
		CanvasRenderingContext2d::restore(self);
	}
}
