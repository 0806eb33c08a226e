//! Source of uniform random numbers for particle parameters.

/// Yields uniformly distributed values in `[0, 1)`.
pub trait RandomSource {
	fn next_f64(&mut self) -> f64;
}

/// Browser `Math.random()`.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsRandom;

impl RandomSource for JsRandom {
	fn next_f64(&mut self) -> f64 {
		js_sys::Math::random()
	}
}
