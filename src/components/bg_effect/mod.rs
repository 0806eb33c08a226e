//! Animated background of drifting particles.
//!
//! Renders one of three particle variants on a full-viewport canvas:
//! - Petals tumbling diagonally in from the top and left edges
//! - Veils: large translucent sprites falling slowly while rotating
//! - Confetti: small translucent dots swaying as they fall
//!
//! The pool is sized to the viewport area and rebuilt on resize. Each frame
//! the canvas is cleared and every particle moves, then draws itself.
//!
//! # Example
//!
//! ```ignore
//! use petal_drift::{BgEffect, ParticleKind};
//!
//! view! { <BgEffect kind=ParticleKind::Petal sprite=Some("/icons/petal.png".into()) /> }
//! ```

mod component;
pub mod error;
pub mod particles;
pub mod random;
pub mod state;
pub mod surface;
pub mod theme;
mod types;

pub use component::BgEffect;
pub use error::MountError;
pub use state::{AnimationDriver, DriverPhase, FrameHandle, FrameScheduler, ParticlePool};
pub use theme::EffectTheme;
pub use types::{EffectSettings, ParticleKind, Viewport};
