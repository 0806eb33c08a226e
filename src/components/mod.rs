//! UI components.

pub mod bg_effect;
