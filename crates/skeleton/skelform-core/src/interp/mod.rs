//! Interpolation helpers.
//!
//! Everything in the runtime interpolates linearly: keyframe segments and the
//! blend window ramp share [`functions::interpolate`].

pub mod functions;

pub use functions::{interpolate, lerp_f32};
