//! SkelForm runtime core (renderer-agnostic)
//!
//! Samples keyframe animations into bone poses, solves IK chains and composes
//! the bone hierarchy into world-space transforms. Decoding bundles, resolving
//! textures and drawing belong to the host.
//!
//! Pure entry points: [`frame`], [`animate`], [`solve_ik`],
//! [`compose_hierarchy`]. [`Animator`] chains them with cross-fading and a
//! fallible hook.

pub mod animate;
pub mod armature_json;
pub mod config;
pub mod data;
pub mod engine;
pub mod error;
pub mod hierarchy;
pub mod ik;
pub mod interp;
pub mod sampling;
pub mod scratch;
pub mod time;
pub mod vec2;

// Re-exports for consumers (renderers, loaders)
pub use animate::{animate, animate_from};
pub use armature_json::parse_armature_json;
pub use config::PoseConfig;
pub use data::{AnimElement, Animation, Armature, Bone, IkConstraint, IkFamily, Keyframe, Style};
pub use engine::Animator;
pub use error::{HookError, Result, SkelformError};
pub use hierarchy::{compose_hierarchy, composition_order};
pub use ik::{solve_ik, IkRotations, IkSolver};
pub use sampling::{sample_channel, BlendWindow, ChannelIndex};
pub use time::frame;
pub use vec2::Vec2;
