//! Error types for the SkelForm runtime core.

use std::error::Error as StdError;

/// Boxed error returned by a caller-supplied pose hook.
pub type HookError = Box<dyn StdError + Send + Sync + 'static>;

/// Everything that can go wrong while loading an armature or producing a pose.
///
/// Numeric degeneracies (zero-length IK segments, zero-duration keyframe
/// intervals) are resolved inside the algorithms and never show up here.
#[derive(thiserror::Error, Debug)]
#[non_exhaustive]
pub enum SkelformError {
    /// `bones[index].id` does not match its position in the bone list.
    #[error("Bone at index {index} has id {id}; bone ids must equal their index")]
    BoneIdMismatch { index: usize, id: i32 },

    #[error("Bone {bone} references missing parent {parent_id}")]
    MissingParent { bone: i32, parent_id: i32 },

    #[error("Bone {bone} is part of a parent cycle")]
    ParentCycle { bone: i32 },

    #[error("IK family {family} has no bones")]
    EmptyIkChain { family: usize },

    #[error("IK family {family} references missing bone {bone}")]
    IkBoneOutOfRange { family: usize, bone: i32 },

    #[error("IK family {family} targets missing bone {target_id}")]
    IkTargetOutOfRange { family: usize, target_id: i32 },

    #[error("Animation '{animation}' has a keyframe for missing bone {bone}")]
    KeyframeBoneOutOfRange { animation: String, bone: i32 },

    #[error("Animation '{animation}' has invalid fps {fps}")]
    InvalidFps { animation: String, fps: i32 },

    #[error("Animation not found: {id}")]
    AnimationNotFound { id: String },

    /// The armature document could not be decoded.
    #[error("Armature parse error: {reason}")]
    Parse { reason: String },

    /// A caller-supplied pose hook failed; the pose was discarded.
    #[error("Pose hook failed: {source}")]
    Hook {
        #[source]
        source: HookError,
    },
}

impl SkelformError {
    /// Wrap a hook failure.
    pub fn hook(source: impl Into<HookError>) -> Self {
        Self::Hook {
            source: source.into(),
        }
    }

    /// Get error category for logging
    #[inline]
    pub fn category(&self) -> &'static str {
        match self {
            Self::BoneIdMismatch { .. }
            | Self::MissingParent { .. }
            | Self::ParentCycle { .. }
            | Self::EmptyIkChain { .. }
            | Self::IkBoneOutOfRange { .. }
            | Self::IkTargetOutOfRange { .. } => "armature",
            Self::KeyframeBoneOutOfRange { .. }
            | Self::InvalidFps { .. }
            | Self::AnimationNotFound { .. } => "animation",
            Self::Parse { .. } => "parse",
            Self::Hook { .. } => "hook",
        }
    }
}

impl From<serde_json::Error> for SkelformError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse {
            reason: err.to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, SkelformError>;
