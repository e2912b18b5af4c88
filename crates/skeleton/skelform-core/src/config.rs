//! Pose configuration for the SkelForm runtime.

use serde::{Deserialize, Serialize};

/// Playback and solver options used by [`crate::Animator`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoseConfig {
    /// Frames over which a newly played animation ramps in from the previous pose (0 = snap).
    pub blend_frames: u32,
    /// Flip the permitted bend side of every constrained IK chain.
    pub reverse_constraints: bool,
    /// Wrap time around the animation length.
    pub looping: bool,
    /// Play animations backwards.
    pub reverse: bool,
}

impl Default for PoseConfig {
    fn default() -> Self {
        Self {
            blend_frames: 0,
            reverse_constraints: false,
            looping: true,
            reverse: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let cfg: PoseConfig = serde_json::from_str(r#"{ "blend_frames": 6 }"#).unwrap();
        assert_eq!(cfg.blend_frames, 6);
        assert!(cfg.looping);
        assert!(!cfg.reverse);
        assert!(!cfg.reverse_constraints);
    }
}
