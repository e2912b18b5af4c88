//! Armature data model (bones, animations, IK families) and load-time validation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SkelformError};
use crate::hierarchy::composition_order;
use crate::time;
use crate::vec2::Vec2;

fn unit_scale() -> Vec2 {
    Vec2::ONE
}

fn no_parent() -> i32 {
    -1
}

/// A node in the transform hierarchy.
///
/// `rot`/`scale`/`pos` hold the current transform (local after sampling,
/// world after composition). The `init_*` fields hold the bind pose and are
/// never touched by the runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bone {
    pub id: i32,
    #[serde(default)]
    pub name: String,
    /// Index of the parent bone, or -1 for a root.
    #[serde(default = "no_parent")]
    pub parent_id: i32,
    #[serde(default)]
    pub rot: f32,
    #[serde(default = "unit_scale")]
    pub scale: Vec2,
    #[serde(default)]
    pub pos: Vec2,
    #[serde(default)]
    pub init_rot: f32,
    #[serde(default = "unit_scale")]
    pub init_scale: Vec2,
    #[serde(default)]
    pub init_pos: Vec2,
    #[serde(default)]
    pub style_ids: Vec<i32>,
    #[serde(default)]
    pub tex_idx: i32,
    #[serde(default)]
    pub zindex: i32,
}

impl Bone {
    /// A root bone at the origin with identity transform and bind pose.
    pub fn new(id: i32) -> Self {
        Self {
            id,
            name: String::new(),
            parent_id: -1,
            rot: 0.0,
            scale: Vec2::ONE,
            pos: Vec2::ZERO,
            init_rot: 0.0,
            init_scale: Vec2::ONE,
            init_pos: Vec2::ZERO,
            style_ids: Vec::new(),
            tex_idx: 0,
            zindex: 0,
        }
    }

    /// Builder-style helper setting both the current and bind position.
    pub fn at(mut self, x: f32, y: f32) -> Self {
        self.pos = Vec2::new(x, y);
        self.init_pos = self.pos;
        self
    }

    /// Builder-style helper setting the parent.
    pub fn child_of(mut self, parent_id: i32) -> Self {
        self.parent_id = parent_id;
        self
    }

    /// Parent index, or `None` for a root.
    #[inline]
    pub fn parent_index(&self) -> Option<usize> {
        usize::try_from(self.parent_id).ok()
    }

    #[inline]
    pub fn is_root(&self) -> bool {
        self.parent_id == -1
    }
}

/// The animatable fields of a bone.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimElement {
    Rotation,
    PositionX,
    PositionY,
    ScaleX,
    ScaleY,
}

impl AnimElement {
    pub const ALL: [AnimElement; 5] = [
        AnimElement::Rotation,
        AnimElement::PositionX,
        AnimElement::PositionY,
        AnimElement::ScaleX,
        AnimElement::ScaleY,
    ];

    /// Neutral value: 0 for rotation/position, 1 for scale.
    #[inline]
    pub fn identity(self) -> f32 {
        match self {
            AnimElement::Rotation | AnimElement::PositionX | AnimElement::PositionY => 0.0,
            AnimElement::ScaleX | AnimElement::ScaleY => 1.0,
        }
    }

    /// Current value of this element on `bone`.
    #[inline]
    pub fn get(self, bone: &Bone) -> f32 {
        match self {
            AnimElement::Rotation => bone.rot,
            AnimElement::PositionX => bone.pos.x,
            AnimElement::PositionY => bone.pos.y,
            AnimElement::ScaleX => bone.scale.x,
            AnimElement::ScaleY => bone.scale.y,
        }
    }

    /// Bind-pose value of this element on `bone`.
    #[inline]
    pub fn get_init(self, bone: &Bone) -> f32 {
        match self {
            AnimElement::Rotation => bone.init_rot,
            AnimElement::PositionX => bone.init_pos.x,
            AnimElement::PositionY => bone.init_pos.y,
            AnimElement::ScaleX => bone.init_scale.x,
            AnimElement::ScaleY => bone.init_scale.y,
        }
    }

    #[inline]
    pub fn set(self, bone: &mut Bone, value: f32) {
        match self {
            AnimElement::Rotation => bone.rot = value,
            AnimElement::PositionX => bone.pos.x = value,
            AnimElement::PositionY => bone.pos.y = value,
            AnimElement::ScaleX => bone.scale.x = value,
            AnimElement::ScaleY => bone.scale.y = value,
        }
    }
}

/// A recorded value of one element of one bone at one frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub frame: i32,
    pub bone_id: i32,
    pub element: AnimElement,
    pub value: f32,
}

impl Keyframe {
    pub fn new(frame: i32, bone_id: i32, element: AnimElement, value: f32) -> Self {
        Self {
            frame,
            bone_id,
            element,
            value,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Animation {
    pub name: String,
    pub fps: i32,
    #[serde(default)]
    pub keyframes: Vec<Keyframe>,
}

impl Animation {
    /// Highest keyframe frame, or 0 for an empty animation.
    pub fn last_frame(&self) -> i32 {
        self.keyframes.iter().map(|kf| kf.frame).max().unwrap_or(0)
    }

    /// Number of frames covered by this animation (`last_frame + 1`).
    pub fn frame_count(&self) -> i32 {
        self.last_frame() + 1
    }

    /// Map elapsed playback time (seconds) to a frame of this animation.
    pub fn frame_at(&self, time: f64, reverse: bool, looping: bool) -> i32 {
        time::frame(time, self.fps, self.last_frame(), reverse, looping)
    }
}

/// Which side of the base-to-target line a chain's joints may bend towards.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum IkConstraint {
    #[default]
    None,
    Clockwise,
    CounterClockwise,
}

/// An IK chain: bones ordered base to tip, solved towards a target bone.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct IkFamily {
    /// Target bone id; -1 disables the chain.
    pub target_id: i32,
    #[serde(default)]
    pub constraint: IkConstraint,
    pub bone_ids: Vec<i32>,
}

impl IkFamily {
    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.target_id != -1
    }
}

/// Texture style reference. Carried through untouched; resolved by the host.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub id: i32,
    #[serde(default)]
    pub name: String,
}

/// Full skeleton definition. Immutable once validated and safe to share
/// across threads.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Armature {
    #[serde(default)]
    pub bones: Vec<Bone>,
    #[serde(default)]
    pub animations: Vec<Animation>,
    #[serde(default)]
    pub ik_families: Vec<IkFamily>,
    #[serde(default)]
    pub styles: Vec<Style>,
}

impl Armature {
    /// Check every cross reference the runtime indexes directly.
    ///
    /// - `bones[i].id == i`
    /// - parents exist and form a forest (no cycles)
    /// - IK chains are non-empty and reference existing bones
    /// - keyframes reference existing bones and fps is positive
    pub fn validate(&self) -> Result<()> {
        composition_order(&self.bones)?;

        let bone_exists = |id: i32| usize::try_from(id).is_ok_and(|i| i < self.bones.len());

        for (family_idx, family) in self.ik_families.iter().enumerate() {
            if family.bone_ids.is_empty() {
                return Err(SkelformError::EmptyIkChain { family: family_idx });
            }
            if let Some(&bone) = family.bone_ids.iter().find(|&&id| !bone_exists(id)) {
                return Err(SkelformError::IkBoneOutOfRange {
                    family: family_idx,
                    bone,
                });
            }
            if family.is_enabled() && !bone_exists(family.target_id) {
                return Err(SkelformError::IkTargetOutOfRange {
                    family: family_idx,
                    target_id: family.target_id,
                });
            }
        }

        for anim in &self.animations {
            if anim.fps <= 0 {
                return Err(SkelformError::InvalidFps {
                    animation: anim.name.clone(),
                    fps: anim.fps,
                });
            }
            if let Some(kf) = anim.keyframes.iter().find(|kf| !bone_exists(kf.bone_id)) {
                return Err(SkelformError::KeyframeBoneOutOfRange {
                    animation: anim.name.clone(),
                    bone: kf.bone_id,
                });
            }
        }
        Ok(())
    }

    /// Index of the animation called `name`.
    pub fn find_animation(&self, name: &str) -> Option<usize> {
        self.animations.iter().position(|a| a.name == name)
    }
}

/// Verify that bone ids equal their index and parents are in range.
pub(crate) fn validate_bones(bones: &[Bone]) -> Result<()> {
    for (index, bone) in bones.iter().enumerate() {
        if usize::try_from(bone.id).ok() != Some(index) {
            return Err(SkelformError::BoneIdMismatch { index, id: bone.id });
        }
        if bone.is_root() {
            continue;
        }
        match bone.parent_index() {
            Some(parent) if parent < bones.len() => {}
            _ => {
                return Err(SkelformError::MissingParent {
                    bone: bone.id,
                    parent_id: bone.parent_id,
                })
            }
        }
    }
    Ok(())
}
