//! Inverse kinematics: a single backward + forward reaching pass (FABRIK
//! style) per chain, with optional one-sided joint constraints.
//!
//! Per chain (bones ordered base to tip):
//! 1. Capture the base position, the base-to-target heading and the segment
//!    lengths before anything moves.
//! 2. Backward pass: pin the tip on the target and walk to the base, keeping
//!    each segment length.
//! 3. Forward pass: pin the base back on its start position and walk to the
//!    tip. Interior joints of constrained chains that bend to the forbidden
//!    side of the base-to-target line are mirrored across it.
//! 4. Every non-tip bone gets a rotation facing its outward neighbour.
//!
//! The pass is not iterated to convergence; unreachable targets leave the
//! chain stretched towards them.

use std::f32::consts::{PI, TAU};

use hashbrown::HashMap;

use crate::data::{Bone, IkConstraint, IkFamily};
use crate::error::{Result, SkelformError};
use crate::scratch::IkScratch;
use crate::vec2::Vec2;

/// Rotation overrides produced by the solver, keyed by bone id.
pub type IkRotations = HashMap<i32, f32>;

/// Solver owning scratch buffers reused across chains and calls.
#[derive(Debug, Default)]
pub struct IkSolver {
    scratch: IkScratch,
}

impl IkSolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-size scratch buffers for chains of up to `chain_len` bones.
    pub fn with_capacity(chain_len: usize) -> Self {
        Self {
            scratch: IkScratch::with_capacity(chain_len),
        }
    }

    /// Solve every enabled chain in order, moving chain bone positions in
    /// `bones` and returning rotation overrides for their non-tip bones.
    pub fn solve(
        &mut self,
        bones: &mut [Bone],
        families: &[IkFamily],
        reverse_constraints: bool,
    ) -> Result<IkRotations> {
        let mut rotations = IkRotations::new();
        for (family_idx, family) in families.iter().enumerate() {
            if !family.is_enabled() {
                continue;
            }
            self.solve_chain(bones, family_idx, family, reverse_constraints, &mut rotations)?;
        }
        Ok(rotations)
    }

    fn solve_chain(
        &mut self,
        bones: &mut [Bone],
        family_idx: usize,
        family: &IkFamily,
        reverse_constraints: bool,
        rotations: &mut IkRotations,
    ) -> Result<()> {
        let scratch = &mut self.scratch;
        scratch.begin_chain();

        if family.bone_ids.is_empty() {
            return Err(SkelformError::EmptyIkChain { family: family_idx });
        }
        let target_idx =
            bone_index(bones, family.target_id).ok_or(SkelformError::IkTargetOutOfRange {
                family: family_idx,
                target_id: family.target_id,
            })?;
        for &id in &family.bone_ids {
            let idx = bone_index(bones, id).ok_or(SkelformError::IkBoneOutOfRange {
                family: family_idx,
                bone: id,
            })?;
            scratch.indices.push(idx);
            scratch.joints.push(bones[idx].pos);
        }
        for pair in scratch.joints.windows(2) {
            scratch.lengths.push((pair[1] - pair[0]).magnitude());
        }

        let target = bones[target_idx].pos;
        let start_pos = scratch.joints[0];
        let base_angle = (target - start_pos).angle();
        let window = constraint_window(family.constraint, reverse_constraints);
        let joints = &mut scratch.joints;
        let lengths = &scratch.lengths;
        let tip = joints.len() - 1;

        // Backward: tip onto the target, then each joint towards its outward neighbour.
        let mut next_pos = target;
        for i in (0..=tip).rev() {
            if i == tip {
                joints[i] = target;
            } else if let Some(dir) = (next_pos - joints[i]).try_normalize() {
                joints[i] = next_pos - dir * lengths[i];
            }
            next_pos = joints[i];
        }

        // Forward: base back onto its start, then each joint away from its inward neighbour.
        let mut prev_pos = start_pos;
        for i in 0..=tip {
            if i == 0 {
                joints[i] = start_pos;
            } else {
                if let Some(dir) = (joints[i] - prev_pos).try_normalize() {
                    joints[i] = prev_pos + dir * lengths[i - 1];
                }
                if let Some(window) = window.filter(|_| i != tip) {
                    joints[i] = constrain_joint(joints[i], prev_pos, base_angle, window);
                }
            }
            prev_pos = joints[i];
        }

        // Each non-tip bone faces the next joint outward.
        for i in (0..tip).rev() {
            rotations.insert(family.bone_ids[i], (joints[i + 1] - joints[i]).angle());
        }

        for (&idx, &pos) in scratch.indices.iter().zip(joints.iter()) {
            bones[idx].pos = pos;
        }

        log::trace!(
            "ik family {family_idx}: {} bones, tip distance to target {:.3}",
            joints.len(),
            (joints[tip] - target).magnitude()
        );
        Ok(())
    }
}

/// Solve `families` against `bones` with a throwaway solver.
pub fn solve_ik(
    bones: &mut [Bone],
    families: &[IkFamily],
    reverse_constraints: bool,
) -> Result<IkRotations> {
    IkSolver::new().solve(bones, families, reverse_constraints)
}

/// Index of the bone with `id`, which must also be its position in `bones`.
fn bone_index(bones: &[Bone], id: i32) -> Option<usize> {
    let idx = usize::try_from(id).ok()?;
    bones.get(idx).filter(|bone| bone.id == id).map(|_| idx)
}

/// Permitted joint angle range relative to the base-to-target heading.
fn constraint_window(constraint: IkConstraint, reverse: bool) -> Option<(f32, f32)> {
    let clockwise = match constraint {
        IkConstraint::None => return None,
        IkConstraint::Clockwise => true,
        IkConstraint::CounterClockwise => false,
    };
    if clockwise != reverse {
        Some((-PI, 0.0))
    } else {
        Some((0.0, PI))
    }
}

/// Wrap an angle into (-PI, PI].
fn wrap_angle(angle: f32) -> f32 {
    let a = angle % TAU;
    if a > PI {
        a - TAU
    } else if a <= -PI {
        a + TAU
    } else {
        a
    }
}

/// Mirror `joint` across the base-to-target heading (through `anchor`) when
/// it bends outside `window`.
fn constrain_joint(joint: Vec2, anchor: Vec2, base_angle: f32, window: (f32, f32)) -> Vec2 {
    let offset = joint - anchor;
    if offset == Vec2::ZERO {
        return joint;
    }
    let joint_angle = wrap_angle(offset.angle() - base_angle);
    let (min, max) = window;
    if joint_angle < min || joint_angle > max {
        anchor + offset.rotate(-2.0 * joint_angle)
    } else {
        joint
    }
}
