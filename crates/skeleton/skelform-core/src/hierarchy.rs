//! Parent-to-child transform inheritance.
//!
//! Bones are composed in a parent-before-child order derived from
//! `parent_id`, so the bone list itself may be in any order. For a child of
//! `P`:
//!
//! ```text
//! rot   = rot + P.rot
//! scale = scale * P.scale
//! pos   = rotate(pos * P.scale, P.rot) + P.pos
//! ```
//!
//! An IK rotation override replaces the composed rotation, and descendants
//! inherit the overridden value.

use crate::data::{validate_bones, Bone};
use crate::error::{Result, SkelformError};
use crate::ik::IkRotations;

#[derive(Copy, Clone, PartialEq)]
enum Mark {
    New,
    Open,
    Done,
}

/// Bone indices ordered so that every parent precedes its children.
///
/// Fails if a bone id does not match its index, a parent is missing, or
/// the parent links contain a cycle.
pub fn composition_order(bones: &[Bone]) -> Result<Vec<usize>> {
    validate_bones(bones)?;

    let mut marks = vec![Mark::New; bones.len()];
    let mut order = Vec::with_capacity(bones.len());
    let mut path = Vec::new();
    for start in 0..bones.len() {
        // Walk up to the first composed ancestor (or a root), then emit top-down.
        let mut cur = Some(start);
        while let Some(idx) = cur {
            match marks[idx] {
                Mark::Done => break,
                Mark::Open => return Err(SkelformError::ParentCycle { bone: bones[idx].id }),
                Mark::New => {
                    marks[idx] = Mark::Open;
                    path.push(idx);
                    cur = bones[idx].parent_index();
                }
            }
        }
        while let Some(idx) = path.pop() {
            marks[idx] = Mark::Done;
            order.push(idx);
        }
    }
    Ok(order)
}

/// Compose local bone transforms into world space.
///
/// Returns a new pose; `bones` is left untouched.
pub fn compose_hierarchy(bones: &[Bone], ik_rotations: Option<&IkRotations>) -> Result<Vec<Bone>> {
    let order = composition_order(bones)?;
    let mut posed = bones.to_vec();
    compose_ordered(&mut posed, &order, ik_rotations);
    Ok(posed)
}

/// Compose in place following a precomputed [`composition_order`].
pub(crate) fn compose_ordered(
    bones: &mut [Bone],
    order: &[usize],
    ik_rotations: Option<&IkRotations>,
) {
    for &idx in order {
        if let Some(parent) = bones[idx].parent_index() {
            let (p_rot, p_scale, p_pos) = {
                let p = &bones[parent];
                (p.rot, p.scale, p.pos)
            };
            let bone = &mut bones[idx];
            bone.rot += p_rot;
            bone.scale = bone.scale * p_scale;
            bone.pos = (bone.pos * p_scale).rotate(p_rot) + p_pos;
        }
        let bone = &mut bones[idx];
        if let Some(&rot) = ik_rotations.and_then(|rots| rots.get(&bone.id)) {
            bone.rot = rot;
        }
    }
}
