//! Local pose sampling: every animated element of every bone at one frame.

use crate::data::{AnimElement, Animation, Armature, Bone};
use crate::sampling::{sample_element, BlendWindow, ChannelIndex};

/// Sample `animation` at `frame` into a fresh local pose of `armature`.
///
/// Values are absolute: an animated element takes the keyframe value, an
/// unanimated one falls back to the bone's bind value. With `blend_frames >
/// 0` the first frames ramp in from the base bones' current values, counting
/// the transition from frame 0. Parent inheritance and IK are not applied.
pub fn animate(
    armature: &Armature,
    animation: &Animation,
    frame: i32,
    blend_frames: u32,
) -> Vec<Bone> {
    let channels = ChannelIndex::build(animation);
    animate_from(
        &armature.bones,
        &channels,
        frame,
        BlendWindow::new(blend_frames, frame as f32),
    )
}

/// Sample pre-indexed channels at `frame`, blending from `source`.
///
/// `source` supplies the bone structure, the bind values used for
/// unanimated elements, and the start values of the blend window.
pub fn animate_from(
    source: &[Bone],
    channels: &ChannelIndex,
    frame: i32,
    blend: BlendWindow,
) -> Vec<Bone> {
    source
        .iter()
        .map(|bone| {
            let mut posed = bone.clone();
            for element in AnimElement::ALL {
                let value = sample_element(
                    channels.channel(bone.id, element),
                    frame,
                    element.get_init(bone),
                    element.get(bone),
                    blend,
                );
                element.set(&mut posed, value);
            }
            posed
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Keyframe;
    use crate::vec2::Vec2;

    fn armature() -> Armature {
        let mut arm = Armature::default();
        arm.bones.push(Bone::new(0).at(4.0, 2.0));
        arm.bones.push(Bone::new(1).at(10.0, 0.0).child_of(0));
        arm.animations.push(Animation {
            name: "wave".into(),
            fps: 30,
            keyframes: vec![
                Keyframe::new(10, 1, AnimElement::Rotation, 0.0),
                Keyframe::new(20, 1, AnimElement::Rotation, 1.0),
                Keyframe::new(0, 1, AnimElement::ScaleX, 2.0),
            ],
        });
        arm
    }

    #[test]
    fn samples_absolute_values_and_bind_defaults() {
        let arm = armature();
        let pose = animate(&arm, &arm.animations[0], 15, 0);
        assert_eq!(pose[1].rot, 0.5);
        assert_eq!(pose[1].scale, Vec2::new(2.0, 1.0));
        assert_eq!(pose[1].pos, Vec2::new(10.0, 0.0));
        assert_eq!(pose[0], arm.bones[0]);

        assert_eq!(animate(&arm, &arm.animations[0], 5, 0)[1].rot, 0.0);
        assert_eq!(animate(&arm, &arm.animations[0], 25, 0)[1].rot, 1.0);
    }

    #[test]
    fn pose_is_an_independent_copy() {
        let arm = armature();
        let mut pose = animate(&arm, &arm.animations[0], 12, 0);
        pose[0].pos = Vec2::new(99.0, 99.0);
        assert_eq!(arm.bones[0].pos, Vec2::new(4.0, 2.0));
        assert_eq!(
            animate(&arm, &arm.animations[0], 12, 0),
            animate(&arm, &arm.animations[0], 12, 0)
        );
    }

    #[test]
    fn blend_window_ramps_from_base_pose() {
        let arm = armature();
        // Frame 2 of a 4-frame blend: halfway from base scale 1.0 to 2.0.
        let pose = animate(&arm, &arm.animations[0], 2, 4);
        assert_eq!(pose[1].scale.x, 1.5);
        let pose = animate(&arm, &arm.animations[0], 4, 4);
        assert_eq!(pose[1].scale.x, 2.0);
    }

    #[test]
    fn unanimated_element_blends_back_to_bind_value() {
        let mut arm = armature();
        // Displaced from its bind x of 0 with no PositionX keys on bone 1.
        arm.bones[1].pos.x = 4.0;
        arm.bones[1].init_pos.x = 0.0;
        let pose = animate(&arm, &arm.animations[0], 2, 4);
        assert_eq!(pose[1].pos.x, 2.0);
        assert_eq!(animate(&arm, &arm.animations[0], 4, 4)[1].pos.x, 0.0);
        assert_eq!(animate(&arm, &arm.animations[0], 2, 0)[1].pos.x, 0.0);
    }

    #[test]
    fn blending_from_a_previous_pose() {
        let arm = armature();
        let mut previous = arm.bones.clone();
        previous[1].rot = 2.0;
        let channels = ChannelIndex::build(&arm.animations[0]);
        let pose = animate_from(&previous, &channels, 20, BlendWindow::new(10, 5.0));
        assert_eq!(pose[1].rot, 1.5);
    }
}
