use skelform_core::{
    parse_armature_json, Animator, Armature, Bone, PoseConfig, SkelformError, Vec2,
};
use skelform_test_fixtures::armatures;

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn load_animator(name: &str, cfg: PoseConfig) -> Animator {
    let json = armatures::json(name).expect("fixture json");
    let armature = parse_armature_json(&json).expect("fixture armature should decode");
    let mut animator = Animator::new(armature, cfg).expect("fixture armature should validate");
    if let Some(anim) = armatures::default_animation(name).expect("manifest entry") {
        animator.play_by_name(&anim, 0.0).expect("fixture animation");
    }
    animator
}

fn bone<'a>(pose: &'a [Bone], name: &str) -> &'a Bone {
    pose.iter()
        .find(|b| b.name == name)
        .unwrap_or_else(|| panic!("bone '{name}' missing from pose"))
}

#[test]
fn every_fixture_decodes_and_poses() {
    for key in armatures::keys() {
        let mut animator = load_animator(&key, PoseConfig::default());
        let bone_count = animator.armature().bones.len();
        for step in 0..8 {
            let pose = animator
                .pose(step as f64 * 0.13)
                .unwrap_or_else(|e| panic!("fixture {key} failed to pose: {e}"));
            assert_eq!(pose.len(), bone_count);
            for b in &pose {
                assert!(
                    b.pos.x.is_finite() && b.pos.y.is_finite() && b.rot.is_finite(),
                    "fixture {key} produced a non-finite bone {b:?}"
                );
            }
        }
    }
}

#[test]
fn arm_wave_peak_pose() {
    let mut animator = load_animator("arm-wave", PoseConfig::default());
    assert_eq!(animator.frame_at(1.0), Some(30));
    let pose = animator.pose(1.0).unwrap();

    let upper = bone(&pose, "upper_arm");
    approx(upper.rot, std::f32::consts::FRAC_PI_2, 1e-5);
    assert_eq!(upper.pos, Vec2::new(20.0, 0.0));

    let forearm = bone(&pose, "forearm");
    approx(forearm.pos.x, 20.0, 1e-4);
    approx(forearm.pos.y, 30.0, 1e-4);
    approx(forearm.rot, std::f32::consts::FRAC_PI_2 + 0.5, 1e-5);

    let hand = bone(&pose, "hand");
    let expected = Vec2::new(25.0, 0.0).rotate(forearm.rot) + forearm.pos;
    approx(hand.pos.x, expected.x, 1e-4);
    approx(hand.pos.y, expected.y, 1e-4);
}

#[test]
fn arm_wave_time_mapping() {
    let animator = load_animator("arm-wave", PoseConfig::default());
    assert_eq!(animator.frame_at(2.1), Some(3));

    let reversed = load_animator(
        "arm-wave",
        PoseConfig {
            reverse: true,
            ..PoseConfig::default()
        },
    );
    assert_eq!(reversed.frame_at(2.1), Some(59 - 3));
}

#[test]
fn leg_ik_keeps_lengths_and_bends_clockwise() {
    let mut animator = load_animator("leg-ik", PoseConfig::default());
    for step in 0..12 {
        let pose = animator.pose(step as f64 / 12.0).unwrap();
        let hip = bone(&pose, "thigh").pos;
        let knee = bone(&pose, "shin").pos;
        let foot = bone(&pose, "foot").pos;
        let target = bone(&pose, "foot_target").pos;

        assert_eq!(hip, Vec2::ZERO);
        approx((knee - hip).magnitude(), 40.0, 1e-3);
        approx((foot - knee).magnitude(), 40.0, 1e-3);

        // Knee on the clockwise side of the hip-to-target line.
        let to_target = target - hip;
        let to_knee = knee - hip;
        let cross = to_target.x * to_knee.y - to_target.y * to_knee.x;
        assert!(cross <= 1e-3, "step {step}: knee bent counter-clockwise ({cross})");
    }
}

#[test]
fn leg_ik_reaches_a_nearby_target() {
    let mut animator = load_animator("leg-ik", PoseConfig::default());
    let pose = animator.pose(0.0).unwrap();
    let foot = bone(&pose, "foot").pos;
    assert!((foot - Vec2::new(50.0, -50.0)).magnitude() < 5.0, "foot at {foot:?}");
}

#[test]
fn reversed_constraints_flip_the_knee() {
    let mut animator = load_animator(
        "leg-ik",
        PoseConfig {
            reverse_constraints: true,
            ..PoseConfig::default()
        },
    );
    let pose = animator.pose(0.0).unwrap();
    let knee = bone(&pose, "shin").pos;
    let target = bone(&pose, "foot_target").pos;
    let cross = target.x * knee.y - target.y * knee.x;
    assert!(cross >= -1e-3, "knee should bend counter-clockwise ({cross})");
}

#[test]
fn unordered_hierarchy_composes_parents_first() {
    let mut animator = load_animator("unordered-hierarchy", PoseConfig::default());
    let pose = animator.pose(0.0).unwrap();

    let middle = bone(&pose, "middle");
    approx(middle.pos.x, 90.0, 1e-3);
    approx(middle.pos.y, 100.0, 1e-3);
    assert_eq!(middle.scale, Vec2::new(2.0, 2.0));

    let tip = bone(&pose, "tip");
    approx(tip.pos.x, 80.0, 1e-3);
    approx(tip.pos.y, 100.0, 1e-3);
    approx(tip.rot, std::f32::consts::PI, 1e-5);
}

#[test]
fn corrupted_fixture_is_rejected() {
    let json = armatures::json("arm-wave")
        .unwrap()
        .replace("\"id\": 2,", "\"id\": 7,");
    assert!(matches!(
        parse_armature_json(&json),
        Err(SkelformError::BoneIdMismatch { index: 2, id: 7 })
    ));
}

#[test]
fn plain_decode_differs_only_in_bind_values() {
    // Direct serde decode leaves missing bind positions at the origin.
    let plain: Armature = armatures::load("arm-wave").expect("fixture should deserialize");
    let parsed = parse_armature_json(&armatures::json("arm-wave").unwrap()).unwrap();

    assert_eq!(plain.animations, parsed.animations);
    assert_eq!(plain.bones.len(), parsed.bones.len());
    for (p, q) in plain.bones.iter().zip(&parsed.bones) {
        assert_eq!((p.id, &p.name, p.parent_id, p.pos), (q.id, &q.name, q.parent_id, q.pos));
        assert_eq!(p.init_pos, Vec2::ZERO);
        assert_eq!(q.init_pos, q.pos);
    }
    plain.validate().expect("plain decode should validate");
}
