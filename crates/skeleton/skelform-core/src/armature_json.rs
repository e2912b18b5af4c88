use serde::Deserialize;

use crate::data::{Animation, Armature, Bone, IkFamily, Style};
use crate::error::Result;
use crate::vec2::Vec2;

/// Public API: decode an already-extracted `armature.json` document into a
/// validated [`Armature`].
///
/// Notes:
/// - The document may be the armature object itself or wrap it in an
///   `"armature"` key.
/// - Unknown fields (editor metadata, texture atlases) are ignored.
/// - Missing `scale` defaults to (1, 1); missing `init_*` fields default to
///   the bone's current transform, so unanimated elements keep their pose.
/// - The result has passed [`Armature::validate`]; runtime code may index
///   bones by id.
pub fn parse_armature_json(s: &str) -> Result<Armature> {
    let stored = match serde_json::from_str(s)? {
        StoredDocument::Wrapped { armature } => armature,
        StoredDocument::Bare(armature) => armature,
    };

    let armature = Armature {
        bones: stored.bones.into_iter().map(to_core_bone).collect(),
        animations: stored.animations,
        ik_families: stored.ik_families,
        styles: stored.styles,
    };
    armature.validate()?;
    log::debug!(
        "decoded armature: {} bones, {} animations",
        armature.bones.len(),
        armature.animations.len()
    );
    Ok(armature)
}

fn to_core_bone(b: StoredBone) -> Bone {
    let scale = b.scale.unwrap_or(Vec2::ONE);
    Bone {
        id: b.id,
        name: b.name,
        parent_id: b.parent_id,
        rot: b.rot,
        scale,
        pos: b.pos,
        init_rot: b.init_rot.unwrap_or(b.rot),
        init_scale: b.init_scale.unwrap_or(scale),
        init_pos: b.init_pos.unwrap_or(b.pos),
        style_ids: b.style_ids,
        tex_idx: b.tex_idx,
        zindex: b.zindex,
    }
}

fn no_parent() -> i32 {
    -1
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredDocument {
    Wrapped { armature: StoredArmature },
    Bare(StoredArmature),
}

#[derive(Deserialize)]
struct StoredArmature {
    #[serde(default)]
    bones: Vec<StoredBone>,
    #[serde(default)]
    animations: Vec<Animation>,
    #[serde(default)]
    ik_families: Vec<IkFamily>,
    #[serde(default)]
    styles: Vec<Style>,
}

#[derive(Deserialize)]
struct StoredBone {
    id: i32,
    #[serde(default)]
    name: String,
    #[serde(default = "no_parent")]
    parent_id: i32,
    #[serde(default)]
    rot: f32,
    #[serde(default)]
    scale: Option<Vec2>,
    #[serde(default)]
    pos: Vec2,
    #[serde(default)]
    init_rot: Option<f32>,
    #[serde(default)]
    init_scale: Option<Vec2>,
    #[serde(default)]
    init_pos: Option<Vec2>,
    #[serde(default)]
    style_ids: Vec<i32>,
    #[serde(default)]
    tex_idx: i32,
    #[serde(default)]
    zindex: i32,
}
