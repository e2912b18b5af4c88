//! Animator: owns a validated armature and runs the full pose pipeline.
//!
//! Per call to [`Animator::pose`]:
//! time → frame → sample local pose (cross-fading from the previous pose)
//! → optional hook → provisional world pose → IK → final world pose with IK
//! rotation overrides.

use crate::animate::animate_from;
use crate::config::PoseConfig;
use crate::data::{Animation, Armature, Bone};
use crate::error::{HookError, Result, SkelformError};
use crate::hierarchy::compose_hierarchy;
use crate::ik::IkSolver;
use crate::sampling::{BlendWindow, ChannelIndex};

/// Where the active animation started and which pose it blends in from.
#[derive(Debug, Clone)]
struct Transition {
    start_time: f64,
    source: Vec<Bone>,
}

#[derive(Debug)]
pub struct Animator {
    armature: Armature,
    config: PoseConfig,
    channels: Vec<ChannelIndex>,
    solver: IkSolver,
    active: Option<usize>,
    transition: Transition,
    /// Local pose produced by the last successful call.
    last_local: Option<Vec<Bone>>,
}

impl Animator {
    /// Validate `armature` and index its animations.
    pub fn new(armature: Armature, config: PoseConfig) -> Result<Self> {
        armature.validate()?;
        let channels = armature
            .animations
            .iter()
            .map(ChannelIndex::build)
            .collect();
        let longest_chain = armature
            .ik_families
            .iter()
            .map(|family| family.bone_ids.len())
            .max()
            .unwrap_or(0);
        log::debug!(
            "armature accepted: {} bones, {} animations, {} ik families",
            armature.bones.len(),
            armature.animations.len(),
            armature.ik_families.len()
        );
        Ok(Self {
            transition: Transition {
                start_time: 0.0,
                source: armature.bones.clone(),
            },
            armature,
            config,
            channels,
            solver: IkSolver::with_capacity(longest_chain),
            active: None,
            last_local: None,
        })
    }

    pub fn armature(&self) -> &Armature {
        &self.armature
    }

    pub fn config(&self) -> &PoseConfig {
        &self.config
    }

    pub fn set_config(&mut self, config: PoseConfig) {
        self.config = config;
    }

    /// The animation currently playing, if any.
    pub fn active_animation(&self) -> Option<&Animation> {
        self.active.map(|idx| &self.armature.animations[idx])
    }

    /// Start playing animation `index` at playback time `time`.
    ///
    /// The last produced local pose (or the bind pose) becomes the blend
    /// source for the next `config.blend_frames` frames.
    pub fn play(&mut self, index: usize, time: f64) -> Result<()> {
        let anim = self
            .armature
            .animations
            .get(index)
            .ok_or_else(|| SkelformError::AnimationNotFound {
                id: index.to_string(),
            })?;
        log::debug!("play animation '{}' at {time:.3}s", anim.name);
        let source = self
            .last_local
            .clone()
            .unwrap_or_else(|| self.armature.bones.clone());
        self.active = Some(index);
        self.transition = Transition {
            start_time: time,
            source,
        };
        Ok(())
    }

    /// Start playing the animation called `name`.
    pub fn play_by_name(&mut self, name: &str, time: f64) -> Result<()> {
        let index = self
            .armature
            .find_animation(name)
            .ok_or_else(|| SkelformError::AnimationNotFound { id: name.into() })?;
        self.play(index, time)
    }

    /// Stop animating; subsequent poses show the bind pose.
    pub fn stop(&mut self) {
        self.active = None;
    }

    /// Frame of the active animation at `time`, counted from the `play` call,
    /// or `None` when nothing plays.
    pub fn frame_at(&self, time: f64) -> Option<i32> {
        let local_time = self.local_time(time);
        self.active_animation()
            .map(|anim| anim.frame_at(local_time, self.config.reverse, self.config.looping))
    }

    /// Produce the world-space pose at playback time `time`.
    pub fn pose(&mut self, time: f64) -> Result<Vec<Bone>> {
        self.pose_with_hook(time, |_| Ok::<(), HookError>(()))
    }

    /// Like [`Animator::pose`], running `hook` on the local pose after
    /// sampling and before IK and composition.
    ///
    /// A hook error aborts the call: it is returned as
    /// [`SkelformError::Hook`] and no pose is produced or remembered.
    pub fn pose_with_hook<F, E>(&mut self, time: f64, hook: F) -> Result<Vec<Bone>>
    where
        F: FnOnce(&mut [Bone]) -> std::result::Result<(), E>,
        E: Into<HookError>,
    {
        let mut local = self.sample_local(time);

        if let Err(err) = hook(&mut local) {
            let err = SkelformError::hook(err);
            log::warn!("{err}");
            return Err(err);
        }

        let rotations = if self.armature.ik_families.iter().any(|f| f.is_enabled()) {
            let mut world = compose_hierarchy(&local, None)?;
            Some(self.solver.solve(
                &mut world,
                &self.armature.ik_families,
                self.config.reverse_constraints,
            )?)
        } else {
            None
        };
        let posed = compose_hierarchy(&local, rotations.as_ref())?;

        self.last_local = Some(local);
        Ok(posed)
    }

    /// Seconds since the active animation was started.
    #[inline]
    fn local_time(&self, time: f64) -> f64 {
        time - self.transition.start_time
    }

    fn sample_local(&self, time: f64) -> Vec<Bone> {
        let Some(idx) = self.active else {
            return self.armature.bones.clone();
        };
        let anim = &self.armature.animations[idx];
        let local_time = self.local_time(time);
        let frame = anim.frame_at(local_time, self.config.reverse, self.config.looping);
        let elapsed = (local_time * f64::from(anim.fps)) as f32;
        animate_from(
            &self.transition.source,
            &self.channels[idx],
            frame,
            BlendWindow::new(self.config.blend_frames, elapsed),
        )
    }
}
