//! Keyframe sampling for SkelForm animations.
//!
//! Model:
//! - An animation is a flat list of keyframes. Each (bone_id, element) pair is
//!   a channel; [`ChannelIndex`] groups keyframes per channel, stable-sorted by
//!   frame so ties keep document order.
//! - A channel is sampled by finding `prev` (last key with `frame <= target`)
//!   and `next` (first key with `frame >= target`) and interpolating linearly.
//!   Frames outside the keyed range hold the nearest key; there is no
//!   extrapolation.
//! - A [`BlendWindow`] ramps from a start value to the sampled value over the
//!   first frames of a transition.

use hashbrown::HashMap;

use crate::data::{AnimElement, Animation, Keyframe};
use crate::interp::functions::interpolate;

/// Channel key: (bone, element).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ChannelKey {
    pub bone_id: i32,
    pub element: AnimElement,
}

/// Keyframes of one animation grouped per channel.
#[derive(Clone, Debug, Default)]
pub struct ChannelIndex {
    channels: HashMap<ChannelKey, Vec<Keyframe>>,
}

impl ChannelIndex {
    pub fn build(animation: &Animation) -> Self {
        let mut channels: HashMap<ChannelKey, Vec<Keyframe>> = HashMap::new();
        for kf in &animation.keyframes {
            channels
                .entry(ChannelKey {
                    bone_id: kf.bone_id,
                    element: kf.element,
                })
                .or_default()
                .push(kf.clone());
        }
        for keys in channels.values_mut() {
            keys.sort_by_key(|kf| kf.frame);
        }
        Self { channels }
    }

    /// Keyframes of a channel ordered by frame (empty if the channel is not animated).
    pub fn channel(&self, bone_id: i32, element: AnimElement) -> &[Keyframe] {
        self.channels
            .get(&ChannelKey { bone_id, element })
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of animated channels.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

/// Find the keys surrounding `frame` in a frame-sorted channel.
/// When only one side exists it is returned for both.
fn find_segment(keys: &[Keyframe], frame: i32) -> Option<(&Keyframe, &Keyframe)> {
    let after_prev = keys.partition_point(|kf| kf.frame <= frame);
    let prev = after_prev.checked_sub(1).map(|i| &keys[i]);
    let next = keys.get(keys.partition_point(|kf| kf.frame < frame));
    match (prev, next) {
        (Some(p), Some(n)) => Some((p, n)),
        (Some(p), None) => Some((p, p)),
        (None, Some(n)) => Some((n, n)),
        (None, None) => None,
    }
}

/// Sample a frame-sorted channel at `frame`, or return `default` if it has no keys.
pub fn sample_channel(keys: &[Keyframe], frame: i32, default: f32) -> f32 {
    let Some((prev, next)) = find_segment(keys, frame) else {
        return default;
    };
    // Degenerate interval (single key, hold, or duplicate frames).
    if prev.frame == next.frame {
        return prev.value;
    }
    interpolate(
        (frame - prev.frame) as f32,
        (next.frame - prev.frame) as f32,
        prev.value,
        next.value,
    )
}

/// Cross-fade window: the first `frames` frames after a transition ramp in
/// from the previous value. `elapsed` is the number of frames since the
/// transition started.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BlendWindow {
    pub frames: u32,
    pub elapsed: f32,
}

impl BlendWindow {
    /// No blending; sampled values are used as-is.
    pub const NONE: Self = Self {
        frames: 0,
        elapsed: 0.0,
    };

    pub fn new(frames: u32, elapsed: f32) -> Self {
        Self { frames, elapsed }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.frames > 0 && self.elapsed < self.frames as f32
    }

    /// Ramp from `start` towards `result`; returns `result` once the window has passed.
    #[inline]
    pub fn apply(&self, start: f32, result: f32) -> f32 {
        if self.frames == 0 {
            return result;
        }
        interpolate(self.elapsed, self.frames as f32, start, result)
    }
}

/// Sample one element: channel value (or `default`), then blended from `start`.
pub fn sample_element(
    keys: &[Keyframe],
    frame: i32,
    default: f32,
    start: f32,
    blend: BlendWindow,
) -> f32 {
    blend.apply(start, sample_channel(keys, frame, default))
}
