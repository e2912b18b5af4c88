//! Time math: elapsed playback seconds to animation frame.

/// Floating modulo with the sign of the divisor (result in `[0, b)` for `b > 0`).
fn fmod(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return 0.0;
    }
    let m = a % b;
    if (m < 0.0 && b > 0.0) || (m > 0.0 && b < 0.0) {
        m + b
    } else {
        m
    }
}

/// Map elapsed time to a frame index.
///
/// `raw = time * fps`, wrapped into `[0, last_frame]` when looping, mirrored
/// to `last_frame - raw` when reversed, then truncated. Without looping the
/// result is not clamped; the interpolator holds the first/last key for
/// frames outside the animation.
pub fn frame(time: f64, fps: i32, last_frame: i32, reverse: bool, looping: bool) -> i32 {
    let mut raw = time * f64::from(fps);
    if looping {
        raw = fmod(raw, f64::from(last_frame) + 1.0);
    }
    if reverse {
        raw = f64::from(last_frame) - raw;
    }
    raw as i32
}
