//! Interpolation helpers:
//! - lerp_f32 (scalar lerp on a normalized parameter)
//! - interpolate (lerp driven by a position inside a span)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f32(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Value at `current` of a linear ramp from `start` (at 0) to `end` (at `span`).
///
/// Clamped on both sides: `current <= 0` yields `start`, `current >= span`
/// yields `end`. A zero-length span yields `end`.
#[inline]
pub fn interpolate(current: f32, span: f32, start: f32, end: f32) -> f32 {
    if span <= 0.0 || current >= span {
        return end;
    }
    if current <= 0.0 {
        return start;
    }
    lerp_f32(start, end, current / span)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_endpoints() {
        assert_eq!(lerp_f32(2.0, 4.0, 0.0), 2.0);
        assert_eq!(lerp_f32(2.0, 4.0, 1.0), 4.0);
        assert_eq!(lerp_f32(2.0, 4.0, 0.25), 2.5);
    }

    #[test]
    fn interpolate_clamps() {
        assert_eq!(interpolate(5.0, 10.0, 0.0, 1.0), 0.5);
        assert_eq!(interpolate(-3.0, 10.0, 0.0, 1.0), 0.0);
        assert_eq!(interpolate(10.0, 10.0, 0.0, 1.0), 1.0);
        assert_eq!(interpolate(42.0, 10.0, 0.0, 1.0), 1.0);
        assert_eq!(interpolate(3.0, 0.0, 7.0, 9.0), 9.0);
    }
}
