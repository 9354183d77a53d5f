/// Smallest span used as a divisor when normalizing into a range.
pub const SPAN_EPSILON: f32 = 0.0001;

pub struct InterpHelper;

impl InterpHelper {
    /// Unclamped linear interpolation between `start` and `end`.
    pub fn lerp(start: f32, end: f32, t: f32) -> f32 {
        start + (end - start) * t
    }

    /// Position of `value` inside `[min, max]` as a fraction, not clamped.
    /// Degenerate spans are widened to [`SPAN_EPSILON`].
    pub fn normalize(value: f32, min: f32, max: f32) -> f32 {
        (value - min) / (max - min).max(SPAN_EPSILON)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lerp_hits_both_endpoints() {
        assert_eq!(InterpHelper::lerp(92.0, 84.0, 0.0), 92.0);
        assert_eq!(InterpHelper::lerp(92.0, 84.0, 1.0), 84.0);
        assert_eq!(InterpHelper::lerp(0.0, 10.0, 0.5), 5.0);
    }

    #[test]
    fn normalize_does_not_divide_by_zero() {
        let t = InterpHelper::normalize(5.0, 5.0, 5.0);
        assert_eq!(t, 0.0);
        assert!(InterpHelper::normalize(6.0, 5.0, 5.0).is_finite());
    }

    #[test]
    fn normalize_leaves_out_of_range_values_unclamped() {
        assert_eq!(InterpHelper::normalize(20.0, 0.0, 10.0), 2.0);
        assert_eq!(InterpHelper::normalize(-10.0, 0.0, 10.0), -1.0);
    }
}
