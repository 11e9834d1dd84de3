// extensions/easing.rs
//
// Easing curves for bench animations. Pure math, no scene access.

/// Shape of an animation's progress curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Constant speed.
    #[default]
    Linear,
    /// Slow start and end. The object sweep's default.
    QuadInOut,
}

impl Easing {
    /// Map normalized time `t` (clamped to [0, 1]) to eased progress in [0, 1].
    #[inline]
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// Interpolate from `a` to `b` along an easing curve.
#[inline]
pub fn ease(a: f32, b: f32, t: f32, easing: Easing) -> f32 {
    lerp(a, b, easing.apply(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curves_hit_endpoints() {
        for easing in [Easing::Linear, Easing::QuadInOut] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{easing:?}");
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{easing:?}");
        }
    }

    #[test]
    fn quad_in_out_is_symmetric() {
        assert!((Easing::QuadInOut.apply(0.5) - 0.5).abs() < 1e-6);
        assert!((Easing::QuadInOut.apply(0.25) - 0.125).abs() < 1e-6);
        assert!((Easing::QuadInOut.apply(0.75) - 0.875).abs() < 1e-6);
    }

    #[test]
    fn input_is_clamped() {
        assert_eq!(Easing::QuadInOut.apply(2.0), 1.0);
        assert_eq!(Easing::QuadInOut.apply(-1.0), 0.0);
        assert_eq!(Easing::Linear.apply(1.5), 1.0);
    }

    #[test]
    fn ease_interpolates() {
        assert!((ease(100.0, 200.0, 0.5, Easing::Linear) - 150.0).abs() < 1e-3);
    }
}
