//! Easing curves for tweened uniforms.
//!
//! All curves map `t` in [0, 1] to [0, 1] with `f(0) = 0` and `f(1) = 1`.

/// Easing function variants for tween curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Quadratic ease-in (slow start, fast end).
    QuadraticIn,
    /// Quadratic ease-out (fast start, slow end).
    QuadraticOut,
    /// Quadratic ease-in-out (slow at both ends).
    QuadraticInOut,
    /// Cubic ease-out (sharper deceleration than quadratic).
    CubicOut,
}

impl EasingFunction {
    /// Default curve for hover tweens: a gentle quadratic ease-out.
    pub const DEFAULT: Self = Self::QuadraticOut;

    /// Evaluate the curve at `t`. Input is clamped to [0, 1].
    #[inline]
    #[must_use]
    pub fn evaluate(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::QuadraticIn => t * t,
            Self::QuadraticOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt
            }
            Self::QuadraticInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u / 2.0
                }
            }
            Self::CubicOut => {
                let omt = 1.0 - t;
                1.0 - omt * omt * omt
            }
        }
    }
}

impl Default for EasingFunction {
    #[inline]
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [EasingFunction; 5] = [
        EasingFunction::Linear,
        EasingFunction::QuadraticIn,
        EasingFunction::QuadraticOut,
        EasingFunction::QuadraticInOut,
        EasingFunction::CubicOut,
    ];

    #[test]
    fn endpoints_are_fixed() {
        for f in ALL {
            assert!(f.evaluate(0.0).abs() < 1e-6, "{f:?} at 0");
            assert!((f.evaluate(1.0) - 1.0).abs() < 1e-6, "{f:?} at 1");
        }
    }

    #[test]
    fn input_is_clamped() {
        for f in ALL {
            assert_eq!(f.evaluate(-0.5), f.evaluate(0.0));
            assert_eq!(f.evaluate(1.5), f.evaluate(1.0));
        }
    }

    #[test]
    fn quadratic_values() {
        assert_eq!(EasingFunction::QuadraticIn.evaluate(0.5), 0.25);
        assert_eq!(EasingFunction::QuadraticOut.evaluate(0.5), 0.75);
        assert_eq!(EasingFunction::QuadraticInOut.evaluate(0.5), 0.5);
    }

    #[test]
    fn ease_out_leads_linear() {
        let t = 0.25;
        assert!(EasingFunction::QuadraticOut.evaluate(t) > t);
        assert!(
            EasingFunction::CubicOut.evaluate(t)
                > EasingFunction::QuadraticOut.evaluate(t)
        );
    }

    #[test]
    fn curves_are_monotonic() {
        for f in ALL {
            let mut prev = 0.0;
            for i in 1..=100 {
                let v = f.evaluate(i as f32 / 100.0);
                assert!(v >= prev, "{f:?} decreased at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn default_is_quadratic_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::QuadraticOut);
    }
}
