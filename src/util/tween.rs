//! Ease a value toward a target over a fixed duration.
//!
//! A [`Tweened`] wraps a uniform value (hover intensity, pointer UV, ...)
//! and owns at most one in-flight tween. Starting a new tween interrupts the
//! running one and continues from wherever the value currently is, so rapid
//! pointer moves never make a uniform jump.

use std::time::Duration;

use glam::{Vec2, Vec3};
use web_time::Instant;

use super::easing::EasingFunction;

/// Types that can be linearly interpolated.
pub trait Lerp: Copy {
    /// Interpolate from `self` to `other` by `t` (0 = self, 1 = other).
    #[must_use]
    fn lerp_to(self, other: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Vec2 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

impl Lerp for Vec3 {
    #[inline]
    fn lerp_to(self, other: Self, t: f32) -> Self {
        self.lerp(other, t)
    }
}

#[derive(Debug, Clone, Copy)]
struct Tween<T> {
    from: T,
    to: T,
    start: Instant,
    duration: Duration,
    easing: EasingFunction,
}

/// A value that can be eased toward a target.
#[derive(Debug, Clone, Copy)]
pub struct Tweened<T: Lerp> {
    value: T,
    active: Option<Tween<T>>,
}

impl<T: Lerp> Tweened<T> {
    /// Create a settled value with no tween in flight.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            value,
            active: None,
        }
    }

    /// The value as of the last [`sample`](Self::sample).
    #[must_use]
    pub fn value(&self) -> T {
        self.value
    }

    /// Where the value is heading (the current value when settled).
    #[must_use]
    pub fn target(&self) -> T {
        self.active.map_or(self.value, |tw| tw.to)
    }

    /// Whether a tween is still in flight.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Jump to `value` immediately, cancelling any tween.
    pub fn set(&mut self, value: T) {
        self.value = value;
        self.active = None;
    }

    /// Ease toward `target` over `duration` with the default curve.
    pub fn ease_to(&mut self, target: T, now: Instant, duration: Duration) {
        self.ease_to_with(target, now, duration, EasingFunction::DEFAULT);
    }

    /// Ease toward `target` over `duration` using `easing`.
    ///
    /// The new tween starts from the value at `now`, not from the previous
    /// tween's origin.
    pub fn ease_to_with(
        &mut self,
        target: T,
        now: Instant,
        duration: Duration,
        easing: EasingFunction,
    ) {
        let from = self.sample(now);
        if duration.is_zero() {
            self.set(target);
            return;
        }
        self.active = Some(Tween {
            from,
            to: target,
            start: now,
            duration,
            easing,
        });
    }

    /// Advance to `now` and return the current value.
    pub fn sample(&mut self, now: Instant) -> T {
        if let Some(tw) = self.active {
            let elapsed = now.saturating_duration_since(tw.start);
            let t = elapsed.as_secs_f32() / tw.duration.as_secs_f32();
            if t >= 1.0 {
                self.value = tw.to;
                self.active = None;
            } else {
                self.value = tw.from.lerp_to(tw.to, tw.easing.evaluate(t));
            }
        }
        self.value
    }
}

impl<T: Lerp + Default> Default for Tweened<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DUR: Duration = Duration::from_millis(300);

    #[test]
    fn reaches_target_after_duration() {
        let t0 = Instant::now();
        let mut v = Tweened::new(0.0_f32);
        v.ease_to(1.0, t0, DUR);
        assert!(v.is_animating());
        assert_eq!(v.sample(t0 + DUR), 1.0);
        assert!(!v.is_animating());
        assert_eq!(v.sample(t0 + DUR * 2), 1.0);
    }

    #[test]
    fn midpoint_follows_curve() {
        let t0 = Instant::now();
        let mut v = Tweened::new(0.0_f32);
        v.ease_to_with(10.0, t0, DUR, EasingFunction::Linear);
        let mid = v.sample(t0 + DUR / 2);
        assert!((mid - 5.0).abs() < 1e-3, "mid = {mid}");
    }

    #[test]
    fn does_not_pop_at_start() {
        let t0 = Instant::now();
        let mut v = Tweened::new(0.25_f32);
        v.ease_to(1.0, t0, DUR);
        assert_eq!(v.sample(t0), 0.25);
    }

    #[test]
    fn interruption_continues_from_current_value() {
        let t0 = Instant::now();
        let mut v = Tweened::new(0.0_f32);
        v.ease_to_with(1.0, t0, DUR, EasingFunction::Linear);
        let t1 = t0 + DUR / 2;
        let at_interrupt = v.sample(t1);
        v.ease_to_with(0.0, t1, DUR, EasingFunction::Linear);
        assert!((v.sample(t1) - at_interrupt).abs() < 1e-6);
        assert_eq!(v.target(), 0.0);
        assert_eq!(v.sample(t1 + DUR), 0.0);
    }

    #[test]
    fn zero_duration_is_instant() {
        let t0 = Instant::now();
        let mut v = Tweened::new(Vec2::ZERO);
        v.ease_to(Vec2::ONE, t0, Duration::ZERO);
        assert_eq!(v.value(), Vec2::ONE);
        assert!(!v.is_animating());
    }

    #[test]
    fn vec2_tweens_componentwise() {
        let t0 = Instant::now();
        let mut v = Tweened::new(Vec2::new(0.5, 0.5));
        v.ease_to_with(Vec2::new(1.0, 0.0), t0, DUR, EasingFunction::Linear);
        let mid = v.sample(t0 + DUR / 2);
        assert!((mid.x - 0.75).abs() < 1e-3);
        assert!((mid.y - 0.25).abs() < 1e-3);
    }
}
