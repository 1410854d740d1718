#![forbid(unsafe_code)]

//! Animation primitives.
//!
//! Time-based animations that produce normalized `f32` values (0.0–1.0), plus
//! the two progress-driven building blocks used by scroll bindings:
//! [`Keyframes`] (piecewise-linear control points) and [`Spring`]
//! (physically smoothed follower).
//!
//! Animations never read a clock. The owner ticks them with the frame delta,
//! which keeps every transition reproducible in tests.

pub mod keyframes;
pub mod latch;
pub mod spring;

pub use keyframes::{ControlPoint, KeyframeError, Keyframes, Lerp};
pub use latch::FinishLatch;
pub use spring::Spring;

use std::time::Duration;

/// Maps linear progress in [0, 1] to eased progress in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// No easing.
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Quadratic deceleration.
#[inline]
pub fn ease_out(t: f32) -> f32 {
    let remaining = 1.0 - t.clamp(0.0, 1.0);
    1.0 - remaining * remaining
}

/// Exponential deceleration: most of the distance in the first fifth.
#[inline]
pub fn ease_out_expo(t: f32) -> f32 {
    match t {
        t if t >= 1.0 => 1.0,
        t if t <= 0.0 => 0.0,
        t => 1.0 - 2f32.powf(-10.0 * t),
    }
}

/// Something advanced by frame deltas that reports normalized output.
///
/// Implementors never consult a clock of their own.
pub trait Animation {
    /// Move forward by `dt`.
    fn tick(&mut self, dt: Duration);

    /// `true` once the end has been reached.
    fn is_complete(&self) -> bool;

    /// Output in [0, 1].
    fn value(&self) -> f32;

    /// Rewind to the start.
    fn reset(&mut self);

    /// How far past the end the last tick went. Zero for open-ended animations.
    fn overshoot(&self) -> Duration {
        Duration::ZERO
    }
}

/// Fixed-length 0 → 1 tween.
///
/// Progress is kept as an accumulated [`Duration`]; sixty 10 ms ticks land
/// exactly on 600 ms. The boot cross-fade, the timed intro, and programmatic
/// scroll tweens are all built on it.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Linear tween lasting `duration`. A zero length completes on the first tick.
    pub fn new(duration: Duration) -> Self {
        let duration = duration.max(Duration::from_nanos(1));
        Self {
            elapsed: Duration::ZERO,
            duration,
            easing: linear,
        }
    }

    /// Use `easing` for [`Animation::value`] (builder).
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Total length.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Accumulated time.
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Un-eased progress in [0, 1].
    pub fn raw_progress(&self) -> f32 {
        let ratio = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        ratio.min(1.0) as f32
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }

    fn overshoot(&self) -> Duration {
        self.elapsed.saturating_sub(self.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(10);

    #[test]
    fn easings_pin_endpoints_and_clamp() {
        for easing in [linear, ease_out, ease_out_expo] {
            assert_eq!(easing(0.0), 0.0);
            assert_eq!(easing(1.0), 1.0);
            assert_eq!(easing(-3.0), 0.0);
            assert_eq!(easing(7.0), 1.0);
        }
    }

    #[test]
    fn expo_outruns_quadratic_early() {
        assert!(ease_out_expo(0.2) > ease_out(0.2));
        assert!(ease_out_expo(0.2) > 0.7);
    }

    #[test]
    fn fade_progresses_linearly_by_default() {
        let mut fade = Fade::new(Duration::from_millis(600));
        assert_eq!(fade.value(), 0.0);
        for _ in 0..30 {
            fade.tick(FRAME);
        }
        assert!((fade.value() - 0.5).abs() < 1e-4);
        assert!(!fade.is_complete());
        for _ in 0..30 {
            fade.tick(FRAME);
        }
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
        assert_eq!(fade.overshoot(), Duration::ZERO);
    }

    #[test]
    fn fade_reports_overshoot_and_holds_at_one() {
        let mut fade = Fade::new(Duration::from_millis(100));
        fade.tick(Duration::from_millis(250));
        assert_eq!(fade.value(), 1.0);
        assert_eq!(fade.overshoot(), Duration::from_millis(150));
    }

    #[test]
    fn zero_length_fade_completes_on_first_tick() {
        let mut fade = Fade::new(Duration::ZERO);
        assert!(!fade.is_complete());
        fade.tick(FRAME);
        assert!(fade.is_complete());
    }

    #[test]
    fn reset_rewinds() {
        let mut fade = Fade::new(Duration::from_millis(50));
        fade.tick(Duration::from_millis(50));
        fade.reset();
        assert_eq!(fade.elapsed(), Duration::ZERO);
        assert!(!fade.is_complete());
    }

    #[test]
    fn easing_shapes_value_not_raw_progress() {
        let mut fade = Fade::new(Duration::from_millis(400)).easing(ease_out);
        fade.tick(Duration::from_millis(200));
        assert!((fade.raw_progress() - 0.5).abs() < 1e-4);
        assert!((fade.value() - 0.75).abs() < 1e-4);
    }
}
