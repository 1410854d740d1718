#![forbid(unsafe_code)]

//! Damped spring follower.
//!
//! A [`Spring`] chases a target value with Hooke's-law acceleration and
//! viscous damping (unit mass). With `damping >= 2 * sqrt(stiffness)` the
//! response is critically damped or overdamped and never overshoots the
//! target, which is what progress indicators want.
//!
//! Integration is semi-implicit Euler over fixed substeps of at most
//! [`MAX_STEP`], so a long frame produces the same curve as several short
//! ones.

use std::time::Duration;

use super::Animation;

/// Largest integration substep.
pub const MAX_STEP: Duration = Duration::from_millis(4);

/// Default stiffness for progress smoothing.
pub const DEFAULT_STIFFNESS: f32 = 200.0;

/// Default damping for progress smoothing.
pub const DEFAULT_DAMPING: f32 = 50.0;

/// Position and velocity magnitude below which the spring is at rest.
pub const REST_THRESHOLD: f32 = 1e-4;

/// A spring-driven scalar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Spring {
    initial: f32,
    position: f32,
    velocity: f32,
    target: f32,
    stiffness: f32,
    damping: f32,
}

impl Spring {
    /// Spring resting at `initial`, pulled toward `target`.
    pub fn new(initial: f32, target: f32) -> Self {
        Self {
            initial,
            position: initial,
            velocity: 0.0,
            target,
            stiffness: DEFAULT_STIFFNESS,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Set stiffness (non-positive or non-finite values are ignored).
    #[must_use]
    pub fn with_stiffness(mut self, stiffness: f32) -> Self {
        if stiffness.is_finite() && stiffness > 0.0 {
            self.stiffness = stiffness;
        }
        self
    }

    /// Set damping (negative or non-finite values are ignored).
    #[must_use]
    pub fn with_damping(mut self, damping: f32) -> Self {
        if damping.is_finite() && damping >= 0.0 {
            self.damping = damping;
        }
        self
    }

    /// Retarget without disturbing position or velocity.
    pub fn set_target(&mut self, target: f32) {
        if target.is_finite() {
            self.target = target;
        }
    }

    /// Current position (unclamped).
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Current velocity in units per second.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Current target.
    pub fn target(&self) -> f32 {
        self.target
    }

    /// Configured stiffness.
    pub fn stiffness(&self) -> f32 {
        self.stiffness
    }

    /// Configured damping.
    pub fn damping(&self) -> f32 {
        self.damping
    }

    /// Whether the configuration cannot overshoot.
    pub fn is_overdamped(&self) -> bool {
        self.damping >= 2.0 * self.stiffness.sqrt()
    }

    fn step(&mut self, h: f32) {
        let displacement = self.position - self.target;
        let acceleration = -self.stiffness * displacement - self.damping * self.velocity;
        self.velocity += acceleration * h;
        self.position += self.velocity * h;
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        if self.is_complete() {
            self.position = self.target;
            self.velocity = 0.0;
            return;
        }
        let mut remaining = dt;
        while !remaining.is_zero() {
            let h = remaining.min(MAX_STEP);
            self.step(h.as_secs_f32());
            remaining = remaining.saturating_sub(h);
        }
    }

    fn is_complete(&self) -> bool {
        (self.position - self.target).abs() < REST_THRESHOLD && self.velocity.abs() < REST_THRESHOLD
    }

    fn value(&self) -> f32 {
        self.position.clamp(0.0, 1.0)
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
    }
}
