#![forbid(unsafe_code)]

//! Virtualized smooth scrolling.
//!
//! The [`ScrollEngine`] keeps its own scroll offset, decoupled from whatever
//! the host's native scroll position is. Wheel input moves a *raw* target
//! offset; each frame the *smoothed* offset closes a fixed fraction of the
//! remaining distance:
//!
//! ```text
//! smoothed += (raw - smoothed) * lerp
//! ```
//!
//! The fraction comes from the active [`DampingProfile`], which the stage
//! swaps on route changes. Swapping never touches the smoothed offset, so a
//! route change alters responsiveness without a jump.
//!
//! # Invariants
//!
//! 1. `0 <= raw <= limit` at all times.
//! 2. `smoothed` only changes inside [`ScrollEngine::frame`] (or when a resize
//!    shrinks the limit below it).
//! 3. `smoothed == raw` only at rest, after the remaining distance drops
//!    below [`REST_EPSILON`].
//! 4. Every frame publishes exactly one [`ScrollFrame`] to observers.

use std::time::Duration;

use marquee_core::animation::{Animation, Fade, ease_out_expo};
use serde::Serialize;
use tracing::{debug, trace};

use crate::subscription::{Observers, SubId};

/// Remaining distance in pixels below which the smoothed offset snaps.
pub const REST_EPSILON: f32 = 0.05;

/// Static smoothing parameters for a family of routes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DampingProfile {
    /// Fraction of the remaining distance closed per frame, in (0, 1].
    pub lerp: f32,
    /// Length of programmatic [`ScrollEngine::scroll_to`] tweens.
    pub duration: Duration,
    /// Scale applied to wheel deltas before they move the raw offset.
    pub wheel_multiplier: f32,
}

impl DampingProfile {
    /// Slow, viscous scrolling used across most routes.
    pub const HEAVY: Self = Self {
        lerp: 0.08,
        duration: Duration::from_millis(1500),
        wheel_multiplier: 0.8,
    };

    /// Extra friction for the archive view.
    pub const ULTRA_FRICTION: Self = Self {
        lerp: 0.02,
        duration: Duration::from_millis(2500),
        wheel_multiplier: 0.5,
    };
}

impl Default for DampingProfile {
    fn default() -> Self {
        Self::HEAVY
    }
}

/// Scroll state published once per frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct ScrollFrame {
    /// Target offset in pixels.
    pub raw_offset: f32,
    /// Rendered offset in pixels.
    pub smoothed_offset: f32,
    /// `raw_offset / limit`, or 0 when nothing scrolls.
    pub raw_fraction: f32,
    /// `smoothed_offset / limit`, or 0 when nothing scrolls.
    pub smoothed_fraction: f32,
    /// Smoothed pixels moved during this frame.
    pub velocity: f32,
    /// Viewport height in pixels.
    pub viewport_height: f32,
}

#[derive(Debug, Clone, Copy)]
struct Tween {
    from: f32,
    to: f32,
    fade: Fade,
}

/// Smooth-scroll integrator.
#[derive(Debug)]
pub struct ScrollEngine {
    profile: DampingProfile,
    raw: f32,
    smoothed: f32,
    limit: f32,
    viewport_height: f32,
    velocity: f32,
    tween: Option<Tween>,
    frames: u64,
    observers: Observers<ScrollFrame>,
}

impl ScrollEngine {
    /// Engine at offset 0 with nothing to scroll yet.
    pub fn new(profile: DampingProfile) -> Self {
        Self {
            profile,
            raw: 0.0,
            smoothed: 0.0,
            limit: 0.0,
            viewport_height: 0.0,
            velocity: 0.0,
            tween: None,
            frames: 0,
            observers: Observers::new(),
        }
    }

    /// Active profile.
    pub fn profile(&self) -> DampingProfile {
        self.profile
    }

    /// Swap the damping profile. Offsets are untouched.
    pub fn set_profile(&mut self, profile: DampingProfile) {
        if profile != self.profile {
            debug!(
                from = self.profile.lerp,
                to = profile.lerp,
                smoothed = self.smoothed,
                "damping profile switched"
            );
            self.profile = profile;
        }
    }

    /// Update the scrollable extent.
    pub fn set_extent(&mut self, document_height: f32, viewport_height: f32) {
        self.viewport_height = finite_or_zero(viewport_height).max(0.0);
        self.limit = (finite_or_zero(document_height) - self.viewport_height).max(0.0);
        self.raw = self.raw.clamp(0.0, self.limit);
        self.smoothed = self.smoothed.clamp(0.0, self.limit);
        if let Some(tween) = &mut self.tween {
            tween.from = tween.from.clamp(0.0, self.limit);
            tween.to = tween.to.clamp(0.0, self.limit);
        }
    }

    /// Apply a wheel delta. Cancels any programmatic tween.
    pub fn on_wheel(&mut self, delta_y: f32) {
        if !delta_y.is_finite() {
            return;
        }
        self.tween = None;
        self.raw = (self.raw + delta_y * self.profile.wheel_multiplier).clamp(0.0, self.limit);
    }

    /// Tween to `offset` over the profile's fixed duration.
    pub fn scroll_to(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        let to = offset.clamp(0.0, self.limit);
        self.raw = to;
        self.tween = Some(Tween {
            from: self.smoothed,
            to,
            fade: Fade::new(self.profile.duration).easing(ease_out_expo),
        });
    }

    /// Jump immediately to `offset` with no smoothing.
    pub fn jump_to(&mut self, offset: f32) {
        if !offset.is_finite() {
            return;
        }
        self.tween = None;
        self.raw = offset.clamp(0.0, self.limit);
        self.smoothed = self.raw;
        self.velocity = 0.0;
    }

    /// Advance one animation frame and publish the result.
    pub fn frame(&mut self, dt: Duration) -> ScrollFrame {
        let before = self.smoothed;

        if let Some(tween) = &mut self.tween {
            tween.fade.tick(dt);
            let t = tween.fade.value();
            self.smoothed = tween.from + (tween.to - tween.from) * t;
            if tween.fade.is_complete() {
                self.smoothed = tween.to;
                self.tween = None;
            }
        } else {
            let remaining = self.raw - self.smoothed;
            if remaining.abs() < REST_EPSILON {
                self.smoothed = self.raw;
            } else {
                self.smoothed += remaining * self.profile.lerp;
            }
        }

        self.velocity = self.smoothed - before;
        self.frames += 1;
        let frame = self.reading();
        trace!(
            raw = frame.raw_offset,
            smoothed = frame.smoothed_offset,
            velocity = frame.velocity,
            "scroll frame"
        );
        self.observers.notify(&frame);
        frame
    }

    /// Current state without advancing.
    pub fn reading(&self) -> ScrollFrame {
        ScrollFrame {
            raw_offset: self.raw,
            smoothed_offset: self.smoothed,
            raw_fraction: self.fraction(self.raw),
            smoothed_fraction: self.fraction(self.smoothed),
            velocity: self.velocity,
            viewport_height: self.viewport_height,
        }
    }

    /// Whether the smoothed offset has caught up with the raw one.
    pub fn is_at_rest(&self) -> bool {
        self.tween.is_none() && self.smoothed == self.raw
    }

    /// Maximum offset.
    pub fn limit(&self) -> f32 {
        self.limit
    }

    /// Frames stepped so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }

    /// Observe every published frame.
    pub fn subscribe(&mut self, observer: impl FnMut(&ScrollFrame) + 'static) -> SubId {
        self.observers.subscribe(observer)
    }

    /// Stop observing.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn fraction(&self, offset: f32) -> f32 {
        if self.limit > 0.0 {
            (offset / self.limit).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn finite_or_zero(v: f32) -> f32 {
    if v.is_finite() { v } else { 0.0 }
}
