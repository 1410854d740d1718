#![forbid(unsafe_code)]

//! Ambient drive signal for the rendered scene.
//!
//! [`DriveSignal`] turns a velocity scalar into rotation angles, one per
//! scene object. Every frame each object advances by its own base speed plus
//! `velocity * scale_factor`, so the scene keeps turning slowly even when
//! nobody is touching anything.
//!
//! Angles accumulate without wrapping. Reducing them modulo a full turn is
//! the renderer's business.
//!
//! How velocity is produced is a policy outside the signal itself;
//! [`PointerTracker`] is the default one, deriving impulses from pointer
//! travel and decaying them exponentially.

use std::time::Duration;

use tracing::trace;

/// Default multiplier from velocity to radians per frame.
pub const DEFAULT_SCALE_FACTOR: f32 = 0.002;

/// Consumer of per-frame rotation angles.
pub trait SceneRenderer {
    /// Receive the angle (radians) of every scene object for this frame.
    fn present(&mut self, angles: &[f32]);
}

/// Renderer that drops everything. Used when no scene is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl SceneRenderer for NullRenderer {
    fn present(&mut self, _angles: &[f32]) {}
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Spinner {
    base_speed: f32,
    angle: f32,
}

/// Velocity-driven rotation accumulator.
#[derive(Debug, Clone, PartialEq)]
pub struct DriveSignal {
    velocity: f32,
    scale_factor: f32,
    drive_angle: f32,
    spinners: Vec<Spinner>,
}

impl DriveSignal {
    /// Signal with one object per entry of `base_speeds` (radians per second).
    pub fn new(scale_factor: f32, base_speeds: &[f32]) -> Self {
        Self {
            velocity: 0.0,
            scale_factor,
            drive_angle: 0.0,
            spinners: base_speeds
                .iter()
                .map(|&base_speed| Spinner {
                    base_speed,
                    angle: 0.0,
                })
                .collect(),
        }
    }

    /// Replace the velocity.
    pub fn set_velocity(&mut self, velocity: f32) {
        if velocity.is_finite() {
            self.velocity = velocity;
        }
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }

    /// Rotation contributed by velocity alone.
    pub fn drive_angle(&self) -> f32 {
        self.drive_angle
    }

    /// Advance one frame.
    pub fn frame(&mut self, dt: Duration) {
        let drive = self.velocity * self.scale_factor;
        self.drive_angle += drive;
        let secs = dt.as_secs_f32();
        for spinner in &mut self.spinners {
            spinner.angle += spinner.base_speed * secs + drive;
        }
        trace!(velocity = self.velocity, drive, "drive frame");
    }

    /// Current object angles in radians.
    pub fn angles(&self) -> Vec<f32> {
        self.spinners.iter().map(|s| s.angle).collect()
    }

    /// Hand the current angles to `renderer`.
    pub fn present(&self, renderer: &mut dyn SceneRenderer) {
        renderer.present(&self.angles());
    }
}

/// Pointer-travel velocity with exponential decay.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerTracker {
    last: Option<(f32, f32)>,
    velocity: f32,
    decay_per_second: f32,
}

impl PointerTracker {
    /// Tracker whose velocity retains `decay_per_second` of itself each second.
    pub fn new(decay_per_second: f32) -> Self {
        Self {
            last: None,
            velocity: 0.0,
            decay_per_second: decay_per_second.clamp(0.0, 1.0),
        }
    }

    /// Record a pointer position; travel since the previous one is added to velocity.
    pub fn on_move(&mut self, x: f32, y: f32) {
        if !(x.is_finite() && y.is_finite()) {
            return;
        }
        if let Some((lx, ly)) = self.last {
            self.velocity += ((x - lx).powi(2) + (y - ly).powi(2)).sqrt();
        }
        self.last = Some((x, y));
    }

    /// Decay the velocity over `dt` and return it.
    pub fn decay(&mut self, dt: Duration) -> f32 {
        self.velocity *= self.decay_per_second.powf(dt.as_secs_f32());
        if self.velocity < 1e-4 {
            self.velocity = 0.0;
        }
        self.velocity
    }

    /// Current velocity.
    pub fn velocity(&self) -> f32 {
        self.velocity
    }
}
