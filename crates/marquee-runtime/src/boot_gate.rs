#![forbid(unsafe_code)]

//! Boot gate: hold content back until the intro finishes.
//!
//! # State machine
//!
//! ```text
//!   mount ──► Running ──complete()──► Completed
//!                 ▲                      │
//!                 └───── (no edge) ◄─────┘
//! ```
//!
//! `Running` is entered on construction. The only transition is
//! `Running → Completed`, taken on the first completion signal, whether it
//! comes from the [`BootVisual`], from [`BootGate::complete`], or from the
//! optional safety timeout. Later signals are ignored.
//!
//! While `Running`, sibling content has opacity 0 and [`Exposure::empty`].
//! On completion two independent tweens start at the same instant: the boot
//! visual fades out and the content fades in, both over
//! [`CROSSFADE_DURATION`]. Nothing aligns their midpoints.
//!
//! # Failure Modes
//!
//! A visual that never signals keeps content hidden forever unless a safety
//! timeout is configured. None is configured by default.

use std::time::Duration;

use marquee_core::animation::{Animation, Fade, FinishLatch};
use marquee_core::exposure::Exposure;
use serde::Serialize;
use tracing::{info, trace, warn};

/// Length of the boot-out / content-in cross-fade.
pub const CROSSFADE_DURATION: Duration = Duration::from_millis(600);

/// Default length of [`TimedIntro`].
pub const DEFAULT_INTRO_DURATION: Duration = Duration::from_millis(2800);

/// Boot gate phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootPhase {
    /// Intro playing; content withheld.
    Running,
    /// Intro done; content revealed or revealing.
    Completed,
}

/// Lifecycle events emitted by the gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BootEvent {
    /// `Running → Completed` happened.
    Completed,
    /// Completion was forced by the safety timeout.
    TimedOut,
    /// Content opacity reached 1.
    Revealed,
}

/// The intro animation shown while booting.
pub trait BootVisual {
    /// Advance by `dt`. Return `true` once the intro has finished.
    fn tick(&mut self, dt: Duration) -> bool;

    /// Intro progress in [0, 1], for progress read-outs.
    fn progress(&self) -> f32 {
        0.0
    }
}

/// Intro that finishes after a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct TimedIntro {
    timer: Fade,
}

impl TimedIntro {
    /// Intro lasting `duration`.
    pub fn new(duration: Duration) -> Self {
        Self {
            timer: Fade::new(duration),
        }
    }
}

impl Default for TimedIntro {
    fn default() -> Self {
        Self::new(DEFAULT_INTRO_DURATION)
    }
}

impl BootVisual for TimedIntro {
    fn tick(&mut self, dt: Duration) -> bool {
        self.timer.tick(dt);
        self.timer.is_complete()
    }

    fn progress(&self) -> f32 {
        self.timer.value()
    }
}

/// Intro that only finishes when told to from outside.
#[derive(Debug, Clone, Copy, Default)]
pub struct ManualIntro;

impl BootVisual for ManualIntro {
    fn tick(&mut self, _dt: Duration) -> bool {
        false
    }
}

/// Visibility of the content gated behind the boot sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ContentVisibility {
    /// Opacity in [0, 1].
    pub opacity: f32,
    /// Trees the content participates in.
    pub exposure: Exposure,
}

impl ContentVisibility {
    /// Fully hidden and inert.
    pub const WITHHELD: Self = Self {
        opacity: 0.0,
        exposure: Exposure::empty(),
    };
}

struct Crossfade {
    exit: Fade,
    reveal: FinishLatch<Fade>,
}

/// One-shot gate in front of the main content tree.
pub struct BootGate {
    phase: BootPhase,
    visual: Box<dyn BootVisual>,
    since_mount: Duration,
    safety_timeout: Option<Duration>,
    crossfade: Option<Crossfade>,
    events: Vec<BootEvent>,
}

impl std::fmt::Debug for BootGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BootGate")
            .field("phase", &self.phase)
            .field("since_mount", &self.since_mount)
            .field("safety_timeout", &self.safety_timeout)
            .field("pending_events", &self.events.len())
            .finish()
    }
}

impl BootGate {
    /// Mount the gate with `visual`. The gate is `Running` immediately.
    pub fn new(visual: impl BootVisual + 'static) -> Self {
        Self {
            phase: BootPhase::Running,
            visual: Box::new(visual),
            since_mount: Duration::ZERO,
            safety_timeout: None,
            crossfade: None,
            events: Vec::new(),
        }
    }

    /// Force completion after `timeout` if the visual has not signalled (builder).
    #[must_use]
    pub fn with_safety_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.safety_timeout = timeout;
        self
    }

    /// Current phase.
    pub fn phase(&self) -> BootPhase {
        self.phase
    }

    /// Whether the gate has completed.
    pub fn is_completed(&self) -> bool {
        self.phase == BootPhase::Completed
    }

    /// Completion signal. Returns `true` only for the call that transitions.
    pub fn complete(&mut self) -> bool {
        if self.phase == BootPhase::Completed {
            trace!("boot completion signal ignored; already completed");
            return false;
        }
        self.phase = BootPhase::Completed;
        self.crossfade = Some(Crossfade {
            exit: Fade::new(CROSSFADE_DURATION),
            reveal: FinishLatch::new(Fade::new(CROSSFADE_DURATION)),
        });
        self.events.push(BootEvent::Completed);
        info!(elapsed_ms = self.since_mount.as_millis() as u64, "boot sequence completed");
        true
    }

    /// Advance the intro or the cross-fade by `dt`.
    pub fn tick(&mut self, dt: Duration) {
        self.since_mount = self.since_mount.saturating_add(dt);
        match self.phase {
            BootPhase::Running => {
                if self.visual.tick(dt) {
                    self.complete();
                } else if let Some(timeout) = self.safety_timeout
                    && self.since_mount >= timeout
                {
                    warn!(
                        timeout_ms = timeout.as_millis() as u64,
                        "boot visual stalled; forcing reveal"
                    );
                    self.events.push(BootEvent::TimedOut);
                    self.complete();
                }
            }
            BootPhase::Completed => {
                if let Some(crossfade) = &mut self.crossfade {
                    crossfade.exit.tick(dt);
                    crossfade.reveal.tick(dt);
                    if crossfade.reveal.take_finished() {
                        self.events.push(BootEvent::Revealed);
                    }
                }
            }
        }
    }

    /// Visibility of the gated content.
    pub fn content_visibility(&self) -> ContentVisibility {
        match &self.crossfade {
            None => ContentVisibility::WITHHELD,
            Some(crossfade) => ContentVisibility {
                opacity: crossfade.reveal.value(),
                exposure: Exposure::LIVE,
            },
        }
    }

    /// Opacity of the boot visual.
    pub fn visual_opacity(&self) -> f32 {
        match &self.crossfade {
            None => 1.0,
            Some(crossfade) => 1.0 - crossfade.exit.value(),
        }
    }

    /// Whether the boot visual is still on screen.
    pub fn is_visual_mounted(&self) -> bool {
        match &self.crossfade {
            None => true,
            Some(crossfade) => !crossfade.exit.is_complete(),
        }
    }

    /// Intro progress reported by the visual.
    pub fn intro_progress(&self) -> f32 {
        self.visual.progress()
    }

    /// Time since mount.
    pub fn elapsed(&self) -> Duration {
        self.since_mount
    }

    /// Remove and return pending events.
    pub fn drain_events(&mut self) -> Vec<BootEvent> {
        std::mem::take(&mut self.events)
    }
}
