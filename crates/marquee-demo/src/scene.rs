#![forbid(unsafe_code)]

//! The scripted demo scene: bindings, input script, and a logging renderer.

use marquee::{
    InputEvent, KeyframeError, Keyframes, ProgressSource, SceneRenderer, ScrollBinder,
    SectionBounds, SpringConfig,
};
use tracing::trace;

/// Document height of the demo page.
pub const DOCUMENT_HEIGHT: f32 = 6000.0;
/// Viewport height of the simulated window.
pub const VIEWPORT_HEIGHT: f32 = 900.0;

const HERO: SectionBounds = SectionBounds {
    top: 0.0,
    height: 900.0,
};
const MANIFESTO: SectionBounds = SectionBounds {
    top: 1800.0,
    height: 1200.0,
};

/// Register the demo bindings.
pub fn install(binder: &mut ScrollBinder) -> Result<(), KeyframeError> {
    binder.bind_scalar(
        "hero.opacity",
        ProgressSource::Section(HERO),
        Keyframes::new([(0.5, 1.0), (0.9, 0.0)])?,
    );
    binder.bind_fill_reveal(
        "manifesto.fill",
        ProgressSource::Section(MANIFESTO),
        Keyframes::new([(0.2, 0.0), (0.6, 100.0)])?,
    );
    binder.bind_scalar(
        "manifesto.translate_y",
        ProgressSource::Section(MANIFESTO),
        Keyframes::new([(0.0, 80.0), (0.4, 0.0)])?,
    );
    binder.bind_spring("progress.scale", ProgressSource::Global, SpringConfig::default());
    Ok(())
}

/// Input schedule, keyed by frames since the content tree mounted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Script;

impl Script {
    /// Events to inject before frame `t` (counted from mount).
    pub fn events_at(&self, t: usize) -> Vec<InputEvent> {
        let mut events = Vec::new();
        let phase = t as f32 * 0.05;
        events.push(InputEvent::PointerMove {
            x: 600.0 + 240.0 * phase.cos(),
            y: 450.0 + 160.0 * phase.sin(),
        });
        match t {
            0..120 if t % 4 == 0 => events.push(InputEvent::wheel(150.0)),
            180 => events.push(InputEvent::navigate("/archive")),
            200..260 if t % 4 == 0 => events.push(InputEvent::wheel(-200.0)),
            320 => events.push(InputEvent::navigate("/nexus")),
            _ => {}
        }
        events
    }
}

/// Renderer that reports scene angles through `tracing`.
#[derive(Debug, Clone)]
pub struct TracingRenderer {
    every: u64,
    presented: u64,
}

impl TracingRenderer {
    /// Log once every `every` frames.
    pub fn new(every: u64) -> Self {
        Self {
            every: every.max(1),
            presented: 0,
        }
    }

    /// Frames presented so far.
    pub fn presented(&self) -> u64 {
        self.presented
    }
}

impl SceneRenderer for TracingRenderer {
    fn present(&mut self, angles: &[f32]) {
        if self.presented % self.every == 0 {
            trace!(frame = self.presented, ?angles, "scene angles");
        }
        self.presented += 1;
    }
}
