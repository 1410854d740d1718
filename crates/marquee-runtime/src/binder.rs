#![forbid(unsafe_code)]

//! Scroll-bound animation bindings.
//!
//! A [`ScrollBinder`] maps the engine's per-frame [`ScrollFrame`] onto
//! visual properties. Each binding reads progress from a [`ProgressSource`]
//! and turns it into a [`VisualValue`]:
//!
//! | Kind | Output |
//! |------|--------|
//! | [`BindingKind::Scalar`] | keyframed scalar (opacity, translate, ...) |
//! | [`BindingKind::FillReveal`] | percentage 0–100 plus a clip growing downward |
//! | [`BindingKind::Spring`] | spring-smoothed follower of raw progress |
//!
//! Scalar and fill bindings are pure functions of the current progress, so
//! scrolling back up reverses them. Spring bindings carry velocity between
//! frames and are the only stateful kind.
//!
//! Bindings only read the frame they are handed. They never mutate the
//! engine.

use std::time::Duration;

use marquee_core::animation::{Animation, Keyframes, Spring};
use marquee_core::geometry::{ClipInset, SectionBounds};
use serde::Serialize;

use crate::scroll::ScrollFrame;

/// Where a binding gets its progress from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProgressSource {
    /// Page-wide smoothed scroll fraction, in [0, 1].
    Global,
    /// Progress of a section through the viewport (unclamped).
    Section(SectionBounds),
}

impl ProgressSource {
    /// Progress for this source at `frame`.
    pub fn progress(&self, frame: &ScrollFrame) -> f32 {
        match self {
            Self::Global => frame.smoothed_fraction,
            Self::Section(bounds) => bounds.progress(frame.smoothed_offset, frame.viewport_height),
        }
    }
}

/// Spring tuning for [`BindingKind::Spring`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringConfig {
    /// Hooke constant.
    pub stiffness: f32,
    /// Viscous damping.
    pub damping: f32,
}

impl Default for SpringConfig {
    fn default() -> Self {
        Self {
            stiffness: 200.0,
            damping: 50.0,
        }
    }
}

/// How a binding maps progress to a value.
#[derive(Debug, Clone)]
pub enum BindingKind {
    /// Keyframed scalar.
    Scalar(Keyframes<f32>),
    /// Keyframed fill percentage with a derived clip.
    FillReveal(Keyframes<f32>),
    /// Spring chasing clamped progress.
    Spring(Spring),
}

/// Output of one binding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum VisualValue {
    /// Keyframed scalar.
    Scalar {
        /// Interpolated value.
        value: f32,
    },
    /// Fill reveal.
    Reveal {
        /// Filled percentage in [0, 100].
        percent: f32,
        /// Clip exposing the filled portion.
        clip: ClipInset,
    },
    /// Spring-smoothed scale.
    Scale {
        /// Current spring position.
        value: f32,
    },
}

impl VisualValue {
    /// The primary scalar carried by this value.
    pub fn scalar(&self) -> f32 {
        match *self {
            Self::Scalar { value } | Self::Scale { value } => value,
            Self::Reveal { percent, .. } => percent,
        }
    }
}

/// Handle returned when a binding is registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BindingId(usize);

#[derive(Debug, Clone)]
struct Bound {
    label: String,
    source: ProgressSource,
    kind: BindingKind,
    progress: f32,
    value: VisualValue,
}

impl Bound {
    fn evaluate(&mut self, frame: &ScrollFrame, dt: Duration) {
        self.progress = self.source.progress(frame);
        self.value = match &mut self.kind {
            BindingKind::Scalar(keyframes) => VisualValue::Scalar {
                value: keyframes.sample(self.progress),
            },
            BindingKind::FillReveal(keyframes) => {
                let sampled = keyframes.sample(self.progress);
                let percent = if sampled.is_nan() { 0.0 } else { sampled.clamp(0.0, 100.0) };
                VisualValue::Reveal {
                    percent,
                    clip: ClipInset::reveal_from_top(percent),
                }
            }
            BindingKind::Spring(spring) => {
                spring.set_target(self.progress.clamp(0.0, 1.0));
                spring.tick(dt);
                VisualValue::Scale {
                    value: spring.position(),
                }
            }
        };
    }
}

fn initial_value(kind: &BindingKind) -> VisualValue {
    match kind {
        BindingKind::Scalar(keyframes) => VisualValue::Scalar {
            value: keyframes.first().value,
        },
        BindingKind::FillReveal(keyframes) => {
            let percent = keyframes.first().value.clamp(0.0, 100.0);
            VisualValue::Reveal {
                percent,
                clip: ClipInset::reveal_from_top(percent),
            }
        }
        BindingKind::Spring(spring) => VisualValue::Scale {
            value: spring.position(),
        },
    }
}

/// Registry of scroll-driven bindings.
#[derive(Debug, Clone, Default)]
pub struct ScrollBinder {
    bindings: Vec<Bound>,
    updates: u64,
}

impl ScrollBinder {
    /// Empty binder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a binding of any kind.
    pub fn bind(&mut self, label: &str, source: ProgressSource, kind: BindingKind) -> BindingId {
        let id = BindingId(self.bindings.len());
        let value = initial_value(&kind);
        self.bindings.push(Bound {
            label: label.to_string(),
            source,
            kind,
            progress: 0.0,
            value,
        });
        id
    }

    /// Register a keyframed scalar.
    pub fn bind_scalar(
        &mut self,
        label: &str,
        source: ProgressSource,
        keyframes: Keyframes<f32>,
    ) -> BindingId {
        self.bind(label, source, BindingKind::Scalar(keyframes))
    }

    /// Register a fill reveal.
    pub fn bind_fill_reveal(
        &mut self,
        label: &str,
        source: ProgressSource,
        keyframes: Keyframes<f32>,
    ) -> BindingId {
        self.bind(label, source, BindingKind::FillReveal(keyframes))
    }

    /// Register a spring follower starting at 0.
    pub fn bind_spring(
        &mut self,
        label: &str,
        source: ProgressSource,
        config: SpringConfig,
    ) -> BindingId {
        let spring = Spring::new(0.0, 0.0)
            .with_stiffness(config.stiffness)
            .with_damping(config.damping);
        self.bind(label, source, BindingKind::Spring(spring))
    }

    /// Recompute every binding from `frame`.
    pub fn update(&mut self, frame: &ScrollFrame, dt: Duration) {
        for bound in &mut self.bindings {
            bound.evaluate(frame, dt);
        }
        self.updates += 1;
    }

    /// Value of binding `id`.
    pub fn value(&self, id: BindingId) -> Option<VisualValue> {
        self.bindings.get(id.0).map(|b| b.value)
    }

    /// Progress last fed to binding `id`.
    pub fn progress(&self, id: BindingId) -> Option<f32> {
        self.bindings.get(id.0).map(|b| b.progress)
    }

    /// Value of the first binding labelled `label`.
    pub fn get(&self, label: &str) -> Option<VisualValue> {
        self.bindings.iter().find(|b| b.label == label).map(|b| b.value)
    }

    /// Every `(label, value)` pair in registration order.
    pub fn values(&self) -> impl Iterator<Item = (&str, VisualValue)> {
        self.bindings.iter().map(|b| (b.label.as_str(), b.value))
    }

    /// Number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Number of completed updates.
    pub fn update_count(&self) -> u64 {
        self.updates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);
    const VIEWPORT: f32 = 800.0;

    fn frame_at(offset: f32) -> ScrollFrame {
        ScrollFrame {
            raw_offset: offset,
            smoothed_offset: offset,
            raw_fraction: offset / 4000.0,
            smoothed_fraction: offset / 4000.0,
            velocity: 0.0,
            viewport_height: VIEWPORT,
        }
    }

    #[test]
    fn global_scalar_interpolates() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_scalar(
            "hero.opacity",
            ProgressSource::Global,
            Keyframes::new([(0.2, 0.0), (0.5, 1.0)]).unwrap(),
        );
        binder.update(&frame_at(1400.0), FRAME); // 0.35
        assert!((binder.value(id).unwrap().scalar() - 0.5).abs() < 1e-4);
        binder.update(&frame_at(400.0), FRAME); // 0.1
        assert_eq!(binder.value(id).unwrap().scalar(), 0.0);
        binder.update(&frame_at(3600.0), FRAME); // 0.9
        assert_eq!(binder.value(id).unwrap().scalar(), 1.0);
    }

    #[test]
    fn section_source_uses_progress_window() {
        let section = SectionBounds::new(1000.0, 400.0);
        let mut binder = ScrollBinder::new();
        let id = binder.bind_scalar(
            "manifesto.opacity",
            ProgressSource::Section(section),
            Keyframes::new([(0.0, 0.0), (1.0, 1.0)]).unwrap(),
        );
        binder.update(&frame_at(800.0), FRAME);
        assert!((binder.progress(id).unwrap() - 0.5).abs() < 1e-6);
        assert!((binder.value(id).unwrap().scalar() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn fill_reveal_derives_clip() {
        let section = SectionBounds::new(1000.0, 400.0);
        let mut binder = ScrollBinder::new();
        let id = binder.bind_fill_reveal(
            "headline.fill",
            ProgressSource::Section(section),
            Keyframes::new([(0.0, 0.0), (1.0, 100.0)]).unwrap(),
        );
        binder.update(&frame_at(500.0), FRAME); // progress 0.25
        match binder.value(id).unwrap() {
            VisualValue::Reveal { percent, clip } => {
                assert!((percent - 25.0).abs() < 1e-3);
                assert!((clip.bottom - 75.0).abs() < 1e-3);
                assert_eq!(clip.top, 0.0);
                assert_eq!(clip.left, 0.0);
                assert_eq!(clip.right, 0.0);
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn fill_reveal_reverses_when_scrolling_back() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_fill_reveal(
            "fill",
            ProgressSource::Global,
            Keyframes::new([(0.0, 0.0), (1.0, 100.0)]).unwrap(),
        );
        binder.update(&frame_at(3000.0), FRAME);
        let forward = binder.value(id).unwrap().scalar();
        binder.update(&frame_at(1000.0), FRAME);
        let back = binder.value(id).unwrap().scalar();
        assert!(back < forward);
        assert!((back - 25.0).abs() < 1e-3);
    }

    #[test]
    fn fill_percentage_is_clamped() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_fill_reveal(
            "fill",
            ProgressSource::Global,
            Keyframes::new([(0.0, -20.0), (1.0, 140.0)]).unwrap(),
        );
        binder.update(&frame_at(0.0), FRAME);
        assert_eq!(binder.value(id).unwrap().scalar(), 0.0);
        binder.update(&frame_at(4000.0), FRAME);
        assert_eq!(binder.value(id).unwrap().scalar(), 100.0);
    }

    #[test]
    fn spring_binding_converges_without_overshoot() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_spring(
            "progress.scale",
            ProgressSource::Global,
            SpringConfig::default(),
        );
        let target = frame_at(2000.0); // 0.5
        let mut peak = 0.0f32;
        for _ in 0..240 {
            binder.update(&target, FRAME);
            peak = peak.max(binder.value(id).unwrap().scalar());
        }
        assert!(peak <= 0.5 + 1e-5);
        assert!((binder.value(id).unwrap().scalar() - 0.5).abs() < 1e-3);
    }

    #[test]
    fn spring_binding_lags_raw_progress() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_spring(
            "progress.scale",
            ProgressSource::Global,
            SpringConfig::default(),
        );
        binder.update(&frame_at(4000.0), FRAME);
        let v = binder.value(id).unwrap().scalar();
        assert!(v > 0.0 && v < 1.0);
    }

    #[test]
    fn lookup_by_label_and_iteration_order() {
        let mut binder = ScrollBinder::new();
        binder.bind_scalar("a", ProgressSource::Global, Keyframes::new([(0.0, 1.0)]).unwrap());
        binder.bind_scalar("b", ProgressSource::Global, Keyframes::new([(0.0, 2.0)]).unwrap());
        assert_eq!(binder.get("b").unwrap().scalar(), 2.0);
        assert!(binder.get("missing").is_none());
        let labels: Vec<&str> = binder.values().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[test]
    fn values_before_first_update_use_first_control_point() {
        let mut binder = ScrollBinder::new();
        let id = binder.bind_fill_reveal(
            "fill",
            ProgressSource::Global,
            Keyframes::new([(0.3, 10.0), (1.0, 100.0)]).unwrap(),
        );
        assert_eq!(binder.value(id).unwrap().scalar(), 10.0);
        assert_eq!(binder.update_count(), 0);
    }

    #[test]
    fn visual_value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&VisualValue::Scalar { value: 0.5 }).unwrap();
        assert_eq!(json, r#"{"kind":"scalar","value":0.5}"#);
    }
}
