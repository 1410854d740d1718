#![forbid(unsafe_code)]

//! Deterministic stage simulator for testing.
//!
//! `StageSimulator` runs a [`Stage`] at a fixed frame interval without a
//! host, recording every [`FrameSnapshot`] it produces.
//!
//! # Example
//!
//! ```ignore
//! use marquee_runtime::simulator::StageSimulator;
//!
//! let mut sim = StageSimulator::new(stage);
//! sim.run_until_revealed(600);
//! sim.send(InputEvent::wheel(400.0));
//! sim.run_frames(30);
//! assert!(sim.last_snapshot().unwrap().scroll.unwrap().smoothed_offset > 0.0);
//! ```

use std::time::Duration;

use marquee_core::event::InputEvent;

use crate::boot_gate::BootEvent;
use crate::route::NavigationLog;
use crate::stage::{FrameSnapshot, Stage};
use crate::store::StoreAction;

/// 60 Hz.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// Fixed-step driver for a [`Stage`].
#[derive(Debug)]
pub struct StageSimulator {
    stage: Stage,
    interval: Duration,
    snapshots: Vec<FrameSnapshot>,
}

impl StageSimulator {
    /// Simulator stepping at [`DEFAULT_FRAME_INTERVAL`].
    pub fn new(stage: Stage) -> Self {
        Self::with_interval(stage, DEFAULT_FRAME_INTERVAL)
    }

    /// Simulator stepping at `interval`.
    pub fn with_interval(stage: Stage, interval: Duration) -> Self {
        Self {
            stage,
            interval,
            snapshots: Vec::new(),
        }
    }

    /// Inject a host input event.
    pub fn send(&mut self, event: InputEvent) {
        self.stage.handle(event);
    }

    /// Apply a store action immediately.
    pub fn dispatch(&mut self, action: StoreAction) {
        self.stage.dispatch(action);
    }

    /// Step one frame and return its snapshot.
    pub fn step(&mut self) -> &FrameSnapshot {
        let snapshot = self.stage.frame(self.interval);
        self.snapshots.push(snapshot);
        &self.snapshots[self.snapshots.len() - 1]
    }

    /// Step `count` frames.
    pub fn run_frames(&mut self, count: usize) {
        for _ in 0..count {
            self.step();
        }
    }

    /// Step until content is fully revealed, at most `max_frames` frames.
    /// Returns the number of frames stepped, or `None` if `max_frames` ran out.
    pub fn run_until_revealed(&mut self, max_frames: usize) -> Option<usize> {
        for stepped in 1..=max_frames {
            if self.step().events.contains(&BootEvent::Revealed) {
                return Some(stepped);
            }
        }
        None
    }

    /// Every snapshot recorded so far.
    pub fn snapshots(&self) -> &[FrameSnapshot] {
        &self.snapshots
    }

    /// Most recent snapshot.
    pub fn last_snapshot(&self) -> Option<&FrameSnapshot> {
        self.snapshots.last()
    }

    /// Number of recorded snapshots.
    pub fn frame_count(&self) -> usize {
        self.snapshots.len()
    }

    /// Count of `event` across all recorded snapshots.
    pub fn event_count(&self, event: BootEvent) -> usize {
        self.snapshots
            .iter()
            .flat_map(|s| s.events.iter())
            .filter(|e| **e == event)
            .count()
    }

    /// Navigations applied by the stage.
    pub fn navigation_log(&self) -> &NavigationLog {
        self.stage.navigation_log()
    }

    /// The simulated stage.
    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Mutable access to the simulated stage.
    pub fn stage_mut(&mut self) -> &mut Stage {
        &mut self.stage
    }

    /// Drop recorded snapshots.
    pub fn clear_snapshots(&mut self) {
        self.snapshots.clear();
    }

    /// Consume the simulator, returning the stage.
    pub fn into_stage(self) -> Stage {
        self.stage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boot_gate::{BootPhase, TimedIntro};
    use crate::config::StageConfig;

    fn sim(intro_ms: u64) -> StageSimulator {
        let stage = Stage::new(&StageConfig::default())
            .unwrap()
            .with_boot_visual(TimedIntro::new(Duration::from_millis(intro_ms)), None);
        StageSimulator::with_interval(stage, Duration::from_millis(10))
    }

    #[test]
    fn records_one_snapshot_per_frame() {
        let mut sim = sim(1000);
        sim.run_frames(5);
        assert_eq!(sim.frame_count(), 5);
        let indices: Vec<u64> = sim.snapshots().iter().map(|s| s.index).collect();
        assert_eq!(indices, vec![0, 1, 2, 3, 4]);
        assert_eq!(sim.last_snapshot().unwrap().elapsed_ms, 50);
    }

    #[test]
    fn run_until_revealed_covers_intro_and_crossfade() {
        let mut sim = sim(100);
        let frames = sim.run_until_revealed(1000).unwrap();
        assert_eq!(frames, 70);
        assert_eq!(sim.event_count(BootEvent::Completed), 1);
        assert_eq!(sim.event_count(BootEvent::Revealed), 1);
        let last = sim.last_snapshot().unwrap();
        assert_eq!(last.boot_phase, BootPhase::Completed);
        assert_eq!(last.content.opacity, 1.0);
    }

    #[test]
    fn run_until_revealed_gives_up() {
        let mut sim = sim(10_000);
        assert_eq!(sim.run_until_revealed(20), None);
        assert_eq!(sim.frame_count(), 20);
    }

    #[test]
    fn send_routes_events_to_stage() {
        let mut sim = sim(10);
        sim.run_until_revealed(200).unwrap();
        sim.send(InputEvent::navigate("/archive"));
        assert_eq!(sim.stage().route(), "/archive");
        assert_eq!(sim.navigation_log().requests(), ["/archive".to_string()]);
    }
}
