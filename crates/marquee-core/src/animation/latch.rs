#![forbid(unsafe_code)]

//! One-shot completion latch for animations.
//!
//! [`FinishLatch`] wraps any [`Animation`] and remembers the tick on which
//! it first completed. Owners poll [`take_finished`](FinishLatch::take_finished)
//! once per frame instead of registering closures.
//!
//! # Invariants
//!
//! 1. `take_finished()` returns `true` at most once per play-through.
//! 2. Ticking a finished animation again never re-arms the latch.
//! 3. `reset()` rewinds the inner animation and re-arms the latch.

use std::time::Duration;

use super::Animation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum LatchState {
    Armed,
    Fired,
    Taken,
}

/// Animation wrapper that reports completion exactly once.
#[derive(Debug, Clone)]
pub struct FinishLatch<A> {
    inner: A,
    state: LatchState,
}

impl<A: Animation> FinishLatch<A> {
    /// Wrap an animation.
    #[must_use]
    pub fn new(inner: A) -> Self {
        Self {
            inner,
            state: LatchState::Armed,
        }
    }

    /// `true` on the first call after the inner animation completed.
    pub fn take_finished(&mut self) -> bool {
        if self.state == LatchState::Fired {
            self.state = LatchState::Taken;
            return true;
        }
        false
    }
}

impl<A: Animation> Animation for FinishLatch<A> {
    fn tick(&mut self, dt: Duration) {
        self.inner.tick(dt);
        if self.state == LatchState::Armed && self.inner.is_complete() {
            self.state = LatchState::Fired;
        }
    }

    fn is_complete(&self) -> bool {
        self.inner.is_complete()
    }

    fn value(&self) -> f32 {
        self.inner.value()
    }

    fn reset(&mut self) {
        self.inner.reset();
        self.state = LatchState::Armed;
    }

    fn overshoot(&self) -> Duration {
        self.inner.overshoot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::Fade;

    const MS_200: Duration = Duration::from_millis(200);
    const MS_600: Duration = Duration::from_millis(600);

    #[test]
    fn nothing_before_completion() {
        let mut fade = FinishLatch::new(Fade::new(MS_600));
        assert!(!fade.take_finished());
        fade.tick(MS_200);
        assert!(!fade.take_finished());
        assert!((fade.value() - 1.0 / 3.0).abs() < 1e-5);
    }

    #[test]
    fn fires_once() {
        let mut fade = FinishLatch::new(Fade::new(MS_600));
        fade.tick(MS_200);
        fade.tick(MS_600);
        assert!(fade.take_finished());
        assert!(!fade.take_finished());

        fade.tick(MS_600);
        assert!(!fade.take_finished());
    }

    #[test]
    fn untaken_completion_survives_further_ticks() {
        let mut fade = FinishLatch::new(Fade::new(MS_200));
        fade.tick(MS_600);
        fade.tick(MS_600);
        assert!(fade.take_finished());
    }

    #[test]
    fn reset_rearms() {
        let mut fade = FinishLatch::new(Fade::new(MS_200));
        fade.tick(MS_600);
        assert!(fade.take_finished());
        fade.reset();
        assert_eq!(fade.value(), 0.0);
        fade.tick(MS_600);
        assert!(fade.take_finished());
    }
}
