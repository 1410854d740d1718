#![forbid(unsafe_code)]

//! Piecewise-linear keyframes keyed by progress.
//!
//! A [`Keyframes`] is an ordered list of `(threshold, value)` control points.
//! Sampling is a pure function of progress: values between two thresholds
//! are linearly interpolated and values outside the covered range clamp to
//! the nearest endpoint.
//!
//! # Invariants
//!
//! 1. At least one control point.
//! 2. Thresholds are finite and strictly increasing.
//! 3. `sample(p)` equals `first.value` for `p <= first.threshold` and
//!    `last.value` for `p >= last.threshold`.
//! 4. A NaN progress samples the first control point.

use std::fmt;

/// Linear interpolation between two values of the same type.
pub trait Lerp: Copy {
    /// Interpolate from `self` to `to` at `t` in [0, 1].
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Lerp for f32 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Lerp for f64 {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * f64::from(t)
    }
}

impl Lerp for (f32, f32) {
    #[inline]
    fn lerp(self, to: Self, t: f32) -> Self {
        (self.0.lerp(to.0, t), self.1.lerp(to.1, t))
    }
}

/// One knot of a keyframe mapping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlPoint<T> {
    /// Progress at which `value` is reached exactly.
    pub threshold: f32,
    /// Value at `threshold`.
    pub value: T,
}

/// Rejected keyframe definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum KeyframeError {
    /// No control points were supplied.
    Empty,
    /// A threshold was NaN or infinite.
    NonFiniteThreshold {
        /// Index of the offending control point.
        index: usize,
    },
    /// A threshold was not greater than its predecessor.
    NotIncreasing {
        /// Index of the offending control point.
        index: usize,
        /// Threshold of the preceding point.
        previous: f32,
        /// Offending threshold.
        threshold: f32,
    },
}

impl fmt::Display for KeyframeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "keyframes need at least one control point"),
            Self::NonFiniteThreshold { index } => {
                write!(f, "control point {index} has a non-finite threshold")
            }
            Self::NotIncreasing {
                index,
                previous,
                threshold,
            } => write!(
                f,
                "control point {index} threshold {threshold} does not exceed previous {previous}"
            ),
        }
    }
}

impl std::error::Error for KeyframeError {}

/// Ordered control points with clamped linear interpolation.
#[derive(Debug, Clone, PartialEq)]
pub struct Keyframes<T> {
    points: Vec<ControlPoint<T>>,
}

impl<T: Lerp> Keyframes<T> {
    /// Build keyframes from `(threshold, value)` pairs.
    pub fn new(points: impl IntoIterator<Item = (f32, T)>) -> Result<Self, KeyframeError> {
        let points: Vec<ControlPoint<T>> = points
            .into_iter()
            .map(|(threshold, value)| ControlPoint { threshold, value })
            .collect();

        if points.is_empty() {
            return Err(KeyframeError::Empty);
        }
        for (index, point) in points.iter().enumerate() {
            if !point.threshold.is_finite() {
                return Err(KeyframeError::NonFiniteThreshold { index });
            }
            if index > 0 {
                let previous = points[index - 1].threshold;
                if point.threshold <= previous {
                    return Err(KeyframeError::NotIncreasing {
                        index,
                        previous,
                        threshold: point.threshold,
                    });
                }
            }
        }
        Ok(Self { points })
    }

    /// Two-point mapping from `(from_threshold, from)` to `(to_threshold, to)`.
    pub fn span(
        from_threshold: f32,
        from: T,
        to_threshold: f32,
        to: T,
    ) -> Result<Self, KeyframeError> {
        Self::new([(from_threshold, from), (to_threshold, to)])
    }

    /// Control points in threshold order.
    pub fn points(&self) -> &[ControlPoint<T>] {
        &self.points
    }

    /// First control point.
    pub fn first(&self) -> &ControlPoint<T> {
        &self.points[0]
    }

    /// Last control point.
    pub fn last(&self) -> &ControlPoint<T> {
        &self.points[self.points.len() - 1]
    }

    /// Value at `progress`.
    pub fn sample(&self, progress: f32) -> T {
        let first = self.first();
        let last = self.last();
        if progress.is_nan() || progress <= first.threshold {
            return first.value;
        }
        if progress >= last.threshold {
            return last.value;
        }

        // First index whose threshold exceeds progress; always in 1..len here.
        let upper = self.points.partition_point(|p| p.threshold <= progress);
        let a = &self.points[upper - 1];
        let b = &self.points[upper];
        let t = (progress - a.threshold) / (b.threshold - a.threshold);
        a.value.lerp(b.value, t)
    }
}
