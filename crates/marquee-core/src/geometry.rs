#![forbid(unsafe_code)]

//! Scroll geometry: section bounds, progress windows, and clip insets.
//!
//! Coordinates are document pixels with the origin at the top of the page
//! and `y` growing downward, matching how the host reports layout.

/// A section's vertical extent in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SectionBounds {
    /// Top edge in pixels from the document top.
    pub top: f32,
    /// Height in pixels.
    pub height: f32,
}

impl SectionBounds {
    /// Create section bounds.
    #[inline]
    pub const fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Unclamped progress of this section through the viewport.
    ///
    /// `0.0` at the instant the section's top edge reaches the bottom of the
    /// viewport, `1.0` when its bottom edge leaves the top of the viewport.
    /// Values outside [0, 1] mean the section is below or above the window.
    pub fn progress(&self, scroll_offset: f32, viewport_height: f32) -> f32 {
        let span = self.height + viewport_height;
        if !(span > 0.0) {
            return 0.0;
        }
        (scroll_offset + viewport_height - self.top) / span
    }

    /// [`progress`](Self::progress) clamped to [0, 1].
    pub fn clamped_progress(&self, scroll_offset: f32, viewport_height: f32) -> f32 {
        self.progress(scroll_offset, viewport_height).clamp(0.0, 1.0)
    }

    /// Whether any part of the section overlaps the viewport.
    pub fn is_visible(&self, scroll_offset: f32, viewport_height: f32) -> bool {
        let p = self.progress(scroll_offset, viewport_height);
        p > 0.0 && p < 1.0
    }
}

/// Rectangular clip expressed as percentage insets from each edge.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClipInset {
    /// Inset from the top edge, percent.
    pub top: f32,
    /// Inset from the right edge, percent.
    pub right: f32,
    /// Inset from the bottom edge, percent.
    pub bottom: f32,
    /// Inset from the left edge, percent.
    pub left: f32,
}

impl ClipInset {
    /// No clipping.
    pub const NONE: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Clip that reveals the top `percent` of the element, growing downward.
    pub fn reveal_from_top(percent: f32) -> Self {
        let percent = if percent.is_nan() { 0.0 } else { percent.clamp(0.0, 100.0) };
        Self {
            top: 0.0,
            right: 0.0,
            bottom: 100.0 - percent,
            left: 0.0,
        }
    }

    /// Fraction of the element left visible, in [0, 1].
    pub fn visible_fraction(&self) -> f32 {
        let w = (100.0 - self.left - self.right).max(0.0);
        let h = (100.0 - self.top - self.bottom).max(0.0);
        (w * h) / 10_000.0
    }
}
