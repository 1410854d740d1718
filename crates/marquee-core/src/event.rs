#![forbid(unsafe_code)]

//! Host input events.
//!
//! The host translates its native events (DOM wheel/pointer/resize, a native
//! window's equivalents, or a scripted test) into [`InputEvent`]s and pushes
//! them to the stage between frames.

/// An input event delivered by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Wheel or trackpad scroll. Positive `delta_y` scrolls down.
    Wheel {
        /// Vertical delta in pixels, before any profile multiplier.
        delta_y: f32,
    },
    /// Pointer moved to a new position in viewport pixels.
    PointerMove {
        /// Horizontal position.
        x: f32,
        /// Vertical position.
        y: f32,
    },
    /// Layout changed.
    Resize {
        /// Visible viewport height in pixels.
        viewport_height: f32,
        /// Total scrollable document height in pixels.
        document_height: f32,
    },
    /// The user followed a link to `path`.
    Navigate(String),
}

impl InputEvent {
    /// Shorthand for a wheel event.
    pub fn wheel(delta_y: f32) -> Self {
        Self::Wheel { delta_y }
    }

    /// Shorthand for a navigation event.
    pub fn navigate(path: impl Into<String>) -> Self {
        Self::Navigate(path.into())
    }

    /// Whether the event is pointer or wheel input (as opposed to layout or routing).
    pub fn is_pointer_input(&self) -> bool {
        matches!(self, Self::Wheel { .. } | Self::PointerMove { .. })
    }
}
