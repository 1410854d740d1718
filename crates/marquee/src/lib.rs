#![forbid(unsafe_code)]

//! Marquee public facade crate.
//!
//! This crate provides the stable surface area for hosts. It re-exports the
//! common types from the internal crates and offers a small prelude.
//!
//! ```ignore
//! use marquee::prelude::*;
//!
//! let mut stage = Stage::new(&StageConfig::default())?;
//! stage.handle(InputEvent::Resize { viewport_height: 900.0, document_height: 6000.0 });
//! let snapshot = stage.frame(Duration::from_millis(16));
//! ```

use std::fmt;

// --- Core re-exports -------------------------------------------------------

pub use marquee_core::animation::{
    Animation, ControlPoint, Fade, FinishLatch, KeyframeError, Keyframes, Lerp, Spring,
};
pub use marquee_core::event::InputEvent;
pub use marquee_core::exposure::Exposure;
pub use marquee_core::geometry::{ClipInset, SectionBounds};

// --- Runtime re-exports ----------------------------------------------------

pub use marquee_runtime::{
    ApplicationState, BindingId, BootEvent, BootGate, BootPhase, BootVisual, ConfigError,
    ContentVisibility, DampingProfile, DriveSignal, FrameSnapshot, GuardDecision, LANDING_PATH,
    ManualIntro, MailboxSender, NavigationLog, Navigator, NullRenderer, PointerTracker,
    ProgressSource, RouteGuard, RouteTable, SceneRenderer, ScrollBinder, ScrollEngine,
    ScrollFrame, Session, SpringConfig, Stage, StageConfig, StageSimulator, Store, StoreAction,
    TimedIntro, TranscriptEntry, User, ViewOutput, VisualValue,
};

// --- Errors ---------------------------------------------------------------

/// Top-level error type for Marquee hosts.
#[derive(Debug)]
pub enum Error {
    /// Configuration could not be loaded or failed validation.
    Config(ConfigError),
    /// A keyframe list was rejected.
    Keyframes(KeyframeError),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Keyframes(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Keyframes(err) => Some(err),
        }
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<KeyframeError> for Error {
    fn from(err: KeyframeError) -> Self {
        Self::Keyframes(err)
    }
}

/// Standard result type for Marquee APIs.
pub type Result<T> = std::result::Result<T, Error>;

// --- Prelude --------------------------------------------------------------

pub mod prelude {
    pub use crate::{
        Animation, BootPhase, DampingProfile, Error, FrameSnapshot, InputEvent, Keyframes,
        ProgressSource, Result, SceneRenderer, SectionBounds, Stage, StageConfig, StoreAction,
        ViewOutput, VisualValue,
    };
    pub use std::time::Duration;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_convert_and_chain() {
        let err: Error = Keyframes::<f32>::new(Vec::<(f32, f32)>::new())
            .map(|_| ())
            .unwrap_err()
            .into();
        assert!(matches!(err, Error::Keyframes(KeyframeError::Empty)));
        assert!(std::error::Error::source(&err).is_some());

        let err: Error = StageConfig::from_json_str("[").unwrap_err().into();
        assert!(matches!(err, Error::Config(ConfigError::Parse(_))));
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn prelude_drives_a_stage() -> Result<()> {
        use crate::prelude::*;

        let mut stage = Stage::new(&StageConfig::default())?;
        stage.binder_mut().bind_scalar(
            "hero.opacity",
            ProgressSource::Global,
            Keyframes::new([(0.0, 1.0), (0.3, 0.0)])?,
        );
        stage.complete_boot();
        let snapshot = stage.frame(Duration::from_millis(16));
        assert_eq!(snapshot.boot_phase, BootPhase::Completed);
        assert_eq!(snapshot.bindings.len(), 1);
        Ok(())
    }

    #[test]
    fn snapshots_and_actions_cross_the_json_boundary() -> Result<()> {
        use crate::prelude::*;

        let mut stage = Stage::new(&StageConfig::default())?;
        let login: StoreAction = serde_json::from_str(r#"{"type":"login","name":"ada"}"#).unwrap();
        stage.dispatch(login);
        stage.complete_boot();
        let snapshot = stage.frame(Duration::from_millis(16));

        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["route"], "/");
        assert_eq!(json["boot_phase"], "completed");
        assert_eq!(json["view"]["state"], "route");
        assert_eq!(json["view"]["path"], "/");
        assert_eq!(json["authenticated"], true);
        assert_eq!(json["events"][0], "completed");
        Ok(())
    }
}
