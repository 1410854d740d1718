#![forbid(unsafe_code)]

//! Marquee Runtime
//!
//! Frame-driven orchestration for the Marquee presentation layer. Everything
//! here is headless: the host pushes input events and advances frames, and
//! the runtime computes every derived visual property deterministically.
//!
//! # Key Components
//!
//! - [`Stage`] - Owns every component and runs them in a fixed frame order
//! - [`Store`] - Session and application state with synchronous observers
//! - [`Mailbox`] - Single-writer queue for store actions from other threads
//! - [`BootGate`] - Withholds content until the intro completes
//! - [`RouteGuard`] - Suppresses protected views for signed-out viewers
//! - [`ScrollEngine`] - Virtualized smooth scrolling with per-route damping
//! - [`ScrollBinder`] - Maps scroll progress onto visual properties
//! - [`DriveSignal`] - Velocity-driven rotation for an external renderer
//! - [`StageSimulator`] - Fixed-step driver for tests
//!
//! # How it fits together
//! The boot gate decides when the content tree mounts. Once mounted, the
//! scroll engine publishes one frame per tick and the binder derives values
//! from it. The guard watches the store and the current route, and the
//! drive signal turns pointer and scroll motion into scene rotation.
//!
//! Logging goes through `tracing`; the runtime never installs a subscriber.

pub mod app_state;
pub mod binder;
pub mod boot_gate;
pub mod config;
pub mod drive_signal;
pub mod mailbox;
pub mod route;
pub mod route_guard;
pub mod scroll;
pub mod session;
pub mod simulator;
pub mod stage;
pub mod store;
pub mod subscription;

pub use app_state::{ApplicationState, SavedItems, Speaker, TranscriptEntry};
pub use binder::{BindingId, BindingKind, ProgressSource, ScrollBinder, SpringConfig, VisualValue};
pub use boot_gate::{
    BootEvent, BootGate, BootPhase, BootVisual, ContentVisibility, ManualIntro, TimedIntro,
};
pub use config::{ConfigError, StageConfig};
pub use drive_signal::{DriveSignal, NullRenderer, PointerTracker, SceneRenderer};
pub use mailbox::{Mailbox, MailboxSender};
pub use route::{LANDING_PATH, NavigationLog, Navigator, RouteTable};
pub use route_guard::{GuardDecision, RouteGuard};
pub use scroll::{DampingProfile, ScrollEngine, ScrollFrame};
pub use session::{Session, User};
pub use simulator::StageSimulator;
pub use stage::{BindingSnapshot, FrameSnapshot, Stage, ViewOutput};
pub use store::{Namespace, Slice, Store, StoreAction};
pub use subscription::{Observers, SubId};
