#![forbid(unsafe_code)]

//! The stage: one frame loop over every orchestration component.
//!
//! A [`Stage`] owns the store, the mailbox, the boot gate, the route table
//! and guard, and (once the boot gate completes) the mounted content tree
//! holding the scroll engine and the binder. The host feeds it
//! [`InputEvent`]s and calls [`Stage::frame`] once per animation frame.
//!
//! # Frame order
//!
//! ```text
//! drain mailbox
//!   → apply queued redirect
//!   → boot gate tick (mount the tree on completion)
//!   → scroll engine step
//!   → binder update
//!   → drive signal
//!   → guard evaluation
//!   → snapshot
//! ```
//!
//! The scroll step always precedes the binder update, so bindings see the
//! offset of the frame being produced.
//!
//! # Guard timing
//!
//! The guard runs during every frame and again synchronously after any
//! session mutation or navigation. A suppressed view is reported as
//! [`ViewOutput::Empty`] in the same call that queues the redirect, so no
//! snapshot ever shows a protected route to a signed-out viewer. The
//! redirect itself is applied at the start of the next frame, and dropped
//! if the route renders by then (the session authenticated, or the viewer
//! left the protected area).

use std::time::Duration;

use marquee_core::event::InputEvent;
use serde::Serialize;
use tracing::{debug, trace};

use crate::app_state::ApplicationState;
use crate::binder::{ScrollBinder, VisualValue};
use crate::boot_gate::{BootEvent, BootGate, BootPhase, BootVisual, ContentVisibility};
use crate::config::{ConfigError, StageConfig};
use crate::drive_signal::{DriveSignal, NullRenderer, PointerTracker, SceneRenderer};
use crate::mailbox::{Mailbox, MailboxSender};
use crate::route::{NavigationLog, Navigator, RouteTable};
use crate::route_guard::{GuardDecision, RouteGuard};
use crate::scroll::{ScrollEngine, ScrollFrame};
use crate::session::Session;
use crate::store::{Namespace, Store, StoreAction};
use crate::subscription::SubId;

/// Route the stage starts on.
pub const INITIAL_ROUTE: &str = "/";

/// What the routed view renders this frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ViewOutput {
    /// Boot still running; the routed tree is not mounted.
    Withheld,
    /// Protected route, signed out; an empty placeholder.
    Empty,
    /// The route's subtree.
    Route {
        /// Path being rendered.
        path: String,
    },
}

/// One labelled binding value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BindingSnapshot {
    /// Binding label.
    pub label: String,
    /// Value for this frame.
    pub value: VisualValue,
}

/// Everything the host needs to paint one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameSnapshot {
    /// Zero-based frame number.
    pub index: u64,
    /// Time since the stage was created.
    pub elapsed_ms: u64,
    /// Current route.
    pub route: String,
    /// Boot gate phase.
    pub boot_phase: BootPhase,
    /// Opacity of the boot visual.
    pub boot_visual_opacity: f32,
    /// Whether the boot visual is still on screen.
    pub boot_visual_mounted: bool,
    /// Visibility of the gated content.
    pub content: ContentVisibility,
    /// Routed view output.
    pub view: ViewOutput,
    /// Session authentication state.
    pub authenticated: bool,
    /// Scroll state, once mounted.
    pub scroll: Option<ScrollFrame>,
    /// Binding values in registration order, once mounted.
    pub bindings: Vec<BindingSnapshot>,
    /// Scene object angles in radians.
    pub angles: Vec<f32>,
    /// Boot events raised during this frame.
    pub events: Vec<BootEvent>,
}

#[derive(Debug, Default)]
struct RedirectSlot(Option<String>);

impl Navigator for RedirectSlot {
    fn navigate(&mut self, path: &str) {
        self.0 = Some(path.to_string());
    }
}

#[derive(Debug)]
struct MountedTree {
    engine: ScrollEngine,
    binder: ScrollBinder,
}

/// Frame-driven orchestrator.
pub struct Stage {
    store: Store,
    mailbox: Mailbox,
    boot: BootGate,
    routes: RouteTable,
    guard: RouteGuard,
    decision: GuardDecision,
    route: String,
    redirect: RedirectSlot,
    navigation: NavigationLog,
    scene: ScrollBinder,
    tree: Option<MountedTree>,
    extent: Option<(f32, f32)>,
    drive: DriveSignal,
    pointer: PointerTracker,
    renderer: Box<dyn SceneRenderer>,
    frames: u64,
    elapsed: Duration,
}

impl std::fmt::Debug for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stage")
            .field("route", &self.route)
            .field("boot", &self.boot)
            .field("mounted", &self.tree.is_some())
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

impl Stage {
    /// Stage built from `config`.
    pub fn new(config: &StageConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_parts(
            config.route_table()?,
            config.boot_gate(),
            config.drive_signal(),
            config.pointer_tracker(),
        ))
    }

    /// Stage built from already-constructed components.
    pub fn from_parts(
        routes: RouteTable,
        boot: BootGate,
        drive: DriveSignal,
        pointer: PointerTracker,
    ) -> Self {
        Self {
            store: Store::new(),
            mailbox: Mailbox::new(),
            boot,
            routes,
            guard: RouteGuard::new(),
            decision: GuardDecision::Render,
            route: INITIAL_ROUTE.to_string(),
            redirect: RedirectSlot::default(),
            navigation: NavigationLog::default(),
            scene: ScrollBinder::new(),
            tree: None,
            extent: None,
            drive,
            pointer,
            renderer: Box::new(NullRenderer),
            frames: 0,
            elapsed: Duration::ZERO,
        }
    }

    /// Replace the boot visual (builder). Only meaningful before the first frame.
    #[must_use]
    pub fn with_boot_visual(
        mut self,
        visual: impl BootVisual + 'static,
        safety_timeout: Option<Duration>,
    ) -> Self {
        self.boot = BootGate::new(visual).with_safety_timeout(safety_timeout);
        self
    }

    /// Attach the scene renderer (builder).
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl SceneRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Start on `path` instead of [`INITIAL_ROUTE`] (builder).
    #[must_use]
    pub fn with_route(mut self, path: &str) -> Self {
        self.route = path.to_string();
        self
    }

    /// Bindings of the content tree. Before mount these are staged and
    /// carried into the tree when it mounts.
    pub fn binder_mut(&mut self) -> &mut ScrollBinder {
        match &mut self.tree {
            Some(tree) => &mut tree.binder,
            None => &mut self.scene,
        }
    }

    /// Route one input event.
    pub fn handle(&mut self, event: InputEvent) {
        match event {
            InputEvent::Wheel { delta_y } => match &mut self.tree {
                Some(tree) => tree.engine.on_wheel(delta_y),
                None => trace!(delta_y, "wheel before mount ignored"),
            },
            InputEvent::PointerMove { x, y } => self.pointer.on_move(x, y),
            InputEvent::Resize {
                viewport_height,
                document_height,
            } => {
                self.extent = Some((document_height, viewport_height));
                if let Some(tree) = &mut self.tree {
                    tree.engine.set_extent(document_height, viewport_height);
                }
            }
            InputEvent::Navigate(path) => self.navigate(&path),
        }
    }

    /// Apply one store mutation now.
    pub fn dispatch(&mut self, action: StoreAction) {
        if self.store.apply(action) == Namespace::Session {
            self.evaluate_guard();
        }
    }

    /// Sign in.
    pub fn login(&mut self, name: &str) {
        self.dispatch(StoreAction::Login {
            name: name.to_string(),
        });
    }

    /// Sign out.
    pub fn logout(&mut self) {
        self.dispatch(StoreAction::Logout);
    }

    /// Move to `path`, swapping the damping profile without touching the offset.
    pub fn navigate(&mut self, path: &str) {
        if path == self.route {
            return;
        }
        debug!(from = %self.route, to = path, "route change");
        self.route = path.to_string();
        self.navigation.navigate(path);
        if let Some(tree) = &mut self.tree {
            tree.engine.set_profile(self.routes.profile_for(path));
        }
        self.evaluate_guard();
    }

    /// Programmatic scroll. Ignored before mount.
    pub fn scroll_to(&mut self, offset: f32) {
        if let Some(tree) = &mut self.tree {
            tree.engine.scroll_to(offset);
        }
    }

    /// External boot completion signal. Returns `true` if it transitioned.
    pub fn complete_boot(&mut self) -> bool {
        self.boot.complete()
    }

    /// Advance everything by `dt` and report the result.
    pub fn frame(&mut self, dt: Duration) -> FrameSnapshot {
        for action in self.mailbox.drain() {
            self.dispatch(action);
        }

        if let Some(path) = self.redirect.0.take() {
            if self.store.session().get().is_authenticated() {
                debug!(to = %path, "queued redirect dropped; session authenticated");
            } else {
                self.navigate(&path);
            }
        }

        self.boot.tick(dt);
        let events = self.boot.drain_events();
        if self.tree.is_none() && self.boot.is_completed() {
            self.mount();
        }

        let scroll = self.tree.as_mut().map(|tree| {
            let frame = tree.engine.frame(dt);
            tree.binder.update(&frame, dt);
            frame
        });

        let scroll_speed = scroll.map_or(0.0, |f| f.velocity.abs());
        self.drive.set_velocity(self.pointer.decay(dt) + scroll_speed);
        self.drive.frame(dt);
        self.drive.present(&mut *self.renderer);

        self.evaluate_guard();

        let snapshot = FrameSnapshot {
            index: self.frames,
            elapsed_ms: self.elapsed.saturating_add(dt).as_millis() as u64,
            route: self.route.clone(),
            boot_phase: self.boot.phase(),
            boot_visual_opacity: self.boot.visual_opacity(),
            boot_visual_mounted: self.boot.is_visual_mounted(),
            content: self.boot.content_visibility(),
            view: self.view(),
            authenticated: self.store.session().get().is_authenticated(),
            scroll,
            bindings: self.binding_snapshots(),
            angles: self.drive.angles(),
            events,
        };
        self.frames += 1;
        self.elapsed = self.elapsed.saturating_add(dt);
        snapshot
    }

    fn mount(&mut self) {
        let mut engine = ScrollEngine::new(self.routes.profile_for(&self.route));
        if let Some((document, viewport)) = self.extent {
            engine.set_extent(document, viewport);
        }
        let binder = std::mem::take(&mut self.scene);
        debug!(route = %self.route, bindings = binder.len(), "content tree mounted");
        self.tree = Some(MountedTree { engine, binder });
        self.evaluate_guard();
    }

    fn evaluate_guard(&mut self) {
        if self.tree.is_none() {
            return;
        }
        self.decision = self.guard.evaluate(
            &self.routes,
            &self.route,
            self.store.session().get(),
            &mut self.redirect,
        );
        if self.decision == GuardDecision::Render && self.redirect.0.take().is_some() {
            debug!(route = %self.route, "queued redirect dropped; route renders");
        }
    }

    /// What the routed view renders right now.
    pub fn view(&self) -> ViewOutput {
        match (&self.tree, self.decision) {
            (None, _) => ViewOutput::Withheld,
            (Some(_), GuardDecision::Suppress) => ViewOutput::Empty,
            (Some(_), GuardDecision::Render) => ViewOutput::Route {
                path: self.route.clone(),
            },
        }
    }

    fn binding_snapshots(&self) -> Vec<BindingSnapshot> {
        self.tree.as_ref().map_or_else(Vec::new, |tree| {
            tree.binder
                .values()
                .map(|(label, value)| BindingSnapshot {
                    label: label.to_string(),
                    value,
                })
                .collect()
        })
    }

    /// Handle for submitting actions from other threads.
    pub fn sender(&self) -> MailboxSender {
        self.mailbox.sender()
    }

    /// The store.
    pub fn store(&self) -> &Store {
        &self.store
    }

    /// Current session.
    pub fn session(&self) -> &Session {
        self.store.session().get()
    }

    /// Current application state.
    pub fn application(&self) -> &ApplicationState {
        self.store.application().get()
    }

    /// Observe session changes.
    pub fn subscribe_session(&mut self, observer: impl FnMut(&Session) + 'static) -> SubId {
        self.store.session_mut().subscribe(observer)
    }

    /// Observe application state changes.
    pub fn subscribe_application(
        &mut self,
        observer: impl FnMut(&ApplicationState) + 'static,
    ) -> SubId {
        self.store.application_mut().subscribe(observer)
    }

    /// The boot gate.
    pub fn boot_gate(&self) -> &BootGate {
        &self.boot
    }

    /// Whether the content tree is mounted.
    pub fn is_mounted(&self) -> bool {
        self.tree.is_some()
    }

    /// Scroll engine of the mounted tree.
    pub fn scroll_engine(&self) -> Option<&ScrollEngine> {
        self.tree.as_ref().map(|tree| &tree.engine)
    }

    /// Current route.
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Route table.
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// The route guard.
    pub fn guard(&self) -> &RouteGuard {
        &self.guard
    }

    /// Every navigation applied so far, redirects included.
    pub fn navigation_log(&self) -> &NavigationLog {
        &self.navigation
    }

    /// Frames produced so far.
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
