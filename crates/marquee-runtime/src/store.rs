#![forbid(unsafe_code)]

//! Ephemeral state store.
//!
//! The [`Store`] holds two independent namespaces, [`Session`] and
//! [`ApplicationState`], each wrapped in a [`Slice`] with its own observers
//! and revision counter.
//!
//! # Invariants
//!
//! 1. Every mutation computes the next slice value, swaps it in one step,
//!    bumps the revision, then notifies that slice's observers.
//! 2. All notifications fire before the mutating call returns, so
//!    back-to-back mutations are observed in issuance order.
//! 3. Mutations are total: no input is rejected and nothing panics.
//! 4. Nothing is persisted; dropping the store drops the state.
//!
//! The store is passed to whoever needs it (normally the
//! [`Stage`](crate::stage::Stage) owns it); there is no global instance.

use serde::Deserialize;
use tracing::{debug, trace};

use crate::app_state::{ApplicationState, TranscriptEntry};
use crate::session::Session;
use crate::subscription::{Observers, SubId};

/// One observable namespace.
#[derive(Debug)]
pub struct Slice<T> {
    value: T,
    revision: u64,
    observers: Observers<T>,
}

impl<T> Slice<T> {
    fn new(value: T) -> Self {
        Self {
            value,
            revision: 0,
            observers: Observers::new(),
        }
    }

    /// Current value.
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Number of completed mutations.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Observe every future value of this slice.
    pub fn subscribe(&mut self, observer: impl FnMut(&T) + 'static) -> SubId {
        self.observers.subscribe(observer)
    }

    /// Stop observing. Returns `true` if the id was registered.
    pub fn unsubscribe(&mut self, id: SubId) -> bool {
        self.observers.unsubscribe(id)
    }

    fn replace_with(&mut self, next: impl FnOnce(&T) -> T) {
        self.value = next(&self.value);
        self.revision += 1;
        self.observers.notify(&self.value);
    }
}

/// A store mutation expressed as data.
///
/// Used by the [`Mailbox`](crate::mailbox::Mailbox) and by hosts that
/// deserialize actions from their own event channel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StoreAction {
    /// Sign in as `name`.
    Login {
        /// Display name.
        name: String,
    },
    /// Sign out.
    Logout,
    /// Focus a node, or clear focus.
    SetActiveNode {
        /// Node id.
        id: Option<String>,
    },
    /// Flip saved membership of an item.
    ToggleSaved {
        /// Item id.
        id: String,
    },
    /// Append to the assistant transcript.
    AddMessage {
        /// Entry to append.
        entry: IncomingMessage,
    },
    /// Open a registry item, or close it.
    SetSelectedRegistryItem {
        /// Item id.
        id: Option<String>,
    },
}

/// Transcript entry as carried by a [`StoreAction`].
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IncomingMessage {
    /// `"user"` or `"assistant"`; anything else is treated as the user.
    pub speaker: String,
    /// Message text.
    pub text: String,
}

impl From<IncomingMessage> for TranscriptEntry {
    fn from(message: IncomingMessage) -> Self {
        if message.speaker == "assistant" {
            TranscriptEntry::assistant(message.text)
        } else {
            TranscriptEntry::user(message.text)
        }
    }
}

/// Which namespace a mutation touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// [`Session`].
    Session,
    /// [`ApplicationState`].
    Application,
}

/// Process-local store for session and application state.
#[derive(Debug)]
pub struct Store {
    session: Slice<Session>,
    application: Slice<ApplicationState>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}

impl Store {
    /// Signed-out session and freshly seeded application state.
    pub fn new() -> Self {
        Self {
            session: Slice::new(Session::signed_out()),
            application: Slice::new(ApplicationState::default()),
        }
    }

    /// Session slice (read, subscribe).
    pub fn session(&self) -> &Slice<Session> {
        &self.session
    }

    /// Mutable session slice, for subscribing.
    pub fn session_mut(&mut self) -> &mut Slice<Session> {
        &mut self.session
    }

    /// Application slice (read, subscribe).
    pub fn application(&self) -> &Slice<ApplicationState> {
        &self.application
    }

    /// Mutable application slice, for subscribing.
    pub fn application_mut(&mut self) -> &mut Slice<ApplicationState> {
        &mut self.application
    }

    /// Sign in. The name is not validated.
    pub fn login(&mut self, name: &str) {
        debug!(name, "session login");
        self.session.replace_with(|_| Session::signed_in(name));
    }

    /// Sign out.
    pub fn logout(&mut self) {
        debug!("session logout");
        self.session.replace_with(|_| Session::signed_out());
    }

    /// Focus a node.
    pub fn set_active_node(&mut self, id: Option<&str>) {
        trace!(?id, "set active node");
        let id = id.map(str::to_string);
        self.application.replace_with(|state| ApplicationState {
            active_node_id: id,
            ..state.clone()
        });
    }

    /// Toggle saved membership of `id`.
    pub fn toggle_saved(&mut self, id: &str) {
        trace!(id, "toggle saved");
        self.application.replace_with(|state| {
            let mut next = state.clone();
            next.saved_items.toggle(id);
            next
        });
    }

    /// Append a transcript entry.
    pub fn add_message(&mut self, entry: TranscriptEntry) {
        trace!(speaker = ?entry.speaker, "append transcript entry");
        self.application.replace_with(|state| {
            let mut next = state.clone();
            next.assistant_transcript.push(entry);
            next
        });
    }

    /// Open a registry item.
    pub fn set_selected_registry_item(&mut self, id: Option<&str>) {
        trace!(?id, "select registry item");
        let id = id.map(str::to_string);
        self.application.replace_with(|state| ApplicationState {
            selected_registry_item: id,
            ..state.clone()
        });
    }

    /// Apply a data-form mutation. Returns the namespace it touched.
    pub fn apply(&mut self, action: StoreAction) -> Namespace {
        match action {
            StoreAction::Login { name } => {
                self.login(&name);
                Namespace::Session
            }
            StoreAction::Logout => {
                self.logout();
                Namespace::Session
            }
            StoreAction::SetActiveNode { id } => {
                self.set_active_node(id.as_deref());
                Namespace::Application
            }
            StoreAction::ToggleSaved { id } => {
                self.toggle_saved(&id);
                Namespace::Application
            }
            StoreAction::AddMessage { entry } => {
                self.add_message(entry.into());
                Namespace::Application
            }
            StoreAction::SetSelectedRegistryItem { id } => {
                self.set_selected_registry_item(id.as_deref());
                Namespace::Application
            }
        }
    }
}
