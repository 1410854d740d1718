#![forbid(unsafe_code)]

//! Application namespace: selection, saved items, assistant transcript.

use serde::Serialize;

/// Opening line the assistant transcript is seeded with.
pub const WELCOME_MESSAGE: &str = "Systems online. Ask about any node in the registry.";

/// Author of a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The viewer.
    User,
    /// The assistant.
    Assistant,
}

/// One line of the assistant transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranscriptEntry {
    /// Who said it.
    pub speaker: Speaker,
    /// What was said.
    pub text: String,
}

impl TranscriptEntry {
    /// Entry authored by the viewer.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::User,
            text: text.into(),
        }
    }

    /// Entry authored by the assistant.
    pub fn assistant(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Assistant,
            text: text.into(),
        }
    }
}

/// Set of ids that remembers first-insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SavedItems {
    ids: Vec<String>,
}

impl SavedItems {
    /// Remove `id` if present, otherwise append it. Returns the new membership.
    pub fn toggle(&mut self, id: &str) -> bool {
        if let Some(pos) = self.ids.iter().position(|existing| existing == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id.to_string());
            true
        }
    }

    /// Whether `id` is saved.
    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|existing| existing == id)
    }

    /// Saved ids in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Number of saved ids.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether nothing is saved.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// UI state shared across views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApplicationState {
    /// Node currently focused in the graph view.
    pub active_node_id: Option<String>,
    /// Bookmarked items.
    pub saved_items: SavedItems,
    /// Append-only assistant conversation.
    pub assistant_transcript: Vec<TranscriptEntry>,
    /// Item opened in the registry view.
    pub selected_registry_item: Option<String>,
}

impl Default for ApplicationState {
    fn default() -> Self {
        Self {
            active_node_id: None,
            saved_items: SavedItems::default(),
            assistant_transcript: vec![TranscriptEntry::assistant(WELCOME_MESSAGE)],
            selected_registry_item: None,
        }
    }
}
