#![forbid(unsafe_code)]

//! Single-writer mailbox for store mutations.
//!
//! The store itself is single-threaded. Work running on other threads (a
//! network task answering an assistant prompt, say) submits
//! [`StoreAction`]s through a [`MailboxSender`]; the owner drains the
//! [`Mailbox`] at the start of each frame and applies actions in submission
//! order. Mutation and notification therefore stay on one thread with the
//! same ordering guarantees as direct calls.

use std::sync::mpsc;

use tracing::warn;

use crate::store::StoreAction;

/// Cloneable, `Send` handle for submitting actions.
#[derive(Debug, Clone)]
pub struct MailboxSender {
    tx: mpsc::Sender<StoreAction>,
}

impl MailboxSender {
    /// Queue `action`. Returns `false` if the mailbox has been dropped.
    pub fn send(&self, action: StoreAction) -> bool {
        match self.tx.send(action) {
            Ok(()) => true,
            Err(mpsc::SendError(action)) => {
                warn!(?action, "mailbox closed; action discarded");
                false
            }
        }
    }
}

/// Receiving side, owned by the single writer.
#[derive(Debug)]
pub struct Mailbox {
    tx: mpsc::Sender<StoreAction>,
    rx: mpsc::Receiver<StoreAction>,
}

impl Default for Mailbox {
    fn default() -> Self {
        Self::new()
    }
}

impl Mailbox {
    /// Empty mailbox.
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    /// New sender handle.
    pub fn sender(&self) -> MailboxSender {
        MailboxSender {
            tx: self.tx.clone(),
        }
    }

    /// Every action queued so far, in submission order. Never blocks.
    pub fn drain(&self) -> Vec<StoreAction> {
        self.rx.try_iter().collect()
    }
}
