#![forbid(unsafe_code)]

//! Session namespace: who is signed in.

use serde::Serialize;
use unicode_segmentation::UnicodeSegmentation;

/// Role assigned to every signed-in user.
pub const OPERATOR_ROLE: &str = "OPERATOR";

/// A signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Display name exactly as entered.
    pub name: String,
    /// Fixed role label.
    pub role: String,
    /// First two characters of the name, upper-cased.
    pub avatar_initials: String,
}

impl User {
    /// Build the user record for `name`.
    pub fn from_name(name: &str) -> Self {
        Self {
            name: name.to_string(),
            role: OPERATOR_ROLE.to_string(),
            avatar_initials: initials(name),
        }
    }
}

/// First two user-perceived characters of `name`, upper-cased.
pub fn initials(name: &str) -> String {
    name.graphemes(true).take(2).collect::<String>().to_uppercase()
}

/// Authentication state.
///
/// `is_authenticated()` is derived from the presence of a user, so a
/// session can never be authenticated without a user or vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Session {
    user: Option<User>,
}

impl Session {
    /// Signed-out session.
    pub const fn signed_out() -> Self {
        Self { user: None }
    }

    /// Session signed in as `name`.
    pub fn signed_in(name: &str) -> Self {
        Self {
            user: Some(User::from_name(name)),
        }
    }

    /// Whether a user is signed in.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }
}
