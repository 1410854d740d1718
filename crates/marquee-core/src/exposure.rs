#![forbid(unsafe_code)]

//! Content exposure flags.
//!
//! Opacity alone does not hide content: a transparent subtree can still take
//! focus or be announced by assistive technology. [`Exposure`] records which
//! trees a piece of content participates in.

use bitflags::bitflags;

bitflags! {
    /// Which host trees a content subtree participates in.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct Exposure: u8 {
        /// Receives pointer, keyboard, and focus.
        const INTERACTIVE = 0b0000_0001;
        /// Present in the accessibility tree.
        const ACCESSIBLE = 0b0000_0010;
    }
}

impl Exposure {
    /// Fully exposed content.
    pub const LIVE: Self = Self::INTERACTIVE.union(Self::ACCESSIBLE);

    /// Whether the content is withheld from every tree.
    pub const fn is_inert(self) -> bool {
        self.is_empty()
    }
}

impl Default for Exposure {
    fn default() -> Self {
        Self::LIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn live_contains_both_trees() {
        assert!(Exposure::LIVE.contains(Exposure::INTERACTIVE));
        assert!(Exposure::LIVE.contains(Exposure::ACCESSIBLE));
        assert!(!Exposure::LIVE.is_inert());
    }

    #[test]
    fn empty_is_inert() {
        assert!(Exposure::empty().is_inert());
    }
}
