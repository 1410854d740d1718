//! Property tests for store mutations.

use marquee_runtime::session::OPERATOR_ROLE;
use marquee_runtime::{Speaker, Store, TranscriptEntry};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Clone)]
enum Op {
    Toggle(u8),
    Login(String),
    Logout,
    Message(String),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0u8..6).prop_map(Op::Toggle),
        1 => "[a-zA-Z]{0,6}".prop_map(Op::Login),
        1 => Just(Op::Logout),
        1 => "[a-z ]{0,12}".prop_map(Op::Message),
    ]
}

proptest! {
    #[test]
    fn saved_membership_follows_toggle_parity(ids in prop::collection::vec(0u8..6, 0..64)) {
        let mut store = Store::new();
        let mut counts: HashMap<u8, usize> = HashMap::new();
        for id in &ids {
            store.toggle_saved(&format!("node-{id}"));
            *counts.entry(*id).or_default() += 1;
        }
        let saved = &store.application().get().saved_items;
        for id in 0u8..6 {
            let odd = counts.get(&id).copied().unwrap_or(0) % 2 == 1;
            prop_assert_eq!(saved.contains(&format!("node-{id}")), odd);
        }
    }

    #[test]
    fn session_user_present_iff_authenticated(ops in prop::collection::vec(op(), 0..40)) {
        let mut store = Store::new();
        let mut expected_transcript = 1usize;
        for op in ops {
            match op {
                Op::Toggle(id) => store.toggle_saved(&id.to_string()),
                Op::Login(name) => store.login(&name),
                Op::Logout => store.logout(),
                Op::Message(text) => {
                    store.add_message(TranscriptEntry::user(text));
                    expected_transcript += 1;
                }
            }
            let session = store.session().get();
            prop_assert_eq!(session.user().is_some(), session.is_authenticated());
            if let Some(user) = session.user() {
                prop_assert_eq!(user.role.as_str(), OPERATOR_ROLE);
                prop_assert!(user.avatar_initials.chars().count() <= 2);
            }
        }
        let transcript = &store.application().get().assistant_transcript;
        prop_assert_eq!(transcript.len(), expected_transcript);
        prop_assert_eq!(transcript[0].speaker, Speaker::Assistant);
    }

    #[test]
    fn revisions_count_mutations(logins in 0usize..10, toggles in 0usize..10) {
        let mut store = Store::new();
        for i in 0..logins {
            store.login(&format!("user{i}"));
        }
        for i in 0..toggles {
            store.toggle_saved(&i.to_string());
        }
        prop_assert_eq!(store.session().revision(), logins as u64);
        prop_assert_eq!(store.application().revision(), toggles as u64);
    }
}
