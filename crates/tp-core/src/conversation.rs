//! Per-member conversation state (registration, name edit, compose) and the
//! name changes waiting for the admin.
//!
//! State is process-local and lost on restart; every flow can be resumed by
//! reissuing its entry command.

use std::collections::HashMap;

use tokio::sync::Mutex;

use crate::domain::{MemberId, MessageId};

/// Minimum length of a first or last name, in Unicode code points.
pub const MIN_NAME_CHARS: usize = 2;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Conversation {
    #[default]
    Idle,
    AwaitingFirstName,
    AwaitingLastName {
        first_name: String,
    },
    AwaitingEditFirstName,
    AwaitingEditLastName {
        first_name: String,
    },
    Composing {
        recipient: MemberId,
        reply_to: Option<MessageId>,
    },
}

/// Which name field a reprompt is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NameField {
    First,
    Last,
}

/// Outcome of feeding a plain-text message into the current state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Step {
    /// Input rejected; state unchanged.
    Reprompt(NameField),
    /// First name accepted; the caller stores the returned state.
    Advance(Conversation),
    /// Registration dialogue complete (names are trimmed and valid).
    Register {
        first_name: String,
        last_name: String,
    },
    /// Name-edit dialogue complete (names are trimmed and valid).
    RequestNameChange {
        first_name: String,
        last_name: String,
    },
    /// Text is a message body for the pending recipient.
    Relay {
        recipient: MemberId,
        reply_to: Option<MessageId>,
    },
    /// Not in any dialogue; the text has no pending destination.
    Unrouted,
}

/// Trim surrounding whitespace and require at least `MIN_NAME_CHARS` code points.
pub fn validate_name(raw: &str) -> Option<String> {
    let name = raw.trim();
    if name.chars().count() >= MIN_NAME_CHARS {
        Some(name.to_string())
    } else {
        None
    }
}

impl Conversation {
    /// Pure transition for a plain-text message. Side effects belong to the caller.
    pub fn on_text(&self, text: &str) -> Step {
        match self {
            Conversation::Idle => Step::Unrouted,
            Conversation::AwaitingFirstName => match validate_name(text) {
                Some(first_name) => Step::Advance(Conversation::AwaitingLastName { first_name }),
                None => Step::Reprompt(NameField::First),
            },
            Conversation::AwaitingLastName { first_name } => match validate_name(text) {
                Some(last_name) => Step::Register {
                    first_name: first_name.clone(),
                    last_name,
                },
                None => Step::Reprompt(NameField::Last),
            },
            Conversation::AwaitingEditFirstName => match validate_name(text) {
                Some(first_name) => {
                    Step::Advance(Conversation::AwaitingEditLastName { first_name })
                }
                None => Step::Reprompt(NameField::First),
            },
            Conversation::AwaitingEditLastName { first_name } => match validate_name(text) {
                Some(last_name) => Step::RequestNameChange {
                    first_name: first_name.clone(),
                    last_name,
                },
                None => Step::Reprompt(NameField::Last),
            },
            Conversation::Composing {
                recipient,
                reply_to,
            } => Step::Relay {
                recipient: *recipient,
                reply_to: *reply_to,
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Conversation::Idle)
    }
}

/// Process-local session store keyed by member id.
///
/// Concurrent events from the same member race on their entry; last write wins.
#[derive(Default)]
pub struct SessionStore {
    inner: Mutex<HashMap<MemberId, Conversation>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, member: MemberId) -> Conversation {
        self.inner
            .lock()
            .await
            .get(&member)
            .cloned()
            .unwrap_or_default()
    }

    pub async fn set(&self, member: MemberId, state: Conversation) {
        let mut map = self.inner.lock().await;
        if state.is_idle() {
            map.remove(&member);
        } else {
            map.insert(member, state);
        }
    }

    /// Back to `Idle`, discarding buffered input. Returns the discarded state.
    pub async fn reset(&self, member: MemberId) -> Conversation {
        self.inner
            .lock()
            .await
            .remove(&member)
            .unwrap_or_default()
    }
}

/// A name a member asked for, held until the admin decides.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProposedName {
    pub first_name: String,
    pub last_name: String,
}

impl ProposedName {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// One outstanding name-change request per member; a newer request replaces
/// the older one.
#[derive(Default)]
pub struct PendingNameChanges {
    inner: Mutex<HashMap<MemberId, ProposedName>>,
}

impl PendingNameChanges {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn put(&self, member: MemberId, name: ProposedName) {
        self.inner.lock().await.insert(member, name);
    }

    pub async fn take(&self, member: MemberId) -> Option<ProposedName> {
        self.inner.lock().await.remove(&member)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn registration_dialogue() {
        let st = Conversation::AwaitingFirstName;
        assert_eq!(st.on_text(" O "), Step::Reprompt(NameField::First));

        let Step::Advance(next) = st.on_text("  Олена ") else {
            panic!("expected advance");
        };
        assert_eq!(
            next,
            Conversation::AwaitingLastName {
                first_name: "Олена".to_string()
            }
        );

        assert_eq!(next.on_text("П"), Step::Reprompt(NameField::Last));
        assert_eq!(
            next.on_text("Петренко"),
            Step::Register {
                first_name: "Олена".to_string(),
                last_name: "Петренко".to_string()
            }
        );
    }

    #[test]
    fn edit_dialogue_ends_in_request_not_update() {
        let st = Conversation::AwaitingEditLastName {
            first_name: "Іван".to_string(),
        };
        assert_eq!(
            st.on_text("Коваленко"),
            Step::RequestNameChange {
                first_name: "Іван".to_string(),
                last_name: "Коваленко".to_string()
            }
        );
        assert_eq!(
            Conversation::AwaitingEditFirstName.on_text("x"),
            Step::Reprompt(NameField::First)
        );
    }

    #[test]
    fn composing_routes_text_to_relay() {
        let st = Conversation::Composing {
            recipient: MemberId(2),
            reply_to: Some(MessageId(9)),
        };
        assert_eq!(
            st.on_text("hello"),
            Step::Relay {
                recipient: MemberId(2),
                reply_to: Some(MessageId(9))
            }
        );
        assert_eq!(Conversation::Idle.on_text("hello"), Step::Unrouted);
    }

    #[test]
    fn name_length_counts_code_points_not_bytes() {
        // Two Cyrillic letters are four bytes but only two code points.
        assert_eq!(validate_name("Ія"), Some("Ія".to_string()));
        assert_eq!(validate_name("Я"), None);
        assert_eq!(validate_name("   "), None);
    }

    #[tokio::test]
    async fn session_store_set_get_reset() {
        let store = SessionStore::new();
        let m = MemberId(5);
        assert_eq!(store.get(m).await, Conversation::Idle);

        store.set(m, Conversation::AwaitingFirstName).await;
        assert_eq!(store.get(m).await, Conversation::AwaitingFirstName);

        assert_eq!(store.reset(m).await, Conversation::AwaitingFirstName);
        assert_eq!(store.get(m).await, Conversation::Idle);
    }

    #[tokio::test]
    async fn newer_name_request_replaces_older() {
        let pending = PendingNameChanges::new();
        let m = MemberId(7);
        let name = |first: &str, last: &str| ProposedName {
            first_name: first.to_string(),
            last_name: last.to_string(),
        };

        pending.put(m, name("Іван", "Коваль")).await;
        pending.put(m, name("Іван", "Ковальчук")).await;

        assert_eq!(pending.take(m).await, Some(name("Іван", "Ковальчук")));
        assert_eq!(pending.take(m).await, None);
    }

    proptest! {
        #[test]
        fn validated_names_are_trimmed_and_long_enough(raw in "\\PC{0,12}") {
            match validate_name(&raw) {
                Some(name) => {
                    prop_assert_eq!(name.as_str(), raw.trim());
                    prop_assert!(name.chars().count() >= MIN_NAME_CHARS);
                }
                None => prop_assert!(raw.trim().chars().count() < MIN_NAME_CHARS),
            }
        }
    }
}
