use chrono::{DateTime, Utc};

use crate::domain::{MemberId, MessageId};

/// A directory entry for a person allowed to use the relay once approved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    /// Platform username, without the leading `@`.
    pub handle: Option<String>,
    pub approved: bool,
    pub created_at: DateTime<Utc>,
}

impl Member {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Fields supplied when a member finishes the registration dialogue.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMember {
    pub id: MemberId,
    pub first_name: String,
    pub last_name: String,
    pub handle: Option<String>,
}

/// A relayed message. Immutable once appended.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub sender_id: MemberId,
    pub recipient_id: MemberId,
    pub text: String,
    /// Root of the thread this message replies into; `None` for a thread root.
    pub thread_id: Option<MessageId>,
    pub created_at: DateTime<Utc>,
}

/// Fields supplied when appending to the ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMessage {
    pub sender_id: MemberId,
    pub recipient_id: MemberId,
    pub text: String,
    pub thread_id: Option<MessageId>,
}

/// Aggregates shown by the admin statistics command.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    pub total_members: u64,
    pub approved_members: u64,
    pub messages_today: u64,
    pub messages_week: u64,
    pub total_messages: u64,
}

impl Stats {
    pub fn pending_members(&self) -> u64 {
        self.total_members.saturating_sub(self.approved_members)
    }
}
