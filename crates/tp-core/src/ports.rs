use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::{
    domain::{MemberId, MessageId},
    model::{Member, Message, NewMember, NewMessage},
    Result,
};

/// Hexagonal port for the member directory.
///
/// Every method is a single atomic statement at the storage layer; persistence
/// failures surface as `Error::Storage`.
#[async_trait]
pub trait Directory: Send + Sync {
    /// Insert unless the id already exists. Returns whether a row was inserted.
    async fn create_member(&self, member: NewMember) -> Result<bool>;

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>>;

    /// No-op when the member is absent.
    async fn approve_member(&self, id: MemberId) -> Result<()>;

    async fn delete_member(&self, id: MemberId) -> Result<()>;

    async fn update_member_name(&self, id: MemberId, first_name: &str, last_name: &str)
        -> Result<()>;

    /// Approved members ordered by (first name, last name), ordinal comparison.
    async fn list_approved_members(&self, excluding: Option<MemberId>) -> Result<Vec<Member>>;

    /// All members, same ordering as `list_approved_members`.
    async fn list_all_members(&self) -> Result<Vec<Member>>;

    async fn count_all(&self) -> Result<u64>;

    async fn count_approved(&self) -> Result<u64>;
}

/// Hexagonal port for the append-only message ledger.
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Append and return the freshly assigned, strictly increasing id.
    async fn append(&self, message: NewMessage) -> Result<MessageId>;

    async fn get(&self, id: MessageId) -> Result<Option<Message>>;

    async fn count_all(&self) -> Result<u64>;

    /// Messages created at or after `since` (server clock).
    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64>;
}
