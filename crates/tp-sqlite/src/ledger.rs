use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, OptionalExtension};
use tp_core::{
    domain::{MemberId, MessageId},
    model::{Message, NewMessage},
    ports::Ledger,
    Result,
};

use crate::{timestamp, SqliteStore};

#[async_trait]
impl Ledger for SqliteStore {
    async fn append(&self, message: NewMessage) -> Result<MessageId> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (sender_id, recipient_id, text, thread_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    message.sender_id.0,
                    message.recipient_id.0,
                    message.text,
                    message.thread_id.map(|t| t.0),
                    Utc::now().timestamp()
                ],
            )?;
            Ok(MessageId(conn.last_insert_rowid()))
        })
    }

    async fn get(&self, id: MessageId) -> Result<Option<Message>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT id, sender_id, recipient_id, text, thread_id, created_at
                 FROM messages WHERE id = ?1",
                [id.0],
                |row| {
                    Ok(Message {
                        id: MessageId(row.get(0)?),
                        sender_id: MemberId(row.get(1)?),
                        recipient_id: MemberId(row.get(2)?),
                        text: row.get(3)?,
                        thread_id: row.get::<_, Option<i64>>(4)?.map(MessageId),
                        created_at: timestamp(row.get(5)?),
                    })
                },
            )
            .optional()
        })
    }

    async fn count_all(&self) -> Result<u64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM messages", [], |row| row.get::<_, i64>(0))
        })
        .map(|n| n as u64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> Result<u64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM messages WHERE created_at >= ?1",
                [since.timestamp()],
                |row| row.get::<_, i64>(0),
            )
        })
        .map(|n| n as u64)
    }
}
