use async_trait::async_trait;
use chrono::Utc;
use rusqlite::{params, OptionalExtension, Row};
use tp_core::{
    domain::MemberId,
    model::{Member, NewMember},
    ports::Directory,
    Result,
};

use crate::{timestamp, SqliteStore};

const MEMBER_COLUMNS: &str = "id, first_name, last_name, username, approved, created_at";

fn member_from_row(row: &Row<'_>) -> rusqlite::Result<Member> {
    Ok(Member {
        id: MemberId(row.get(0)?),
        first_name: row.get(1)?,
        last_name: row.get(2)?,
        handle: row.get(3)?,
        approved: row.get(4)?,
        created_at: timestamp(row.get(5)?),
    })
}

#[async_trait]
impl Directory for SqliteStore {
    async fn create_member(&self, member: NewMember) -> Result<bool> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT OR IGNORE INTO members (id, first_name, last_name, username, approved, created_at)
                 VALUES (?1, ?2, ?3, ?4, 0, ?5)",
                params![
                    member.id.0,
                    member.first_name,
                    member.last_name,
                    member.handle,
                    Utc::now().timestamp()
                ],
            )?;
            Ok(inserted == 1)
        })
    }

    async fn get_member(&self, id: MemberId) -> Result<Option<Member>> {
        self.with_conn(|conn| {
            conn.query_row(
                &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE id = ?1"),
                [id.0],
                member_from_row,
            )
            .optional()
        })
    }

    async fn approve_member(&self, id: MemberId) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("UPDATE members SET approved = 1 WHERE id = ?1", [id.0])?;
            Ok(())
        })
    }

    async fn delete_member(&self, id: MemberId) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM members WHERE id = ?1", [id.0])?;
            Ok(())
        })
    }

    async fn update_member_name(
        &self,
        id: MemberId,
        first_name: &str,
        last_name: &str,
    ) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "UPDATE members SET first_name = ?2, last_name = ?3 WHERE id = ?1",
                params![id.0, first_name, last_name],
            )?;
            Ok(())
        })
    }

    async fn list_approved_members(&self, excluding: Option<MemberId>) -> Result<Vec<Member>> {
        self.with_conn(|conn| {
            // Default BINARY collation gives ordinal ordering.
            let mut stmt = conn.prepare(&format!(
                "SELECT {MEMBER_COLUMNS} FROM members
                 WHERE approved = 1 AND (?1 IS NULL OR id <> ?1)
                 ORDER BY first_name, last_name"
            ))?;
            let rows = stmt.query_map([excluding.map(|m| m.0)], member_from_row)?;
            rows.collect()
        })
    }

    async fn list_all_members(&self) -> Result<Vec<Member>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {MEMBER_COLUMNS} FROM members ORDER BY first_name, last_name"
            ))?;
            let rows = stmt.query_map([], member_from_row)?;
            rows.collect()
        })
    }

    async fn count_all(&self) -> Result<u64> {
        self.with_conn(|conn| {
            conn.query_row("SELECT COUNT(*) FROM members", [], |row| row.get::<_, i64>(0))
        })
        .map(|n| n as u64)
    }

    async fn count_approved(&self) -> Result<u64> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT COUNT(*) FROM members WHERE approved = 1",
                [],
                |row| row.get::<_, i64>(0),
            )
        })
        .map(|n| n as u64)
    }
}
