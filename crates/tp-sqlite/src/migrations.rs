use rusqlite::Connection;
use tracing::debug;

pub fn run(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS members (
            id          INTEGER PRIMARY KEY,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            username    TEXT,
            approved    INTEGER NOT NULL DEFAULT 0,
            created_at  INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_members_name
            ON members(first_name, last_name);

        CREATE TABLE IF NOT EXISTS messages (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            sender_id     INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            recipient_id  INTEGER NOT NULL REFERENCES members(id) ON DELETE CASCADE,
            text          TEXT NOT NULL CHECK (length(text) > 0),
            thread_id     INTEGER REFERENCES messages(id) ON DELETE SET NULL,
            created_at    INTEGER NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_messages_created
            ON messages(created_at);

        CREATE INDEX IF NOT EXISTS idx_messages_thread
            ON messages(thread_id);
        ",
    )?;

    debug!("database migrations complete");
    Ok(())
}
