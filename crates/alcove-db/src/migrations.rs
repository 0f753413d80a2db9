use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS conversations (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            peer_low    TEXT NOT NULL,
            peer_high   TEXT NOT NULL,
            shared_key  BLOB NOT NULL,
            pin_low     TEXT,
            pin_high    TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (peer_low, peer_high)
        );

        CREATE TABLE IF NOT EXISTS messages (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            peer_low      TEXT NOT NULL,
            peer_high     TEXT NOT NULL,
            sender        TEXT NOT NULL,
            receiver      TEXT NOT NULL,
            kind          TEXT NOT NULL DEFAULT 'text',
            ciphertext    BLOB,
            blob_ref      TEXT,
            display_name  TEXT,
            created_at    TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON messages(peer_low, peer_high, created_at);
        ",
    )?;

    info!("database migrations complete");
    Ok(())
}
