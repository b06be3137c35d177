use crate::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS users (
            id                TEXT PRIMARY KEY,
            username          TEXT NOT NULL UNIQUE,
            email             TEXT NOT NULL UNIQUE,
            password          TEXT NOT NULL,
            image_url         TEXT NOT NULL,
            header_image_url  TEXT NOT NULL,
            bio               TEXT,
            location          TEXT,
            created_at        TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS messages (
            id          TEXT PRIMARY KEY,
            text        TEXT NOT NULL CHECK (length(text) <= 140),
            timestamp   TEXT NOT NULL DEFAULT (datetime('now')),
            user_id     TEXT NOT NULL REFERENCES users(id)
        );

        CREATE INDEX IF NOT EXISTS idx_messages_user
            ON messages(user_id, timestamp);

        CREATE TABLE IF NOT EXISTS follows (
            follower_id  TEXT NOT NULL REFERENCES users(id),
            followed_id  TEXT NOT NULL REFERENCES users(id),
            created_at   TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (follower_id, followed_id)
        );

        CREATE INDEX IF NOT EXISTS idx_follows_followed
            ON follows(followed_id);

        CREATE TABLE IF NOT EXISTS likes (
            user_id     TEXT NOT NULL REFERENCES users(id),
            message_id  TEXT NOT NULL REFERENCES messages(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            PRIMARY KEY (user_id, message_id)
        );

        CREATE INDEX IF NOT EXISTS idx_likes_message
            ON likes(message_id);

        CREATE TABLE IF NOT EXISTS sessions (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL REFERENCES users(id),
            created_at  TEXT NOT NULL DEFAULT (datetime('now')),
            expires_at  TEXT NOT NULL
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
