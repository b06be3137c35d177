use rusqlite::{Connection, OptionalExtension};
use uuid::Uuid;

use crate::models::{
    DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL, MessageRow, UserRow, UserStats,
};
use crate::{Database, Result, StoreError, password};

/// Server-side session lifetime. The cookie only carries the session id;
/// expiry is enforced here.
const SESSION_LIFETIME: &str = "+30 days";

const USER_COLUMNS: &str =
    "id, username, email, password, image_url, header_image_url, bio, location, created_at";

impl Database {
    // -- Users --

    /// Hash the password and insert the user, all-or-nothing. UNIQUE
    /// violations surface as `StoreError::Duplicate` naming the column.
    pub fn signup(
        &self,
        username: &str,
        email: &str,
        password: &str,
        image_url: Option<&str>,
        location: Option<&str>,
        bio: Option<&str>,
    ) -> Result<UserRow> {
        let password_hash = password::hash_password(password)?;
        let id = Uuid::new_v4().to_string();

        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (id, username, email, password, image_url, header_image_url, bio, location)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    id,
                    username,
                    email,
                    password_hash,
                    image_url.unwrap_or(DEFAULT_IMAGE_URL),
                    DEFAULT_HEADER_IMAGE_URL,
                    bio,
                    location,
                ],
            )
            .map_err(StoreError::from_sqlite)?;

            query_user_by_id(conn, &id)?.ok_or(StoreError::NotFound)
        })
    }

    /// Look the user up by exact username and check the password digest.
    /// An unknown username and a wrong password are both `Ok(None)` —
    /// indistinguishable to the caller.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<Option<UserRow>> {
        let Some(user) = self.get_user_by_username(username)? else {
            return Ok(None);
        };
        if password::verify_password(&user.password, password) {
            Ok(Some(user))
        } else {
            Ok(None)
        }
    }

    pub fn get_user_by_id(&self, id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_id(conn, id))
    }

    pub fn get_user_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"))?;
            Ok(stmt.query_row([username], user_from_row).optional()?)
        })
    }

    /// All users, or those whose username contains `q`.
    pub fn list_users(&self, q: Option<&str>) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE ?1 IS NULL OR username LIKE '%' || ?1 || '%'
                 ORDER BY username"
            ))?;
            let rows = stmt
                .query_map([q], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn update_user(
        &self,
        id: &str,
        username: &str,
        email: &str,
        image_url: &str,
        header_image_url: &str,
        bio: Option<&str>,
        location: Option<&str>,
    ) -> Result<()> {
        self.with_conn(|conn| {
            let updated = conn
                .execute(
                    "UPDATE users
                     SET username = ?2, email = ?3, image_url = ?4,
                         header_image_url = ?5, bio = ?6, location = ?7
                     WHERE id = ?1",
                    rusqlite::params![id, username, email, image_url, header_image_url, bio, location],
                )
                .map_err(StoreError::from_sqlite)?;
            if updated == 0 {
                return Err(StoreError::NotFound);
            }
            Ok(())
        })
    }

    /// Remove a user and everything that references them, in one
    /// transaction: likes on their messages, their own likes, both follow
    /// directions, their messages, their sessions, then the row itself.
    pub fn delete_user(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute(
                "DELETE FROM likes
                 WHERE message_id IN (SELECT id FROM messages WHERE user_id = ?1)",
                [id],
            )?;
            tx.execute("DELETE FROM likes WHERE user_id = ?1", [id])?;
            tx.execute(
                "DELETE FROM follows WHERE follower_id = ?1 OR followed_id = ?1",
                [id],
            )?;
            tx.execute("DELETE FROM messages WHERE user_id = ?1", [id])?;
            tx.execute("DELETE FROM sessions WHERE user_id = ?1", [id])?;
            let deleted = tx.execute("DELETE FROM users WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn user_stats(&self, id: &str) -> Result<UserStats> {
        self.with_conn(|conn| {
            let stats = conn.query_row(
                "SELECT
                    (SELECT COUNT(*) FROM messages WHERE user_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE follower_id = ?1),
                    (SELECT COUNT(*) FROM follows WHERE followed_id = ?1),
                    (SELECT COUNT(*) FROM likes WHERE user_id = ?1)",
                [id],
                |row| {
                    Ok(UserStats {
                        messages: row.get(0)?,
                        following: row.get(1)?,
                        followers: row.get(2)?,
                        likes: row.get(3)?,
                    })
                },
            )?;
            Ok(stats)
        })
    }

    // -- Sessions --

    /// Insert a session row and return its opaque id.
    pub fn create_session(&self, user_id: &str) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO sessions (id, user_id, expires_at)
                 VALUES (?1, ?2, datetime('now', ?3))",
                rusqlite::params![id, user_id, SESSION_LIFETIME],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    /// Resolve a session id to its user. Expired or unknown ids are `None`.
    pub fn session_user(&self, session_id: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT u.id, u.username, u.email, u.password, u.image_url,
                        u.header_image_url, u.bio, u.location, u.created_at
                 FROM sessions s
                 JOIN users u ON s.user_id = u.id
                 WHERE s.id = ?1 AND s.expires_at > datetime('now')",
            )?;
            Ok(stmt.query_row([session_id], user_from_row).optional()?)
        })
    }

    pub fn delete_session(&self, session_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM sessions WHERE id = ?1", [session_id])?;
            Ok(())
        })
    }

    // -- Follows --

    /// Add a directed edge. Already-present edges are a no-op.
    pub fn follow(&self, follower_id: &str, followed_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT OR IGNORE INTO follows (follower_id, followed_id) VALUES (?1, ?2)",
                [follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    pub fn unfollow(&self, follower_id: &str, followed_id: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "DELETE FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                [follower_id, followed_id],
            )?;
            Ok(())
        })
    }

    /// Does `follower_id` follow `followed_id`? Checks that direction only.
    pub fn is_following(&self, follower_id: &str, followed_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let hit = conn
                .query_row(
                    "SELECT 1 FROM follows WHERE follower_id = ?1 AND followed_id = ?2",
                    [follower_id, followed_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(hit.is_some())
        })
    }

    /// Is `user_id` followed by `other_id`? The reverse edge is never
    /// consulted.
    pub fn is_followed_by(&self, user_id: &str, other_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let hit = conn
                .query_row(
                    "SELECT 1 FROM follows WHERE follower_id = ?2 AND followed_id = ?1",
                    [user_id, other_id],
                    |_| Ok(()),
                )
                .optional()?;
            Ok(hit.is_some())
        })
    }

    /// Users that `user_id` follows.
    pub fn following_of(&self, user_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
                 ORDER BY username"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Users following `user_id`.
    pub fn followers_of(&self, user_id: &str) -> Result<Vec<UserRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {USER_COLUMNS} FROM users
                 WHERE id IN (SELECT follower_id FROM follows WHERE followed_id = ?1)
                 ORDER BY username"
            ))?;
            let rows = stmt
                .query_map([user_id], user_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Likes --

    /// Toggle a like edge: removes it if present, inserts it if not.
    /// Returns true when the message is now liked.
    pub fn toggle_like(&self, user_id: &str, message_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let existing = conn
                .query_row(
                    "SELECT 1 FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [user_id, message_id],
                    |_| Ok(()),
                )
                .optional()?;

            if existing.is_some() {
                conn.execute(
                    "DELETE FROM likes WHERE user_id = ?1 AND message_id = ?2",
                    [user_id, message_id],
                )?;
                Ok(false)
            } else {
                conn.execute(
                    "INSERT INTO likes (user_id, message_id) VALUES (?1, ?2)",
                    [user_id, message_id],
                )?;
                Ok(true)
            }
        })
    }

    /// Ids of every message `user_id` has liked, for rendering like state.
    pub fn liked_message_ids(&self, user_id: &str) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare("SELECT message_id FROM likes WHERE user_id = ?1")?;
            let ids = stmt
                .query_map([user_id], |row| row.get(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    /// Messages `user_id` has liked, most recently liked first.
    pub fn liked_messages(&self, user_id: &str) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.text, m.timestamp, m.user_id, u.username
                 FROM likes l
                 JOIN messages m ON l.message_id = m.id
                 LEFT JOIN users u ON m.user_id = u.id
                 WHERE l.user_id = ?1
                 ORDER BY l.created_at DESC, l.rowid DESC",
            )?;
            let rows = stmt
                .query_map([user_id], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    // -- Messages --

    /// Insert a warble. The 140-char bound lives in the schema, so an
    /// over-long text comes back as `StoreError::CheckViolation`.
    pub fn insert_message(&self, user_id: &str, text: &str) -> Result<MessageRow> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages (id, text, user_id) VALUES (?1, ?2, ?3)",
                rusqlite::params![id, text, user_id],
            )
            .map_err(StoreError::from_sqlite)?;

            query_message_by_id(conn, &id)?.ok_or(StoreError::NotFound)
        })
    }

    pub fn get_message(&self, id: &str) -> Result<Option<MessageRow>> {
        self.with_conn(|conn| query_message_by_id(conn, id))
    }

    /// Delete a message and its like edges in one transaction. Ownership is
    /// the caller's concern.
    pub fn delete_message(&self, id: &str) -> Result<()> {
        self.with_conn_mut(|conn| {
            let tx = conn.transaction()?;
            tx.execute("DELETE FROM likes WHERE message_id = ?1", [id])?;
            let deleted = tx.execute("DELETE FROM messages WHERE id = ?1", [id])?;
            if deleted == 0 {
                return Err(StoreError::NotFound);
            }
            tx.commit()?;
            Ok(())
        })
    }

    pub fn messages_for_user(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.text, m.timestamp, m.user_id, u.username
                 FROM messages m
                 LEFT JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                 ORDER BY m.timestamp DESC, m.rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// The home timeline: the user's own warbles plus those of everyone
    /// they follow, newest first.
    pub fn timeline(&self, user_id: &str, limit: u32) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT m.id, m.text, m.timestamp, m.user_id, u.username
                 FROM messages m
                 LEFT JOIN users u ON m.user_id = u.id
                 WHERE m.user_id = ?1
                    OR m.user_id IN (SELECT followed_id FROM follows WHERE follower_id = ?1)
                 ORDER BY m.timestamp DESC, m.rowid DESC
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(rusqlite::params![user_id, limit], message_from_row)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }
}

fn query_user_by_id(conn: &Connection, id: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    Ok(stmt.query_row([id], user_from_row).optional()?)
}

fn query_message_by_id(conn: &Connection, id: &str) -> Result<Option<MessageRow>> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.text, m.timestamp, m.user_id, u.username
         FROM messages m
         LEFT JOIN users u ON m.user_id = u.id
         WHERE m.id = ?1",
    )?;
    Ok(stmt.query_row([id], message_from_row).optional()?)
}

fn user_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<UserRow> {
    Ok(UserRow {
        id: row.get(0)?,
        username: row.get(1)?,
        email: row.get(2)?,
        password: row.get(3)?,
        image_url: row.get(4)?,
        header_image_url: row.get(5)?,
        bio: row.get(6)?,
        location: row.get(7)?,
        created_at: row.get(8)?,
    })
}

fn message_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        text: row.get(1)?,
        timestamp: row.get(2)?,
        user_id: row.get(3)?,
        author_username: row
            .get::<_, Option<String>>(4)?
            .unwrap_or_else(|| "unknown".to_string()),
    })
}
