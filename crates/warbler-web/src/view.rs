//! Row → view-model conversion, tolerant of odd stored values.

use tracing::warn;
use uuid::Uuid;

use warbler_db::models::{MessageRow, UserRow};
use warbler_types::models::{Message, User};

pub fn user_view(row: UserRow) -> User {
    User {
        id: parse_id(&row.id, "user"),
        username: row.username,
        email: row.email,
        image_url: row.image_url,
        header_image_url: row.header_image_url,
        bio: row.bio,
        location: row.location,
        created_at: parse_timestamp(&row.created_at),
    }
}

pub fn message_view(row: MessageRow) -> Message {
    Message {
        id: parse_id(&row.id, "message"),
        text: row.text,
        timestamp: parse_timestamp(&row.timestamp),
        user_id: parse_id(&row.user_id, "user"),
        author_username: row.author_username,
    }
}

fn parse_id(raw: &str, kind: &str) -> Uuid {
    raw.parse().unwrap_or_else(|err| {
        warn!("corrupt {kind} id '{raw}': {err}");
        Uuid::default()
    })
}

fn parse_timestamp(raw: &str) -> chrono::DateTime<chrono::Utc> {
    raw.parse::<chrono::DateTime<chrono::Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|err| {
            warn!("corrupt timestamp '{raw}': {err}");
            chrono::DateTime::default()
        })
}
