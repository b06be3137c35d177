//! Database row types — these map directly to SQLite rows.
//! Distinct from warbler-types view models to keep the DB layer independent.

/// Avatar applied at signup when the form leaves the field blank.
pub const DEFAULT_IMAGE_URL: &str = "/static/images/default-pic.png";
pub const DEFAULT_HEADER_IMAGE_URL: &str = "/static/images/warbler-hero.jpg";

#[derive(Debug)]
pub struct UserRow {
    pub id: String,
    pub username: String,
    pub email: String,
    pub password: String,
    pub image_url: String,
    pub header_image_url: String,
    pub bio: Option<String>,
    pub location: Option<String>,
    pub created_at: String,
}

#[derive(Debug)]
pub struct MessageRow {
    pub id: String,
    pub text: String,
    pub timestamp: String,
    pub user_id: String,
    pub author_username: String,
}

/// Per-profile counters shown in the sidebar.
pub struct UserStats {
    pub messages: i64,
    pub following: i64,
    pub followers: i64,
    pub likes: i64,
}
