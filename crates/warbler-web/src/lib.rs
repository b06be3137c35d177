pub mod auth;
pub mod error;
pub mod flash;
pub mod likes;
pub mod messages;
pub mod pages;
pub mod session;
pub mod users;
pub mod view;

use std::collections::HashSet;
use std::sync::Arc;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::error;
use uuid::Uuid;

pub use error::{WebError, WebResult};

use flash::IncomingFlash;
use session::MaybeActor;
use warbler_db::{Database, StoreError};
use warbler_types::models::Message;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
}

/// Build the application router with all routes.
pub fn router(state: AppState) -> Router {
    Router::new()
        // Home and auth
        .route("/", get(home))
        .route("/signup", get(auth::signup_page).post(auth::signup))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
        // Users
        .route("/users", get(users::list_users))
        .route("/users/{user_id}", get(users::show_user))
        .route("/users/{user_id}/following", get(users::show_following))
        .route("/users/{user_id}/followers", get(users::show_followers))
        .route("/users/{user_id}/likes", get(users::show_likes))
        .route("/users/follow/{user_id}", post(users::follow))
        .route("/users/stop-following/{user_id}", post(users::stop_following))
        .route(
            "/users/profile",
            get(users::edit_profile_page).post(users::edit_profile),
        )
        .route("/users/delete", post(users::delete_user))
        .route("/users/add_like/{message_id}", post(likes::add_like))
        // Messages
        .route(
            "/messages/new",
            get(messages::new_message_page).post(messages::new_message),
        )
        .route("/messages/{message_id}", get(messages::show_message))
        .route("/messages/{message_id}/delete", post(messages::delete_message))
        // Static files
        .nest_service("/static", ServeDir::new("static"))
        .fallback(not_found)
        // Add trace layer for debugging
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Homepage: anonymous hero, or the timeline of the actor plus everyone
/// they follow.
async fn home(
    State(state): State<AppState>,
    actor: MaybeActor,
    flash: IncomingFlash,
) -> WebResult<Response> {
    let (jar, flash) = flash.take();

    let Some(actor) = actor.0 else {
        return Ok((jar, pages::home_anon(flash.as_ref())).into_response());
    };

    // Run the bulky timeline reads off the async runtime
    let db = state.clone();
    let user_id = actor.user.id.to_string();
    let (rows, liked_ids) = tokio::task::spawn_blocking(move || {
        let rows = db.db.timeline(&user_id, 100)?;
        let liked_ids = db.db.liked_message_ids(&user_id)?;
        Ok::<_, StoreError>((rows, liked_ids))
    })
    .await
    .map_err(|err| {
        error!("spawn_blocking join error: {err}");
        WebError::Blocking(err.to_string())
    })??;

    let messages: Vec<Message> = rows.into_iter().map(view::message_view).collect();
    let liked: HashSet<Uuid> = liked_ids.iter().filter_map(|id| id.parse().ok()).collect();

    Ok((
        jar,
        pages::home_timeline(&actor.user, &messages, &liked, flash.as_ref()),
    )
        .into_response())
}

async fn not_found(actor: MaybeActor) -> Response {
    (StatusCode::NOT_FOUND, pages::not_found_page(actor.user())).into_response()
}

pub(crate) fn blank_to_none(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

pub(crate) fn duplicate_message(column: &'static str) -> &'static str {
    match column {
        "email" => "Email already taken",
        _ => "Username already taken",
    }
}
