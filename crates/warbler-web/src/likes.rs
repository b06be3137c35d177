use axum::{
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::info;
use uuid::Uuid;

use crate::session::Actor;
use crate::{AppState, WebError, WebResult};

/// Toggle the (actor, message) like edge: like if absent, unlike if
/// present. Never a duplicate edge.
pub async fn add_like(
    State(state): State<AppState>,
    actor: Actor,
    Path(message_id): Path<Uuid>,
) -> WebResult<Response> {
    let message = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(WebError::NotFound)?;

    let liked = state
        .db
        .toggle_like(&actor.user.id.to_string(), &message.id)?;

    if liked {
        info!("@{} liked message {}", actor.user.username, message.id);
    } else {
        info!("@{} unliked message {}", actor.user.username, message.id);
    }

    Ok(Redirect::to("/").into_response())
}
