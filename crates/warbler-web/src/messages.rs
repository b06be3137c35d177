use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use tracing::{info, warn};
use uuid::Uuid;

use warbler_db::StoreError;
use warbler_types::forms::{FieldErrors, MESSAGE_MAX_LEN, MessageForm};

use crate::flash::{self, IncomingFlash};
use crate::session::{Actor, MaybeActor};
use crate::view;
use crate::{AppState, WebError, WebResult, pages};

pub async fn new_message_page(actor: Actor, flash: IncomingFlash) -> Response {
    let (jar, flash) = flash.take();
    (
        jar,
        pages::new_message_page(
            &MessageForm::default(),
            &FieldErrors::default(),
            &actor.user,
            flash.as_ref(),
        ),
    )
        .into_response()
}

/// Post a warble. The actor becomes the owner; the storage layer rejects
/// text over the limit and that comes back as a form error.
pub async fn new_message(
    State(state): State<AppState>,
    actor: Actor,
    Form(form): Form<MessageForm>,
) -> WebResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(pages::new_message_page(&form, &errors, &actor.user, None).into_response());
    }

    match state
        .db
        .insert_message(&actor.user.id.to_string(), form.text.trim())
    {
        Ok(message) => {
            info!("@{} posted message {}", actor.user.username, message.id);
            Ok(Redirect::to(&format!("/users/{}", actor.user.id)).into_response())
        }
        Err(StoreError::CheckViolation) => {
            let mut errors = FieldErrors::default();
            errors.push(
                "text",
                format!("Message must be {MESSAGE_MAX_LEN} characters or fewer."),
            );
            Ok(pages::new_message_page(&form, &errors, &actor.user, None).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn show_message(
    State(state): State<AppState>,
    actor: MaybeActor,
    flash: IncomingFlash,
    Path(message_id): Path<Uuid>,
) -> WebResult<Response> {
    let message = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(WebError::NotFound)?;
    let message = view::message_view(message);

    let viewer_liked = match actor.user() {
        Some(viewer) => state
            .db
            .liked_message_ids(&viewer.id.to_string())?
            .contains(&message_id.to_string()),
        None => false,
    };

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::message_detail(&message, actor.user(), viewer_liked, flash.as_ref()),
    )
        .into_response())
}

/// Only the owner may delete a message; anyone else gets the uniform
/// unauthorized outcome and the row stays put.
pub async fn delete_message(
    State(state): State<AppState>,
    actor: Actor,
    Path(message_id): Path<Uuid>,
) -> WebResult<Response> {
    let message = state
        .db
        .get_message(&message_id.to_string())?
        .ok_or(WebError::NotFound)?;

    if message.user_id != actor.user.id.to_string() {
        warn!(
            "@{} tried to delete message {} they do not own",
            actor.user.username, message.id
        );
        return Ok(flash::unauthorized_redirect());
    }

    state.db.delete_message(&message.id)?;
    info!("@{} deleted message {}", actor.user.username, message.id);

    Ok(Redirect::to(&format!("/users/{}", actor.user.id)).into_response())
}
