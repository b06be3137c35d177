use std::collections::HashSet;

use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use warbler_db::StoreError;
use warbler_db::models::{DEFAULT_HEADER_IMAGE_URL, DEFAULT_IMAGE_URL};
use warbler_types::forms::{FieldErrors, UserEditForm};
use warbler_types::models::{Message, User};

use crate::flash::{self, Flash, IncomingFlash};
use crate::session::{self, Actor, MaybeActor};
use crate::view;
use crate::{AppState, WebError, WebResult, blank_to_none, duplicate_message, pages};

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn list_users(
    State(state): State<AppState>,
    actor: MaybeActor,
    flash: IncomingFlash,
    Query(query): Query<SearchQuery>,
) -> WebResult<Response> {
    let rows = state.db.list_users(query.q.as_deref())?;
    let users: Vec<User> = rows.into_iter().map(view::user_view).collect();

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::users_index(&users, query.q.as_deref(), actor.user(), flash.as_ref()),
    )
        .into_response())
}

pub async fn show_user(
    State(state): State<AppState>,
    actor: MaybeActor,
    flash: IncomingFlash,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let user = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;
    let user = view::user_view(user);

    let rows = state.db.messages_for_user(&user_id.to_string(), 100)?;
    let messages: Vec<Message> = rows.into_iter().map(view::message_view).collect();
    let stats = state.db.user_stats(&user_id.to_string())?;

    let (viewer_follows, liked) = match actor.user() {
        Some(viewer) => {
            let viewer_id = viewer.id.to_string();
            let follows = state.db.is_following(&viewer_id, &user_id.to_string())?;
            let liked: HashSet<Uuid> = state
                .db
                .liked_message_ids(&viewer_id)?
                .iter()
                .filter_map(|id| id.parse().ok())
                .collect();
            (follows, Some(liked))
        }
        None => (false, None),
    };

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::user_detail(
            &user,
            &messages,
            &stats,
            actor.user(),
            viewer_follows,
            liked.as_ref(),
            flash.as_ref(),
        ),
    )
        .into_response())
}

pub async fn show_following(
    State(state): State<AppState>,
    actor: Actor,
    flash: IncomingFlash,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let owner = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;
    let owner = view::user_view(owner);

    let rows = state.db.following_of(&user_id.to_string())?;
    let following: Vec<User> = rows.into_iter().map(view::user_view).collect();

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::follow_list("Following", &owner, &following, &actor.user, flash.as_ref()),
    )
        .into_response())
}

pub async fn show_followers(
    State(state): State<AppState>,
    actor: Actor,
    flash: IncomingFlash,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let owner = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;
    let owner = view::user_view(owner);

    let rows = state.db.followers_of(&user_id.to_string())?;
    let followers: Vec<User> = rows.into_iter().map(view::user_view).collect();

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::follow_list("Followers", &owner, &followers, &actor.user, flash.as_ref()),
    )
        .into_response())
}

pub async fn show_likes(
    State(state): State<AppState>,
    actor: Actor,
    flash: IncomingFlash,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let owner = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;
    let owner = view::user_view(owner);

    let rows = state.db.liked_messages(&user_id.to_string())?;
    let messages: Vec<Message> = rows.into_iter().map(view::message_view).collect();

    let (jar, flash) = flash.take();
    Ok((
        jar,
        pages::likes_page(&owner, &messages, &actor.user, flash.as_ref()),
    )
        .into_response())
}

pub async fn follow(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let target = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;

    state.db.follow(&actor.user.id.to_string(), &target.id)?;
    info!("@{} followed @{}", actor.user.username, target.username);

    Ok(Redirect::to(&format!("/users/{}/following", actor.user.id)).into_response())
}

pub async fn stop_following(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<Uuid>,
) -> WebResult<Response> {
    let target = state
        .db
        .get_user_by_id(&user_id.to_string())?
        .ok_or(WebError::NotFound)?;

    state.db.unfollow(&actor.user.id.to_string(), &target.id)?;
    info!("@{} unfollowed @{}", actor.user.username, target.username);

    Ok(Redirect::to(&format!("/users/{}/following", actor.user.id)).into_response())
}

pub async fn edit_profile_page(actor: Actor, flash: IncomingFlash) -> Response {
    let form = edit_form_for(&actor.user);
    let (jar, flash) = flash.take();
    (
        jar,
        pages::edit_profile_page(&form, &FieldErrors::default(), &actor.user, flash.as_ref()),
    )
        .into_response()
}

/// Apply a profile edit after re-verifying the actor's password. A wrong
/// password is an authorization failure: uniform flash, row untouched.
pub async fn edit_profile(
    State(state): State<AppState>,
    actor: Actor,
    Form(form): Form<UserEditForm>,
) -> WebResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(pages::edit_profile_page(&form, &errors, &actor.user, None).into_response());
    }

    if state
        .db
        .authenticate(&actor.user.username, &form.password)?
        .is_none()
    {
        return Ok(flash::unauthorized_redirect());
    }

    let username = or_current(&form.username, &actor.user.username);
    let email = or_current(&form.email, &actor.user.email);
    let image_url = or_default(&form.image_url, DEFAULT_IMAGE_URL);
    let header_image_url = or_default(&form.header_image_url, DEFAULT_HEADER_IMAGE_URL);

    let updated = state.db.update_user(
        &actor.user.id.to_string(),
        username,
        email,
        image_url,
        header_image_url,
        blank_to_none(&form.bio),
        blank_to_none(&form.location),
    );

    match updated {
        Ok(()) => {
            info!("@{} updated their profile", actor.user.username);
            Ok(flash::redirect_with_flash(
                &format!("/users/{}", actor.user.id),
                Flash::success("User Updated!"),
            ))
        }
        Err(StoreError::Duplicate { column }) => {
            let mut errors = FieldErrors::default();
            errors.push(column, duplicate_message(column));
            Ok(pages::edit_profile_page(&form, &errors, &actor.user, None).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

/// Delete the actor's account and everything hanging off it.
pub async fn delete_user(
    State(state): State<AppState>,
    actor: Actor,
    jar: CookieJar,
) -> WebResult<Response> {
    state.db.delete_user(&actor.user.id.to_string())?;
    info!("account @{} deleted", actor.user.username);

    let jar = jar.remove(session::clear_session_cookie());
    Ok((jar, Redirect::to("/signup")).into_response())
}

fn edit_form_for(user: &User) -> UserEditForm {
    UserEditForm {
        username: user.username.clone(),
        email: user.email.clone(),
        image_url: user.image_url.clone(),
        header_image_url: user.header_image_url.clone(),
        bio: user.bio.clone().unwrap_or_default(),
        location: user.location.clone().unwrap_or_default(),
        password: String::new(),
    }
}

fn or_current<'a>(value: &'a str, current: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { current } else { trimmed }
}

fn or_default<'a>(value: &'a str, default: &'a str) -> &'a str {
    let trimmed = value.trim();
    if trimmed.is_empty() { default } else { trimmed }
}
