//! Per-request authentication context.
//!
//! The browser cookie holds only an opaque session id; the user id lives in
//! the sessions table. Handlers receive the resolved actor through one of
//! two extractors instead of consulting any shared mutable state.

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use tracing::error;

use warbler_types::models::User;

use crate::view;
use crate::{AppState, flash};

/// Cookie that carries the opaque session id.
pub const SESSION_COOKIE: &str = "warbler_session";

/// The authenticated user resolved for this request.
///
/// Extraction fails for anonymous requests with the uniform unauthorized
/// flash + redirect, before any handler code runs.
#[derive(Debug)]
pub struct Actor {
    pub user: User,
    pub session_id: String,
}

impl FromRequestParts<AppState> for Actor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_actor(parts, state) {
            Ok(Some(actor)) => Ok(actor),
            Ok(None) => Err(flash::unauthorized_redirect()),
            Err(err) => {
                error!("session lookup failed: {err}");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

/// Like [`Actor`], but anonymous requests resolve to `None` instead of
/// being rejected. For pages that render both ways.
#[derive(Debug)]
pub struct MaybeActor(pub Option<Actor>);

impl MaybeActor {
    pub fn user(&self) -> Option<&User> {
        self.0.as_ref().map(|actor| &actor.user)
    }
}

impl FromRequestParts<AppState> for MaybeActor {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match resolve_actor(parts, state) {
            Ok(actor) => Ok(MaybeActor(actor)),
            Err(err) => {
                error!("session lookup failed: {err}");
                Err(StatusCode::INTERNAL_SERVER_ERROR.into_response())
            }
        }
    }
}

fn resolve_actor(parts: &Parts, state: &AppState) -> warbler_db::Result<Option<Actor>> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(cookie) = jar.get(SESSION_COOKIE) else {
        return Ok(None);
    };
    let session_id = cookie.value().to_string();

    let Some(user) = state.db.session_user(&session_id)? else {
        return Ok(None);
    };

    Ok(Some(Actor {
        user: view::user_view(user),
        session_id,
    }))
}

pub fn session_cookie(session_id: String) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, session_id);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie
}

/// A removal cookie for the session. Only effective through a jar built
/// from the incoming request, where the original cookie is present.
pub fn clear_session_cookie() -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, "")).path("/").build()
}
