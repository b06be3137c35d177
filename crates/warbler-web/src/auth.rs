use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::info;

use warbler_db::StoreError;
use warbler_types::forms::{FieldErrors, LoginForm, SignupForm};

use crate::flash::{Flash, IncomingFlash};
use crate::session::{self, MaybeActor};
use crate::{AppState, WebResult, blank_to_none, duplicate_message, pages};

pub async fn signup_page(flash: IncomingFlash) -> Response {
    let (jar, flash) = flash.take();
    (
        jar,
        pages::signup_page(
            &SignupForm::default(),
            &FieldErrors::default(),
            flash.as_ref(),
        ),
    )
        .into_response()
}

/// Create the user, hash the password, and log the new account straight in.
pub async fn signup(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<SignupForm>,
) -> WebResult<Response> {
    let errors = form.validate();
    if !errors.is_empty() {
        return Ok(pages::signup_page(&form, &errors, None).into_response());
    }

    let created = state.db.signup(
        form.username.trim(),
        form.email.trim(),
        &form.password,
        blank_to_none(&form.image_url),
        blank_to_none(&form.location),
        blank_to_none(&form.bio),
    );

    match created {
        Ok(user) => {
            let session_id = state.db.create_session(&user.id)?;
            info!("new user @{} signed up", user.username);
            let jar = jar.add(session::session_cookie(session_id));
            Ok((jar, Redirect::to("/")).into_response())
        }
        Err(StoreError::Duplicate { column }) => {
            let mut errors = FieldErrors::default();
            errors.push(column, duplicate_message(column));
            Ok(pages::signup_page(&form, &errors, None).into_response())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn login_page(flash: IncomingFlash) -> Response {
    let (jar, flash) = flash.take();
    (
        jar,
        pages::login_page(
            &LoginForm::default(),
            &FieldErrors::default(),
            flash.as_ref(),
        ),
    )
        .into_response()
}

pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> WebResult<Response> {
    let mut errors = form.validate();

    if errors.is_empty() {
        if let Some(user) = state.db.authenticate(form.username.trim(), &form.password)? {
            let session_id = state.db.create_session(&user.id)?;
            info!("@{} logged in", user.username);
            let jar = jar
                .add(session::session_cookie(session_id))
                .add(Flash::success(format!("Hello, {}!", user.username)).cookie());
            return Ok((jar, Redirect::to("/")).into_response());
        }
        errors.push("password", "Invalid credentials.");
    }

    Ok(pages::login_page(&form, &errors, None).into_response())
}

/// Delete the server-side session and drop the cookie.
pub async fn logout(
    State(state): State<AppState>,
    actor: MaybeActor,
    jar: CookieJar,
) -> WebResult<Response> {
    let mut jar = jar;
    if let Some(actor) = actor.0 {
        state.db.delete_session(&actor.session_id)?;
        jar = jar.remove(session::clear_session_cookie());
        info!("@{} logged out", actor.user.username);
    }
    let jar = jar.add(Flash::success("You have successfully logged out.").cookie());
    Ok((jar, Redirect::to("/login")).into_response())
}
