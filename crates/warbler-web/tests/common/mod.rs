#![allow(dead_code)]

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, header};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use warbler_db::models::UserRow;
use warbler_web::{AppState, AppStateInner, router};

pub fn app() -> (Router, AppState) {
    let db = warbler_db::Database::open_in_memory().expect("in-memory db");
    let state: AppState = Arc::new(AppStateInner { db });
    (router(state.clone()), state)
}

pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.expect("request")
}

pub fn get(path: &str, cookies: &[String]) -> Request<Body> {
    build("GET", path, None, cookies)
}

pub fn post_form(path: &str, body: &str, cookies: &[String]) -> Request<Body> {
    build("POST", path, Some(body), cookies)
}

fn build(method: &str, path: &str, body: Option<&str>, cookies: &[String]) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if body.is_some() {
        builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
    }
    if !cookies.is_empty() {
        builder = builder.header(header::COOKIE, cookies.join("; "));
    }
    builder
        .body(match body {
            Some(body) => Body::from(body.to_string()),
            None => Body::empty(),
        })
        .expect("request")
}

pub async fn body_text(response: Response) -> String {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body")
        .to_bytes();
    String::from_utf8(bytes.to_vec()).expect("utf-8 body")
}

/// The `name=value` pair from a Set-Cookie header, usable in a Cookie header.
pub fn cookie_pair(response: &Response, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with(name))
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

/// Chase a redirect the way a browser would: carry forward the cookies the
/// response just set, plus whatever the caller was already holding.
pub async fn follow_redirect(app: &Router, response: Response, cookies: &[String]) -> Response {
    let location = response
        .headers()
        .get(header::LOCATION)
        .and_then(|v| v.to_str().ok())
        .expect("redirect location")
        .to_string();

    let mut all: Vec<String> = cookies.to_vec();
    if let Some(flash) = cookie_pair(&response, "warbler_flash") {
        all.push(flash);
    }
    if let Some(session) = cookie_pair(&response, "warbler_session") {
        all.push(session);
    }

    send(app, get(&location, &all)).await
}

pub fn seed_user(state: &AppState, username: &str, email: &str, password: &str) -> UserRow {
    state
        .db
        .signup(username, email, password, None, None, None)
        .expect("signup")
}

/// Simulate a logged-in browser: insert a session row and hand back the
/// matching Cookie header pair.
pub fn login_cookie(state: &AppState, user_id: &str) -> String {
    let session_id = state.db.create_session(user_id).expect("session");
    format!("warbler_session={session_id}")
}
