//! One-shot notices surfaced on the next rendered page, set alongside a
//! redirect and cleared once shown. The cookie carries a base64-encoded
//! JSON pair so the message text never fights cookie value syntax.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as B64;
use serde::{Deserialize, Serialize};

pub const FLASH_COOKIE: &str = "warbler_flash";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flash {
    pub category: String,
    pub message: String,
}

impl Flash {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            category: "success".into(),
            message: message.into(),
        }
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self {
            category: "danger".into(),
            message: message.into(),
        }
    }

    pub fn cookie(&self) -> Cookie<'static> {
        let encoded = B64.encode(serde_json::to_vec(self).unwrap_or_default());
        let mut cookie = Cookie::new(FLASH_COOKIE, encoded);
        cookie.set_path("/");
        cookie.set_http_only(true);
        cookie
    }

    fn decode(raw: &str) -> Option<Self> {
        let bytes = B64.decode(raw).ok()?;
        serde_json::from_slice(&bytes).ok()
    }
}

/// The pending flash read from the request. Call [`take`](Self::take) and
/// attach the returned jar to the response so the clear reaches the browser.
pub struct IncomingFlash {
    flash: Option<Flash>,
    jar: CookieJar,
}

impl IncomingFlash {
    pub fn take(self) -> (CookieJar, Option<Flash>) {
        let jar = if self.flash.is_some() {
            self.jar
                .remove(Cookie::build((FLASH_COOKIE, "")).path("/").build())
        } else {
            self.jar
        };
        (jar, self.flash)
    }
}

impl<S> FromRequestParts<S> for IncomingFlash
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let flash = jar.get(FLASH_COOKIE).and_then(|c| Flash::decode(c.value()));
        Ok(Self { flash, jar })
    }
}

/// Redirect carrying a one-shot flash cookie.
pub fn redirect_with_flash(to: &str, flash: Flash) -> Response {
    let jar = CookieJar::new().add(flash.cookie());
    (jar, Redirect::to(to)).into_response()
}

/// The uniform response for requests that lack the rights they need:
/// flash "Access unauthorized." and send the client home, leaving
/// whatever they aimed at untouched.
pub fn unauthorized_redirect() -> Response {
    redirect_with_flash("/", Flash::danger("Access unauthorized."))
}
