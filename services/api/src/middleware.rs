//! Session-cookie middleware
//!
//! Every API request runs under a session. The middleware reads the
//! `session_id` cookie, minting a fresh id when the cookie is absent,
//! and exposes the id to handlers through the request extensions. New
//! ids are set on the response so the browser keeps them.

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use uuid::Uuid;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "session_id";

/// Session identity resolved by the middleware
#[derive(Debug, Clone)]
pub struct SessionId(String);

impl SessionId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Resolve or mint the caller's session id
pub async fn session_middleware(jar: CookieJar, mut req: Request<Body>, next: Next) -> Response {
    let (session_id, minted) = match jar.get(SESSION_COOKIE) {
        Some(cookie) => (cookie.value().to_string(), false),
        None => (Uuid::new_v4().to_string(), true),
    };

    req.extensions_mut().insert(SessionId(session_id.clone()));
    let response = next.run(req).await;

    if minted {
        // The store expires sessions server-side, so the cookie itself
        // carries no max-age.
        let cookie = Cookie::build((SESSION_COOKIE, session_id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .build();
        (jar.add(cookie), response).into_response()
    } else {
        response
    }
}
