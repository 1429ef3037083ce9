use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::extract::CookieJar;
use hyper::{header::AUTHORIZATION, HeaderMap};
use tracing::warn;

use crate::{models::user::User, store::Store, utils::app_error::AppError};

pub const SESSION_COOKIE: &str = "session";

/// The requester, `None` for anonymous requests.
///
/// The token is read from `Authorization: Bearer <token>` (or `Token <token>`),
/// falling back to the url-encoded `session` cookie. A token that matches no
/// user rejects the request.
pub struct AuthUser(pub Option<Arc<User>>);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    Arc<dyn Store>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = request_token(&parts.headers) else {
            return Ok(AuthUser(None));
        };
        let store = <Arc<dyn Store> as FromRef<S>>::from_ref(state);
        match store.user_by_token(&token).await {
            Ok(Some(user)) => Ok(AuthUser(Some(Arc::new(user)))),
            Ok(None) => {
                warn!("No user matches the provided token");
                Err(AppError::invalid_token_error())
            }
            Err(e) => {
                warn!("Error getting auth user from store : {e}");
                Err(AppError::internal_server_error())
            }
        }
    }
}

fn request_token(headers: &HeaderMap) -> Option<String> {
    if let Some(authorization) = headers.get(AUTHORIZATION) {
        let authorization = authorization.to_str().ok()?;
        let (scheme, token) = authorization.split_once(' ')?;
        let token = token.trim();
        if !matches!(scheme, "Bearer" | "Token") || token.is_empty() {
            warn!("Unsupported authorization scheme `{scheme}`");
            return None;
        }
        return Some(token.to_string());
    }

    let cookies = CookieJar::from_headers(headers);
    let token = cookies.get(SESSION_COOKIE)?.value();
    match urlencoding::decode(token) {
        Ok(token) => Some(token.into_owned()),
        Err(e) => {
            warn!("{e}");
            None
        }
    }
}
