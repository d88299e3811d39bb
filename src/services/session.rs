//! Cookie sessions backed by Redis.
//!
//! The browser only holds an opaque id in the `fd_session` cookie. The auth
//! tokens live in Redis and are refreshed here when they expire.

use super::auth::{AuthClient, AuthSession, AuthUser};
use crate::db::DbClient;
use crate::Result;
use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    response::Redirect,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::convert::Infallible;
use tracing::{info, warn};

pub const SESSION_COOKIE: &str = "fd_session";

/// Access tokens this close to expiry are refreshed before use
const REFRESH_LEEWAY_SECS: i64 = 30;

/// How long sessions live, shared by the cookie and the Redis entry
#[derive(Debug, Clone, Copy)]
pub struct SessionSettings {
    pub ttl_secs: u64,
}

/// A session resolved from the request cookie
#[derive(Debug, Clone)]
pub struct SignedIn {
    pub session: AuthSession,
}

impl SignedIn {
    pub fn user(&self) -> &AuthUser {
        &self.session.user
    }
}

/// The signed-in user, if any
pub struct MaybeUser(pub Option<SignedIn>);

/// The signed-in user; anonymous requests are redirected to `/login`
pub struct RequireUser(pub SignedIn);

fn session_cookie(id: String, ttl_secs: u64) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, id)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::seconds(ttl_secs as i64))
        .finish()
}

/// Stores `session` under a fresh id and sets the cookie pointing at it
pub async fn start_session(
    db: &DbClient,
    settings: SessionSettings,
    jar: CookieJar,
    session: &AuthSession,
) -> Result<CookieJar> {
    let id = uuid::Uuid::new_v4().to_string();
    db.save_session(&id, session, settings.ttl_secs).await?;
    info!("Started session for user {}", session.user.id);
    Ok(jar.add(session_cookie(id, settings.ttl_secs)))
}

/// Drops the stored session and clears the cookie
pub async fn end_session(db: &DbClient, jar: CookieJar) -> CookieJar {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Err(err) = db.delete_session(cookie.value()).await {
            warn!("Failed to delete session: {}", err);
        }
    }
    jar.remove(Cookie::build(SESSION_COOKIE, "").path("/").finish())
}

/// Loads the session named by the cookie, refreshing expired tokens
async fn resolve_session(
    headers: &axum::http::HeaderMap,
    db: &DbClient,
    auth: &AuthClient,
    settings: SessionSettings,
) -> Option<SignedIn> {
    let jar = CookieJar::from_headers(headers);
    let id = jar.get(SESSION_COOKIE)?.value().to_string();
    if id.is_empty() {
        return None;
    }

    let session = match db.load_session(&id).await {
        Ok(Some(session)) => session,
        Ok(None) => return None,
        Err(err) => {
            warn!("Session lookup failed: {}", err);
            return None;
        }
    };

    if !session.is_expired(REFRESH_LEEWAY_SECS) {
        return Some(SignedIn { session });
    }

    match auth.refresh_session(&session.refresh_token).await {
        Ok(fresh) => {
            if let Err(err) = db.save_session(&id, &fresh, settings.ttl_secs).await {
                warn!("Failed to store refreshed session: {}", err);
            }
            Some(SignedIn { session: fresh })
        }
        Err(err) => {
            info!("Session refresh rejected, signing out: {}", err);
            let _ = db.delete_session(&id).await;
            None
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeUser
where
    S: Send + Sync,
    DbClient: FromRef<S>,
    AuthClient: FromRef<S>,
    SessionSettings: FromRef<S>,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let db = DbClient::from_ref(state);
        let auth = AuthClient::from_ref(state);
        let settings = SessionSettings::from_ref(state);
        Ok(MaybeUser(
            resolve_session(&parts.headers, &db, &auth, settings).await,
        ))
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for RequireUser
where
    S: Send + Sync,
    DbClient: FromRef<S>,
    AuthClient: FromRef<S>,
    SessionSettings: FromRef<S>,
{
    type Rejection = Redirect;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let MaybeUser(user) = MaybeUser::from_request_parts(parts, state)
            .await
            .unwrap_or(MaybeUser(None));
        match user {
            Some(signed_in) => Ok(RequireUser(signed_in)),
            None => {
                let next = parts.uri.path();
                let target = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("next", next)
                    .finish();
                Err(Redirect::to(&format!("/login?{target}")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderMap;

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie("abc".to_string(), 3600);
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), "abc");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.max_age(), Some(time::Duration::seconds(3600)));
    }

    #[tokio::test]
    async fn test_no_cookie_means_anonymous() {
        let db = DbClient::new("postgres://nobody@127.0.0.1:1/none", "redis://127.0.0.1:1");
        let auth = AuthClient::new("http://127.0.0.1:1", "anon");
        let settings = SessionSettings { ttl_secs: 60 };
        let resolved = resolve_session(&HeaderMap::new(), &db, &auth, settings).await;
        assert!(resolved.is_none());
    }
}
