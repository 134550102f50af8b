// Server-side sessions keyed by a random cookie value

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "feed_session";

/// Maps session ids to logged-in user ids. Sessions live for the process lifetime.
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<Uuid, i64>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self, user_id: i64) -> Uuid {
        let session_id = Uuid::new_v4();
        self.sessions.write().await.insert(session_id, user_id);
        session_id
    }

    pub async fn get(&self, session_id: &Uuid) -> Option<i64> {
        self.sessions.read().await.get(session_id).copied()
    }

    pub async fn remove(&self, session_id: &Uuid) -> Option<i64> {
        self.sessions.write().await.remove(session_id)
    }
}

/// The session id carried by the request's cookies, if any.
pub fn session_id_from_jar(jar: &CookieJar) -> Option<Uuid> {
    jar.get(SESSION_COOKIE)
        .and_then(|cookie| Uuid::parse_str(cookie.value()).ok())
}

pub fn session_cookie(session_id: Uuid) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, session_id.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// Cookie matching the session cookie's path, for `CookieJar::remove`.
pub fn session_cookie_for_removal() -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE).path("/").build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::COOKIE, HeaderMap, HeaderValue};

    #[tokio::test]
    async fn test_create_get_remove() {
        let store = SessionStore::new();
        let session_id = store.create(7).await;

        assert_eq!(store.get(&session_id).await, Some(7));
        assert_eq!(store.remove(&session_id).await, Some(7));
        assert_eq!(store.get(&session_id).await, None);
    }

    #[test]
    fn test_session_id_from_cookie_header() {
        let session_id = Uuid::new_v4();
        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_str(&format!("theme=dark; {}={}", SESSION_COOKIE, session_id)).unwrap(),
        );

        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_id_from_jar(&jar), Some(session_id));
    }

    #[test]
    fn test_garbage_cookie_is_ignored() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("feed_session=not-a-uuid"));
        assert_eq!(session_id_from_jar(&CookieJar::from_headers(&headers)), None);
        assert_eq!(session_id_from_jar(&CookieJar::new()), None);
    }

    #[test]
    fn test_session_cookie_attributes() {
        let cookie = session_cookie(Uuid::nil());
        assert_eq!(cookie.name(), SESSION_COOKIE);
        assert_eq!(cookie.value(), Uuid::nil().to_string());
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }
}
