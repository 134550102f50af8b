// ViewerContext middleware - resolves the session into a request-scoped viewer
// and redirects anonymous callers away from protected routes.

use axum::{
    extract::{OriginalUri, Request, State},
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::{
    app_state::AppState,
    error::AppResult,
    infrastructure::{session_store::session_id_from_jar, viewer::ViewerContext},
    models::User,
};

pub const LOGIN_PATH: &str = "/auth/login";

/// Routes reachable without a logged-in user
pub const PUBLIC_PATHS: &[&str] = &["/auth/register", "/auth/login", "/auth/logout"];

pub fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

pub async fn viewer_context_middleware(
    State(app_state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let session_id = session_id_from_jar(&jar);
    let viewer_context = match resolve_viewer(&app_state, session_id).await {
        Ok(vc) => vc,
        Err(e) => return e.into_response(),
    };

    // Nested routers see a stripped path, the gate matches on the full one
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.path().to_string())
        .unwrap_or_else(|| request.uri().path().to_string());

    if !viewer_context.is_authenticated() && !is_public_path(&path) {
        debug!(
            request_id = %viewer_context.request_id,
            "Anonymous request to {}, redirecting to login",
            path
        );
        return Redirect::to(LOGIN_PATH).into_response();
    }

    request.extensions_mut().insert(Arc::new(viewer_context));
    next.run(request).await
}

async fn resolve_viewer(
    app_state: &AppState,
    session_id: Option<Uuid>,
) -> AppResult<ViewerContext> {
    let request_id = format!("req-{}", Uuid::new_v4());

    let Some(session_id) = session_id else {
        return Ok(ViewerContext::anonymous(request_id, None));
    };
    let Some(user_id) = app_state.sessions.get(&session_id).await else {
        return Ok(ViewerContext::anonymous(request_id, Some(session_id)));
    };

    let users: Vec<User> = app_state.store.load()?;
    match users.into_iter().find(|u| u.user_id == user_id) {
        Some(user) => Ok(ViewerContext::authenticated_user(user, session_id, request_id)),
        None => {
            debug!("Session {} points at missing user {}", session_id, user_id);
            Ok(ViewerContext::anonymous(request_id, Some(session_id)))
        }
    }
}
