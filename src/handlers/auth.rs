use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::info;

use crate::{
    app_state::AppState,
    error::AppResult,
    infrastructure::{
        middleware::Vc,
        session_store::{session_cookie, session_cookie_for_removal},
    },
};

pub const LOGIN_FAILED: &str = "Invalid username or password";

#[derive(Debug, Deserialize)]
pub struct CredentialsForm {
    pub username: String,
    pub password: String,
}

/// GET /auth/register
pub async fn register_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.views.register_page()
}

/// POST /auth/register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Redirect> {
    state.auth.register(&form.username, &form.password).await?;
    Ok(Redirect::to("/auth/login"))
}

/// GET /auth/login
pub async fn login_form(State(state): State<AppState>) -> AppResult<Html<String>> {
    state.views.login_page(None)
}

/// POST /auth/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<CredentialsForm>,
) -> AppResult<Response> {
    let Some(user) = state.auth.authenticate(&form.username, &form.password)? else {
        // Same message for unknown user and wrong password
        return Ok(state.views.login_page(Some(LOGIN_FAILED))?.into_response());
    };

    let session_id = state.sessions.create(user.user_id).await;
    info!("User {} logged in", user.user_id);
    Ok((jar.add(session_cookie(session_id)), Redirect::to("/")).into_response())
}

/// GET /auth/logout
pub async fn logout(State(state): State<AppState>, vc: Vc, jar: CookieJar) -> Response {
    if let Some(session_id) = vc.session_id {
        if let Some(user_id) = state.sessions.remove(&session_id).await {
            info!("User {} logged out", user_id);
        }
    }
    (jar.remove(session_cookie_for_removal()), Redirect::to("/")).into_response()
}
