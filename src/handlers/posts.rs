use axum::{
    extract::{Path, State},
    response::{Html, Redirect},
    Form,
};
use serde::Deserialize;

use super::POST_NOT_FOUND;
use crate::{
    app_state::AppState,
    error::{AppError, AppResult},
    infrastructure::middleware::Vc,
};

#[derive(Debug, Deserialize)]
pub struct CreatePostForm {
    pub content: String,
}

/// GET /create_post
pub async fn create_post_form(State(state): State<AppState>, vc: Vc) -> AppResult<Html<String>> {
    vc.require_user()?;
    state.views.create_post_page()
}

/// POST /create_post
pub async fn create_post(
    State(state): State<AppState>,
    vc: Vc,
    Form(form): Form<CreatePostForm>,
) -> AppResult<Redirect> {
    let user = vc.require_user()?;
    state.feed.create_post(user, &form.content).await?;
    Ok(Redirect::to("/"))
}

/// POST /like_post/{post_id}
pub async fn like_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<i64>,
) -> AppResult<Redirect> {
    let user = vc.require_user()?;
    state.feed.toggle_like(post_id, user.user_id).await?;
    Ok(Redirect::to(&format!("/post/{}", post_id)))
}

/// POST /retweet/{post_id}
pub async fn retweet(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<i64>,
) -> AppResult<Redirect> {
    let user = vc.require_user()?;
    // A missing original is not reported to the caller
    state.feed.retweet(post_id, user).await?;
    Ok(Redirect::to("/"))
}

/// GET /post/{post_id}
pub async fn view_post(
    State(state): State<AppState>,
    vc: Vc,
    Path(post_id): Path<i64>,
) -> AppResult<Html<String>> {
    let user = vc.require_user()?;
    match state.feed.post_detail(post_id, user.user_id)? {
        Some(post) => state.views.post_page(&post),
        None => Err(AppError::NotFound(POST_NOT_FOUND.to_string())),
    }
}
