use axum::{extract::State, response::Html};

use crate::{app_state::AppState, error::AppResult, infrastructure::middleware::Vc};

/// GET /
pub async fn index(State(state): State<AppState>, vc: Vc) -> AppResult<Html<String>> {
    let user = vc.require_user()?;
    let posts = state.feed.feed()?;
    state.views.feed_page(&user.username, &posts)
}
