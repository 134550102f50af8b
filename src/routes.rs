use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    app_state::AppState,
    handlers::{auth, feed, posts},
    infrastructure::middleware::viewer_context_middleware,
};

pub fn create_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", get(auth::register_form).post(auth::register))
        .route("/login", get(auth::login_form).post(auth::login))
        .route("/logout", get(auth::logout));

    Router::new()
        .route("/", get(feed::index))
        .route("/create_post", get(posts::create_post_form).post(posts::create_post))
        .route("/like_post/{post_id}", post(posts::like_post))
        .route("/retweet/{post_id}", post(posts::retweet))
        .route("/post/{post_id}", get(posts::view_post))
        .nest("/auth", auth_routes)
        // Every route, including unknown ones, passes the viewer gate
        .layer(middleware::from_fn_with_state(
            state.clone(),
            viewer_context_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
