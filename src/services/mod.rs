// Services - feed assembly and account operations above the data store

pub mod auth_service;
pub mod feed_service;

pub use auth_service::AuthService;
pub use feed_service::{FeedService, LikeToggle, PostDetail, PostSummary};
