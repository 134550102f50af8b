// Request handlers, one per user action

pub mod auth;
pub mod feed;
pub mod posts;

/// Body of the 404 page for an unknown post id
pub const POST_NOT_FOUND: &str = "게시글을 찾을 수 없습니다.";
