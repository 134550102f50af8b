use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{fields, Record, RecordKind};

/// A post or a retweet. `original_post_id` is set exactly when `is_retweet` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub post_id: i64,
    pub user_id: i64,
    pub content: String,
    #[serde(
        serialize_with = "fields::serialize_timestamp",
        deserialize_with = "fields::deserialize_timestamp"
    )]
    pub timestamp: NaiveDateTime,
    #[serde(deserialize_with = "fields::deserialize_flag")]
    pub is_retweet: bool,
    #[serde(default, deserialize_with = "fields::deserialize_optional_id")]
    pub original_post_id: Option<i64>,
}

impl Post {
    pub fn new(post_id: i64, user_id: i64, content: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            post_id,
            user_id,
            content: content.into(),
            timestamp,
            is_retweet: false,
            original_post_id: None,
        }
    }

    /// Builds the retweet of `original` by `user_id`, quoting the original author.
    pub fn retweet(
        post_id: i64,
        user_id: i64,
        original: &Post,
        original_username: &str,
        timestamp: NaiveDateTime,
    ) -> Self {
        Self {
            post_id,
            user_id,
            content: retweet_content(original_username, &original.content),
            timestamp,
            is_retweet: true,
            original_post_id: Some(original.post_id),
        }
    }
}

pub fn retweet_content(original_username: &str, original_content: &str) -> String {
    format!("RT @{}: {}", original_username, original_content)
}

impl Record for Post {
    const KIND: RecordKind = RecordKind::Post;
    const FILE_NAME: &'static str = "posts.csv";
    const HEADERS: &'static [&'static str] = &[
        "post_id",
        "user_id",
        "content",
        "timestamp",
        "is_retweet",
        "original_post_id",
    ];

    fn id(&self) -> i64 {
        self.post_id
    }
}
