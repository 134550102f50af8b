use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::{fields, Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub like_id: i64,
    pub post_id: i64,
    pub user_id: i64,
    #[serde(
        serialize_with = "fields::serialize_timestamp",
        deserialize_with = "fields::deserialize_timestamp"
    )]
    pub timestamp: NaiveDateTime,
}

impl Like {
    pub fn new(like_id: i64, post_id: i64, user_id: i64, timestamp: NaiveDateTime) -> Self {
        Self {
            like_id,
            post_id,
            user_id,
            timestamp,
        }
    }

    pub fn is_by(&self, post_id: i64, user_id: i64) -> bool {
        self.post_id == post_id && self.user_id == user_id
    }
}

impl Record for Like {
    const KIND: RecordKind = RecordKind::Like;
    const FILE_NAME: &'static str = "likes.csv";
    const HEADERS: &'static [&'static str] = &["like_id", "post_id", "user_id", "timestamp"];

    fn id(&self) -> i64 {
        self.like_id
    }
}
