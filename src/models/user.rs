use serde::{Deserialize, Serialize};

use super::{Record, RecordKind};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub user_id: i64,
    pub username: String,
    /// Stored and compared as plain text
    pub password: String,
}

impl User {
    pub fn new(user_id: i64, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn matches_credentials(&self, username: &str, password: &str) -> bool {
        self.username == username && self.password == password
    }
}

impl Record for User {
    const KIND: RecordKind = RecordKind::User;
    const FILE_NAME: &'static str = "users.csv";
    const HEADERS: &'static [&'static str] = &["user_id", "username", "password"];

    fn id(&self) -> i64 {
        self.user_id
    }
}
