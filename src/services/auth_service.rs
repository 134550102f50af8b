// AuthService - registration and plaintext credential checks

use std::sync::Arc;
use tracing::info;

use crate::{error::AppResult, infrastructure::DataStore, models::User};

#[derive(Clone)]
pub struct AuthService {
    store: Arc<DataStore>,
}

impl AuthService {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    /// Create a user. Usernames are not checked for uniqueness.
    pub async fn register(&self, username: &str, password: &str) -> AppResult<User> {
        let user = self
            .store
            .update::<User, _, _>(|users, next_id| {
                let user = User::new(next_id, username, password);
                users.push(user.clone());
                user
            })
            .await?;

        info!("Registered user {} ({})", user.user_id, user.username);
        Ok(user)
    }

    /// The first user whose username and password both match exactly.
    pub fn authenticate(&self, username: &str, password: &str) -> AppResult<Option<User>> {
        let users: Vec<User> = self.store.load()?;
        Ok(users
            .into_iter()
            .find(|u| u.matches_credentials(username, password)))
    }
}
