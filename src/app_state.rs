use std::sync::Arc;

use crate::{
    config::Config,
    error::AppResult,
    infrastructure::{DataStore, SessionStore},
    services::{AuthService, FeedService},
    views::Views,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub store: Arc<DataStore>,
    pub sessions: Arc<SessionStore>,
    pub feed: FeedService,
    pub auth: AuthService,
    pub views: Views,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let store = Arc::new(DataStore::open(config.storage.data_dir.clone())?);

        Ok(Self {
            feed: FeedService::new(store.clone()),
            auth: AuthService::new(store.clone()),
            sessions: Arc::new(SessionStore::new()),
            views: Views::new()?,
            store,
            config,
        })
    }
}
