// FeedService - joins posts with authors and likes, and performs the
// post / like / retweet mutations.

use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

use crate::{
    error::AppResult,
    infrastructure::DataStore,
    models::{self, Like, Post, User},
};

/// Shown when a post's author no longer resolves
pub const UNKNOWN_AUTHOR: &str = "unknown";
pub const DISPLAY_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// One row of the feed, ready to render.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostSummary {
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub timestamp: String,
    pub like_count: usize,
    pub is_retweet: bool,
    pub original_post_username: Option<String>,
}

/// The single-post page, including whether the viewer liked it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostDetail {
    pub post_id: i64,
    pub user_id: i64,
    pub username: String,
    pub content: String,
    pub timestamp: String,
    pub like_count: usize,
    pub is_liked: bool,
    pub is_retweet: bool,
    pub original_post_id: Option<i64>,
    pub original_post_username: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LikeToggle {
    Liked,
    Unliked,
}

/// Per-request lookup tables so every join is a map hit.
struct FeedIndex<'a> {
    usernames: HashMap<i64, &'a str>,
    like_counts: HashMap<i64, usize>,
    posts: HashMap<i64, &'a Post>,
}

impl<'a> FeedIndex<'a> {
    fn build(posts: &'a [Post], users: &'a [User], likes: &[Like]) -> Self {
        let mut usernames = HashMap::with_capacity(users.len());
        for user in users {
            // First match wins, like a front-to-back scan
            usernames.entry(user.user_id).or_insert(user.username.as_str());
        }

        let mut like_counts = HashMap::new();
        for like in likes {
            *like_counts.entry(like.post_id).or_insert(0) += 1;
        }

        let mut by_id = HashMap::with_capacity(posts.len());
        for post in posts {
            by_id.entry(post.post_id).or_insert(post);
        }

        Self {
            usernames,
            like_counts,
            posts: by_id,
        }
    }

    fn username(&self, user_id: i64) -> String {
        self.usernames
            .get(&user_id)
            .copied()
            .unwrap_or(UNKNOWN_AUTHOR)
            .to_string()
    }

    fn like_count(&self, post_id: i64) -> usize {
        self.like_counts.get(&post_id).copied().unwrap_or(0)
    }

    /// Author of the post a retweet points at; `None` if the original is gone.
    fn original_username(&self, post: &Post) -> Option<String> {
        if !post.is_retweet {
            return None;
        }
        let original = self.posts.get(&post.original_post_id?)?;
        Some(self.username(original.user_id))
    }
}

fn display_time(ts: &NaiveDateTime) -> String {
    ts.format(DISPLAY_TIME_FORMAT).to_string()
}

#[derive(Clone)]
pub struct FeedService {
    store: Arc<DataStore>,
}

impl FeedService {
    pub fn new(store: Arc<DataStore>) -> Self {
        Self { store }
    }

    /// Every post, newest first.
    pub fn feed(&self) -> AppResult<Vec<PostSummary>> {
        let posts: Vec<Post> = self.store.load()?;
        let users: Vec<User> = self.store.load()?;
        let likes: Vec<Like> = self.store.load()?;
        Ok(Self::assemble(posts, &users, &likes))
    }

    /// Order posts newest first (stable on ties) and resolve display fields.
    pub fn assemble(mut posts: Vec<Post>, users: &[User], likes: &[Like]) -> Vec<PostSummary> {
        // sort_by is stable, equal timestamps keep storage order
        posts.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

        let index = FeedIndex::build(&posts, users, likes);
        posts
            .iter()
            .map(|post| PostSummary {
                post_id: post.post_id,
                user_id: post.user_id,
                username: index.username(post.user_id),
                content: post.content.clone(),
                timestamp: display_time(&post.timestamp),
                like_count: index.like_count(post.post_id),
                is_retweet: post.is_retweet,
                original_post_username: index.original_username(post),
            })
            .collect()
    }

    pub fn post_detail(&self, post_id: i64, viewer_id: i64) -> AppResult<Option<PostDetail>> {
        let posts: Vec<Post> = self.store.load()?;
        let users: Vec<User> = self.store.load()?;
        let likes: Vec<Like> = self.store.load()?;
        Ok(Self::build_post_detail(post_id, viewer_id, &posts, &users, &likes))
    }

    pub fn build_post_detail(
        post_id: i64,
        viewer_id: i64,
        posts: &[Post],
        users: &[User],
        likes: &[Like],
    ) -> Option<PostDetail> {
        let post = posts.iter().find(|p| p.post_id == post_id)?;
        let index = FeedIndex::build(posts, users, likes);

        Some(PostDetail {
            post_id: post.post_id,
            user_id: post.user_id,
            username: index.username(post.user_id),
            content: post.content.clone(),
            timestamp: display_time(&post.timestamp),
            like_count: index.like_count(post.post_id),
            is_liked: likes.iter().any(|l| l.is_by(post_id, viewer_id)),
            is_retweet: post.is_retweet,
            original_post_id: post.original_post_id,
            original_post_username: index.original_username(post),
        })
    }

    pub async fn create_post(&self, author: &User, content: &str) -> AppResult<Post> {
        let timestamp = models::now();
        let post = self
            .store
            .update::<Post, _, _>(|posts, next_id| {
                let post = Post::new(next_id, author.user_id, content, timestamp);
                posts.push(post.clone());
                post
            })
            .await?;

        info!("User {} created post {}", author.user_id, post.post_id);
        Ok(post)
    }

    /// Unlike if `user_id` already likes `post_id`, otherwise like it.
    pub async fn toggle_like(&self, post_id: i64, user_id: i64) -> AppResult<LikeToggle> {
        let timestamp = models::now();
        let outcome = self
            .store
            .update::<Like, _, _>(|likes, next_id| {
                if let Some(pos) = likes.iter().position(|l| l.is_by(post_id, user_id)) {
                    likes.remove(pos);
                    LikeToggle::Unliked
                } else {
                    likes.push(Like::new(next_id, post_id, user_id, timestamp));
                    LikeToggle::Liked
                }
            })
            .await?;

        info!("User {} {:?} post {}", user_id, outcome, post_id);
        Ok(outcome)
    }

    /// Repost `post_id` as `retweeter`. A missing original changes nothing
    /// and yields `None`.
    pub async fn retweet(&self, post_id: i64, retweeter: &User) -> AppResult<Option<Post>> {
        let users: Vec<User> = self.store.load()?;
        let timestamp = models::now();

        let retweet = self
            .store
            .modify::<Post, _, _>(|posts, next_id| {
                let original = posts.iter().find(|p| p.post_id == post_id)?;
                let original_username = users
                    .iter()
                    .find(|u| u.user_id == original.user_id)
                    .map(|u| u.username.as_str())
                    .unwrap_or(UNKNOWN_AUTHOR);
                let retweet = Post::retweet(
                    next_id,
                    retweeter.user_id,
                    original,
                    original_username,
                    timestamp,
                );
                posts.push(retweet.clone());
                Some(retweet)
            })
            .await?;

        match &retweet {
            Some(post) => info!("User {} retweeted post {} as {}", retweeter.user_id, post_id, post.post_id),
            None => warn!("User {} tried to retweet missing post {}", retweeter.user_id, post_id),
        }
        Ok(retweet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(minute: u32) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("2024-05-01 09:{:02}:00", minute), "%Y-%m-%d %H:%M:%S")
            .unwrap()
    }

    fn users() -> Vec<User> {
        vec![User::new(1, "alice", "pw1"), User::new(2, "bob", "pw2")]
    }

    #[test]
    fn test_assemble_orders_newest_first_with_stable_ties() {
        let posts = vec![
            Post::new(1, 1, "first", ts(0)),
            Post::new(2, 1, "second", ts(5)),
            Post::new(3, 2, "third", ts(5)),
            Post::new(4, 2, "fourth", ts(1)),
        ];

        let feed = FeedService::assemble(posts, &users(), &[]);
        let ids: Vec<i64> = feed.iter().map(|p| p.post_id).collect();
        assert_eq!(ids, vec![2, 3, 4, 1]);
        assert_eq!(feed[0].timestamp, "2024-05-01 09:05");
    }

    #[test]
    fn test_assemble_counts_likes_and_resolves_authors() {
        let posts = vec![Post::new(1, 1, "hello", ts(0)), Post::new(2, 9, "ghost", ts(1))];
        let likes = vec![
            Like::new(1, 1, 1, ts(2)),
            Like::new(2, 1, 2, ts(3)),
            Like::new(3, 2, 1, ts(3)),
        ];

        let feed = FeedService::assemble(posts, &users(), &likes);
        assert_eq!(feed[0].username, UNKNOWN_AUTHOR);
        assert_eq!(feed[0].like_count, 1);
        assert_eq!(feed[1].username, "alice");
        assert_eq!(feed[1].like_count, 2);
    }

    #[test]
    fn test_assemble_retweet_annotation() {
        let original = Post::new(1, 1, "hello", ts(0));
        let retweet = Post::retweet(2, 2, &original, "alice", ts(1));
        let mut orphan = Post::retweet(3, 2, &original, "alice", ts(2));
        orphan.original_post_id = Some(99);

        let feed = FeedService::assemble(vec![original, retweet, orphan], &users(), &[]);
        assert_eq!(feed[0].post_id, 3);
        assert_eq!(feed[0].original_post_username, None);
        assert!(feed[0].is_retweet);
        assert_eq!(feed[1].original_post_username.as_deref(), Some("alice"));
        assert_eq!(feed[2].original_post_username, None);
    }

    #[test]
    fn test_build_post_detail() {
        let posts = vec![Post::new(1, 1, "hello", ts(0))];
        let likes = vec![Like::new(1, 1, 2, ts(1))];

        let for_bob = FeedService::build_post_detail(1, 2, &posts, &users(), &likes).unwrap();
        assert_eq!(for_bob.like_count, 1);
        assert!(for_bob.is_liked);
        assert_eq!(for_bob.username, "alice");

        let for_alice = FeedService::build_post_detail(1, 1, &posts, &users(), &likes).unwrap();
        assert!(!for_alice.is_liked);

        assert!(FeedService::build_post_detail(2, 1, &posts, &users(), &likes).is_none());
    }

    async fn service() -> (FeedService, Arc<DataStore>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DataStore::open(dir.path()).unwrap());
        store.storage().save(&users()).unwrap();
        (FeedService::new(store.clone()), store, dir)
    }

    #[tokio::test]
    async fn test_toggle_like_parity() {
        let (feed, store, _dir) = service().await;
        feed.create_post(&users()[0], "hello").await.unwrap();

        assert_eq!(feed.toggle_like(1, 2).await.unwrap(), LikeToggle::Liked);
        assert_eq!(feed.toggle_like(1, 2).await.unwrap(), LikeToggle::Unliked);
        assert!(store.load::<Like>().unwrap().is_empty());

        assert_eq!(feed.toggle_like(1, 2).await.unwrap(), LikeToggle::Liked);
        let likes: Vec<Like> = store.load().unwrap();
        assert_eq!(likes.len(), 1);
        assert_eq!(feed.post_detail(1, 2).unwrap().unwrap().like_count, 1);
    }

    #[tokio::test]
    async fn test_retweet_content_and_link() {
        let (feed, store, _dir) = service().await;
        let bob = users()[1].clone();
        feed.create_post(&users()[0], "hello").await.unwrap();

        let retweet = feed.retweet(1, &bob).await.unwrap().unwrap();
        assert_eq!(retweet.post_id, 2);
        assert_eq!(retweet.user_id, 2);
        assert_eq!(retweet.content, "RT @alice: hello");
        assert_eq!(retweet.original_post_id, Some(1));
        assert_eq!(store.load::<Post>().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_retweet_missing_post_is_noop() {
        let (feed, store, _dir) = service().await;
        feed.create_post(&users()[0], "hello").await.unwrap();

        assert!(feed.retweet(42, &users()[1]).await.unwrap().is_none());
        assert_eq!(store.load::<Post>().unwrap().len(), 1);
        assert_eq!(store.load::<Like>().unwrap().len(), 0);
    }
}
