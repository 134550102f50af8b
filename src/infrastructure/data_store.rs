// DataStore - the three collections behind per-collection writer locks

use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::info;

use super::csv_storage::CsvStorage;
use super::id_generator::IdGenerator;
use crate::error::{AppError, AppResult};
use crate::models::{Record, RecordKind};

/// Shared access to Users, Posts and Likes.
///
/// Reads are lock-free snapshots. Every read-modify-write goes through
/// [`DataStore::modify`], which holds that collection's lock from load to
/// save so concurrent writers cannot drop each other's changes.
#[derive(Debug)]
pub struct DataStore {
    storage: CsvStorage,
    ids: IdGenerator,
    users_lock: Mutex<()>,
    posts_lock: Mutex<()>,
    likes_lock: Mutex<()>,
}

impl DataStore {
    pub fn open(data_dir: impl Into<PathBuf>) -> AppResult<Self> {
        let storage = CsvStorage::new(data_dir);
        let ids = IdGenerator::open(storage.data_dir())?;
        info!("Data store opened at {}", storage.data_dir().display());

        Ok(Self {
            storage,
            ids,
            users_lock: Mutex::new(()),
            posts_lock: Mutex::new(()),
            likes_lock: Mutex::new(()),
        })
    }

    pub fn storage(&self) -> &CsvStorage {
        &self.storage
    }

    #[cfg(test)]
    pub(crate) fn ids(&self) -> &IdGenerator {
        &self.ids
    }

    pub fn load<T: Record>(&self) -> AppResult<Vec<T>> {
        self.storage.load()
    }

    /// Load the collection, apply `f`, and save it if `f` returns `Some`.
    ///
    /// `f` receives the next free id for the kind. Returning `None` leaves
    /// the file untouched.
    pub async fn modify<T, R, F>(&self, f: F) -> AppResult<Option<R>>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>, i64) -> Option<R>,
    {
        let _guard = self.lock_for(T::KIND).lock().await;

        let mut records = self.storage.load::<T>()?;
        // Taken before `f` runs, removals must not lower it
        let stored_max = max_id(&records);
        let next_id = self.ids.next_id(T::KIND, stored_max).await;

        let Some(outcome) = f(&mut records, next_id) else {
            return Ok(None);
        };

        self.storage.save(&records)?;
        self.ids
            .advance(T::KIND, stored_max.max(max_id(&records)))
            .await?;
        Ok(Some(outcome))
    }

    /// Like [`DataStore::modify`] for changes that always write.
    pub async fn update<T, R, F>(&self, f: F) -> AppResult<R>
    where
        T: Record,
        F: FnOnce(&mut Vec<T>, i64) -> R,
    {
        self.modify(|records, next_id| Some(f(records, next_id)))
            .await?
            .ok_or_else(|| AppError::Internal(format!("{} update was not applied", T::KIND.as_str())))
    }

    fn lock_for(&self, kind: RecordKind) -> &Mutex<()> {
        match kind {
            RecordKind::User => &self.users_lock,
            RecordKind::Post => &self.posts_lock,
            RecordKind::Like => &self.likes_lock,
        }
    }
}

fn max_id<T: Record>(records: &[T]) -> i64 {
    records.iter().map(Record::id).max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Like, User};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_modify_assigns_sequential_ids() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        for name in ["alice", "bob"] {
            store
                .modify::<User, _, _>(|users, next_id| {
                    users.push(User::new(next_id, name, "pw"));
                    Some(next_id)
                })
                .await
                .unwrap();
        }

        let users: Vec<User> = store.load().unwrap();
        assert_eq!(users.iter().map(|u| u.user_id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_skipped_modify_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        let outcome = store
            .modify::<User, (), _>(|_users, _next_id| None)
            .await
            .unwrap();
        assert!(outcome.is_none());
        assert!(!store.storage().path_for::<User>().exists());
    }

    #[tokio::test]
    async fn test_removed_ids_are_not_reissued() {
        let dir = tempfile::tempdir().unwrap();
        let store = DataStore::open(dir.path()).unwrap();
        let now = crate::models::now();

        for post_id in [1, 2] {
            store
                .modify::<Like, _, _>(|likes, next_id| {
                    likes.push(Like::new(next_id, post_id, 1, now));
                    Some(())
                })
                .await
                .unwrap();
        }
        store
            .modify::<Like, _, _>(|likes, _| {
                likes.retain(|l| l.like_id != 2);
                Some(())
            })
            .await
            .unwrap();
        let issued = store
            .modify::<Like, _, _>(|likes, next_id| {
                likes.push(Like::new(next_id, 3, 1, now));
                Some(next_id)
            })
            .await
            .unwrap();

        assert_eq!(issued, Some(3));
    }

    #[tokio::test]
    async fn test_removing_highest_legacy_id_does_not_reissue_it() {
        let dir = tempfile::tempdir().unwrap();
        let now = crate::models::now();
        // Files from before the sequence file existed
        CsvStorage::new(dir.path())
            .save(&[
                Like::new(1, 1, 1, now),
                Like::new(2, 2, 1, now),
                Like::new(3, 3, 1, now),
            ])
            .unwrap();
        let store = DataStore::open(dir.path()).unwrap();

        store
            .update::<Like, _, _>(|likes, _| likes.retain(|l| l.like_id != 3))
            .await
            .unwrap();
        assert_eq!(store.ids().last_issued(RecordKind::Like).await, 3);

        let issued = store
            .update::<Like, _, _>(|likes, next_id| {
                likes.push(Like::new(next_id, 4, 1, now));
                next_id
            })
            .await
            .unwrap();
        assert_eq!(issued, 4);
    }

    #[tokio::test]
    async fn test_concurrent_writers_do_not_lose_updates() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(DataStore::open(dir.path()).unwrap());

        let mut handles = Vec::new();
        for i in 0..16 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store
                    .modify::<User, _, _>(move |users, next_id| {
                        users.push(User::new(next_id, format!("user{}", i), "pw"));
                        Some(())
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let mut ids: Vec<i64> = store.load::<User>().unwrap().iter().map(|u| u.user_id).collect();
        ids.sort();
        assert_eq!(ids, (1..=16).collect::<Vec<_>>());
    }
}
