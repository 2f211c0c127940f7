#![allow(dead_code)] // each test binary uses a different slice of the harness

//! In-memory fakes and harness shared by the integration tests.
//!
//! The fake repository mirrors the SQL semantics of the Postgres adapter:
//! published-only feed, case-insensitive substring search over title or
//! body, creation-time-descending order with id-ascending tie-break,
//! offset/limit windows, live counts, and per-viewer flags.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use mostinger::application::engagement::EngagementService;
use mostinger::application::feed::{FeedService, PageLimits};
use mostinger::application::posts::PostService;
use mostinger::application::repos::{
    CommentsRepo, CreateCommentParams, CreatePostParams, EngagementRepo, FeedQuery, PostsRepo,
    PostsWriteRepo, RepoError, UpdatePostParams, UsersRepo,
};
use mostinger::cache::{CacheTrigger, FeedCache, MemoryCacheStore};
use mostinger::domain::entities::{CommentRecord, CommentView, FeedEntry, PostRecord, UserRecord};
use mostinger::domain::posts::UNKNOWN_AUTHOR;
use mostinger::domain::types::PostStatus;

#[derive(Default)]
pub struct FakeStore {
    pub users: Mutex<HashMap<Uuid, UserRecord>>,
    pub posts: Mutex<Vec<PostRecord>>,
    pub comments: Mutex<Vec<CommentRecord>>,
    pub likes: Mutex<HashSet<(Uuid, Uuid)>>,
    pub favorites: Mutex<Vec<(Uuid, Uuid, OffsetDateTime)>>,
    pub fail_reads: AtomicBool,
}

impl FakeStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn add_user(&self, username: &str) -> Uuid {
        let id = Uuid::new_v4();
        let user = UserRecord {
            id,
            email: format!("{username}@example.com"),
            username: username.to_string(),
            password_hash: "argon2-opaque".to_string(),
            bio: None,
            avatar_url: None,
            is_active: true,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.users.lock().unwrap().insert(id, user);
        id
    }

    /// Insert a post directly, bypassing the service layer and therefore
    /// any cache invalidation. Used to observe stale cache hits.
    pub fn add_post(
        &self,
        author: Uuid,
        title: &str,
        body: &str,
        status: PostStatus,
        created_at: OffsetDateTime,
    ) -> Uuid {
        let id = Uuid::new_v4();
        self.posts.lock().unwrap().push(PostRecord {
            id,
            user_id: author,
            title: title.to_string(),
            body: body.to_string(),
            status,
            created_at,
            updated_at: None,
        });
        id
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    fn check_reads(&self) -> Result<(), RepoError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepoError::from_persistence("store unavailable"));
        }
        Ok(())
    }

    fn author_name(&self, author_id: Uuid) -> String {
        self.users
            .lock()
            .unwrap()
            .get(&author_id)
            .map(|user| user.username.clone())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string())
    }

    fn entry_for(&self, post: &PostRecord, viewer: Option<Uuid>) -> FeedEntry {
        let likes = self.likes.lock().unwrap();
        let comments = self.comments.lock().unwrap();
        let favorites = self.favorites.lock().unwrap();

        FeedEntry {
            id: post.id,
            author_id: post.user_id,
            author_name: self.author_name(post.user_id),
            title: post.title.clone(),
            body: post.body.clone(),
            status: post.status,
            created_at: post.created_at,
            updated_at: post.updated_at,
            like_count: likes.iter().filter(|(_, p)| *p == post.id).count() as i64,
            comment_count: comments.iter().filter(|c| c.post_id == post.id).count() as i64,
            is_liked: viewer
                .map(|v| likes.contains(&(v, post.id)))
                .unwrap_or(false),
            is_favorited: viewer
                .map(|v| favorites.iter().any(|(u, p, _)| *u == v && *p == post.id))
                .unwrap_or(false),
        }
    }

    fn matches_search(post: &PostRecord, search: Option<&str>) -> bool {
        match search {
            Some(text) => {
                let needle = text.to_lowercase();
                post.title.to_lowercase().contains(&needle)
                    || post.body.to_lowercase().contains(&needle)
            }
            None => true,
        }
    }

    fn ordered_published(&self, query: &FeedQuery, author: Option<Uuid>) -> Vec<PostRecord> {
        let mut posts: Vec<PostRecord> = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .filter(|post| post.status == PostStatus::Published)
            .filter(|post| author.map(|a| post.user_id == a).unwrap_or(true))
            .filter(|post| Self::matches_search(post, query.search.as_deref()))
            .cloned()
            .collect();

        posts.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.id.cmp(&b.id))
        });

        posts
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect()
    }
}

#[async_trait]
impl PostsRepo for FakeStore {
    async fn list_feed(
        &self,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        self.check_reads()?;
        Ok(self
            .ordered_published(query, None)
            .iter()
            .map(|post| self.entry_for(post, viewer))
            .collect())
    }

    async fn feed_entry(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<FeedEntry>, RepoError> {
        self.check_reads()?;
        let post = self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned();
        Ok(post.map(|post| self.entry_for(&post, viewer)))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        self.check_reads()?;
        Ok(self
            .ordered_published(query, Some(author_id))
            .iter()
            .map(|post| self.entry_for(post, viewer))
            .collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        self.check_reads()?;
        Ok(self
            .posts
            .lock()
            .unwrap()
            .iter()
            .find(|post| post.id == id)
            .cloned())
    }
}

#[async_trait]
impl PostsWriteRepo for FakeStore {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let post = PostRecord {
            id: Uuid::new_v4(),
            user_id: params.author_id,
            title: params.title,
            body: params.body,
            status: params.status,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        self.posts.lock().unwrap().push(post.clone());
        Ok(post)
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let post = posts
            .iter_mut()
            .find(|post| post.id == params.id)
            .ok_or(RepoError::NotFound)?;
        post.title = params.title;
        post.body = params.body;
        post.status = params.status;
        post.updated_at = Some(OffsetDateTime::now_utc());
        Ok(post.clone())
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let mut posts = self.posts.lock().unwrap();
        let before = posts.len();
        posts.retain(|post| post.id != id);
        if posts.len() == before {
            return Err(RepoError::NotFound);
        }
        drop(posts);

        // Mirror the store-owned cascades.
        self.comments.lock().unwrap().retain(|c| c.post_id != id);
        self.likes.lock().unwrap().retain(|(_, p)| *p != id);
        self.favorites.lock().unwrap().retain(|(_, p, _)| *p != id);
        Ok(())
    }
}

#[async_trait]
impl EngagementRepo for FakeStore {
    async fn insert_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        if !self.likes.lock().unwrap().insert((user_id, post_id)) {
            return Err(RepoError::Duplicate {
                constraint: "post_likes_pkey".to_string(),
            });
        }
        Ok(())
    }

    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        Ok(self.likes.lock().unwrap().remove(&(user_id, post_id)))
    }

    async fn insert_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        let mut favorites = self.favorites.lock().unwrap();
        if favorites.iter().any(|(u, p, _)| *u == user_id && *p == post_id) {
            return Err(RepoError::Duplicate {
                constraint: "favorites_pkey".to_string(),
            });
        }
        favorites.push((user_id, post_id, OffsetDateTime::now_utc()));
        Ok(())
    }

    async fn delete_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let mut favorites = self.favorites.lock().unwrap();
        let before = favorites.len();
        favorites.retain(|(u, p, _)| !(*u == user_id && *p == post_id));
        Ok(favorites.len() != before)
    }

    async fn list_favorites(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        self.check_reads()?;

        let mut favored: Vec<(Uuid, OffsetDateTime)> = self
            .favorites
            .lock()
            .unwrap()
            .iter()
            .filter(|(u, _, _)| *u == user_id)
            .map(|(_, p, at)| (*p, *at))
            .collect();
        favored.sort_by(|a, b| b.1.cmp(&a.1));

        let posts = self.posts.lock().unwrap().clone();
        let entries = favored
            .into_iter()
            .filter_map(|(post_id, _)| posts.iter().find(|post| post.id == post_id))
            .filter(|post| post.status == PostStatus::Published)
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .map(|post| self.entry_for(post, Some(user_id)))
            .collect();
        Ok(entries)
    }
}

#[async_trait]
impl CommentsRepo for FakeStore {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let comment = CommentRecord {
            id: Uuid::new_v4(),
            post_id: params.post_id,
            user_id: params.author_id,
            parent_comment_id: params.parent_comment_id,
            body: params.body,
            created_at: OffsetDateTime::now_utc(),
        };
        self.comments.lock().unwrap().push(comment.clone());
        Ok(comment)
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        self.check_reads()?;
        let mut comments: Vec<CommentRecord> = self
            .comments
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

        Ok(comments
            .into_iter()
            .map(|comment| CommentView {
                id: comment.id,
                post_id: comment.post_id,
                author_id: comment.user_id,
                author_name: self.author_name(comment.user_id),
                parent_comment_id: comment.parent_comment_id,
                body: comment.body,
                created_at: comment.created_at,
            })
            .collect())
    }
}

#[async_trait]
impl UsersRepo for FakeStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<UserRecord>, RepoError> {
        self.check_reads()?;
        Ok(self.users.lock().unwrap().get(&id).cloned())
    }
}

pub struct Harness {
    pub store: Arc<FakeStore>,
    pub cache_store: Arc<MemoryCacheStore>,
    pub feed: Arc<FeedService>,
    pub posts: Arc<PostService>,
    pub engagement: Arc<EngagementService>,
}

pub fn limits() -> PageLimits {
    PageLimits {
        default_page_size: 20,
        max_page_size: 100,
    }
}

pub fn harness() -> Harness {
    harness_with_ttl(Duration::from_secs(300))
}

pub fn harness_with_ttl(ttl: Duration) -> Harness {
    let store = FakeStore::new();
    let cache_store = Arc::new(MemoryCacheStore::new());
    let cache = Arc::new(FeedCache::new(cache_store.clone(), ttl, true));
    let trigger = Arc::new(CacheTrigger::new(cache.clone()));

    let feed = Arc::new(FeedService::new(store.clone(), cache, limits()));
    let posts = Arc::new(PostService::new(
        store.clone(),
        store.clone(),
        trigger.clone(),
    ));
    let engagement = Arc::new(EngagementService::new(
        store.clone(),
        store.clone(),
        store.clone(),
        store.clone(),
        trigger,
        limits(),
    ));

    Harness {
        store,
        cache_store,
        feed,
        posts,
        engagement,
    }
}
