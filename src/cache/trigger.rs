//! Invalidation coordinator.
//!
//! After a mutation commits, the owning service calls the matching trigger
//! method and the whole feed namespace is purged. Invalidation is coarse on
//! purpose: a like on one post changes the rendered counts on every cached
//! page that happens to include it, so tracking which pages are affected
//! buys nothing here. Each mutation purges on its own; there is no batching
//! or debouncing.
//!
//! # Usage
//!
//! ```ignore
//! // After the store confirmed the write:
//! trigger.post_liked(post_id).await;
//! ```

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use super::keys;
use super::store::FeedCache;

pub struct CacheTrigger {
    cache: Arc<FeedCache>,
}

impl CacheTrigger {
    pub fn new(cache: Arc<FeedCache>) -> Self {
        Self { cache }
    }

    /// Purge the feed namespace. Called strictly after the mutating write
    /// is durably committed, never before and never concurrently with it.
    async fn purge_feed(&self, reason: &'static str) {
        debug!(reason, "invalidating feed namespace");
        self.cache.purge_prefix(&keys::feed_purge_prefix()).await;
    }

    pub async fn post_created(&self, post_id: Uuid) {
        debug!(%post_id, "post created");
        self.purge_feed("post_created").await;
    }

    pub async fn post_updated(&self, post_id: Uuid) {
        debug!(%post_id, "post updated");
        self.purge_feed("post_updated").await;
    }

    pub async fn post_deleted(&self, post_id: Uuid) {
        debug!(%post_id, "post deleted");
        self.purge_feed("post_deleted").await;
    }

    pub async fn post_liked(&self, post_id: Uuid) {
        debug!(%post_id, "post liked");
        self.purge_feed("post_liked").await;
    }

    pub async fn post_unliked(&self, post_id: Uuid) {
        debug!(%post_id, "post unliked");
        self.purge_feed("post_unliked").await;
    }

    pub async fn post_favorited(&self, post_id: Uuid) {
        debug!(%post_id, "post favorited");
        self.purge_feed("post_favorited").await;
    }

    pub async fn post_unfavorited(&self, post_id: Uuid) {
        debug!(%post_id, "post unfavorited");
        self.purge_feed("post_unfavorited").await;
    }

    pub async fn comment_created(&self, post_id: Uuid) {
        debug!(%post_id, "comment created");
        self.purge_feed("comment_created").await;
    }
}
