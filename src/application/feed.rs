//! Feed read path: cache orchestration over the assembling repository.
//!
//! Per read the flow is fixed: build the key, try the cache, return the hit
//! unchanged; on a miss assemble from Postgres, populate the cache best
//! effort, return. There is no retry state — a store failure terminates the
//! request, a cache failure at any step behaves as if that step were a
//! no-op.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::repos::{FeedQuery, PostsRepo};
use crate::cache::{FeedCache, keys};
use crate::domain::entities::FeedEntry;

/// Raw, unclamped read parameters as they arrive from the HTTP layer.
#[derive(Debug, Clone, Default)]
pub struct FeedQueryParams {
    pub search: Option<String>,
    pub offset: Option<u32>,
    pub limit: Option<u32>,
}

/// Server-side page bounds applied to every listing read.
#[derive(Debug, Clone, Copy)]
pub struct PageLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl PageLimits {
    pub fn clamp(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size)
    }
}

#[derive(Clone)]
pub struct FeedService {
    posts: Arc<dyn PostsRepo>,
    cache: Arc<FeedCache>,
    limits: PageLimits,
}

impl FeedService {
    pub fn new(posts: Arc<dyn PostsRepo>, cache: Arc<FeedCache>, limits: PageLimits) -> Self {
        Self {
            posts,
            cache,
            limits,
        }
    }

    /// Normalize raw parameters into the canonical query the key builder
    /// and the repository both see. Blank search text counts as absent so
    /// it cannot split the key space.
    pub fn normalize(&self, params: FeedQueryParams) -> FeedQuery {
        let search = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_string);

        FeedQuery {
            search,
            offset: params.offset.unwrap_or(0),
            limit: self.limits.clamp(params.limit),
        }
    }

    /// One page of the public feed, served from cache when possible.
    pub async fn list_feed(
        &self,
        params: FeedQueryParams,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, ServiceError> {
        let query = self.normalize(params);
        let key = keys::feed_page(query.search.as_deref(), query.offset, query.limit, viewer);

        if let Some(entries) = self.cache.get::<Vec<FeedEntry>>(&key).await {
            return Ok(entries);
        }

        let entries = self.posts.list_feed(&query, viewer).await?;
        self.cache.put(&key, &entries).await;
        Ok(entries)
    }

    /// A single post's feed projection, cached in the listing namespace so
    /// one coarse purge covers both shapes.
    pub async fn post_detail(
        &self,
        post_id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<FeedEntry, ServiceError> {
        let key = keys::post_detail(post_id, viewer);

        if let Some(entry) = self.cache.get::<FeedEntry>(&key).await {
            return Ok(entry);
        }

        let entry = self
            .posts
            .feed_entry(post_id, viewer)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;
        self.cache.put(&key, &entry).await;
        Ok(entry)
    }

    /// Published posts by one author. Served fresh on every read; only the
    /// main feed namespace is cached.
    pub async fn author_posts(
        &self,
        author_id: Uuid,
        params: FeedQueryParams,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, ServiceError> {
        let query = self.normalize(params);
        Ok(self.posts.list_by_author(author_id, &query, viewer).await?)
    }
}
