//! Likes, favorites, and comments.
//!
//! The existence checks before inserts are an optimization for friendly
//! errors; the store's uniqueness constraints remain the source of truth
//! when checks race, and a constraint violation surfaces as a duplicate.
//! Every successful mutation triggers a coarse feed purge afterwards.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::feed::{FeedQueryParams, PageLimits};
use crate::application::repos::{
    CommentsRepo, CreateCommentParams, EngagementRepo, FeedQuery, PostsRepo, UsersRepo,
};
use crate::cache::CacheTrigger;
use crate::domain::entities::{CommentView, FeedEntry};
use crate::domain::posts::{UNKNOWN_AUTHOR, validate_comment_body};

#[derive(Clone)]
pub struct EngagementService {
    posts: Arc<dyn PostsRepo>,
    engagement: Arc<dyn EngagementRepo>,
    comments: Arc<dyn CommentsRepo>,
    users: Arc<dyn UsersRepo>,
    trigger: Arc<CacheTrigger>,
    limits: PageLimits,
}

impl EngagementService {
    pub fn new(
        posts: Arc<dyn PostsRepo>,
        engagement: Arc<dyn EngagementRepo>,
        comments: Arc<dyn CommentsRepo>,
        users: Arc<dyn UsersRepo>,
        trigger: Arc<CacheTrigger>,
        limits: PageLimits,
    ) -> Self {
        Self {
            posts,
            engagement,
            comments,
            users,
            trigger,
            limits,
        }
    }

    pub async fn like(&self, actor: Uuid, post_id: Uuid) -> Result<(), ServiceError> {
        self.require_post(post_id).await?;

        self.engagement.insert_like(actor, post_id).await?;

        self.trigger.post_liked(post_id).await;
        Ok(())
    }

    pub async fn unlike(&self, actor: Uuid, post_id: Uuid) -> Result<(), ServiceError> {
        let removed = self.engagement.delete_like(actor, post_id).await?;
        if !removed {
            return Err(ServiceError::NotFound("like"));
        }

        self.trigger.post_unliked(post_id).await;
        Ok(())
    }

    pub async fn favorite(&self, actor: Uuid, post_id: Uuid) -> Result<(), ServiceError> {
        self.require_post(post_id).await?;

        self.engagement.insert_favorite(actor, post_id).await?;

        self.trigger.post_favorited(post_id).await;
        Ok(())
    }

    pub async fn unfavorite(&self, actor: Uuid, post_id: Uuid) -> Result<(), ServiceError> {
        let removed = self.engagement.delete_favorite(actor, post_id).await?;
        if !removed {
            return Err(ServiceError::NotFound("favorite"));
        }

        self.trigger.post_unfavorited(post_id).await;
        Ok(())
    }

    pub async fn comment(
        &self,
        actor: Uuid,
        post_id: Uuid,
        body: String,
        parent_comment_id: Option<Uuid>,
    ) -> Result<CommentView, ServiceError> {
        self.require_post(post_id).await?;
        validate_comment_body(&body)?;

        let comment = self
            .comments
            .create_comment(CreateCommentParams {
                post_id,
                author_id: actor,
                parent_comment_id,
                body,
            })
            .await?;

        self.trigger.comment_created(post_id).await;

        let author_name = match self.users.find_by_id(actor).await? {
            Some(user) => user.username,
            None => UNKNOWN_AUTHOR.to_string(),
        };

        Ok(CommentView {
            id: comment.id,
            post_id: comment.post_id,
            author_id: comment.user_id,
            author_name,
            parent_comment_id: comment.parent_comment_id,
            body: comment.body,
            created_at: comment.created_at,
        })
    }

    pub async fn comments_for(&self, post_id: Uuid) -> Result<Vec<CommentView>, ServiceError> {
        self.require_post(post_id).await?;
        Ok(self.comments.list_for_post(post_id).await?)
    }

    /// The viewer's favorited posts, most recently favorited first.
    pub async fn favorites_for(
        &self,
        viewer: Uuid,
        params: FeedQueryParams,
    ) -> Result<Vec<FeedEntry>, ServiceError> {
        let query = FeedQuery {
            search: None,
            offset: params.offset.unwrap_or(0),
            limit: self.limits.clamp(params.limit),
        };
        Ok(self.engagement.list_favorites(viewer, &query).await?)
    }

    async fn require_post(&self, post_id: Uuid) -> Result<(), ServiceError> {
        self.posts
            .find_by_id(post_id)
            .await?
            .map(|_| ())
            .ok_or(ServiceError::NotFound("post"))
    }
}
