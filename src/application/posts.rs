//! Post mutations: create, update, delete, each followed by coarse feed
//! invalidation once the store has confirmed the write.

use std::sync::Arc;

use uuid::Uuid;

use crate::application::error::ServiceError;
use crate::application::repos::{
    CreatePostParams, PostsRepo, PostsWriteRepo, UpdatePostParams,
};
use crate::cache::CacheTrigger;
use crate::domain::entities::PostRecord;
use crate::domain::posts::PostDraft;
use crate::domain::types::PostStatus;

/// Partial update as it arrives from the HTTP layer; absent fields keep
/// their stored values.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Clone)]
pub struct PostService {
    reader: Arc<dyn PostsRepo>,
    writer: Arc<dyn PostsWriteRepo>,
    trigger: Arc<CacheTrigger>,
}

impl PostService {
    pub fn new(
        reader: Arc<dyn PostsRepo>,
        writer: Arc<dyn PostsWriteRepo>,
        trigger: Arc<CacheTrigger>,
    ) -> Self {
        Self {
            reader,
            writer,
            trigger,
        }
    }

    pub async fn create_post(
        &self,
        actor: Uuid,
        title: String,
        body: String,
        status: PostStatus,
    ) -> Result<PostRecord, ServiceError> {
        let draft = PostDraft::new(title, body, status)?;

        let post = self
            .writer
            .create_post(CreatePostParams {
                author_id: actor,
                title: draft.title,
                body: draft.body,
                status: draft.status,
            })
            .await?;

        self.trigger.post_created(post.id).await;
        Ok(post)
    }

    pub async fn update_post(
        &self,
        actor: Uuid,
        id: Uuid,
        changes: PostChanges,
    ) -> Result<PostRecord, ServiceError> {
        let current = self.load_owned(actor, id).await?;

        let draft = PostDraft::new(
            changes.title.unwrap_or(current.title),
            changes.body.unwrap_or(current.body),
            changes.status.unwrap_or(current.status),
        )?;

        let post = self
            .writer
            .update_post(UpdatePostParams {
                id,
                title: draft.title,
                body: draft.body,
                status: draft.status,
            })
            .await?;

        self.trigger.post_updated(post.id).await;
        Ok(post)
    }

    pub async fn delete_post(&self, actor: Uuid, id: Uuid) -> Result<(), ServiceError> {
        self.load_owned(actor, id).await?;

        self.writer.delete_post(id).await?;

        self.trigger.post_deleted(id).await;
        Ok(())
    }

    /// Load a post and verify the actor owns it.
    async fn load_owned(&self, actor: Uuid, id: Uuid) -> Result<PostRecord, ServiceError> {
        let post = self
            .reader
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound("post"))?;

        if post.user_id != actor {
            return Err(ServiceError::forbidden("only the author may modify a post"));
        }

        Ok(post)
    }
}
