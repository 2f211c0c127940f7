use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CommentsRepo, CreateCommentParams, RepoError};
use crate::domain::entities::{CommentRecord, CommentView};
use crate::domain::posts::UNKNOWN_AUTHOR;

use super::PostgresRepositories;
use super::types::{CommentRow, CommentViewRow};
use super::util::map_sqlx_error;

#[async_trait]
impl CommentsRepo for PostgresRepositories {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let CreateCommentParams {
            post_id,
            author_id,
            parent_comment_id,
            body,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, CommentRow>(
            "INSERT INTO comments (id, post_id, user_id, parent_comment_id, body, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, post_id, user_id, parent_comment_id, body, created_at",
        )
        .bind(id)
        .bind(post_id)
        .bind(author_id)
        .bind(parent_comment_id)
        .bind(body)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(CommentRecord::from(row))
    }

    async fn list_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        let rows = sqlx::query_as::<_, CommentViewRow>(
            "SELECT c.id, c.post_id, c.user_id AS author_id, \
             COALESCE(u.username, $2) AS author_name, \
             c.parent_comment_id, c.body, c.created_at \
             FROM comments c \
             LEFT JOIN users u ON u.id = c.user_id \
             WHERE c.post_id = $1 \
             ORDER BY c.created_at DESC, c.id ASC",
        )
        .bind(post_id)
        .bind(UNKNOWN_AUTHOR)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentView::from).collect())
    }
}
