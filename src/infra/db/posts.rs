use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{
    CreatePostParams, FeedQuery, PostsRepo, PostsWriteRepo, RepoError, UpdatePostParams,
};
use crate::domain::entities::{FeedEntry, PostRecord};
use crate::domain::types::PostStatus;

use super::PostgresRepositories;
use super::types::{FeedEntryRow, PostRow};
use super::util::map_sqlx_error;

const POST_COLUMNS: &str = "id, user_id, title, body, status, created_at, updated_at";

#[async_trait]
impl PostsRepo for PostgresRepositories {
    async fn list_feed(
        &self,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        let mut qb = QueryBuilder::new("");
        Self::push_feed_projection(&mut qb, viewer);

        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);
        Self::apply_search_filter(&mut qb, query);

        // Creation time descending; id ascending keeps equal timestamps in
        // a stable order across reads.
        qb.push(" ORDER BY p.created_at DESC, p.id ASC ");
        Self::push_page_window(&mut qb, query);

        let rows = qb
            .build_query_as::<FeedEntryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FeedEntry::from).collect())
    }

    async fn feed_entry(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<FeedEntry>, RepoError> {
        let mut qb = QueryBuilder::new("");
        Self::push_feed_projection(&mut qb, viewer);

        qb.push(" AND p.id = ");
        qb.push_bind(id);

        let row = qb
            .build_query_as::<FeedEntryRow>()
            .fetch_optional(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(row.map(FeedEntry::from))
    }

    async fn list_by_author(
        &self,
        author_id: Uuid,
        query: &FeedQuery,
        viewer: Option<Uuid>,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        let mut qb = QueryBuilder::new("");
        Self::push_feed_projection(&mut qb, viewer);

        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);
        qb.push(" AND p.user_id = ");
        qb.push_bind(author_id);
        Self::apply_search_filter(&mut qb, query);

        qb.push(" ORDER BY p.created_at DESC, p.id ASC ");
        Self::push_page_window(&mut qb, query);

        let rows = qb
            .build_query_as::<FeedEntryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FeedEntry::from).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, RepoError> {
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(PostRecord::from))
    }
}

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            author_id,
            title,
            body,
            status,
        } = params;

        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "INSERT INTO posts (id, user_id, title, body, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(author_id)
        .bind(title)
        .bind(body)
        .bind(status)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn update_post(&self, params: UpdatePostParams) -> Result<PostRecord, RepoError> {
        let UpdatePostParams {
            id,
            title,
            body,
            status,
        } = params;

        let now = OffsetDateTime::now_utc();
        let row = sqlx::query_as::<_, PostRow>(&format!(
            "UPDATE posts \
             SET title = $2, body = $3, status = $4, updated_at = $5 \
             WHERE id = $1 \
             RETURNING {POST_COLUMNS}"
        ))
        .bind(id)
        .bind(title)
        .bind(body)
        .bind(status)
        .bind(now)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(PostRecord::from(row))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }
}
