use async_trait::async_trait;
use sqlx::QueryBuilder;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{EngagementRepo, FeedQuery, RepoError};
use crate::domain::entities::FeedEntry;
use crate::domain::types::PostStatus;

use super::PostgresRepositories;
use super::types::FeedEntryRow;
use super::util::map_sqlx_error;

#[async_trait]
impl EngagementRepo for PostgresRepositories {
    async fn insert_like(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO post_likes (user_id, post_id, created_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(post_id)
            .bind(OffsetDateTime::now_utc())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_like(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM post_likes WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO favorites (user_id, post_id, created_at) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(post_id)
            .bind(OffsetDateTime::now_utc())
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }

    async fn delete_favorite(&self, user_id: Uuid, post_id: Uuid) -> Result<bool, RepoError> {
        let result = sqlx::query("DELETE FROM favorites WHERE user_id = $1 AND post_id = $2")
            .bind(user_id)
            .bind(post_id)
            .execute(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_favorites(
        &self,
        user_id: Uuid,
        query: &FeedQuery,
    ) -> Result<Vec<FeedEntry>, RepoError> {
        // The viewer is the list owner, so their own flags are computed
        // against their identity.
        let mut qb = QueryBuilder::new("");
        Self::push_feed_projection(&mut qb, Some(user_id));

        qb.push(" AND p.status = ");
        qb.push_bind(PostStatus::Published);
        qb.push(
            " AND EXISTS (SELECT 1 FROM favorites f WHERE f.post_id = p.id AND f.user_id = ",
        );
        qb.push_bind(user_id);
        qb.push(")");

        qb.push(
            " ORDER BY (SELECT f.created_at FROM favorites f \
             WHERE f.post_id = p.id AND f.user_id = ",
        );
        qb.push_bind(user_id);
        qb.push(") DESC, p.id ASC ");
        Self::push_page_window(&mut qb, query);

        let rows = qb
            .build_query_as::<FeedEntryRow>()
            .fetch_all(self.pool())
            .await
            .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(FeedEntry::from).collect())
    }
}
