//! Postgres-backed repository implementations.

mod comments;
mod engagement;
mod posts;
mod types;
mod users;
mod util;

pub use util::map_sqlx_error;

use std::sync::Arc;

use sqlx::{
    Postgres, QueryBuilder,
    postgres::{PgPool, PgPoolOptions},
    query,
};
use uuid::Uuid;

use crate::application::repos::FeedQuery;
use crate::domain::posts::UNKNOWN_AUTHOR;

#[derive(Clone)]
pub struct PostgresRepositories {
    pool: Arc<PgPool>,
}

impl PostgresRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub async fn connect(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
        PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
    }

    pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .map_err(Into::into)
    }

    pub async fn health_check(&self) -> Result<(), sqlx::Error> {
        query("SELECT 1").execute(self.pool()).await.map(|_| ())
    }

    /// Push the shared feed projection: post columns, resolved author name,
    /// live engagement counts, and the viewer's own flags. Counts are taken
    /// in the same statement so they reflect the store at assembly time.
    fn push_feed_projection<'q>(qb: &mut QueryBuilder<'q, Postgres>, viewer: Option<Uuid>) {
        qb.push(
            "SELECT p.id, p.user_id AS author_id, \
             COALESCE(u.username, ",
        );
        qb.push_bind(UNKNOWN_AUTHOR);
        qb.push(
            ") AS author_name, \
             p.title, p.body, p.status, p.created_at, p.updated_at, \
             (SELECT COUNT(*) FROM post_likes l WHERE l.post_id = p.id) AS like_count, \
             (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comment_count, ",
        );

        match viewer {
            Some(viewer) => {
                qb.push("EXISTS (SELECT 1 FROM post_likes l WHERE l.post_id = p.id AND l.user_id = ");
                qb.push_bind(viewer);
                qb.push(") AS is_liked, ");
                qb.push("EXISTS (SELECT 1 FROM favorites f WHERE f.post_id = p.id AND f.user_id = ");
                qb.push_bind(viewer);
                qb.push(") AS is_favorited ");
            }
            None => {
                qb.push("FALSE AS is_liked, FALSE AS is_favorited ");
            }
        }

        qb.push("FROM posts p LEFT JOIN users u ON u.id = p.user_id WHERE 1=1 ");
    }

    /// Case-insensitive substring match over title or body. No ranking;
    /// callers keep recency ordering.
    fn apply_search_filter<'q>(qb: &mut QueryBuilder<'q, Postgres>, query: &'q FeedQuery) {
        if let Some(search) = query.search.as_ref() {
            qb.push(" AND (p.title ILIKE ");
            qb.push_bind(format!("%{}%", search));
            qb.push(" OR p.body ILIKE ");
            qb.push_bind(format!("%{}%", search));
            qb.push(")");
        }
    }

    fn push_page_window<'q>(qb: &mut QueryBuilder<'q, Postgres>, query: &FeedQuery) {
        qb.push(" LIMIT ");
        qb.push_bind(i64::from(query.limit));
        qb.push(" OFFSET ");
        qb.push_bind(i64::from(query.offset));
    }
}
