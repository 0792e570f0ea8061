//! PostgreSQL implementation of the click repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use std::sync::Arc;

use crate::domain::entities::{Click, DailyCount, NewClick, UserAgentCount};
use crate::domain::repositories::ClickRepository;
use crate::error::AppError;

#[derive(FromRow)]
struct ClickRow {
    id: i64,
    short_code: String,
    clicked_at: DateTime<Utc>,
    user_agent: Option<String>,
    referer: Option<String>,
    source_ip: String,
}

impl From<ClickRow> for Click {
    fn from(r: ClickRow) -> Self {
        Click::new(
            r.id,
            r.short_code,
            r.clicked_at,
            r.user_agent,
            r.referer,
            r.source_ip,
        )
    }
}

#[derive(FromRow)]
struct UserAgentRow {
    user_agent: Option<String>,
    count: i64,
}

#[derive(FromRow)]
struct DailyRow {
    date: String,
    count: i64,
}

/// PostgreSQL repository for click tracking and analytics queries.
///
/// Aggregations run in SQL so only the summarized rows cross the wire.
pub struct PgClickRepository {
    pool: Arc<PgPool>,
}

impl PgClickRepository {
    /// Creates a new repository with a database connection pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClickRepository for PgClickRepository {
    async fn record_click(&self, new_click: NewClick) -> Result<Click, AppError> {
        let row = sqlx::query_as::<_, ClickRow>(
            r#"
            INSERT INTO clicks (short_code, clicked_at, user_agent, referer, source_ip)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, short_code, clicked_at, user_agent, referer, source_ip
            "#,
        )
        .bind(&new_click.short_code)
        .bind(new_click.clicked_at)
        .bind(&new_click.user_agent)
        .bind(&new_click.referer)
        .bind(&new_click.source_ip)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(row.into())
    }

    async fn count_all(&self) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clicks")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count)
    }

    async fn count_since(&self, code: &str, since: DateTime<Utc>) -> Result<i64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM clicks WHERE short_code = $1 AND clicked_at >= $2",
        )
        .bind(code)
        .bind(since)
        .fetch_one(self.pool.as_ref())
        .await?;

        Ok(count)
    }

    async fn top_user_agents(
        &self,
        code: &str,
        limit: i64,
    ) -> Result<Vec<UserAgentCount>, AppError> {
        let rows = sqlx::query_as::<_, UserAgentRow>(
            r#"
            SELECT user_agent, COUNT(*) AS count
            FROM clicks
            WHERE short_code = $1
            GROUP BY user_agent
            ORDER BY count DESC, user_agent
            LIMIT $2
            "#,
        )
        .bind(code)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| UserAgentCount {
                user_agent: r.user_agent,
                count: r.count,
            })
            .collect())
    }

    async fn clicks_by_date(
        &self,
        code: &str,
        since: DateTime<Utc>,
    ) -> Result<Vec<DailyCount>, AppError> {
        let rows = sqlx::query_as::<_, DailyRow>(
            r#"
            SELECT to_char(clicked_at AT TIME ZONE 'UTC', 'YYYY-MM-DD') AS date,
                   COUNT(*) AS count
            FROM clicks
            WHERE short_code = $1 AND clicked_at >= $2
            GROUP BY 1
            ORDER BY 1 ASC
            "#,
        )
        .bind(code)
        .bind(since)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows
            .into_iter()
            .map(|r| DailyCount {
                date: r.date,
                count: r.count,
            })
            .collect())
    }

    async fn recent(&self, code: &str, limit: i64) -> Result<Vec<Click>, AppError> {
        let rows = sqlx::query_as::<_, ClickRow>(
            r#"
            SELECT id, short_code, clicked_at, user_agent, referer, source_ip
            FROM clicks
            WHERE short_code = $1
            ORDER BY clicked_at DESC, id DESC
            LIMIT $2
            "#,
        )
        .bind(code)
        .bind(limit)
        .fetch_all(self.pool.as_ref())
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
