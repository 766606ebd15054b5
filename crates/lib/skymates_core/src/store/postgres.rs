//! PostgreSQL-backed stores.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{StoreError, TermStore, UserStore};
use crate::models::auth::{NewUser, User, UserField, UserWithPassword};
use crate::models::term::{Category, CategoryId, Term, TermId, TermSummary};
use crate::uuid::uuidv7;

/// Term and user queries over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Row shape of the `users` table including the hash.
#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<UserRow> for UserWithPassword {
    fn from(row: UserRow) -> Self {
        UserWithPassword {
            user: User {
                id: row.id,
                username: row.username,
                email: row.email,
                created_at: row.created_at,
                updated_at: row.updated_at,
            },
            password_hash: row.password_hash,
        }
    }
}

fn find_user_sql(field: UserField) -> &'static str {
    match field {
        UserField::Id => {
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE id::text = $1"
        }
        UserField::Username => {
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE username = $1"
        }
        UserField::Email => {
            "SELECT id, username, email, password_hash, created_at, updated_at \
             FROM users WHERE email = $1"
        }
    }
}

fn user_exists_sql(field: UserField) -> &'static str {
    match field {
        UserField::Id => "SELECT EXISTS(SELECT 1 FROM users WHERE id::text = $1)",
        UserField::Username => "SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)",
        UserField::Email => "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)",
    }
}

fn map_insert_error(e: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db) = &e
        && db.is_unique_violation()
    {
        return StoreError::Duplicate(db.constraint().unwrap_or("users").to_string());
    }
    StoreError::Sql(e)
}

#[async_trait]
impl TermStore for PgStore {
    async fn search_terms(
        &self,
        keyword: &str,
        cap: usize,
    ) -> Result<Vec<TermSummary>, StoreError> {
        // Same ordering as the in-process ranker, so the LIMIT keeps the best rows.
        let rows = sqlx::query_as::<_, TermSummary>(
            r#"
            SELECT id, name
            FROM terms
            WHERE strpos(lower(name), lower($1)) > 0
            ORDER BY
                CASE
                    WHEN lower(name) = lower($1) THEN 0
                    WHEN starts_with(lower(name), lower($1)) THEN 1
                    ELSE 2
                END,
                char_length(name),
                id
            LIMIT $2
            "#,
        )
        .bind(keyword)
        .bind(cap as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn list_terms_by_category(
        &self,
        category_id: CategoryId,
        before: Option<TermId>,
        fetch: usize,
    ) -> Result<Vec<TermSummary>, StoreError> {
        let rows = sqlx::query_as::<_, TermSummary>(
            r#"
            SELECT t.id, t.name
            FROM terms t
            JOIN term_category_relations r ON t.id = r.term_id
            WHERE r.category_id = $1
              AND ($2::bigint IS NULL OR t.id < $2)
            ORDER BY t.id DESC
            LIMIT $3
            "#,
        )
        .bind(category_id)
        .bind(before)
        .bind(fetch as i64)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn find_term(&self, id: TermId) -> Result<Option<Term>, StoreError> {
        let row = sqlx::query_as::<_, Term>(
            "SELECT id, name, explanation, source, created_at, updated_at \
             FROM terms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn term_categories(&self, id: TermId) -> Result<Vec<Category>, StoreError> {
        let rows = sqlx::query_as::<_, Category>(
            r#"
            SELECT c.id, c.name, c.parent_id, c.created_at
            FROM term_categories c
            JOIN term_category_relations r ON c.id = r.category_id
            WHERE r.term_id = $1
            ORDER BY c.id
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    async fn count_terms_in_category(&self, category_id: CategoryId) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM term_category_relations WHERE category_id = $1",
        )
        .bind(category_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_user(
        &self,
        field: UserField,
        value: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        let row = sqlx::query_as::<_, UserRow>(find_user_sql(field))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(UserWithPassword::from))
    }

    async fn user_exists(&self, field: UserField, value: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(user_exists_sql(field))
            .bind(value)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, created_at, updated_at
            "#,
        )
        .bind(uuidv7())
        .bind(&new_user.username)
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_insert_error)
    }
}
