//! Store seams for terms and users.
//!
//! Services talk to storage only through [`TermStore`] and [`UserStore`].
//! [`postgres::PgStore`] is the production implementation; the
//! [`memory::MemoryStore`] keeps everything in process for tests and demos.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::auth::{NewUser, User, UserField, UserWithPassword};
use crate::models::term::{Category, CategoryId, Term, TermId, TermSummary};

/// Storage-level failures. Services wrap these into classified errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Sql(#[from] sqlx::Error),

    #[error("Unique constraint violated: {0}")]
    Duplicate(String),

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Read access to the glossary.
#[async_trait]
pub trait TermStore: Send + Sync {
    /// Terms whose name contains `keyword`, case-insensitively.
    ///
    /// Implementations return at most `cap` rows. When they truncate, they
    /// must keep the best-ranked rows (tier, name length, id); callers
    /// re-rank whatever comes back.
    async fn search_terms(&self, keyword: &str, cap: usize)
    -> Result<Vec<TermSummary>, StoreError>;

    /// Terms in `category_id` ordered by id descending, limited to ids
    /// strictly below `before` when given, at most `fetch` rows.
    async fn list_terms_by_category(
        &self,
        category_id: CategoryId,
        before: Option<TermId>,
        fetch: usize,
    ) -> Result<Vec<TermSummary>, StoreError>;

    /// Single term row.
    async fn find_term(&self, id: TermId) -> Result<Option<Term>, StoreError>;

    /// Categories a term belongs to, ordered by id.
    async fn term_categories(&self, id: TermId) -> Result<Vec<Category>, StoreError>;

    /// Number of terms related to a category.
    async fn count_terms_in_category(&self, category_id: CategoryId) -> Result<i64, StoreError>;

    /// Cheap round trip to check the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Access to user identities.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Fetch a user and their password hash by a unique column.
    async fn find_user(
        &self,
        field: UserField,
        value: &str,
    ) -> Result<Option<UserWithPassword>, StoreError>;

    /// Check whether a unique column value is taken.
    async fn user_exists(&self, field: UserField, value: &str) -> Result<bool, StoreError>;

    /// Insert a new user. A unique violation surfaces as
    /// [`StoreError::Duplicate`].
    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError>;
}
