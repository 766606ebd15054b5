//! Glossary domain models.
//!
//! Term and category identifiers are allocated by a database sequence, so
//! ordering by id is ordering by insertion and ids are never reused. Cursor
//! pagination relies on that.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Term identifier.
pub type TermId = i64;

/// Category identifier.
pub type CategoryId = i64;

/// Id + name projection returned by search and listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TermSummary {
    pub id: TermId,
    pub name: String,
}

impl TermSummary {
    pub fn new(id: TermId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// Full term row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Term {
    pub id: TermId,
    pub name: String,
    pub explanation: Option<String>,
    pub source: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category node. `parent_id` makes the categories a tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub parent_id: Option<CategoryId>,
    pub created_at: DateTime<Utc>,
}

/// Term with the categories it belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermDetail {
    pub id: TermId,
    pub name: String,
    pub explanation: Option<String>,
    pub source: Option<String>,
    pub categories: Vec<Category>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TermDetail {
    pub fn from_parts(term: Term, categories: Vec<Category>) -> Self {
        Self {
            id: term.id,
            name: term.name,
            explanation: term.explanation,
            source: term.source,
            categories,
            created_at: term.created_at,
            updated_at: term.updated_at,
        }
    }
}

/// One page of a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermPage {
    pub terms: Vec<TermSummary>,
    pub has_more: bool,
}

impl TermPage {
    /// Cursor for the next request: id of the last term on this page.
    pub fn next_cursor(&self) -> Option<TermId> {
        self.terms.last().map(|t| t.id)
    }
}
