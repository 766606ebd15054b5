//! In-process store used by tests and local demos.
//!
//! Ids come from a counter that only moves forward, matching the sequence
//! semantics of the Postgres schema.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{StoreError, TermStore, UserStore};
use crate::models::auth::{NewUser, User, UserField, UserWithPassword};
use crate::models::term::{Category, CategoryId, Term, TermId, TermSummary};
use crate::terms::ranking::{Keyword, rank};
use crate::uuid::uuidv7;

#[derive(Debug, Default)]
struct Tables {
    next_term_id: TermId,
    next_category_id: CategoryId,
    terms: BTreeMap<TermId, Term>,
    categories: BTreeMap<CategoryId, Category>,
    /// `(category_id, term_id)` pairs.
    relations: BTreeSet<(CategoryId, TermId)>,
    users: Vec<UserWithPassword>,
}

/// Memory-backed [`TermStore`] and [`UserStore`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail, to exercise error paths.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("memory store switched off".into()));
        }
        Ok(())
    }

    /// Add a category and return its id.
    pub async fn insert_category(&self, name: &str, parent_id: Option<CategoryId>) -> CategoryId {
        let mut t = self.tables.write().await;
        t.next_category_id += 1;
        let id = t.next_category_id;
        t.categories.insert(
            id,
            Category {
                id,
                name: name.to_string(),
                parent_id,
                created_at: Utc::now(),
            },
        );
        id
    }

    /// Add a term linked to `categories` and return its id.
    pub async fn insert_term(&self, name: &str, categories: &[CategoryId]) -> TermId {
        self.insert_term_with(name, None, None, categories).await
    }

    /// Add a term with explanation and source.
    pub async fn insert_term_with(
        &self,
        name: &str,
        explanation: Option<&str>,
        source: Option<&str>,
        categories: &[CategoryId],
    ) -> TermId {
        let mut t = self.tables.write().await;
        t.next_term_id += 1;
        let id = t.next_term_id;
        let now = Utc::now();
        t.terms.insert(
            id,
            Term {
                id,
                name: name.to_string(),
                explanation: explanation.map(str::to_string),
                source: source.map(str::to_string),
                created_at: now,
                updated_at: now,
            },
        );
        for category_id in categories {
            t.relations.insert((*category_id, id));
        }
        id
    }

    /// Remove a term and its relations. The id is not handed out again.
    pub async fn delete_term(&self, id: TermId) -> bool {
        let mut t = self.tables.write().await;
        t.relations.retain(|(_, term_id)| *term_id != id);
        t.terms.remove(&id).is_some()
    }
}

fn matches_field(user: &User, field: UserField, value: &str) -> bool {
    match field {
        UserField::Id => user.id.to_string() == value,
        UserField::Username => user.username == value,
        UserField::Email => user.email == value,
    }
}

#[async_trait]
impl TermStore for MemoryStore {
    async fn search_terms(
        &self,
        keyword: &str,
        cap: usize,
    ) -> Result<Vec<TermSummary>, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        let all = t
            .terms
            .values()
            .map(|term| TermSummary::new(term.id, term.name.clone()))
            .collect();
        Ok(rank(&Keyword::new(keyword), all, cap))
    }

    async fn list_terms_by_category(
        &self,
        category_id: CategoryId,
        before: Option<TermId>,
        fetch: usize,
    ) -> Result<Vec<TermSummary>, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        let upper = before.unwrap_or(TermId::MAX);
        let rows = t
            .relations
            .range((category_id, TermId::MIN)..(category_id, upper))
            .rev()
            .filter_map(|(_, term_id)| t.terms.get(term_id))
            .take(fetch)
            .map(|term| TermSummary::new(term.id, term.name.clone()))
            .collect();
        Ok(rows)
    }

    async fn find_term(&self, id: TermId) -> Result<Option<Term>, StoreError> {
        self.check()?;
        Ok(self.tables.read().await.terms.get(&id).cloned())
    }

    async fn term_categories(&self, id: TermId) -> Result<Vec<Category>, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        let mut out: Vec<Category> = t
            .relations
            .iter()
            .filter(|(_, term_id)| *term_id == id)
            .filter_map(|(category_id, _)| t.categories.get(category_id).cloned())
            .collect();
        out.sort_by_key(|c| c.id);
        Ok(out)
    }

    async fn count_terms_in_category(&self, category_id: CategoryId) -> Result<i64, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        let count = t
            .relations
            .range((category_id, TermId::MIN)..=(category_id, TermId::MAX))
            .count();
        Ok(count as i64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.check()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user(
        &self,
        field: UserField,
        value: &str,
    ) -> Result<Option<UserWithPassword>, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t
            .users
            .iter()
            .find(|u| matches_field(&u.user, field, value))
            .cloned())
    }

    async fn user_exists(&self, field: UserField, value: &str) -> Result<bool, StoreError> {
        self.check()?;
        let t = self.tables.read().await;
        Ok(t.users.iter().any(|u| matches_field(&u.user, field, value)))
    }

    async fn create_user(&self, new_user: &NewUser) -> Result<User, StoreError> {
        self.check()?;
        let mut t = self.tables.write().await;
        if t.users.iter().any(|u| u.user.username == new_user.username) {
            return Err(StoreError::Duplicate("users_username_key".into()));
        }
        if t.users.iter().any(|u| u.user.email == new_user.email) {
            return Err(StoreError::Duplicate("users_email_key".into()));
        }
        let now = Utc::now();
        let user = User {
            id: uuidv7(),
            username: new_user.username.clone(),
            email: new_user.email.clone(),
            created_at: now,
            updated_at: now,
        };
        t.users.push(UserWithPassword {
            user: user.clone(),
            password_hash: new_user.password_hash.clone(),
        });
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn listing_respects_category_and_bound() {
        let store = MemoryStore::new();
        let a = store.insert_category("a", None).await;
        let b = store.insert_category("b", None).await;
        let t1 = store.insert_term("one", &[a]).await;
        let _t2 = store.insert_term("two", &[b]).await;
        let t3 = store.insert_term("three", &[a, b]).await;

        let rows = store.list_terms_by_category(a, None, 10).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [t3, t1]);

        let rows = store.list_terms_by_category(a, Some(t3), 10).await.unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids, [t1]);

        assert_eq!(store.count_terms_in_category(b).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn deleted_ids_are_not_reused() {
        let store = MemoryStore::new();
        let first = store.insert_term("x", &[]).await;
        assert!(store.delete_term(first).await);
        let second = store.insert_term("y", &[]).await;
        assert!(second > first);
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let store = MemoryStore::new();
        let new_user = NewUser {
            username: "ada".into(),
            email: "ada@example.com".into(),
            password_hash: "hash".into(),
        };
        store.create_user(&new_user).await.unwrap();
        let err = store.create_user(&new_user).await.unwrap_err();
        assert!(matches!(err, StoreError::Duplicate(_)));
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_unavailable(true);
        assert!(store.search_terms("x", 20).await.is_err());
        assert!(store.find_user(UserField::Username, "x").await.is_err());
    }
}
