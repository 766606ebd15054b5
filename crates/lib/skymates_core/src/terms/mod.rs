//! Term queries: ranked search, category paging and detail lookup.
//!
//! Every store call runs under the service's query deadline. Store failures
//! are logged with the operation and identifiers involved and surface as
//! [`ErrorKind::Internal`](crate::error::ErrorKind::Internal); input problems
//! are rejected as validation errors before the store is touched.

pub mod pagination;
pub mod ranking;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::error::{CoreError, CoreResult};
use crate::models::term::{CategoryId, TermDetail, TermId, TermPage, TermSummary};
use crate::store::{StoreError, TermStore};
use pagination::{clamp_limit, fetch_size, into_page};
use ranking::{Keyword, SEARCH_RESULT_CAP, rank};

/// Default per-query deadline.
pub const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Read-only glossary service.
#[derive(Clone)]
pub struct TermService {
    store: Arc<dyn TermStore>,
    query_timeout: Duration,
}

impl TermService {
    pub fn new(store: Arc<dyn TermStore>) -> Self {
        Self {
            store,
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    /// Override the per-query deadline.
    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }

    pub fn query_timeout(&self) -> Duration {
        self.query_timeout
    }

    /// Suggest up to 20 terms whose name contains `keyword`.
    pub async fn search(&self, keyword: &str) -> CoreResult<Vec<TermSummary>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(CoreError::validation("Search keyword must not be empty"));
        }

        let candidates = self
            .run(
                || format!("search terms (keyword={keyword:?})"),
                self.store.search_terms(keyword, SEARCH_RESULT_CAP),
            )
            .await?;
        let ranked = rank(&Keyword::new(keyword), candidates, SEARCH_RESULT_CAP);
        debug!(keyword, hits = ranked.len(), "term search");
        Ok(ranked)
    }

    /// One page of a category, newest terms first.
    ///
    /// `cursor` is the id of the last term of the previous page. `limit` is
    /// clamped, never rejected.
    pub async fn list_by_category(
        &self,
        category_id: CategoryId,
        cursor: Option<TermId>,
        limit: Option<i64>,
    ) -> CoreResult<TermPage> {
        validate_id("category id", category_id)?;
        if let Some(cursor) = cursor {
            validate_id("cursor", cursor)?;
        }
        let limit = clamp_limit(limit);

        let rows = self
            .run(
                || format!("list terms (category_id={category_id}, cursor={cursor:?})"),
                self.store
                    .list_terms_by_category(category_id, cursor, fetch_size(limit)),
            )
            .await?;
        let page = into_page(rows, limit);
        debug!(
            category_id,
            ?cursor,
            limit,
            returned = page.terms.len(),
            has_more = page.has_more,
            "category page"
        );
        Ok(page)
    }

    /// Term with its categories.
    ///
    /// The term row and its categories are two separate reads; a concurrent
    /// rename or delete between them is not hidden.
    pub async fn get_term(&self, id: TermId) -> CoreResult<TermDetail> {
        validate_id("term id", id)?;

        let term = self
            .run(|| format!("get term (id={id})"), self.store.find_term(id))
            .await?
            .ok_or_else(|| CoreError::not_found(format!("Term {id} not found")))?;
        let categories = self
            .run(
                || format!("get term categories (id={id})"),
                self.store.term_categories(id),
            )
            .await?;
        Ok(TermDetail::from_parts(term, categories))
    }

    /// Number of terms filed under a category.
    pub async fn count_in_category(&self, category_id: CategoryId) -> CoreResult<i64> {
        validate_id("category id", category_id)?;
        self.run(
            || format!("count terms (category_id={category_id})"),
            self.store.count_terms_in_category(category_id),
        )
        .await
    }

    /// Whether the store answers within the query deadline.
    pub async fn store_reachable(&self) -> bool {
        self.run(|| "ping store".to_string(), self.store.ping())
            .await
            .is_ok()
    }

    async fn run<T, C, F>(&self, context: C, query: F) -> CoreResult<T>
    where
        C: FnOnce() -> String,
        F: Future<Output = Result<T, StoreError>>,
    {
        match tokio::time::timeout(self.query_timeout, query).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                let context = context();
                warn!(error = %e, "{context} failed");
                Err(CoreError::internal(format!("{context} failed"), e))
            }
            Err(elapsed) => {
                let context = context();
                warn!(timeout = ?self.query_timeout, "{context} timed out");
                Err(CoreError::internal(format!("{context} timed out"), elapsed))
            }
        }
    }
}

fn validate_id(what: &str, id: i64) -> CoreResult<()> {
    if id <= 0 {
        return Err(CoreError::validation(format!("Invalid {what}: {id}")));
    }
    Ok(())
}
